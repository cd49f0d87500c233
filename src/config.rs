use std::{
    env, fs,
    net::SocketAddr,
    path::{Path, PathBuf},
};

use chrono_tz::Tz;
use serde::Deserialize;

use crate::error::{SiteError, SiteResult};

/// Points at a JSON config file. Without it the defaults are used.
pub const CONFIG_ENV: &str = "MENU_SITE_CONFIG";

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    Development,
    #[default]
    Production,
}

#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct Config {
    pub bind_address: String,
    pub database_path: PathBuf,
    /// Host key of the one restaurant this site serves.
    pub tenant: String,
    /// IANA zone the restaurant's "today" is computed in.
    pub timezone: String,
    pub environment: Environment,
    /// Restaurant JSON imported on start when the tenant is not in the store.
    pub seed_file: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            bind_address: "127.0.0.1:7878".to_string(),
            database_path: PathBuf::from("data.db"),
            tenant: "whereslloyd".to_string(),
            timezone: "America/New_York".to_string(),
            environment: Environment::Production,
            seed_file: None,
        }
    }
}

impl Config {
    pub fn from_config(config: &str) -> SiteResult<Self> {
        serde_json::from_str(config)
            .map_err(|err| SiteError::Config(format!("Could not deserialize.\n{}", err)))
    }

    /**
    Build the configuration for this process.

    Reads the file named by `MENU_SITE_CONFIG` if set, then applies the
    `DATABASE_URL`, `MENU_SITE_TENANT` and `MENU_SITE_BIND` overrides and
    validates the result.
    */
    pub fn load() -> SiteResult<Self> {
        let path = env::var_os(CONFIG_ENV).map(PathBuf::from);
        Self::load_from(path.as_deref(), |key| env::var(key).ok())
    }

    fn load_from(path: Option<&Path>, lookup: impl Fn(&str) -> Option<String>) -> SiteResult<Self> {
        let mut config = match path {
            Some(path) => {
                let text = fs::read_to_string(path).map_err(|err| {
                    SiteError::Config(format!("Could not read {}.\n{}", path.display(), err))
                })?;
                Self::from_config(&text)?
            }
            None => Self::default(),
        };
        config.apply_overrides(lookup);
        config.validate()?;
        Ok(config)
    }

    fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(url) = lookup("DATABASE_URL") {
            let path = url.strip_prefix("file:").unwrap_or(&url);
            self.database_path = PathBuf::from(path);
        }
        if let Some(tenant) = lookup("MENU_SITE_TENANT") {
            self.tenant = tenant;
        }
        if let Some(bind) = lookup("MENU_SITE_BIND") {
            self.bind_address = bind;
        }
    }

    pub fn validate(&self) -> SiteResult<()> {
        if self.tenant.trim().is_empty() {
            return Err(SiteError::Config("tenant must not be empty".to_string()));
        }
        self.socket_address()?;
        self.tz()?;
        Ok(())
    }

    pub fn socket_address(&self) -> SiteResult<SocketAddr> {
        self.bind_address.parse().map_err(|_| {
            SiteError::Config(format!("Invalid bind address {:?}", self.bind_address))
        })
    }

    pub fn tz(&self) -> SiteResult<Tz> {
        self.timezone
            .parse()
            .map_err(|_| SiteError::Config(format!("Unknown timezone {:?}", self.timezone)))
    }

    /// Default log filter when `RUST_LOG` is unset.
    pub fn log_filter(&self) -> &'static str {
        match self.environment {
            Environment::Development => "menu_site=debug",
            Environment::Production => "menu_site=info",
        }
    }
}

#[cfg(test)]
mod tests {
    use std::{collections::HashMap, io::Write};

    use super::*;

    #[test]
    fn defaults_are_valid() {
        let config = Config::default();
        config.validate().unwrap();
        assert_eq!(config.tenant, "whereslloyd");
        assert_eq!(config.socket_address().unwrap().port(), 7878);
        assert_eq!(config.log_filter(), "menu_site=info");
    }

    #[test]
    fn partial_file_keeps_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"tenant": "lloyds", "environment": "development"}}"#).unwrap();

        let config = Config::load_from(Some(file.path()), |_| None).unwrap();
        assert_eq!(config.tenant, "lloyds");
        assert_eq!(config.environment, Environment::Development);
        assert_eq!(config.database_path, PathBuf::from("data.db"));
        assert_eq!(config.log_filter(), "menu_site=debug");
    }

    #[test]
    fn missing_file_is_a_config_error() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("absent.json");
        assert!(matches!(
            Config::load_from(Some(&missing), |_| None),
            Err(SiteError::Config(_))
        ));
    }

    #[test]
    fn malformed_file_is_a_config_error() {
        assert!(matches!(Config::from_config("{"), Err(SiteError::Config(_))));
    }

    #[test]
    fn environment_overrides() {
        let vars: HashMap<&str, &str> = [
            ("DATABASE_URL", "file:/var/lib/menu.db"),
            ("MENU_SITE_TENANT", "other"),
            ("MENU_SITE_BIND", "0.0.0.0:8080"),
        ]
        .into_iter()
        .collect();
        let mut config = Config::default();
        config.apply_overrides(|key| vars.get(key).map(|v| v.to_string()));

        assert_eq!(config.database_path, PathBuf::from("/var/lib/menu.db"));
        assert_eq!(config.tenant, "other");
        assert_eq!(config.socket_address().unwrap().port(), 8080);
    }

    #[test]
    fn rejects_bad_values() {
        let config = Config {
            timezone: "Mars/Olympus".to_string(),
            ..Config::default()
        };
        assert!(config.validate().is_err());

        let config = Config {
            tenant: " ".to_string(),
            ..Config::default()
        };
        assert!(config.validate().is_err());

        let config = Config {
            bind_address: "localhost".to_string(),
            ..Config::default()
        };
        assert!(config.validate().is_err());
    }
}
