use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use crate::{config::Config, error::SiteError};

/// Install the global subscriber. `RUST_LOG` wins over the config default.
pub fn init(config: &Config) -> Result<(), SiteError> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(config.log_filter()));

    let subscriber = tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(true).with_line_number(true));

    tracing::subscriber::set_global_default(subscriber)
        .map_err(|err| SiteError::Config(format!("Failed to set global subscriber: {}", err)))
}
