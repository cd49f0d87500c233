use thiserror::Error;

/// Everything that can go wrong while serving a page.
///
/// Only `NotFound` is expected during normal operation and maps to a 404. A
/// malformed time string never leaves the rendering layer, it is logged and
/// shown as blank text.
#[derive(Debug, Error)]
pub enum SiteError {
    #[error("Not Found")]
    NotFound,

    #[error("Invalid time format: {0:?}")]
    InvalidTimeFormat(String),

    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("Could not get connection: {0}")]
    Pool(#[from] r2d2::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Template error: {0}")]
    Template(#[from] askama::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type SiteResult<T> = Result<T, SiteError>;
