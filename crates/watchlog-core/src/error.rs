//! Error types for watchlog-core.

use thiserror::Error;

/// Result type alias using watchlog-core Error
pub type Result<T> = std::result::Result<T, Error>;

/// Error taxonomy for the session layer.
///
/// Propagation policy: `Authentication` and `Registration` always reach the
/// caller so a submission flow can fail visibly. Everything raised inside the
/// generic passthrough is surfaced through the [`Notifier`] and swallowed to
/// "no result" before a consumer ever sees it.
///
/// [`Notifier`]: crate::notify::Notifier
#[derive(Error, Debug)]
pub enum Error {
    // Auth errors
    #[error("Authentication failed: {0}")]
    Authentication(String),

    #[error("Registration failed: {0}")]
    Registration(String),

    // Non-2xx API responses (other than the 401 expiry case)
    #[error("API error {status}: {message}")]
    Api { status: u16, message: String },

    // Network or decode failures
    #[error("Transport error: {0}")]
    Transport(String),

    // Persisted session store errors
    #[error("Session store error: {0}")]
    Store(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Other(String),
}

impl From<reqwest::Error> for Error {
    fn from(e: reqwest::Error) -> Self {
        Error::Transport(e.to_string())
    }
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Error::Transport(e.to_string())
    }
}

impl From<toml::de::Error> for Error {
    fn from(e: toml::de::Error) -> Self {
        Error::Config(e.to_string())
    }
}

impl From<toml::ser::Error> for Error {
    fn from(e: toml::ser::Error) -> Self {
        Error::Config(e.to_string())
    }
}
