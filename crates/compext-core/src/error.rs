use thiserror::Error;

/// Errors raised by hosts, loaders and configuration loading.
///
/// These never cross the extension cache's accessors; the cache turns them
/// into diagnostics.
#[derive(Debug, Error)]
pub enum ExtensionError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Config error: {0}")]
    Config(String),

    #[error("Load error: {0}")]
    Load(String),

    #[error("{0}")]
    Other(String),
}

impl From<String> for ExtensionError {
    fn from(s: String) -> Self {
        ExtensionError::Other(s)
    }
}

impl From<&str> for ExtensionError {
    fn from(s: &str) -> Self {
        ExtensionError::Other(s.to_string())
    }
}
