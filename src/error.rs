use thiserror::Error;

/// Errors raised by the locator, its cache, and the browser layer
#[derive(Error, Debug)]
pub enum LocatorError {
    #[error("Failed to launch browser: {0}")]
    LaunchFailed(String),

    #[error("Failed to connect to browser: {0}")]
    ConnectionFailed(String),

    #[error("Tab operation failed: {0}")]
    TabOperationFailed(String),

    #[error("Navigation failed: {0}")]
    NavigationFailed(String),

    #[error("Failed to parse DOM: {0}")]
    DomParseFailed(String),

    /// The element did not resolve within the bounded wait
    #[error("Timed out after {timeout_ms}ms waiting for '{selector}'")]
    ActionTimeout { selector: String, timeout_ms: u64 },

    #[error("Action '{action}' on '{selector}' failed: {reason}")]
    ActionFailed {
        action: String,
        selector: String,
        reason: String,
    },

    /// Every resolution phase stayed below the acceptance threshold
    #[error("No match for selector '{selector}' (best score: {best_score})")]
    NoMatchFound { selector: String, best_score: u32 },

    #[error("Failed to read locator cache {path}: {reason}")]
    CacheRead { path: String, reason: String },

    #[error("Failed to write locator cache {path}: {reason}")]
    CacheWrite { path: String, reason: String },

    #[error("Failed to read selector registry {path}: {reason}")]
    RegistryRead { path: String, reason: String },

    #[error("Invalid configuration: {0}")]
    Config(String),
}

impl LocatorError {
    /// Whether this is the recoverable timeout that may trigger healing
    pub fn is_timeout(&self) -> bool {
        matches!(self, LocatorError::ActionTimeout { .. })
    }
}

pub type Result<T> = std::result::Result<T, LocatorError>;
