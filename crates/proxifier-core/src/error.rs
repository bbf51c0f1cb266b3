//! Error types for proxifier-core
//!
//! Centralized error handling using `thiserror` for ergonomic error definitions.
//!
//! Malformed URLs and incomplete routing configs are not errors here: they
//! normalize to an empty domain and to the direct policy respectively.

use thiserror::Error;

/// Main error type for proxifier-core operations
#[derive(Error, Debug)]
pub enum Error {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Configuration file not found
    #[error("Configuration file not found: {path}")]
    ConfigNotFound {
        /// Path to the missing config file
        path: String,
    },

    /// Invalid configuration value
    #[error("Invalid configuration value for '{key}': {message}")]
    ConfigValue {
        /// Configuration key
        key: String,
        /// Error message
        message: String,
    },

    /// Invalid port number
    #[error("Invalid port number: {port} (must be 1-65535)")]
    InvalidPort {
        /// The invalid port
        port: u32,
    },

    /// The configuration store rejected a read or write
    #[error("Failed to persist routing config at '{path}': {message}")]
    Persistence {
        /// Store location
        path: String,
        /// Error message
        message: String,
    },

    /// The network policy sink rejected a script or direct-mode request
    #[error("Policy sink '{sink}' failed to install policy: {message}")]
    PolicyInstall {
        /// Name of the sink that failed
        sink: &'static str,
        /// Error message
        message: String,
    },

    /// JSON error wrapper
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// TOML parsing error
    #[error("TOML parsing error: {0}")]
    TomlParse(#[from] toml::de::Error),
}

/// Result type alias using our Error type
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Create a config value error
    pub fn config_value(key: impl Into<String>, message: impl Into<String>) -> Self {
        Self::ConfigValue {
            key: key.into(),
            message: message.into(),
        }
    }

    /// Create a persistence error
    pub fn persistence(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Persistence {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Create a policy install error
    pub fn policy_install(sink: &'static str, message: impl Into<String>) -> Self {
        Self::PolicyInstall {
            sink,
            message: message.into(),
        }
    }

    /// Whether this error came from the configuration store
    pub fn is_persistence(&self) -> bool {
        matches!(self, Self::Persistence { .. })
    }
}
