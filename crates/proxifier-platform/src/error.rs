//! Platform-specific errors

use thiserror::Error;

/// Platform-specific errors
#[derive(Error, Debug)]
pub enum PlatformError {
    /// Output path has no usable parent directory
    #[error("Invalid output path: {0}")]
    InvalidOutput(String),

    /// Writing the policy document failed
    #[error("Failed to write '{path}': {source}")]
    Write {
        /// Output path
        path: String,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// Encoding the policy document failed
    #[error("Failed to encode policy: {0}")]
    Encode(#[from] serde_json::Error),
}

impl PlatformError {
    /// Convert into a core policy-install error attributed to `sink`
    pub fn into_install_error(self, sink: &'static str) -> proxifier_core::Error {
        proxifier_core::Error::policy_install(sink, self.to_string())
    }
}

/// Platform result type
pub type Result<T> = std::result::Result<T, PlatformError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_install_error_names_sink() {
        let err = PlatformError::InvalidOutput("".into()).into_install_error("pac-file");
        assert!(matches!(
            err,
            proxifier_core::Error::PolicyInstall { sink: "pac-file", .. }
        ));
    }
}
