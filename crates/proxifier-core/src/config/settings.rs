//! Application settings (`proxifier.toml`)
//!
//! Where the routing config lives, which policy sink makes it take effect,
//! how often the reaction loop polls for changes, and how to log.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Top-level application settings
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppSettings {
    /// Routing config store
    pub store: StoreSettings,
    /// Network policy sink
    pub policy: PolicySettings,
    /// Reaction loop
    pub watch: WatchSettings,
    /// Logging configuration
    pub logging: LoggingSettings,
}

impl AppSettings {
    /// Load settings from a TOML file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|_| Error::ConfigNotFound {
            path: path.display().to_string(),
        })?;
        Self::from_toml(&content)
    }

    /// Parse settings from TOML string
    pub fn from_toml(content: &str) -> Result<Self> {
        toml::from_str(content).map_err(Error::from)
    }

    /// Serialize to TOML string
    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self).map_err(|e| Error::Config(e.to_string()))
    }

    /// Validate the settings
    pub fn validate(&self) -> Result<()> {
        if self.store.path.as_os_str().is_empty() {
            return Err(Error::config_value("store.path", "Must not be empty"));
        }

        if self.policy.sink != SinkKind::Log && self.policy.output.as_os_str().is_empty() {
            return Err(Error::config_value(
                "policy.output",
                "Must not be empty unless sink is \"log\"",
            ));
        }

        if self.watch.interval_ms == 0 {
            return Err(Error::config_value("watch.interval_ms", "Must be greater than 0"));
        }

        Ok(())
    }
}

/// Routing config store settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreSettings {
    /// Path of the routing config JSON document
    pub path: PathBuf,
}

impl Default for StoreSettings {
    fn default() -> Self {
        Self {
            path: PathBuf::from("routing.json"),
        }
    }
}

/// Which sink installs the compiled policy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SinkKind {
    /// Write a `.pac` file for the browser to load
    #[default]
    PacFile,
    /// Write a browser proxy-settings JSON value
    ProxySettings,
    /// Only log what would be installed
    Log,
}

/// Network policy sink settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PolicySettings {
    /// Sink kind
    pub sink: SinkKind,
    /// Output file for file-backed sinks
    pub output: PathBuf,
}

impl Default for PolicySettings {
    fn default() -> Self {
        Self {
            sink: SinkKind::PacFile,
            output: PathBuf::from("proxy.pac"),
        }
    }
}

/// Reaction loop settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WatchSettings {
    /// How often to check the store for changes
    pub interval_ms: u64,
}

impl Default for WatchSettings {
    fn default() -> Self {
        Self { interval_ms: 1000 }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingSettings {
    /// Log level
    pub level: String,
    /// Log file path (None = stderr only)
    pub file: Option<PathBuf>,
    /// Enable JSON format logging
    pub json_format: bool,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            file: None,
            json_format: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_settings() {
        let settings = AppSettings::default();
        assert_eq!(settings.store.path, PathBuf::from("routing.json"));
        assert_eq!(settings.policy.sink, SinkKind::PacFile);
        assert_eq!(settings.watch.interval_ms, 1000);
        assert_eq!(settings.logging.level, "info");
        assert!(settings.validate().is_ok());
    }

    #[test]
    fn test_toml_parse_minimal() {
        let toml_content = r#"
[store]
path = "/var/lib/proxifier/routing.json"

[policy]
sink = "proxy-settings"
output = "/etc/browser/proxy.json"
"#;
        let settings = AppSettings::from_toml(toml_content).unwrap();
        assert_eq!(settings.store.path, PathBuf::from("/var/lib/proxifier/routing.json"));
        assert_eq!(settings.policy.sink, SinkKind::ProxySettings);
        assert_eq!(settings.watch.interval_ms, 1000);
    }

    #[test]
    fn test_toml_roundtrip() {
        let mut settings = AppSettings::default();
        settings.policy.sink = SinkKind::Log;
        settings.watch.interval_ms = 250;

        let toml = settings.to_toml().unwrap();
        let parsed = AppSettings::from_toml(&toml).unwrap();
        assert_eq!(parsed.policy.sink, SinkKind::Log);
        assert_eq!(parsed.watch.interval_ms, 250);
    }

    #[test]
    fn test_validation_zero_interval() {
        let mut settings = AppSettings::default();
        settings.watch.interval_ms = 0;
        assert!(settings.validate().is_err());
    }

    #[test]
    fn test_validation_empty_output() {
        let mut settings = AppSettings::default();
        settings.policy.output = PathBuf::new();
        assert!(settings.validate().is_err());

        settings.policy.sink = SinkKind::Log;
        assert!(settings.validate().is_ok());
    }

    #[test]
    fn test_toml_parse_invalid() {
        assert!(AppSettings::from_toml("this is not [valid toml").is_err());
        assert!(AppSettings::from_toml("[policy]\nsink = \"carrier-pigeon\"").is_err());
    }
}
