//! Browser proxy-settings sink
//!
//! Writes the value a browser proxy-settings API takes, for a managed
//! policy file or an extension host to pick up:
//!
//! ```json
//! {"mode":"pac_script","pacScript":{"data":"function FindProxyForURL..."}}
//! {"mode":"direct"}
//! ```

use crate::error::PlatformError;
use crate::write::write_atomic;
use proxifier_core::{PolicySink, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::info;

/// Sink name used in logs and errors
pub const NAME: &str = "proxy-settings";

/// Proxy settings value
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum ProxySettingsValue {
    /// Use the embedded PAC script
    PacScript {
        /// Script source
        #[serde(rename = "pacScript")]
        pac_script: PacScriptData,
    },
    /// Connect directly
    Direct,
}

/// Inline PAC script
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PacScriptData {
    /// Script text
    pub data: String,
}

/// Writes the active policy as a proxy-settings JSON value
#[derive(Debug, Clone)]
pub struct ProxySettingsSink {
    path: PathBuf,
}

impl ProxySettingsSink {
    /// Create a sink writing to `path`
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Output path
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn write(&self, value: &ProxySettingsValue) -> Result<()> {
        serde_json::to_vec_pretty(value)
            .map_err(PlatformError::from)
            .and_then(|json| write_atomic(&self.path, &json))
            .map_err(|e| e.into_install_error(NAME))?;
        info!(path = %self.path.display(), "Proxy settings updated");
        Ok(())
    }
}

impl PolicySink for ProxySettingsSink {
    fn name(&self) -> &'static str {
        NAME
    }

    fn install_pac_script(&self, script: &str) -> Result<()> {
        self.write(&ProxySettingsValue::PacScript {
            pac_script: PacScriptData {
                data: script.to_string(),
            },
        })
    }

    fn install_direct(&self) -> Result<()> {
        self.write(&ProxySettingsValue::Direct)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn read(sink: &ProxySettingsSink) -> serde_json::Value {
        serde_json::from_str(&std::fs::read_to_string(sink.path()).unwrap()).unwrap()
    }

    #[test]
    fn test_pac_script_value() {
        let dir = tempfile::tempdir().unwrap();
        let sink = ProxySettingsSink::new(dir.path().join("proxy.json"));

        sink.install_pac_script("function FindProxyForURL(url, host) {}").unwrap();
        assert_eq!(
            read(&sink),
            json!({
                "mode": "pac_script",
                "pacScript": { "data": "function FindProxyForURL(url, host) {}" }
            })
        );
    }

    #[test]
    fn test_direct_value() {
        let dir = tempfile::tempdir().unwrap();
        let sink = ProxySettingsSink::new(dir.path().join("proxy.json"));

        sink.install_pac_script("x").unwrap();
        sink.install_direct().unwrap();
        assert_eq!(read(&sink), json!({ "mode": "direct" }));
    }
}
