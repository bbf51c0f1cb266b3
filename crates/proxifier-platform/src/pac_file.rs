//! PAC file sink
//!
//! Writes the compiled script to a `.pac` file that a browser or the OS
//! loads as its proxy auto-config URL. Direct mode writes a script that
//! returns `DIRECT` for every request, so the file never goes stale.

use crate::write::write_atomic;
use proxifier_core::pac::PacScript;
use proxifier_core::{PolicySink, Result};
use std::path::{Path, PathBuf};
use tracing::info;

/// Sink name used in logs and errors
pub const NAME: &str = "pac-file";

/// Writes the active policy to a PAC file
#[derive(Debug, Clone)]
pub struct PacFileSink {
    path: PathBuf,
}

impl PacFileSink {
    /// Create a sink writing to `path`
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Output path
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn write(&self, script: &str) -> Result<()> {
        write_atomic(&self.path, script.as_bytes()).map_err(|e| e.into_install_error(NAME))?;
        info!(path = %self.path.display(), "PAC file updated");
        Ok(())
    }
}

impl PolicySink for PacFileSink {
    fn name(&self) -> &'static str {
        NAME
    }

    fn install_pac_script(&self, script: &str) -> Result<()> {
        self.write(script)
    }

    fn install_direct(&self) -> Result<()> {
        self.write(&PacScript::direct().render())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_script_written_verbatim() {
        let dir = tempfile::tempdir().unwrap();
        let sink = PacFileSink::new(dir.path().join("proxy.pac"));

        sink.install_pac_script("function FindProxyForURL(url, host) {}\n").unwrap();
        assert_eq!(
            std::fs::read_to_string(sink.path()).unwrap(),
            "function FindProxyForURL(url, host) {}\n"
        );
    }

    #[test]
    fn test_direct_overwrites_script() {
        let dir = tempfile::tempdir().unwrap();
        let sink = PacFileSink::new(dir.path().join("proxy.pac"));

        sink.install_pac_script("old").unwrap();
        sink.install_direct().unwrap();

        let text = std::fs::read_to_string(sink.path()).unwrap();
        assert_eq!(text, PacScript::direct().render());
        assert!(!text.contains("shExpMatch"));
    }

    #[test]
    fn test_unwritable_path_reports_sink() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("file");
        std::fs::write(&blocker, "x").unwrap();

        let sink = PacFileSink::new(blocker.join("proxy.pac"));
        let err = sink.install_direct().unwrap_err();
        assert!(matches!(
            err,
            proxifier_core::Error::PolicyInstall { sink: NAME, .. }
        ));
    }
}
