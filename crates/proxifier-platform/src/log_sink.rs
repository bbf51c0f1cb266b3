//! Logging sink
//!
//! Installs nothing. Records and logs what would have been installed, for
//! dry runs and for hosts that only want the compiled script.

use parking_lot::Mutex;
use proxifier_core::{PolicySink, Result};
use tracing::{debug, info};

/// Sink name used in logs and errors
pub const NAME: &str = "log";

/// A policy the log sink was asked to install
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordedPolicy {
    /// PAC script text
    PacScript(String),
    /// Direct mode
    Direct,
}

/// Logs policies instead of installing them
#[derive(Debug, Default)]
pub struct LogSink {
    last: Mutex<Option<RecordedPolicy>>,
}

impl LogSink {
    /// Create a log sink
    pub fn new() -> Self {
        Self::default()
    }

    /// The most recent policy, if any was installed
    pub fn last_installed(&self) -> Option<RecordedPolicy> {
        self.last.lock().clone()
    }
}

impl PolicySink for LogSink {
    fn name(&self) -> &'static str {
        NAME
    }

    fn install_pac_script(&self, script: &str) -> Result<()> {
        info!(bytes = script.len(), "Would install PAC script");
        debug!(script = %script, "PAC script");
        *self.last.lock() = Some(RecordedPolicy::PacScript(script.to_string()));
        Ok(())
    }

    fn install_direct(&self) -> Result<()> {
        info!("Would install direct mode");
        *self.last.lock() = Some(RecordedPolicy::Direct);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_records_last_policy() {
        let sink = LogSink::new();
        assert_eq!(sink.last_installed(), None);

        sink.install_pac_script("script").unwrap();
        assert_eq!(
            sink.last_installed(),
            Some(RecordedPolicy::PacScript("script".into()))
        );

        sink.install_direct().unwrap();
        assert_eq!(sink.last_installed(), Some(RecordedPolicy::Direct));
    }
}
