//! Proxifier Platform Layer
//!
//! This crate provides the [`PolicySink`] implementations that make a
//! compiled routing policy take effect.
//!
//! ## Supported Sinks
//!
//! - **pac-file**: `.pac` file loaded by the browser or OS
//! - **proxy-settings**: browser proxy-settings JSON value
//! - **log**: records and logs only

#![warn(missing_docs)]
#![warn(clippy::all)]

mod error;
pub use error::{PlatformError, Result};

pub mod log_sink;
pub mod pac_file;
pub mod proxy_settings;
mod write;

pub use log_sink::{LogSink, RecordedPolicy};
pub use pac_file::PacFileSink;
pub use proxy_settings::{ProxySettingsSink, ProxySettingsValue};

use proxifier_core::config::{PolicySettings, SinkKind};
use proxifier_core::PolicySink;
use tracing::debug;

/// Build the sink described by `settings`
pub fn sink_from_settings(settings: &PolicySettings) -> Box<dyn PolicySink> {
    debug!(sink = ?settings.sink, output = %settings.output.display(), "Creating policy sink");
    match settings.sink {
        SinkKind::PacFile => Box::new(PacFileSink::new(&settings.output)),
        SinkKind::ProxySettings => Box::new(ProxySettingsSink::new(&settings.output)),
        SinkKind::Log => Box::new(LogSink::new()),
    }
}
