//! # Proxifier Core
//!
//! Platform-independent core library for per-domain proxy routing.
//!
//! ## Architecture
//!
//! This crate provides:
//! - **Domain normalization** - URL/hostname to registrable domain
//! - **Domain set** - ordered membership index of registered domains
//! - **PAC compilation** - `FindProxyForURL` scripts from a routing config
//! - **Proxy state control** - install the compiled or direct policy
//! - **Dispatch** - one reaction per external event
//!
//! ## Example
//!
//! ```rust
//! use proxifier_core::{pac, DomainSet, ProxyEndpoint, ProxyKind, RoutingConfig};
//!
//! let config = RoutingConfig::new(
//!     Some(ProxyEndpoint::new("proxy.local", 8080, ProxyKind::Http)),
//!     DomainSet::with_domains(["foo.co.uk"]),
//! );
//!
//! let script = pac::compile(&config);
//! assert_eq!(script.find_proxy_for_url("", "www.foo.co.uk"), "PROXY proxy.local:8080");
//! assert_eq!(script.find_proxy_for_url("", "bar.co.uk"), "DIRECT");
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod config;
pub mod controller;
pub mod dispatcher;
pub mod domain;
pub mod error;
pub mod membership;
pub mod pac;
pub mod presenter;
pub mod store;

// Re-exports for convenience
pub use config::{AppSettings, ProxyEndpoint, ProxyKind, RoutingConfig};
pub use controller::{AppliedPolicy, PolicySink, ProxyStateController};
pub use dispatcher::{Dispatcher, Event, Reaction, Toggled};
pub use domain::normalize;
pub use error::{Error, Result};
pub use membership::{DomainSet, ToggleOutcome};
pub use pac::PacScript;
pub use presenter::{ActivePageSource, StatusSink, Tab, TabIndicator, ToastKind};
pub use store::{ConfigStore, JsonFileStore, MemoryStore};
