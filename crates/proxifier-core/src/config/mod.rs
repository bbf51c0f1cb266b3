//! Routing configuration
//!
//! [`RoutingConfig`] is the single source of truth for routing: the proxy
//! endpoint plus the registered domains. It is persisted as one JSON
//! document with the keys `proxyHost`, `proxyPort`, `proxyType` and
//! `websites`, and always read and written as a whole.

mod settings;

pub use settings::{AppSettings, LoggingSettings, PolicySettings, SinkKind, StoreSettings, WatchSettings};

use crate::error::{Error, Result};
use crate::membership::DomainSet;
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::warn;

/// Default proxy port when none is stored
pub const DEFAULT_PROXY_PORT: u16 = 1080;

/// Proxy protocol spoken by the endpoint
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ProxyKind {
    /// SOCKS version 5, with SOCKS4 fallback in the PAC directive
    #[default]
    Socks5,
    /// Plain HTTP proxy
    Http,
}

impl ProxyKind {
    /// Parse a user-supplied proxy type
    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_lowercase().as_str() {
            "socks5" | "socks" => Some(Self::Socks5),
            "http" | "proxy" => Some(Self::Http),
            _ => None,
        }
    }

    /// Stored name of the proxy type
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Socks5 => "socks5",
            Self::Http => "http",
        }
    }
}

// Stored values other than "socks5" select the HTTP directive
impl From<String> for ProxyKind {
    fn from(stored: String) -> Self {
        if stored == "socks5" {
            Self::Socks5
        } else {
            Self::Http
        }
    }
}

impl From<ProxyKind> for String {
    fn from(kind: ProxyKind) -> Self {
        kind.as_str().to_string()
    }
}

impl fmt::Display for ProxyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Forward proxy endpoint
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ProxyEndpoint {
    /// Hostname or IP address of the proxy
    pub host: String,
    /// TCP port, 1-65535
    pub port: u16,
    /// Proxy protocol
    pub kind: ProxyKind,
}

impl ProxyEndpoint {
    /// Create an endpoint
    pub fn new(host: impl Into<String>, port: u16, kind: ProxyKind) -> Self {
        Self {
            host: host.into(),
            port,
            kind,
        }
    }

    /// An endpoint is usable only with a non-empty host and a non-zero port
    pub fn is_well_formed(&self) -> bool {
        !self.host.trim().is_empty() && self.port != 0
    }

    /// Check a user-supplied endpoint before it is stored
    pub fn validate(&self) -> Result<()> {
        if self.port == 0 {
            return Err(Error::InvalidPort { port: 0 });
        }
        if self.host.contains(char::is_whitespace) {
            return Err(Error::config_value("proxyHost", "Must not contain whitespace"));
        }
        Ok(())
    }

    /// `host:port` as used in PAC directives
    pub fn authority(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl Default for ProxyEndpoint {
    fn default() -> Self {
        Self::new("", DEFAULT_PROXY_PORT, ProxyKind::Socks5)
    }
}

/// Proxy endpoint plus registered domains
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RoutingConfig {
    /// Proxy endpoint, if any
    pub endpoint: Option<ProxyEndpoint>,
    /// Registered domains
    pub domains: DomainSet,
}

impl RoutingConfig {
    /// Create a config
    pub fn new(endpoint: Option<ProxyEndpoint>, domains: DomainSet) -> Self {
        Self { endpoint, domains }
    }

    /// The endpoint, only when it is well formed
    pub fn usable_endpoint(&self) -> Option<&ProxyEndpoint> {
        self.endpoint.as_ref().filter(|e| e.is_well_formed())
    }

    /// Whether routing through the proxy can be enabled at all
    ///
    /// False means the direct policy must be installed.
    pub fn is_routable(&self) -> bool {
        !self.domains.is_empty() && self.usable_endpoint().is_some()
    }

    /// Parse from the persisted JSON layout
    pub fn from_json(content: &str) -> Result<Self> {
        let stored: StoredConfig = serde_json::from_str(content)?;
        Ok(stored.into())
    }

    /// Serialize to the persisted JSON layout
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(&StoredConfig::from(self)).map_err(Error::from)
    }

    /// Validate user-editable fields
    pub fn validate(&self) -> Result<()> {
        match &self.endpoint {
            Some(endpoint) => endpoint.validate(),
            None => Ok(()),
        }
    }
}

/// Persisted record layout
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct StoredConfig {
    /// Proxy hostname, empty when unset
    pub proxy_host: String,
    /// Proxy port
    pub proxy_port: u32,
    /// `"socks5"` or `"http"`
    pub proxy_type: ProxyKind,
    /// Registered domains, in insertion order
    pub websites: Vec<String>,
}

impl Default for StoredConfig {
    fn default() -> Self {
        Self {
            proxy_host: String::new(),
            proxy_port: u32::from(DEFAULT_PROXY_PORT),
            proxy_type: ProxyKind::Socks5,
            websites: Vec::new(),
        }
    }
}

// A port outside 1-65535 loads as port 0, which no policy accepts, so the
// stored domains still load and the direct policy is installed.
impl From<StoredConfig> for RoutingConfig {
    fn from(stored: StoredConfig) -> Self {
        let port = match u16::try_from(stored.proxy_port) {
            Ok(port) if port != 0 => port,
            _ => {
                warn!(port = stored.proxy_port, "Stored proxy port is out of range, proxying disabled");
                0
            }
        };

        Self {
            endpoint: Some(ProxyEndpoint::new(stored.proxy_host, port, stored.proxy_type)),
            domains: DomainSet::from(stored.websites),
        }
    }
}

impl From<&RoutingConfig> for StoredConfig {
    fn from(config: &RoutingConfig) -> Self {
        let endpoint = config.endpoint.clone().unwrap_or_default();
        Self {
            proxy_host: endpoint.host,
            proxy_port: u32::from(endpoint.port),
            proxy_type: endpoint.kind,
            websites: config.domains.as_slice().to_vec(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_stored_config() {
        let stored = StoredConfig::default();
        assert!(stored.proxy_host.is_empty());
        assert_eq!(stored.proxy_port, 1080);
        assert_eq!(stored.proxy_type, ProxyKind::Socks5);
        assert!(stored.websites.is_empty());
    }

    #[test]
    fn test_parse_empty_document_uses_defaults() {
        let config = RoutingConfig::from_json("{}").unwrap();
        let endpoint = config.endpoint.as_ref().unwrap();
        assert_eq!(endpoint.port, 1080);
        assert_eq!(endpoint.kind, ProxyKind::Socks5);
        assert!(!config.is_routable());
    }

    #[test]
    fn test_parse_full_document() {
        let json = r#"{
            "proxyHost": "proxy.local",
            "proxyPort": 8080,
            "proxyType": "http",
            "websites": ["foo.co.uk", "example.com"]
        }"#;
        let config = RoutingConfig::from_json(json).unwrap();
        let endpoint = config.usable_endpoint().unwrap();
        assert_eq!(endpoint.authority(), "proxy.local:8080");
        assert_eq!(endpoint.kind, ProxyKind::Http);
        assert_eq!(config.domains.as_slice(), ["foo.co.uk", "example.com"]);
        assert!(config.is_routable());
    }

    #[test]
    fn test_unknown_proxy_type_is_http() {
        let config = RoutingConfig::from_json(r#"{"proxyType": "socks4"}"#).unwrap();
        assert_eq!(config.endpoint.unwrap().kind, ProxyKind::Http);
    }

    #[test]
    fn test_out_of_range_port_disables_proxying() {
        for json in [
            r#"{"proxyHost": "1.2.3.4", "proxyPort": 0, "websites": ["example.com"]}"#,
            r#"{"proxyHost": "1.2.3.4", "proxyPort": 70000, "websites": ["example.com"]}"#,
        ] {
            let config = RoutingConfig::from_json(json).unwrap();
            assert_eq!(config.domains.as_slice(), ["example.com"]);
            assert_eq!(config.endpoint.as_ref().unwrap().host, "1.2.3.4");
            assert!(config.usable_endpoint().is_none());
            assert!(!config.is_routable());
        }
    }

    #[test]
    fn test_json_keys_and_order() {
        let config = RoutingConfig::new(
            Some(ProxyEndpoint::new("1.2.3.4", 1080, ProxyKind::Socks5)),
            DomainSet::with_domains(["b.com", "a.com"]),
        );
        let json = config.to_json().unwrap();
        assert!(json.contains("\"proxyHost\": \"1.2.3.4\""));
        assert!(json.contains("\"proxyType\": \"socks5\""));

        let parsed = RoutingConfig::from_json(&json).unwrap();
        assert_eq!(parsed, config);
    }

    #[test]
    fn test_routable_requires_host_and_domains() {
        let mut config = RoutingConfig::new(
            Some(ProxyEndpoint::new("", 1080, ProxyKind::Socks5)),
            DomainSet::with_domains(["example.com"]),
        );
        assert!(!config.is_routable());

        config.endpoint = Some(ProxyEndpoint::new("proxy", 1080, ProxyKind::Socks5));
        assert!(config.is_routable());

        config.domains = DomainSet::new();
        assert!(!config.is_routable());

        config.endpoint = None;
        assert!(!config.is_routable());
    }

    #[test]
    fn test_validate() {
        let mut config = RoutingConfig::default();
        assert!(config.validate().is_ok());

        config.endpoint = Some(ProxyEndpoint::new("bad host", 1080, ProxyKind::Http));
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_proxy_kind_from_name() {
        assert_eq!(ProxyKind::from_name("SOCKS5"), Some(ProxyKind::Socks5));
        assert_eq!(ProxyKind::from_name("http"), Some(ProxyKind::Http));
        assert_eq!(ProxyKind::from_name("ftp"), None);
    }
}
