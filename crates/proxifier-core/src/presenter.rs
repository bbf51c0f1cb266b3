//! Active-page routing indicator
//!
//! The indicator is recomputed from scratch on every tab event and never
//! cached: a page is [`TabIndicator::Proxied`] exactly when its normalized
//! domain is registered.

use crate::config::RoutingConfig;
use crate::domain;
use crate::error::Result;
use crate::membership::DomainSet;
use std::fmt;

/// A browser tab as seen by the indicator
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tab {
    /// Current URL of the tab
    pub url: String,
}

impl Tab {
    /// Create a tab showing `url`
    pub fn new(url: impl Into<String>) -> Self {
        Self { url: url.into() }
    }
}

/// Source of the currently active page
pub trait ActivePageSource {
    /// The active tab, if there is one
    fn active_tab(&self) -> Result<Option<Tab>>;
}

/// Routing state shown for the active page
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TabIndicator {
    /// The page's domain is registered
    Proxied,
    /// Not registered, unparseable URL, or no active tab
    NotProxied,
}

impl TabIndicator {
    /// Indicator for a URL against the registered domains
    pub fn for_url(url: &str, domains: &DomainSet) -> Self {
        let domain = domain::normalize(url);
        if !domain.is_empty() && domains.contains(&domain) {
            Self::Proxied
        } else {
            Self::NotProxied
        }
    }

    /// Indicator for an optional tab
    pub fn for_tab(tab: Option<&Tab>, domains: &DomainSet) -> Self {
        tab.map_or(Self::NotProxied, |tab| Self::for_url(&tab.url, domains))
    }

    /// Whether the page goes through the proxy
    pub fn is_proxied(self) -> bool {
        self == Self::Proxied
    }
}

impl fmt::Display for TabIndicator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Proxied => write!(f, "Using Proxy"),
            Self::NotProxied => write!(f, "Not Using Proxy"),
        }
    }
}

/// Severity of a transient status message
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastKind {
    /// Operation succeeded
    Success,
    /// Operation failed, user action may help
    Error,
}

/// Where indicator changes and transient messages are shown
pub trait StatusSink {
    /// Render the indicator for the active page
    fn show_indicator(&self, indicator: TabIndicator);

    /// Show a transient message
    fn toast(&self, kind: ToastKind, message: &str);
}

/// Everything the popup shows for the active page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PopupSummary {
    /// Normalized domain of the page, empty when none
    pub domain: String,
    /// Configured proxy host
    pub proxy_host: String,
    /// Configured proxy type, upper-cased
    pub proxy_type: String,
    /// Number of registered domains
    pub website_count: usize,
    /// Routing state of the page
    pub indicator: TabIndicator,
}

impl PopupSummary {
    /// Summarize `config` for the page at `url`
    pub fn new(url: &str, config: &RoutingConfig) -> Self {
        let endpoint = config.endpoint.clone().unwrap_or_default();
        Self {
            domain: domain::normalize(url),
            proxy_host: endpoint.host,
            proxy_type: endpoint.kind.as_str().to_uppercase(),
            website_count: config.domains.len(),
            indicator: TabIndicator::for_url(url, &config.domains),
        }
    }

    /// Domain for display
    pub fn display_domain(&self) -> &str {
        if self.domain.is_empty() {
            "Unknown"
        } else {
            &self.domain
        }
    }
}
