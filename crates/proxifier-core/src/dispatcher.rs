//! Event dispatch
//!
//! Maps each external event to one "recompute and apply" reaction. All
//! reactions read a fresh snapshot from the store; none of them keeps state
//! between events, so tests can call them directly.

use crate::config::{ProxyEndpoint, RoutingConfig};
use crate::controller::{AppliedPolicy, PolicySink, ProxyStateController};
use crate::domain;
use crate::error::{Error, Result};
use crate::membership::{self, DomainSet, ToggleOutcome};
use crate::presenter::{ActivePageSource, StatusSink, Tab, TabIndicator, ToastKind};
use crate::store::ConfigStore;
use tracing::{debug, error, info, warn};

/// External events the system reacts to
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    /// Process start
    Startup,
    /// The stored routing config changed
    ConfigChanged,
    /// A tab became the active tab
    TabActivated(Tab),
    /// A tab's state changed
    TabUpdated {
        /// The tab after the change
        tab: Tab,
        /// Whether the URL changed
        url_changed: bool,
        /// Whether the tab is the active one
        active: bool,
    },
    /// The user asked to toggle the active page's domain
    ToggleActivePage,
}

/// What a reaction did
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Reaction {
    /// Policy installed, if a reapply ran and succeeded
    pub policy: Option<AppliedPolicy>,
    /// Indicator shown, if it was recomputed
    pub indicator: Option<TabIndicator>,
    /// Toggle performed, if any
    pub toggled: Option<Toggled>,
}

/// Result of toggling a page's domain
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Toggled {
    /// Normalized domain that was toggled
    pub domain: String,
    /// Whether it was added or removed
    pub outcome: ToggleOutcome,
}

impl Toggled {
    /// Message shown after a successful toggle
    pub fn message(&self) -> String {
        match self.outcome {
            ToggleOutcome::Added => {
                format!("Added {} to proxy (includes all subdomains)", self.domain)
            }
            ToggleOutcome::Removed => {
                format!("Removed {} from proxy (affects all subdomains)", self.domain)
            }
        }
    }
}

/// Message shown when the page has no usable domain
pub const NO_DOMAIN_MESSAGE: &str = "Cannot get domain from this page";

/// Routes events to reactions over injected collaborators
pub struct Dispatcher<'a, S> {
    store: &'a dyn ConfigStore,
    controller: ProxyStateController<S>,
    pages: &'a dyn ActivePageSource,
    status: &'a dyn StatusSink,
}

impl<'a, S: PolicySink> Dispatcher<'a, S> {
    /// Create a dispatcher
    pub fn new(
        store: &'a dyn ConfigStore,
        sink: S,
        pages: &'a dyn ActivePageSource,
        status: &'a dyn StatusSink,
    ) -> Self {
        Self {
            store,
            controller: ProxyStateController::new(sink),
            pages,
            status,
        }
    }

    /// The proxy state controller
    pub fn controller(&self) -> &ProxyStateController<S> {
        &self.controller
    }

    /// React to one event
    pub fn handle(&self, event: &Event) -> Reaction {
        debug!(event = ?event, "Handling event");
        match event {
            Event::Startup | Event::ConfigChanged => Reaction {
                policy: self.reapply(),
                indicator: Some(self.refresh_active_indicator()),
                toggled: None,
            },
            Event::TabActivated(tab) => Reaction {
                indicator: Some(self.refresh_indicator(Some(tab))),
                ..Reaction::default()
            },
            Event::TabUpdated {
                tab,
                url_changed,
                active,
            } => {
                if *url_changed && *active {
                    Reaction {
                        indicator: Some(self.refresh_indicator(Some(tab))),
                        ..Reaction::default()
                    }
                } else {
                    Reaction::default()
                }
            }
            Event::ToggleActivePage => match self.toggle_active_page() {
                Ok(toggled) => {
                    let mut reaction = self.drain_store_changes().unwrap_or_default();
                    reaction.toggled = toggled;
                    reaction
                }
                Err(e) => {
                    warn!(error = %e, "Toggle of the active page failed");
                    Reaction::default()
                }
            },
        }
    }

    /// React to a store change notification, if one is pending
    pub fn drain_store_changes(&self) -> Option<Reaction> {
        match self.store.poll_changed() {
            Ok(true) => Some(self.handle(&Event::ConfigChanged)),
            Ok(false) => None,
            Err(e) => {
                warn!(error = %e, "Failed to check routing config for changes");
                None
            }
        }
    }

    /// Read the stored config and install its policy
    ///
    /// Failures are logged; the previous policy stays in place.
    pub fn reapply(&self) -> Option<AppliedPolicy> {
        let config = match self.store.get() {
            Ok(config) => config,
            Err(e) => {
                error!(error = %e, "Failed to read routing config, keeping current policy");
                return None;
            }
        };
        self.controller.apply(&config).ok()
    }

    /// Recompute the indicator for the active tab
    pub fn refresh_active_indicator(&self) -> TabIndicator {
        match self.pages.active_tab() {
            Ok(tab) => self.refresh_indicator(tab.as_ref()),
            Err(e) => {
                warn!(error = %e, "Could not query active tab");
                self.refresh_indicator(None)
            }
        }
    }

    /// Recompute and show the indicator for `tab`
    pub fn refresh_indicator(&self, tab: Option<&Tab>) -> TabIndicator {
        let domains = match self.store.get() {
            Ok(config) => config.domains,
            Err(e) => {
                warn!(error = %e, "Failed to read routing config for indicator");
                DomainSet::new()
            }
        };

        let indicator = TabIndicator::for_tab(tab, &domains);
        debug!(url = ?tab.map(|t| t.url.as_str()), indicator = ?indicator, "Indicator updated");
        self.status.show_indicator(indicator);
        indicator
    }

    /// Toggle the active page's domain
    pub fn toggle_active_page(&self) -> Result<Option<Toggled>> {
        let url = self.pages.active_tab()?.map(|tab| tab.url).unwrap_or_default();
        self.toggle_url(&url)
    }

    /// Toggle the registered state of `url`'s domain
    ///
    /// Returns `None` when the URL has no usable domain. The toggle is
    /// applied to a freshly read config and only counts once persisted.
    pub fn toggle_url(&self, url: &str) -> Result<Option<Toggled>> {
        let domain = domain::normalize(url);
        if !membership::is_valid_entry(&domain) {
            self.status.toast(ToastKind::Error, NO_DOMAIN_MESSAGE);
            return Ok(None);
        }

        let mut config = self.store.get()?;
        let outcome = config.domains.toggle(&domain);
        self.commit(&config)?;

        let toggled = Toggled { domain, outcome };
        info!(domain = %toggled.domain, outcome = %toggled.outcome, "Toggled domain");
        self.status.toast(ToastKind::Success, &toggled.message());
        Ok(Some(toggled))
    }

    /// Register `domain` as typed
    ///
    /// Returns `false` if it was already registered.
    pub fn add_domain(&self, domain: &str) -> Result<bool> {
        let domain = domain.trim();
        check_entry(domain)?;
        self.update(|config| config.domains.add(domain))
    }

    /// Unregister `domain`
    ///
    /// Returns `false` if it was not registered.
    pub fn remove_domain(&self, domain: &str) -> Result<bool> {
        self.update(|config| config.domains.remove(domain.trim()))
    }

    /// Replace the proxy endpoint, keeping the registered domains
    pub fn set_endpoint(&self, endpoint: ProxyEndpoint) -> Result<()> {
        endpoint.validate()?;
        self.update(|config| {
            config.endpoint = Some(endpoint);
            true
        })?;
        Ok(())
    }

    /// Replace the endpoint and the domain list from newline-separated text
    pub fn save_options(&self, endpoint: ProxyEndpoint, websites: &str) -> Result<()> {
        let result = websites
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .try_for_each(check_entry)
            .and_then(|()| {
                let config = RoutingConfig::new(Some(endpoint), DomainSet::from_lines(websites));
                config.validate()?;
                self.store.set(&config)
            });
        if let Err(e) = result {
            error!(location = %self.store.location(), error = %e, "Failed to save settings");
            self.status
                .toast(ToastKind::Error, &format!("Error saving settings: {e}"));
            return Err(e);
        }
        self.status.toast(ToastKind::Success, "Settings saved successfully!");
        Ok(())
    }

    /// Read fresh, mutate, and persist if `f` reports a change
    fn update<F>(&self, f: F) -> Result<bool>
    where
        F: FnOnce(&mut RoutingConfig) -> bool,
    {
        let mut config = self.store.get()?;
        if !f(&mut config) {
            return Ok(false);
        }
        self.commit(&config)?;
        Ok(true)
    }

    /// Persist `config`; a rejected write is surfaced to the user
    fn commit(&self, config: &RoutingConfig) -> Result<()> {
        self.store.set(config).map_err(|e| {
            error!(location = %self.store.location(), error = %e, "Failed to save routing config");
            self.status.toast(ToastKind::Error, &e.to_string());
            e
        })
    }
}

fn check_entry(entry: &str) -> Result<()> {
    if membership::is_valid_entry(entry) {
        Ok(())
    } else {
        Err(Error::config_value(
            "websites",
            format!("'{entry}' is not a plain domain name"),
        ))
    }
}
