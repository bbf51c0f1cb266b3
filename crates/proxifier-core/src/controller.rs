//! Proxy state control
//!
//! Installs either the compiled PAC script or the direct policy into a
//! [`PolicySink`]. Every call replaces the previous policy entirely.

use crate::config::RoutingConfig;
use crate::error::Result;
use crate::pac;
use tracing::{error, info, instrument};

/// Mechanism that makes a routing policy take effect
#[cfg_attr(test, mockall::automock)]
pub trait PolicySink {
    /// Sink name for logging
    fn name(&self) -> &'static str;

    /// Install `script` as the active proxy auto-config
    fn install_pac_script(&self, script: &str) -> Result<()>;

    /// Route everything direct, overriding any active policy
    fn install_direct(&self) -> Result<()>;
}

impl<S: PolicySink + ?Sized> PolicySink for Box<S> {
    fn name(&self) -> &'static str {
        (**self).name()
    }

    fn install_pac_script(&self, script: &str) -> Result<()> {
        (**self).install_pac_script(script)
    }

    fn install_direct(&self) -> Result<()> {
        (**self).install_direct()
    }
}

/// Which policy an apply installed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppliedPolicy {
    /// Compiled PAC script
    PacScript,
    /// Direct connection for everything
    Direct,
}

/// Applies routing configs to a policy sink
pub struct ProxyStateController<S> {
    sink: S,
}

impl<S: PolicySink> ProxyStateController<S> {
    /// Create a controller over `sink`
    pub fn new(sink: S) -> Self {
        Self { sink }
    }

    /// The underlying sink
    pub fn sink(&self) -> &S {
        &self.sink
    }

    /// Install the policy for `config`
    ///
    /// With registered domains and a proxy host the compiled script is
    /// installed; otherwise the direct policy is. A failed install is
    /// logged and returned, never retried; whatever policy the sink held
    /// before stays in place.
    #[instrument(skip_all, fields(sink = self.sink.name(), domains = config.domains.len()))]
    pub fn apply(&self, config: &RoutingConfig) -> Result<AppliedPolicy> {
        let (policy, result) = if config.is_routable() {
            let script = pac::compile(config).render();
            (AppliedPolicy::PacScript, self.sink.install_pac_script(&script))
        } else {
            (AppliedPolicy::Direct, self.sink.install_direct())
        };

        match result {
            Ok(()) => {
                info!(policy = ?policy, "Proxy policy installed");
                Ok(policy)
            }
            Err(e) => {
                error!(policy = ?policy, error = %e, "Failed to install proxy policy");
                Err(e)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{ProxyEndpoint, ProxyKind};
    use crate::error::Error;
    use crate::membership::DomainSet;

    fn config(host: &str, domains: &[&str]) -> RoutingConfig {
        RoutingConfig::new(
            Some(ProxyEndpoint::new(host, 1080, ProxyKind::Socks5)),
            DomainSet::with_domains(domains.iter().copied()),
        )
    }

    fn mock_sink() -> MockPolicySink {
        let mut sink = MockPolicySink::new();
        sink.expect_name().return_const("mock");
        sink
    }

    #[test]
    fn test_empty_domains_installs_direct() {
        let mut sink = mock_sink();
        sink.expect_install_direct().times(1).returning(|| Ok(()));
        sink.expect_install_pac_script().never();

        let controller = ProxyStateController::new(sink);
        let applied = controller.apply(&config("1.2.3.4", &[])).unwrap();
        assert_eq!(applied, AppliedPolicy::Direct);
    }

    #[test]
    fn test_missing_host_installs_direct() {
        let mut sink = mock_sink();
        sink.expect_install_direct().times(1).returning(|| Ok(()));
        sink.expect_install_pac_script().never();

        let controller = ProxyStateController::new(sink);
        assert_eq!(
            controller.apply(&config("", &["example.com"])).unwrap(),
            AppliedPolicy::Direct
        );
    }

    #[test]
    fn test_routable_config_installs_script() {
        let cfg = config("1.2.3.4", &["example.com"]);
        let expected = pac::compile(&cfg).render();

        let mut sink = mock_sink();
        sink.expect_install_pac_script()
            .withf(move |script: &str| script == expected)
            .times(1)
            .returning(|_| Ok(()));
        sink.expect_install_direct().never();

        let controller = ProxyStateController::new(sink);
        assert_eq!(controller.apply(&cfg).unwrap(), AppliedPolicy::PacScript);
    }

    #[test]
    fn test_install_failure_reported() {
        let mut sink = mock_sink();
        sink.expect_install_pac_script()
            .times(1)
            .returning(|_| Err(Error::policy_install("mock", "rejected")));

        let controller = ProxyStateController::new(sink);
        let err = controller.apply(&config("1.2.3.4", &["example.com"])).unwrap_err();
        assert!(matches!(err, Error::PolicyInstall { sink: "mock", .. }));
    }
}
