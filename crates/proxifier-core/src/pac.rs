//! PAC script compilation
//!
//! Turns a [`RoutingConfig`] into a Proxy Auto-Config script exposing the
//! standard `FindProxyForURL(url, host)` entry point.
//!
//! ## Grammar
//!
//! ```text
//! script    := "function FindProxyForURL(url, host) {" body "}"
//! body      := "return \"DIRECT\";"
//!            | "if (" clauses ") {" "return " directive ";" "}" "return \"DIRECT\";"
//! clauses   := clause ( " || " clause )*
//! clause    := "(host === " q(d) " || shExpMatch(host, " q("*." d) "))"
//! directive := q("SOCKS5 h:p; SOCKS h:p") | q("PROXY h:p")
//! ```
//!
//! `q(s)` is `s` as a JSON string literal. There is one clause per
//! registered domain, in insertion order. The compiled [`PacScript`] can be
//! evaluated in Rust with the same semantics as the rendered text.

use crate::config::{ProxyEndpoint, ProxyKind, RoutingConfig};
use std::fmt::{self, Write as _};

/// Directive returned when no proxy applies
pub const DIRECT: &str = "DIRECT";

/// A compiled routing decision
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PacScript {
    /// Domains matched exactly or as a parent of the request host
    domains: Vec<String>,
    /// Directive for matching hosts; `None` routes everything direct
    directive: Option<String>,
}

/// Compile a routing config into a PAC script
///
/// Pure and deterministic: equal configs produce identical scripts. An
/// empty domain set or a missing/malformed endpoint yields a script that
/// returns `DIRECT` for every request. Reachability of the proxy is not
/// checked.
pub fn compile(config: &RoutingConfig) -> PacScript {
    match config.usable_endpoint() {
        Some(endpoint) if !config.domains.is_empty() => PacScript {
            domains: config.domains.as_slice().to_vec(),
            directive: Some(proxy_directive(endpoint)),
        },
        _ => PacScript::direct(),
    }
}

/// Directive string selecting `endpoint`
///
/// SOCKS5 lists a SOCKS (v4) fallback at the same address so the routing
/// layer tries SOCKS5 first.
pub fn proxy_directive(endpoint: &ProxyEndpoint) -> String {
    let authority = endpoint.authority();
    match endpoint.kind {
        ProxyKind::Socks5 => format!("SOCKS5 {authority}; SOCKS {authority}"),
        ProxyKind::Http => format!("PROXY {authority}"),
    }
}

impl PacScript {
    /// A script that routes every request direct
    pub fn direct() -> Self {
        Self {
            domains: Vec::new(),
            directive: None,
        }
    }

    /// Whether this script can ever select a proxy
    pub fn is_direct(&self) -> bool {
        self.directive.is_none()
    }

    /// Domains with a match clause, in clause order
    pub fn domains(&self) -> &[String] {
        &self.domains
    }

    /// Directive selected for matching hosts, if any
    pub fn directive(&self) -> Option<&str> {
        self.directive.as_deref()
    }

    /// Whether `host` satisfies any clause
    ///
    /// A clause for `d` matches `d` itself and any host ending in `.d`.
    pub fn matches(&self, host: &str) -> bool {
        self.directive.is_some() && self.domains.iter().any(|d| host_matches(host, d))
    }

    /// Evaluate the script as a browser would call `FindProxyForURL`
    pub fn find_proxy_for_url(&self, _url: &str, host: &str) -> &str {
        match &self.directive {
            Some(directive) if self.matches(host) => directive,
            _ => DIRECT,
        }
    }

    /// Render the script text
    pub fn render(&self) -> String {
        let mut out = String::with_capacity(
            96 + self.domains.iter().map(|d| 2 * d.len() + 48).sum::<usize>(),
        );

        out.push_str("function FindProxyForURL(url, host) {\n");

        if let Some(directive) = &self.directive {
            out.push_str("  if (");
            for (i, domain) in self.domains.iter().enumerate() {
                if i != 0 {
                    out.push_str(" ||\n      ");
                }
                let _ = write!(
                    out,
                    "(host === {} || shExpMatch(host, {}))",
                    quote(domain),
                    quote(&format!("*.{domain}"))
                );
            }
            out.push_str(") {\n");
            let _ = writeln!(out, "    return {};", quote(directive));
            out.push_str("  }\n");
        }

        let _ = writeln!(out, "  return {};", quote(DIRECT));
        out.push_str("}\n");
        out
    }
}

impl fmt::Display for PacScript {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render())
    }
}

/// Exact match or strict subdomain of `domain`
fn host_matches(host: &str, domain: &str) -> bool {
    host == domain
        || host
            .strip_suffix(domain)
            .is_some_and(|prefix| prefix.ends_with('.'))
}

/// JSON string literal, which is also a valid JavaScript string literal
fn quote(value: &str) -> String {
    serde_json::Value::from(value).to_string()
}
