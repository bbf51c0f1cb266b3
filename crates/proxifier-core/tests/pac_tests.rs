//! Integration tests for PAC compilation

use proptest::prelude::*;
use proxifier_core::pac::{self, DIRECT};
use proxifier_core::{DomainSet, ProxyEndpoint, ProxyKind, RoutingConfig};

fn socks(domains: &[&str]) -> RoutingConfig {
    RoutingConfig::new(
        Some(ProxyEndpoint::new("1.2.3.4", 1080, ProxyKind::Socks5)),
        DomainSet::with_domains(domains.iter().copied()),
    )
}

#[test]
fn test_example_com_matching() {
    let script = pac::compile(&socks(&["example.com"]));

    assert!(script.matches("example.com"));
    assert!(script.matches("sub.example.com"));
    assert!(!script.matches("notexample.com"));
    assert!(!script.matches("example.com.evil.com"));
}

#[test]
fn test_http_proxy_scenario() {
    let config = RoutingConfig::from_json(
        r#"{"proxyHost":"proxy.local","proxyPort":8080,"proxyType":"http","websites":["foo.co.uk"]}"#,
    )
    .unwrap();
    let script = pac::compile(&config);

    assert_eq!(
        script.find_proxy_for_url("https://www.foo.co.uk/", "www.foo.co.uk"),
        "PROXY proxy.local:8080"
    );
    assert_eq!(script.find_proxy_for_url("https://bar.co.uk/", "bar.co.uk"), DIRECT);
    assert!(script.render().contains(r#"return "PROXY proxy.local:8080";"#));
}

#[test]
fn test_socks_fallback_order() {
    let script = pac::compile(&socks(&["example.com"]));
    let directive = script.directive().unwrap();

    let socks5 = directive.find("SOCKS5 1.2.3.4:1080").unwrap();
    let socks4 = directive.find("; SOCKS 1.2.3.4:1080").unwrap();
    assert!(socks5 < socks4);
}

#[test]
fn test_any_match_across_domains() {
    let script = pac::compile(&socks(&["a.com", "b.org", "c.co.jp"]));
    assert!(script.matches("www.b.org"));
    assert!(script.matches("c.co.jp"));
    assert!(!script.matches("d.net"));
    assert_eq!(script.domains().len(), 3);
}

#[test]
fn test_one_clause_per_domain() {
    let text = pac::compile(&socks(&["a.com", "b.org"])).render();
    assert_eq!(text.matches("shExpMatch(host, ").count(), 2);
    assert_eq!(text.matches(" || shExpMatch").count(), 2);
    assert_eq!(text.matches("return \"DIRECT\";").count(), 1);
}

proptest! {
    #[test]
    fn compile_is_pure(
        domains in prop::collection::vec("[a-z]{1,8}\\.(com|org|co\\.uk)", 0..10),
        host in "[a-z0-9.]{1,20}",
        port in 1u16..,
        http in any::<bool>(),
    ) {
        let kind = if http { ProxyKind::Http } else { ProxyKind::Socks5 };
        let make = || RoutingConfig::new(
            Some(ProxyEndpoint::new(host.clone(), port, kind)),
            DomainSet::with_domains(domains.clone()),
        );

        let first = pac::compile(&make());
        let second = pac::compile(&make());
        prop_assert_eq!(first.render(), second.render());
        prop_assert_eq!(first, second);
    }

    #[test]
    fn empty_domains_always_direct(
        host in "[a-z0-9.\\-]{0,30}",
    ) {
        let script = pac::compile(&socks(&[]));
        prop_assert_eq!(script.find_proxy_for_url("", &host), DIRECT);
    }

    #[test]
    fn subdomains_of_registered_domain_match(
        sub in prop::collection::vec("[a-z0-9]{1,8}", 1..4),
    ) {
        let script = pac::compile(&socks(&["example.com"]));
        let host = format!("{}.example.com", sub.join("."));
        prop_assert!(script.matches(&host));

        let lookalike = format!("{}example.com", sub.join(""));
        prop_assert!(!script.matches(&lookalike) || lookalike == "example.com");
    }
}
