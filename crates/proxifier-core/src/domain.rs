//! Registrable domain extraction
//!
//! Collapses a URL or hostname to the level at which a site is registered,
//! e.g. `a.b.example.co.uk` becomes `example.co.uk`.
//!
//! This is a fixed-list heuristic, not a public suffix list. Second-level
//! suffixes outside [`SECOND_LEVEL_SUFFIXES`] (`co.in`, `org.uk`, ...) are
//! treated like a plain TLD, so `shop.example.org.uk` yields `org.uk`.

use url::{ParseError, Url};

/// Second-level suffixes under which registration happens one label deeper
pub const SECOND_LEVEL_SUFFIXES: &[&str] = &[
    "co.uk", "com.au", "co.jp", "co.nz", "co.za", "com.br", "com.mx",
];

/// Normalize a URL or bare hostname to its registrable domain
///
/// Returns an empty string when no hostname can be extracted
/// (`about:blank`, `not a url`, `file:///etc/hosts`). An empty result means
/// "no domain" and is never a member of any domain set.
///
/// Inputs without a scheme are read as a bare hostname. Anything that
/// parses with a scheme but carries no host yields an empty string.
pub fn normalize(input: &str) -> String {
    let input = input.trim();
    if input.is_empty() {
        return String::new();
    }

    match hostname(input) {
        Some(host) => registrable_domain(&host).to_string(),
        None => String::new(),
    }
}

/// Hostname of a URL or bare hostname, as `FindProxyForURL` receives it
pub fn hostname(input: &str) -> Option<String> {
    let url = match Url::parse(input) {
        Ok(url) => url,
        Err(ParseError::RelativeUrlWithoutBase) => {
            // No scheme, so treat it as a bare hostname
            if input.contains(&['/', '?', '#', ' '][..]) {
                return None;
            }
            Url::parse(&format!("http://{input}")).ok()?
        }
        Err(_) => return None,
    };

    url.host_str()
        .filter(|host| !host.is_empty())
        .map(str::to_string)
}

/// Collapse a hostname to its registrable domain
///
/// - two or fewer labels: returned unchanged
/// - last two labels in [`SECOND_LEVEL_SUFFIXES`]: last three labels
/// - otherwise: last two labels
pub fn registrable_domain(hostname: &str) -> &str {
    let labels = hostname.split('.').count();
    if labels <= 2 {
        return hostname;
    }

    let last_two = tail_labels(hostname, 2);
    if SECOND_LEVEL_SUFFIXES.contains(&last_two) {
        tail_labels(hostname, 3)
    } else {
        last_two
    }
}

/// The last `n` dot-separated labels of `hostname`, as a subslice
fn tail_labels(hostname: &str, n: usize) -> &str {
    let mut start = hostname.len();
    for _ in 0..n {
        match hostname[..start].rfind('.') {
            Some(pos) => start = pos,
            None => return hostname,
        }
    }
    &hostname[start + 1..]
}
