//! Registered domain set
//!
//! An insertion-ordered set of already-normalized domains. Order carries no
//! routing meaning but is kept stable across persistence for display.
//!
//! Comparison is exact and case-sensitive; callers normalize first.

use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::{debug, warn};

/// Check whether `domain` can be registered
///
/// Entries are matched literally, so PAC glob characters (`*`, `?`) and
/// whitespace are refused, as is the empty string.
pub fn is_valid_entry(domain: &str) -> bool {
    !domain.is_empty() && !domain.contains(|c: char| c == '*' || c == '?' || c.is_whitespace())
}

/// What a toggle did to the set
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToggleOutcome {
    /// Domain was absent and has been appended
    Added,
    /// Domain was present and has been removed
    Removed,
}

impl fmt::Display for ToggleOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Added => write!(f, "added"),
            Self::Removed => write!(f, "removed"),
        }
    }
}

/// Ordered set of registered domains
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<String>", into = "Vec<String>")]
pub struct DomainSet {
    domains: Vec<String>,
}

impl DomainSet {
    /// Create an empty set
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a set from domains, keeping the first occurrence of duplicates
    pub fn with_domains<I, S>(domains: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut set = Self::new();
        for domain in domains {
            set.add(domain);
        }
        set
    }

    /// Build a set from newline-separated text
    ///
    /// Each line is trimmed and blank lines are dropped. Entries are kept as
    /// typed, without normalization.
    pub fn from_lines(text: &str) -> Self {
        Self::with_domains(
            text.lines()
                .map(str::trim)
                .filter(|line| !line.is_empty()),
        )
    }

    /// Check whether `domain` is registered
    pub fn contains(&self, domain: &str) -> bool {
        self.domains.iter().any(|d| d == domain)
    }

    /// Append `domain` if absent
    ///
    /// Returns `true` if the set changed. Entries failing
    /// [`is_valid_entry`] are never added.
    pub fn add(&mut self, domain: impl Into<String>) -> bool {
        let domain = domain.into();
        if !is_valid_entry(&domain) {
            if !domain.is_empty() {
                warn!(domain = %domain, "Ignoring domain entry with glob characters or whitespace");
            }
            return false;
        }
        if self.contains(&domain) {
            return false;
        }
        debug!(domain = %domain, "Adding domain");
        self.domains.push(domain);
        true
    }

    /// Remove `domain` if present
    ///
    /// Returns `true` if the set changed.
    pub fn remove(&mut self, domain: &str) -> bool {
        match self.domains.iter().position(|d| d == domain) {
            Some(index) => {
                debug!(domain = %domain, "Removing domain");
                self.domains.remove(index);
                true
            }
            None => false,
        }
    }

    /// Remove `domain` if present, otherwise add it
    ///
    /// `domain` must pass [`is_valid_entry`] for an add to take effect.
    pub fn toggle(&mut self, domain: &str) -> ToggleOutcome {
        if self.remove(domain) {
            ToggleOutcome::Removed
        } else {
            self.add(domain);
            ToggleOutcome::Added
        }
    }

    /// Number of registered domains
    pub fn len(&self) -> usize {
        self.domains.len()
    }

    /// Check if no domain is registered
    pub fn is_empty(&self) -> bool {
        self.domains.is_empty()
    }

    /// Iterate domains in insertion order
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.domains.iter().map(String::as_str)
    }

    /// Domains in insertion order
    pub fn as_slice(&self) -> &[String] {
        &self.domains
    }
}

impl From<Vec<String>> for DomainSet {
    fn from(domains: Vec<String>) -> Self {
        Self::with_domains(domains)
    }
}

impl From<DomainSet> for Vec<String> {
    fn from(set: DomainSet) -> Self {
        set.domains
    }
}

impl<'a> IntoIterator for &'a DomainSet {
    type Item = &'a String;
    type IntoIter = std::slice::Iter<'a, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.domains.iter()
    }
}
