//! Terminal status output and active-page source

use colored::Colorize;
use proxifier_core::{ActivePageSource, Result, StatusSink, Tab, TabIndicator, ToastKind};

/// Prints indicator changes and toasts to the terminal
#[derive(Debug, Default)]
pub struct TerminalStatus {
    indicators: bool,
}

impl TerminalStatus {
    /// Print toasts only
    pub fn toasts_only() -> Self {
        Self { indicators: false }
    }

    /// Print toasts and indicator changes
    pub fn with_indicators() -> Self {
        Self { indicators: true }
    }
}

/// Colored indicator text
pub fn indicator_label(indicator: TabIndicator) -> String {
    match indicator {
        TabIndicator::Proxied => format!("{} {}", "●".green(), indicator.to_string().green()),
        TabIndicator::NotProxied => format!("{} {}", "○".bright_black(), indicator),
    }
}

impl StatusSink for TerminalStatus {
    fn show_indicator(&self, indicator: TabIndicator) {
        if self.indicators {
            println!("{}", indicator_label(indicator));
        }
    }

    fn toast(&self, kind: ToastKind, message: &str) {
        match kind {
            ToastKind::Success => println!("{} {}", "✓".green(), message),
            ToastKind::Error => eprintln!("{} {}", "✗".red(), message),
        }
    }
}

/// A fixed active page given on the command line
#[derive(Debug, Clone, Default)]
pub struct StaticPage(Option<Tab>);

impl StaticPage {
    /// No active page
    pub fn none() -> Self {
        Self(None)
    }

    /// The page at `url`, if given
    pub fn from_url(url: Option<&str>) -> Self {
        Self(url.map(Tab::new))
    }
}

impl ActivePageSource for StaticPage {
    fn active_tab(&self) -> Result<Option<Tab>> {
        Ok(self.0.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_static_page() {
        assert_eq!(StaticPage::none().active_tab().unwrap(), None);
        assert_eq!(
            StaticPage::from_url(Some("https://example.com/")).active_tab().unwrap(),
            Some(Tab::new("https://example.com/"))
        );
    }

    #[test]
    fn test_indicator_label_text() {
        colored::control::set_override(false);
        assert_eq!(indicator_label(TabIndicator::Proxied), "● Using Proxy");
        assert_eq!(indicator_label(TabIndicator::NotProxied), "○ Not Using Proxy");
    }
}
