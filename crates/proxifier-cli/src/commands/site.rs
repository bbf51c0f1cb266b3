//! Registered domain management commands
//!
//! Every change is written to the routing config store and, unless
//! `--no-apply` is given, the resulting policy is installed right away.

use anyhow::{Context as _, Result};
use clap::{Args, Subcommand};
use colored::Colorize;
use proxifier_core::{domain, pac, Dispatcher, PolicySink, TabIndicator};
use std::io::Read;
use std::path::{Path, PathBuf};

use super::{apply, Context};
use crate::terminal::{indicator_label, StaticPage, TerminalStatus};

/// Site management arguments
#[derive(Args, Debug)]
pub struct SiteArgs {
    #[command(subcommand)]
    pub command: SiteCommands,

    /// Only update the stored config, do not install the new policy
    #[arg(long, global = true)]
    pub no_apply: bool,
}

/// Site subcommands
#[derive(Subcommand, Debug)]
pub enum SiteCommands {
    /// List registered domains
    List,

    /// Register domains (subdomains are included automatically)
    Add {
        /// Domains to add, e.g. example.com
        #[arg(required = true, value_parser = clap::builder::NonEmptyStringValueParser::new())]
        domains: Vec<String>,
    },

    /// Unregister domains
    Remove {
        /// Domains to remove
        #[arg(required = true)]
        domains: Vec<String>,
    },

    /// Toggle the domain of a page, like the popup button
    Toggle {
        /// Page URL or hostname
        url: String,
    },

    /// Show how a page is routed
    Check {
        /// Page URL or hostname
        url: String,
    },

    /// Replace the domain list with one domain per line
    Import {
        /// File to read, or `-` for stdin
        file: PathBuf,
    },
}

/// Execute site command
pub fn execute(args: SiteArgs, ctx: &Context) -> Result<()> {
    let install = !args.no_apply;
    match args.command {
        SiteCommands::List => list_domains(ctx),
        SiteCommands::Add { domains } => add_domains(&domains, install, ctx),
        SiteCommands::Remove { domains } => remove_domains(&domains, install, ctx),
        SiteCommands::Toggle { url } => toggle(&url, install, ctx),
        SiteCommands::Check { url } => check(&url, ctx),
        SiteCommands::Import { file } => import(&file, install, ctx),
    }
}

fn list_domains(ctx: &Context) -> Result<()> {
    let config = ctx.routing_config()?;

    println!("{}", "═".repeat(50).bright_blue());
    println!("{}", " Registered Domains".bright_white().bold());
    println!("{}", "═".repeat(50).bright_blue());
    println!("Store: {}", ctx.settings.store.path.display().to_string().cyan());
    println!("Total domains: {}", config.domains.len().to_string().green());
    println!("{}", "─".repeat(50).bright_black());

    if config.domains.is_empty() {
        println!("{}", "  (empty)".dimmed());
    } else {
        for entry in &config.domains {
            println!("  {} {}", "●".green(), entry);
        }
    }

    println!("{}", "═".repeat(50).bright_blue());
    Ok(())
}

fn add_domains(domains: &[String], install: bool, ctx: &Context) -> Result<()> {
    let store = ctx.store();
    let pages = StaticPage::none();
    let status = TerminalStatus::toasts_only();
    let dispatcher = Dispatcher::new(&store, apply::configured_sink(ctx), &pages, &status);

    for entry in domains {
        let entry = entry.trim();
        if dispatcher.add_domain(entry)? {
            println!("{} Added {} to proxy (includes all subdomains)", "✓".green(), entry.cyan());
            let normalized = domain::normalize(entry);
            if !normalized.is_empty() && normalized != entry {
                println!(
                    "  {} pages on {} are matched as {}",
                    "note:".yellow(),
                    entry,
                    normalized.cyan()
                );
            }
        } else {
            println!("{} {} is already registered", "•".bright_black(), entry);
        }
    }

    reapply(&dispatcher, install);
    Ok(())
}

fn remove_domains(domains: &[String], install: bool, ctx: &Context) -> Result<()> {
    let store = ctx.store();
    let pages = StaticPage::none();
    let status = TerminalStatus::toasts_only();
    let dispatcher = Dispatcher::new(&store, apply::configured_sink(ctx), &pages, &status);

    for entry in domains {
        if dispatcher.remove_domain(entry)? {
            println!(
                "{} Removed {} from proxy (affects all subdomains)",
                "✓".green(),
                entry.trim().cyan()
            );
        } else {
            println!("{} {} is not registered", "•".bright_black(), entry.trim());
        }
    }

    reapply(&dispatcher, install);
    Ok(())
}

fn toggle(url: &str, install: bool, ctx: &Context) -> Result<()> {
    let store = ctx.store();
    let pages = StaticPage::from_url(Some(url));
    let status = TerminalStatus::with_indicators();
    let dispatcher = Dispatcher::new(&store, apply::configured_sink(ctx), &pages, &status);

    if dispatcher.toggle_url(url)?.is_none() {
        return Ok(());
    }
    if install {
        reapply(&dispatcher, true);
    } else {
        dispatcher.refresh_active_indicator();
    }
    Ok(())
}

fn check(url: &str, ctx: &Context) -> Result<()> {
    let config = ctx.routing_config()?;
    let normalized = domain::normalize(url);
    let host = domain::hostname(url).unwrap_or_default();
    let script = pac::compile(&config);

    println!(
        "Domain:    {}",
        if normalized.is_empty() {
            "Unknown".dimmed().to_string()
        } else {
            normalized.cyan().to_string()
        }
    );
    println!("Host:      {host}");
    println!(
        "Indicator: {}",
        indicator_label(TabIndicator::for_url(url, &config.domains))
    );
    println!("Route:     {}", script.find_proxy_for_url(url, &host).bold());
    Ok(())
}

fn import(file: &Path, install: bool, ctx: &Context) -> Result<()> {
    let text = if file.as_os_str() == "-" {
        let mut text = String::new();
        std::io::stdin()
            .read_to_string(&mut text)
            .context("Failed to read domains from stdin")?;
        text
    } else {
        std::fs::read_to_string(file)
            .with_context(|| format!("Failed to read {}", file.display()))?
    };

    let store = ctx.store();
    let endpoint = ctx.routing_config()?.endpoint.unwrap_or_default();
    let pages = StaticPage::none();
    let status = TerminalStatus::toasts_only();
    let dispatcher = Dispatcher::new(&store, apply::configured_sink(ctx), &pages, &status);

    dispatcher.save_options(endpoint, &text)?;
    reapply(&dispatcher, install);
    Ok(())
}

/// Install the policy for the config just written
pub(crate) fn reapply<S: PolicySink>(dispatcher: &Dispatcher<'_, S>, install: bool) {
    if !install {
        return;
    }
    if let Some(reaction) = dispatcher.drain_store_changes() {
        apply::report(reaction.policy, dispatcher.controller().sink().name());
    }
}
