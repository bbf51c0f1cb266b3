//! Proxy endpoint commands

use anyhow::Result;
use clap::{Args, Subcommand};
use colored::Colorize;
use proxifier_core::{Dispatcher, ProxyEndpoint, ProxyKind};

use super::{apply, site, Context};
use crate::terminal::{StaticPage, TerminalStatus};

/// Proxy command arguments
#[derive(Args, Debug)]
pub struct ProxyArgs {
    #[command(subcommand)]
    pub command: ProxyCommands,
}

/// Proxy subcommands
#[derive(Subcommand, Debug)]
pub enum ProxyCommands {
    /// Show the configured endpoint
    Show,

    /// Replace the proxy endpoint, keeping registered domains
    Set {
        /// Proxy host name or IP address
        #[arg(long)]
        host: String,

        /// Proxy port
        #[arg(long, default_value_t = proxifier_core::config::DEFAULT_PROXY_PORT,
              value_parser = clap::value_parser!(u16).range(1..))]
        port: u16,

        /// Proxy type: socks5 or http
        #[arg(long = "type", default_value = "socks5", value_parser = parse_kind)]
        kind: ProxyKind,

        /// Only update the stored config, do not install the new policy
        #[arg(long)]
        no_apply: bool,
    },
}

fn parse_kind(value: &str) -> std::result::Result<ProxyKind, String> {
    ProxyKind::from_name(value)
        .ok_or_else(|| format!("unknown proxy type '{value}' (expected socks5 or http)"))
}

/// Execute proxy command
pub fn execute(args: ProxyArgs, ctx: &Context) -> Result<()> {
    match args.command {
        ProxyCommands::Show => show(ctx),
        ProxyCommands::Set {
            host,
            port,
            kind,
            no_apply,
        } => set(ProxyEndpoint::new(host.trim(), port, kind), !no_apply, ctx),
    }
}

fn show(ctx: &Context) -> Result<()> {
    let config = ctx.routing_config()?;
    let endpoint = config.endpoint.clone().unwrap_or_default();

    println!(
        "Host:   {}",
        if endpoint.host.is_empty() {
            "Not configured".dimmed().to_string()
        } else {
            endpoint.host.cyan().to_string()
        }
    );
    println!("Port:   {}", endpoint.port);
    println!("Type:   {}", endpoint.kind.as_str().to_uppercase());
    if config.is_routable() {
        println!("State:  {}", "routing registered domains".green());
    } else if config.usable_endpoint().is_none() {
        println!("State:  {}", "direct (no proxy host)".yellow());
    } else {
        println!("State:  {}", "direct (no registered domains)".yellow());
    }
    Ok(())
}

fn set(endpoint: ProxyEndpoint, install: bool, ctx: &Context) -> Result<()> {
    let store = ctx.store();
    let pages = StaticPage::none();
    let status = TerminalStatus::toasts_only();
    let dispatcher = Dispatcher::new(&store, apply::configured_sink(ctx), &pages, &status);

    let authority = endpoint.authority();
    let kind = endpoint.kind;
    dispatcher.set_endpoint(endpoint)?;
    println!(
        "{} Proxy set to {} ({})",
        "✓".green(),
        authority.cyan(),
        kind.as_str().to_uppercase()
    );

    site::reapply(&dispatcher, install);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_kind() {
        assert_eq!(parse_kind("http").unwrap(), ProxyKind::Http);
        assert_eq!(parse_kind("socks5").unwrap(), ProxyKind::Socks5);
        assert!(parse_kind("ftp").is_err());
    }
}
