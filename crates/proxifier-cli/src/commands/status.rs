//! Status command - the popup summary for one page

use anyhow::Result;
use clap::Args;
use colored::Colorize;
use proxifier_core::presenter::PopupSummary;

use super::Context;
use crate::terminal::indicator_label;

/// Status command arguments
#[derive(Args, Debug)]
pub struct StatusArgs {
    /// Page URL or hostname
    pub url: String,
}

/// Execute status command
pub fn execute(args: StatusArgs, ctx: &Context) -> Result<()> {
    let config = ctx.routing_config()?;
    let summary = PopupSummary::new(&args.url, &config);

    let host = if summary.proxy_host.is_empty() {
        "Not configured".dimmed().to_string()
    } else {
        summary.proxy_host.clone()
    };

    println!("Current site:  {}", summary.display_domain().cyan());
    println!("Proxy:         {host}");
    println!("Type:          {}", summary.proxy_type);
    println!("Websites:      {}", summary.website_count);
    println!("Status:        {}", indicator_label(summary.indicator));
    Ok(())
}
