//! Apply command - install the policy for the stored config once

use anyhow::{Context as _, Result};
use clap::Args;
use colored::Colorize;
use proxifier_core::{AppliedPolicy, PolicySink, ProxyStateController};
use proxifier_platform::{sink_from_settings, LogSink, RecordedPolicy};

use super::Context;

/// Apply command arguments
#[derive(Args, Debug)]
pub struct ApplyArgs {
    /// Print the policy instead of installing it
    #[arg(long)]
    pub dry_run: bool,
}

/// The sink selected by `[policy]`
pub fn configured_sink(ctx: &Context) -> Box<dyn PolicySink> {
    sink_from_settings(&ctx.settings.policy)
}

/// Print what a reapply did
pub fn report(policy: Option<AppliedPolicy>, sink: &str) {
    match policy {
        Some(AppliedPolicy::PacScript) => {
            println!("{} Installed PAC script via {}", "✓".green(), sink.cyan());
        }
        Some(AppliedPolicy::Direct) => {
            println!("{} Installed direct mode via {}", "✓".green(), sink.cyan());
        }
        None => {
            eprintln!("{} Policy not installed, previous policy stays active", "✗".red());
        }
    }
}

/// Execute apply command
pub fn execute(args: ApplyArgs, ctx: &Context) -> Result<()> {
    let config = ctx.routing_config()?;

    if args.dry_run {
        let controller = ProxyStateController::new(LogSink::new());
        controller.apply(&config)?;
        match controller.sink().last_installed() {
            Some(RecordedPolicy::PacScript(script)) => print!("{script}"),
            Some(RecordedPolicy::Direct) | None => println!("DIRECT (proxying disabled)"),
        }
        return Ok(());
    }

    let controller = ProxyStateController::new(configured_sink(ctx));
    let sink = controller.sink().name();
    let policy = controller
        .apply(&config)
        .with_context(|| format!("Failed to install policy via {sink}"))?;
    report(Some(policy), sink);

    if sink != proxifier_platform::log_sink::NAME {
        println!("  Output: {}", ctx.settings.policy.output.display());
    }
    Ok(())
}
