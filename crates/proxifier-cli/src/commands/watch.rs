//! Watch command - the background reaction loop
//!
//! Applies the stored config on start, then polls the store and fully
//! reapplies on every change until Ctrl-C. Failed reactions are logged and
//! the loop keeps going.

use anyhow::{Context as _, Result};
use clap::Args;
use colored::Colorize;
use proxifier_core::{ConfigStore, Dispatcher, Event};
use std::time::Duration;
use tokio::time::MissedTickBehavior;
use tracing::{debug, error, info};

use super::{apply, Context};
use crate::terminal::{StaticPage, TerminalStatus};

/// Watch command arguments
#[derive(Args, Debug)]
pub struct WatchArgs {
    /// Active page to keep the indicator for
    #[arg(long, value_name = "URL")]
    pub url: Option<String>,

    /// Poll interval in milliseconds, overriding `[watch] interval_ms`
    #[arg(long, value_name = "MS", value_parser = clap::value_parser!(u64).range(1..))]
    pub interval_ms: Option<u64>,

    /// Stop after this many change checks
    #[arg(long, value_name = "N")]
    pub polls: Option<u64>,
}

/// Execute watch command
pub fn execute(args: WatchArgs, ctx: &Context) -> Result<()> {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("Failed to start async runtime")?;
    runtime.block_on(run(args, ctx))
}

async fn run(args: WatchArgs, ctx: &Context) -> Result<()> {
    let store = ctx.store();
    let pages = StaticPage::from_url(args.url.as_deref());
    let status = TerminalStatus::with_indicators();
    let dispatcher = Dispatcher::new(&store, apply::configured_sink(ctx), &pages, &status);
    let sink = dispatcher.controller().sink().name();
    let interval_ms = args.interval_ms.unwrap_or(ctx.settings.watch.interval_ms);

    print_banner(&store.location(), sink, interval_ms);
    info!(store = %store.location(), sink, interval_ms, "Watching routing config");

    let reaction = dispatcher.handle(&Event::Startup);
    apply::report(reaction.policy, sink);

    let mut ticker = tokio::time::interval(Duration::from_millis(interval_ms));
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    // First tick completes immediately
    ticker.tick().await;

    let shutdown = tokio::signal::ctrl_c();
    tokio::pin!(shutdown);

    let mut polls = 0u64;
    let mut reactions = 0u64;
    loop {
        if args.polls.is_some_and(|max| polls >= max) {
            debug!(polls, "Poll limit reached");
            break;
        }

        tokio::select! {
            result = &mut shutdown => {
                if let Err(e) = result {
                    error!(error = %e, "Failed to listen for Ctrl-C");
                }
                println!();
                info!("Shutdown requested");
                break;
            }
            _ = ticker.tick() => {
                polls += 1;
                if let Some(reaction) = dispatcher.drain_store_changes() {
                    reactions += 1;
                    apply::report(reaction.policy, sink);
                }
            }
        }
    }

    info!(polls, reactions, "Stopped watching");
    Ok(())
}

fn print_banner(store: &str, sink: &str, interval_ms: u64) {
    println!("{}", "═".repeat(50).bright_blue());
    println!("{}", " Proxifier - watching routing config".bright_white().bold());
    println!("{}", "═".repeat(50).bright_blue());
    println!("Store:    {}", store.cyan());
    println!("Sink:     {}", sink.cyan());
    println!("Interval: {interval_ms} ms");
    println!("{}", "Press Ctrl-C to stop".dimmed());
    println!("{}", "─".repeat(50).bright_black());
}
