//! Proxifier CLI
//!
//! Command-line interface for per-domain proxy routing.

mod args;
mod commands;
mod logging;
mod settings;
mod terminal;

use anyhow::Result;
use clap::Parser;
use tracing::error;

use args::Args;

fn main() -> Result<()> {
    // Parse command line arguments
    let args = Args::parse();

    // Settings feed logging, so load them first
    let (app_settings, settings_path) = settings::load(args.settings.as_deref())?;

    // Initialize logging
    let _guard = logging::init(&args, &app_settings.logging)?;

    let ctx = commands::Context::new(app_settings, settings_path, args.store);
    let result = commands::execute(args.command, &ctx);

    if let Err(ref e) = result {
        error!("Fatal error: {:#}", e);
    }

    result
}
