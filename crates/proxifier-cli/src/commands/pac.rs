//! PAC command - preview the compiled script

use anyhow::{Context as _, Result};
use clap::Args;
use proxifier_core::pac;
use std::path::PathBuf;
use tracing::info;

use super::Context;

/// PAC command arguments
#[derive(Args, Debug)]
pub struct PacArgs {
    /// Write the script to a file instead of stdout
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,
}

/// Execute pac command
pub fn execute(args: PacArgs, ctx: &Context) -> Result<()> {
    let config = ctx.routing_config()?;
    let script = pac::compile(&config);
    let text = script.render();

    match args.output {
        Some(path) => {
            std::fs::write(&path, &text)
                .with_context(|| format!("Failed to write PAC script to {}", path.display()))?;
            info!(path = %path.display(), direct = script.is_direct(), "Wrote PAC script");
            println!("PAC script written: {}", path.display());
        }
        None => print!("{text}"),
    }
    Ok(())
}
