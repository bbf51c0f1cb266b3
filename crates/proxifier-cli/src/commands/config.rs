//! Config command - settings management

use anyhow::{bail, Context as _, Result};
use clap::{Args, Subcommand};
use colored::Colorize;
use proxifier_core::AppSettings;
use std::path::PathBuf;
use tracing::info;

use super::Context;
use crate::settings;

/// Config command arguments
#[derive(Args, Debug)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub action: ConfigAction,
}

/// Config subcommands
#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Show the effective settings
    Show,

    /// Show settings file locations
    Paths,

    /// Write a settings file with defaults
    Init {
        /// Output file path
        #[arg(short, long, default_value = settings::FILE_NAME)]
        output: PathBuf,

        /// Overwrite an existing file
        #[arg(short, long)]
        force: bool,
    },
}

/// Execute config command
pub fn execute(args: ConfigArgs, ctx: &Context) -> Result<()> {
    match args.action {
        ConfigAction::Show => show_config(ctx),
        ConfigAction::Paths => show_paths(ctx),
        ConfigAction::Init { output, force } => init_config(output, force),
    }
}

fn show_config(ctx: &Context) -> Result<()> {
    match &ctx.settings_path {
        Some(path) => println!("# Loaded from {}", path.display()),
        None => println!("# No settings file found, showing defaults"),
    }

    let toml_str = ctx.settings.to_toml().context("Failed to serialize settings")?;
    println!("{toml_str}");
    Ok(())
}

fn show_paths(ctx: &Context) -> Result<()> {
    println!("Settings file search paths:");
    println!();
    for (i, path) in settings::search_paths().iter().enumerate() {
        let marker = if path.exists() { "✓".green() } else { "·".bright_black() };
        println!("  {}. {} {}", i + 1, path.display(), marker);
    }

    println!();
    println!("In use:");
    println!();
    match &ctx.settings_path {
        Some(path) => println!("  Settings:       {}", path.display()),
        None => println!("  Settings:       {}", "(defaults)".dimmed()),
    }
    println!("  Routing config: {}", ctx.settings.store.path.display());
    println!("  Policy output:  {}", ctx.settings.policy.output.display());
    Ok(())
}

fn init_config(output: PathBuf, force: bool) -> Result<()> {
    if output.exists() && !force {
        bail!("{} already exists (use --force to overwrite)", output.display());
    }

    let toml_str = AppSettings::default()
        .to_toml()
        .context("Failed to serialize settings")?;

    let content = format!(
        "# Proxifier settings\n\
         # [policy] sink is one of: pac-file, proxy-settings, log\n\n\
         {toml_str}"
    );

    if let Some(parent) = output.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create {}", parent.display()))?;
    }
    std::fs::write(&output, content)
        .with_context(|| format!("Failed to write settings to {}", output.display()))?;

    info!(path = %output.display(), "Generated settings file");
    println!("Settings file generated: {}", output.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_writes_loadable_settings() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("proxifier.toml");

        init_config(path.clone(), false).unwrap();
        let settings = AppSettings::load(&path).unwrap();
        assert!(settings.validate().is_ok());

        assert!(init_config(path.clone(), false).is_err());
        assert!(init_config(path, true).is_ok());
    }
}
