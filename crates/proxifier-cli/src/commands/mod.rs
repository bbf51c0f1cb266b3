//! CLI commands

pub mod apply;
pub mod completions;
pub mod config;
pub mod pac;
pub mod proxy;
pub mod site;
pub mod status;
pub mod watch;

use anyhow::{Context as _, Result};
use clap::Subcommand;
use proxifier_core::{AppSettings, ConfigStore, JsonFileStore, RoutingConfig};
use std::path::PathBuf;

/// CLI commands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Manage registered domains
    Site(site::SiteArgs),

    /// Show or change the proxy endpoint
    Proxy(proxy::ProxyArgs),

    /// Print or write the compiled PAC script
    Pac(pac::PacArgs),

    /// Install the policy for the stored config once
    Apply(apply::ApplyArgs),

    /// Show the routing summary for a page
    Status(status::StatusArgs),

    /// Apply on start and reapply whenever the routing config changes
    Watch(watch::WatchArgs),

    /// Settings management
    Config(config::ConfigArgs),

    /// Generate shell completions
    Completions(completions::CompletionsArgs),
}

/// Resolved settings shared by all commands
#[derive(Debug, Clone)]
pub struct Context {
    /// Effective settings
    pub settings: AppSettings,
    /// Settings file they were loaded from, if any
    pub settings_path: Option<PathBuf>,
}

impl Context {
    /// Build a context, applying the `--store` override
    pub fn new(
        mut settings: AppSettings,
        settings_path: Option<PathBuf>,
        store_override: Option<PathBuf>,
    ) -> Self {
        if let Some(path) = store_override {
            settings.store.path = path;
        }
        Self {
            settings,
            settings_path,
        }
    }

    /// Open the routing config store
    pub fn store(&self) -> JsonFileStore {
        JsonFileStore::open(&self.settings.store.path)
    }

    /// Read the stored routing config
    pub fn routing_config(&self) -> Result<RoutingConfig> {
        let store = self.store();
        store
            .get()
            .with_context(|| format!("Failed to read routing config from {}", store.location()))
    }
}

/// Execute a command
pub fn execute(command: Command, ctx: &Context) -> Result<()> {
    match command {
        Command::Site(args) => site::execute(args, ctx),
        Command::Proxy(args) => proxy::execute(args, ctx),
        Command::Pac(args) => pac::execute(args, ctx),
        Command::Apply(args) => apply::execute(args, ctx),
        Command::Status(args) => status::execute(args, ctx),
        Command::Watch(args) => watch::execute(args, ctx),
        Command::Config(args) => config::execute(args, ctx),
        Command::Completions(args) => completions::execute(args),
    }
}
