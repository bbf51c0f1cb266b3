//! Command-line argument parsing

use crate::commands::Command;
use clap::{Parser, ValueEnum};
use std::path::PathBuf;

/// Proxifier - per-domain proxy routing
///
/// Keeps a list of registered domains and routes only those domains (and
/// all their subdomains) through a SOCKS5 or HTTP proxy, by compiling the
/// list into a proxy auto-config script.
#[derive(Parser, Debug)]
#[command(name = "proxifier")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Args {
    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Command,

    /// Settings file (default: ./proxifier.toml, then the user config dir)
    #[arg(short = 'c', long, global = true, value_name = "FILE", env = "PROXIFIER_SETTINGS")]
    pub settings: Option<PathBuf>,

    /// Routing config document, overriding `[store] path`
    #[arg(long, global = true, value_name = "FILE", env = "PROXIFIER_STORE")]
    pub store: Option<PathBuf>,

    /// Verbosity level (-v, -vv, -vvv)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Output format for logs
    #[arg(long, global = true, value_enum)]
    pub log_format: Option<LogFormat>,

    /// Log file path
    #[arg(long, global = true, value_name = "FILE")]
    pub log_file: Option<PathBuf>,

    /// Run in quiet mode (errors only)
    #[arg(short, long, global = true)]
    pub quiet: bool,
}

/// Log output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogFormat {
    /// Human-readable text
    Text,
    /// JSON format
    Json,
    /// Compact format
    Compact,
}
