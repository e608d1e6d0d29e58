//! CLI command definitions and handlers

use clap::{Parser, Subcommand};

pub mod args;
pub mod context;
pub mod list;
pub mod resolve;
pub mod resources;
pub mod status;

pub use args::{GlobalOptions, OutputFormat};
pub use context::CommandContext;

use crate::reference::GrantScope;

/// refstore - inspect the reference data cache of a cloud console
#[derive(Parser, Debug)]
#[command(name = "refstore")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,

    /// Output format (table, json)
    #[arg(
        long,
        global = true,
        env = "REFSTORE_FORMAT",
        hide_env = true,
        hide_possible_values = true
    )]
    pub format: Option<OutputFormat>,

    /// Override config file location
    #[arg(long, global = true, env = "REFSTORE_CONFIG", hide_env = true)]
    pub config: Option<String>,

    /// Console API host (overrides config)
    #[arg(long, global = true, env = "REFSTORE_API_HOST", hide_env = true)]
    pub api_host: Option<String>,

    /// Workspace to act in (overrides config)
    #[arg(long, global = true, env = "REFSTORE_WORKSPACE", hide_env = true)]
    pub workspace: Option<String>,

    /// Grant scope: DOMAIN, WORKSPACE or USER (overrides config)
    #[arg(long, global = true, env = "REFSTORE_SCOPE", hide_env = true)]
    pub scope: Option<GrantScope>,

    /// Enable debug logging
    #[arg(long, global = true, env = "REFSTORE_DEBUG", hide_env = true)]
    pub debug: bool,

    /// Bypass the response cache
    #[arg(long, global = true, env = "REFSTORE_NO_CACHE", hide_env = true)]
    pub no_cache: bool,
}

/// Available CLI commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Show configuration status
    Status,

    /// List supported reference resource kinds
    Resources,

    /// Load a reference store and print its items
    List {
        /// Resource kind (e.g. project, user, escalation-policy)
        kind: String,

        /// Ignore the TTL and fetch fresh data
        #[arg(long)]
        force: bool,
    },

    /// Load every reference store and show their state
    Warm {
        /// Ignore the TTL and fetch fresh data
        #[arg(long)]
        force: bool,
    },

    /// Resolve ids to labels through the batched fetcher
    Resolve {
        /// Resource kind (e.g. project, user, escalation-policy)
        kind: String,

        /// Ids to resolve
        #[arg(required = true)]
        ids: Vec<String>,
    },

    /// Display version information
    Version,
}
