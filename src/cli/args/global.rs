//! Global CLI options

use crate::cli::{Cli, OutputFormat};
use crate::config::Config;
use crate::reference::GrantScope;

/// Global CLI options passed to all command handlers.
///
/// Precedence is: CLI flag > environment variable > config file > default.
/// This struct captures the CLI/env layer; [`GlobalOptions::apply_to`] layers
/// it over a loaded config.
#[derive(Debug, Clone, Default)]
pub struct GlobalOptions {
    pub format: Option<OutputFormat>,
    /// Custom config file path (defaults to ~/.refstore/config.yaml)
    pub config: Option<String>,
    pub api_host: Option<String>,
    pub workspace: Option<String>,
    pub scope: Option<GrantScope>,
    /// Bypass the response cache
    pub no_cache: bool,
}

impl GlobalOptions {
    /// Called once in main.rs after parsing
    pub fn from_cli(cli: &Cli) -> Self {
        Self {
            format: cli.format,
            config: cli.config.clone(),
            api_host: cli.api_host.clone(),
            workspace: cli.workspace.clone(),
            scope: cli.scope,
            no_cache: cli.no_cache,
        }
    }

    pub fn config_ref(&self) -> Option<&str> {
        self.config.as_deref()
    }

    /// Override config values with the flags that were given
    pub fn apply_to(&self, config: &mut Config) {
        if let Some(ref host) = self.api_host {
            config.api_host = Some(host.clone());
        }
        if let Some(ref workspace) = self.workspace {
            config.workspace_id = Some(workspace.clone());
        }
        if let Some(scope) = self.scope {
            config.scope = scope;
        }
    }

    /// Flag, then config preference, then table
    pub fn output_format(&self, config: &Config) -> OutputFormat {
        self.format
            .or_else(|| {
                config
                    .preferences
                    .format
                    .as_deref()
                    .and_then(|f| f.parse().ok())
            })
            .unwrap_or_default()
    }
}
