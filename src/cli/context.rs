//! Command execution context
//!
//! Loads config, builds the console client and wires the reference registry
//! so command handlers only deal with their own logic.

use std::sync::Arc;

use log::debug;

use crate::cache::CachedConsoleClient;
use crate::cli::{GlobalOptions, OutputFormat};
use crate::client::{ConsoleApi, ConsoleClient};
use crate::config::Config;
use crate::error::{ConfigError, Result};
use crate::reference::{
    BatchSettings, BatchedReferenceFetcher, GrantContext, LogReporter, ReferenceRegistry,
    ReferenceResource, StoreContext,
};

/// Context for command execution containing config, clients, and runtime options.
pub struct CommandContext {
    /// Loaded config with flag overrides applied
    pub config: Config,
    /// Raw client, used by the reference stores so forced loads always hit the API
    pub client: Arc<ConsoleClient>,
    /// Response-caching client used for id resolution (disabled by `--no-cache`)
    pub cached: Arc<CachedConsoleClient<ConsoleClient>>,
    pub registry: ReferenceRegistry,
    pub format: OutputFormat,
}

impl CommandContext {
    /// Build the context from config file and global flags.
    ///
    /// # Errors
    /// Returns error if config cannot be loaded or host/token are missing.
    pub async fn new(opts: &GlobalOptions) -> Result<Self> {
        let mut config = Config::load_at(opts.config_ref())?;
        opts.apply_to(&mut config);
        config.validate_auth()?;

        let host = config.api_host.clone().ok_or(ConfigError::MissingApiHost)?;
        let token = config
            .api_token
            .clone()
            .ok_or(ConfigError::MissingApiToken)?;

        let client = Arc::new(ConsoleClient::new(host, token)?);
        client.set_workspace(config.workspace_id.clone()).await;

        let cached = Arc::new(CachedConsoleClient::from_arc(
            client.clone(),
            !opts.no_cache,
            config.reference.response_ttl(),
        ));
        cached.set_context_key(config.workspace_id.clone()).await;

        let grant = Arc::new(GrantContext::new(
            config.scope,
            config.workspace_id.clone(),
        ));
        let api: Arc<dyn ConsoleApi> = client.clone();
        let store_ctx = StoreContext::new(api, grant, Arc::new(LogReporter));
        let registry = ReferenceRegistry::new(store_ctx, config.reference.ttl());

        debug!(
            "Context ready: scope={} workspace={:?} cache={}",
            config.scope,
            config.workspace_id,
            cached.is_enabled()
        );

        let format = opts.output_format(&config);
        Ok(Self {
            config,
            client,
            cached,
            registry,
            format,
        })
    }

    /// Batched fetcher for `R`, going through the response cache
    pub fn fetcher<R: ReferenceResource>(&self) -> BatchedReferenceFetcher<R> {
        let api: Arc<dyn ConsoleApi> = self.cached.clone();
        BatchedReferenceFetcher::new(
            api,
            self.registry.context().reporter.clone(),
            BatchSettings::from(&self.config.reference),
        )
    }
}
