//! Composition root: builds the one client a command runs against.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use consentry_core::{ConsentClient, ConsentConfig, MemoryPlatform, TracingPlatform};

use crate::cli::args::GlobalArgs;

/// `--config` wins; otherwise the config comes from `CONSENTRY_*` variables.
pub fn resolve_config(global: &GlobalArgs) -> anyhow::Result<ConsentConfig> {
    match &global.config {
        Some(path) => ConsentConfig::load(path)
            .with_context(|| format!("failed to load config {}", path.display())),
        None => ConsentConfig::from_env()
            .context("no --config given and the CONSENTRY_* environment is incomplete"),
    }
}

pub struct Session {
    pub client: ConsentClient,
    platform: Option<Arc<MemoryPlatform>>,
    state: Option<PathBuf>,
}

impl Session {
    /// With `read_only`, an unreadable state file is logged and the command
    /// runs against empty state; the file is then left untouched.
    pub async fn open(global: &GlobalArgs, read_only: bool) -> anyhow::Result<Self> {
        let config = resolve_config(global)?;

        if global.offline {
            return Ok(Self {
                client: ConsentClient::unavailable(config),
                platform: None,
                state: None,
            });
        }

        let mut state = global.state.clone();
        let platform = match &global.state {
            Some(path) => match MemoryPlatform::load(path).await {
                Ok(platform) => platform,
                Err(e) if read_only => {
                    tracing::warn!(
                        path = %path.display(),
                        error = %format!("{e:#}"),
                        "ignoring unreadable platform state"
                    );
                    state = None;
                    MemoryPlatform::new()
                }
                Err(e) => return Err(e),
            },
            None => MemoryPlatform::new(),
        };
        let platform = Arc::new(platform);
        let client = ConsentClient::live(config, Arc::new(TracingPlatform::new(platform.clone())));

        Ok(Self {
            client,
            platform: Some(platform),
            state,
        })
    }

    /// Initialize, logging instead of failing. Reads degrade on their own.
    pub async fn start_tolerant(&self) {
        if let Err(e) = self.client.initialize().await {
            tracing::warn!(error = %e, "continuing without an initialized platform");
        }
    }

    /// Persist platform state when a state file was given.
    pub async fn close(self) -> anyhow::Result<()> {
        if let (Some(platform), Some(path)) = (&self.platform, &self.state) {
            platform.save(path).await?;
            tracing::debug!(path = %path.display(), "platform state saved");
        }
        Ok(())
    }
}
