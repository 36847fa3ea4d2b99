//! CLI command implementations.

pub(crate) mod browse;
pub(crate) mod serve;
pub(crate) mod show;

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use arbor_client::{Backend, ContentClient};
use arbor_config::{CliSettings, Config};
use clap::Args;

use crate::error::CliError;

pub(crate) use browse::BrowseArgs;
pub(crate) use serve::ServeArgs;
pub(crate) use show::ShowArgs;

/// Backend options shared by every command.
#[derive(Args)]
pub(crate) struct BackendArgs {
    /// Path to configuration file (default: auto-discover arbor.toml).
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Backend API host (overrides config).
    #[arg(long, env = "ARBOR_API_HOST")]
    api_host: Option<String>,

    /// Navigation expansion depth (overrides config).
    #[arg(long)]
    navigation_depth: Option<u32>,
}

impl BackendArgs {
    /// Load configuration with these options and any server overrides applied.
    pub(crate) fn load_config(
        &self,
        host: Option<String>,
        port: Option<u16>,
    ) -> Result<Config, CliError> {
        let cli_settings = CliSettings {
            host,
            port,
            api_host: self.api_host.clone(),
            navigation_depth: self.navigation_depth,
        };
        Ok(Config::load(self.config.as_deref(), Some(&cli_settings))?)
    }
}

/// Content client for the configured backend.
pub(crate) fn backend(config: &Config) -> Arc<dyn Backend> {
    Arc::new(ContentClient::with_settings(
        config.api_host(),
        Duration::from_secs(config.backend.timeout_secs),
        config.backend.navigation_depth,
    ))
}
