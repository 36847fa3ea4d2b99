//! `arbor serve` command implementation.

use arbor_server::{run_server, server_config_from_arbor_config};
use clap::Args;

use super::BackendArgs;
use crate::error::CliError;
use crate::output::Output;

/// Arguments for the serve command.
#[derive(Args)]
pub(crate) struct ServeArgs {
    #[command(flatten)]
    backend: BackendArgs,

    /// Host to bind to (overrides config).
    #[arg(long)]
    host: Option<String>,

    /// Port to bind to (overrides config).
    #[arg(short, long)]
    port: Option<u16>,

    /// Enable verbose output (request and redirect logs).
    #[arg(short, long)]
    pub verbose: bool,
}

impl ServeArgs {
    /// Execute the serve command.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration fails or the server fails to start.
    pub(crate) async fn execute(self, version: &str) -> Result<(), CliError> {
        let output = Output::new();

        let config = self.backend.load_config(self.host, self.port)?;

        output.info(&format!(
            "Starting server on {}:{}",
            config.server.host, config.server.port
        ));
        output.info(&format!("Backend: {}", config.api_host()));
        output.info(&format!(
            "Navigation depth: {}, max redirects: {}",
            config.backend.navigation_depth, config.view.max_redirects
        ));

        let server_config = server_config_from_arbor_config(&config, version.to_owned());
        run_server(server_config)
            .await
            .map_err(|e| CliError::Server(e.to_string()))?;

        Ok(())
    }
}
