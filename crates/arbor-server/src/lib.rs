//! HTTP server for Arbor.
//!
//! Serves the content tree as server-rendered HTML pages. Each request runs
//! its own [`arbor_view::Session`]: navigation, breadcrumbs and content are
//! fetched concurrently, folders are redirected to their default child with
//! `303 See Other`, and the composed page is returned.
//!
//! # Quick Start
//!
//! ```ignore
//! use arbor_server::{ServerConfig, run_server};
//!
//! #[tokio::main]
//! async fn main() {
//!     let config = ServerConfig {
//!         api_host: "http://localhost:8080/Plone".to_owned(),
//!         ..ServerConfig::default()
//!     };
//!
//!     run_server(config).await.unwrap();
//! }
//! ```
//!
//! # Architecture
//!
//! ```text
//! Browser ──HTTP──► axum server (arbor-server)
//!                        │
//!                        └─► Session per request (arbor-view)
//!                                │
//!                                ├─► navigation  ─┐
//!                                ├─► breadcrumbs ─┼─► ContentClient ──HTTP──► CMS
//!                                └─► content     ─┘
//! ```

mod app;
mod error;
mod handlers;
mod middleware;
mod state;

use std::net::SocketAddr;
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

use arbor_client::{Backend, ContentClient};
use state::AppState;

pub use error::ServerError;

/// Server configuration.
#[derive(Clone, Debug)]
pub struct ServerConfig {
    /// Host address to bind to.
    pub host: String,
    /// Port to listen on.
    pub port: u16,
    /// Backend API host.
    pub api_host: String,
    /// Backend request timeout.
    pub timeout: Duration,
    /// `@navigation` expansion depth.
    pub navigation_depth: u32,
    /// Default-child redirects followed per request.
    pub max_redirects: usize,
    /// Application version (for cache invalidation).
    pub version: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_owned(),
            port: 7979,
            api_host: "http://localhost:8080/Plone".to_owned(),
            timeout: Duration::from_secs(30),
            navigation_depth: 2,
            max_redirects: 10,
            version: String::new(),
        }
    }
}

/// Run the server.
///
/// # Arguments
///
/// * `config` - Server configuration
///
/// # Errors
///
/// Returns an error if the server fails to start.
pub async fn run_server(config: ServerConfig) -> Result<(), Box<dyn std::error::Error>> {
    let backend: Arc<dyn Backend> = Arc::new(ContentClient::with_settings(
        &config.api_host,
        config.timeout,
        config.navigation_depth,
    ));

    let state = Arc::new(AppState {
        backend,
        max_redirects: config.max_redirects,
        version: config.version.clone(),
    });

    let app = app::create_router(state);

    let addr = SocketAddr::from_str(&format!("{}:{}", config.host, config.port))?;
    tracing::info!(address = %addr, api_host = %config.api_host, "Starting server");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

/// Wait for shutdown signal (Ctrl-C).
async fn shutdown_signal() {
    tokio::signal::ctrl_c()
        .await
        .expect("Failed to install Ctrl+C handler");
    tracing::info!("Shutdown signal received, stopping server...");
}

/// Create server configuration from Arbor config.
///
/// # Arguments
///
/// * `config` - Arbor configuration
/// * `version` - Application version
#[must_use]
pub fn server_config_from_arbor_config(config: &arbor_config::Config, version: String) -> ServerConfig {
    ServerConfig {
        host: config.server.host.clone(),
        port: config.server.port,
        api_host: config.api_host().to_owned(),
        timeout: Duration::from_secs(config.backend.timeout_secs),
        navigation_depth: config.backend.navigation_depth,
        max_redirects: config.view.max_redirects,
        version,
    }
}
