//! Configuration management for Arbor.
//!
//! Parses `arbor.toml` with serde. When no path is given the file is looked
//! up in the current directory and its parents; without a file the defaults
//! apply. [`CliSettings`] are layered on top after loading.
//!
//! ## Environment Variable Expansion
//!
//! - `${VAR}` - expands to the value of VAR, errors if unset
//! - `${VAR:-default}` - expands to VAR if set, otherwise uses default
//!
//! Expanded fields:
//! - `server.host`
//! - `backend.api_host`

mod expand;

use std::path::{Path, PathBuf};

use serde::Deserialize;

/// Configuration filename to search for.
const CONFIG_FILENAME: &str = "arbor.toml";

/// Upper bound for `backend.navigation_depth`.
const MAX_NAVIGATION_DEPTH: u32 = 10;

/// CLI settings that override configuration file values.
///
/// Only `Some` fields override the loaded config.
#[derive(Debug, Default)]
pub struct CliSettings {
    /// Override server host.
    pub host: Option<String>,
    /// Override server port.
    pub port: Option<u16>,
    /// Override backend API host.
    pub api_host: Option<String>,
    /// Override navigation expansion depth.
    pub navigation_depth: Option<u32>,
}

/// Application configuration.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    /// HTTP server settings.
    pub server: ServerConfig,
    /// Content backend settings.
    pub backend: BackendConfig,
    /// Content resolution settings.
    pub view: ViewConfig,
    /// Path to the config file (set after loading).
    #[serde(skip)]
    pub config_path: Option<PathBuf>,
}

/// Server configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Server host address.
    pub host: String,
    /// Server port.
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_owned(),
            port: 7979,
        }
    }
}

/// Content backend configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct BackendConfig {
    /// Backend site root. Resource identifiers returned by the backend start
    /// with this prefix.
    pub api_host: String,
    /// Per-request timeout in seconds.
    pub timeout_secs: u64,
    /// Server-side expansion depth for `@navigation`.
    pub navigation_depth: u32,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            api_host: "http://localhost:8080/Plone".to_owned(),
            timeout_secs: 30,
            navigation_depth: 2,
        }
    }
}

/// Content resolution configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct ViewConfig {
    /// Maximum number of default-child redirects followed from one
    /// user navigation.
    pub max_redirects: usize,
}

impl Default for ViewConfig {
    fn default() -> Self {
        Self { max_redirects: 10 }
    }
}

/// Configuration error.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// File not found.
    #[error("Configuration file not found: {}", .0.display())]
    NotFound(PathBuf),
    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// TOML parsing error.
    #[error("TOML parse error: {0}")]
    Parse(#[from] toml::de::Error),
    /// Validation error.
    #[error("Configuration error: {0}")]
    Validation(String),
    /// Environment variable error during expansion.
    #[error("Environment variable error in {field}: {message}")]
    EnvVar {
        /// Config field path (e.g., "`backend.api_host`").
        field: String,
        /// Error message (e.g., "${`PLONE_URL`} not set").
        message: String,
    },
}

/// Require a string field to be non-empty.
fn require_non_empty(value: &str, field: &str) -> Result<(), ConfigError> {
    if value.is_empty() {
        return Err(ConfigError::Validation(format!("{field} cannot be empty")));
    }
    Ok(())
}

/// Require a URL field to use http:// or https:// scheme.
fn require_http_url(url: &str, field: &str) -> Result<(), ConfigError> {
    if !url.starts_with("http://") && !url.starts_with("https://") {
        return Err(ConfigError::Validation(format!(
            "{field} must start with http:// or https://"
        )));
    }
    Ok(())
}

impl Config {
    /// Load configuration from file with optional CLI settings.
    ///
    /// If `config_path` is provided, loads from that file. Otherwise searches
    /// for `arbor.toml` in the current directory and its parents, falling
    /// back to defaults. CLI settings are applied last and the result is
    /// validated again.
    ///
    /// # Errors
    ///
    /// Returns error if an explicit `config_path` doesn't exist, parsing or
    /// expansion fails, or the merged configuration is invalid.
    pub fn load(
        config_path: Option<&Path>,
        cli_settings: Option<&CliSettings>,
    ) -> Result<Self, ConfigError> {
        let mut config = if let Some(path) = config_path {
            if !path.exists() {
                return Err(ConfigError::NotFound(path.to_path_buf()));
            }
            Self::load_from_file(path)?
        } else if let Some(discovered) = Self::discover_config() {
            Self::load_from_file(&discovered)?
        } else {
            Self::default()
        };

        if let Some(settings) = cli_settings {
            config.apply_cli_settings(settings);
            config.validate()?;
        }

        Ok(config)
    }

    /// Apply CLI settings to the configuration.
    fn apply_cli_settings(&mut self, settings: &CliSettings) {
        if let Some(host) = &settings.host {
            self.server.host.clone_from(host);
        }
        if let Some(port) = settings.port {
            self.server.port = port;
        }
        if let Some(api_host) = &settings.api_host {
            self.backend.api_host.clone_from(api_host);
        }
        if let Some(depth) = settings.navigation_depth {
            self.backend.navigation_depth = depth;
        }
    }

    /// Backend API host without a trailing slash.
    #[must_use]
    pub fn api_host(&self) -> &str {
        self.backend.api_host.trim_end_matches('/')
    }

    /// Search for config file in current directory and parents.
    fn discover_config() -> Option<PathBuf> {
        let mut current = std::env::current_dir().ok()?;
        loop {
            let candidate = current.join(CONFIG_FILENAME);
            if candidate.exists() {
                return Some(candidate);
            }
            if !current.pop() {
                return None;
            }
        }
    }

    /// Load configuration from a specific file.
    fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let mut config: Self = toml::from_str(&content)?;

        config.expand_env_vars()?;
        config.config_path = Some(path.to_path_buf());
        config.validate()?;

        Ok(config)
    }

    /// Validate configuration values.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Validation` if any validation fails.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.validate_server()?;
        self.validate_backend()?;
        self.validate_view()?;
        Ok(())
    }

    fn validate_server(&self) -> Result<(), ConfigError> {
        require_non_empty(&self.server.host, "server.host")?;

        if self.server.port == 0 {
            return Err(ConfigError::Validation(
                "server.port cannot be 0".to_owned(),
            ));
        }

        Ok(())
    }

    fn validate_backend(&self) -> Result<(), ConfigError> {
        require_non_empty(&self.backend.api_host, "backend.api_host")?;
        require_http_url(&self.backend.api_host, "backend.api_host")?;

        if self.backend.timeout_secs == 0 {
            return Err(ConfigError::Validation(
                "backend.timeout_secs must be greater than 0".to_owned(),
            ));
        }

        let depth = self.backend.navigation_depth;
        if depth == 0 || depth > MAX_NAVIGATION_DEPTH {
            return Err(ConfigError::Validation(format!(
                "backend.navigation_depth must be between 1 and {MAX_NAVIGATION_DEPTH}"
            )));
        }

        Ok(())
    }

    fn validate_view(&self) -> Result<(), ConfigError> {
        if self.view.max_redirects == 0 {
            return Err(ConfigError::Validation(
                "view.max_redirects must be at least 1".to_owned(),
            ));
        }
        Ok(())
    }

    /// Expand environment variable references in configuration strings.
    fn expand_env_vars(&mut self) -> Result<(), ConfigError> {
        expand::expand_in_place(&mut self.server.host, "server.host")?;
        expand::expand_in_place(&mut self.backend.api_host, "backend.api_host")?;
        Ok(())
    }
}
