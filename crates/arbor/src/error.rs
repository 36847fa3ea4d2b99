//! CLI error types.

use arbor_client::PathError;
use arbor_config::ConfigError;

/// CLI error type.
#[derive(Debug, thiserror::Error)]
pub(crate) enum CliError {
    #[error("{0}")]
    Config(#[from] ConfigError),

    #[error("{0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Path(#[from] PathError),

    #[error("{0}")]
    Server(String),

    #[error("{0}")]
    Content(String),
}
