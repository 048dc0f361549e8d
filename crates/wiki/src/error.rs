//! Errors surfaced by the `wiki` binary.

use std::path::PathBuf;

use wiki_config::ConfigError;
use wiki_markdown::RenderError;

/// Failure of a subcommand, printed before exiting with status 1.
#[derive(Debug, thiserror::Error)]
pub(crate) enum CliError {
    #[error("{0}")]
    Config(#[from] ConfigError),

    #[error("Failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("{0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Render(#[from] RenderError),

    #[error("JSON serialization failed: {0}")]
    Json(#[from] serde_json::Error),
}
