//! Errors for loading configuration and data files.
//!
//! Formatting never fails; only the edges that touch the filesystem do.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum DisplayError {
    #[error("read {path} failed: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid yaml: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("invalid config: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, DisplayError>;
