//! Error types for transclude-core.

use std::path::PathBuf;

use thiserror::Error;

/// All errors that can arise from loading configuration or channel defaults.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Underlying I/O failure while reading a configuration file.
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// YAML parse error on load — includes file path and line context from serde_yaml.
    #[error("failed to parse {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    /// The configuration file did not exist at the expected path.
    #[error("configuration not found at {path}")]
    NotFound { path: PathBuf },

    /// `exclude` is not a valid regular expression.
    #[error("invalid exclude pattern '{pattern}': {source}")]
    InvalidExclude {
        pattern: String,
        #[source]
        source: regex::Error,
    },

    /// `root_dir` resolved to an empty list.
    #[error("configuration declares no template root directories")]
    NoRoots,
}

pub(crate) fn io_err(path: impl Into<PathBuf>, source: std::io::Error) -> ConfigError {
    ConfigError::Io {
        path: path.into(),
        source,
    }
}
