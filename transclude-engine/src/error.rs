//! Error types for transclude-engine.

use std::path::PathBuf;

use thiserror::Error;

use transclude_core::ConfigError;
use transclude_renderer::RenderError;

/// Every failure that aborts a render session.
///
/// None are retried; the first one raised ends the request.
#[derive(Debug, Error)]
pub enum EngineError {
    /// Template file absent under every root of the override chain.
    #[error("Partial file not found: {path}")]
    PartialNotFound { path: String },

    /// Companion data file absent from the data directory.
    #[error("Data file not found: {path}")]
    DataFileNotFound { path: PathBuf },

    /// Companion data file is not valid JSON.
    #[error("failed to parse data file {path}: {source}")]
    DataParse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// Companion data file parsed, but is not a JSON object.
    #[error("data file {path} must contain a JSON object")]
    DataNotObject { path: PathBuf },

    /// A directive in the body has no registry entry.
    #[error("directive '{key}' was never registered")]
    UnregisteredDirective { key: String },

    /// Nested partials reference each other, or nest past the depth bound.
    #[error("partial cycle detected: {}", chain.join(" -> "))]
    CycleDetected { chain: Vec<String> },

    /// A directive with no template reference.
    #[error("malformed directive '{directive}'")]
    MalformedDirective { directive: String },

    /// A file exists but could not be read.
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The renderer rejected a composed partial.
    #[error("render error: {0}")]
    Render(#[from] RenderError),

    /// Engine construction failed on configuration.
    #[error("config error: {0}")]
    Config(#[from] ConfigError),
}

/// Convenience constructor for [`EngineError::Io`].
pub(crate) fn io_err(path: impl Into<PathBuf>, source: std::io::Error) -> EngineError {
    EngineError::Io {
        path: path.into(),
        source,
    }
}
