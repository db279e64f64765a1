//! [`ServerError`], the startup and listener failure type.

use std::net::SocketAddr;
use std::path::PathBuf;

use thiserror::Error;

/// Error surface for server startup and the listener loop.
///
/// Per-request engine failures never reach this type; the middleware turns
/// them into 500 responses.
#[derive(Debug, Error)]
pub enum ServerError {
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to bind {addr}: {source}")]
    Bind {
        addr: SocketAddr,
        #[source]
        source: std::io::Error,
    },

    #[error("engine error: {0}")]
    Engine(#[from] transclude_engine::EngineError),
}

pub(crate) fn io_err(path: impl Into<PathBuf>, source: std::io::Error) -> ServerError {
    ServerError::Io {
        path: path.into(),
        source,
    }
}
