//! Listener startup, graceful shutdown and tracing subscriber setup.

use std::net::SocketAddr;

use tokio::net::TcpListener;

use transclude_core::EngineConfig;
use transclude_engine::Engine;

use crate::error::{io_err, ServerError};
use crate::router::{build_router, AppState};

/// Env var selecting JSON log lines instead of the human format.
pub const LOG_FORMAT_ENV: &str = "TRANSCLUDE_LOG_FORMAT";

/// Start the server and block the current thread until it exits.
pub fn start_blocking(config: EngineConfig, addr: SocketAddr) -> Result<(), ServerError> {
    init_tracing();
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .map_err(|e| io_err("tokio-runtime", e))?;
    runtime.block_on(run(config, addr))
}

/// Serve pages from `config` on `addr` until ctrl-c.
pub async fn run(config: EngineConfig, addr: SocketAddr) -> Result<(), ServerError> {
    let engine = Engine::new(config)?;
    tracing::info!(
        roots = ?engine.resolver().roots(),
        data_dir = %engine.resolver().data_dir().display(),
        "engine ready"
    );
    let app = build_router(AppState::new(engine));

    let listener = TcpListener::bind(addr)
        .await
        .map_err(|source| ServerError::Bind { addr, source })?;
    tracing::info!(%addr, "listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| io_err(addr.to_string(), e))
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %err, "ctrl-c handler failed");
        return;
    }
    tracing::info!("received ctrl-c, shutting down server");
}

fn init_tracing() {
    use tracing_subscriber::{fmt, EnvFilter};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let json = std::env::var(LOG_FORMAT_ENV).is_ok_and(|v| v.eq_ignore_ascii_case("json"));
    let _ = if json {
        fmt().json().with_env_filter(filter).try_init()
    } else {
        fmt().with_env_filter(filter).with_target(false).try_init()
    };
}
