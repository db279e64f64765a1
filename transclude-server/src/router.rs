//! Routes: HTML pages from `pages_dir`, static files for paths with a `.`,
//! all behind the transclusion middleware.

use std::io::ErrorKind;
use std::path::Path;
use std::sync::Arc;

use axum::extract::{Request, State};
use axum::http::StatusCode;
use axum::middleware;
use axum::response::{Html, IntoResponse, Response};
use axum::routing::get;
use axum::Router;
use tower::ServiceBuilder;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use transclude_core::PagePath;
use transclude_engine::Engine;

use crate::middleware::transclude_middleware;

const INDEX_PAGE: &str = "index";

/// Shared across every request; the engine holds no per-request state.
#[derive(Clone)]
pub struct AppState {
    pub engine: Arc<Engine>,
}

impl AppState {
    pub fn new(engine: Engine) -> Self {
        AppState {
            engine: Arc::new(engine),
        }
    }
}

/// Page routes behind the transclusion middleware.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(page))
        .route("/*path", get(page))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(middleware::from_fn_with_state(
                    state.clone(),
                    transclude_middleware,
                )),
        )
        .with_state(state)
}

/// `/a/b` → `<pages>/a/b<ext>`, `/` → `<pages>/index<ext>`. Paths with a `.`
/// are static files.
async fn page(State(state): State<AppState>, request: Request) -> Response {
    let config = state.engine.config();
    let Some(root) = config.pages_root().map(Path::to_path_buf) else {
        return StatusCode::NOT_FOUND.into_response();
    };

    let uri_path = request.uri().path().to_string();
    if uri_path.contains('.') {
        let mut assets = ServeDir::new(&root);
        return match assets.try_call(request).await {
            Ok(response) => response.into_response(),
            Err(err) => {
                tracing::error!(path = %uri_path, error = %err, "static file failed");
                StatusCode::INTERNAL_SERVER_ERROR.into_response()
            }
        };
    }

    let page_path = PagePath::from_uri_path(&uri_path);
    let name = if page_path.is_root() {
        INDEX_PAGE
    } else {
        page_path.as_str()
    };
    let file = root.join(format!("{name}{}", config.template_ext));
    match tokio::fs::read_to_string(&file).await {
        Ok(content) => Html(content).into_response(),
        Err(err) if err.kind() == ErrorKind::NotFound => {
            tracing::debug!(path = %file.display(), "no page");
            StatusCode::NOT_FOUND.into_response()
        }
        Err(err) => {
            tracing::error!(path = %file.display(), error = %err, "failed to read page");
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}
