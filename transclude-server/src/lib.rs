//! HTTP front end: serves pages and rewrites every HTML response through
//! [`transclude_engine::Engine`].

mod error;
pub mod middleware;
pub mod router;
mod runtime;

pub use error::ServerError;
pub use middleware::transclude_middleware;
pub use router::{build_router, AppState};
pub use runtime::{run, start_blocking, LOG_FORMAT_ENV};
