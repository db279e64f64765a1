//! # transclude-engine
//!
//! Partial transclusion for rendered HTML bodies.
//!
//! A body carrying `{{> templateRef|dataRef|FLAG}}` directives is rewritten in
//! four passes over a per-request [`PartialRegistry`]:
//!
//! 1. [`loader`] registers one entry per distinct directive key.
//! 2. [`composer`] inlines nested partials, refusing cycles.
//! 3. [`compiler`] renders each entry against its data merged with the
//!    request's static data.
//! 4. [`substitute`] splices the rendered entries back into the body.
//!
//! [`Engine::process`] runs all of them for one request.

pub mod compiler;
pub mod composer;
pub mod error;
pub mod inspect;
pub mod loader;
pub mod mapper;
pub mod pipeline;
pub mod registry;
pub mod request;
pub mod resolver;
pub mod scanner;
pub mod static_data;
pub mod substitute;

pub use error::EngineError;
pub use inspect::{DirectiveReport, DirectiveStatus};
pub use pipeline::{Engine, RenderSession};
pub use registry::{PartialEntry, PartialRegistry};
pub use request::RequestScope;
pub use resolver::{PathResolver, ResolvedPath, TemplateLookup};
pub use scanner::{Directive, FlagSet};
