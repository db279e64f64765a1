//! Shared engine and per-request render session.
//!
//! ```text
//! mapper swap → load → compose → compile → substitute
//! ```
//!
//! [`Engine`] is immutable and shared across requests. Every request gets its
//! own [`RenderSession`] holding the registry and static data context, so
//! concurrent requests never observe each other's partials.

use std::borrow::Cow;
use std::sync::Arc;
use std::time::Instant;

use regex::Regex;

use transclude_core::{
    Channel, ChannelDefaults, DataMap, EngineConfig, NoStaticData, PagePath, StaticDataProvider,
};
use transclude_renderer::{Render, TeraRenderer};

use crate::composer::compose;
use crate::compiler::compile;
use crate::error::EngineError;
use crate::loader::load_partials;
use crate::mapper::swap_mappers;
use crate::registry::PartialRegistry;
use crate::request::{is_excluded, RequestScope};
use crate::resolver::PathResolver;
use crate::scanner::FlagSet;
use crate::static_data::build_static_data;
use crate::substitute::substitute;

/// Configured transclusion engine.
pub struct Engine {
    config: EngineConfig,
    resolver: PathResolver,
    flags: FlagSet,
    exclude: Option<Regex>,
    renderer: Arc<dyn Render>,
    provider: Arc<dyn StaticDataProvider>,
}

impl Engine {
    /// Build an engine with the tera renderer and, when `defaults_file` is
    /// set, file-backed channel defaults.
    pub fn new(config: EngineConfig) -> Result<Self, EngineError> {
        let provider: Arc<dyn StaticDataProvider> = match config.defaults_file.as_deref() {
            Some(path) => Arc::new(ChannelDefaults::load_at(path)?),
            None => Arc::new(NoStaticData),
        };
        let renderer = Arc::new(TeraRenderer::new(config.autoescape));
        Engine::with_parts(config, renderer, provider)
    }

    /// Build an engine around caller-supplied collaborators.
    pub fn with_parts(
        config: EngineConfig,
        renderer: Arc<dyn Render>,
        provider: Arc<dyn StaticDataProvider>,
    ) -> Result<Self, EngineError> {
        config.validate()?;
        let exclude = config.exclude_regex()?;
        Ok(Engine {
            resolver: PathResolver::from_config(&config),
            flags: FlagSet::new(config.exclude_flags.iter().cloned()),
            exclude,
            renderer,
            provider,
            config,
        })
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn resolver(&self) -> &PathResolver {
        &self.resolver
    }

    pub fn flags(&self) -> &FlagSet {
        &self.flags
    }

    /// `true` when a request URL should bypass the engine.
    pub fn is_excluded(&self, url: &str) -> bool {
        is_excluded(url, self.exclude.as_ref())
    }

    /// Request scope for a URI path and raw query string.
    pub fn scope_for(&self, path: &str, query: Option<&str>) -> RequestScope {
        RequestScope::from_uri(path, query, &self.config)
    }

    /// Fresh session: empty registry, static data resolved for `scope`.
    pub fn session(&self, scope: &RequestScope) -> RenderSession {
        let static_data = build_static_data(
            self.provider.as_ref(),
            &self.config,
            &scope.channel,
            &scope.page_path,
        );
        RenderSession::new(scope.channel.clone(), scope.page_path.clone(), static_data)
    }

    /// Render a complete body, or fail without producing any output.
    pub fn process(&self, body: &str, scope: &RequestScope) -> Result<String, EngineError> {
        let started = Instant::now();
        let body = match scope.mappers() {
            Some((old, new)) => swap_mappers(body, old, new),
            None => Cow::Borrowed(body),
        };

        let mut session = self.session(scope);
        let result = session.run(self, &body);
        match &result {
            Ok(out) => tracing::info!(
                "rendered '{}' for channel '{}': {} partials, {} bytes in {}ms",
                scope.page_path,
                scope.channel,
                session.registry.len(),
                out.len(),
                started.elapsed().as_millis()
            ),
            Err(err) => tracing::warn!(
                "render failed for '{}' on channel '{}': {}",
                scope.page_path,
                scope.channel,
                err
            ),
        }
        result
    }
}

/// Request-scoped state threaded through every stage.
#[derive(Debug, Clone)]
pub struct RenderSession {
    pub channel: Channel,
    pub page_path: PagePath,
    pub static_data: DataMap,
    pub registry: PartialRegistry,
}

impl RenderSession {
    pub fn new(channel: Channel, page_path: PagePath, static_data: DataMap) -> Self {
        RenderSession {
            channel,
            page_path,
            static_data,
            registry: PartialRegistry::new(),
        }
    }

    /// Load pass over `body`.
    pub fn load(&mut self, engine: &Engine, body: &str) -> Result<usize, EngineError> {
        load_partials(
            body,
            &engine.resolver,
            &engine.flags,
            &self.channel,
            &mut self.registry,
        )
    }

    /// Expand nested partials in every entry.
    pub fn compose(&mut self, engine: &Engine) -> Result<(), EngineError> {
        compose(
            &mut self.registry,
            &engine.resolver,
            &engine.flags,
            &self.channel,
            engine.config.max_depth,
        )
    }

    /// Render every entry against merged data.
    pub fn compile(&mut self, engine: &Engine) -> Result<(), EngineError> {
        compile(&mut self.registry, &self.static_data, engine.renderer.as_ref())
    }

    /// Rewrite `body` with the compiled entries.
    pub fn substitute(&self, engine: &Engine, body: &str) -> Result<String, EngineError> {
        substitute(body, &self.registry, &engine.flags)
    }

    /// All four stages in order.
    pub fn run(&mut self, engine: &Engine, body: &str) -> Result<String, EngineError> {
        let loaded = self.load(engine, body)?;
        tracing::debug!("load pass registered {} partials", loaded);
        self.compose(engine)?;
        self.compile(engine)?;
        self.substitute(engine, body)
    }

    /// Drop every registered partial, keeping channel and static data.
    pub fn reset(&mut self) {
        self.registry.reset();
    }
}
