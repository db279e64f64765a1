//! [`Render`] seam and the tera-backed [`TeraRenderer`].

use tera::Tera;

use transclude_core::DataMap;

use crate::context::slot_context;
use crate::dialect;
use crate::error::RenderError;

/// A pure `(template, data) -> string` renderer.
///
/// The engine never evaluates expressions itself; every partial goes through
/// an implementation of this trait.
pub trait Render: Send + Sync {
    fn render(&self, template: &str, data: &DataMap) -> Result<String, RenderError>;
}

/// Renders the brace notation by binding it to the data and handing the
/// resulting slot template to tera, which applies autoescape.
///
/// Stateless: each call compiles a one-off template, so one instance can be
/// shared across threads.
#[derive(Debug, Clone, Copy)]
pub struct TeraRenderer {
    autoescape: bool,
}

impl TeraRenderer {
    pub fn new(autoescape: bool) -> Self {
        TeraRenderer { autoescape }
    }
}

impl Default for TeraRenderer {
    fn default() -> Self {
        TeraRenderer::new(true)
    }
}

impl Render for TeraRenderer {
    fn render(&self, template: &str, data: &DataMap) -> Result<String, RenderError> {
        if !template.contains("{{") {
            return Ok(template.to_string());
        }
        let translation = dialect::translate(template, data)?;
        if translation.slots.is_empty() {
            return Ok(translation.source);
        }
        let ctx = slot_context(&translation.slots);
        Ok(Tera::one_off(&translation.source, &ctx, self.autoescape)?)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
