//! Error types for transclude-renderer.

use thiserror::Error;

/// All errors that can arise from rendering a partial.
#[derive(Debug, Error)]
pub enum RenderError {
    /// Tera template engine error.
    #[error("template engine error: {0}")]
    Tera(#[from] tera::Error),

    /// Set-delimiter tags (`{{=<% %>=}}`) are not supported.
    #[error("unsupported template tag '{tag}'")]
    UnsupportedTag { tag: String },

    /// A section still open at a mismatched close tag or at end of template.
    #[error("section '{name}' is never closed")]
    UnclosedSection { name: String },

    /// A close tag with no open section.
    #[error("closing tag for '{name}' has no open section")]
    UnopenedSection { name: String },
}
