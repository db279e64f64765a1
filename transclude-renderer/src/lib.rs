//! # transclude-renderer
//!
//! Template-expression renderer used to compile composed partials.
//!
//! ## Usage
//!
//! ```rust
//! use transclude_core::DataMap;
//! use transclude_renderer::{Render, TeraRenderer};
//!
//! let mut data = DataMap::new();
//! data.insert("name".to_string(), serde_json::json!("world"));
//! let out = TeraRenderer::default().render("hello {{name}}", &data).unwrap();
//! assert_eq!(out, "hello world");
//! ```

pub mod context;
pub mod dialect;
pub mod engine;
pub mod error;

pub use engine::{Render, TeraRenderer};
pub use error::RenderError;
