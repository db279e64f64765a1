//! Shared newtypes for the transclusion engine.
//!
//! All path fields use `PathBuf`; never `&str` or `String` for filesystem paths.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Render data handed to the template renderer: field name → JSON value.
pub type DataMap = Map<String, Value>;

// ---------------------------------------------------------------------------
// Newtypes
// ---------------------------------------------------------------------------

/// Delivery channel a request is rendered for (e.g. `desktop`, `mobile`).
///
/// Always stored lower-cased.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Channel(pub String);

impl Channel {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Channel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl From<String> for Channel {
    fn from(s: String) -> Self {
        Self(s.to_lowercase())
    }
}

impl From<&str> for Channel {
    fn from(s: &str) -> Self {
        Self(s.to_lowercase())
    }
}

/// Request path with leading and trailing slashes trimmed (`/a/b/` → `a/b`).
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PagePath(pub String);

impl PagePath {
    /// Normalise a raw URI path.
    pub fn from_uri_path(path: &str) -> Self {
        Self(path.trim_matches('/').to_owned())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_root(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for PagePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl From<&str> for PagePath {
    fn from(s: &str) -> Self {
        Self::from_uri_path(s)
    }
}

/// Canonical registry key of a directive: `templateRef|dataRef`, whitespace
/// and brace syntax stripped, recognised flags removed.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct DirectiveKey(pub String);

impl DirectiveKey {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DirectiveKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl From<String> for DirectiveKey {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for DirectiveKey {
    fn from(s: &str) -> Self {
        Self(s.to_owned())
    }
}
