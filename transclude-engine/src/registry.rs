//! Partial registry — per-session map of directive key → partial entry.
//!
//! Entries move through three passes without being reconstructed:
//!
//! ```text
//! load     content = raw template text, data = companion JSON (or None)
//! compose  content = raw text with nested directives expanded
//! compile  content = rendered text, data = local data merged with static data
//! ```
//!
//! No pass removes an entry once it is registered.

use std::collections::BTreeMap;

use transclude_core::{DataMap, DirectiveKey};

use crate::resolver::ResolvedPath;

/// One resolved partial.
#[derive(Debug, Clone, PartialEq)]
pub struct PartialEntry {
    /// Template file the content came from; `None` for an unmatched placeholder.
    pub source: Option<ResolvedPath>,
    pub content: String,
    /// Companion data; `None` means no data file was referenced, which is
    /// distinct from an empty mapping.
    pub data: Option<DataMap>,
}

impl PartialEntry {
    pub fn new(source: Option<ResolvedPath>, content: impl Into<String>, data: Option<DataMap>) -> Self {
        PartialEntry {
            source,
            content: content.into(),
            data,
        }
    }
}

/// Keyed store of partial entries. Never shared between sessions.
#[derive(Debug, Clone, Default)]
pub struct PartialRegistry {
    entries: BTreeMap<DirectiveKey, PartialEntry>,
}

impl PartialRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or overwrite; returns the previous entry under `key`.
    pub fn register(&mut self, key: DirectiveKey, entry: PartialEntry) -> Option<PartialEntry> {
        self.entries.insert(key, entry)
    }

    pub fn get(&self, key: &DirectiveKey) -> Option<&PartialEntry> {
        self.entries.get(key)
    }

    pub fn contains(&self, key: &DirectiveKey) -> bool {
        self.entries.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Mutable access for the compose and compile passes.
    pub fn iter_mut(&mut self) -> impl Iterator<Item = (&DirectiveKey, &mut PartialEntry)> {
        self.entries.iter_mut()
    }

    /// Drop every entry, starting a fresh registry lifetime.
    pub fn reset(&mut self) {
        self.entries.clear();
    }
}
