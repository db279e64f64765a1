//! Path resolver — identifier → file under the override chain.
//!
//! # Steps
//!
//! 1. Sanitise: keep only alphanumerics and `-_%@./\`; `\` becomes `/`.
//! 2. Append the template (or data) extension.
//! 3. Substitute `%s` with the channel.
//! 4. Normalise: drop empty and `.` components, refuse `..`.
//! 5. Templates only: probe `root/relative` for each root in order.

use std::path::{Path, PathBuf};

use transclude_core::{Channel, EngineConfig};

use crate::error::EngineError;

pub const PLACEHOLDER: &str = "%s";

/// A template located under one root of the override chain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedPath {
    /// Root that held the file.
    pub root: PathBuf,
    /// Sanitised, placeholder-substituted relative path.
    pub relative: String,
    /// `root/relative`.
    pub full: PathBuf,
}

/// Outcome of a template lookup that did not fail outright.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TemplateLookup {
    Found(ResolvedPath),
    /// The path held a `%s` placeholder and no root matched the substituted
    /// path. Loads as empty content.
    UnmatchedPlaceholder { relative: String },
}

/// Resolves template and data identifiers against configured directories.
#[derive(Debug, Clone)]
pub struct PathResolver {
    roots: Vec<PathBuf>,
    data_dir: PathBuf,
    template_ext: String,
    datafile_ext: String,
}

impl PathResolver {
    pub fn new(
        roots: Vec<PathBuf>,
        data_dir: impl Into<PathBuf>,
        template_ext: impl Into<String>,
        datafile_ext: impl Into<String>,
    ) -> Self {
        PathResolver {
            roots,
            data_dir: data_dir.into(),
            template_ext: template_ext.into(),
            datafile_ext: datafile_ext.into(),
        }
    }

    pub fn from_config(config: &EngineConfig) -> Self {
        PathResolver::new(
            config.root_dirs.clone(),
            config.data_dir.clone(),
            config.template_ext.clone(),
            config.datafile_ext.clone(),
        )
    }

    pub fn roots(&self) -> &[PathBuf] {
        &self.roots
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    /// Locate the template named by `identifier`, first root wins.
    ///
    /// Fails with [`EngineError::PartialNotFound`] naming the attempted
    /// relative path when no root holds it and no placeholder was involved.
    pub fn resolve_template_path(
        &self,
        identifier: &str,
        channel: &Channel,
    ) -> Result<TemplateLookup, EngineError> {
        let not_found = |path: String| EngineError::PartialNotFound { path };

        let (relative, had_placeholder) =
            relative_path(identifier, &self.template_ext, channel)
                .ok_or_else(|| not_found(identifier.to_string()))?;

        for root in &self.roots {
            let full = root.join(&relative);
            if full.is_file() {
                tracing::debug!("resolved '{}' under {}", relative, root.display());
                return Ok(TemplateLookup::Found(ResolvedPath {
                    root: root.clone(),
                    relative,
                    full,
                }));
            }
        }

        if had_placeholder {
            tracing::debug!("no root holds '{}' for channel '{}'", relative, channel);
            return Ok(TemplateLookup::UnmatchedPlaceholder { relative });
        }
        Err(not_found(relative))
    }

    /// Companion data file for `identifier` under the data directory.
    ///
    /// Existence is not checked here; the loader reports missing files.
    pub fn resolve_data_path(
        &self,
        identifier: &str,
        channel: &Channel,
    ) -> Result<PathBuf, EngineError> {
        let (relative, _) = relative_path(identifier, &self.datafile_ext, channel).ok_or_else(
            || EngineError::DataFileNotFound {
                path: self.data_dir.join(identifier),
            },
        )?;
        Ok(self.data_dir.join(relative))
    }
}

/// Strip every character outside the identifier set.
///
/// `views/content` stays as is, `**` becomes empty, `a\b` becomes `a/b`.
pub fn sanitize_identifier(identifier: &str) -> String {
    identifier
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '%' | '@' | '.' | '/' | '\\'))
        .map(|c| if c == '\\' { '/' } else { c })
        .collect()
}

/// Replace every `%s` with `value`.
pub fn substitute_placeholder(path: &str, value: &str) -> String {
    path.replace(PLACEHOLDER, value)
}

/// Sanitised relative path with extension and channel applied.
///
/// Returns `None` when nothing usable remains or a component climbs out of
/// the root. The flag reports whether a placeholder was substituted.
fn relative_path(identifier: &str, ext: &str, channel: &Channel) -> Option<(String, bool)> {
    let sanitized = sanitize_identifier(identifier);
    if sanitized.is_empty() {
        return None;
    }
    let file_name = format!("{sanitized}{ext}");
    let had_placeholder = file_name.contains(PLACEHOLDER);
    let substituted = if had_placeholder {
        let channel = sanitize_identifier(channel.as_str());
        substitute_placeholder(&file_name, &channel)
    } else {
        file_name
    };

    let mut parts = Vec::new();
    for part in substituted.split('/') {
        match part {
            "" | "." => continue,
            ".." => return None,
            other => parts.push(other),
        }
    }
    if parts.is_empty() {
        return None;
    }
    Some((parts.join("/"), had_placeholder))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
