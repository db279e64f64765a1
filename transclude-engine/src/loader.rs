//! Template and data loading, and the registry load pass.

use std::io::ErrorKind;

use serde_json::Value;

use transclude_core::{Channel, DataMap};

use crate::error::{io_err, EngineError};
use crate::registry::{PartialEntry, PartialRegistry};
use crate::resolver::{PathResolver, ResolvedPath, TemplateLookup};
use crate::scanner::{scan, Directive, FlagSet};

/// Raw template text and where it came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadedTemplate {
    pub source: Option<ResolvedPath>,
    pub content: String,
}

/// Read the template named by `identifier`.
///
/// An unmatched placeholder path loads as empty content.
pub fn load_template(
    resolver: &PathResolver,
    identifier: &str,
    channel: &Channel,
) -> Result<LoadedTemplate, EngineError> {
    match resolver.resolve_template_path(identifier, channel)? {
        TemplateLookup::Found(resolved) => {
            let content = std::fs::read_to_string(&resolved.full).map_err(|e| {
                if e.kind() == ErrorKind::NotFound {
                    EngineError::PartialNotFound {
                        path: resolved.relative.clone(),
                    }
                } else {
                    io_err(&resolved.full, e)
                }
            })?;
            Ok(LoadedTemplate {
                source: Some(resolved),
                content,
            })
        }
        TemplateLookup::UnmatchedPlaceholder { .. } => Ok(LoadedTemplate {
            source: None,
            content: String::new(),
        }),
    }
}

/// Read and parse the companion data file.
///
/// `None` for an absent or empty `data_ref`: no companion data, as opposed to
/// an empty mapping.
pub fn load_data(
    resolver: &PathResolver,
    data_ref: Option<&str>,
    channel: &Channel,
) -> Result<Option<DataMap>, EngineError> {
    let Some(data_ref) = data_ref.filter(|r| !r.is_empty()) else {
        return Ok(None);
    };

    let path = resolver.resolve_data_path(data_ref, channel)?;
    let contents = std::fs::read_to_string(&path).map_err(|e| {
        if e.kind() == ErrorKind::NotFound {
            EngineError::DataFileNotFound { path: path.clone() }
        } else {
            io_err(&path, e)
        }
    })?;

    let value: Value = serde_json::from_str(&contents).map_err(|e| EngineError::DataParse {
        path: path.clone(),
        source: e,
    })?;
    match value {
        Value::Object(map) => Ok(Some(map)),
        _ => Err(EngineError::DataNotObject { path }),
    }
}

/// Load pass: register an entry for every directive in `body`.
///
/// A key already present is reused unless the directive carries a flag, in
/// which case it is reloaded and overwritten.
pub fn load_partials(
    body: &str,
    resolver: &PathResolver,
    flags: &FlagSet,
    channel: &Channel,
    registry: &mut PartialRegistry,
) -> Result<usize, EngineError> {
    let mut loaded = 0;
    for found in scan(body) {
        let directive = Directive::parse(found.text, flags)?;
        if registry.contains(&directive.key) && !directive.bypasses_cache() {
            tracing::debug!("reusing entry '{}'", directive.key);
            continue;
        }

        let data = load_data(resolver, directive.data_ref.as_deref(), channel)?;
        let template = load_template(resolver, &directive.template_ref, channel)?;
        tracing::debug!(
            "registered '{}' ({} bytes, data: {})",
            directive.key,
            template.content.len(),
            data.is_some()
        );
        registry.register(
            directive.key,
            PartialEntry::new(template.source, template.content, data),
        );
        loaded += 1;
    }
    Ok(loaded)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
