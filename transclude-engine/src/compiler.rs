//! Template compiler — merges static data into each entry and renders it.

use transclude_core::DataMap;
use transclude_renderer::Render;

use crate::error::EngineError;
use crate::registry::PartialRegistry;

/// Overlay every static key onto `local`; static data wins on conflicts.
pub fn merge_data(local: &mut DataMap, static_data: &DataMap) {
    for (key, value) in static_data {
        local.insert(key.clone(), value.clone());
    }
}

/// Render every entry in place.
///
/// Entries with companion data render against that data merged with
/// `static_data`; entries without render against `static_data` alone.
pub fn compile(
    registry: &mut PartialRegistry,
    static_data: &DataMap,
    renderer: &dyn Render,
) -> Result<(), EngineError> {
    for (key, entry) in registry.iter_mut() {
        let rendered = match entry.data.as_mut() {
            Some(data) => {
                merge_data(data, static_data);
                renderer.render(&entry.content, data)?
            }
            None => renderer.render(&entry.content, static_data)?,
        };
        tracing::debug!("compiled '{}' ({} bytes)", key, rendered.len());
        entry.content = rendered;
    }
    Ok(())
}
