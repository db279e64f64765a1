//! Body substitution — rewrite top-level directives with compiled partials.

use crate::error::EngineError;
use crate::registry::PartialRegistry;
use crate::scanner::{scan, Directive, FlagSet};

/// Replace each directive occurrence in the original, uncomposed `body` with
/// its entry's final content.
///
/// A directive without an entry is an internal consistency failure and is
/// reported as [`EngineError::UnregisteredDirective`], never skipped.
pub fn substitute(
    body: &str,
    registry: &PartialRegistry,
    flags: &FlagSet,
) -> Result<String, EngineError> {
    let found = scan(body);
    if found.is_empty() {
        return Ok(body.to_string());
    }

    let mut out = String::with_capacity(body.len());
    let mut last = 0;
    for m in found {
        let directive = Directive::parse(m.text, flags)?;
        let entry = registry
            .get(&directive.key)
            .ok_or_else(|| EngineError::UnregisteredDirective {
                key: directive.key.to_string(),
            })?;
        out.push_str(&body[last..m.start]);
        out.push_str(&entry.content);
        last = m.end;
    }
    out.push_str(&body[last..]);
    Ok(out)
}
