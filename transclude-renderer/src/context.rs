//! Slot values → [`tera::Context`].

use crate::dialect::SLOT_VAR;

/// Context for a translated template: the slot values under [`SLOT_VAR`].
pub fn slot_context(slots: &[String]) -> tera::Context {
    let mut ctx = tera::Context::new();
    ctx.insert(SLOT_VAR, slots);
    ctx
}
