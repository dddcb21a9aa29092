//! Shared face-resolution logic used by every renderer path: turn a
//! `TextElement`'s family/weight/axis request into a concrete `Font`,
//! materializing a variable-font instance when needed.

use stamp_core::StampResult;
use stamp_text::{Font, FontRegistry, FontWeight, VariableInstancer};

use crate::element::TextElement;

/// The outcome of resolving a text element's font request.
pub struct ResolvedFont {
    pub font: Font,
    /// Whether a variable-font instance was actually applied (as opposed
    /// to falling back to the face's default position because the face is
    /// static, or instancing produced no axes to apply).
    pub variable_instance_applied: bool,
}

/// Resolve the effective face for `element`: forces weight 700 when
/// `auto_bold` is set, and requests a materialized variable-font instance
/// when the resolved face is variable and a weight (explicit or forced) or
/// explicit axis settings were given.
pub fn resolve_font(
    registry: &FontRegistry,
    instancer: &VariableInstancer,
    element: &TextElement,
) -> StampResult<ResolvedFont> {
    let forced_weight = element.auto_bold.then_some(FontWeight::BOLD);
    let weight_hint = forced_weight.or(element.font_weight);

    let record = registry.resolve(&element.font_family, weight_hint)?;
    let font = registry.load(&record)?;

    if !record.is_variable {
        return Ok(ResolvedFont { font, variable_instance_applied: false });
    }

    let axes = element.axis_settings(forced_weight);
    if axes.is_empty() {
        return Ok(ResolvedFont { font, variable_instance_applied: false });
    }

    // Bookkeeping only: the cache entry records that this (path, axes) pair
    // was requested. The actual shaping-time face still comes from
    // `Font::with_variations`, which is cheap since it shares the
    // already-loaded bytes.
    instancer.instantiate(&record.path, &axes);

    match font.with_variations(&axes) {
        Some(instanced) => Ok(ResolvedFont { font: instanced, variable_instance_applied: true }),
        None => Ok(ResolvedFont { font, variable_instance_applied: false }),
    }
}

/// Whether `auto_bold` still needs a synthetic stroke, i.e. the resolved
/// face could not be pushed to a true bold variable instance.
pub fn needs_synthetic_bold(element: &TextElement, resolved: &ResolvedFont) -> bool {
    element.auto_bold && !resolved.variable_instance_applied
}
