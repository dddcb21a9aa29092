//! Curved-baseline text layout: fit-to-max-angle, per-glyph placement and
//! rotation around an arc.

use std::f64::consts::PI;

use stamp_core::{AdjustmentReason, CanvasGeometry, FontAdjustment, StampResult};
use stamp_text::{Font, FontRegistry, Shaper, VariableInstancer};
use tracing::{debug, warn};

use crate::element::{BaselinePosition, LayoutMode, Position, TextAlign, TextElement, VerticalAlign};
use crate::linear::MIN_FONT_SIZE;
use crate::resolve::resolve_font;

/// A single glyph placed on the arc.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CircularGlyph {
    pub glyph_id: u16,
    /// Pen origin in canvas coordinates.
    pub x: f64,
    pub y: f64,
    /// Rotation to apply to the glyph outline, in radians.
    pub rotation_rad: f64,
    /// The glyph's center angle (running angle plus half its advance),
    /// exposed so an inside/outside reversal-symmetry check can compare
    /// angles directly rather than pixel positions.
    pub center_angle_rad: f64,
}

pub struct CircularPlacement {
    pub font: Font,
    pub pixel_size: f64,
    pub glyphs: Vec<CircularGlyph>,
    pub adjustment: FontAdjustment,
}

/// The outcome of attempting to lay `element` out on an arc.
pub enum CircularOutcome {
    Placed(CircularPlacement),
    /// `radius <= 0`: the caller should degrade to a linear layout at
    /// `(x, y)` with `rotation = base_angle`.
    DegenerateRadius,
}

/// Build the `Position` a degenerate (zero-radius) circular element should
/// be laid out with, treating it as linear text anchored at the circle's
/// would-be center.
pub fn degenerate_linear_position(pos: &Position) -> Position {
    Position {
        x: pos.x,
        y: pos.y,
        rotation: pos.base_angle,
        text_align: TextAlign::Center,
        vertical_align: VerticalAlign::Middle,
        letter_spacing: pos.letter_spacing,
        is_circular: false,
        radius: 0.0,
        base_angle: pos.base_angle,
        max_angle: 0.0,
        layout_mode: LayoutMode::StartAligned,
        baseline_position: BaselinePosition::Inside,
    }
}

/// Lay `element` out on an arc of radius `position.radius` centered at
/// `(position.x, position.y)`.
#[tracing::instrument(level = "debug", skip(registry, instancer, canvas, element), fields(id = %element.id))]
pub fn layout(
    registry: &FontRegistry,
    instancer: &VariableInstancer,
    canvas: &CanvasGeometry,
    element: &TextElement,
) -> StampResult<CircularOutcome> {
    let pos = &element.position;
    let r = canvas.scale(pos.radius);
    if r <= 0.0 {
        return Ok(CircularOutcome::DegenerateRadius);
    }

    let resolved = resolve_font(registry, instancer, element)?;
    let original_size = element.font_size * canvas.scale_factor;
    let mut scaled_size = original_size;

    let mut text = element.effective_value();
    if pos.baseline_position == BaselinePosition::Outside {
        text = text.chars().rev().collect();
    }

    let mut run = Shaper::shape(&resolved.font, scaled_size, &text);
    let mut total_width = run.width() * pos.letter_spacing;
    let mut total_angle_deg = total_width / r * 180.0 / PI;

    let max_angle = pos.clamped_max_angle();
    let mut reason = AdjustmentReason::None;
    let mut iterations = 0;
    while max_angle > 0.0
        && total_angle_deg > max_angle
        && scaled_size > MIN_FONT_SIZE
        && iterations < 10
    {
        let ratio = max_angle / total_angle_deg;
        scaled_size = (scaled_size * ratio).max(MIN_FONT_SIZE);
        run = Shaper::shape(&resolved.font, scaled_size, &text);
        total_width = run.width() * pos.letter_spacing;
        total_angle_deg = total_width / r * 180.0 / PI;
        reason = AdjustmentReason::FitMaxAngle;
        iterations += 1;
    }
    if iterations == 10 && max_angle > 0.0 && total_angle_deg > max_angle {
        warn!(id = %element.id, "circular fit loop did not converge within 10 iterations");
    }

    let total_angle_rad = total_width / r;
    let base_angle_rad = pos.base_angle.to_radians();
    let start = match pos.layout_mode {
        LayoutMode::StartAligned => base_angle_rad,
        LayoutMode::CenterAligned => base_angle_rad - total_angle_rad / 2.0,
    };

    let outside = pos.baseline_position == BaselinePosition::Outside;
    let mut running = start;
    let mut glyphs = Vec::with_capacity(run.glyphs.len());
    for glyph in &run.glyphs {
        let step = glyph.x_advance * pos.letter_spacing / r;
        let center_angle = running + step / 2.0;
        let x = pos.x + r * running.cos();
        let y = pos.y + r * running.sin();
        let mut rotation = running + PI / 2.0;
        if outside {
            rotation += PI;
        }
        glyphs.push(CircularGlyph {
            glyph_id: glyph.glyph_id,
            x,
            y,
            rotation_rad: rotation,
            center_angle_rad: center_angle,
        });
        running += step;
    }

    debug!(id = %element.id, scaled_size, total_angle_deg, max_angle, "circular layout complete");

    Ok(CircularOutcome::Placed(CircularPlacement {
        font: resolved.font,
        pixel_size: scaled_size,
        glyphs,
        adjustment: if reason == AdjustmentReason::None {
            FontAdjustment::unchanged(original_size)
        } else {
            FontAdjustment::adjusted(original_size, scaled_size, reason)
        },
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn degenerate_radius_maps_base_angle_to_rotation() {
        let pos = Position {
            x: 100.0,
            y: 100.0,
            rotation: 0.0,
            text_align: TextAlign::Left,
            vertical_align: VerticalAlign::Top,
            letter_spacing: 1.0,
            is_circular: true,
            radius: 0.0,
            base_angle: 42.0,
            max_angle: 90.0,
            layout_mode: LayoutMode::StartAligned,
            baseline_position: BaselinePosition::Inside,
        };
        let linear = degenerate_linear_position(&pos);
        assert_eq!(linear.rotation, 42.0);
        assert_eq!(linear.is_circular, false);
        assert_eq!(linear.text_align, TextAlign::Center);
    }
}
