//! First/last glyph-variant substitution, bypassing the normal shaper in
//! favor of direct per-character metric lookup.
//!
//! Rather than rasterizing each glyph to its own bitmap, pasting them into
//! a strip image, and resampling that bitmap if it overflows the
//! available width, this uses the same outline-to-path rendering as
//! `LinearLayout`/`CircularLayout` and achieves the "uniform rescale" by
//! scaling the pixel size that drives those outlines directly, rather
//! than resampling a rasterized bitmap.

use stamp_core::{CanvasGeometry, StampResult};
use stamp_text::{Font, FontRegistry, VariableInstancer};
use ttf_parser::GlyphId;

use crate::element::{TextAlign, TextElement, VerticalAlign};
use crate::linear::Rect;
use crate::resolve::resolve_font;

const DEFAULT_MARGIN: f64 = 10.0;

/// A single glyph placed by the variant renderer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VariantGlyph {
    pub glyph_id: u16,
    pub x: f64,
    pub y: f64,
}

pub struct VariantPlacement {
    pub font: Font,
    pub pixel_size: f64,
    pub glyphs: Vec<VariantGlyph>,
    pub bbox: Rect,
}

/// Lay `element` out using first/last glyph-variant substitution.
pub fn layout(
    registry: &FontRegistry,
    instancer: &VariableInstancer,
    canvas: &CanvasGeometry,
    element: &TextElement,
) -> StampResult<VariantPlacement> {
    let resolved = resolve_font(registry, instancer, element)?;
    let font = &resolved.font;

    let text = element.effective_value();
    let chars: Vec<char> = text.chars().collect();
    let last_index = chars.len().saturating_sub(1);

    let glyph_ids: Vec<GlyphId> = chars
        .iter()
        .enumerate()
        .map(|(i, &c)| {
            let variant_index = if i == 0 {
                element.first_variant
            } else if i == last_index && chars.len() > 1 {
                element.last_variant
            } else {
                None
            };

            variant_index
                .and_then(|v| font.glyph_variants().resolve(c, v))
                .or_else(|| font.ttf().glyph_index(c))
                .unwrap_or(GlyphId(0))
        })
        .collect();

    let original_size = element.font_size * canvas.scale_factor;
    let mut scaled_size = original_size;
    let extra_space = 0.2 * scaled_size;

    let advance_px = |gid: GlyphId, size: f64| -> f64 {
        font.advance(gid.0).map(|units| font.metrics().to_px(units, size)).unwrap_or(0.0)
    };

    let total_advance: f64 = glyph_ids.iter().map(|&g| advance_px(g, scaled_size)).sum();
    let mut strip_width = total_advance + 2.0 * extra_space;

    let pos = &element.position;
    let margin = element
        .text_padding
        .map(|p| canvas.scale(p) / 2.0)
        .unwrap_or(DEFAULT_MARGIN * canvas.scale_factor);
    let available = (canvas.width() as f64 - 2.0 * margin).max(1.0);

    if strip_width > available {
        let scale = available / strip_width;
        scaled_size *= scale;
        strip_width *= scale;
    }

    let metrics = font.metrics();
    let ascent_px = metrics.to_px(metrics.ascender, scaled_size);
    let descent_px = metrics.to_px(-metrics.descender, scaled_size);
    let text_height = ascent_px + descent_px;
    let extra_space = 0.2 * scaled_size;

    let place_x = match pos.text_align {
        TextAlign::Left => pos.x,
        TextAlign::Center => pos.x - strip_width / 2.0,
        TextAlign::Right => pos.x - strip_width,
    };
    let place_x = place_x.clamp(margin, (canvas.width() as f64 - strip_width - margin).max(margin));

    let mut place_y = match pos.vertical_align {
        VerticalAlign::Top => pos.y,
        VerticalAlign::Middle => pos.y - text_height / 2.0,
        VerticalAlign::Baseline => pos.y - ascent_px,
    };
    place_y += (0.08 * scaled_size).max(4.0);
    if scaled_size > 60.0 {
        place_y += 0.05 * scaled_size;
    }

    let mut glyphs = Vec::with_capacity(glyph_ids.len());
    let mut cursor = place_x + extra_space;
    for &gid in &glyph_ids {
        glyphs.push(VariantGlyph { glyph_id: gid.0, x: cursor, y: place_y });
        cursor += advance_px(gid, scaled_size);
    }

    let bbox = Rect { x: place_x, y: place_y - ascent_px, width: strip_width, height: text_height };

    Ok(VariantPlacement { font: resolved.font, pixel_size: scaled_size, glyphs, bbox })
}
