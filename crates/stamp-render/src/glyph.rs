//! Glyph outline rasterization, shared by every layout path.
//!
//! Rather than rasterizing each glyph to an L8 bitmap and either blitting
//! it directly or pasting it into a scratch canvas before rotating, this
//! fills the glyph's outline path directly with an affine transform
//! (translate to the pen origin, rotate, scale and flip for the font's
//! Y-up coordinate system). This collapses the bitmap-paste-rotate dance
//! into a single `tiny-skia` fill.

use stamp_layout::Color;
use stamp_text::Font;
use tiny_skia::{FillRule, Paint, PathBuilder, Pixmap, Stroke, Transform};
use ttf_parser::{GlyphId, OutlineBuilder};

struct WrappedPathBuilder(PathBuilder);

impl OutlineBuilder for WrappedPathBuilder {
    fn move_to(&mut self, x: f32, y: f32) {
        self.0.move_to(x, y);
    }

    fn line_to(&mut self, x: f32, y: f32) {
        self.0.line_to(x, y);
    }

    fn quad_to(&mut self, x1: f32, y1: f32, x: f32, y: f32) {
        self.0.quad_to(x1, y1, x, y);
    }

    fn curve_to(&mut self, x1: f32, y1: f32, x2: f32, y2: f32, x: f32, y: f32) {
        self.0.cubic_to(x1, y1, x2, y2, x, y);
    }

    fn close(&mut self) {
        self.0.close();
    }
}

/// The glyph's outline in font design units (Y-up), or `None` for glyphs
/// with no outline (space, marks rendered as combining accents, etc).
fn outline_path(font: &Font, glyph_id: u16) -> Option<tiny_skia::Path> {
    let mut builder = WrappedPathBuilder(PathBuilder::new());
    font.ttf().outline_glyph(GlyphId(glyph_id), &mut builder)?;
    builder.0.finish()
}

/// Fill (and optionally stroke) one glyph at `(pen_x, pen_y)` in canvas
/// coordinates, rotated by `rotation_rad` about the pen origin.
///
/// Silently does nothing for glyphs with no outline, the same way
/// whitespace is treated.
pub fn paint_glyph(
    canvas: &mut Pixmap,
    font: &Font,
    glyph_id: u16,
    pixel_size: f64,
    pen_x: f64,
    pen_y: f64,
    rotation_rad: f64,
    color: Color,
    stroke_width: Option<f64>,
) {
    let Some(path) = outline_path(font, glyph_id) else { return };

    let upem = font.units_per_em();
    if upem <= 0.0 {
        return;
    }
    let scale = (pixel_size / upem) as f32;
    let rotation_deg = rotation_rad.to_degrees() as f32;

    // Flip vertically because font design coordinates are Y-up.
    let transform = Transform::from_translate(pen_x as f32, pen_y as f32)
        .pre_rotate(rotation_deg)
        .pre_scale(scale, -scale);

    let mut paint = Paint::default();
    paint.set_color_rgba8(color.r, color.g, color.b, color.a);
    paint.anti_alias = true;

    canvas.fill_path(&path, &paint, FillRule::Winding, transform, None);

    if let Some(width) = stroke_width {
        let stroke = Stroke {
            // Stroke width is specified in device pixels; the path itself
            // is drawn in scaled font units, so undo the scale here.
            width: (width as f32) / scale.max(f32::EPSILON),
            ..Default::default()
        };
        canvas.stroke_path(&path, &paint, &stroke, transform, None);
    }
}
