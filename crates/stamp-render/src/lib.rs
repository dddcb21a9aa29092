//! Canvas compositing: transparent canvas, background blit, glyph outline
//! rasterization and the rotated-strip/post-scale-sharpen passes.

mod compositor;
mod glyph;

pub use compositor::{blit_background, make_canvas, sharpen};

use stamp_layout::{CircularPlacement, Color, LinearPlacement, VariantPlacement};
use tiny_skia::{FilterQuality, Pixmap, PixmapPaint, Transform};
use tracing::trace;

/// Draw a `LinearPlacement`: either straight onto the canvas, or into an
/// off-screen strip that gets rotated and composited.
#[tracing::instrument(level = "trace", skip_all, fields(glyphs = placement.glyphs.len(), rotation = placement.rotation_deg))]
pub fn render_linear(canvas: &mut Pixmap, placement: &LinearPlacement, color: Color) {
    if placement.rotation_deg == 0.0 {
        for g in &placement.glyphs {
            glyph::paint_glyph(
                canvas,
                &placement.font,
                g.glyph_id,
                placement.pixel_size,
                g.x,
                g.y,
                0.0,
                color,
                placement.stroke_width,
            );
        }
        return;
    }

    let pad = placement.pad;
    let buf_w = (placement.bbox.width + 2.0 * pad).ceil().max(1.0) as u32;
    let buf_h = (placement.bbox.height + 2.0 * pad).ceil().max(1.0) as u32;
    let Some(mut strip) = Pixmap::new(buf_w, buf_h) else {
        trace!(buf_w, buf_h, "rotated-strip buffer allocation failed, skipping rotation");
        return;
    };

    for g in &placement.glyphs {
        let local_x = g.x - placement.bbox.x + pad;
        let local_y = g.y - placement.bbox.y + pad;
        glyph::paint_glyph(
            &mut strip,
            &placement.font,
            g.glyph_id,
            placement.pixel_size,
            local_x,
            local_y,
            0.0,
            color,
            placement.stroke_width,
        );
    }

    let theta = placement.rotation_deg.to_radians();
    let (cos, sin) = (theta.cos().abs(), theta.sin().abs());
    let exp_w = ((buf_w as f64) * cos + (buf_h as f64) * sin).ceil().max(1.0) as u32;
    let exp_h = ((buf_w as f64) * sin + (buf_h as f64) * cos).ceil().max(1.0) as u32;
    let Some(mut rotated) = Pixmap::new(exp_w, exp_h) else { return };

    let ts = Transform::from_translate(exp_w as f32 / 2.0, exp_h as f32 / 2.0)
        .pre_rotate(-placement.rotation_deg as f32)
        .pre_translate(-(buf_w as f32) / 2.0, -(buf_h as f32) / 2.0);
    let paint = PixmapPaint { quality: FilterQuality::Bicubic, ..Default::default() };
    rotated.draw_pixmap(0, 0, strip.as_ref(), &paint, ts, None);

    let (cx, cy) = placement.bbox.center();
    let mut comp_x = cx - exp_w as f64 / 2.0;
    let mut comp_y = cy - exp_h as f64 / 2.0;
    comp_x = comp_x.clamp(0.0, (canvas.width() as f64 - exp_w as f64).max(0.0));
    comp_y = comp_y.clamp(0.0, (canvas.height() as f64 - exp_h as f64).max(0.0));

    canvas.draw_pixmap(
        comp_x.round() as i32,
        comp_y.round() as i32,
        rotated.as_ref(),
        &PixmapPaint::default(),
        Transform::identity(),
        None,
    );
}

/// Draw a `CircularPlacement`: each glyph is filled directly with its own
/// rotation, which reproduces the same visual result as rasterizing to a
/// scratch canvas and rotating it, without the intermediate bitmap,
/// consistent with the outline-fill approach used throughout this
/// workspace.
pub fn render_circular(canvas: &mut Pixmap, placement: &CircularPlacement, color: Color) {
    for g in &placement.glyphs {
        glyph::paint_glyph(
            canvas,
            &placement.font,
            g.glyph_id,
            placement.pixel_size,
            g.x,
            g.y,
            g.rotation_rad,
            color,
            None,
        );
    }
}

/// Draw a `VariantPlacement`. There is no rotation support for this path.
pub fn render_variant(canvas: &mut Pixmap, placement: &VariantPlacement, color: Color) {
    for g in &placement.glyphs {
        glyph::paint_glyph(
            canvas,
            &placement.font,
            g.glyph_id,
            placement.pixel_size,
            g.x,
            g.y,
            0.0,
            color,
            None,
        );
    }
}
