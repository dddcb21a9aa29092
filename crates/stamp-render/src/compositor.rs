//! Transparent canvas creation, aspect-preserving background blit, and the
//! post-upscale sharpen pass. There is no PDF/SVG background case here,
//! only a raster file loaded through the `image` crate.

use std::path::Path;

use image::imageops::FilterType;
use stamp_core::{StampError, StampResult};
use tiny_skia::{Pixmap, PixmapPaint, Transform};

/// Allocate a fully transparent canvas of the given pixel dimensions.
pub fn make_canvas(width: u32, height: u32) -> StampResult<Pixmap> {
    Pixmap::new(width, height).ok_or(StampError::CanvasAllocationFailed { width, height })
}

/// Load `path`, scale it preserving aspect ratio to fit inside the canvas
/// (`min(W/bg_w, H/bg_h)`), center it, and alpha-composite it onto `canvas`.
pub fn blit_background(canvas: &mut Pixmap, path: &Path) -> StampResult<()> {
    let image = image::open(path)
        .map_err(|_| StampError::BackgroundLoadFailed { path: path.to_path_buf() })?;

    let (bg_w, bg_h) = (image.width().max(1), image.height().max(1));
    let (cw, ch) = (canvas.width(), canvas.height());
    let scale = (cw as f64 / bg_w as f64).min(ch as f64 / bg_h as f64);
    let new_w = ((bg_w as f64 * scale).round().max(1.0)) as u32;
    let new_h = ((bg_h as f64 * scale).round().max(1.0)) as u32;

    let filter = if scale > 1.0 { FilterType::CatmullRom } else { FilterType::Lanczos3 };
    let resized = if (new_w, new_h) == (bg_w, bg_h) {
        image
    } else {
        image.resize_exact(new_w, new_h, filter)
    };
    let rgba = resized.to_rgba8();

    let mut texture = Pixmap::new(new_w, new_h)
        .ok_or(StampError::CanvasAllocationFailed { width: new_w, height: new_h })?;
    for (src, dst) in rgba.pixels().zip(texture.pixels_mut()) {
        let [r, g, b, a] = src.0;
        *dst = tiny_skia::ColorU8::from_rgba(r, g, b, a).premultiply();
    }

    let ox = (cw as i32 - new_w as i32) / 2;
    let oy = (ch as i32 - new_h as i32) / 2;
    canvas.draw_pixmap(ox, oy, texture.as_ref(), &PixmapPaint::default(), Transform::identity(), None);

    Ok(())
}

/// Unsharp-mask the canvas in place. Only applied when the canvas was
/// auto-upscaled (`scale_factor > 1.0`).
pub fn sharpen(canvas: &mut Pixmap) {
    let (w, h) = (canvas.width(), canvas.height());
    let Some(buffer) = image::RgbaImage::from_raw(w, h, canvas.data().to_vec()) else { return };
    let sharpened = image::imageops::unsharpen(&buffer, 1.0, 1);
    canvas.data_mut().copy_from_slice(sharpened.as_raw());
}
