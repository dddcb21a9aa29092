//! Canvas geometry and the auto-scaling rule shared by every renderer.

/// The side length, in pixels, below which a declared canvas is upscaled.
///
/// Below this threshold, fine text details (hairline strokes, small glyph
/// variants) would be rendered at a resolution too coarse to look right, so
/// every declared size is scaled up to at least this before anything is
/// drawn.
pub const MIN_CANVAS_SIDE: f64 = 1000.0;

/// The scale factor and resulting pixel dimensions for a declared canvas
/// size, per the auto-scaling rule in the data model: `scale_factor = max(1,
/// 1000 / max(w0, h0))`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CanvasGeometry {
    /// The caller-declared width, before scaling.
    pub declared_width: u32,
    /// The caller-declared height, before scaling.
    pub declared_height: u32,
    /// The uniform scale factor applied to every coordinate, radius, padding
    /// and font size belonging to this canvas. Always `>= 1.0`.
    pub scale_factor: f64,
}

impl CanvasGeometry {
    /// Compute the geometry for a declared `(width, height)`.
    pub fn new(declared_width: u32, declared_height: u32) -> Self {
        let longest = declared_width.max(declared_height).max(1) as f64;
        let scale_factor = (MIN_CANVAS_SIDE / longest).max(1.0);
        Self { declared_width, declared_height, scale_factor }
    }

    /// The final pixel width after scaling.
    pub fn width(&self) -> u32 {
        (self.declared_width as f64 * self.scale_factor).round() as u32
    }

    /// The final pixel height after scaling.
    pub fn height(&self) -> u32 {
        (self.declared_height as f64 * self.scale_factor).round() as u32
    }

    /// Scale a single scalar (coordinate, radius, padding, font size) from
    /// declared units into pixel units.
    pub fn scale(&self, value: f64) -> f64 {
        value * self.scale_factor
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn small_canvas_is_upscaled_to_1000() {
        let geo = CanvasGeometry::new(200, 200);
        assert_eq!(geo.scale_factor, 5.0);
        assert_eq!(geo.width(), 1000);
        assert_eq!(geo.height(), 1000);
    }

    #[test]
    fn large_canvas_is_not_downscaled() {
        let geo = CanvasGeometry::new(2000, 1500);
        assert_eq!(geo.scale_factor, 1.0);
        assert_eq!(geo.width(), 2000);
        assert_eq!(geo.height(), 1500);
    }

    #[test]
    fn non_square_canvas_scales_by_longest_side() {
        let geo = CanvasGeometry::new(500, 100);
        assert_eq!(geo.scale_factor, 2.0);
        assert_eq!(geo.width(), 1000);
        assert_eq!(geo.height(), 200);
    }

    #[test]
    fn coordinate_scaling_doubles_with_doubled_scale() {
        let a = CanvasGeometry::new(200, 200);
        let b = CanvasGeometry::new(100, 100);
        assert_eq!(b.scale_factor, 2.0 * a.scale_factor);
        assert_eq!(b.scale(42.0), 2.0 * a.scale(42.0));
    }
}
