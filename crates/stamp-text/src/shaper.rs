//! Turns a string into a positioned glyph run.

use tracing::warn;

use crate::font::Font;

/// One shaped glyph: its id, the source character-cluster it came from, and
/// its advance/offset in pixels (already scaled by `pixel_size /
/// units_per_em`; this workspace works in floating-point pixels throughout
/// rather than the 1/64 fixed-point units HarfBuzz's C API surfaces, since
/// `rustybuzz`'s Rust API does not expose that fixed-point representation).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ShapedGlyph {
    pub glyph_id: u16,
    pub cluster: usize,
    pub x_advance: f64,
    pub y_advance: f64,
    pub x_offset: f64,
    pub y_offset: f64,
}

/// An ordered sequence of shaped glyphs for one string, in source character
/// order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GlyphRun {
    pub glyphs: Vec<ShapedGlyph>,
    pub pixel_size: f64,
}

impl GlyphRun {
    /// Sum of all glyph advances: the run's total rendered width in pixels.
    pub fn width(&self) -> f64 {
        self.glyphs.iter().map(|g| g.x_advance).sum()
    }

    /// The mean glyph advance, used to approximate letter-spacing extras.
    /// Zero for an empty run.
    pub fn average_advance(&self) -> f64 {
        if self.glyphs.is_empty() {
            0.0
        } else {
            self.width() / self.glyphs.len() as f64
        }
    }
}

/// Shapes text against a face using an OpenType shaper with `kern`/`liga`
/// enabled by default.
pub struct Shaper;

impl Shaper {
    /// Shape `text` at `pixel_size` against `font`. Falls back to shaping
    /// one character at a time (with inter-glyph kerning zeroed, since
    /// there are no adjacent glyphs to kern) when the whole-string pass
    /// yields no glyphs for non-empty input.
    #[tracing::instrument(level = "debug", skip(font, text), fields(len = text.len()))]
    pub fn shape(font: &Font, pixel_size: f64, text: &str) -> GlyphRun {
        let run = Self::shape_whole(font, pixel_size, text);
        if run.glyphs.is_empty() && !text.is_empty() {
            warn!("shaping produced no glyphs for non-empty input, falling back to per-character shaping");
            return Self::shape_per_char(font, pixel_size, text);
        }
        run
    }

    fn shape_whole(font: &Font, pixel_size: f64, text: &str) -> GlyphRun {
        let mut buffer = rustybuzz::UnicodeBuffer::new();
        buffer.push_str(text);
        buffer.guess_segment_properties();

        let features = [
            rustybuzz::Feature::new(ttf_parser::Tag::from_bytes(b"kern"), 1, ..),
            rustybuzz::Feature::new(ttf_parser::Tag::from_bytes(b"liga"), 1, ..),
        ];

        let output = rustybuzz::shape(font.rusty(), &features, buffer);
        let upem = font.units_per_em();
        let scale = if upem > 0.0 { pixel_size / upem } else { 0.0 };

        let infos = output.glyph_infos();
        let positions = output.glyph_positions();
        let glyphs = infos
            .iter()
            .zip(positions.iter())
            .map(|(info, pos)| ShapedGlyph {
                glyph_id: info.glyph_id as u16,
                cluster: info.cluster as usize,
                x_advance: f64::from(pos.x_advance) * scale,
                y_advance: f64::from(pos.y_advance) * scale,
                x_offset: f64::from(pos.x_offset) * scale,
                y_offset: f64::from(pos.y_offset) * scale,
            })
            .collect();

        GlyphRun { glyphs, pixel_size }
    }

    fn shape_per_char(font: &Font, pixel_size: f64, text: &str) -> GlyphRun {
        let mut glyphs = Vec::new();
        let mut cluster = 0;
        for ch in text.chars() {
            let mut one = [0u8; 4];
            let piece = ch.encode_utf8(&mut one);
            let mut run = Self::shape_whole(font, pixel_size, piece);
            for glyph in &mut run.glyphs {
                glyph.cluster = cluster;
            }
            glyphs.extend(run.glyphs);
            cluster += ch.len_utf8();
        }
        GlyphRun { glyphs, pixel_size }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_run_has_zero_width() {
        let run = GlyphRun::default();
        assert_eq!(run.width(), 0.0);
        assert_eq!(run.average_advance(), 0.0);
    }

    #[test]
    fn average_advance_is_width_over_count() {
        let run = GlyphRun {
            glyphs: vec![
                ShapedGlyph {
                    glyph_id: 1,
                    cluster: 0,
                    x_advance: 10.0,
                    y_advance: 0.0,
                    x_offset: 0.0,
                    y_offset: 0.0,
                },
                ShapedGlyph {
                    glyph_id: 2,
                    cluster: 1,
                    x_advance: 20.0,
                    y_advance: 0.0,
                    x_offset: 0.0,
                    y_offset: 0.0,
                },
            ],
            pixel_size: 16.0,
        };
        assert_eq!(run.width(), 30.0);
        assert_eq!(run.average_advance(), 15.0);
    }
}
