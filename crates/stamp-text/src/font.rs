//! A parsed font face: a cheap-to-clone handle around the owned font bytes
//! plus the `ttf-parser` and `rustybuzz` views into them.

use std::collections::BTreeMap;
use std::fmt::{self, Debug, Formatter};
use std::sync::{Arc, OnceLock};

use ttf_parser::GlyphId;

use crate::glyph_variant::GlyphVariantIndex;

/// An OpenType font face.
///
/// Values of this type are cheap to clone: the underlying bytes and parsed
/// tables are held behind an `Arc`.
#[derive(Clone)]
pub struct Font(Arc<Repr>);

struct Repr {
    index: u32,
    info: FontInfo,
    metrics: FontMetrics,
    ttf: ttf_parser::Face<'static>,
    rusty: rustybuzz::Face<'static>,
    variant_index: OnceLock<GlyphVariantIndex>,
    // `ttf` and `rusty` borrow from `data`; `data` must outlive them, which
    // is guaranteed by declaration order (fields drop top to bottom) and by
    // never handing out the buffer itself.
    data: Arc<Vec<u8>>,
}

/// One axis of variation a variable font exposes (weight, width, ...).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AxisRange {
    pub min: f32,
    pub default: f32,
    pub max: f32,
}

/// Metadata about a face that does not depend on how it will be shaped.
#[derive(Debug, Clone, PartialEq)]
pub struct FontInfo {
    /// The typographic family name, e.g. `"Montserrat"`.
    pub family: String,
    /// Whether the face carries OpenType variation tables.
    pub is_variable: bool,
    /// The axes a variable face exposes, keyed by four-letter tag
    /// (`"wght"`, `"wdth"`, ...). Empty for static faces.
    pub axes: BTreeMap<String, AxisRange>,
}

/// Metrics needed to place a baseline and compensate for ascent/cap
/// discrepancies.
#[derive(Debug, Clone, Copy)]
pub struct FontMetrics {
    pub units_per_em: f64,
    pub ascender: f64,
    pub descender: f64,
    pub cap_height: f64,
}

impl Font {
    /// Parse a font from owned bytes at the given collection index.
    pub fn new(data: Vec<u8>, index: u32) -> Option<Self> {
        Self::from_arc(Arc::new(data), index)
    }

    fn from_arc(data: Arc<Vec<u8>>, index: u32) -> Option<Self> {
        // Safety: `ttf` and `rusty` below are given a `'static` lifetime by
        // pointing into `data`'s heap allocation. This is sound because:
        // - `data` is an `Arc` and the `Repr` that owns this `Arc` also owns
        //   `ttf`/`rusty`, so the buffer outlives them for the `Repr`'s
        //   whole lifetime.
        // - The allocation never moves (we never call into the `Vec`, only
        //   read through the `Arc`), so the slice stays valid.
        // - The `'static` lifetime is never observed outside this module;
        //   callers only ever see `&Face<'_>` borrowed from `&self`.
        let slice: &'static [u8] =
            unsafe { std::slice::from_raw_parts(data.as_ptr(), data.len()) };

        let ttf = ttf_parser::Face::parse(slice, index).ok()?;
        let rusty = rustybuzz::Face::from_slice(slice, index)?;
        let metrics = FontMetrics::from_ttf(&ttf);
        let info = FontInfo::from_ttf(&ttf);

        Some(Self(Arc::new(Repr {
            index,
            info,
            metrics,
            ttf,
            rusty,
            variant_index: OnceLock::new(),
            data,
        })))
    }

    /// Produce a new `Font` sharing this one's bytes, with the given
    /// variation axes applied to both the `ttf-parser` and `rustybuzz`
    /// views. This is "live instancing": no new font file is written, the
    /// same bytes are reparsed with variation coordinates set.
    pub fn with_variations(&self, axes: &[(String, f32)]) -> Option<Font> {
        if axes.is_empty() {
            return Some(self.clone());
        }

        let data = self.0.data.clone();
        let index = self.0.index;
        let slice: &'static [u8] =
            unsafe { std::slice::from_raw_parts(data.as_ptr(), data.len()) };

        let mut ttf = ttf_parser::Face::parse(slice, index).ok()?;
        let mut rusty = rustybuzz::Face::from_slice(slice, index)?;

        for (tag, value) in axes {
            let raw = ttf_parser::Tag::from_bytes_lossy(tag.as_bytes());
            ttf.set_variation(raw, *value);
            rusty.set_variation(raw, *value);
        }

        let metrics = FontMetrics::from_ttf(&ttf);
        let mut info = self.0.info.clone();
        info.is_variable = true;

        Some(Font(Arc::new(Repr {
            index,
            info,
            metrics,
            ttf,
            rusty,
            variant_index: OnceLock::new(),
            data,
        })))
    }

    pub fn info(&self) -> &FontInfo {
        &self.0.info
    }

    pub fn metrics(&self) -> &FontMetrics {
        &self.0.metrics
    }

    pub fn units_per_em(&self) -> f64 {
        self.0.metrics.units_per_em
    }

    pub fn ttf(&self) -> &ttf_parser::Face<'_> {
        &self.0.ttf
    }

    pub fn rusty(&self) -> &rustybuzz::Face<'_> {
        &self.0.rusty
    }

    /// Horizontal advance of a single glyph, in font units.
    pub fn advance(&self, glyph: u16) -> Option<f64> {
        self.0.ttf.glyph_hor_advance(GlyphId(glyph)).map(f64::from)
    }

    /// The per-face index of named alternate glyphs, built and memoized on
    /// first use.
    pub fn glyph_variants(&self) -> &GlyphVariantIndex {
        self.0.variant_index.get_or_init(|| GlyphVariantIndex::build(&self.0.ttf))
    }
}

impl Debug for Font {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        write!(f, "Font({}, variable={})", self.info().family, self.info().is_variable)
    }
}

impl FontInfo {
    /// Compute metadata for the font at `index` in `data`: a face is
    /// variable iff it exposes an `fvar` axis table (or other variation
    /// tables); absent that, a `variable`/`vf` token in the filename is
    /// treated as evidence of a default weight axis by the caller
    /// (`FontRegistry::analyze`), since `ttf-parser` alone cannot see the
    /// filename.
    fn from_ttf(ttf: &ttf_parser::Face) -> Self {
        let family = find_family(ttf).unwrap_or_else(|| "Unknown".to_string());
        let is_variable = ttf.is_variable();

        let mut axes = BTreeMap::new();
        if is_variable {
            for axis in ttf.variation_axes() {
                axes.insert(
                    axis.tag.to_string(),
                    AxisRange {
                        min: axis.min_value,
                        default: axis.def_value,
                        max: axis.max_value,
                    },
                );
            }
        }

        Self { family, is_variable, axes }
    }
}

impl FontMetrics {
    fn from_ttf(ttf: &ttf_parser::Face) -> Self {
        let units_per_em = f64::from(ttf.units_per_em());
        let ascender = f64::from(ttf.typographic_ascender().unwrap_or(ttf.ascender()));
        let descender =
            f64::from(ttf.typographic_descender().unwrap_or(ttf.descender()));
        let cap_height = ttf
            .capital_height()
            .filter(|&h| h > 0)
            .map_or(ascender, f64::from);
        Self { units_per_em, ascender, descender, cap_height }
    }

    /// Convert a font-unit quantity to a pixel quantity at `pixel_size`.
    pub fn to_px(&self, units: f64, pixel_size: f64) -> f64 {
        units / self.units_per_em * pixel_size
    }
}

/// Find the typographic family name (name id 1), falling back to nothing if
/// the face carries no name table at all.
fn find_family(ttf: &ttf_parser::Face) -> Option<String> {
    ttf.names().into_iter().find_map(|entry| {
        (entry.name_id == ttf_parser::name_id::FAMILY).then(|| entry.to_string()).flatten()
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn axis_range_copy() {
        let a = AxisRange { min: 100.0, default: 400.0, max: 900.0 };
        let b = a;
        assert_eq!(a, b);
    }
}
