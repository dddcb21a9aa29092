//! Per-face index of named alternate glyphs (`a.1`, `a.2`, ...), backing
//! `VariantRenderer`'s first/last glyph substitution.

use rustc_hash::FxHashMap;
use ttf_parser::GlyphId;

/// Maps a single-character base (`'a'`) to the glyph ids of its own base
/// glyph plus every named alternate, sorted lexicographically by full glyph
/// name (`a` < `a.1` < `a.10` < `a.2`, since this is a string sort, not a
/// numeric one — a shorter name that is a prefix of a longer one sorts
/// first). The base glyph (plain `a`, no `.suffix`) is included at index 0
/// so that `first_variant`/`last_variant` index directly into this list the
/// way the reference implementation does. Lookup, not iteration order, is
/// all that matters here, so this is keyed by `FxHashMap` rather than
/// `BTreeMap`.
#[derive(Debug, Clone, Default)]
pub struct GlyphVariantIndex {
    variants: FxHashMap<char, Vec<(String, u16)>>,
}

impl GlyphVariantIndex {
    /// Scan every glyph name in `ttf`, splitting on `.` and grouping names
    /// (base glyph and alternates alike) whose base is a single character.
    pub fn build(ttf: &ttf_parser::Face) -> Self {
        let mut variants: FxHashMap<char, Vec<(String, u16)>> = FxHashMap::default();

        for gid in 0..ttf.number_of_glyphs() {
            let Some(name) = ttf.glyph_name(GlyphId(gid)) else { continue };
            let base = name.split('.').next().unwrap_or_default();
            let mut chars = base.chars();
            let (Some(c), None) = (chars.next(), chars.next()) else { continue };
            variants.entry(c).or_default().push((name.to_string(), gid));
        }

        for list in variants.values_mut() {
            list.sort_by(|a, b| a.0.cmp(&b.0));
        }

        Self { variants }
    }

    /// Look up the `index`-th glyph (base or alternate) for `base`. An
    /// out-of-range index (or a base character with no glyph name entry at
    /// all) falls back to `None`, meaning "use the base character's own
    /// glyph via the normal cmap lookup".
    pub fn resolve(&self, base: char, index: usize) -> Option<GlyphId> {
        self.variants.get(&base)?.get(index).map(|(_, gid)| GlyphId(*gid))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn index_from(pairs: &[(&str, u16)]) -> GlyphVariantIndex {
        let mut variants: FxHashMap<char, Vec<(String, u16)>> = FxHashMap::default();
        for &(name, gid) in pairs {
            let base = name.split('.').next().unwrap();
            let mut chars = base.chars();
            if let (Some(c), None) = (chars.next(), chars.next()) {
                variants.entry(c).or_default().push((name.to_string(), gid));
            }
        }
        for list in variants.values_mut() {
            list.sort_by(|a, b| a.0.cmp(&b.0));
        }
        GlyphVariantIndex { variants }
    }

    #[test]
    fn resolves_in_lexicographic_order_with_base_glyph_at_zero() {
        let index = index_from(&[("a", 1), ("a.1", 10), ("a.2", 11), ("e", 2)]);
        assert_eq!(index.resolve('a', 0), Some(GlyphId(1)));
        assert_eq!(index.resolve('a', 1), Some(GlyphId(10)));
        assert_eq!(index.resolve('a', 2), Some(GlyphId(11)));
        assert_eq!(index.resolve('a', 3), None);
        assert_eq!(index.resolve('e', 0), Some(GlyphId(2)));
        assert_eq!(index.resolve('e', 1), None);
    }

    #[test]
    fn lexicographic_not_numeric() {
        let index = index_from(&[("a", 0), ("a.1", 1), ("a.10", 2), ("a.2", 3)]);
        // String order: "a" < "a.1" < "a.10" < "a.2".
        assert_eq!(index.resolve('a', 0), Some(GlyphId(0)));
        assert_eq!(index.resolve('a', 1), Some(GlyphId(1)));
        assert_eq!(index.resolve('a', 2), Some(GlyphId(2)));
        assert_eq!(index.resolve('a', 3), Some(GlyphId(3)));
    }

    #[test]
    fn base_char_with_no_glyph_name_entry_has_no_variants() {
        let index = index_from(&[("space", 5)]);
        assert_eq!(index.resolve('s', 0), None);
    }
}
