//! Font loading, variable-font instancing, glyph-variant indexing and
//! shaping: a `Font` handle around parsed `ttf-parser`/`rustybuzz` views, a
//! `FontRegistry` that answers `(family, weight)` resolution, a
//! `VariableInstancer` cache, and a `Shaper` that turns strings into glyph
//! runs.

mod font;
mod glyph_variant;
mod registry;
mod shaper;
mod variable;
mod variant;

pub use font::{AxisRange, Font, FontInfo, FontMetrics};
pub use glyph_variant::GlyphVariantIndex;
pub use registry::{FontRecord, FontRegistry};
pub use shaper::{GlyphRun, ShapedGlyph, Shaper};
pub use variable::VariableInstancer;
pub use variant::FontWeight;
