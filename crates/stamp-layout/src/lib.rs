//! Pure geometry layer: turns a `TextElement` plus a resolved font into
//! placement data (glyph positions, rotation, padding) with no knowledge
//! of pixels. `stamp-render` consumes these types to rasterize.

mod circular;
mod element;
mod linear;
mod resolve;
mod variant_renderer;

pub use circular::{degenerate_linear_position, layout as layout_circular, CircularGlyph, CircularOutcome, CircularPlacement};
pub use element::{
    BaselinePosition, Color, LayoutMode, Position, TextAlign, TextElement, VerticalAlign,
};
pub use linear::{layout as layout_linear, LinearPlacement, PositionedGlyph, Rect, MIN_FONT_SIZE};
pub use resolve::{needs_synthetic_bold, resolve_font, ResolvedFont};
pub use variant_renderer::{layout as layout_variant, VariantGlyph, VariantPlacement};
