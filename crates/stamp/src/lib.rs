//! The top-level entry point of the stamp rendering engine.
//!
//! `render_stamp` is the one call a host application makes: given an
//! already-decoded [`StampRequest`], it resolves fonts, lays out every text
//! element on the straight, circular, or glyph-variant path, composites the
//! result onto a background, and returns the encoded PNG bytes plus a
//! report of which elements had their font size shrunk to fit.
//!
//! Per-element failures never abort a render; they are logged via
//! `tracing::warn!` and the element is dropped from the output. Only a
//! failure to produce any image bytes at all turns into an `Err` returned
//! to the caller.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use stamp_core::{CanvasGeometry, FontAdjustment, FontAdjustmentReport, StampError, StampResult};
use stamp_kit::FontRegistryConfig;
use stamp_layout::{CircularOutcome, TextElement};
use stamp_text::{FontRegistry, VariableInstancer};
use tiny_skia::Pixmap;
use tracing::warn;

/// An already-decoded render request. This crate never touches
/// `stdin`/`stdout` or a filesystem path to produce one — decoding that
/// envelope is an external adapter's job.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StampRequest {
    /// The declared canvas width, before the auto-scaling rule.
    pub width: u32,
    /// The declared canvas height, before the auto-scaling rule.
    pub height: u32,
    /// An optional background image, blitted before any text element.
    #[serde(default)]
    pub background_image_path: Option<PathBuf>,
    /// The text elements to render, in z-order (later elements overwrite
    /// earlier ones where they overlap).
    #[serde(default)]
    pub text_elements: Vec<TextElement>,
    /// The font mapping this request should resolve families against.
    #[serde(default)]
    pub font_registry: FontRegistryConfig,
}

/// The construction-time configuration for [`render_stamp`]: currently just
/// the scratch directory [`VariableInstancer`] caches into, but kept as its
/// own struct so future knobs have a home without threading new parameters
/// through the call.
#[derive(Debug, Clone)]
pub struct OrchestratorConfig {
    /// Where [`VariableInstancer`] caches materialized variable-font
    /// instances. Defaults to a subdirectory of the system temp directory.
    pub variable_font_scratch_dir: PathBuf,
}

impl Default for OrchestratorConfig {
    fn default() -> Self {
        Self { variable_font_scratch_dir: std::env::temp_dir().join("stamp-variable-instances") }
    }
}

/// The result of a successful render: the encoded image plus a report of
/// any per-element font-size adjustments made to satisfy a fit constraint.
#[derive(Debug, Clone)]
pub struct StampOutput {
    /// The rendered canvas, encoded as PNG bytes.
    pub image_bytes: Vec<u8>,
    /// Per-element font-size adjustments, keyed by `TextElement::id`.
    /// Elements that were skipped (empty value, unrecoverable error) have
    /// no entry at all, rather than a sentinel one.
    pub font_size_adjustments: FontAdjustmentReport,
}

/// Render `request` into a single stamp image.
///
/// Only a failure to produce any image bytes at all (canvas allocation, or
/// — practically unreachable for a validly allocated canvas — PNG
/// encoding) returns `Err`; every other failure is element-scoped and
/// swallowed with a logged diagnostic.
#[tracing::instrument(level = "info", skip(request, config), fields(elements = request.text_elements.len()))]
pub fn render_stamp(request: &StampRequest, config: &OrchestratorConfig) -> StampResult<StampOutput> {
    let canvas_geo = CanvasGeometry::new(request.width, request.height);
    let mut canvas = stamp_render::make_canvas(canvas_geo.width(), canvas_geo.height())?;

    if let Some(path) = &request.background_image_path {
        if let Err(err) = stamp_render::blit_background(&mut canvas, path) {
            warn!(?err, path = %path.display(), "failed to load background image, continuing without one");
        }
    }

    let registry = stamp_kit::build_registry(&request.font_registry);
    let instancer = build_instancer(config);

    let mut report = FontAdjustmentReport::new();
    for element in &request.text_elements {
        match render_element(&mut canvas, &registry, &instancer, &canvas_geo, element) {
            Ok(Some(adjustment)) => report.record(element.id.clone(), adjustment),
            Ok(None) => {}
            Err(err) => {
                warn!(id = %element.id, ?err, "skipping text element");
            }
        }
    }

    if canvas_geo.scale_factor > 1.0 {
        stamp_render::sharpen(&mut canvas);
    }

    // `Pixmap::encode_png` only fails for a zero-sized pixmap, which
    // `make_canvas` above already rules out; reusing the allocation-failure
    // variant keeps the public error surface from growing a variant that
    // is, in practice, unreachable.
    let image_bytes = canvas.encode_png().map_err(|_| StampError::CanvasAllocationFailed {
        width: canvas_geo.width(),
        height: canvas_geo.height(),
    })?;

    Ok(StampOutput { image_bytes, font_size_adjustments: report })
}

/// Build the `VariableInstancer`, falling back to the bare system temp
/// directory if the configured scratch directory cannot be created — this
/// is infrastructure setup, not a per-element failure, so it degrades
/// rather than aborting the whole render.
fn build_instancer(config: &OrchestratorConfig) -> VariableInstancer {
    match VariableInstancer::new(&config.variable_font_scratch_dir) {
        Ok(instancer) => instancer,
        Err(err) => {
            warn!(
                ?err,
                dir = %config.variable_font_scratch_dir.display(),
                "failed to create variable-instance scratch directory, falling back to the system temp directory"
            );
            VariableInstancer::new(std::env::temp_dir())
                .expect("the system temp directory must already exist and be writable")
        }
    }
}

/// Render one `TextElement`, dispatching to the variant, circular, or
/// linear path, and returning the font-size adjustment to record (if any).
/// An empty `value` is skipped silently; any other failure propagates for
/// the caller to log and swallow.
fn render_element(
    canvas: &mut Pixmap,
    registry: &FontRegistry,
    instancer: &VariableInstancer,
    canvas_geo: &CanvasGeometry,
    element: &TextElement,
) -> StampResult<Option<FontAdjustment>> {
    if element.value.is_empty() {
        return Ok(None);
    }

    if element.uses_variants() {
        let placement = stamp_layout::layout_variant(registry, instancer, canvas_geo, element)?;
        stamp_render::render_variant(canvas, &placement, element.color);
        // The variant path has no fit-to-width loop: it uniformly rescales
        // the strip instead, so there is nothing to report.
        return Ok(None);
    }

    if element.position.is_circular {
        return match stamp_layout::layout_circular(registry, instancer, canvas_geo, element)? {
            CircularOutcome::Placed(placement) => {
                let adjustment = placement.adjustment;
                stamp_render::render_circular(canvas, &placement, element.color);
                Ok(Some(adjustment))
            }
            CircularOutcome::DegenerateRadius => {
                warn!(id = %element.id, "circular layout requested with radius <= 0, degrading to linear");
                let mut fallback = element.clone();
                fallback.position = stamp_layout::degenerate_linear_position(&element.position);
                let placement =
                    stamp_layout::layout_linear(registry, instancer, canvas_geo, &fallback)?;
                let adjustment = placement.adjustment;
                stamp_render::render_linear(canvas, &placement, element.color);
                Ok(Some(adjustment))
            }
        };
    }

    let placement = stamp_layout::layout_linear(registry, instancer, canvas_geo, element)?;
    let adjustment = placement.adjustment;
    stamp_render::render_linear(canvas, &placement, element.color);
    Ok(Some(adjustment))
}

#[cfg(test)]
mod tests {
    use super::*;
    use stamp_layout::{Color, Position, TextAlign, VerticalAlign};

    fn sample_element(id: &str) -> TextElement {
        TextElement {
            id: id.to_string(),
            value: "Hello".to_string(),
            font_family: "Arial".to_string(),
            font_size: 48.0,
            color: Color::BLACK,
            font_weight: None,
            variable_font_settings: Default::default(),
            first_variant: None,
            last_variant: None,
            is_uppercase: false,
            auto_bold: false,
            text_padding: None,
            position: Position {
                x: 100.0,
                y: 100.0,
                rotation: 0.0,
                text_align: TextAlign::Center,
                vertical_align: VerticalAlign::Middle,
                letter_spacing: 1.0,
                is_circular: false,
                radius: 0.0,
                base_angle: 0.0,
                max_angle: 0.0,
                layout_mode: Default::default(),
                baseline_position: Default::default(),
            },
        }
    }

    /// No fonts were ever registered, so every non-empty element fails to
    /// resolve a face; the render must still succeed with a blank (but
    /// valid) PNG rather than propagating `NoFontsAvailable`.
    #[test]
    fn empty_font_registry_degrades_instead_of_failing_the_whole_render() {
        let request = StampRequest {
            width: 200,
            height: 200,
            background_image_path: None,
            text_elements: vec![sample_element("t1"), sample_element("t2")],
            font_registry: FontRegistryConfig::default(),
        };
        let config = OrchestratorConfig::default();
        let output = render_stamp(&request, &config).expect("render must still succeed");

        assert!(!output.image_bytes.is_empty());
        assert!(output.font_size_adjustments.0.is_empty());
    }

    #[test]
    fn empty_value_is_skipped_without_an_adjustment_entry() {
        let mut element = sample_element("t1");
        element.value.clear();
        let request = StampRequest {
            width: 200,
            height: 200,
            background_image_path: None,
            text_elements: vec![element],
            font_registry: FontRegistryConfig::default(),
        };
        let output = render_stamp(&request, &OrchestratorConfig::default()).unwrap();
        assert!(output.font_size_adjustments.0.is_empty());
    }

    #[test]
    fn missing_background_image_is_logged_and_swallowed() {
        let request = StampRequest {
            width: 200,
            height: 200,
            background_image_path: Some(PathBuf::from("/does/not/exist.png")),
            text_elements: vec![],
            font_registry: FontRegistryConfig::default(),
        };
        let output = render_stamp(&request, &OrchestratorConfig::default())
            .expect("a missing background must not fail the render");
        assert!(!output.image_bytes.is_empty());
    }

    #[test]
    fn degenerate_radius_is_routed_through_the_linear_fallback() {
        let mut element = sample_element("t1");
        element.position.is_circular = true;
        element.position.radius = 0.0;
        element.position.base_angle = 30.0;

        let request = StampRequest {
            width: 200,
            height: 200,
            background_image_path: None,
            text_elements: vec![element],
            font_registry: FontRegistryConfig::default(),
        };
        // No font is registered, so this still exercises the routing logic
        // (DegenerateRadius -> linear layout -> NoFontsAvailable -> skipped)
        // without panicking or aborting the render.
        let output = render_stamp(&request, &OrchestratorConfig::default()).unwrap();
        assert!(output.font_size_adjustments.0.is_empty());
    }

    #[test]
    fn request_round_trips_through_json() {
        let request = StampRequest {
            width: 400,
            height: 300,
            background_image_path: None,
            text_elements: vec![sample_element("t1")],
            font_registry: FontRegistryConfig::default(),
        };
        let json = serde_json::to_string(&request).unwrap();
        let back: StampRequest = serde_json::from_str(&json).unwrap();
        assert_eq!(back.width, 400);
        assert_eq!(back.text_elements.len(), 1);
    }

    #[test]
    fn z_order_is_input_order() {
        // Two overlapping elements render in list order; with no fonts
        // registered neither actually draws glyphs, but the orchestrator
        // must still visit them in order and not reorder/drop either one
        // from the diagnostic path.
        let request = StampRequest {
            width: 200,
            height: 200,
            background_image_path: None,
            text_elements: vec![sample_element("first"), sample_element("second")],
            font_registry: FontRegistryConfig::default(),
        };
        let output = render_stamp(&request, &OrchestratorConfig::default()).unwrap();
        assert!(output.font_size_adjustments.0.is_empty());
    }
}
