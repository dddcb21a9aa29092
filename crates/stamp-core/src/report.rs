//! The per-element font-size adjustment report returned alongside an image.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Why a text element's font size ended up different from what was
/// requested.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AdjustmentReason {
    /// The linear fit-to-width loop shrank the font.
    FitWidth,
    /// The circular fit-to-max-angle loop shrank the font.
    FitMaxAngle,
    /// The font size was not adjusted.
    None,
}

/// The recorded outcome of one element's fit loop (if any).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FontAdjustment {
    /// The font size as requested, in scaled pixels.
    pub original_size: f64,
    /// The font size actually used to render, in scaled pixels.
    pub final_size: f64,
    /// `final_size / original_size`.
    pub scale_factor_applied: f64,
    /// Why the size changed, if it did.
    pub reason: AdjustmentReason,
}

impl FontAdjustment {
    /// No adjustment took place.
    pub fn unchanged(size: f64) -> Self {
        Self {
            original_size: size,
            final_size: size,
            scale_factor_applied: 1.0,
            reason: AdjustmentReason::None,
        }
    }

    /// An adjustment took place for the given reason.
    pub fn adjusted(original_size: f64, final_size: f64, reason: AdjustmentReason) -> Self {
        Self {
            original_size,
            final_size,
            scale_factor_applied: if original_size != 0.0 {
                final_size / original_size
            } else {
                1.0
            },
            reason,
        }
    }
}

/// The collected font-size adjustments for a whole render, keyed by element
/// id.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FontAdjustmentReport(pub BTreeMap<String, FontAdjustment>);

impl FontAdjustmentReport {
    /// An empty report.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record an adjustment for the given element id.
    pub fn record(&mut self, element_id: impl Into<String>, adjustment: FontAdjustment) {
        self.0.insert(element_id.into(), adjustment);
    }
}
