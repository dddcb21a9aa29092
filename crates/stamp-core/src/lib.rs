//! Shared geometry, error and reporting types for the stamp rendering
//! engine.
//!
//! This crate has no rendering logic of its own; it only holds the small
//! vocabulary (`StampError`, `CanvasGeometry`, `FontAdjustmentReport`) that
//! every other crate in the workspace depends on, so that none of them need
//! to depend on each other just to share an error type.

mod canvas;
mod error;
mod logging;
mod report;

pub use canvas::{CanvasGeometry, MIN_CANVAS_SIDE};
pub use error::{StampError, StampResult};
pub use logging::init_logging;
pub use report::{AdjustmentReason, FontAdjustment, FontAdjustmentReport};
