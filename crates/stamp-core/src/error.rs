//! The error type shared by every crate in the workspace.
//!
//! A plain enum with a hand-written `Display`, no `thiserror`/`anyhow`.
//! Every variant corresponds to one of the error kinds a text element can
//! fail with; none of them are fatal to a whole render, only to the
//! element that triggered them.

use std::fmt::{self, Display, Formatter};
use std::path::PathBuf;

/// Something that went wrong while resolving a font, shaping a run, or
/// laying out a single text element.
///
/// Per the swallow-and-continue principle, almost every caller of a
/// fallible operation in this workspace logs the error (via `tracing`) and
/// substitutes a fallback rather than propagating it. The few operations
/// that truly cannot proceed (e.g. canvas allocation) bubble an error all
/// the way out of [`render_stamp`](../stamp/fn.render_stamp.html).
#[derive(Debug, Clone, PartialEq)]
pub enum StampError {
    /// The font registry has no usable face at all.
    NoFontsAvailable,
    /// A specific font file could not be parsed or read.
    FaceLoadFailed { path: PathBuf },
    /// A variable-font instantiation failed; the caller should fall back to
    /// the unmodified variable face.
    InstancingFailed { axes: Vec<(String, f32)> },
    /// Shaping produced no glyphs for non-empty input.
    ShaperFailed,
    /// A rotated or offset strip would overflow the canvas bounds.
    RotationOob,
    /// A background image could not be loaded.
    BackgroundLoadFailed { path: PathBuf },
    /// A fit loop exceeded its iteration budget without converging.
    FitLoopDiverged,
    /// The circular layout was asked to lay out on a zero radius.
    DegenerateRadius,
    /// The canvas itself could not be allocated. This is the one variant
    /// that is allowed to abort a whole render.
    CanvasAllocationFailed { width: u32, height: u32 },
}

impl Display for StampError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoFontsAvailable => {
                write!(f, "no fonts available in the registry")
            }
            Self::FaceLoadFailed { path } => {
                write!(f, "failed to load font face at {}", path.display())
            }
            Self::InstancingFailed { axes } => {
                write!(f, "failed to instantiate variable font at axes {axes:?}")
            }
            Self::ShaperFailed => write!(f, "shaping produced no glyphs"),
            Self::RotationOob => {
                write!(f, "rotated text strip would overflow the canvas")
            }
            Self::BackgroundLoadFailed { path } => {
                write!(f, "failed to load background image at {}", path.display())
            }
            Self::FitLoopDiverged => {
                write!(f, "fit loop did not converge within the iteration budget")
            }
            Self::DegenerateRadius => {
                write!(f, "circular layout requested with radius <= 0")
            }
            Self::CanvasAllocationFailed { width, height } => {
                write!(f, "failed to allocate a {width}x{height} canvas")
            }
        }
    }
}

impl std::error::Error for StampError {}

/// Convenience alias used throughout the workspace.
pub type StampResult<T> = Result<T, StampError>;
