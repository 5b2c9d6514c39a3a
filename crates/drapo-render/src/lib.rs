//! Drapo Render Library
//!
//! Canvas backends for drapo interactive objects.
//! The headless backend keeps a display list instead of pixels and reads
//! its input from a scripted queue; it drives tests and offscreen hosts.

mod headless;

use drapo_core::canvas::RegionId;
use thiserror::Error;

pub use headless::{HeadlessCanvas, PaintStats, Painted, Snapshot};

/// Canvas backend errors.
#[derive(Debug, Error)]
pub enum CanvasError {
    #[error("Region has no area: {0:?}")]
    EmptyRegion(kurbo::Rect),
    #[error("Unknown region: {0:?}")]
    UnknownRegion(RegionId),
}

/// Result type for canvas backend operations.
pub type CanvasResult<T> = Result<T, CanvasError>;
