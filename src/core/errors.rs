//! Display core error types.
//!
//! Only recoverable conditions are expressed as errors. Broken caller
//! invariants (removing a window that is not enlisted, destroying a
//! display with live connections) are programming errors and panic
//! instead, mirroring the attach/detach preconditions of the aggregate.

use thiserror::Error;

use crate::gfx::{GfxError, Rect};

/// Errors surfaced by display core operations.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DisplayError {
    #[error("out of memory")]
    OutOfMemory,

    /// A graphics capability call failed during paint or flush. The
    /// remaining paint steps are skipped; accumulated damage is kept so a
    /// later successful paint still covers the attempted region.
    #[error("draw operation failed: {0}")]
    Draw(#[from] GfxError),

    /// A secondary display device reported geometry incompatible with the
    /// desktop rectangle established by the first device.
    #[error("display device rect {device} does not match desktop rect {desktop}")]
    GeometryMismatch { device: Rect, desktop: Rect },
}

/// Result type for display core operations.
pub type Result<T> = std::result::Result<T, DisplayError>;
