//! Display device record.

use crate::gfx::Rect;

/// Display device identifier.
pub type DdevId = u32;

/// An attached output device. The device's drawing context is handed to
/// the display's fan-out context on attach, so only the geometry remains
/// here.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DisplayDevice {
    pub id: DdevId,
    /// Device bounding rectangle.
    pub rect: Rect,
}

impl DisplayDevice {
    pub(crate) fn new(id: DdevId, rect: Rect) -> Self {
        Self { id, rect }
    }
}
