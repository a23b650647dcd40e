//! Window management client state.
//!
//! WM clients observe the window population rather than owning windows.
//! Each carries a sink that is notified as windows come and go, so an
//! external window manager can maintain its own view of the desktop.

use crate::core::window::WindowId;

/// Window management client identifier.
pub type WmClientId = u32;

/// Receives window lifecycle notifications for one WM client.
pub trait WmEventSink: Send {
    /// A window was added to the desktop (or re-added after unlinking).
    fn on_window_added(&mut self, id: WindowId);
    /// A window was removed from the desktop.
    fn on_window_removed(&mut self, id: WindowId);
}

/// A connected window management client.
pub struct WmClient {
    pub id: WmClientId,
    pub(crate) sink: Box<dyn WmEventSink>,
}

impl WmClient {
    pub(crate) fn new(id: WmClientId, sink: Box<dyn WmEventSink>) -> Self {
        Self { id, sink }
    }
}
