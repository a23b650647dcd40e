//! Window stacking and lifecycle on the display aggregate.
//!
//! The z-order list holds window ids front-first. Topmost windows occupy
//! a band above all regular windows; insertion and raise both respect
//! the band, so a raised regular window still sits below every topmost
//! one.

use tracing::debug;

use crate::core::client::ClientId;
use crate::core::display::Display;
use crate::core::window::{Window, WindowFlags, WindowId};
use crate::gfx::{Point, Rect};

impl Display {
    /// Create a window for `client` and place it in the stacking order.
    ///
    /// `rect` is the window-local bounding rectangle, `dpos` the position
    /// of its origin on the desktop.
    pub fn create_window(
        &mut self,
        client: ClientId,
        rect: Rect,
        dpos: Point,
        flags: WindowFlags,
    ) -> WindowId {
        let id = self.next_wnd_id;
        self.next_wnd_id += 1;

        let window = Window::new(id, client, rect, dpos, flags);
        self.client_mut(client)
            .unwrap_or_else(|| panic!("client {} is not attached", client))
            .insert_window(window);

        self.enlist_window(id);
        self.notify_window_added(id);
        debug!("window {} created for client {}", id, client);
        id
    }

    /// Insert a window into the z-order according to its class: topmost
    /// windows go in front of everything, regular windows in front of the
    /// other regular windows but behind the topmost band.
    fn enlist_window(&mut self, id: WindowId) {
        assert!(
            !self.windows.contains(&id),
            "window {} is already enlisted",
            id
        );
        let topmost = self
            .find_window(id)
            .unwrap_or_else(|| panic!("window {} does not exist", id))
            .flags
            .contains(WindowFlags::TOPMOST);

        let idx = if topmost {
            0
        } else {
            self.windows
                .iter()
                .position(|&w| {
                    !self
                        .find_window(w)
                        .map(|wnd| wnd.flags.contains(WindowFlags::TOPMOST))
                        .unwrap_or(false)
                })
                .unwrap_or(self.windows.len())
        };
        self.windows.insert(idx, id);
    }

    /// Re-add a previously unlinked window to the stacking order.
    pub fn add_window(&mut self, id: WindowId) {
        self.enlist_window(id);
        self.notify_window_added(id);
    }

    /// Unlink a window from the stacking order. The owning client keeps
    /// the window; seats focused on it move their focus to the window
    /// that became frontmost.
    ///
    /// Panics if the window is not enlisted.
    pub fn remove_window(&mut self, id: WindowId) {
        let idx = self
            .windows
            .iter()
            .position(|&w| w == id)
            .unwrap_or_else(|| panic!("window {} is not enlisted", id));
        self.windows.remove(idx);

        // An unlinked window cannot stay mid-drag
        if let Some(wnd) = self.find_window_mut(id) {
            wnd.op_abort();
        }

        let next = self.windows.first().copied();
        let evacuees: Vec<_> = self
            .seats
            .iter()
            .filter(|s| s.focus == Some(id))
            .map(|s| s.id)
            .collect();
        for seat in evacuees {
            self.set_seat_focus(seat, next);
        }

        self.notify_window_removed(id);
    }

    /// Destroy a window: unlink it if enlisted and drop it from its
    /// owning client.
    pub fn destroy_window(&mut self, id: WindowId) {
        if self.windows.contains(&id) {
            self.remove_window(id);
        }
        let owner = self
            .find_window(id)
            .unwrap_or_else(|| panic!("window {} does not exist", id))
            .client;
        self.client_mut(owner).unwrap().take_window(id);
        debug!("window {} destroyed", id);
    }

    /// Raise a window to the top of its class.
    pub fn window_to_top(&mut self, id: WindowId) {
        let idx = self
            .windows
            .iter()
            .position(|&w| w == id)
            .unwrap_or_else(|| panic!("window {} is not enlisted", id));
        self.windows.remove(idx);
        self.enlist_window(id);
    }

    /// Look a window up across all clients.
    pub fn find_window(&self, id: WindowId) -> Option<&Window> {
        self.clients.iter().find_map(|c| c.find_window(id))
    }

    pub fn find_window_mut(&mut self, id: WindowId) -> Option<&mut Window> {
        self.clients.iter_mut().find_map(|c| c.find_window_mut(id))
    }

    /// The frontmost window whose desktop rectangle contains `pos`.
    pub fn window_by_pos(&self, pos: Point) -> Option<WindowId> {
        self.windows
            .iter()
            .copied()
            .find(|&id| {
                self.find_window(id)
                    .map(|w| w.drect().contains(pos))
                    .unwrap_or(false)
            })
    }

    /// Window ids in z-order, front first.
    pub fn zorder(&self) -> &[WindowId] {
        &self.windows
    }

    fn notify_window_added(&mut self, id: WindowId) {
        for wm in &mut self.wmclients {
            wm.sink.on_window_added(id);
        }
    }

    fn notify_window_removed(&mut self, id: WindowId) {
        for wm in &mut self.wmclients {
            wm.sink.on_window_removed(id);
        }
    }
}
