//! Drawing client state.
//!
//! A client owns its windows; the display's z-order only references them
//! by id. Events destined for a client's windows are buffered in a FIFO
//! queue until the client collects them.

use std::collections::VecDeque;

use crate::core::events::WindowEvent;
use crate::core::window::{Window, WindowId};

/// Drawing client identifier.
pub type ClientId = u32;

/// A connected drawing client.
pub struct Client {
    pub id: ClientId,
    windows: Vec<Window>,
    events: VecDeque<(WindowId, WindowEvent)>,
}

impl Client {
    pub(crate) fn new(id: ClientId) -> Self {
        Self {
            id,
            windows: Vec::new(),
            events: VecDeque::new(),
        }
    }

    /// Number of windows the client currently owns.
    pub fn window_count(&self) -> usize {
        self.windows.len()
    }

    pub fn find_window(&self, id: WindowId) -> Option<&Window> {
        self.windows.iter().find(|w| w.id == id)
    }

    pub fn find_window_mut(&mut self, id: WindowId) -> Option<&mut Window> {
        self.windows.iter_mut().find(|w| w.id == id)
    }

    pub(crate) fn insert_window(&mut self, window: Window) {
        debug_assert!(self.find_window(window.id).is_none());
        self.windows.push(window);
    }

    /// Remove and return a window. Panics if the client does not own it.
    pub(crate) fn take_window(&mut self, id: WindowId) -> Window {
        let idx = self
            .windows
            .iter()
            .position(|w| w.id == id)
            .unwrap_or_else(|| panic!("client {} does not own window {}", self.id, id));
        self.windows.swap_remove(idx)
    }

    /// Queue an event for one of the client's windows.
    pub(crate) fn post_event(&mut self, window: WindowId, event: WindowEvent) {
        self.events.push_back((window, event));
    }

    /// Pop the oldest pending event, if any.
    pub fn next_event(&mut self) -> Option<(WindowId, WindowEvent)> {
        self.events.pop_front()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::window::WindowFlags;
    use crate::gfx::{Point, Rect};

    fn client_with_window() -> Client {
        let mut client = Client::new(1);
        client.insert_window(Window::new(
            7,
            1,
            Rect::new(0, 0, 10, 10),
            Point::default(),
            WindowFlags::empty(),
        ));
        client
    }

    #[test]
    fn test_find_window() {
        let client = client_with_window();
        assert!(client.find_window(7).is_some());
        assert!(client.find_window(8).is_none());
    }

    #[test]
    fn test_take_window_removes() {
        let mut client = client_with_window();
        let wnd = client.take_window(7);
        assert_eq!(wnd.id, 7);
        assert_eq!(client.window_count(), 0);
    }

    #[test]
    #[should_panic(expected = "does not own window")]
    fn test_take_unowned_window_panics() {
        client_with_window().take_window(99);
    }

    #[test]
    fn test_event_queue_is_fifo() {
        let mut client = client_with_window();
        client.post_event(7, WindowEvent::Focus);
        client.post_event(7, WindowEvent::Close);

        assert_eq!(client.next_event(), Some((7, WindowEvent::Focus)));
        assert_eq!(client.next_event(), Some((7, WindowEvent::Close)));
        assert_eq!(client.next_event(), None);
    }
}
