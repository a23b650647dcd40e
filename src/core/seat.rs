//! Seats.
//!
//! A seat is one logical user session with one keyboard focus and one
//! pointer. The routing of raw input events to seats and windows lives
//! on the display aggregate; a seat itself only carries the per-seat
//! state.

use crate::core::cursor::{Cursor, StockCursor};
use crate::core::display::Display;
use crate::core::errors::Result;
use crate::core::events::{DeviceId, KeyboardEvent, PointerAction, PointerEvent, WindowEvent};
use crate::core::window::WindowId;
use crate::gfx::{GfxContext, GfxResult, Point, Rect};

/// Seat identifier.
pub type SeatId = u32;

/// One seat: keyboard focus, pointer position and cursor shape.
pub struct Seat {
    pub id: SeatId,
    pub name: String,
    /// Window holding this seat's keyboard focus.
    pub focus: Option<WindowId>,
    /// Pointer hotspot position on the desktop.
    pub pntpos: Point,
    /// Index into the display's cursor set.
    pub cursor: usize,
}

impl Seat {
    pub(crate) fn new(id: SeatId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            focus: None,
            pntpos: Point::default(),
            cursor: StockCursor::Arrow as usize,
        }
    }

    /// Desktop rectangle the seat's pointer currently covers.
    pub fn pointer_rect(&self, cursors: &[Cursor]) -> Rect {
        cursors[self.cursor].drect(self.pntpos)
    }

    /// Paint the seat's pointer, clipped to `clip` when given.
    pub(crate) fn paint_pointer(
        &self,
        cursors: &mut [Cursor],
        gc: &mut dyn GfxContext,
        clip: Option<Rect>,
    ) -> GfxResult<()> {
        cursors[self.cursor].paint(gc, self.pntpos, clip)
    }
}

impl Display {
    /// The seat a raw input event belongs to. Always the first attached
    /// seat, regardless of device id; real per-device seat assignment is
    /// an open requirement and must not be guessed at here.
    fn seat_idx_by_idev(&self, _device: DeviceId) -> Option<usize> {
        if self.seats.is_empty() {
            None
        } else {
            Some(0)
        }
    }

    /// Move a seat's keyboard focus, notifying the windows involved.
    pub fn set_seat_focus(&mut self, seat: SeatId, wnd: Option<WindowId>) {
        let idx = self
            .seats
            .iter()
            .position(|s| s.id == seat)
            .unwrap_or_else(|| panic!("seat {} does not exist", seat));
        let old = self.seats[idx].focus;
        if old == wnd {
            return;
        }

        if let Some(prev) = old {
            self.post_to_window(prev, WindowEvent::Unfocus);
        }
        self.seats[idx].focus = wnd;
        if let Some(next) = wnd {
            self.post_to_window(next, WindowEvent::Focus);
        }
    }

    /// Switch a seat's cursor shape and repaint the pointer area.
    pub fn set_seat_cursor(&mut self, seat: SeatId, cursor: usize) -> Result<()> {
        assert!(cursor < self.cursors.len(), "unknown cursor {}", cursor);
        let idx = self
            .seats
            .iter()
            .position(|s| s.id == seat)
            .unwrap_or_else(|| panic!("seat {} does not exist", seat));
        let old = self.seats[idx].pointer_rect(&self.cursors);
        self.seats[idx].cursor = cursor;
        let new = self.seats[idx].pointer_rect(&self.cursors);
        self.paint(Some(old.envelope(&new)))
    }

    /// Route a keyboard event to the focused window of the event's seat.
    /// Events arriving while nothing is focused are dropped.
    pub fn post_keyboard_event(&mut self, event: KeyboardEvent) -> Result<()> {
        let Some(idx) = self.seat_idx_by_idev(event.device) else {
            return Ok(());
        };
        if let Some(wnd) = self.seats[idx].focus {
            self.post_to_window(wnd, WindowEvent::Keyboard(event));
        }
        Ok(())
    }

    /// Route a pointer event: movement drags the seat's pointer across
    /// the desktop, a press raises and focuses the window under the
    /// pointer, a release goes to the focused window.
    pub fn post_pointer_event(&mut self, event: PointerEvent) -> Result<()> {
        let Some(idx) = self.seat_idx_by_idev(event.device) else {
            return Ok(());
        };

        match event.action {
            PointerAction::Move(delta) => {
                let (cursor, pos) = {
                    let s = &self.seats[idx];
                    (s.cursor, s.pntpos)
                };
                let old = self.cursors[cursor].drect(pos);

                let mut np = pos + delta;
                if !self.rect.is_empty() {
                    np.x = np.x.clamp(self.rect.p0.x, self.rect.p1.x - 1);
                    np.y = np.y.clamp(self.rect.p0.y, self.rect.p1.y - 1);
                }
                self.seats[idx].pntpos = np;

                let new = self.cursors[cursor].drect(np);
                self.paint(Some(old.envelope(&new)))?;
            }
            PointerAction::Press(button) => {
                let pos = self.seats[idx].pntpos;
                let seat = self.seats[idx].id;
                if let Some(wnd) = self.window_by_pos(pos) {
                    self.window_to_top(wnd);
                    self.set_seat_focus(seat, Some(wnd));
                    let dpos = self.find_window(wnd).unwrap().dpos;
                    self.post_to_window(
                        wnd,
                        WindowEvent::Button {
                            button,
                            pressed: true,
                            pos: pos - dpos,
                        },
                    );
                    // Raising may have changed what is visible
                    self.paint(None)?;
                }
            }
            PointerAction::Release(button) => {
                let pos = self.seats[idx].pntpos;
                if let Some(wnd) = self.seats[idx].focus {
                    if let Some(dpos) = self.find_window(wnd).map(|w| w.dpos) {
                        self.post_to_window(
                            wnd,
                            WindowEvent::Button {
                                button,
                                pressed: false,
                                pos: pos - dpos,
                            },
                        );
                    }
                }
            }
        }
        Ok(())
    }

    fn post_to_window(&mut self, wnd: WindowId, event: WindowEvent) {
        if let Some(owner) = self.find_window(wnd).map(|w| w.client) {
            if let Some(client) = self.client_mut(owner) {
                client.post_event(wnd, event);
            }
        }
    }
}

impl std::fmt::Debug for Seat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Seat")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("focus", &self.focus)
            .field("pntpos", &self.pntpos)
            .finish_non_exhaustive()
    }
}
