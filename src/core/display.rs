//! The display aggregate.
//!
//! Owns every piece of server-side state: clients and their windows, WM
//! clients, seats, display devices, the cursor set and the z-order list.
//! All operations take `&mut self`; concurrent callers share the
//! aggregate through [`SharedDisplay`] and lock around each call.

use std::sync::{Arc, Mutex};

use bitflags::bitflags;
use tracing::{debug, info};

use crate::core::client::{Client, ClientId};
use crate::core::cursor::{builtin_cursors, Cursor};
use crate::core::ddev::{DdevId, DisplayDevice};
use crate::core::seat::{Seat, SeatId};
use crate::core::window::WindowId;
use crate::core::wmclient::{WmClient, WmClientId, WmEventSink};
use crate::gfx::{Bitmap, Color, FanoutGc, GfxContext, MemGc, Rect};

bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct DisplayFlags: u32 {
        /// Composite into a memory backbuffer and flush damaged regions,
        /// instead of painting devices directly.
        const DOUBLE_BUFFERED = 0x01;
    }
}

/// Basic display parameters reported to clients.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DisplayInfo {
    /// Desktop bounding rectangle.
    pub rect: Rect,
    pub flags: DisplayFlags,
}

/// Display shared between server tasks; every operation locks the whole
/// aggregate.
pub type SharedDisplay = Arc<Mutex<Display>>;

/// Memory backbuffer: a bitmap created in the fan-out context plus a
/// memory context drawing into its allocation.
pub(crate) struct Backbuffer {
    pub bitmap: Box<dyn Bitmap>,
    pub gc: MemGc,
}

/// Output plumbing, grouped so paint code can borrow it independently of
/// the client and seat collections.
pub(crate) struct OutputState {
    /// Fan-out over all attached devices. `None` until the first device
    /// attaches.
    pub fbgc: Option<FanoutGc>,
    pub backbuf: Option<Backbuffer>,
    /// Damage accumulated by backbuffer draws since the last flush.
    pub dirty: Arc<Mutex<Rect>>,
}

impl OutputState {
    /// The context server-side painting goes through: the backbuffer when
    /// double-buffering, the fan-out otherwise.
    pub fn gc(&mut self) -> Option<&mut dyn GfxContext> {
        match (&mut self.backbuf, &mut self.fbgc) {
            (Some(bb), _) => Some(&mut bb.gc),
            (None, Some(fb)) => Some(fb),
            (None, None) => None,
        }
    }
}

/// The display server's central state.
pub struct Display {
    pub(crate) rect: Rect,
    pub bg_color: Color,
    pub(crate) flags: DisplayFlags,
    pub(crate) clients: Vec<Client>,
    pub(crate) wmclients: Vec<WmClient>,
    pub(crate) seats: Vec<Seat>,
    pub(crate) ddevs: Vec<DisplayDevice>,
    pub(crate) cursors: Vec<Cursor>,
    /// Window ids in z-order, front (topmost) first. Windows themselves
    /// are owned by their clients.
    pub(crate) windows: Vec<WindowId>,
    pub(crate) output: OutputState,
    pub(crate) next_wnd_id: WindowId,
    next_client_id: ClientId,
    next_wmclient_id: WmClientId,
    next_seat_id: SeatId,
    next_ddev_id: DdevId,
}

impl Display {
    /// Create an empty display. The desktop rectangle stays empty until
    /// the first display device attaches.
    pub fn new(flags: DisplayFlags) -> Self {
        Self {
            rect: Rect::EMPTY,
            bg_color: Color::rgb_i16(0x8000, 0xc800, 0xffff),
            flags,
            clients: Vec::new(),
            wmclients: Vec::new(),
            seats: Vec::new(),
            ddevs: Vec::new(),
            cursors: builtin_cursors(),
            windows: Vec::new(),
            output: OutputState {
                fbgc: None,
                backbuf: None,
                dirty: Arc::new(Mutex::new(Rect::EMPTY)),
            },
            next_wnd_id: 1,
            next_client_id: 1,
            next_wmclient_id: 1,
            next_seat_id: 1,
            next_ddev_id: 1,
        }
    }

    /// Wrap the display for sharing between tasks.
    pub fn into_shared(self) -> SharedDisplay {
        Arc::new(Mutex::new(self))
    }

    /// Tear the display down. All connections must have been detached
    /// first.
    pub fn destroy(self) {
        assert!(self.clients.is_empty(), "destroying display with live clients");
        assert!(
            self.wmclients.is_empty(),
            "destroying display with live WM clients"
        );
        assert!(self.seats.is_empty(), "destroying display with live seats");
    }

    /// Desktop bounding rectangle (empty before the first device).
    pub fn rect(&self) -> Rect {
        self.rect
    }

    pub fn info(&self) -> DisplayInfo {
        DisplayInfo {
            rect: self.rect,
            flags: self.flags,
        }
    }

    // =========================================================================
    // Connection lifecycle
    // =========================================================================

    /// Attach a new drawing client.
    pub fn add_client(&mut self) -> ClientId {
        let id = self.next_client_id;
        self.next_client_id += 1;
        self.clients.push(Client::new(id));
        debug!("client {} attached", id);
        id
    }

    /// Detach a drawing client. All of its windows must have been
    /// destroyed first.
    pub fn remove_client(&mut self, id: ClientId) {
        let idx = self
            .clients
            .iter()
            .position(|c| c.id == id)
            .unwrap_or_else(|| panic!("client {} is not attached", id));
        assert_eq!(
            self.clients[idx].window_count(),
            0,
            "detaching client {} with live windows",
            id
        );
        self.clients.remove(idx);
        debug!("client {} detached", id);
    }

    pub fn client(&self, id: ClientId) -> Option<&Client> {
        self.clients.iter().find(|c| c.id == id)
    }

    pub fn client_mut(&mut self, id: ClientId) -> Option<&mut Client> {
        self.clients.iter_mut().find(|c| c.id == id)
    }

    /// Attach a window management client observing the window population.
    pub fn add_wmclient(&mut self, sink: Box<dyn WmEventSink>) -> WmClientId {
        let id = self.next_wmclient_id;
        self.next_wmclient_id += 1;
        self.wmclients.push(WmClient::new(id, sink));
        debug!("WM client {} attached", id);
        id
    }

    pub fn remove_wmclient(&mut self, id: WmClientId) {
        let idx = self
            .wmclients
            .iter()
            .position(|c| c.id == id)
            .unwrap_or_else(|| panic!("WM client {} is not attached", id));
        self.wmclients.remove(idx);
        debug!("WM client {} detached", id);
    }

    /// Add a seat.
    pub fn add_seat(&mut self, name: impl Into<String>) -> SeatId {
        let id = self.next_seat_id;
        self.next_seat_id += 1;
        let seat = Seat::new(id, name);
        info!("seat {} ({:?}) added", id, seat.name);
        self.seats.push(seat);
        id
    }

    pub fn remove_seat(&mut self, id: SeatId) {
        let idx = self
            .seats
            .iter()
            .position(|s| s.id == id)
            .unwrap_or_else(|| panic!("seat {} does not exist", id));
        self.seats.remove(idx);
    }

    pub fn seat(&self, id: SeatId) -> Option<&Seat> {
        self.seats.iter().find(|s| s.id == id)
    }

    pub fn seat_mut(&mut self, id: SeatId) -> Option<&mut Seat> {
        self.seats.iter_mut().find(|s| s.id == id)
    }

    /// Register an additional cursor; returns its index in the cursor set.
    pub fn add_cursor(&mut self, cursor: Cursor) -> usize {
        self.cursors.push(cursor);
        self.cursors.len() - 1
    }

    /// Remove a cursor from the set. Cursors behind it shift down one
    /// index; seats referencing the removed cursor fall back to the
    /// first one.
    pub fn remove_cursor(&mut self, index: usize) {
        assert!(
            index < self.cursors.len(),
            "cursor {} is not attached",
            index
        );
        self.cursors.remove(index);
        for seat in &mut self.seats {
            if seat.cursor == index {
                seat.cursor = 0;
            } else if seat.cursor > index {
                seat.cursor -= 1;
            }
        }
    }

    pub(crate) fn alloc_ddev_id(&mut self) -> DdevId {
        let id = self.next_ddev_id;
        self.next_ddev_id += 1;
        id
    }

    pub fn ddev(&self, id: DdevId) -> Option<&DisplayDevice> {
        self.ddevs.iter().find(|d| d.id == id)
    }
}
