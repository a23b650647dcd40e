//! Display server core: the shared state aggregate and everything it
//! owns.

pub mod client;
pub mod composite;
pub mod cursor;
pub mod ddev;
pub mod display;
pub mod errors;
pub mod events;
pub mod seat;
pub mod stacking;
pub mod window;
pub mod wmclient;

pub use client::{Client, ClientId};
pub use cursor::{builtin_cursors, Cursor, StockCursor};
pub use ddev::{DdevId, DisplayDevice};
pub use display::{Display, DisplayFlags, DisplayInfo, SharedDisplay};
pub use errors::{DisplayError, Result};
pub use events::{
    DeviceId, KeyAction, KeyboardEvent, PointerAction, PointerEvent, WindowEvent,
};
pub use seat::{Seat, SeatId};
pub use window::{ResizeEdges, Window, WindowFlags, WindowId};
pub use wmclient::{WmClient, WmClientId, WmEventSink};
