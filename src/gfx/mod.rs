//! Graphics capability layer consumed by the display core.

pub mod color;
pub mod context;
pub mod fanout;
pub mod memgc;
pub mod rect;

#[cfg(test)]
pub(crate) mod testgc;

pub use color::Color;
pub use context::{
    Bitmap, BitmapAlloc, BitmapFlags, BitmapParams, GfxContext, GfxError, GfxResult,
};
pub use fanout::FanoutGc;
pub use memgc::{MemGc, MemGcHooks, NullHooks};
pub use rect::{Point, Rect};
