//! Graphics capability contract consumed by the display core.
//!
//! A [`GfxContext`] is any drawable surface: a physical output device, the
//! fan-out context replicating to several devices, or the memory-backed
//! backbuffer context. The core sequences calls into these; it never
//! rasterizes anything itself.

use std::sync::{Arc, Mutex};

use bitflags::bitflags;
use thiserror::Error;

use super::color::Color;
use super::rect::{Point, Rect};

/// Errors surfaced by graphics capability implementations.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum GfxError {
    #[error("out of memory")]
    OutOfMemory,

    #[error("invalid argument")]
    InvalidArg,

    #[error("output device i/o error: {0}")]
    Io(String),

    #[error("operation not supported")]
    NotSupported,
}

pub type GfxResult<T> = Result<T, GfxError>;

bitflags! {
    /// Bitmap creation flags.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct BitmapFlags: u32 {
        /// Pixels equal to the key color are transparent when rendering.
        const COLORKEY = 0x01;
    }
}

/// Parameters for bitmap creation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BitmapParams {
    /// Bounding rectangle in the bitmap's own coordinate space.
    /// `p0` may be negative (cursor hotspot convention).
    pub rect: Rect,
    pub flags: BitmapFlags,
    /// Transparency key, used when `COLORKEY` is set.
    pub key_color: u32,
}

impl BitmapParams {
    pub fn new(rect: Rect) -> Self {
        Self {
            rect,
            flags: BitmapFlags::empty(),
            key_color: 0,
        }
    }
}

/// Shared pixel storage backing a bitmap.
///
/// Several bitmaps may alias one allocation — the fan-out context creates
/// one bitmap per output over a single buffer, and the backbuffer context
/// draws into the allocation of a bitmap owned by the fan-out context.
#[derive(Clone)]
pub struct BitmapAlloc {
    /// Row stride in pixels.
    pub pitch: usize,
    /// Pixel storage, 0x00RRGGBB, row-major from the bitmap rect's `p0`.
    pub pixels: Arc<Mutex<Vec<u32>>>,
}

impl BitmapAlloc {
    /// Allocate zeroed storage sized for `rect`.
    pub fn for_rect(rect: &Rect) -> Self {
        let dims = rect.dims();
        let pitch = dims.x.max(0) as usize;
        let size = pitch * dims.y.max(0) as usize;
        Self {
            pitch,
            pixels: Arc::new(Mutex::new(vec![0; size])),
        }
    }

    /// Whether two allocations alias the same storage.
    pub fn aliases(&self, other: &BitmapAlloc) -> bool {
        Arc::ptr_eq(&self.pixels, &other.pixels)
    }
}

impl std::fmt::Debug for BitmapAlloc {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BitmapAlloc")
            .field("pitch", &self.pitch)
            .finish_non_exhaustive()
    }
}

/// A drawable surface.
pub trait GfxContext: Send {
    /// Set the color used by subsequent fill operations.
    fn set_color(&mut self, color: Color) -> GfxResult<()>;

    /// Fill a rectangle with the current color.
    fn fill_rect(&mut self, rect: Rect) -> GfxResult<()>;

    /// Frame boundary; flush any batched output.
    fn update(&mut self) -> GfxResult<()> {
        Ok(())
    }

    /// Create a bitmap in this context. When `alloc` is given the bitmap
    /// aliases that storage instead of allocating its own.
    fn create_bitmap(
        &mut self,
        params: &BitmapParams,
        alloc: Option<BitmapAlloc>,
    ) -> GfxResult<Box<dyn Bitmap>>;
}

/// A bitmap created in some [`GfxContext`].
pub trait Bitmap: Send {
    /// Render (part of) the bitmap into its owning context.
    ///
    /// `srect` selects a sub-rectangle in bitmap coordinates (whole bitmap
    /// when `None`); `offs` translates it to the destination position.
    fn render(&mut self, srect: Option<Rect>, offs: Option<Point>) -> GfxResult<()>;

    /// The pixel storage backing this bitmap.
    fn allocation(&self) -> BitmapAlloc;
}

/// Read a pixel out of an allocation, relative to `rect`'s origin.
/// Readback helper for tests and screenshots; not part of the hot path.
pub fn alloc_pixel(alloc: &BitmapAlloc, rect: &Rect, p: Point) -> u32 {
    let idx = (p.y - rect.p0.y) as usize * alloc.pitch + (p.x - rect.p0.x) as usize;
    alloc.pixels.lock().unwrap()[idx]
}
