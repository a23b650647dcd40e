//! Memory-backed graphics context.
//!
//! Draws into a caller-provided pixel allocation and reports every drawn
//! rectangle to an injected observer. The display core uses one of these
//! as its backbuffer context: the observer accumulates the dirty
//! rectangle, and the frame-boundary hook fires on `update`.

use std::sync::{Arc, Mutex};

use super::color::Color;
use super::context::{Bitmap, BitmapAlloc, BitmapFlags, BitmapParams, GfxContext, GfxResult};
use super::rect::{Point, Rect};

/// Observer injected into a [`MemGc`] at construction.
///
/// `invalidate` is called once per draw with the clipped affected
/// rectangle; `update` is called at frame boundaries.
pub trait MemGcHooks: Send {
    fn invalidate(&mut self, rect: Rect);
    fn update(&mut self);
}

/// Hooks that ignore all notifications. Useful for memory output devices
/// that are read directly rather than damage-tracked.
#[derive(Debug, Default)]
pub struct NullHooks;

impl MemGcHooks for NullHooks {
    fn invalidate(&mut self, _rect: Rect) {}
    fn update(&mut self) {}
}

struct MemGcInner {
    rect: Rect,
    alloc: BitmapAlloc,
    hooks: Box<dyn MemGcHooks>,
    color: u32,
}

impl MemGcInner {
    fn fill(&mut self, rect: Rect) {
        let crect = rect.clip(&self.rect);
        if crect.is_empty() {
            return;
        }

        {
            let mut pixels = self.alloc.pixels.lock().unwrap();
            for y in crect.p0.y..crect.p1.y {
                let row = (y - self.rect.p0.y) as usize * self.alloc.pitch;
                for x in crect.p0.x..crect.p1.x {
                    pixels[row + (x - self.rect.p0.x) as usize] = self.color;
                }
            }
        }

        self.hooks.invalidate(crect);
    }

    fn blit(&mut self, bmp: &MemBitmapData, srect: Rect, offs: Point) {
        let srect = srect.clip(&bmp.params.rect);
        let drect = srect.translate(offs).clip(&self.rect);
        if drect.is_empty() {
            return;
        }

        // A bitmap may alias the context's own storage (backbuffer
        // convention); copying a region onto itself would be a no-op, but
        // locking the same buffer twice would deadlock.
        if !bmp.alloc.aliases(&self.alloc) {
            let src = bmp.alloc.pixels.lock().unwrap();
            let mut dst = self.alloc.pixels.lock().unwrap();
            let key = (bmp.params.flags.contains(BitmapFlags::COLORKEY))
                .then_some(bmp.params.key_color);

            for y in drect.p0.y..drect.p1.y {
                let srow = (y - offs.y - bmp.params.rect.p0.y) as usize * bmp.alloc.pitch;
                let drow = (y - self.rect.p0.y) as usize * self.alloc.pitch;
                for x in drect.p0.x..drect.p1.x {
                    let pix = src[srow + (x - offs.x - bmp.params.rect.p0.x) as usize];
                    if Some(pix) == key {
                        continue;
                    }
                    dst[drow + (x - self.rect.p0.x) as usize] = pix;
                }
            }
        }

        self.hooks.invalidate(drect);
    }
}

/// Memory-backed graphics context.
pub struct MemGc {
    inner: Arc<Mutex<MemGcInner>>,
}

impl MemGc {
    /// Create a memory context over `alloc`, covering `rect`, reporting
    /// draws to `hooks`.
    pub fn new(rect: Rect, alloc: BitmapAlloc, hooks: Box<dyn MemGcHooks>) -> Self {
        Self {
            inner: Arc::new(Mutex::new(MemGcInner {
                rect,
                alloc,
                hooks,
                color: 0,
            })),
        }
    }

    pub fn rect(&self) -> Rect {
        self.inner.lock().unwrap().rect
    }
}

impl GfxContext for MemGc {
    fn set_color(&mut self, color: Color) -> GfxResult<()> {
        self.inner.lock().unwrap().color = color.to_pixel();
        Ok(())
    }

    fn fill_rect(&mut self, rect: Rect) -> GfxResult<()> {
        self.inner.lock().unwrap().fill(rect);
        Ok(())
    }

    fn update(&mut self) -> GfxResult<()> {
        self.inner.lock().unwrap().hooks.update();
        Ok(())
    }

    fn create_bitmap(
        &mut self,
        params: &BitmapParams,
        alloc: Option<BitmapAlloc>,
    ) -> GfxResult<Box<dyn Bitmap>> {
        let alloc = alloc.unwrap_or_else(|| BitmapAlloc::for_rect(&params.rect));
        Ok(Box::new(MemBitmap {
            gc: Arc::clone(&self.inner),
            data: MemBitmapData {
                params: *params,
                alloc,
            },
        }))
    }
}

struct MemBitmapData {
    params: BitmapParams,
    alloc: BitmapAlloc,
}

/// Bitmap belonging to a [`MemGc`]; rendering blits into the context's
/// allocation and fires the invalidate hook.
struct MemBitmap {
    gc: Arc<Mutex<MemGcInner>>,
    data: MemBitmapData,
}

impl Bitmap for MemBitmap {
    fn render(&mut self, srect: Option<Rect>, offs: Option<Point>) -> GfxResult<()> {
        let srect = srect.unwrap_or(self.data.params.rect);
        let offs = offs.unwrap_or_default();
        self.gc.lock().unwrap().blit(&self.data, srect, offs);
        Ok(())
    }

    fn allocation(&self) -> BitmapAlloc {
        self.data.alloc.clone()
    }
}
