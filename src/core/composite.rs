//! Composition: device attachment, damage tracking and painting.
//!
//! With `DOUBLE_BUFFERED` set, all server-side painting lands in a memory
//! backbuffer whose draws grow a dirty rectangle; `flush` pushes the
//! damaged region to every device through the fan-out context and resets
//! the damage. Without the flag, painting goes straight to the fan-out.

use std::sync::{Arc, Mutex};

use tracing::{info, trace};

use crate::core::ddev::{DdevId, DisplayDevice};
use crate::core::display::{Backbuffer, Display, DisplayFlags, OutputState};
use crate::core::errors::{DisplayError, Result};
use crate::core::window::WindowId;
use crate::gfx::{BitmapParams, FanoutGc, GfxContext, GfxError, MemGc, MemGcHooks, Rect};

/// Backbuffer draw observer growing the display's dirty rectangle.
pub(crate) struct DirtyTracker {
    dirty: Arc<Mutex<Rect>>,
}

impl MemGcHooks for DirtyTracker {
    fn invalidate(&mut self, rect: Rect) {
        let mut dirty = self.dirty.lock().unwrap();
        *dirty = dirty.envelope(&rect);
    }

    fn update(&mut self) {}
}

impl Display {
    /// Attach a display device.
    ///
    /// The first device establishes the desktop rectangle and, when
    /// double-buffering, the backbuffer. Subsequent devices must report
    /// the same rectangle and become mirrors of the first.
    pub fn add_ddev(&mut self, rect: Rect, gc: Box<dyn GfxContext>) -> Result<DdevId> {
        if self.ddevs.is_empty() {
            self.rect = rect;
            self.output.fbgc = Some(FanoutGc::new(gc));
            if self.flags.contains(DisplayFlags::DOUBLE_BUFFERED) {
                if let Err(err) = self.alloc_backbuf() {
                    self.output.fbgc = None;
                    self.rect = Rect::EMPTY;
                    return Err(err);
                }
            }
        } else {
            if rect != self.rect {
                return Err(DisplayError::GeometryMismatch {
                    device: rect,
                    desktop: self.rect,
                });
            }
            self.output.fbgc.as_mut().unwrap().add_output(gc)?;
        }

        let id = self.alloc_ddev_id();
        self.ddevs.push(DisplayDevice::new(id, rect));
        info!("display device {} attached, desktop {}", id, self.rect);

        self.paint(None)?;
        Ok(id)
    }

    fn alloc_backbuf(&mut self) -> Result<()> {
        let rect = self.rect;
        let params = BitmapParams::new(rect);
        let bitmap = self
            .output
            .fbgc
            .as_mut()
            .unwrap()
            .create_bitmap(&params, None)
            .map_err(|err| match err {
                GfxError::OutOfMemory => DisplayError::OutOfMemory,
                other => DisplayError::Draw(other),
            })?;
        let alloc = bitmap.allocation();

        *self.output.dirty.lock().unwrap() = Rect::EMPTY;
        let hooks = Box::new(DirtyTracker {
            dirty: Arc::clone(&self.output.dirty),
        });
        self.output.backbuf = Some(Backbuffer {
            bitmap,
            gc: MemGc::new(rect, alloc, hooks),
        });
        Ok(())
    }

    /// Detach a display device.
    ///
    /// Individual fan-out outputs cannot be detached, so a device that is
    /// not the last one keeps mirroring until the display winds down; the
    /// last detach tears the whole output state down.
    pub fn remove_ddev(&mut self, id: DdevId) {
        let idx = self
            .ddevs
            .iter()
            .position(|d| d.id == id)
            .unwrap_or_else(|| panic!("display device {} is not attached", id));
        self.ddevs.remove(idx);

        if self.ddevs.is_empty() {
            self.output.backbuf = None;
            self.output.fbgc = None;
            *self.output.dirty.lock().unwrap() = Rect::EMPTY;
            self.rect = Rect::EMPTY;
            info!("last display device detached");
        }
    }

    /// The context clients and server-side painting draw through: the
    /// backbuffer when double-buffering, the device fan-out otherwise.
    /// `None` before the first device attaches.
    pub fn gc(&mut self) -> Option<&mut dyn GfxContext> {
        self.output.gc()
    }

    /// Damage accumulated since the last successful flush.
    pub fn dirty_rect(&self) -> Rect {
        *self.output.dirty.lock().unwrap()
    }

    /// Push accumulated damage from the backbuffer to the devices. A
    /// no-op without a backbuffer, since direct-mode draws already
    /// reached them.
    ///
    /// On failure the dirty rectangle is kept, so the next flush retries
    /// the same region.
    pub fn flush(&mut self) -> Result<()> {
        let OutputState {
            fbgc,
            backbuf,
            dirty,
        } = &mut self.output;

        if let Some(bb) = backbuf {
            let rect = *dirty.lock().unwrap();
            if rect.is_empty() {
                return Ok(());
            }
            trace!("flushing {}", rect);
            bb.bitmap.render(Some(rect), None)?;
            if let Some(fb) = fbgc {
                fb.update()?;
            }
            *dirty.lock().unwrap() = Rect::EMPTY;
        }
        Ok(())
    }

    /// Paint the desktop background, clipped to `rect` when given.
    pub fn paint_bg(&mut self, rect: Option<Rect>) -> Result<()> {
        let crect = match rect {
            Some(r) => r.clip(&self.rect),
            None => self.rect,
        };
        if crect.is_empty() {
            return Ok(());
        }

        let color = self.bg_color;
        let Some(gc) = self.output.gc() else {
            return Ok(());
        };
        gc.set_color(color)?;
        gc.fill_rect(crect)?;
        Ok(())
    }

    /// Repaint (part of) the desktop and flush.
    ///
    /// Order: background, windows back to front, move/resize previews,
    /// seat pointers. A draw failure aborts the remaining steps; any
    /// damage already accumulated is kept for the next attempt.
    pub fn paint(&mut self, rect: Option<Rect>) -> Result<()> {
        if self.output.gc().is_none() {
            return Ok(());
        }
        self.paint_bg(rect)?;

        let order: Vec<WindowId> = self.windows.iter().rev().copied().collect();
        {
            let output = &mut self.output;
            let clients = &mut self.clients;
            let gc = output.gc().unwrap();

            for id in order.iter().copied() {
                if let Some(wnd) = clients.iter_mut().find_map(|c| c.find_window_mut(id)) {
                    wnd.paint(gc, rect)?;
                }
            }
            for id in order.iter().copied() {
                if let Some(wnd) = clients.iter_mut().find_map(|c| c.find_window_mut(id)) {
                    wnd.paint_preview(gc, rect)?;
                }
            }

            let cursors = &mut self.cursors;
            for seat in &self.seats {
                seat.paint_pointer(cursors, gc, rect)?;
            }
        }

        self.flush()
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::core::window::WindowFlags;
    use crate::gfx::context::alloc_pixel;
    use crate::gfx::testgc::{GfxOp, TestGc};
    use crate::gfx::{BitmapAlloc, NullHooks, Point};
    use std::sync::atomic::Ordering;

    const DESKTOP: Rect = Rect::new(0, 0, 64, 64);

    #[test]
    fn test_gc_is_none_before_first_device() {
        let mut disp = Display::new(DisplayFlags::empty());
        assert!(disp.gc().is_none());
        // Painting a deviceless display is a no-op
        disp.paint(None).unwrap();
    }

    #[test]
    fn test_first_device_establishes_desktop() {
        let mut disp = Display::new(DisplayFlags::empty());
        let (gc, ops) = TestGc::new();

        disp.add_ddev(DESKTOP, Box::new(gc)).unwrap();
        assert_eq!(disp.rect(), DESKTOP);

        // Attach repainted the desktop on the device
        let ops = ops.lock().unwrap();
        assert!(ops.contains(&GfxOp::SetColor(0x0080c8ff)));
        assert!(ops.contains(&GfxOp::FillRect(DESKTOP)));
    }

    #[test]
    fn test_secondary_device_with_wrong_geometry_is_rejected() {
        let mut disp = Display::new(DisplayFlags::empty());
        let (a, _) = TestGc::new();
        let (b, _) = TestGc::new();
        disp.add_ddev(DESKTOP, Box::new(a)).unwrap();

        let err = disp
            .add_ddev(Rect::new(0, 0, 32, 32), Box::new(b))
            .unwrap_err();
        assert_eq!(
            err,
            DisplayError::GeometryMismatch {
                device: Rect::new(0, 0, 32, 32),
                desktop: DESKTOP,
            }
        );
        assert_eq!(disp.rect(), DESKTOP);
    }

    #[test]
    fn test_secondary_device_mirrors_painting() {
        let mut disp = Display::new(DisplayFlags::empty());
        let (a, a_ops) = TestGc::new();
        let (b, b_ops) = TestGc::new();
        disp.add_ddev(DESKTOP, Box::new(a)).unwrap();
        disp.add_ddev(DESKTOP, Box::new(b)).unwrap();

        a_ops.lock().unwrap().clear();
        b_ops.lock().unwrap().clear();
        disp.paint(None).unwrap();

        assert_eq!(*a_ops.lock().unwrap(), *b_ops.lock().unwrap());
        assert!(a_ops.lock().unwrap().contains(&GfxOp::FillRect(DESKTOP)));
    }

    #[test]
    fn test_unbuffered_draws_reach_device_directly() {
        let mut disp = Display::new(DisplayFlags::empty());
        let (gc, ops) = TestGc::new();
        disp.add_ddev(DESKTOP, Box::new(gc)).unwrap();
        ops.lock().unwrap().clear();

        disp.gc()
            .unwrap()
            .fill_rect(Rect::new(1, 1, 2, 2))
            .unwrap();

        assert_eq!(
            *ops.lock().unwrap(),
            vec![GfxOp::FillRect(Rect::new(1, 1, 2, 2))]
        );
        assert!(disp.dirty_rect().is_empty());
    }

    #[test]
    fn test_double_buffered_draws_accumulate_damage() {
        let mut disp = Display::new(DisplayFlags::DOUBLE_BUFFERED);
        let (gc, ops) = TestGc::new();
        disp.add_ddev(DESKTOP, Box::new(gc)).unwrap();
        ops.lock().unwrap().clear();

        let gc = disp.gc().unwrap();
        gc.fill_rect(Rect::new(2, 2, 4, 4)).unwrap();
        gc.fill_rect(Rect::new(10, 10, 12, 12)).unwrap();

        // Damage is the envelope of both draws; nothing hit the device
        assert_eq!(disp.dirty_rect(), Rect::new(2, 2, 12, 12));
        assert!(ops.lock().unwrap().is_empty());
    }

    #[test]
    fn test_flush_pushes_damage_and_resets() {
        let mut disp = Display::new(DisplayFlags::DOUBLE_BUFFERED);
        let (gc, ops) = TestGc::new();
        disp.add_ddev(DESKTOP, Box::new(gc)).unwrap();
        ops.lock().unwrap().clear();

        disp.gc().unwrap().fill_rect(Rect::new(2, 2, 6, 6)).unwrap();
        disp.flush().unwrap();

        assert!(disp.dirty_rect().is_empty());
        assert!(ops.lock().unwrap().contains(&GfxOp::RenderBitmap {
            srect: Some(Rect::new(2, 2, 6, 6)),
            offs: None,
        }));
    }

    #[test]
    fn test_direct_mode_flush_touches_no_device() {
        let mut disp = Display::new(DisplayFlags::empty());
        let (gc, ops) = TestGc::new();
        disp.add_ddev(DESKTOP, Box::new(gc)).unwrap();
        ops.lock().unwrap().clear();

        disp.flush().unwrap();
        assert!(ops.lock().unwrap().is_empty());
    }

    #[test]
    fn test_flush_without_damage_is_silent() {
        let mut disp = Display::new(DisplayFlags::DOUBLE_BUFFERED);
        let (gc, ops) = TestGc::new();
        disp.add_ddev(DESKTOP, Box::new(gc)).unwrap();
        ops.lock().unwrap().clear();

        disp.flush().unwrap();
        assert!(ops.lock().unwrap().is_empty());
    }

    #[test]
    fn test_failed_flush_keeps_damage_for_retry() {
        let mut disp = Display::new(DisplayFlags::DOUBLE_BUFFERED);
        let (gc, _) = TestGc::new();
        let fail = gc.fail_renders_flag();
        disp.add_ddev(DESKTOP, Box::new(gc)).unwrap();

        disp.gc().unwrap().fill_rect(Rect::new(2, 2, 6, 6)).unwrap();
        fail.store(true, Ordering::Relaxed);
        assert!(disp.flush().is_err());
        assert_eq!(disp.dirty_rect(), Rect::new(2, 2, 6, 6));

        fail.store(false, Ordering::Relaxed);
        disp.flush().unwrap();
        assert!(disp.dirty_rect().is_empty());
    }

    #[test]
    fn test_paint_draw_failure_propagates() {
        let mut disp = Display::new(DisplayFlags::empty());
        let (gc, _) = TestGc::new();
        let fail = gc.fail_fills_flag();
        disp.add_ddev(DESKTOP, Box::new(gc)).unwrap();

        fail.store(true, Ordering::Relaxed);
        assert!(matches!(disp.paint(None), Err(DisplayError::Draw(_))));
    }

    #[test]
    fn test_backbuffer_allocation_failure_rolls_back_attach() {
        let mut disp = Display::new(DisplayFlags::DOUBLE_BUFFERED);
        let gc = TestGc::failing_creates();

        let err = disp.add_ddev(DESKTOP, Box::new(gc)).unwrap_err();
        assert_eq!(err, DisplayError::OutOfMemory);
        assert!(disp.rect().is_empty());
        assert!(disp.gc().is_none());

        // A working device can still attach afterwards
        let (gc, _) = TestGc::new();
        disp.add_ddev(DESKTOP, Box::new(gc)).unwrap();
        assert_eq!(disp.rect(), DESKTOP);
    }

    #[test]
    fn test_removing_last_device_tears_output_down() {
        let mut disp = Display::new(DisplayFlags::DOUBLE_BUFFERED);
        let (gc, _) = TestGc::new();
        let id = disp.add_ddev(DESKTOP, Box::new(gc)).unwrap();

        disp.remove_ddev(id);
        assert!(disp.rect().is_empty());
        assert!(disp.gc().is_none());
    }

    #[test]
    #[should_panic(expected = "is not attached")]
    fn test_removing_unknown_device_panics() {
        Display::new(DisplayFlags::empty()).remove_ddev(5);
    }

    #[test]
    fn test_paint_layers_background_windows_pointer() {
        let mut disp = Display::new(DisplayFlags::empty());
        let (gc, ops) = TestGc::new();
        disp.add_ddev(DESKTOP, Box::new(gc)).unwrap();

        let client = disp.add_client();
        disp.create_window(
            client,
            Rect::new(0, 0, 10, 10),
            Point::new(4, 4),
            WindowFlags::empty(),
        );
        disp.add_seat("default");

        ops.lock().unwrap().clear();
        disp.paint(None).unwrap();

        let ops = ops.lock().unwrap();
        let bg = ops
            .iter()
            .position(|op| *op == GfxOp::FillRect(DESKTOP))
            .unwrap();
        let wnd = ops
            .iter()
            .position(|op| *op == GfxOp::FillRect(Rect::new(4, 4, 14, 14)))
            .unwrap();
        let pointer = ops
            .iter()
            .position(|op| matches!(op, GfxOp::RenderBitmap { .. }))
            .unwrap();
        assert!(bg < wnd && wnd < pointer);
    }

    #[test]
    fn test_end_to_end_composition_into_memory_device() {
        let dev_alloc = BitmapAlloc::for_rect(&DESKTOP);
        let dev = MemGc::new(DESKTOP, dev_alloc.clone(), Box::new(NullHooks));

        let mut disp = Display::new(DisplayFlags::DOUBLE_BUFFERED);
        disp.add_ddev(DESKTOP, Box::new(dev)).unwrap();

        let client = disp.add_client();
        disp.create_window(
            client,
            Rect::new(0, 0, 8, 8),
            Point::new(10, 10),
            WindowFlags::empty(),
        );
        disp.paint(None).unwrap();

        // Background outside the window, window fill inside
        assert_eq!(alloc_pixel(&dev_alloc, &DESKTOP, Point::new(0, 0)), 0x0080c8ff);
        assert_eq!(
            alloc_pixel(&dev_alloc, &DESKTOP, Point::new(12, 12)),
            0x00c0c0c0
        );
    }
}
