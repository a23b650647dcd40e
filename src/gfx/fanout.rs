//! Fan-out graphics context.
//!
//! Wraps one primary output and replicates every draw call to any number
//! of additionally attached outputs, so the rest of the server can paint
//! as if there were a single device. Bitmaps are created per output over
//! one shared allocation; outputs attached later receive alias bitmaps
//! for every live fan-out bitmap retroactively.

use std::sync::{Arc, Mutex, Weak};

use super::color::Color;
use super::context::{Bitmap, BitmapAlloc, BitmapParams, GfxContext, GfxResult};
use super::rect::{Point, Rect};

struct FanoutShared {
    outputs: Vec<Box<dyn GfxContext>>,
    /// Live bitmaps, tracked so `add_output` can extend them.
    bitmaps: Vec<Weak<Mutex<FanoutBitmapShared>>>,
}

struct FanoutBitmapShared {
    params: BitmapParams,
    alloc: BitmapAlloc,
    /// One bitmap per output, same order as `FanoutShared::outputs`.
    outputs: Vec<Box<dyn Bitmap>>,
}

/// Graphics context replicating draws to a set of outputs.
pub struct FanoutGc {
    shared: Arc<Mutex<FanoutShared>>,
}

impl FanoutGc {
    /// Create a fan-out context around a primary output.
    pub fn new(primary: Box<dyn GfxContext>) -> Self {
        Self {
            shared: Arc::new(Mutex::new(FanoutShared {
                outputs: vec![primary],
                bitmaps: Vec::new(),
            })),
        }
    }

    /// Attach an additional output.
    ///
    /// Every live fan-out bitmap gets an alias bitmap created in the new
    /// output so subsequent renders reach it too.
    pub fn add_output(&mut self, mut gc: Box<dyn GfxContext>) -> GfxResult<()> {
        let mut shared = self.shared.lock().unwrap();

        shared.bitmaps.retain(|w| w.strong_count() > 0);
        for weak in &shared.bitmaps {
            if let Some(bmp) = weak.upgrade() {
                let mut bmp = bmp.lock().unwrap();
                let alias = gc.create_bitmap(&bmp.params, Some(bmp.alloc.clone()))?;
                bmp.outputs.push(alias);
            }
        }

        shared.outputs.push(gc);
        Ok(())
    }

    pub fn output_count(&self) -> usize {
        self.shared.lock().unwrap().outputs.len()
    }
}

impl GfxContext for FanoutGc {
    fn set_color(&mut self, color: Color) -> GfxResult<()> {
        for out in &mut self.shared.lock().unwrap().outputs {
            out.set_color(color)?;
        }
        Ok(())
    }

    fn fill_rect(&mut self, rect: Rect) -> GfxResult<()> {
        for out in &mut self.shared.lock().unwrap().outputs {
            out.fill_rect(rect)?;
        }
        Ok(())
    }

    fn update(&mut self) -> GfxResult<()> {
        for out in &mut self.shared.lock().unwrap().outputs {
            out.update()?;
        }
        Ok(())
    }

    fn create_bitmap(
        &mut self,
        params: &BitmapParams,
        alloc: Option<BitmapAlloc>,
    ) -> GfxResult<Box<dyn Bitmap>> {
        let mut shared = self.shared.lock().unwrap();

        // Create in the primary output first, then alias its allocation
        // in every other output.
        let first = shared.outputs[0].create_bitmap(params, alloc)?;
        let shared_alloc = first.allocation();

        let mut per_output = vec![first];
        for out in shared.outputs.iter_mut().skip(1) {
            per_output.push(out.create_bitmap(params, Some(shared_alloc.clone()))?);
        }

        let bmp = Arc::new(Mutex::new(FanoutBitmapShared {
            params: *params,
            alloc: shared_alloc,
            outputs: per_output,
        }));
        shared.bitmaps.push(Arc::downgrade(&bmp));

        Ok(Box::new(FanoutBitmap { shared: bmp }))
    }
}

/// Bitmap replicated across all fan-out outputs.
struct FanoutBitmap {
    shared: Arc<Mutex<FanoutBitmapShared>>,
}

impl Bitmap for FanoutBitmap {
    fn render(&mut self, srect: Option<Rect>, offs: Option<Point>) -> GfxResult<()> {
        for bmp in &mut self.shared.lock().unwrap().outputs {
            bmp.render(srect, offs)?;
        }
        Ok(())
    }

    fn allocation(&self) -> BitmapAlloc {
        self.shared.lock().unwrap().alloc.clone()
    }
}
