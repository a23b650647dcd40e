//! Recording graphics context for tests.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use super::color::Color;
use super::context::{Bitmap, BitmapAlloc, BitmapParams, GfxContext, GfxError, GfxResult};
use super::rect::{Point, Rect};

/// One recorded graphics operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GfxOp {
    SetColor(u32),
    FillRect(Rect),
    Update,
    CreateBitmap(Rect),
    RenderBitmap {
        srect: Option<Rect>,
        offs: Option<Point>,
    },
}

/// Graphics context that records every call and can inject failures.
pub struct TestGc {
    ops: Arc<Mutex<Vec<GfxOp>>>,
    fail_fills: Arc<AtomicBool>,
    fail_renders: Arc<AtomicBool>,
    fail_creates: Arc<AtomicBool>,
}

impl TestGc {
    /// Create a recording context; the returned handle stays valid after
    /// the context is boxed away.
    pub fn new() -> (Self, Arc<Mutex<Vec<GfxOp>>>) {
        let ops = Arc::new(Mutex::new(Vec::new()));
        let gc = Self {
            ops: Arc::clone(&ops),
            fail_fills: Arc::new(AtomicBool::new(false)),
            fail_renders: Arc::new(AtomicBool::new(false)),
            fail_creates: Arc::new(AtomicBool::new(false)),
        };
        (gc, ops)
    }

    /// A context whose fills always fail.
    pub fn failing_fills() -> Self {
        let (gc, _) = Self::new();
        gc.fail_fills.store(true, Ordering::Relaxed);
        gc
    }

    /// A context whose bitmap creation always fails.
    pub fn failing_creates() -> Self {
        let (gc, _) = Self::new();
        gc.fail_creates.store(true, Ordering::Relaxed);
        gc
    }

    /// Handle for toggling fill failure after the context is boxed.
    pub fn fail_fills_flag(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.fail_fills)
    }

    /// Handle for toggling bitmap-render failure.
    pub fn fail_renders_flag(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.fail_renders)
    }
}

impl GfxContext for TestGc {
    fn set_color(&mut self, color: Color) -> GfxResult<()> {
        self.ops
            .lock()
            .unwrap()
            .push(GfxOp::SetColor(color.to_pixel()));
        Ok(())
    }

    fn fill_rect(&mut self, rect: Rect) -> GfxResult<()> {
        if self.fail_fills.load(Ordering::Relaxed) {
            return Err(GfxError::Io("injected fill failure".into()));
        }
        self.ops.lock().unwrap().push(GfxOp::FillRect(rect));
        Ok(())
    }

    fn update(&mut self) -> GfxResult<()> {
        self.ops.lock().unwrap().push(GfxOp::Update);
        Ok(())
    }

    fn create_bitmap(
        &mut self,
        params: &BitmapParams,
        alloc: Option<BitmapAlloc>,
    ) -> GfxResult<Box<dyn Bitmap>> {
        if self.fail_creates.load(Ordering::Relaxed) {
            return Err(GfxError::OutOfMemory);
        }
        self.ops
            .lock()
            .unwrap()
            .push(GfxOp::CreateBitmap(params.rect));
        Ok(Box::new(TestBitmap {
            ops: Arc::clone(&self.ops),
            fail_renders: Arc::clone(&self.fail_renders),
            alloc: alloc.unwrap_or_else(|| BitmapAlloc::for_rect(&params.rect)),
        }))
    }
}

struct TestBitmap {
    ops: Arc<Mutex<Vec<GfxOp>>>,
    fail_renders: Arc<AtomicBool>,
    alloc: BitmapAlloc,
}

impl Bitmap for TestBitmap {
    fn render(&mut self, srect: Option<Rect>, offs: Option<Point>) -> GfxResult<()> {
        if self.fail_renders.load(Ordering::Relaxed) {
            return Err(GfxError::Io("injected render failure".into()));
        }
        self.ops
            .lock()
            .unwrap()
            .push(GfxOp::RenderBitmap { srect, offs });
        Ok(())
    }

    fn allocation(&self) -> BitmapAlloc {
        self.alloc.clone()
    }
}
