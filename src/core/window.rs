//! Window record and painting.
//!
//! A window is owned by exactly one drawing client and referenced (not
//! owned) by the display's z-order list. The core does not paint window
//! content itself — a window either carries a content bitmap rendered by
//! its client or falls back to a solid fill.

use bitflags::bitflags;

use crate::core::client::ClientId;
use crate::gfx::{Bitmap, Color, GfxContext, GfxResult, Point, Rect};

/// Window identifier, unique for the lifetime of the display.
pub type WindowId = u32;

bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct WindowFlags: u32 {
        /// Transient window without decorations (menus, tooltips).
        const POPUP = 0x01;
        /// Kept above all non-topmost windows.
        const TOPMOST = 0x02;
        /// Belongs to the system UI layer.
        const SYSTEM = 0x04;
    }
}

bitflags! {
    /// Which edges an interactive resize drags.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct ResizeEdges: u32 {
        const TOP = 0x01;
        const BOTTOM = 0x02;
        const LEFT = 0x04;
        const RIGHT = 0x08;
    }
}

/// Interactive move/resize in progress.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum InteractiveOp {
    Move { delta: Point },
    Resize { edges: ResizeEdges, delta: Point },
}

/// Color of the interactive move/resize preview frame.
const PREVIEW_COLOR: Color = Color::rgb_i16(0xffff, 0xffff, 0xffff);

/// A window on the desktop.
pub struct Window {
    pub id: WindowId,
    /// Owning client (id-based back-reference).
    pub client: ClientId,
    /// Bounding rectangle in window-local coordinates.
    pub rect: Rect,
    /// Position of the window-local origin on the desktop.
    pub dpos: Point,
    pub flags: WindowFlags,
    /// Fallback fill color used while the window has no content bitmap.
    pub color: Color,
    /// Content rendered by the owning client, if any.
    content: Option<Box<dyn Bitmap>>,
    op: Option<InteractiveOp>,
}

impl Window {
    pub(crate) fn new(
        id: WindowId,
        client: ClientId,
        rect: Rect,
        dpos: Point,
        flags: WindowFlags,
    ) -> Self {
        Self {
            id,
            client,
            rect,
            dpos,
            flags,
            color: Color::rgb_i16(0xc000, 0xc000, 0xc000),
            content: None,
            op: None,
        }
    }

    /// Bounding rectangle on the desktop.
    pub fn drect(&self) -> Rect {
        self.rect.translate(self.dpos)
    }

    /// Attach a content bitmap. Must have been created in the display's
    /// drawing context.
    pub fn set_content(&mut self, bitmap: Box<dyn Bitmap>) {
        self.content = Some(bitmap);
    }

    /// Paint the window, clipped to `rect` when given.
    pub fn paint(&mut self, gc: &mut dyn GfxContext, rect: Option<Rect>) -> GfxResult<()> {
        let drect = self.drect();
        let crect = match rect {
            Some(r) => drect.clip(&r),
            None => drect,
        };
        if crect.is_empty() {
            return Ok(());
        }

        match &mut self.content {
            Some(bmp) => {
                // Source rectangle in window-local coordinates
                let srect = crect.translate(-self.dpos);
                bmp.render(Some(srect), Some(self.dpos))
            }
            None => {
                gc.set_color(self.color)?;
                gc.fill_rect(crect)
            }
        }
    }

    // =========================================================================
    // Interactive move/resize
    // =========================================================================

    /// Start an interactive move.
    pub fn move_begin(&mut self) {
        assert!(self.op.is_none(), "window {} already in interactive op", self.id);
        self.op = Some(InteractiveOp::Move {
            delta: Point::default(),
        });
    }

    /// Update the move preview offset.
    pub fn move_update(&mut self, delta: Point) {
        match &mut self.op {
            Some(InteractiveOp::Move { delta: d }) => *d = delta,
            _ => panic!("window {} is not being moved", self.id),
        }
    }

    /// Finish the move, applying the final offset to the desktop position.
    pub fn move_end(&mut self) {
        match self.op.take() {
            Some(InteractiveOp::Move { delta }) => self.dpos = self.dpos + delta,
            _ => panic!("window {} is not being moved", self.id),
        }
    }

    /// Start an interactive resize dragging `edges`.
    pub fn resize_begin(&mut self, edges: ResizeEdges) {
        assert!(self.op.is_none(), "window {} already in interactive op", self.id);
        self.op = Some(InteractiveOp::Resize {
            edges,
            delta: Point::default(),
        });
    }

    /// Update the resize preview offset.
    pub fn resize_update(&mut self, delta: Point) {
        match &mut self.op {
            Some(InteractiveOp::Resize { delta: d, .. }) => *d = delta,
            _ => panic!("window {} is not being resized", self.id),
        }
    }

    /// Finish the resize, applying the final geometry.
    pub fn resize_end(&mut self) {
        match self.op.take() {
            Some(InteractiveOp::Resize { edges, delta }) => {
                self.rect = resized(self.rect, edges, delta);
            }
            _ => panic!("window {} is not being resized", self.id),
        }
    }

    /// Abort any interactive operation without applying it.
    pub fn op_abort(&mut self) {
        self.op = None;
    }

    /// Desktop rectangle the current move/resize preview occupies, if an
    /// interactive operation is in progress.
    pub fn preview_rect(&self) -> Option<Rect> {
        match self.op? {
            InteractiveOp::Move { delta } => Some(self.drect().translate(delta)),
            InteractiveOp::Resize { edges, delta } => {
                Some(resized(self.rect, edges, delta).translate(self.dpos))
            }
        }
    }

    /// Paint the move/resize preview frame, clipped to `rect` when given.
    /// No-op while no interactive operation is in progress.
    pub fn paint_preview(&mut self, gc: &mut dyn GfxContext, rect: Option<Rect>) -> GfxResult<()> {
        let Some(pr) = self.preview_rect() else {
            return Ok(());
        };

        gc.set_color(PREVIEW_COLOR)?;
        let edges = [
            Rect::new(pr.p0.x, pr.p0.y, pr.p1.x, pr.p0.y + 1),
            Rect::new(pr.p0.x, pr.p1.y - 1, pr.p1.x, pr.p1.y),
            Rect::new(pr.p0.x, pr.p0.y, pr.p0.x + 1, pr.p1.y),
            Rect::new(pr.p1.x - 1, pr.p0.y, pr.p1.x, pr.p1.y),
        ];
        for edge in edges {
            let crect = match rect {
                Some(r) => edge.clip(&r),
                None => edge,
            };
            if !crect.is_empty() {
                gc.fill_rect(crect)?;
            }
        }
        Ok(())
    }
}

impl std::fmt::Debug for Window {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Window")
            .field("id", &self.id)
            .field("client", &self.client)
            .field("rect", &self.rect)
            .field("dpos", &self.dpos)
            .field("flags", &self.flags)
            .finish_non_exhaustive()
    }
}

/// Apply a resize drag to a rectangle, keeping at least one pixel in each
/// dimension.
fn resized(rect: Rect, edges: ResizeEdges, delta: Point) -> Rect {
    let mut r = rect;
    if edges.contains(ResizeEdges::LEFT) {
        r.p0.x = (r.p0.x + delta.x).min(r.p1.x - 1);
    }
    if edges.contains(ResizeEdges::RIGHT) {
        r.p1.x = (r.p1.x + delta.x).max(r.p0.x + 1);
    }
    if edges.contains(ResizeEdges::TOP) {
        r.p0.y = (r.p0.y + delta.y).min(r.p1.y - 1);
    }
    if edges.contains(ResizeEdges::BOTTOM) {
        r.p1.y = (r.p1.y + delta.y).max(r.p0.y + 1);
    }
    r
}
