//! Pointer cursors.
//!
//! Cursor glyphs ship as ASCII art and are rasterized lazily into a
//! color-keyed bitmap the first time they are painted, so the bitmap is
//! always created in whatever drawing context the display ended up with.

use crate::gfx::{
    Bitmap, BitmapFlags, BitmapParams, GfxContext, GfxResult, Point, Rect,
};

/// Transparency key used by cursor bitmaps.
const KEY_COLOR: u32 = 0x00ff00ff;
const BLACK: u32 = 0x00000000;
const WHITE: u32 = 0x00ffffff;

/// Index into the display's built-in cursor set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StockCursor {
    Arrow = 0,
    /// Vertical resize (top/bottom edge).
    SizeUd = 1,
    /// Horizontal resize (left/right edge).
    SizeLr = 2,
    /// Diagonal resize, upper-left/lower-right.
    SizeUldr = 3,
    /// Diagonal resize, upper-right/lower-left.
    SizeUrdl = 4,
    IBeam = 5,
}

/// A cursor glyph.
///
/// `rect` is hotspot-relative; its origin may be negative so that
/// rendering at the pointer position puts the hotspot under the pointer.
pub struct Cursor {
    pub rect: Rect,
    rows: &'static [&'static str],
    bitmap: Option<Box<dyn Bitmap>>,
}

impl Cursor {
    /// Create a cursor from ASCII art rows. `'X'` paints black, `'.'`
    /// paints white, anything else is transparent. `hotspot` is given in
    /// row/column coordinates of the art.
    pub fn new(hotspot: Point, rows: &'static [&'static str]) -> Self {
        let width = rows.iter().map(|r| r.len()).max().unwrap_or(0) as i32;
        let height = rows.len() as i32;
        Self {
            rect: Rect::new(-hotspot.x, -hotspot.y, width - hotspot.x, height - hotspot.y),
            rows,
            bitmap: None,
        }
    }

    /// Desktop rectangle the cursor covers when the pointer is at `pos`.
    pub fn drect(&self, pos: Point) -> Rect {
        self.rect.translate(pos)
    }

    /// Paint the cursor with its hotspot at `pos`, clipped to `clip` when
    /// given.
    pub fn paint(
        &mut self,
        gc: &mut dyn GfxContext,
        pos: Point,
        clip: Option<Rect>,
    ) -> GfxResult<()> {
        let drect = self.drect(pos);
        let crect = match clip {
            Some(r) => drect.clip(&r),
            None => drect,
        };
        if crect.is_empty() {
            return Ok(());
        }

        if self.bitmap.is_none() {
            self.bitmap = Some(self.rasterize(gc)?);
        }

        let srect = crect.translate(-pos);
        self.bitmap
            .as_mut()
            .unwrap()
            .render(Some(srect), Some(pos))
    }

    fn rasterize(&self, gc: &mut dyn GfxContext) -> GfxResult<Box<dyn Bitmap>> {
        let mut params = BitmapParams::new(self.rect);
        params.flags = BitmapFlags::COLORKEY;
        params.key_color = KEY_COLOR;
        let bitmap = gc.create_bitmap(&params, None)?;

        let alloc = bitmap.allocation();
        let mut pixels = alloc.pixels.lock().unwrap();
        for (y, row) in self.rows.iter().enumerate() {
            for x in 0..alloc.pitch {
                pixels[y * alloc.pitch + x] = match row.as_bytes().get(x) {
                    Some(b'X') => BLACK,
                    Some(b'.') => WHITE,
                    _ => KEY_COLOR,
                };
            }
        }
        drop(pixels);

        Ok(bitmap)
    }
}

impl std::fmt::Debug for Cursor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Cursor")
            .field("rect", &self.rect)
            .finish_non_exhaustive()
    }
}

/// The built-in cursor set, indexed by [`StockCursor`].
pub fn builtin_cursors() -> Vec<Cursor> {
    vec![
        // Arrow, hotspot at the tip
        Cursor::new(
            Point::new(0, 0),
            &[
                "X       ",
                "XX      ",
                "X.X     ",
                "X..X    ",
                "X...X   ",
                "X....X  ",
                "X.....X ",
                "X..XXXXX",
                "X.X     ",
                "XX      ",
                "X       ",
            ],
        ),
        // Vertical resize
        Cursor::new(
            Point::new(3, 4),
            &[
                "   X   ",
                "  X.X  ",
                " X...X ",
                "   X   ",
                "   X   ",
                "   X   ",
                " X...X ",
                "  X.X  ",
                "   X   ",
            ],
        ),
        // Horizontal resize
        Cursor::new(
            Point::new(4, 3),
            &[
                "   X   X   ",
                "  XX   XX  ",
                " X.XXXXX.X ",
                "  XX   XX  ",
                "   X   X   ",
            ],
        ),
        // Diagonal resize, upper-left to lower-right
        Cursor::new(
            Point::new(4, 4),
            &[
                "XXXX     ",
                "X..X     ",
                "X.X      ",
                "XX X     ",
                "    X    ",
                "     X XX",
                "      X.X",
                "     X..X",
                "     XXXX",
            ],
        ),
        // Diagonal resize, upper-right to lower-left
        Cursor::new(
            Point::new(4, 4),
            &[
                "     XXXX",
                "     X..X",
                "      X.X",
                "     X XX",
                "    X    ",
                "XX X     ",
                "X.X      ",
                "X..X     ",
                "XXXX     ",
            ],
        ),
        // Text insertion beam
        Cursor::new(
            Point::new(2, 4),
            &[
                "XX XX",
                "  X  ",
                "  X  ",
                "  X  ",
                "  X  ",
                "  X  ",
                "  X  ",
                "  X  ",
                "XX XX",
            ],
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gfx::context::alloc_pixel;
    use crate::gfx::testgc::{GfxOp, TestGc};
    use crate::gfx::{BitmapAlloc, Color, MemGc, NullHooks};

    #[test]
    fn test_builtin_set_is_complete() {
        let cursors = builtin_cursors();
        assert_eq!(cursors.len(), 6);
        for cur in &cursors {
            assert!(!cur.rect.is_empty());
        }
    }

    #[test]
    fn test_hotspot_relative_rect() {
        let cur = Cursor::new(Point::new(3, 4), &["XXXXXXX", "XXXXXXX"]);
        assert_eq!(cur.rect, Rect::new(-3, -4, 4, -2));
        assert_eq!(cur.drect(Point::new(10, 10)), Rect::new(7, 6, 14, 8));
    }

    #[test]
    fn test_paint_creates_bitmap_once() {
        let (mut gc, ops) = TestGc::new();
        let mut cur = builtin_cursors().remove(StockCursor::Arrow as usize);

        cur.paint(&mut gc, Point::new(5, 5), None).unwrap();
        cur.paint(&mut gc, Point::new(6, 6), None).unwrap();

        let creates = ops
            .lock()
            .unwrap()
            .iter()
            .filter(|op| matches!(op, GfxOp::CreateBitmap(_)))
            .count();
        assert_eq!(creates, 1);
    }

    #[test]
    fn test_paint_clipped_away_draws_nothing() {
        let (mut gc, ops) = TestGc::new();
        let mut cur = builtin_cursors().remove(StockCursor::Arrow as usize);

        cur.paint(&mut gc, Point::new(5, 5), Some(Rect::new(100, 100, 200, 200)))
            .unwrap();
        assert!(ops.lock().unwrap().is_empty());
    }

    #[test]
    fn test_paint_transparent_pixels_preserve_background() {
        let rect = Rect::new(0, 0, 32, 32);
        let alloc = BitmapAlloc::for_rect(&rect);
        let mut gc = MemGc::new(rect, alloc.clone(), Box::new(NullHooks));

        gc.set_color(Color::rgb_i16(0x1111, 0x2222, 0x3333)).unwrap();
        gc.fill_rect(rect).unwrap();
        let bg = alloc_pixel(&alloc, &rect, Point::new(7, 0));

        let mut cur = builtin_cursors().remove(StockCursor::Arrow as usize);
        cur.paint(&mut gc, Point::new(0, 0), None).unwrap();

        // Tip is opaque black, area right of the arrow stays background
        assert_eq!(alloc_pixel(&alloc, &rect, Point::new(0, 0)), 0x00000000);
        assert_eq!(alloc_pixel(&alloc, &rect, Point::new(7, 0)), bg);
    }
}
