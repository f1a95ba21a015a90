//! Renderer: owns the frame buffer and flushes it to a terminal stream.
//!
//! Each frame is encoded into a reusable byte buffer and written with a single
//! `write_all`, so a full redraw costs one syscall. Color switches are only
//! emitted where the color actually changes along a row.

use std::io::{self, Write};
use std::sync::Arc;

use crossterm::{cursor, style::Print, style::ResetColor, QueueableCommand};
use thiserror::Error;

use crate::fb::{Cell, FrameBuffer};
use crate::palette::Palette;
use crate::types::{glyph, Color};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum RenderError {
    #[error("frame buffer dimensions must be positive (got {width}x{height})")]
    ZeroSize { width: u16, height: u16 },
    #[error("drawing outside buffer bounds at ({x}, {y}) in a {width}x{height} buffer")]
    OutOfBounds {
        x: i32,
        y: i32,
        width: u16,
        height: u16,
    },
}

#[derive(Debug)]
pub struct Renderer {
    fb: FrameBuffer,
    palette: Arc<Palette>,
    buf: Vec<u8>,
}

impl Renderer {
    /// Allocate a `width` x `height` grid of blank cells in the palette's
    /// default color.
    pub fn new(width: u16, height: u16, palette: Arc<Palette>) -> Result<Self, RenderError> {
        if width == 0 || height == 0 {
            return Err(RenderError::ZeroSize { width, height });
        }
        let blank = Cell::blank(palette.default_color());
        // Rough per-cell budget: glyph plus the occasional color switch.
        let capacity = (width as usize) * (height as usize) * 4 + (height as usize) * 12;
        Ok(Self {
            fb: FrameBuffer::new(width, height, blank),
            palette,
            buf: Vec::with_capacity(capacity),
        })
    }

    pub fn size(&self) -> (u16, u16) {
        (self.fb.width(), self.fb.height())
    }

    pub fn palette(&self) -> &Arc<Palette> {
        &self.palette
    }

    pub fn frame(&self) -> &FrameBuffer {
        &self.fb
    }

    pub fn cell(&self, x: i32, y: i32) -> Option<Cell> {
        self.fb.get(x, y)
    }

    pub fn clear(&mut self) {
        self.fb.fill(Cell::blank(self.palette.default_color()));
    }

    pub fn draw_char(
        &mut self,
        glyph: char,
        x: i32,
        y: i32,
        color: Color,
    ) -> Result<(), RenderError> {
        if self.fb.set(x, y, Cell::new(glyph, color)) {
            Ok(())
        } else {
            Err(self.out_of_bounds(x, y))
        }
    }

    /// Draw a full block.
    pub fn draw_pixel(&mut self, x: i32, y: i32, color: Color) -> Result<(), RenderError> {
        self.draw_char(glyph::FULL_BLOCK, x, y, color)
    }

    /// Write `text` left to right from `(x, y)`.
    ///
    /// Stops at the first cell outside the grid; everything before it stays
    /// drawn, so text running off the right edge is clipped.
    pub fn draw_text(
        &mut self,
        text: &str,
        x: i32,
        y: i32,
        color: Color,
    ) -> Result<(), RenderError> {
        let mut cx = x;
        for ch in text.chars() {
            self.draw_char(ch, cx, y, color)?;
            cx = cx.saturating_add(1);
        }
        Ok(())
    }

    /// Fill a `w` x `h` rectangle row by row, with the same partial-write
    /// behavior as [`Renderer::draw_text`].
    pub fn draw_rect(
        &mut self,
        x: i32,
        y: i32,
        w: u16,
        h: u16,
        glyph: char,
        color: Color,
    ) -> Result<(), RenderError> {
        for dy in 0..i32::from(h) {
            for dx in 0..i32::from(w) {
                self.draw_char(glyph, x.saturating_add(dx), y.saturating_add(dy), color)?;
            }
        }
        Ok(())
    }

    /// Flush the current frame to `out` as one batched write.
    pub fn render<W: Write + ?Sized>(&mut self, out: &mut W) -> io::Result<()> {
        self.buf.clear();
        encode_frame_into(&self.fb, &self.palette, &mut self.buf)?;
        out.write_all(&self.buf)?;
        out.flush()
    }

    /// Make the cursor visible again. Call on every teardown path.
    pub fn show_cursor<W: Write + ?Sized>(&self, out: &mut W) -> io::Result<()> {
        show_cursor(out)
    }

    fn out_of_bounds(&self, x: i32, y: i32) -> RenderError {
        RenderError::OutOfBounds {
            x,
            y,
            width: self.fb.width(),
            height: self.fb.height(),
        }
    }
}

/// Encode a full-frame redraw into `out`.
///
/// Layout: cursor home, cursor hide, then per row one color sequence per run of
/// same-colored cells followed by the glyphs, and an explicit move to column 1
/// of the next row instead of a newline.
pub fn encode_frame_into(fb: &FrameBuffer, palette: &Palette, out: &mut Vec<u8>) -> io::Result<()> {
    out.queue(cursor::MoveTo(0, 0))?;
    out.queue(cursor::Hide)?;

    for y in 0..fb.height() {
        let Some(row) = fb.row(y) else { break };
        let mut current: Option<Color> = None;
        for cell in row {
            if current != Some(cell.color) {
                out.queue(Print(palette.sgr(cell.color)))?;
                current = Some(cell.color);
            }
            out.queue(Print(cell.glyph))?;
        }
        if y + 1 < fb.height() {
            out.queue(cursor::MoveTo(0, y + 1))?;
        }
    }

    out.queue(ResetColor)?;
    Ok(())
}

pub fn show_cursor<W: Write + ?Sized>(out: &mut W) -> io::Result<()> {
    out.queue(cursor::Show)?;
    out.flush()
}
