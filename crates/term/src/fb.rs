//! Framebuffer of glyph/color cells.

use crate::types::{Color, BLANK};

/// A single terminal cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cell {
    pub glyph: char,
    pub color: Color,
}

impl Cell {
    pub const fn new(glyph: char, color: Color) -> Self {
        Self { glyph, color }
    }

    pub const fn blank(color: Color) -> Self {
        Self::new(BLANK, color)
    }
}

/// 2D framebuffer of character cells, row-major.
///
/// Dimensions are fixed at construction. Writes outside the grid are refused
/// and reported, never clamped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrameBuffer {
    width: u16,
    height: u16,
    cells: Vec<Cell>,
}

impl FrameBuffer {
    pub fn new(width: u16, height: u16, fill: Cell) -> Self {
        let len = (width as usize) * (height as usize);
        Self {
            width,
            height,
            cells: vec![fill; len],
        }
    }

    pub fn width(&self) -> u16 {
        self.width
    }

    pub fn height(&self) -> u16 {
        self.height
    }

    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    /// Cells of row `y`, or `None` past the last row.
    pub fn row(&self, y: u16) -> Option<&[Cell]> {
        if y >= self.height {
            return None;
        }
        let start = (y as usize) * (self.width as usize);
        Some(&self.cells[start..start + self.width as usize])
    }

    #[inline(always)]
    fn idx(&self, x: i32, y: i32) -> Option<usize> {
        if x < 0 || y < 0 || x >= i32::from(self.width) || y >= i32::from(self.height) {
            return None;
        }
        Some((y as usize) * (self.width as usize) + (x as usize))
    }

    pub fn get(&self, x: i32, y: i32) -> Option<Cell> {
        self.idx(x, y).map(|i| self.cells[i])
    }

    /// Write one cell. Returns `false` (and writes nothing) when out of bounds.
    pub fn set(&mut self, x: i32, y: i32, cell: Cell) -> bool {
        match self.idx(x, y) {
            Some(i) => {
                self.cells[i] = cell;
                true
            }
            None => false,
        }
    }

    pub fn fill(&mut self, cell: Cell) {
        self.cells.fill(cell);
    }
}
