#![forbid(unsafe_code)]

//! Buffer grid storage.
//!
//! Cells are stored in row-major order: `index = y * width + x`.
//!
//! # Invariants
//!
//! 1. `cells.len() == width * height`
//! 2. Width and height never change after creation
//! 3. A wide character is written whole or not at all; its trailing cells
//!    hold [`Cell::CONTINUATION`]

use crate::cell::{Cell, CellContent};
use crate::grapheme_width;
use prionav_core::geometry::Rect;

/// A 2D grid of terminal cells.
///
/// # Example
///
/// ```
/// use prionav_render::buffer::Buffer;
/// use prionav_render::cell::Cell;
///
/// let mut buffer = Buffer::new(80, 1);
/// buffer.set(0, 0, Cell::from_char('H'));
/// assert_eq!(buffer.get(0, 0).and_then(|c| c.content.as_char()), Some('H'));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Buffer {
    width: u16,
    height: u16,
    cells: Vec<Cell>,
}

impl Buffer {
    /// Create a new buffer filled with empty cells.
    ///
    /// A zero dimension yields a buffer that silently ignores writes.
    pub fn new(width: u16, height: u16) -> Self {
        let size = width as usize * height as usize;
        Self {
            width,
            height,
            cells: vec![Cell::default(); size],
        }
    }

    /// Buffer width in cells.
    #[inline]
    pub const fn width(&self) -> u16 {
        self.width
    }

    /// Buffer height in cells.
    #[inline]
    pub const fn height(&self) -> u16 {
        self.height
    }

    /// Bounding rect of the entire buffer.
    #[inline]
    pub const fn bounds(&self) -> Rect {
        Rect::from_size(self.width, self.height)
    }

    #[inline]
    fn index(&self, x: u16, y: u16) -> Option<usize> {
        if x < self.width && y < self.height {
            Some(y as usize * self.width as usize + x as usize)
        } else {
            None
        }
    }

    /// Get a reference to the cell at (x, y).
    #[inline]
    pub fn get(&self, x: u16, y: u16) -> Option<&Cell> {
        self.index(x, y).map(|i| &self.cells[i])
    }

    /// Get a mutable reference to the cell at (x, y).
    #[inline]
    pub fn get_mut(&mut self, x: u16, y: u16) -> Option<&mut Cell> {
        self.index(x, y).map(|i| &mut self.cells[i])
    }

    /// Set the cell at (x, y).
    ///
    /// Wide characters also claim the cells to their right. If the whole
    /// character does not fit, nothing is written. A transparent background
    /// keeps the background already in the buffer.
    pub fn set(&mut self, x: u16, y: u16, cell: Cell) {
        let width = match cell.content {
            CellContent::Char(c) => grapheme_width(c.encode_utf8(&mut [0; 4])).max(1),
            _ => 1,
        };
        let Some(last_x) = x.checked_add(width as u16 - 1) else {
            return;
        };
        if self.index(last_x, y).is_none() {
            return;
        }
        let Some(idx) = self.index(x, y) else {
            return;
        };

        let bg = cell.bg.over(self.cells[idx].bg);
        self.cells[idx] = Cell { bg, ..cell };
        for dx in 1..width as u16 {
            if let Some(i) = self.index(x + dx, y) {
                self.cells[i] = Cell {
                    bg,
                    ..Cell::CONTINUATION
                };
            }
        }
    }

    /// Fill a rectangular region (clipped to the buffer) with `cell`.
    pub fn fill(&mut self, rect: Rect, cell: Cell) {
        let clipped = rect.intersection(&self.bounds());
        for y in clipped.y..clipped.bottom() {
            for x in clipped.x..clipped.right() {
                self.set(x, y, cell);
            }
        }
    }

    /// Reset every cell to empty.
    pub fn clear(&mut self) {
        self.cells.fill(Cell::default());
    }

    /// Slice of all cells in row-major order.
    #[inline]
    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    /// Cells of row `y`. Empty when out of bounds.
    pub fn row_cells(&self, y: u16) -> &[Cell] {
        if y >= self.height {
            return &[];
        }
        let start = y as usize * self.width as usize;
        &self.cells[start..start + self.width as usize]
    }
}
