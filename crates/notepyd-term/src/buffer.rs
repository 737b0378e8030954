// SPDX-License-Identifier: MIT
//
// FrameBuffer: the 2D cell grid the chrome paints to.
//
// Flat `Vec<Cell>`, row-major (`index = y * width + x`), so the renderer's
// left-to-right scan is linear. Painting is clipped to the buffer bounds;
// wide characters take two cells (codepoint + continuation).

use unicode_width::UnicodeWidthChar;

use crate::cell::{Cell, Style};

/// A 2D buffer of terminal cells.
///
/// ```
/// use notepyd_term::buffer::FrameBuffer;
/// use notepyd_term::cell::Cell;
///
/// let mut buf = FrameBuffer::new(80, 24);
/// buf.set(5, 3, Cell::new('X'));
/// assert_eq!(buf.get(5, 3).unwrap().character(), Some('X'));
/// ```
#[derive(Clone, PartialEq, Eq)]
pub struct FrameBuffer {
    width: u16,
    height: u16,
    cells: Vec<Cell>,
}

impl FrameBuffer {
    /// Create a buffer filled with empty cells.
    #[must_use]
    pub fn new(width: u16, height: u16) -> Self {
        let size = usize::from(width) * usize::from(height);
        Self {
            width,
            height,
            cells: vec![Cell::EMPTY; size],
        }
    }

    #[inline]
    #[must_use]
    pub const fn width(&self) -> u16 {
        self.width
    }

    #[inline]
    #[must_use]
    pub const fn height(&self) -> u16 {
        self.height
    }

    #[inline]
    #[must_use]
    pub const fn in_bounds(&self, x: u16, y: u16) -> bool {
        x < self.width && y < self.height
    }

    #[inline]
    const fn index(&self, x: u16, y: u16) -> usize {
        y as usize * self.width as usize + x as usize
    }

    #[inline]
    #[must_use]
    pub fn get(&self, x: u16, y: u16) -> Option<&Cell> {
        if self.in_bounds(x, y) {
            Some(&self.cells[self.index(x, y)])
        } else {
            None
        }
    }

    /// One row of cells, or `None` past the bottom edge.
    #[must_use]
    pub fn row(&self, y: u16) -> Option<&[Cell]> {
        if y >= self.height {
            return None;
        }
        let start = self.index(0, y);
        Some(&self.cells[start..start + usize::from(self.width)])
    }

    /// The text of one row, continuation cells skipped. Handy in tests.
    #[must_use]
    pub fn row_text(&self, y: u16) -> String {
        self.row(y)
            .map(|cells| cells.iter().filter_map(|c| c.character()).collect())
            .unwrap_or_default()
    }

    // ─── Clear & Resize ──────────────────────────────────────────────────

    pub fn clear(&mut self) {
        self.cells.fill(Cell::EMPTY);
    }

    /// Resize, clearing all content.
    pub fn resize(&mut self, width: u16, height: u16) {
        self.width = width;
        self.height = height;
        self.cells.clear();
        self.cells
            .resize(usize::from(width) * usize::from(height), Cell::EMPTY);
    }

    /// Copy another buffer's cells into this one. Sizes must match; a
    /// mismatched source is cloned wholesale instead.
    pub fn copy_from(&mut self, other: &Self) {
        if self.width == other.width && self.height == other.height {
            self.cells.copy_from_slice(&other.cells);
        } else {
            *self = other.clone();
        }
    }

    // ─── Painting ────────────────────────────────────────────────────────

    /// Bounds-checked raw write. Returns `true` if the cell was written.
    #[inline]
    pub fn set(&mut self, x: u16, y: u16, cell: Cell) -> bool {
        if !self.in_bounds(x, y) {
            return false;
        }
        self.break_wide_char_at(x, y);
        let idx = self.index(x, y);
        self.cells[idx] = cell;
        true
    }

    /// Break any wide character touching `(x, y)` so a later write never
    /// leaves half a glyph on screen.
    fn break_wide_char_at(&mut self, x: u16, y: u16) {
        let idx = self.index(x, y);
        if self.cells[idx].is_continuation() && x > 0 {
            let prev = self.index(x - 1, y);
            self.cells[prev].ch = u32::from(b' ');
        }
        if x + 1 < self.width {
            let next = self.index(x + 1, y);
            if self.cells[next].is_continuation() {
                self.cells[next] = Cell::EMPTY;
            }
        }
    }

    /// Write the second half of a wide character whose first half was just
    /// painted at `x - 1`. Only the cell to the right needs cleanup.
    fn put_continuation(&mut self, x: u16, y: u16, style: Style) {
        if x + 1 < self.width {
            let next = self.index(x + 1, y);
            if self.cells[next].is_continuation() {
                self.cells[next] = Cell::EMPTY;
            }
        }
        let idx = self.index(x, y);
        self.cells[idx] = Cell::continuation(style);
    }

    /// Fill a rectangle with spaces in `style`. Clipped to the buffer.
    pub fn fill_rect(&mut self, x: u16, y: u16, width: u16, height: u16, style: Style) {
        let x2 = x.saturating_add(width).min(self.width);
        let y2 = y.saturating_add(height).min(self.height);
        for row in y..y2 {
            for col in x..x2 {
                self.set(col, row, Cell::styled(' ', style));
            }
        }
    }

    /// Paint `text` left to right from `(x, y)`, stopping at `max_x`
    /// (exclusive) or the right edge. Zero-width characters are skipped;
    /// a wide character that would straddle the limit becomes a space.
    ///
    /// Returns the number of columns consumed.
    pub fn paint_text(&mut self, x: u16, y: u16, text: &str, style: Style, max_x: u16) -> u16 {
        if y >= self.height {
            return 0;
        }
        let limit = max_x.min(self.width);
        let mut col = x;

        for ch in text.chars() {
            if col >= limit {
                break;
            }
            let w = ch.width().unwrap_or(0);
            if w == 0 {
                continue;
            }
            if w == 2 && col + 1 >= limit {
                self.set(col, y, Cell::styled(' ', style));
                col += 1;
                break;
            }
            self.set(col, y, Cell::styled(ch, style));
            if w == 2 {
                self.put_continuation(col + 1, y, style);
            }
            // w is 1 or 2.
            #[allow(clippy::cast_possible_truncation)]
            let w = w as u16;
            col = col.saturating_add(w);
        }

        col.saturating_sub(x)
    }

    /// Restyle an existing span of cells without touching their characters.
    pub fn restyle(&mut self, x: u16, y: u16, width: u16, style: Style) {
        if y >= self.height {
            return;
        }
        let x2 = x.saturating_add(width).min(self.width);
        for col in x..x2 {
            let idx = self.index(col, y);
            let cell = &mut self.cells[idx];
            cell.fg = style.fg;
            cell.bg = style.bg;
            cell.attrs = style.attrs;
        }
    }
}

impl std::fmt::Debug for FrameBuffer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "FrameBuffer({}x{})", self.width, self.height)
    }
}

// ─── Text Width Utilities ────────────────────────────────────────────────────

/// Display width of a character in terminal columns (0, 1 or 2).
#[inline]
#[must_use]
pub fn char_width(ch: char) -> usize {
    ch.width().unwrap_or(0)
}

/// Display width of a string in terminal columns.
///
/// ```
/// use notepyd_term::buffer::string_width;
///
/// assert_eq!(string_width("hello"), 5);
/// assert_eq!(string_width("中文"), 4);
/// ```
#[must_use]
pub fn string_width(s: &str) -> usize {
    s.chars().map(char_width).sum()
}

// ─── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cell::Attr;
    use crate::color::CellColor;
    use pretty_assertions::assert_eq;

    #[test]
    fn new_buffer_is_blank() {
        let buf = FrameBuffer::new(4, 2);
        assert_eq!(buf.row_text(0), "    ");
        assert_eq!(buf.row_text(1), "    ");
        assert!(buf.row(2).is_none());
    }

    #[test]
    fn set_out_of_bounds_is_rejected() {
        let mut buf = FrameBuffer::new(4, 2);
        assert!(!buf.set(4, 0, Cell::new('x')));
        assert!(!buf.set(0, 2, Cell::new('x')));
    }

    #[test]
    fn paint_text_returns_columns() {
        let mut buf = FrameBuffer::new(10, 1);
        let used = buf.paint_text(1, 0, "abc", Style::PLAIN, 10);
        assert_eq!(used, 3);
        assert_eq!(buf.row_text(0), " abc      ");
    }

    #[test]
    fn paint_text_clips_at_limit() {
        let mut buf = FrameBuffer::new(10, 1);
        let used = buf.paint_text(0, 0, "abcdef", Style::PLAIN, 4);
        assert_eq!(used, 4);
        assert_eq!(buf.row_text(0), "abcd      ");
    }

    #[test]
    fn paint_wide_char_uses_continuation() {
        let mut buf = FrameBuffer::new(4, 1);
        let used = buf.paint_text(0, 0, "中", Style::PLAIN, 4);
        assert_eq!(used, 2);
        assert!(buf.get(1, 0).unwrap().is_continuation());
    }

    #[test]
    fn wide_char_at_limit_becomes_space() {
        let mut buf = FrameBuffer::new(3, 1);
        buf.paint_text(0, 0, "ab中", Style::PLAIN, 3);
        assert_eq!(buf.row_text(0), "ab ");
    }

    #[test]
    fn overwriting_half_a_wide_char_breaks_it() {
        let mut buf = FrameBuffer::new(4, 1);
        buf.paint_text(0, 0, "中", Style::PLAIN, 4);
        buf.set(1, 0, Cell::new('x'));
        assert_eq!(buf.get(0, 0).unwrap().character(), Some(' '));
        assert_eq!(buf.get(1, 0).unwrap().character(), Some('x'));
    }

    #[test]
    fn fill_rect_is_clipped() {
        let mut buf = FrameBuffer::new(4, 2);
        let style = Style::new(CellColor::WHITE, CellColor::BLUE);
        buf.fill_rect(2, 1, 10, 10, style);
        assert_eq!(buf.get(3, 1).unwrap().bg, CellColor::BLUE);
        assert_eq!(buf.get(1, 1).unwrap().bg, CellColor::Default);
    }

    #[test]
    fn restyle_keeps_characters() {
        let mut buf = FrameBuffer::new(5, 1);
        buf.paint_text(0, 0, "hello", Style::PLAIN, 5);
        buf.restyle(1, 0, 2, Style::PLAIN.with_attrs(Attr::INVERSE));
        assert_eq!(buf.row_text(0), "hello");
        assert!(buf.get(1, 0).unwrap().attrs.contains(Attr::INVERSE));
        assert!(!buf.get(3, 0).unwrap().attrs.contains(Attr::INVERSE));
    }

    #[test]
    fn resize_clears() {
        let mut buf = FrameBuffer::new(2, 2);
        buf.set(0, 0, Cell::new('x'));
        buf.resize(3, 1);
        assert_eq!(buf.width(), 3);
        assert_eq!(buf.row_text(0), "   ");
    }

    #[test]
    fn string_width_mixed() {
        assert_eq!(string_width("a中b"), 4);
        assert_eq!(char_width('\n'), 0);
    }
}
