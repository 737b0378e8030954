//! Text buffer backed by a [`ropey::Rope`].
//!
//! Edits address the rope by absolute char index; the editor surface keeps
//! its cursor as a [`Position`] and converts through
//! [`pos_to_char`](Buffer::pos_to_char) / [`char_to_pos`](Buffer::char_to_pos).
//! Conversions clamp instead of failing, so a stale position can never
//! index past the end of the text.
//!
//! The buffer does not know where its text came from; the document state
//! owns the path and the file I/O adapter does the reading and writing.

use std::fmt;
use std::ops::Range as CharRange;

use ropey::{Rope, RopeSlice};

use crate::position::{Position, Range};

pub struct Buffer {
    rope: Rope,
    modified: bool,
}

impl Buffer {
    #[must_use]
    pub fn new() -> Self {
        Self {
            rope: Rope::new(),
            modified: false,
        }
    }

    #[must_use]
    pub fn from_text(text: &str) -> Self {
        Self {
            rope: Rope::from_str(text),
            modified: false,
        }
    }

    // -- Text access --------------------------------------------------------

    #[inline]
    #[must_use]
    pub const fn rope(&self) -> &Rope {
        &self.rope
    }

    /// Number of lines. An empty buffer has one (empty) line, and a trailing
    /// newline starts one more.
    #[inline]
    #[must_use]
    pub fn line_count(&self) -> usize {
        self.rope.len_lines()
    }

    #[inline]
    #[must_use]
    pub fn len_chars(&self) -> usize {
        self.rope.len_chars()
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rope.len_chars() == 0
    }

    /// A line including its line ending, or `None` past the last line.
    #[must_use]
    pub fn line(&self, line: usize) -> Option<RopeSlice<'_>> {
        (line < self.rope.len_lines()).then(|| self.rope.line(line))
    }

    /// Chars in a line excluding `\n`, `\r\n` or `\r`. Zero past the end.
    #[must_use]
    pub fn line_content_len(&self, line: usize) -> usize {
        let Some(slice) = self.line(line) else {
            return 0;
        };
        let total = slice.len_chars();
        match (total.checked_sub(2).map(|i| slice.char(i)), total.checked_sub(1).map(|i| slice.char(i))) {
            (Some('\r'), Some('\n')) => total - 2,
            (_, Some('\n' | '\r')) => total - 1,
            _ => total,
        }
    }

    /// The visible text of a line, without its line ending.
    #[must_use]
    pub fn line_text(&self, line: usize) -> String {
        self.line(line)
            .map(|slice| slice.slice(..self.line_content_len(line)).to_string())
            .unwrap_or_default()
    }

    /// The whole text as one `String`.
    #[must_use]
    pub fn contents(&self) -> String {
        self.rope.to_string()
    }

    /// Text in `range`, clamped to the buffer.
    #[must_use]
    pub fn slice_text(&self, range: Range) -> String {
        let start = self.pos_to_char(range.start);
        let end = self.pos_to_char(range.end).max(start);
        self.rope.slice(start..end).to_string()
    }

    // -- Coordinate conversion ----------------------------------------------

    /// Absolute char index of `pos`, clamped to the line's content and the
    /// last line.
    #[must_use]
    pub fn pos_to_char(&self, pos: Position) -> usize {
        let pos = self.clamp_position(pos);
        self.rope.line_to_char(pos.line) + pos.col
    }

    /// Position of an absolute char index, clamped to the end of the text.
    #[must_use]
    pub fn char_to_pos(&self, idx: usize) -> Position {
        let idx = idx.min(self.rope.len_chars());
        let line = self.rope.char_to_line(idx);
        let col = idx - self.rope.line_to_char(line);
        // An index between `\r` and `\n` belongs at the end of the content.
        Position::new(line, col.min(self.line_content_len(line)))
    }

    /// Nearest valid cursor position: last line at most, and no further
    /// right than the end of the line's content.
    #[must_use]
    pub fn clamp_position(&self, pos: Position) -> Position {
        let line = pos.line.min(self.line_count().saturating_sub(1));
        Position::new(line, pos.col.min(self.line_content_len(line)))
    }

    /// Position just past the last char.
    #[must_use]
    pub fn end_position(&self) -> Position {
        self.char_to_pos(self.rope.len_chars())
    }

    // -- Editing ------------------------------------------------------------

    /// Insert `text` at char index `at` (clamped to the end).
    pub fn insert(&mut self, at: usize, text: &str) {
        if text.is_empty() {
            return;
        }
        self.rope.insert(at.min(self.rope.len_chars()), text);
        self.modified = true;
    }

    /// Remove the chars in `range` (clamped) and return them.
    pub fn remove(&mut self, range: CharRange<usize>) -> String {
        let len = self.rope.len_chars();
        let start = range.start.min(len);
        let end = range.end.clamp(start, len);
        if start == end {
            return String::new();
        }
        let removed = self.rope.slice(start..end).to_string();
        self.rope.remove(start..end);
        self.modified = true;
        removed
    }

    /// Swap in entirely new text. The result counts as unmodified.
    pub fn replace_all(&mut self, text: &str) {
        self.rope = Rope::from_str(text);
        self.modified = false;
    }

    // -- Metadata -----------------------------------------------------------

    /// Changed since load, last save or last `replace_all`?
    #[inline]
    #[must_use]
    pub const fn is_modified(&self) -> bool {
        self.modified
    }

    #[inline]
    pub fn mark_clean(&mut self) {
        self.modified = false;
    }
}

impl Default for Buffer {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Buffer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Buffer")
            .field("lines", &self.line_count())
            .field("chars", &self.len_chars())
            .field("modified", &self.modified)
            .finish()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
