//! The editor surface: the text-edit widget the document is shown in.
//!
//! [`EditorSurface`] is what commands see: whole-text access and the edit
//! primitives a menu can trigger. [`TextEdit`] is the concrete widget:
//! a [`Buffer`] with a cursor, an optional selection anchor, transactional
//! undo/redo, a clipboard and a scroll offset for the chrome.
//!
//! Typed characters coalesce into one undo step until the cursor moves or
//! another edit happens. Replacing the whole text (`set_text`, `clear`)
//! starts a fresh history and leaves the surface unmodified.

use unicode_width::UnicodeWidthChar;

use crate::buffer::Buffer;
use crate::clipboard::Clipboard;
use crate::history::History;
use crate::position::{Position, Range};

/// Columns between tab stops when drawing.
pub const TAB_WIDTH: usize = 8;

// ---------------------------------------------------------------------------
// EditorSurface
// ---------------------------------------------------------------------------

/// Operations commands perform on the text-edit widget.
pub trait EditorSurface {
    /// The full plain text.
    fn text(&self) -> String;

    /// Replace the full text. History is reset and the cursor goes to the
    /// start.
    fn set_text(&mut self, text: &str);

    /// Empty the widget.
    fn clear(&mut self);

    fn is_empty(&self) -> bool;

    fn undo(&mut self);
    fn redo(&mut self);

    /// Move the selection to the clipboard. No-op without a selection.
    fn cut(&mut self);

    /// Copy the selection to the clipboard. No-op without a selection.
    fn copy(&mut self);

    /// Replace the selection (or insert at the cursor) with the clipboard.
    fn paste(&mut self);

    fn select_all(&mut self);

    /// Edited since the last `set_text`, `clear` or `mark_clean`?
    fn is_modified(&self) -> bool;

    /// Record that the current text is what was last written to disk.
    fn mark_clean(&mut self);
}

// ---------------------------------------------------------------------------
// TextEdit
// ---------------------------------------------------------------------------

#[derive(Debug, Default)]
pub struct TextEdit {
    buffer: Buffer,
    history: History,
    clipboard: Clipboard,
    cursor: Position,
    anchor: Option<Position>,
    /// Column vertical moves aim for, kept across short lines.
    goal_col: Option<usize>,
    /// True while a run of typed characters shares one transaction.
    typing: bool,
    scroll_line: usize,
    scroll_col: usize,
}

impl TextEdit {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_text(text: &str) -> Self {
        let mut edit = Self::new();
        edit.set_text(text);
        edit
    }

    // -- State --------------------------------------------------------------

    #[inline]
    #[must_use]
    pub const fn buffer(&self) -> &Buffer {
        &self.buffer
    }

    #[inline]
    #[must_use]
    pub const fn cursor(&self) -> Position {
        self.cursor
    }

    /// The selected range, if it is non-empty.
    #[must_use]
    pub fn selection(&self) -> Option<Range> {
        let anchor = self.anchor?;
        let range = Range::ordered(anchor, self.cursor);
        (!range.is_empty()).then_some(range)
    }

    #[must_use]
    pub fn selected_text(&self) -> Option<String> {
        self.selection().map(|r| self.buffer.slice_text(r))
    }

    #[must_use]
    pub fn clipboard(&self) -> &Clipboard {
        &self.clipboard
    }

    #[must_use]
    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    #[must_use]
    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    // -- Typing -------------------------------------------------------------

    /// Type one character, replacing the selection.
    pub fn insert_char(&mut self, ch: char) {
        if !self.typing {
            self.end_typing();
            self.history.begin(self.cursor);
            self.typing = true;
        }
        self.delete_selection_recorded();
        let mut enc = [0u8; 4];
        self.insert_recorded(ch.encode_utf8(&mut enc));
        self.goal_col = None;
    }

    pub fn newline(&mut self) {
        self.insert_char('\n');
    }

    pub fn tab(&mut self) {
        self.insert_char('\t');
    }

    /// Insert a block of text (bracketed paste) as one undo step.
    pub fn insert_text(&mut self, text: &str) {
        if text.is_empty() {
            return;
        }
        self.edit(|this| {
            this.delete_selection_recorded();
            this.insert_recorded(text);
        });
    }

    /// Delete the selection, or the char before the cursor.
    pub fn backspace(&mut self) {
        self.edit(|this| {
            if this.delete_selection_recorded() {
                return;
            }
            let at = this.buffer.pos_to_char(this.cursor);
            if at == 0 {
                return;
            }
            // A CRLF pair goes as one line break.
            let start = if at >= 2
                && this.buffer.rope().char(at - 1) == '\n'
                && this.buffer.rope().char(at - 2) == '\r'
            {
                at - 2
            } else {
                at - 1
            };
            this.remove_recorded(start, at);
        });
    }

    /// Delete the selection, or the char under the cursor.
    pub fn delete_forward(&mut self) {
        self.edit(|this| {
            if this.delete_selection_recorded() {
                return;
            }
            let at = this.buffer.pos_to_char(this.cursor);
            let len = this.buffer.len_chars();
            if at >= len {
                return;
            }
            let end = if this.buffer.rope().char(at) == '\r'
                && at + 1 < len
                && this.buffer.rope().char(at + 1) == '\n'
            {
                at + 2
            } else {
                at + 1
            };
            this.remove_recorded(at, end);
        });
    }

    // -- Movement -----------------------------------------------------------

    pub fn move_left(&mut self, extend: bool) {
        if let (false, Some(sel)) = (extend, self.selection()) {
            self.place(sel.start, false);
            return;
        }
        let at = self.buffer.pos_to_char(self.cursor);
        let target = if at == 0 {
            self.cursor
        } else if self.cursor.col == 0 {
            let line = self.cursor.line - 1;
            Position::new(line, self.buffer.line_content_len(line))
        } else {
            Position::new(self.cursor.line, self.cursor.col - 1)
        };
        self.place(target, extend);
    }

    pub fn move_right(&mut self, extend: bool) {
        if let (false, Some(sel)) = (extend, self.selection()) {
            self.place(sel.end, false);
            return;
        }
        let line_len = self.buffer.line_content_len(self.cursor.line);
        let target = if self.cursor.col < line_len {
            Position::new(self.cursor.line, self.cursor.col + 1)
        } else if self.cursor.line + 1 < self.buffer.line_count() {
            Position::new(self.cursor.line + 1, 0)
        } else {
            self.cursor
        };
        self.place(target, extend);
    }

    pub fn move_up(&mut self, extend: bool) {
        self.move_vertical(-1, extend);
    }

    pub fn move_down(&mut self, extend: bool) {
        self.move_vertical(1, extend);
    }

    pub fn page_up(&mut self, rows: usize, extend: bool) {
        self.move_vertical(-isize::try_from(rows.max(1)).unwrap_or(isize::MAX), extend);
    }

    pub fn page_down(&mut self, rows: usize, extend: bool) {
        self.move_vertical(isize::try_from(rows.max(1)).unwrap_or(isize::MAX), extend);
    }

    pub fn line_start(&mut self, extend: bool) {
        self.place(Position::new(self.cursor.line, 0), extend);
    }

    pub fn line_end(&mut self, extend: bool) {
        let len = self.buffer.line_content_len(self.cursor.line);
        self.place(Position::new(self.cursor.line, len), extend);
    }

    pub fn doc_start(&mut self, extend: bool) {
        self.place(Position::ZERO, extend);
    }

    pub fn doc_end(&mut self, extend: bool) {
        self.place(self.buffer.end_position(), extend);
    }

    fn move_vertical(&mut self, delta: isize, extend: bool) {
        if !extend && self.selection().is_some() {
            self.anchor = None;
        }
        let goal = self.goal_col.unwrap_or(self.cursor.col);
        let last = self.buffer.line_count().saturating_sub(1);
        let line = self.cursor.line.saturating_add_signed(delta).min(last);
        let target = self.buffer.clamp_position(Position::new(line, goal));
        self.place(target, extend);
        self.goal_col = Some(goal);
    }

    /// Move the cursor, starting or dropping the selection.
    fn place(&mut self, pos: Position, extend: bool) {
        self.end_typing();
        if extend {
            self.anchor.get_or_insert(self.cursor);
        } else {
            self.anchor = None;
        }
        self.cursor = self.buffer.clamp_position(pos);
        self.goal_col = None;
    }

    // -- Viewport -----------------------------------------------------------

    /// First visible line and display column.
    #[must_use]
    pub const fn scroll(&self) -> (usize, usize) {
        (self.scroll_line, self.scroll_col)
    }

    /// Scroll so the cursor is inside a `rows` x `cols` viewport.
    pub fn scroll_into_view(&mut self, rows: usize, cols: usize) {
        if rows == 0 || cols == 0 {
            return;
        }
        let line = self.cursor.line;
        if line < self.scroll_line {
            self.scroll_line = line;
        } else if line >= self.scroll_line + rows {
            self.scroll_line = line + 1 - rows;
        }

        let col = self.display_col(self.cursor);
        if col < self.scroll_col {
            self.scroll_col = col;
        } else if col >= self.scroll_col + cols {
            self.scroll_col = col + 1 - cols;
        }
    }

    /// Terminal column of `pos` within its line, with tabs expanded.
    #[must_use]
    pub fn display_col(&self, pos: Position) -> usize {
        let Some(line) = self.buffer.line(pos.line) else {
            return 0;
        };
        line.chars()
            .take(pos.col)
            .fold(0, |col, ch| col + char_display_width(ch, col))
    }

    // -- Recorded edits -----------------------------------------------------

    /// Run `f` as one undo step, closing any typing run first.
    fn edit(&mut self, f: impl FnOnce(&mut Self)) {
        self.end_typing();
        self.history.begin(self.cursor);
        f(self);
        self.history.commit(self.cursor);
        self.goal_col = None;
    }

    fn end_typing(&mut self) {
        if self.typing {
            self.history.commit(self.cursor);
            self.typing = false;
        }
    }

    fn insert_recorded(&mut self, text: &str) {
        let at = self.buffer.pos_to_char(self.cursor);
        self.buffer.insert(at, text);
        self.history.record_insert(at, text);
        self.cursor = self.buffer.char_to_pos(at + text.chars().count());
    }

    fn remove_recorded(&mut self, start: usize, end: usize) {
        let removed = self.buffer.remove(start..end);
        self.history.record_delete(start, &removed);
        self.cursor = self.buffer.char_to_pos(start);
    }

    /// Delete the selection inside the open transaction. Returns whether
    /// there was one.
    fn delete_selection_recorded(&mut self) -> bool {
        let Some(sel) = self.selection() else {
            self.anchor = None;
            return false;
        };
        let start = self.buffer.pos_to_char(sel.start);
        let end = self.buffer.pos_to_char(sel.end);
        self.anchor = None;
        self.remove_recorded(start, end);
        true
    }
}

impl EditorSurface for TextEdit {
    fn text(&self) -> String {
        self.buffer.contents()
    }

    fn set_text(&mut self, text: &str) {
        self.buffer.replace_all(text);
        self.history.clear();
        self.cursor = Position::ZERO;
        self.anchor = None;
        self.goal_col = None;
        self.typing = false;
        self.scroll_line = 0;
        self.scroll_col = 0;
    }

    fn clear(&mut self) {
        self.set_text("");
    }

    fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    fn undo(&mut self) {
        self.end_typing();
        if let Some(pos) = self.history.undo(&mut self.buffer) {
            self.cursor = self.buffer.clamp_position(pos);
            self.anchor = None;
            self.goal_col = None;
        }
    }

    fn redo(&mut self) {
        self.end_typing();
        if let Some(pos) = self.history.redo(&mut self.buffer) {
            self.cursor = self.buffer.clamp_position(pos);
            self.anchor = None;
            self.goal_col = None;
        }
    }

    fn cut(&mut self) {
        let Some(text) = self.selected_text() else {
            return;
        };
        self.clipboard.set(text);
        self.edit(|this| {
            this.delete_selection_recorded();
        });
    }

    fn copy(&mut self) {
        if let Some(text) = self.selected_text() {
            self.clipboard.set(text);
        }
    }

    fn paste(&mut self) {
        if self.clipboard.is_empty() {
            return;
        }
        let text = self.clipboard.content().to_string();
        self.insert_text(&text);
    }

    fn select_all(&mut self) {
        self.end_typing();
        self.anchor = Some(Position::ZERO);
        self.cursor = self.buffer.end_position();
        self.goal_col = None;
    }

    fn is_modified(&self) -> bool {
        self.buffer.is_modified()
    }

    fn mark_clean(&mut self) {
        self.buffer.mark_clean();
    }
}

/// Columns `ch` takes when drawn starting at display column `col`.
#[must_use]
pub fn char_display_width(ch: char, col: usize) -> usize {
    if ch == '\t' {
        TAB_WIDTH - col % TAB_WIDTH
    } else {
        ch.width().unwrap_or(0)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn typed(text: &str) -> TextEdit {
        let mut edit = TextEdit::new();
        for ch in text.chars() {
            edit.insert_char(ch);
        }
        edit
    }

    #[test]
    fn typing_builds_text_and_moves_cursor() {
        let edit = typed("ab\ncd");
        assert_eq!(edit.text(), "ab\ncd");
        assert_eq!(edit.cursor(), Position::new(1, 2));
        assert!(edit.is_modified());
    }

    #[test]
    fn a_typing_run_is_one_undo_step() {
        let mut edit = typed("hello");
        edit.undo();
        assert_eq!(edit.text(), "");
        edit.redo();
        assert_eq!(edit.text(), "hello");
        assert_eq!(edit.cursor(), Position::new(0, 5));
    }

    #[test]
    fn moving_the_cursor_splits_typing_runs() {
        let mut edit = typed("ab");
        edit.move_left(false);
        edit.insert_char('X');
        assert_eq!(edit.text(), "aXb");
        edit.undo();
        assert_eq!(edit.text(), "ab");
        edit.undo();
        assert_eq!(edit.text(), "");
    }

    #[test]
    fn backspace_joins_lines() {
        let mut edit = TextEdit::with_text("ab\ncd");
        edit.move_down(false);
        edit.backspace();
        assert_eq!(edit.text(), "abcd");
        assert_eq!(edit.cursor(), Position::new(0, 2));
    }

    #[test]
    fn backspace_removes_crlf_as_one() {
        let mut edit = TextEdit::with_text("ab\r\ncd");
        edit.move_down(false);
        edit.backspace();
        assert_eq!(edit.text(), "abcd");
    }

    #[test]
    fn form_feed_does_not_end_the_line() {
        let mut edit = TextEdit::with_text("a\u{c}b\nc");
        edit.line_end(false);
        assert_eq!(edit.cursor(), Position::new(0, 3));
        edit.insert_char('x');
        assert_eq!(edit.text(), "a\u{c}bx\nc");
        assert_eq!(edit.cursor(), Position::new(0, 4));
    }

    #[test]
    fn delete_forward_at_end_is_noop() {
        let mut edit = TextEdit::with_text("ab");
        edit.doc_end(false);
        edit.delete_forward();
        assert_eq!(edit.text(), "ab");
        assert!(!edit.can_undo());
    }

    #[test]
    fn shift_movement_extends_selection() {
        let mut edit = TextEdit::with_text("hello world");
        edit.move_right(true);
        edit.move_right(true);
        assert_eq!(edit.selected_text().as_deref(), Some("he"));
        edit.move_right(false);
        assert!(edit.selection().is_none());
        assert_eq!(edit.cursor(), Position::new(0, 2));
    }

    #[test]
    fn typing_replaces_selection() {
        let mut edit = TextEdit::with_text("hello");
        edit.select_all();
        edit.insert_char('x');
        assert_eq!(edit.text(), "x");
        edit.undo();
        assert_eq!(edit.text(), "hello");
    }

    #[test]
    fn cut_and_paste() {
        let mut edit = TextEdit::with_text("one two");
        edit.line_end(false);
        for _ in 0..3 {
            edit.move_left(true);
        }
        edit.cut();
        assert_eq!(edit.text(), "one ");
        assert_eq!(edit.clipboard().content(), "two");

        edit.doc_start(false);
        edit.paste();
        assert_eq!(edit.text(), "twoone ");
    }

    #[test]
    fn copy_and_cut_without_selection_are_noops() {
        let mut edit = TextEdit::with_text("abc");
        edit.copy();
        edit.cut();
        assert!(edit.clipboard().is_empty());
        assert_eq!(edit.text(), "abc");
    }

    #[test]
    fn paste_with_empty_clipboard_is_noop() {
        let mut edit = TextEdit::with_text("abc");
        edit.paste();
        assert_eq!(edit.text(), "abc");
        assert!(!edit.can_undo());
    }

    #[test]
    fn select_all_covers_everything() {
        let mut edit = TextEdit::with_text("a\nbc");
        edit.select_all();
        assert_eq!(edit.selected_text().as_deref(), Some("a\nbc"));
        edit.copy();
        assert_eq!(edit.clipboard().content(), "a\nbc");
    }

    #[test]
    fn set_text_resets_history_and_modified() {
        let mut edit = typed("draft");
        edit.set_text("loaded");
        assert_eq!(edit.text(), "loaded");
        assert_eq!(edit.cursor(), Position::ZERO);
        assert!(!edit.is_modified());
        assert!(!edit.can_undo());
        edit.undo();
        assert_eq!(edit.text(), "loaded");
    }

    #[test]
    fn clear_empties() {
        let mut edit = TextEdit::with_text("x");
        edit.clear();
        assert!(edit.is_empty());
    }

    #[test]
    fn vertical_moves_keep_goal_column() {
        let mut edit = TextEdit::with_text("long line\nab\nanother line");
        edit.line_end(false);
        edit.move_down(false);
        assert_eq!(edit.cursor(), Position::new(1, 2));
        edit.move_down(false);
        assert_eq!(edit.cursor(), Position::new(2, 9));
    }

    #[test]
    fn page_down_clamps_to_last_line() {
        let mut edit = TextEdit::with_text("a\nb\nc");
        edit.page_down(10, false);
        assert_eq!(edit.cursor().line, 2);
        edit.page_up(10, false);
        assert_eq!(edit.cursor().line, 0);
    }

    #[test]
    fn insert_text_is_one_step() {
        let mut edit = TextEdit::new();
        edit.insert_text("pasted\ntext");
        assert_eq!(edit.cursor(), Position::new(1, 4));
        edit.undo();
        assert!(edit.is_empty());
    }

    #[test]
    fn display_col_expands_tabs_and_wide_chars() {
        let edit = TextEdit::with_text("\tx中y");
        assert_eq!(edit.display_col(Position::new(0, 1)), TAB_WIDTH);
        assert_eq!(edit.display_col(Position::new(0, 3)), TAB_WIDTH + 3);
    }

    #[test]
    fn scroll_follows_cursor() {
        let text = (0..50).map(|i| i.to_string()).collect::<Vec<_>>().join("\n");
        let mut edit = TextEdit::with_text(&text);
        edit.page_down(30, false);
        edit.scroll_into_view(10, 80);
        assert_eq!(edit.scroll(), (21, 0));
        edit.doc_start(false);
        edit.scroll_into_view(10, 80);
        assert_eq!(edit.scroll(), (0, 0));
    }

    #[test]
    fn mark_clean_clears_modified() {
        let mut edit = typed("x");
        edit.mark_clean();
        assert!(!edit.is_modified());
    }
}
