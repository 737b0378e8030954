// SPDX-License-Identifier: MIT
//
// Modal dialogs drawn over the editor: message box, path prompt and print
// dialog. Each is a `Modal` run by the event loop's nested loop, so
// `TermDialogs` can answer the core's `Dialogs` calls synchronously.
//
//   ┌ Save file as... ─────────────────────────┐
//   │ /home/user/notes/a.txt▏                  │  ← line input
//   │ Text Document (*.txt);; Python (*.py)... │  ← filter hint
//   │                                          │
//   │ Enter accept   Esc cancel                │
//   └──────────────────────────────────────────┘

use std::env;
use std::path::{MAIN_SEPARATOR, PathBuf};

use log::debug;
use notepyd_core::dialog::{Dialogs, PrintDestination, Severity};
use notepyd_core::document::APP_NAME;
use notepyd_term::ansi::CursorShape;
use notepyd_term::buffer::{FrameBuffer, char_width, string_width};
use notepyd_term::event_loop::{CursorPlacement, Modal, ModalAction, Ui};
use notepyd_term::input::{Event, KeyCode, KeyEvent, Modifiers};

use crate::style;

const MAX_BOX_WIDTH: u16 = 72;

// ─── TermDialogs ────────────────────────────────────────────────────────────

/// The core's dialog collaborator, backed by modals on the terminal.
pub struct TermDialogs<'a> {
    ui: &'a mut Ui,
}

impl<'a> TermDialogs<'a> {
    pub const fn new(ui: &'a mut Ui) -> Self {
        Self { ui }
    }

    /// Closed input or a terminal failure both count as cancel; the
    /// failure is also handed to the loop.
    fn run<M: Modal>(&mut self, modal: &mut M) -> Option<M::Output> {
        match self.ui.run_modal(modal) {
            Ok(answer) => answer,
            Err(err) => {
                self.ui.record_failure(err);
                None
            }
        }
    }
}

impl Dialogs for TermDialogs<'_> {
    fn open_path(&mut self, caption: &str, filter: &str) -> Option<PathBuf> {
        let answer = self.run(&mut PathPrompt::new(caption, filter, &start_dir()))?;
        debug!("{caption}: {answer:?}");
        answer
    }

    fn save_path(&mut self, caption: &str, filter: &str) -> Option<PathBuf> {
        let answer = self.run(&mut PathPrompt::new(caption, filter, &start_dir()))?;
        debug!("{caption}: {answer:?}");
        answer
    }

    fn message(&mut self, text: &str, severity: Severity) {
        self.run(&mut MessageBox::new(text, severity));
    }

    fn print_dialog(&mut self) -> Option<PrintDestination> {
        let answer = self.run(&mut PrintPrompt::new(&start_dir()))?;
        debug!("print: {answer:?}");
        answer
    }
}

/// The working directory with a trailing separator, ready for a file name.
fn start_dir() -> String {
    let mut dir = env::current_dir()
        .map(|d| d.display().to_string())
        .unwrap_or_default();
    if !dir.is_empty() && !dir.ends_with(MAIN_SEPARATOR) {
        dir.push(MAIN_SEPARATOR);
    }
    dir
}

// ─── LineInput ──────────────────────────────────────────────────────────────

/// Single-line text field with a char-indexed cursor.
#[derive(Debug, Clone, Default)]
pub struct LineInput {
    text: String,
    cursor: usize,
}

impl LineInput {
    pub fn new(initial: &str) -> Self {
        Self {
            text: initial.to_string(),
            cursor: initial.chars().count(),
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    fn byte_at(&self, char_idx: usize) -> usize {
        self.text
            .char_indices()
            .nth(char_idx)
            .map_or(self.text.len(), |(i, _)| i)
    }

    fn len(&self) -> usize {
        self.text.chars().count()
    }

    /// Insert at the cursor, dropping control characters (pasted newlines).
    pub fn insert(&mut self, s: &str) {
        for ch in s.chars().filter(|c| !c.is_control()) {
            let at = self.byte_at(self.cursor);
            self.text.insert(at, ch);
            self.cursor += 1;
        }
    }

    /// Apply an editing key. Returns `false` if the key is not for us.
    pub fn handle_key(&mut self, key: &KeyEvent) -> bool {
        let ctrl = key.modifiers.contains(Modifiers::CTRL);
        match key.code {
            KeyCode::Char('u') if ctrl => {
                self.text.clear();
                self.cursor = 0;
            }
            KeyCode::Char(ch) if !ctrl && !key.modifiers.contains(Modifiers::ALT) => {
                let mut enc = [0u8; 4];
                self.insert(ch.encode_utf8(&mut enc));
            }
            KeyCode::Backspace if self.cursor > 0 => {
                self.cursor -= 1;
                let at = self.byte_at(self.cursor);
                self.text.remove(at);
            }
            KeyCode::Delete if self.cursor < self.len() => {
                let at = self.byte_at(self.cursor);
                self.text.remove(at);
            }
            KeyCode::Left => self.cursor = self.cursor.saturating_sub(1),
            KeyCode::Right => self.cursor = (self.cursor + 1).min(self.len()),
            KeyCode::Home => self.cursor = 0,
            KeyCode::End => self.cursor = self.len(),
            KeyCode::Backspace | KeyCode::Delete => {}
            _ => return false,
        }
        true
    }

    /// Paint into `width` columns at `(x, y)`, scrolled so the cursor is
    /// visible. Returns the cursor's screen column.
    pub fn paint(&self, buf: &mut FrameBuffer, (x, y): (u16, u16), width: u16) -> u16 {
        buf.fill_rect(x, y, width, 1, style::INPUT);
        if width == 0 {
            return x;
        }
        let chars: Vec<char> = self.text.chars().collect();
        let mut start = 0;
        while start < self.cursor
            && chars[start..self.cursor].iter().copied().map(char_width).sum::<usize>()
                >= usize::from(width)
        {
            start += 1;
        }
        let visible: String = chars[start..].iter().collect();
        buf.paint_text(x, y, &visible, style::INPUT, x + width);
        let before: String = chars[start..self.cursor].iter().collect();
        x + to_u16(string_width(&before))
    }
}

// ─── MessageBox ─────────────────────────────────────────────────────────────

/// A message dismissed with Enter, Escape or Space.
pub struct MessageBox {
    text: String,
    severity: Severity,
}

impl MessageBox {
    pub fn new(text: &str, severity: Severity) -> Self {
        Self {
            text: text.to_string(),
            severity,
        }
    }
}

impl Modal for MessageBox {
    type Output = ();

    fn on_event(&mut self, event: &Event) -> ModalAction<()> {
        match event {
            Event::Key(key)
                if matches!(
                    key.code,
                    KeyCode::Enter | KeyCode::Escape | KeyCode::Char(' ')
                ) =>
            {
                ModalAction::Done(())
            }
            _ => ModalAction::Continue,
        }
    }

    fn paint(&mut self, buf: &mut FrameBuffer) {
        let (title, title_style) = match self.severity {
            Severity::Critical => ("Error", style::CRITICAL),
            Severity::Information => (APP_NAME, style::INFORMATION),
        };
        let max_inner = usize::from(box_width(buf).saturating_sub(4)).max(1);
        let lines = wrap(&self.text, max_inner);
        let inner = lines
            .iter()
            .map(|l| string_width(l))
            .max()
            .unwrap_or(0)
            .max(string_width(title) + 2)
            .max(6);
        let width = to_u16(inner + 4).min(buf.width());
        let height = to_u16(lines.len() + 4);
        let (x, y) = centered(buf, width, height);

        style::draw_box(buf, (x, y), (width, height), style::PANEL, Some((title, title_style)));
        let right = (x + width).saturating_sub(1);
        for (i, line) in lines.iter().enumerate() {
            buf.paint_text(x + 2, y + 1 + to_u16(i), line, style::PANEL, right);
        }
        let ok = "[ OK ]";
        let ok_x = x + (width.saturating_sub(to_u16(ok.len()))) / 2;
        buf.paint_text(ok_x, y + height - 2, ok, style::MENU_ACTIVE, right);
    }
}

// ─── PathPrompt ─────────────────────────────────────────────────────────────

/// File name prompt. Enter answers with the typed path, Escape with `None`.
pub struct PathPrompt {
    caption: String,
    filter: String,
    input: LineInput,
    cursor_at: Option<(u16, u16)>,
}

impl PathPrompt {
    pub fn new(caption: &str, filter: &str, initial: &str) -> Self {
        Self {
            caption: caption.to_string(),
            filter: filter.to_string(),
            input: LineInput::new(initial),
            cursor_at: None,
        }
    }
}

impl Modal for PathPrompt {
    type Output = Option<PathBuf>;

    fn on_event(&mut self, event: &Event) -> ModalAction<Self::Output> {
        match event {
            Event::Paste(text) => self.input.insert(text),
            Event::Key(key) => match key.code {
                KeyCode::Escape => return ModalAction::Done(None),
                KeyCode::Enter => {
                    return ModalAction::Done(Some(PathBuf::from(self.input.text())));
                }
                _ => {
                    self.input.handle_key(key);
                }
            },
        }
        ModalAction::Continue
    }

    fn paint(&mut self, buf: &mut FrameBuffer) {
        let width = box_width(buf);
        let height = 6;
        let (x, y) = centered(buf, width, height);
        let right = (x + width).saturating_sub(1);
        style::draw_box(
            buf,
            (x, y),
            (width, height),
            style::PANEL,
            Some((self.caption.as_str(), style::INFORMATION)),
        );

        let field_w = width.saturating_sub(4);
        let cx = self.input.paint(buf, (x + 2, y + 1), field_w);
        self.cursor_at = Some((cx, y + 1));
        buf.paint_text(x + 2, y + 2, &self.filter, style::HINT, right);
        buf.paint_text(x + 2, y + 4, "Enter accept   Esc cancel", style::HINT, right);
    }

    fn cursor(&self) -> Option<CursorPlacement> {
        self.cursor_at.map(|(x, y)| (x, y, CursorShape::SteadyBar))
    }
}

// ─── PrintPrompt ────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PrintTarget {
    Printer,
    File,
}

/// Choose the system printer (optionally a queue) or a file. Up, Down or
/// Tab switch target; typing edits the chosen target's field.
pub struct PrintPrompt {
    target: PrintTarget,
    queue: LineInput,
    file: LineInput,
    cursor_at: Option<(u16, u16)>,
}

impl PrintPrompt {
    pub fn new(start_dir: &str) -> Self {
        Self {
            target: PrintTarget::Printer,
            queue: LineInput::default(),
            file: LineInput::new(start_dir),
            cursor_at: None,
        }
    }

    fn field(&mut self) -> &mut LineInput {
        match self.target {
            PrintTarget::Printer => &mut self.queue,
            PrintTarget::File => &mut self.file,
        }
    }

    fn answer(&self) -> Option<PrintDestination> {
        match self.target {
            PrintTarget::Printer => {
                let queue = self.queue.text().trim();
                Some(PrintDestination::Spooler {
                    queue: (!queue.is_empty()).then(|| queue.to_string()),
                })
            }
            PrintTarget::File => {
                let path = self.file.text().trim();
                (!path.is_empty()).then(|| PrintDestination::File(PathBuf::from(path)))
            }
        }
    }
}

impl Modal for PrintPrompt {
    type Output = Option<PrintDestination>;

    fn on_event(&mut self, event: &Event) -> ModalAction<Self::Output> {
        match event {
            Event::Paste(text) => self.field().insert(text),
            Event::Key(key) => match key.code {
                KeyCode::Escape => return ModalAction::Done(None),
                KeyCode::Enter => {
                    if let Some(destination) = self.answer() {
                        return ModalAction::Done(Some(destination));
                    }
                }
                KeyCode::Up | KeyCode::Down | KeyCode::Tab | KeyCode::BackTab => {
                    self.target = match self.target {
                        PrintTarget::Printer => PrintTarget::File,
                        PrintTarget::File => PrintTarget::Printer,
                    };
                }
                _ => {
                    self.field().handle_key(key);
                }
            },
        }
        ModalAction::Continue
    }

    fn paint(&mut self, buf: &mut FrameBuffer) {
        let width = box_width(buf);
        let height = 7;
        let (x, y) = centered(buf, width, height);
        let right = (x + width).saturating_sub(1);
        style::draw_box(
            buf,
            (x, y),
            (width, height),
            style::PANEL,
            Some(("Print", style::INFORMATION)),
        );

        let rows = [
            (PrintTarget::Printer, "System printer, queue:", &self.queue),
            (PrintTarget::File, "File:", &self.file),
        ];
        let label_w = 24;
        self.cursor_at = None;
        for (i, (target, label, input)) in rows.into_iter().enumerate() {
            let ry = y + 1 + to_u16(i);
            let mark = if target == self.target { "(•) " } else { "( ) " };
            buf.paint_text(x + 2, ry, mark, style::PANEL, right);
            buf.paint_text(x + 6, ry, label, style::PANEL, right);
            let fx = x + 6 + label_w;
            let cx = input.paint(buf, (fx, ry), right.saturating_sub(fx + 1));
            if target == self.target {
                self.cursor_at = Some((cx, ry));
            }
        }
        buf.paint_text(x + 2, y + 3, "Empty queue prints to the default printer", style::HINT, right);
        buf.paint_text(x + 2, y + 5, "Tab switch   Enter print   Esc cancel", style::HINT, right);
    }

    fn cursor(&self) -> Option<CursorPlacement> {
        self.cursor_at.map(|(x, y)| (x, y, CursorShape::SteadyBar))
    }
}

// ─── Layout helpers ─────────────────────────────────────────────────────────

fn box_width(buf: &FrameBuffer) -> u16 {
    buf.width().saturating_sub(4).min(MAX_BOX_WIDTH)
}

fn centered(buf: &FrameBuffer, width: u16, height: u16) -> (u16, u16) {
    (
        buf.width().saturating_sub(width) / 2,
        buf.height().saturating_sub(height) / 2,
    )
}

fn to_u16(n: usize) -> u16 {
    u16::try_from(n).unwrap_or(u16::MAX)
}

/// Greedy word wrap to `width` columns. Words longer than a line are split.
fn wrap(text: &str, width: usize) -> Vec<String> {
    let mut lines = Vec::new();
    for paragraph in text.lines() {
        let mut line = String::new();
        let mut line_w = 0;
        for word in paragraph.split(' ') {
            let word_w = string_width(word);
            if line_w > 0 && line_w + 1 + word_w > width {
                lines.push(std::mem::take(&mut line));
                line_w = 0;
            }
            if line_w > 0 {
                line.push(' ');
                line_w += 1;
            }
            for ch in word.chars() {
                let w = char_width(ch);
                if line_w + w > width && line_w > 0 {
                    lines.push(std::mem::take(&mut line));
                    line_w = 0;
                }
                line.push(ch);
                line_w += w;
            }
        }
        lines.push(line);
    }
    if lines.is_empty() {
        lines.push(String::new());
    }
    lines
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn key(code: KeyCode) -> Event {
        Event::Key(KeyEvent::plain(code))
    }

    fn type_into<M: Modal>(modal: &mut M, text: &str) {
        for ch in text.chars() {
            assert!(matches!(
                modal.on_event(&key(KeyCode::Char(ch))),
                ModalAction::Continue
            ));
        }
    }

    fn screen(buf: &FrameBuffer) -> String {
        (0..buf.height()).map(|y| buf.row_text(y) + "\n").collect()
    }

    // -- LineInput ----------------------------------------------------------

    #[test]
    fn line_input_edits_at_cursor() {
        let mut input = LineInput::new("/tmp/");
        input.insert("ab");
        input.handle_key(&KeyEvent::plain(KeyCode::Left));
        input.handle_key(&KeyEvent::plain(KeyCode::Backspace));
        assert_eq!(input.text(), "/tmp/b");
        input.handle_key(&KeyEvent::plain(KeyCode::Home));
        input.handle_key(&KeyEvent::plain(KeyCode::Delete));
        assert_eq!(input.text(), "tmp/b");
        input.handle_key(&KeyEvent::ctrl('u'));
        assert_eq!(input.text(), "");
    }

    #[test]
    fn line_input_drops_control_chars() {
        let mut input = LineInput::default();
        input.insert("a\nb\tc");
        assert_eq!(input.text(), "abc");
    }

    #[test]
    fn line_input_scrolls_to_cursor() {
        let input = LineInput::new("abcdefghij");
        let mut buf = FrameBuffer::new(6, 1);
        let cx = input.paint(&mut buf, (0, 0), 6);
        assert_eq!(buf.row_text(0), "fghij ");
        assert_eq!(cx, 5);
    }

    // -- MessageBox ---------------------------------------------------------

    #[test]
    fn message_box_dismiss_keys() {
        let mut mb = MessageBox::new("x", Severity::Critical);
        assert!(matches!(mb.on_event(&key(KeyCode::Char('a'))), ModalAction::Continue));
        assert!(matches!(mb.on_event(&key(KeyCode::Enter)), ModalAction::Done(())));
        assert!(matches!(mb.on_event(&key(KeyCode::Escape)), ModalAction::Done(())));
    }

    #[test]
    fn message_box_paints_text_and_title() {
        let mut buf = FrameBuffer::new(60, 12);
        MessageBox::new("a.txt: Permission denied", Severity::Critical).paint(&mut buf);
        let text = screen(&buf);
        assert!(text.contains(" Error "));
        assert!(text.contains("a.txt: Permission denied"));
        assert!(text.contains("[ OK ]"));
    }

    #[test]
    fn information_box_uses_app_name() {
        let mut buf = FrameBuffer::new(60, 12);
        MessageBox::new("hello", Severity::Information).paint(&mut buf);
        assert!(screen(&buf).contains(" notepyd "));
    }

    #[test]
    fn wrap_breaks_on_words() {
        assert_eq!(wrap("one two three", 8), ["one two", "three"]);
        assert_eq!(wrap("abcdefghij", 4), ["abcd", "efgh", "ij"]);
        assert_eq!(wrap("a\nb", 10), ["a", "b"]);
        assert_eq!(wrap("", 10), [""]);
    }

    // -- PathPrompt ---------------------------------------------------------

    #[test]
    fn path_prompt_accepts_typed_path() {
        let mut p = PathPrompt::new("Open file", "Text Document (*.txt)", "/tmp/");
        type_into(&mut p, "a.txt");
        match p.on_event(&key(KeyCode::Enter)) {
            ModalAction::Done(answer) => assert_eq!(answer, Some(PathBuf::from("/tmp/a.txt"))),
            ModalAction::Continue => panic!("enter should answer"),
        }
    }

    #[test]
    fn path_prompt_escape_cancels() {
        let mut p = PathPrompt::new("Open file", "", "/tmp/");
        assert!(matches!(p.on_event(&key(KeyCode::Escape)), ModalAction::Done(None)));
    }

    #[test]
    fn path_prompt_takes_paste() {
        let mut p = PathPrompt::new("Open file", "", "");
        p.on_event(&Event::Paste("/srv/notes.md\n".into()));
        assert_eq!(p.input.text(), "/srv/notes.md");
    }

    #[test]
    fn path_prompt_paints_caption_filter_and_cursor() {
        let mut buf = FrameBuffer::new(80, 20);
        let mut p = PathPrompt::new("Save file as...", "Markdown (*.md)", "/tmp/");
        p.paint(&mut buf);
        let text = screen(&buf);
        assert!(text.contains(" Save file as... "));
        assert!(text.contains("Markdown (*.md)"));
        let (cx, cy, shape) = p.cursor().unwrap();
        assert_eq!(shape, CursorShape::SteadyBar);
        assert!(buf.row_text(cy).contains("/tmp/"));
        assert!(cx > 0);
    }

    // -- PrintPrompt --------------------------------------------------------

    #[test]
    fn print_prompt_defaults_to_default_printer() {
        let mut p = PrintPrompt::new("/tmp/");
        assert!(matches!(
            p.on_event(&key(KeyCode::Enter)),
            ModalAction::Done(Some(PrintDestination::Spooler { queue: None }))
        ));
    }

    #[test]
    fn print_prompt_named_queue() {
        let mut p = PrintPrompt::new("/tmp/");
        type_into(&mut p, "office");
        match p.on_event(&key(KeyCode::Enter)) {
            ModalAction::Done(answer) => assert_eq!(
                answer,
                Some(PrintDestination::Spooler {
                    queue: Some("office".into())
                })
            ),
            ModalAction::Continue => panic!("enter should answer"),
        }
    }

    #[test]
    fn print_prompt_to_file() {
        let mut p = PrintPrompt::new("/tmp/");
        p.on_event(&key(KeyCode::Tab));
        type_into(&mut p, "out.txt");
        match p.on_event(&key(KeyCode::Enter)) {
            ModalAction::Done(answer) => assert_eq!(
                answer,
                Some(PrintDestination::File(PathBuf::from("/tmp/out.txt")))
            ),
            ModalAction::Continue => panic!("enter should answer"),
        }
    }

    #[test]
    fn print_prompt_empty_file_waits() {
        let mut p = PrintPrompt::new("");
        p.on_event(&key(KeyCode::Down));
        assert!(matches!(p.on_event(&key(KeyCode::Enter)), ModalAction::Continue));
        assert!(matches!(p.on_event(&key(KeyCode::Escape)), ModalAction::Done(None)));
    }

    #[test]
    fn print_prompt_marks_choice() {
        let mut buf = FrameBuffer::new(80, 20);
        let mut p = PrintPrompt::new("/tmp/");
        p.paint(&mut buf);
        assert!(screen(&buf).contains("(•) System printer"));
        assert!(screen(&buf).contains("( ) File:"));
    }

    #[test]
    fn dialogs_paint_on_tiny_terminals() {
        for width in [0, 1, 2, 4] {
            let mut buf = FrameBuffer::new(width, 10);
            MessageBox::new("a.txt: Permission denied", Severity::Critical).paint(&mut buf);
            PathPrompt::new("Open file", "Text Document (*.txt)", "/tmp/").paint(&mut buf);
            PrintPrompt::new("/tmp/").paint(&mut buf);
            assert_eq!(buf.width(), width);
        }
    }
}
