// SPDX-License-Identifier: MIT
//
// The editor window: chrome around one TextEdit, wired to the dispatcher.
//
//   ┌──────────────────────────────┐
//   │ ✎ Untitled - notepyd         │  ← title bar (icon + document title)
//   ├──────────────────────────────┤
//   │ File   Edit   Help           │  ← menu bar
//   ├──────────────────────────────┤
//   │ text pane                    │  ← h - 3 rows
//   ├──────────────────────────────┤
//   │ tip / message     Ln, Col …  │  ← status bar
//   └──────────────────────────────┘
//
// Every event flows through `handle_event` with a `Dialogs` implementation:
// the terminal one in `on_event`, a scripted one in tests.

use log::debug;
use notepyd_core::command::{self, CommandId, Context, Dispatcher, Menu};
use notepyd_core::config::Settings;
use notepyd_core::dialog::Dialogs;
use notepyd_core::position::Position;
use notepyd_core::print::Printer;
use notepyd_core::surface::{EditorSurface, TextEdit, char_display_width};
use notepyd_term::ansi::CursorShape;
use notepyd_term::buffer::{FrameBuffer, string_width};
use notepyd_term::cell::{Cell, Style};
use notepyd_term::event_loop::{Action, App, CursorPlacement, Ui};
use notepyd_term::input::{Event, KeyCode, KeyEvent, Modifiers};

use crate::dialogs::TermDialogs;
use crate::menu::{self, MenuBar, MenuOutcome};
use crate::style;

const TITLE_ROW: u16 = 0;
const MENU_ROW: u16 = 1;
const TEXT_TOP: u16 = 2;
/// Title, menu and status rows.
const CHROME_ROWS: u16 = 3;

pub const STARTUP_HINT: &str = "F10 menu   Ctrl+Q quit";

pub struct Window {
    dispatcher: Dispatcher,
    surface: TextEdit,
    printer: Box<dyn Printer>,
    settings: Settings,
    menu: MenuBar,
    message: Option<String>,
    /// Text pane size from the last paint, for paging.
    text_rows: usize,
    cursor_screen: Option<(u16, u16)>,
}

impl Window {
    pub fn new(settings: Settings, printer: Box<dyn Printer>) -> Self {
        Self {
            dispatcher: Dispatcher::new(),
            surface: TextEdit::new(),
            printer,
            settings,
            menu: MenuBar::new(),
            message: Some(STARTUP_HINT.to_string()),
            text_rows: 1,
            cursor_screen: None,
        }
    }

    pub fn handle_event(&mut self, event: &Event, dialogs: &mut dyn Dialogs) -> Action {
        match event {
            Event::Paste(text) => {
                if !self.menu.is_open() {
                    self.surface.insert_text(&normalize_newlines(text));
                    self.message = None;
                }
                Action::Continue
            }
            Event::Key(key) if self.menu.is_open() => {
                if let MenuOutcome::Run(id) = self.menu.handle_key(key) {
                    self.run(id, dialogs);
                }
                Action::Continue
            }
            Event::Key(key) => self.handle_key(key, dialogs),
        }
    }

    fn handle_key(&mut self, key: &KeyEvent, dialogs: &mut dyn Dialogs) -> Action {
        let ctrl = key.modifiers.contains(Modifiers::CTRL);
        let alt = key.modifiers.contains(Modifiers::ALT);
        let shift = key.modifiers.contains(Modifiers::SHIFT);

        match key.code {
            KeyCode::Char('q' | 'Q') if ctrl => return Action::Quit,
            KeyCode::Char(ch) if ctrl => {
                if let Some(spec) = command::find_by_shortcut(ch, shift) {
                    self.run(spec.id, dialogs);
                }
            }
            KeyCode::Char('s' | 'S') if alt => self.run(CommandId::SaveAs, dialogs),
            KeyCode::Char(ch) if alt => {
                if let Some(m) = menu::menu_for_mnemonic(ch) {
                    self.menu.open(m);
                }
            }
            KeyCode::F(10) => self.menu.open(Menu::File),
            _ => {
                if self.edit_key(key.code, ctrl, shift) {
                    self.message = None;
                }
            }
        }
        Action::Continue
    }

    /// Keys that edit or move inside the text pane.
    fn edit_key(&mut self, code: KeyCode, ctrl: bool, shift: bool) -> bool {
        let s = &mut self.surface;
        match code {
            KeyCode::Char(ch) => s.insert_char(ch),
            KeyCode::Enter => s.newline(),
            KeyCode::Tab => s.tab(),
            KeyCode::Backspace => s.backspace(),
            KeyCode::Delete => s.delete_forward(),
            KeyCode::Left => s.move_left(shift),
            KeyCode::Right => s.move_right(shift),
            KeyCode::Up => s.move_up(shift),
            KeyCode::Down => s.move_down(shift),
            KeyCode::Home if ctrl => s.doc_start(shift),
            KeyCode::End if ctrl => s.doc_end(shift),
            KeyCode::Home => s.line_start(shift),
            KeyCode::End => s.line_end(shift),
            KeyCode::PageUp => s.page_up(self.text_rows, shift),
            KeyCode::PageDown => s.page_down(self.text_rows, shift),
            _ => return false,
        }
        true
    }

    fn run(&mut self, id: CommandId, dialogs: &mut dyn Dialogs) {
        self.menu.close();
        let spec = id.spec();
        debug!("run {id:?}");
        let mut ctx = Context {
            surface: &mut self.surface,
            dialogs,
            printer: self.printer.as_mut(),
        };
        let ok = self.dispatcher.run(id, &mut ctx);
        self.message = (!ok).then(|| format!("{} failed", spec.label));
    }

    // ─── Painting ───────────────────────────────────────────────────────

    fn paint_title(&self, buf: &mut FrameBuffer) {
        buf.fill_rect(0, TITLE_ROW, buf.width(), 1, style::TITLE_BAR);
        let title = style::glyph(&self.settings.icons.main).map_or_else(
            || format!(" {}", self.dispatcher.title()),
            |icon| format!(" {icon} {}", self.dispatcher.title()),
        );
        buf.paint_text(0, TITLE_ROW, &title, style::TITLE_BAR, buf.width());
    }

    fn paint_text(&mut self, buf: &mut FrameBuffer, rows: u16) {
        let cols = buf.width();
        self.text_rows = usize::from(rows).max(1);
        self.surface.scroll_into_view(usize::from(rows), usize::from(cols));
        let (scroll_line, scroll_col) = self.surface.scroll();
        let selection = self.surface.selection();
        let buffer = self.surface.buffer();
        let last_line = buffer.line_count().saturating_sub(1);

        for r in 0..rows {
            let line = scroll_line + usize::from(r);
            if line > last_line {
                break;
            }
            let y = TEXT_TOP + r;
            let selected = |col: usize| selection.is_some_and(|s| s.contains(Position::new(line, col)));

            let mut col = 0;
            let mut len = 0;
            for (ci, ch) in buffer.line_text(line).chars().enumerate() {
                let width = char_display_width(ch, col);
                let style = if selected(ci) { style::SELECTION } else { Style::PLAIN };
                if col >= scroll_col {
                    let Ok(x) = u16::try_from(col - scroll_col) else {
                        break;
                    };
                    if x >= cols {
                        break;
                    }
                    if ch == '\t' {
                        buf.fill_rect(x, y, u16::try_from(width).unwrap_or(1), 1, style);
                    } else {
                        let mut enc = [0u8; 4];
                        buf.paint_text(x, y, ch.encode_utf8(&mut enc), style, cols);
                    }
                }
                col += width;
                len = ci + 1;
            }

            // A selected line break shows as one highlighted cell.
            if line < last_line && selected(len) && col >= scroll_col {
                if let Ok(x) = u16::try_from(col - scroll_col) {
                    buf.set(x, y, Cell::styled(' ', style::SELECTION));
                }
            }
        }

        let cursor = self.surface.cursor();
        let x = self.surface.display_col(cursor).checked_sub(scroll_col);
        let y = cursor.line.checked_sub(scroll_line);
        self.cursor_screen = match (x, y) {
            (Some(x), Some(y)) if x < usize::from(cols) && y < usize::from(rows) => {
                u16::try_from(x).ok().zip(u16::try_from(y).ok().map(|y| TEXT_TOP + y))
            }
            _ => None,
        };
    }

    fn paint_status(&self, buf: &mut FrameBuffer, y: u16) {
        let width = buf.width();
        buf.fill_rect(0, y, width, 1, style::STATUS_BAR);

        let left = if self.menu.is_open() {
            self.menu.highlighted().map(|c| c.status_tip)
        } else {
            self.message.as_deref()
        };

        let modified = if self.surface.is_modified() { "Modified   " } else { "" };
        let right = format!(
            "{modified}{}   {}pt ",
            self.surface.cursor(),
            self.settings.font.size
        );
        let right_w = u16::try_from(string_width(&right)).unwrap_or(width);
        let right_x = width.saturating_sub(right_w);
        if let Some(left) = left {
            buf.paint_text(1, y, left, style::STATUS_BAR, right_x.saturating_sub(1));
        }
        buf.paint_text(right_x, y, &right, style::STATUS_BAR, width);
    }
}

impl App for Window {
    fn on_event(&mut self, event: &Event, ui: &mut Ui) -> Action {
        let mut dialogs = TermDialogs::new(ui);
        self.handle_event(event, &mut dialogs)
    }

    fn paint(&mut self, buf: &mut FrameBuffer) {
        let h = buf.height();
        if h == 0 || buf.width() == 0 {
            return;
        }
        self.paint_title(buf);
        if h > MENU_ROW {
            self.menu.paint_bar(buf, MENU_ROW);
        }
        self.paint_text(buf, h.saturating_sub(CHROME_ROWS));
        if h >= CHROME_ROWS {
            self.paint_status(buf, h - 1);
        }
        if self.menu.is_open() {
            self.menu.paint_dropdown(buf, TEXT_TOP, &self.settings.icons);
            self.cursor_screen = None;
        }
    }

    fn cursor(&self) -> Option<CursorPlacement> {
        self.cursor_screen.map(|(x, y)| (x, y, CursorShape::SteadyBar))
    }

    fn title(&self) -> Option<String> {
        Some(self.dispatcher.title().to_string())
    }
}

/// Terminals send pasted line breaks as CR.
fn normalize_newlines(text: &str) -> String {
    text.replace("\r\n", "\n").replace('\r', "\n")
}
