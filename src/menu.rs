// SPDX-License-Identifier: MIT
//
// Menu bar and drop-down menus, built from the command table.
//
//   ┌──────────────────────────────┐
//   │ File   Edit   Help           │  ← bar, the open menu highlighted
//   │┌─────────────────────────┐   │
//   ││ 🗋 New file      Ctrl+N │   │  ← drop-down over the editor pane
//   ││ 🗁 Open...       Ctrl+O │   │
//   │└─────────────────────────┘   │
//
// While a menu is open it takes every key: Up/Down move, Left/Right switch
// menus, Enter runs the highlighted command, Escape or F10 closes.

use notepyd_core::command::{CommandId, CommandSpec, Menu};
use notepyd_core::config::Icons;
use notepyd_term::buffer::{FrameBuffer, string_width};
use notepyd_term::cell::Attr;
use notepyd_term::input::{KeyCode, KeyEvent, Modifiers};

use crate::style;

/// Gap between menu titles in the bar.
const TITLE_PAD: u16 = 1;

/// What the menu did with a key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuOutcome {
    Consumed,
    Run(CommandId),
    Closed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct OpenMenu {
    menu: Menu,
    item: usize,
}

#[derive(Debug, Default)]
pub struct MenuBar {
    open: Option<OpenMenu>,
}

impl MenuBar {
    pub const fn new() -> Self {
        Self { open: None }
    }

    pub const fn open(&mut self, menu: Menu) {
        self.open = Some(OpenMenu { menu, item: 0 });
    }

    pub const fn close(&mut self) {
        self.open = None;
    }

    pub const fn is_open(&self) -> bool {
        self.open.is_some()
    }

    pub fn open_menu(&self) -> Option<Menu> {
        self.open.map(|o| o.menu)
    }

    /// The command under the highlight.
    pub fn highlighted(&self) -> Option<&'static CommandSpec> {
        let open = self.open?;
        open.menu.commands().nth(open.item)
    }

    pub fn handle_key(&mut self, key: &KeyEvent) -> MenuOutcome {
        let Some(open) = self.open.as_mut() else {
            return MenuOutcome::Closed;
        };
        let count = open.menu.commands().count();

        match key.code {
            KeyCode::Escape | KeyCode::F(10) => {
                self.open = None;
                return MenuOutcome::Closed;
            }
            KeyCode::Up => open.item = (open.item + count - 1) % count,
            KeyCode::Down | KeyCode::Tab => open.item = (open.item + 1) % count,
            KeyCode::Left => self.switch(-1),
            KeyCode::Right => self.switch(1),
            KeyCode::Home => open.item = 0,
            KeyCode::End => open.item = count - 1,
            KeyCode::Enter => {
                let chosen = self.highlighted().map(|c| c.id);
                self.open = None;
                return chosen.map_or(MenuOutcome::Closed, MenuOutcome::Run);
            }
            KeyCode::Char(ch) if key.modifiers.contains(Modifiers::ALT) => {
                if let Some(menu) = menu_for_mnemonic(ch) {
                    self.open(menu);
                }
            }
            _ => {}
        }
        MenuOutcome::Consumed
    }

    fn switch(&mut self, delta: isize) {
        let Some(open) = self.open else {
            return;
        };
        let len = Menu::ALL.len();
        let i = Menu::ALL.iter().position(|m| *m == open.menu).unwrap_or(0);
        let next = (i + len).wrapping_add_signed(delta) % len;
        self.open(Menu::ALL[next]);
    }

    // ─── Painting ───────────────────────────────────────────────────────

    /// The bar row: every menu title, the mnemonic underlined.
    pub fn paint_bar(&self, buf: &mut FrameBuffer, y: u16) {
        buf.fill_rect(0, y, buf.width(), 1, style::MENU_BAR);
        for menu in Menu::ALL {
            let x = title_x(menu);
            let style = if self.open_menu() == Some(menu) {
                style::MENU_ACTIVE
            } else {
                style::MENU_BAR
            };
            let label = format!(" {} ", menu.label());
            buf.paint_text(x, y, &label, style, buf.width());
            buf.restyle(x + 1, y, 1, style.add(Attr::UNDERLINE));
        }
    }

    /// The open drop-down, top edge at row `y`.
    pub fn paint_dropdown(&self, buf: &mut FrameBuffer, y: u16, icons: &Icons) {
        let Some(open) = self.open else {
            return;
        };
        let rows: Vec<Row> = open.menu.commands().map(|c| Row::new(c, icons)).collect();
        let label_w = rows.iter().map(|r| string_width(r.spec.label)).max().unwrap_or(0);
        let key_w = rows.iter().map(|r| string_width(&r.shortcut)).max().unwrap_or(0);

        // "│ II Label   Shortcut │"
        let inner = 3 + label_w + if key_w > 0 { 3 + key_w } else { 0 };
        let width = clamp_u16(inner + 4).min(buf.width());
        let height = clamp_u16(rows.len() + 2);
        let x = title_x(open.menu).min(buf.width().saturating_sub(width));

        style::draw_box(buf, (x, y), (width, height), style::PANEL, None);

        let right = (x + width).saturating_sub(1);
        for (i, row) in rows.iter().enumerate() {
            let ry = y + 1 + clamp_u16(i);
            let style = if i == open.item {
                style::MENU_ACTIVE
            } else {
                style::PANEL
            };
            buf.fill_rect(x + 1, ry, width.saturating_sub(2), 1, style);
            if let Some(icon) = row.icon {
                buf.paint_text(x + 2, ry, icon, style, right);
            }
            buf.paint_text(x + 5, ry, row.spec.label, style, right);
            let key_x = right.saturating_sub(1 + clamp_u16(string_width(&row.shortcut)));
            buf.paint_text(key_x, ry, &row.shortcut, style, right);
        }
    }
}

struct Row<'a> {
    spec: &'static CommandSpec,
    icon: Option<&'a str>,
    shortcut: String,
}

impl<'a> Row<'a> {
    fn new(spec: &'static CommandSpec, icons: &'a Icons) -> Self {
        Self {
            spec,
            icon: icons.get(spec.icon).and_then(style::glyph),
            shortcut: spec.shortcut.map(|s| s.to_string()).unwrap_or_default(),
        }
    }
}

/// Column where `menu`'s title starts in the bar.
pub fn title_x(menu: Menu) -> u16 {
    let mut x = 0;
    for m in Menu::ALL {
        if m == menu {
            break;
        }
        x += clamp_u16(string_width(m.label())) + 2 + TITLE_PAD;
    }
    x
}

pub fn menu_for_mnemonic(ch: char) -> Option<Menu> {
    let ch = ch.to_ascii_lowercase();
    Menu::ALL.into_iter().find(|m| m.mnemonic() == ch)
}

fn clamp_u16(n: usize) -> u16 {
    u16::try_from(n).unwrap_or(u16::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::plain(code)
    }

    fn icons() -> Icons {
        Icons {
            main: "✎".into(),
            new_file: "N".into(),
            open: "O".into(),
            save: "S".into(),
            save_as: "assets/icons/save_as.png".into(),
            print: "P".into(),
            undo: "U".into(),
            redo: "R".into(),
            cut: "X".into(),
            copy: "C".into(),
            paste: "V".into(),
            select_all: "A".into(),
            about: "i".into(),
        }
    }

    #[test]
    fn titles_are_laid_out_left_to_right() {
        assert_eq!(title_x(Menu::File), 0);
        assert_eq!(title_x(Menu::Edit), 7);
        assert_eq!(title_x(Menu::Help), 14);
    }

    #[test]
    fn mnemonics() {
        assert_eq!(menu_for_mnemonic('F'), Some(Menu::File));
        assert_eq!(menu_for_mnemonic('h'), Some(Menu::Help));
        assert_eq!(menu_for_mnemonic('z'), None);
    }

    #[test]
    fn arrows_move_and_wrap() {
        let mut bar = MenuBar::new();
        bar.open(Menu::File);
        assert_eq!(bar.highlighted().map(|c| c.id), Some(CommandId::New));
        bar.handle_key(&key(KeyCode::Up));
        assert_eq!(bar.highlighted().map(|c| c.id), Some(CommandId::Print));
        bar.handle_key(&key(KeyCode::Down));
        bar.handle_key(&key(KeyCode::Down));
        assert_eq!(bar.highlighted().map(|c| c.id), Some(CommandId::Open));
    }

    #[test]
    fn left_right_switch_menus() {
        let mut bar = MenuBar::new();
        bar.open(Menu::File);
        bar.handle_key(&key(KeyCode::Left));
        assert_eq!(bar.open_menu(), Some(Menu::Help));
        bar.handle_key(&key(KeyCode::Right));
        bar.handle_key(&key(KeyCode::Right));
        assert_eq!(bar.open_menu(), Some(Menu::Edit));
        assert_eq!(bar.highlighted().map(|c| c.id), Some(CommandId::Undo));
    }

    #[test]
    fn enter_runs_and_closes() {
        let mut bar = MenuBar::new();
        bar.open(Menu::File);
        bar.handle_key(&key(KeyCode::Down));
        assert_eq!(bar.handle_key(&key(KeyCode::Enter)), MenuOutcome::Run(CommandId::Open));
        assert!(!bar.is_open());
    }

    #[test]
    fn escape_closes() {
        let mut bar = MenuBar::new();
        bar.open(Menu::Help);
        assert_eq!(bar.handle_key(&key(KeyCode::Escape)), MenuOutcome::Closed);
        assert!(!bar.is_open());
        assert!(bar.highlighted().is_none());
    }

    #[test]
    fn alt_mnemonic_switches() {
        let mut bar = MenuBar::new();
        bar.open(Menu::File);
        let alt_e = KeyEvent::new(KeyCode::Char('e'), Modifiers::ALT);
        assert_eq!(bar.handle_key(&alt_e), MenuOutcome::Consumed);
        assert_eq!(bar.open_menu(), Some(Menu::Edit));
    }

    #[test]
    fn bar_paints_titles() {
        let mut buf = FrameBuffer::new(24, 1);
        MenuBar::new().paint_bar(&mut buf, 0);
        assert_eq!(buf.row_text(0), " File   Edit   Help     ");
        assert!(buf.get(1, 0).unwrap().style().attrs.contains(Attr::UNDERLINE));
    }

    #[test]
    fn dropdown_lists_commands_with_shortcuts() {
        let mut buf = FrameBuffer::new(40, 10);
        let mut bar = MenuBar::new();
        bar.open(Menu::File);
        bar.paint_dropdown(&mut buf, 1, &icons());

        assert!(buf.row_text(2).contains("N  New file"));
        assert!(buf.row_text(2).contains("Ctrl+N"));
        // Path-like icons are not drawn.
        assert!(buf.row_text(5).starts_with("│    Save as"));
        assert!(buf.row_text(5).contains("Ctrl+Shift+S"));
        assert_eq!(buf.get(2, 2).unwrap().style(), style::MENU_ACTIVE);
    }

    #[test]
    fn dropdown_paints_on_tiny_terminals() {
        let mut bar = MenuBar::new();
        bar.open(Menu::Help);
        for width in [0, 1, 3] {
            let mut buf = FrameBuffer::new(width, 10);
            bar.paint_dropdown(&mut buf, 1, &icons());
            assert_eq!(buf.width(), width);
        }
    }
}
