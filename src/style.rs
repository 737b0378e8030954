// SPDX-License-Identifier: MIT
//
// Colors for the window chrome and dialogs, plus the box outline they share.

use notepyd_term::buffer::{FrameBuffer, string_width};
use notepyd_term::cell::{Attr, Cell, Style};
use notepyd_term::color::CellColor;

pub const TITLE_BAR: Style =
    Style::new(CellColor::BRIGHT_WHITE, CellColor::BLUE).with_attrs(Attr::BOLD);
pub const MENU_BAR: Style = Style::new(CellColor::BLACK, CellColor::WHITE);
pub const MENU_ACTIVE: Style = Style::new(CellColor::BRIGHT_WHITE, CellColor::BLUE);
pub const STATUS_BAR: Style = Style::new(CellColor::BLACK, CellColor::WHITE);
pub const SELECTION: Style = Style::PLAIN.with_attrs(Attr::INVERSE);
pub const PANEL: Style = Style::new(CellColor::BLACK, CellColor::WHITE);
pub const CRITICAL: Style =
    Style::new(CellColor::BRIGHT_WHITE, CellColor::RED).with_attrs(Attr::BOLD);
pub const INFORMATION: Style =
    Style::new(CellColor::BRIGHT_WHITE, CellColor::BLUE).with_attrs(Attr::BOLD);
pub const INPUT: Style = Style::new(CellColor::BRIGHT_WHITE, CellColor::BLACK);
pub const HINT: Style = Style::new(CellColor::GRAY, CellColor::WHITE);

/// Fill `width` x `height` at `(x, y)` with `style` and draw a single-line
/// border around it. `title`, if any, sits in the top edge.
pub fn draw_box(
    buf: &mut FrameBuffer,
    (x, y): (u16, u16),
    (width, height): (u16, u16),
    style: Style,
    title: Option<(&str, Style)>,
) {
    if width < 2 || height < 2 {
        return;
    }
    buf.fill_rect(x, y, width, height, style);
    let right = x + width - 1;
    let bottom = y + height - 1;

    for cx in x + 1..right {
        buf.set(cx, y, Cell::styled('─', style));
        buf.set(cx, bottom, Cell::styled('─', style));
    }
    for cy in y + 1..bottom {
        buf.set(x, cy, Cell::styled('│', style));
        buf.set(right, cy, Cell::styled('│', style));
    }
    buf.set(x, y, Cell::styled('┌', style));
    buf.set(right, y, Cell::styled('┐', style));
    buf.set(x, bottom, Cell::styled('└', style));
    buf.set(right, bottom, Cell::styled('┘', style));

    if let Some((title, title_style)) = title {
        buf.paint_text(x + 1, y, &format!(" {title} "), title_style, right);
    }
}

/// An icon value the terminal can draw: a single glyph, not an image path.
pub fn glyph(icon: &str) -> Option<&str> {
    let icon = icon.trim();
    let width = string_width(icon);
    (icon.chars().count() <= 2 && (1..=2).contains(&width)).then_some(icon)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn glyph_accepts_single_symbols() {
        assert_eq!(glyph("✎"), Some("✎"));
        assert_eq!(glyph(" x "), Some("x"));
    }

    #[test]
    fn glyph_rejects_paths() {
        assert_eq!(glyph("assets/icons/new.png"), None);
        assert_eq!(glyph(""), None);
    }

    #[test]
    fn box_has_corners_and_title() {
        let mut buf = FrameBuffer::new(12, 4);
        draw_box(&mut buf, (1, 0), (10, 3), PANEL, Some(("Hi", PANEL)));
        assert_eq!(buf.row_text(0), " ┌ Hi ────┐ ");
        assert_eq!(buf.row_text(1), " │        │ ");
        assert_eq!(buf.row_text(2), " └────────┘ ");
    }

    #[test]
    fn tiny_box_is_skipped() {
        let mut buf = FrameBuffer::new(4, 4);
        draw_box(&mut buf, (0, 0), (1, 1), PANEL, None);
        assert_eq!(buf.row_text(0), "    ");
    }
}
