// SPDX-License-Identifier: MIT
//
// Terminal input parser.
//
// Turns raw stdin bytes into key and paste events. Understands what
// `terminal.rs` enables:
//
// - Legacy CSI sequences (arrows, Home/End, editing keys, F-keys) with
//   xterm modifier parameters (`CSI 1;5A` = Ctrl+Up)
// - SS3 sequences (F1-F4 and arrows from some terminals)
// - Kitty keyboard protocol `CSI codepoint;modifiers u`
// - Bracketed paste
// - Alt+key (ESC followed by a printable character)
// - Control bytes and UTF-8 multi-byte characters
//
// Escape sequences may span several reads, so unconsumed bytes stay in the
// parser until the next `advance`. A lone ESC is ambiguous; the event loop
// calls `flush` after a quiet tick to turn it into an Escape key.

use bitflags::bitflags;

// ─── Event Types ─────────────────────────────────────────────────────────────

/// A parsed input event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    Key(KeyEvent),
    /// Text delivered between bracketed-paste delimiters.
    Paste(String),
}

/// A key press with modifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyEvent {
    pub code: KeyCode,
    pub modifiers: Modifiers,
}

impl KeyEvent {
    #[must_use]
    pub const fn new(code: KeyCode, modifiers: Modifiers) -> Self {
        Self { code, modifiers }
    }

    #[must_use]
    pub const fn plain(code: KeyCode) -> Self {
        Self::new(code, Modifiers::empty())
    }

    #[must_use]
    pub const fn ctrl(ch: char) -> Self {
        Self::new(KeyCode::Char(ch), Modifiers::CTRL)
    }
}

/// Identity of a key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyCode {
    Char(char),
    Enter,
    Tab,
    BackTab,
    Backspace,
    Escape,
    Delete,
    Insert,
    Up,
    Down,
    Left,
    Right,
    Home,
    End,
    PageUp,
    PageDown,
    /// F1 through F12.
    F(u8),
}

bitflags! {
    /// Modifier flags, in the xterm/Kitty bit order (`param = 1 + bits`).
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
    pub struct Modifiers: u8 {
        const SHIFT = 0b0001;
        const ALT   = 0b0010;
        const CTRL  = 0b0100;
        const SUPER = 0b1000;
    }
}

// ─── Parser ──────────────────────────────────────────────────────────────────

const PASTE_START: &[u8] = b"\x1b[200~";
const PASTE_END: &[u8] = b"\x1b[201~";

/// Longest CSI sequence we wait for before giving up on it.
const MAX_CSI_LEN: usize = 64;

/// Incremental input parser.
pub struct Parser {
    buf: Vec<u8>,
    in_paste: bool,
}

impl Parser {
    #[must_use]
    pub fn new() -> Self {
        Self {
            buf: Vec::with_capacity(64),
            in_paste: false,
        }
    }

    /// Feed raw bytes and return every event that is complete.
    pub fn advance(&mut self, data: &[u8]) -> Vec<Event> {
        self.buf.extend_from_slice(data);
        let mut events = Vec::new();
        let mut pos = 0;

        while pos < self.buf.len() {
            let remaining = &self.buf[pos..];

            if self.in_paste {
                let Some(end) = find_subsequence(remaining, PASTE_END) else {
                    break;
                };
                let text = String::from_utf8_lossy(&remaining[..end]).into_owned();
                events.push(Event::Paste(text));
                pos += end + PASTE_END.len();
                self.in_paste = false;
                continue;
            }

            if remaining.starts_with(PASTE_START) {
                self.in_paste = true;
                pos += PASTE_START.len();
                continue;
            }
            if remaining.len() < PASTE_START.len()
                && remaining.len() > 2
                && PASTE_START.starts_with(remaining)
            {
                // Could still become a paste start.
                break;
            }

            match try_parse(remaining) {
                Parsed::Event(event, consumed) => {
                    events.push(event);
                    pos += consumed;
                }
                Parsed::Skip(n) => pos += n,
                Parsed::Incomplete => break,
            }
        }

        self.buf.drain(..pos);
        events
    }

    /// Unconsumed bytes waiting for more input?
    #[must_use]
    pub fn has_pending(&self) -> bool {
        !self.buf.is_empty() && !self.in_paste
    }

    /// Resolve pending bytes after a quiet period: a lone ESC becomes the
    /// Escape key, an incomplete Alt/CSI prefix becomes Escape plus chars.
    pub fn flush(&mut self) -> Vec<Event> {
        if self.in_paste {
            return Vec::new();
        }
        let mut events = Vec::new();
        for &byte in &self.buf {
            let key = match byte {
                0x1B => KeyEvent::plain(KeyCode::Escape),
                b @ 0x20..=0x7E => KeyEvent::plain(KeyCode::Char(b as char)),
                _ => continue,
            };
            events.push(Event::Key(key));
        }
        self.buf.clear();
        events
    }
}

impl Default for Parser {
    fn default() -> Self {
        Self::new()
    }
}

// ─── Stateless parsing ───────────────────────────────────────────────────────

enum Parsed {
    Event(Event, usize),
    Incomplete,
    Skip(usize),
}

fn key(code: KeyCode, modifiers: Modifiers, consumed: usize) -> Parsed {
    Parsed::Event(Event::Key(KeyEvent::new(code, modifiers)), consumed)
}

fn try_parse(buf: &[u8]) -> Parsed {
    match buf[0] {
        0x1B => parse_escape(buf),
        0x00 => key(KeyCode::Char(' '), Modifiers::CTRL, 1),
        0x08 | 0x7F => key(KeyCode::Backspace, Modifiers::empty(), 1),
        0x09 => key(KeyCode::Tab, Modifiers::empty(), 1),
        0x0A | 0x0D => key(KeyCode::Enter, Modifiers::empty(), 1),
        b @ 0x01..=0x1A => key(KeyCode::Char((b + b'a' - 1) as char), Modifiers::CTRL, 1),
        b @ 0x1C..=0x1F => key(KeyCode::Char((b + b'@') as char), Modifiers::CTRL, 1),
        b @ 0x20..=0x7E => key(KeyCode::Char(b as char), Modifiers::empty(), 1),
        0xC0..=0xFF => parse_utf8(buf),
        _ => Parsed::Skip(1),
    }
}

fn parse_escape(buf: &[u8]) -> Parsed {
    let Some(&next) = buf.get(1) else {
        return Parsed::Incomplete;
    };
    match next {
        b'[' => parse_csi(buf),
        b'O' => parse_ss3(buf),
        b @ 0x20..=0x7E => key(KeyCode::Char(b as char), Modifiers::ALT, 2),
        _ => key(KeyCode::Escape, Modifiers::empty(), 1),
    }
}

/// `ESC O x`: F1-F4 and application-mode cursor keys.
fn parse_ss3(buf: &[u8]) -> Parsed {
    let Some(&final_byte) = buf.get(2) else {
        return Parsed::Incomplete;
    };
    let code = match final_byte {
        b'A' => KeyCode::Up,
        b'B' => KeyCode::Down,
        b'C' => KeyCode::Right,
        b'D' => KeyCode::Left,
        b'H' => KeyCode::Home,
        b'F' => KeyCode::End,
        b'P' => KeyCode::F(1),
        b'Q' => KeyCode::F(2),
        b'R' => KeyCode::F(3),
        b'S' => KeyCode::F(4),
        _ => return Parsed::Skip(3),
    };
    key(code, Modifiers::empty(), 3)
}

fn parse_csi(buf: &[u8]) -> Parsed {
    let Some(offset) = buf[2..].iter().position(|b| (0x40..=0x7E).contains(b)) else {
        return if buf.len() > MAX_CSI_LEN {
            Parsed::Skip(buf.len())
        } else {
            Parsed::Incomplete
        };
    };
    let end = 2 + offset;
    let consumed = end + 1;
    let params = &buf[2..end];
    let final_byte = buf[end];

    // Private-marker sequences (mouse, mode reports) are not ours.
    if params.first().is_some_and(|b| matches!(b, b'<' | b'?' | b'>' | b'=')) {
        return Parsed::Skip(consumed);
    }

    let nums = parse_params(params);
    let first = nums.first().copied().unwrap_or(1);
    let modifiers = nums.get(1).map_or(Modifiers::empty(), |&m| decode_modifiers(m));

    let code = match final_byte {
        b'A' => KeyCode::Up,
        b'B' => KeyCode::Down,
        b'C' => KeyCode::Right,
        b'D' => KeyCode::Left,
        b'H' => KeyCode::Home,
        b'F' => KeyCode::End,
        b'Z' => KeyCode::BackTab,
        b'P' => KeyCode::F(1),
        b'Q' => KeyCode::F(2),
        b'R' => KeyCode::F(3),
        b'S' => KeyCode::F(4),
        b'~' => match tilde_key(first) {
            Some(code) => code,
            None => return Parsed::Skip(consumed),
        },
        b'u' => match kitty_key(first) {
            Some(code) => code,
            None => return Parsed::Skip(consumed),
        },
        _ => return Parsed::Skip(consumed),
    };
    key(code, modifiers, consumed)
}

/// Split `1;5` / `115:83;6` into the first number of each parameter.
fn parse_params(params: &[u8]) -> Vec<u32> {
    params
        .split(|&b| b == b';')
        .map(|p| {
            p.iter()
                .take_while(|b| b.is_ascii_digit())
                .fold(0u32, |acc, b| acc.saturating_mul(10).saturating_add(u32::from(b - b'0')))
        })
        .collect()
}

fn decode_modifiers(param: u32) -> Modifiers {
    let bits = u8::try_from(param.saturating_sub(1) & 0xFF).unwrap_or(0);
    Modifiers::from_bits_truncate(bits)
}

fn tilde_key(n: u32) -> Option<KeyCode> {
    Some(match n {
        1 | 7 => KeyCode::Home,
        2 => KeyCode::Insert,
        3 => KeyCode::Delete,
        4 | 8 => KeyCode::End,
        5 => KeyCode::PageUp,
        6 => KeyCode::PageDown,
        15 => KeyCode::F(5),
        17 => KeyCode::F(6),
        18 => KeyCode::F(7),
        19 => KeyCode::F(8),
        20 => KeyCode::F(9),
        21 => KeyCode::F(10),
        23 => KeyCode::F(11),
        24 => KeyCode::F(12),
        _ => return None,
    })
}

fn kitty_key(codepoint: u32) -> Option<KeyCode> {
    Some(match codepoint {
        9 => KeyCode::Tab,
        13 => KeyCode::Enter,
        27 => KeyCode::Escape,
        127 => KeyCode::Backspace,
        // Private-use functional keys (lock keys, keypad, media).
        57_344.. => return None,
        cp => KeyCode::Char(char::from_u32(cp)?),
    })
}

fn parse_utf8(buf: &[u8]) -> Parsed {
    let len = match buf[0] {
        0xC0..=0xDF => 2,
        0xE0..=0xEF => 3,
        0xF0..=0xF7 => 4,
        _ => return Parsed::Skip(1),
    };
    if buf.len() < len {
        return Parsed::Incomplete;
    }
    match std::str::from_utf8(&buf[..len]).ok().and_then(|s| s.chars().next()) {
        Some(ch) => key(KeyCode::Char(ch), Modifiers::empty(), len),
        None => Parsed::Skip(1),
    }
}

fn find_subsequence(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    haystack.windows(needle.len()).position(|w| w == needle)
}

// ─── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn keys(bytes: &[u8]) -> Vec<Event> {
        Parser::new().advance(bytes)
    }

    fn k(code: KeyCode, modifiers: Modifiers) -> Event {
        Event::Key(KeyEvent::new(code, modifiers))
    }

    #[test]
    fn printable_ascii() {
        assert_eq!(
            keys(b"hi"),
            vec![
                k(KeyCode::Char('h'), Modifiers::empty()),
                k(KeyCode::Char('i'), Modifiers::empty())
            ]
        );
    }

    #[test]
    fn control_bytes() {
        assert_eq!(keys(b"\x13"), vec![k(KeyCode::Char('s'), Modifiers::CTRL)]);
        assert_eq!(keys(b"\r"), vec![k(KeyCode::Enter, Modifiers::empty())]);
        assert_eq!(keys(b"\x7f"), vec![k(KeyCode::Backspace, Modifiers::empty())]);
        assert_eq!(keys(b"\t"), vec![k(KeyCode::Tab, Modifiers::empty())]);
    }

    #[test]
    fn utf8_char() {
        assert_eq!(keys("é".as_bytes()), vec![k(KeyCode::Char('é'), Modifiers::empty())]);
    }

    #[test]
    fn utf8_split_across_reads() {
        let mut p = Parser::new();
        let bytes = "中".as_bytes();
        assert!(p.advance(&bytes[..1]).is_empty());
        assert_eq!(
            p.advance(&bytes[1..]),
            vec![k(KeyCode::Char('中'), Modifiers::empty())]
        );
    }

    #[test]
    fn arrows_and_modifiers() {
        assert_eq!(keys(b"\x1b[A"), vec![k(KeyCode::Up, Modifiers::empty())]);
        assert_eq!(keys(b"\x1b[1;2C"), vec![k(KeyCode::Right, Modifiers::SHIFT)]);
        assert_eq!(keys(b"\x1b[1;5H"), vec![k(KeyCode::Home, Modifiers::CTRL)]);
    }

    #[test]
    fn tilde_keys() {
        assert_eq!(keys(b"\x1b[3~"), vec![k(KeyCode::Delete, Modifiers::empty())]);
        assert_eq!(keys(b"\x1b[6~"), vec![k(KeyCode::PageDown, Modifiers::empty())]);
        assert_eq!(keys(b"\x1b[21~"), vec![k(KeyCode::F(10), Modifiers::empty())]);
    }

    #[test]
    fn ss3_function_keys() {
        assert_eq!(keys(b"\x1bOP"), vec![k(KeyCode::F(1), Modifiers::empty())]);
    }

    #[test]
    fn kitty_ctrl_shift_s() {
        assert_eq!(
            keys(b"\x1b[115;6u"),
            vec![k(KeyCode::Char('s'), Modifiers::CTRL | Modifiers::SHIFT)]
        );
    }

    #[test]
    fn kitty_enter_and_escape() {
        assert_eq!(keys(b"\x1b[13u"), vec![k(KeyCode::Enter, Modifiers::empty())]);
        assert_eq!(keys(b"\x1b[27u"), vec![k(KeyCode::Escape, Modifiers::empty())]);
    }

    #[test]
    fn alt_letter() {
        assert_eq!(keys(b"\x1bf"), vec![k(KeyCode::Char('f'), Modifiers::ALT)]);
    }

    #[test]
    fn lone_escape_waits_then_flushes() {
        let mut p = Parser::new();
        assert!(p.advance(b"\x1b").is_empty());
        assert!(p.has_pending());
        assert_eq!(p.flush(), vec![k(KeyCode::Escape, Modifiers::empty())]);
        assert!(!p.has_pending());
    }

    #[test]
    fn mouse_reports_are_skipped() {
        assert_eq!(keys(b"\x1b[<0;10;5Mx"), vec![k(KeyCode::Char('x'), Modifiers::empty())]);
    }

    #[test]
    fn bracketed_paste() {
        assert_eq!(
            keys(b"\x1b[200~hello\nworld\x1b[201~"),
            vec![Event::Paste("hello\nworld".to_string())]
        );
    }

    #[test]
    fn bracketed_paste_split() {
        let mut p = Parser::new();
        assert!(p.advance(b"\x1b[200~abc").is_empty());
        assert!(!p.has_pending());
        assert_eq!(p.advance(b"def\x1b[201~"), vec![Event::Paste("abcdef".to_string())]);
    }
}
