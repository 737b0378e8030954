// SPDX-License-Identifier: MIT
//
// Cell colors.
//
// The chrome only needs a handful of fixed colors (title bar, menus,
// dialogs, selection), so colors are stored exactly as they are emitted:
// the terminal default, a 256-palette index, or 24-bit RGB. No color math.

use std::fmt;

/// Compact color for terminal cell storage.
///
/// This is what gets written to the [`FrameBuffer`](crate::buffer::FrameBuffer)
/// and converted to SGR sequences by the renderer. Small and cheap to compare.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum CellColor {
    /// 24-bit `TrueColor`.
    Rgb(u8, u8, u8),

    /// ANSI 256-color palette index.
    Ansi256(u8),

    /// Terminal default color (inherits from the user's terminal theme).
    #[default]
    Default,
}

impl CellColor {
    pub const BLACK: Self = Self::Ansi256(0);
    pub const RED: Self = Self::Ansi256(1);
    pub const BLUE: Self = Self::Ansi256(4);
    pub const WHITE: Self = Self::Ansi256(7);
    pub const GRAY: Self = Self::Ansi256(8);
    pub const BRIGHT_WHITE: Self = Self::Ansi256(15);

    /// Whether this is the terminal default color.
    #[inline]
    #[must_use]
    pub const fn is_default(self) -> bool {
        matches!(self, Self::Default)
    }
}

impl fmt::Debug for CellColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Rgb(r, g, b) => write!(f, "#{r:02x}{g:02x}{b:02x}"),
            Self::Ansi256(idx) => write!(f, "ansi({idx})"),
            Self::Default => write!(f, "default"),
        }
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_default() {
        assert!(CellColor::default().is_default());
        assert!(!CellColor::BLUE.is_default());
    }

    #[test]
    fn debug_formats() {
        assert_eq!(format!("{:?}", CellColor::Rgb(255, 0, 16)), "#ff0010");
        assert_eq!(format!("{:?}", CellColor::Ansi256(4)), "ansi(4)");
        assert_eq!(format!("{:?}", CellColor::Default), "default");
    }
}
