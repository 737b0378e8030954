//! Clipboard for cut, copy and paste.
//!
//! A single char-wise slot owned by the editor surface. Cut and copy
//! replace the slot; paste reads it. Nothing is shared with other
//! processes.

#[derive(Debug, Clone, Default)]
pub struct Clipboard {
    content: String,
}

impl Clipboard {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            content: String::new(),
        }
    }

    /// Replace the clipboard content.
    pub fn set(&mut self, text: String) {
        self.content = text;
    }

    #[inline]
    #[must_use]
    pub fn content(&self) -> &str {
        &self.content
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.content.is_empty()
    }
}
