//! Document state: which file, if any, the buffer belongs to.
//!
//! The path is only ever set after the caller has read from or written to
//! it successfully, and only `new_document` clears it. The window title is
//! derived from the path and cached so the chrome can read it every frame.

use std::path::{Path, PathBuf};

use log::info;

pub const APP_NAME: &str = "notepyd";
pub const UNTITLED: &str = "Untitled";

/// Window title for a document backed by `path`.
///
/// ```
/// use std::path::Path;
/// use notepyd_core::document::title_for;
///
/// assert_eq!(title_for(None), "Untitled - notepyd");
/// assert_eq!(title_for(Some(Path::new("/tmp/notes.md"))), "notes.md - notepyd");
/// ```
#[must_use]
pub fn title_for(path: Option<&Path>) -> String {
    let name = path.map_or_else(
        || UNTITLED.to_string(),
        |p| {
            p.file_name()
                .map_or_else(|| p.display().to_string(), |n| n.to_string_lossy().into_owned())
        },
    );
    format!("{name} - {APP_NAME}")
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    path: Option<PathBuf>,
    title: String,
}

impl Document {
    /// An untitled document.
    #[must_use]
    pub fn new() -> Self {
        Self {
            path: None,
            title: title_for(None),
        }
    }

    #[inline]
    #[must_use]
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// The title as last recomputed.
    #[inline]
    #[must_use]
    pub fn current_title(&self) -> &str {
        &self.title
    }

    /// Forget the backing file.
    pub fn new_document(&mut self) {
        self.path = None;
        self.update_title();
    }

    /// The buffer now holds the contents read from `path`.
    pub fn mark_opened(&mut self, path: PathBuf) {
        self.path = Some(path);
        self.update_title();
    }

    /// The buffer was just written to `path`.
    pub fn mark_saved(&mut self, path: PathBuf) {
        self.path = Some(path);
        self.update_title();
    }

    fn update_title(&mut self) {
        self.title = title_for(self.path.as_deref());
        info!("title: {}", self.title);
    }
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn starts_untitled() {
        let doc = Document::new();
        assert_eq!(doc.path(), None);
        assert_eq!(doc.current_title(), "Untitled - notepyd");
    }

    #[test]
    fn opened_title_is_basename() {
        let mut doc = Document::new();
        doc.mark_opened(PathBuf::from("/home/u/notes.txt"));
        assert_eq!(doc.path(), Some(Path::new("/home/u/notes.txt")));
        assert_eq!(doc.current_title(), "notes.txt - notepyd");
    }

    #[test]
    fn saved_then_new_round_trips_title() {
        let mut doc = Document::new();
        doc.mark_saved(PathBuf::from("x/out.py"));
        assert_eq!(doc.current_title(), "out.py - notepyd");
        doc.new_document();
        assert_eq!(doc.path(), None);
        assert_eq!(doc.current_title(), "Untitled - notepyd");
    }

    #[test]
    fn path_without_file_name_falls_back_to_display() {
        assert_eq!(title_for(Some(Path::new("/"))), "/ - notepyd");
    }

    #[test]
    fn title_matches_title_for() {
        let mut doc = Document::new();
        doc.mark_opened(PathBuf::from("a/b/c.md"));
        assert_eq!(doc.current_title(), title_for(doc.path()));
    }
}
