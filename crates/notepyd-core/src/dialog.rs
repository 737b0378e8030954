//! Dialog collaborators the commands talk to.
//!
//! The host supplies an implementation of [`Dialogs`]; every call is
//! modal and returns only once the user has answered. A `None` answer (or
//! an empty path) means the user cancelled.

use std::path::PathBuf;

/// Icon and tone of a message dialog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Severity {
    /// Failures. The default.
    #[default]
    Critical,
    Information,
}

/// One entry of the file-type filter shown in path prompts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FileFilter {
    pub label: &'static str,
    pub pattern: &'static str,
}

pub const FILE_FILTERS: &[FileFilter] = &[
    FileFilter {
        label: "Text Document",
        pattern: "*.txt",
    },
    FileFilter {
        label: "Python",
        pattern: "*.py",
    },
    FileFilter {
        label: "Markdown",
        pattern: "*.md",
    },
];

/// The filter list in its one-line form.
///
/// ```
/// assert_eq!(
///     notepyd_core::dialog::filter_string(),
///     "Text Document (*.txt);; Python (*.py);; Markdown (*.md)"
/// );
/// ```
#[must_use]
pub fn filter_string() -> String {
    FILE_FILTERS
        .iter()
        .map(|f| format!("{} ({})", f.label, f.pattern))
        .collect::<Vec<_>>()
        .join(";; ")
}

/// Where the print dialog sends the document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PrintDestination {
    /// The system print spooler, optionally a named queue.
    Spooler { queue: Option<String> },
    /// Render to a file instead of paper.
    File(PathBuf),
}

/// Modal dialogs provided by the host.
pub trait Dialogs {
    /// Ask for a file to open. `caption` titles the dialog and `filter` is
    /// shown as a hint.
    fn open_path(&mut self, caption: &str, filter: &str) -> Option<PathBuf>;

    /// Ask for a file to save to.
    fn save_path(&mut self, caption: &str, filter: &str) -> Option<PathBuf>;

    /// Show a message and wait for it to be dismissed.
    fn message(&mut self, text: &str, severity: Severity);

    /// Ask where to print. `None` cancels.
    fn print_dialog(&mut self) -> Option<PrintDestination>;
}

/// Treat an empty answer like a cancelled prompt.
#[must_use]
pub fn non_empty(path: Option<PathBuf>) -> Option<PathBuf> {
    path.filter(|p| !p.as_os_str().is_empty())
}
