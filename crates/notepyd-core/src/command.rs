//! Command dispatch: the fixed table behind the menu bar and shortcuts.
//!
//! Every user-visible action is a [`CommandSpec`] in [`COMMANDS`]: its menu,
//! label, status tip, shortcut, config icon key and handler. The chrome
//! builds its menus by iterating the table and sends the chosen
//! [`CommandId`] to [`Dispatcher::run`].
//!
//! # Commands
//!
//! | Command     | Effect                                                     |
//! |-------------|------------------------------------------------------------|
//! | New         | empty the surface, forget the path                         |
//! | Open...     | prompt, read, replace the text, remember the path          |
//! | Save        | write to the known path, or behave as Save as              |
//! | Save as     | prompt, write, remember the path                           |
//! | Print       | print dialog, then hand the text to the printer            |
//! | Edit menu   | the surface's own undo/redo/cut/copy/paste/select-all      |
//! | About       | informational message                                      |
//!
//! The path changes only after the read or write succeeded. A failure is
//! reported once, as a critical message, by `Dispatcher::run`; a cancelled
//! prompt does nothing.

use std::fmt;

use log::{error, info};

use crate::dialog::{self, Dialogs, Severity};
use crate::document::Document;
use crate::error::CommandError;
use crate::fileio;
use crate::print::Printer;
use crate::surface::EditorSurface;

pub const ABOUT_TEXT: &str = "notepyd © 2021 James Codella";
pub const OPEN_CAPTION: &str = "Open file";
pub const SAVE_AS_CAPTION: &str = "Save file as...";

// ---------------------------------------------------------------------------
// Table types
// ---------------------------------------------------------------------------

/// Identity of a command. The discriminant is its index in [`COMMANDS`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CommandId {
    New,
    Open,
    Save,
    SaveAs,
    Print,
    Undo,
    Redo,
    Cut,
    Copy,
    Paste,
    SelectAll,
    About,
}

impl CommandId {
    /// The table entry for this command.
    #[must_use]
    pub fn spec(self) -> &'static CommandSpec {
        &COMMANDS[self as usize]
    }
}

/// Top-level menus, in menu-bar order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Menu {
    File,
    Edit,
    Help,
}

impl Menu {
    pub const ALL: [Self; 3] = [Self::File, Self::Edit, Self::Help];

    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::File => "File",
            Self::Edit => "Edit",
            Self::Help => "Help",
        }
    }

    /// Letter that opens the menu together with Alt.
    #[must_use]
    pub const fn mnemonic(self) -> char {
        match self {
            Self::File => 'f',
            Self::Edit => 'e',
            Self::Help => 'h',
        }
    }

    /// Commands under this menu, in table order.
    pub fn commands(self) -> impl Iterator<Item = &'static CommandSpec> {
        COMMANDS.iter().filter(move |c| c.menu == self)
    }
}

/// A Ctrl-based key chord.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Shortcut {
    /// Lowercase letter.
    pub key: char,
    pub shift: bool,
}

impl Shortcut {
    const fn ctrl(key: char) -> Self {
        Self { key, shift: false }
    }

    const fn ctrl_shift(key: char) -> Self {
        Self { key, shift: true }
    }

    /// Does Ctrl + `key` (with or without Shift) trigger this shortcut?
    /// `key` may arrive in either case.
    #[must_use]
    pub fn matches(self, key: char, shift: bool) -> bool {
        let shifted = shift || key.is_ascii_uppercase();
        self.key == key.to_ascii_lowercase() && self.shift == shifted
    }
}

impl fmt::Display for Shortcut {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Ctrl+")?;
        if self.shift {
            f.write_str("Shift+")?;
        }
        write!(f, "{}", self.key.to_ascii_uppercase())
    }
}

/// Collaborators a command may use. The surface is the one editor widget
/// the window owns.
pub struct Context<'a> {
    pub surface: &'a mut dyn EditorSurface,
    pub dialogs: &'a mut dyn Dialogs,
    pub printer: &'a mut dyn Printer,
}

pub type Handler = fn(&mut Dispatcher, &mut Context<'_>) -> Result<(), CommandError>;

pub struct CommandSpec {
    pub id: CommandId,
    pub menu: Menu,
    pub label: &'static str,
    pub status_tip: &'static str,
    pub shortcut: Option<Shortcut>,
    /// Key into the `[icons]` config table.
    pub icon: &'static str,
    pub handler: Handler,
}

impl fmt::Debug for CommandSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CommandSpec")
            .field("id", &self.id)
            .field("label", &self.label)
            .finish_non_exhaustive()
    }
}

pub static COMMANDS: &[CommandSpec] = &[
    CommandSpec {
        id: CommandId::New,
        menu: Menu::File,
        label: "New file",
        status_tip: "New file",
        shortcut: Some(Shortcut::ctrl('n')),
        icon: "new file",
        handler: Dispatcher::new_file,
    },
    CommandSpec {
        id: CommandId::Open,
        menu: Menu::File,
        label: "Open...",
        status_tip: "Open file",
        shortcut: Some(Shortcut::ctrl('o')),
        icon: "open",
        handler: Dispatcher::open_file,
    },
    CommandSpec {
        id: CommandId::Save,
        menu: Menu::File,
        label: "Save",
        status_tip: "Save file",
        shortcut: Some(Shortcut::ctrl('s')),
        icon: "save",
        handler: Dispatcher::save_file,
    },
    CommandSpec {
        id: CommandId::SaveAs,
        menu: Menu::File,
        label: "Save as",
        status_tip: "Save file as...",
        shortcut: Some(Shortcut::ctrl_shift('s')),
        icon: "save as",
        handler: Dispatcher::save_file_as,
    },
    CommandSpec {
        id: CommandId::Print,
        menu: Menu::File,
        label: "Print",
        status_tip: "Print file",
        shortcut: Some(Shortcut::ctrl('p')),
        icon: "print",
        handler: Dispatcher::print_file,
    },
    CommandSpec {
        id: CommandId::Undo,
        menu: Menu::Edit,
        label: "Undo",
        status_tip: "Undo",
        shortcut: Some(Shortcut::ctrl('z')),
        icon: "undo",
        handler: |_, ctx| {
            ctx.surface.undo();
            Ok(())
        },
    },
    CommandSpec {
        id: CommandId::Redo,
        menu: Menu::Edit,
        label: "Redo",
        status_tip: "Redo",
        shortcut: Some(Shortcut::ctrl('y')),
        icon: "redo",
        handler: |_, ctx| {
            ctx.surface.redo();
            Ok(())
        },
    },
    CommandSpec {
        id: CommandId::Cut,
        menu: Menu::Edit,
        label: "Cut",
        status_tip: "Cut",
        shortcut: Some(Shortcut::ctrl('x')),
        icon: "cut",
        handler: |_, ctx| {
            ctx.surface.cut();
            Ok(())
        },
    },
    CommandSpec {
        id: CommandId::Copy,
        menu: Menu::Edit,
        label: "Copy",
        status_tip: "Copy",
        shortcut: Some(Shortcut::ctrl('c')),
        icon: "copy",
        handler: |_, ctx| {
            ctx.surface.copy();
            Ok(())
        },
    },
    CommandSpec {
        id: CommandId::Paste,
        menu: Menu::Edit,
        label: "Paste",
        status_tip: "Paste",
        shortcut: Some(Shortcut::ctrl('v')),
        icon: "paste",
        handler: |_, ctx| {
            ctx.surface.paste();
            Ok(())
        },
    },
    CommandSpec {
        id: CommandId::SelectAll,
        menu: Menu::Edit,
        label: "Select all",
        status_tip: "Select all",
        shortcut: Some(Shortcut::ctrl('a')),
        icon: "select all",
        handler: |_, ctx| {
            ctx.surface.select_all();
            Ok(())
        },
    },
    CommandSpec {
        id: CommandId::About,
        menu: Menu::Help,
        label: "About",
        status_tip: "About notepyd",
        shortcut: None,
        icon: "about",
        handler: |_, ctx| {
            ctx.dialogs.message(ABOUT_TEXT, Severity::Information);
            Ok(())
        },
    },
];

/// The command bound to Ctrl + `key` (+ Shift), if any.
#[must_use]
pub fn find_by_shortcut(key: char, shift: bool) -> Option<&'static CommandSpec> {
    COMMANDS
        .iter()
        .find(|c| c.shortcut.is_some_and(|s| s.matches(key, shift)))
}

// ---------------------------------------------------------------------------
// Dispatcher
// ---------------------------------------------------------------------------

/// Runs commands against the document state.
#[derive(Debug, Default)]
pub struct Dispatcher {
    document: Document,
}

impl Dispatcher {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    #[must_use]
    pub const fn document(&self) -> &Document {
        &self.document
    }

    #[inline]
    #[must_use]
    pub fn title(&self) -> &str {
        self.document.current_title()
    }

    /// Run `id`. A failure is logged and shown as a critical message; the
    /// return value says whether the command finished without one.
    pub fn run(&mut self, id: CommandId, ctx: &mut Context<'_>) -> bool {
        let spec = id.spec();
        info!("command: {}", spec.label);
        match (spec.handler)(self, ctx) {
            Ok(()) => true,
            Err(err) => {
                error!("{} failed: {err}", spec.label);
                ctx.dialogs.message(&err.to_string(), Severity::Critical);
                false
            }
        }
    }

    /// Empty the surface and forget the path.
    ///
    /// # Errors
    ///
    /// Never fails; the signature matches [`Handler`].
    pub fn new_file(&mut self, ctx: &mut Context<'_>) -> Result<(), CommandError> {
        ctx.surface.clear();
        self.document.new_document();
        Ok(())
    }

    /// Prompt for a file and load it.
    ///
    /// # Errors
    ///
    /// Returns the read failure; the document is left as it was.
    pub fn open_file(&mut self, ctx: &mut Context<'_>) -> Result<(), CommandError> {
        let filter = dialog::filter_string();
        let Some(path) = dialog::non_empty(ctx.dialogs.open_path(OPEN_CAPTION, &filter)) else {
            return Ok(());
        };
        let text = fileio::read_text(&path)?;
        ctx.surface.set_text(&text);
        info!("opened {}", path.display());
        self.document.mark_opened(path);
        Ok(())
    }

    /// Write to the known path, or fall through to Save as.
    ///
    /// # Errors
    ///
    /// Returns the write failure; the path is unchanged.
    pub fn save_file(&mut self, ctx: &mut Context<'_>) -> Result<(), CommandError> {
        let Some(path) = self.document.path() else {
            return self.save_file_as(ctx);
        };
        fileio::write_text(path, &ctx.surface.text())?;
        ctx.surface.mark_clean();
        info!("saved {}", path.display());
        Ok(())
    }

    /// Prompt for a path, write to it and make it the document's path.
    ///
    /// # Errors
    ///
    /// Returns the write failure; the path is unchanged.
    pub fn save_file_as(&mut self, ctx: &mut Context<'_>) -> Result<(), CommandError> {
        let filter = dialog::filter_string();
        let Some(path) = dialog::non_empty(ctx.dialogs.save_path(SAVE_AS_CAPTION, &filter)) else {
            return Ok(());
        };
        fileio::write_text(&path, &ctx.surface.text())?;
        ctx.surface.mark_clean();
        info!("saved as {}", path.display());
        self.document.mark_saved(path);
        Ok(())
    }

    /// Ask where to print and print the current text there.
    ///
    /// # Errors
    ///
    /// Returns the printer's failure.
    pub fn print_file(&mut self, ctx: &mut Context<'_>) -> Result<(), CommandError> {
        let Some(destination) = ctx.dialogs.print_dialog() else {
            return Ok(());
        };
        ctx.printer.print(&destination, &ctx.surface.text())?;
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
