//! # notepyd-core: Editor core for notepyd
//!
//! Everything that does not touch the terminal:
//!
//! - **[`document`]**: which file the window is editing and the title it shows
//! - **[`fileio`]**: whole-file UTF-8 reads and writes
//! - **[`command`]**: the command table and the dispatcher that runs it
//! - **[`surface`]**: `TextEdit`, the editing widget, over a rope [`buffer`]
//!   with undo [`history`] and a [`clipboard`]
//! - **[`dialog`]** / **[`print`]**: collaborators the host provides
//! - **[`config`]**: the TOML startup configuration
//!
//! The terminal host in the `notepyd` binary owns one `TextEdit`, one
//! `Dispatcher`, and implements `Dialogs` with modal overlays.

pub mod buffer;
pub mod clipboard;
pub mod command;
pub mod config;
pub mod dialog;
pub mod document;
pub mod error;
pub mod fileio;
pub mod history;
pub mod position;
pub mod print;
pub mod surface;
