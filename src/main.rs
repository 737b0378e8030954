// SPDX-License-Identifier: MIT
//
// notepyd: a minimal notepad-style text editor for the terminal.
//
// This is the main binary that wires the two crates together:
//
//   notepyd-term → terminal control, rendering, input parsing, event loop
//   notepyd-core → document state, file I/O, text surface, commands
//
// Startup order: log file, then configuration (a bad config stops here with
// a message on stderr, before the terminal is touched), then the window and
// the event loop.

mod dialogs;
mod logging;
mod menu;
mod style;
mod window;

use std::env;
use std::path::PathBuf;

use anyhow::{Context, Result};
use log::{error, info};
use notepyd_core::config::{DEFAULT_CONFIG_PATH, Settings};
use notepyd_core::print::SpoolPrinter;
use notepyd_term::event_loop::EventLoop;

use crate::logging::LogSettings;
use crate::window::Window;

const CONFIG_VAR: &str = "NOTEPYD_CONFIG";

fn config_path() -> PathBuf {
    env::var_os(CONFIG_VAR)
        .filter(|p| !p.is_empty())
        .map_or_else(|| PathBuf::from(DEFAULT_CONFIG_PATH), PathBuf::from)
}

fn main() -> Result<()> {
    logging::init(&LogSettings::from_env())?;
    info!("notepyd {} starting", env!("CARGO_PKG_VERSION"));

    let path = config_path();
    let settings = Settings::load(&path)
        .inspect_err(|e| error!("{e}"))
        .context("cannot start without a valid configuration")?;
    info!("config: {}", path.display());
    info!("icon for \"new file\": {}", settings.icons.new_file);
    info!("font size: {}", settings.font.size);

    let mut window = Window::new(settings, Box::new(SpoolPrinter::new()));
    let mut event_loop = EventLoop::new();
    event_loop
        .run(&mut window)
        .inspect_err(|e| error!("terminal failure: {e}"))
        .context("terminal failure")?;

    info!("notepyd exiting");
    Ok(())
}
