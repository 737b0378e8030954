// SPDX-License-Identifier: MIT
#![allow(unsafe_code)]
//
// Event loop and modal dialogs.
//
// Stdin bytes arrive from the reader thread, get parsed into events and are
// handed to the application one at a time. When something changed the app
// repaints a cleared FrameBuffer and the diff renderer sends only the cells
// that differ.
//
// The loop blocks on the stdin channel with a short timeout. A timeout with
// bytes still pending in the parser means a lone ESC, which is flushed as
// the Escape key. Resize arrives through a SIGWINCH flag checked each turn.
//
// Modal dialogs run a nested loop on the same `Ui`: while the modal is open
// it receives every event and is painted over the last frame the app drew,
// so a dialog opened from inside `App::on_event` can return its answer
// synchronously.

use std::collections::VecDeque;
use std::io::{self, Write};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{Receiver, RecvTimeoutError};
use std::time::Duration;

use log::{debug, error, trace};

use crate::ansi::{self, CursorShape};
use crate::buffer::FrameBuffer;
use crate::diff::DiffRenderer;
use crate::input::{Event, Parser};
use crate::reader::StdinReader;
use crate::terminal::{Size, Terminal};

// ─── SIGWINCH ────────────────────────────────────────────────────────────────

static SIGWINCH_RECEIVED: AtomicBool = AtomicBool::new(false);

#[cfg(unix)]
fn install_sigwinch_handler() {
    unsafe {
        let mut sa: libc::sigaction = std::mem::zeroed();
        sa.sa_sigaction = sigwinch_handler as *const () as usize;
        sa.sa_flags = libc::SA_RESTART;
        libc::sigemptyset(&raw mut sa.sa_mask);
        libc::sigaction(libc::SIGWINCH, &raw const sa, std::ptr::null_mut());
    }
}

#[cfg(unix)]
extern "C" fn sigwinch_handler(_sig: libc::c_int) {
    SIGWINCH_RECEIVED.store(true, Ordering::Relaxed);
}

#[cfg(not(unix))]
fn install_sigwinch_handler() {}

// ─── App & Modal ─────────────────────────────────────────────────────────────

/// What the application wants after handling an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Continue,
    Quit,
}

/// Hardware cursor placement: column, row, shape.
pub type CursorPlacement = (u16, u16, CursorShape);

/// A full-screen terminal application.
pub trait App {
    /// Handle one input event. `ui` can run modal dialogs before returning.
    fn on_event(&mut self, event: &Event, ui: &mut Ui) -> Action;

    /// The frame buffer has already been resized when this is called.
    fn on_resize(&mut self, _size: Size) {}

    /// Paint everything visible. The buffer arrives cleared.
    fn paint(&mut self, buf: &mut FrameBuffer);

    /// Where to show the hardware cursor after painting; `None` hides it.
    fn cursor(&self) -> Option<CursorPlacement> {
        None
    }

    /// Window title, sent via OSC 2 whenever it changes.
    fn title(&self) -> Option<String> {
        None
    }
}

/// Result of feeding an event to a modal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModalAction<T> {
    Continue,
    Done(T),
}

/// A dialog that owns the input until it produces an answer.
pub trait Modal {
    type Output;

    fn on_event(&mut self, event: &Event) -> ModalAction<Self::Output>;

    /// Paint over `buf`, which holds the application's last frame.
    fn paint(&mut self, buf: &mut FrameBuffer);

    fn cursor(&self) -> Option<CursorPlacement> {
        None
    }
}

// ─── Ui ──────────────────────────────────────────────────────────────────────

/// Timing for the loop. The tick doubles as the lone-ESC timeout.
#[derive(Debug, Clone, Copy)]
pub struct LoopConfig {
    pub tick_interval: Duration,
}

impl Default for LoopConfig {
    fn default() -> Self {
        Self {
            tick_interval: Duration::from_millis(25),
        }
    }
}

enum Poll {
    Event(Event),
    Resized(Size),
    Idle,
    Closed,
}

/// The live screen: terminal, parser, renderer and the last app frame.
pub struct Ui {
    terminal: Terminal,
    parser: Parser,
    renderer: DiffRenderer,
    config: LoopConfig,
    rx: Option<Receiver<Vec<u8>>>,
    pending: VecDeque<Event>,
    frame: FrameBuffer,
    failure: Option<io::Error>,
}

impl Ui {
    fn new(config: LoopConfig) -> Self {
        let terminal = Terminal::new();
        let size = terminal.size();
        Self {
            terminal,
            parser: Parser::new(),
            renderer: DiffRenderer::new(),
            config,
            rx: None,
            pending: VecDeque::new(),
            frame: FrameBuffer::new(size.cols, size.rows),
            failure: None,
        }
    }

    #[must_use]
    pub const fn size(&self) -> Size {
        self.terminal.size()
    }

    /// Run `modal` until it is done. Returns `None` if input closed first.
    ///
    /// # Errors
    ///
    /// Returns an error if writing to the terminal fails.
    pub fn run_modal<M: Modal>(&mut self, modal: &mut M) -> io::Result<Option<M::Output>> {
        let mut scratch = self.frame.clone();
        let mut dirty = true;

        loop {
            if dirty && self.pending.is_empty() {
                scratch.copy_from(&self.frame);
                modal.paint(&mut scratch);
                self.present(&scratch, modal.cursor())?;
                dirty = false;
            }

            match self.poll() {
                Poll::Event(event) => {
                    if let ModalAction::Done(output) = modal.on_event(&event) {
                        return Ok(Some(output));
                    }
                    dirty = true;
                }
                Poll::Resized(size) => {
                    self.resize_backdrop(size);
                    dirty = true;
                }
                Poll::Idle => {}
                Poll::Closed => return Ok(None),
            }
        }
    }

    /// Record a terminal failure hit where it cannot be propagated, such
    /// as inside a dialog callback. The loop stops with it after the
    /// current event.
    pub fn record_failure(&mut self, err: io::Error) {
        error!("terminal failure: {err}");
        if self.failure.is_none() {
            self.failure = Some(err);
        }
    }

    fn poll(&mut self) -> Poll {
        if let Some(event) = self.pending.pop_front() {
            return Poll::Event(event);
        }

        if SIGWINCH_RECEIVED.swap(false, Ordering::Relaxed) {
            let size = self.terminal.refresh_size();
            debug!("resized to {}x{}", size.cols, size.rows);
            return Poll::Resized(size);
        }

        let Some(rx) = self.rx.as_ref() else {
            return Poll::Closed;
        };
        match rx.recv_timeout(self.config.tick_interval) {
            Ok(bytes) => {
                trace!("stdin: {} bytes", bytes.len());
                self.pending.extend(self.parser.advance(&bytes));
            }
            Err(RecvTimeoutError::Timeout) => {
                if self.parser.has_pending() {
                    self.pending.extend(self.parser.flush());
                }
            }
            Err(RecvTimeoutError::Disconnected) => {
                debug!("stdin closed");
                return Poll::Closed;
            }
        }

        self.pending.pop_front().map_or(Poll::Idle, Poll::Event)
    }

    fn resize_backdrop(&mut self, size: Size) {
        let mut resized = FrameBuffer::new(size.cols, size.rows);
        let rows = size.rows.min(self.frame.height());
        for y in 0..rows {
            if let Some(row) = self.frame.row(y) {
                for (x, cell) in (0..size.cols).zip(row) {
                    resized.set(x, y, *cell);
                }
            }
        }
        self.frame = resized;
        self.renderer.force_redraw();
    }

    fn present(&mut self, frame: &FrameBuffer, cursor: Option<CursorPlacement>) -> io::Result<()> {
        self.renderer.render(frame);
        self.renderer.flush()?;

        let stdout = io::stdout();
        let mut lock = stdout.lock();
        if let Some((x, y, shape)) = cursor {
            ansi::cursor_to(&mut lock, x, y)?;
            ansi::set_cursor_shape(&mut lock, shape)?;
            ansi::cursor_show(&mut lock)?;
        } else {
            ansi::cursor_hide(&mut lock)?;
        }
        lock.flush()
    }

    fn paint_app(&mut self, app: &mut impl App) -> io::Result<()> {
        if let Some(title) = app.title() {
            self.renderer.set_title(&title);
        }
        self.frame.clear();
        app.paint(&mut self.frame);
        let frame = std::mem::replace(&mut self.frame, FrameBuffer::new(0, 0));
        let result = self.present(&frame, app.cursor());
        self.frame = frame;
        result
    }
}

// ─── EventLoop ───────────────────────────────────────────────────────────────

/// Owns the [`Ui`] and drives an [`App`] until it quits.
pub struct EventLoop {
    ui: Ui,
}

impl EventLoop {
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(LoopConfig::default())
    }

    #[must_use]
    pub fn with_config(config: LoopConfig) -> Self {
        Self {
            ui: Ui::new(config),
        }
    }

    #[must_use]
    pub const fn size(&self) -> Size {
        self.ui.size()
    }

    /// Enter TUI mode, run `app` until it quits or stdin closes, and
    /// restore the terminal whatever the outcome.
    ///
    /// # Errors
    ///
    /// Returns an error if terminal setup, rendering or teardown fails.
    pub fn run(&mut self, app: &mut impl App) -> io::Result<()> {
        self.ui.terminal.enter()?;
        install_sigwinch_handler();

        let size = self.ui.terminal.refresh_size();
        self.ui.frame.resize(size.cols, size.rows);
        app.on_resize(size);

        let (mut reader, rx) = match StdinReader::spawn() {
            Ok(spawned) => spawned,
            Err(err) => {
                self.ui.terminal.leave()?;
                return Err(err);
            }
        };
        self.ui.rx = Some(rx);

        let result = self.run_inner(app);

        reader.stop();
        self.ui.rx = None;
        self.ui.terminal.leave()?;
        result
    }

    fn run_inner(&mut self, app: &mut impl App) -> io::Result<()> {
        let mut dirty = true;

        loop {
            if dirty && self.ui.pending.is_empty() {
                self.ui.paint_app(app)?;
                dirty = false;
            }

            match self.ui.poll() {
                Poll::Event(event) => {
                    let action = app.on_event(&event, &mut self.ui);
                    if let Some(err) = self.ui.failure.take() {
                        return Err(err);
                    }
                    if action == Action::Quit {
                        return Ok(());
                    }
                    dirty = true;
                }
                Poll::Resized(size) => {
                    self.ui.frame.resize(size.cols, size.rows);
                    self.ui.renderer.force_redraw();
                    app.on_resize(size);
                    dirty = true;
                }
                Poll::Idle => {}
                Poll::Closed => return Ok(()),
            }
        }
    }
}

impl Default for EventLoop {
    fn default() -> Self {
        Self::new()
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────
