// SPDX-License-Identifier: MIT
//
// Differential renderer.
//
// Compares the current FrameBuffer against the previous one and emits ANSI
// only for cells that changed. Unchanged rows are skipped with one slice
// comparison. The frame is wrapped in synchronized output so the terminal
// shows it atomically, and the window title is re-sent only when it changes.

use std::io::{self, Write};

use crate::ansi;
use crate::buffer::FrameBuffer;
use crate::output::{CellWriter, OutputBuffer};

/// Counts from one render pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RenderStats {
    pub cells_rendered: usize,
    pub cells_skipped: usize,
    pub bytes_written: usize,
}

/// Emits ANSI for changed cells only.
pub struct DiffRenderer {
    output: OutputBuffer,
    writer: CellWriter,
    previous: Option<FrameBuffer>,
    title: Option<String>,
}

impl DiffRenderer {
    /// A renderer with no previous frame; the first render draws everything.
    #[must_use]
    pub fn new() -> Self {
        Self {
            output: OutputBuffer::new(),
            writer: CellWriter::new(),
            previous: None,
            title: None,
        }
    }

    /// Queue an OSC 2 title update if `title` differs from the last one sent.
    pub fn set_title(&mut self, title: &str) {
        if self.title.as_deref() != Some(title) {
            ansi::set_title(&mut self.output, title).ok();
            self.title = Some(title.to_string());
        }
    }

    /// Diff `current` against the previous frame and queue the output.
    pub fn render(&mut self, current: &FrameBuffer) -> RenderStats {
        self.writer.reset_state();

        let width = current.width();
        let height = current.height();
        let mut stats = RenderStats::default();

        if width == 0 || height == 0 {
            self.store_frame(current);
            return stats;
        }

        ansi::begin_sync(&mut self.output).ok();

        let full_redraw = self
            .previous
            .as_ref()
            .is_none_or(|prev| prev.width() != width || prev.height() != height);

        if full_redraw {
            ansi::clear_screen(&mut self.output).ok();
        }

        for y in 0..height {
            let prev_row = if full_redraw {
                None
            } else {
                self.previous.as_ref().and_then(|p| p.row(y))
            };
            let Some(curr_row) = current.row(y) else {
                continue;
            };

            if prev_row == Some(curr_row) {
                stats.cells_skipped += usize::from(width);
                continue;
            }

            for (x, cell) in (0..width).zip(curr_row) {
                let unchanged = prev_row.is_some_and(|row| row[usize::from(x)] == *cell);
                if unchanged {
                    stats.cells_skipped += 1;
                } else {
                    self.writer.render_cell(&mut self.output, x, y, cell);
                    stats.cells_rendered += 1;
                }
            }
        }

        ansi::reset(&mut self.output).ok();
        ansi::end_sync(&mut self.output).ok();

        stats.bytes_written = self.output.len();
        self.store_frame(current);
        stats
    }

    /// Write the queued output to stdout in one call.
    ///
    /// # Errors
    ///
    /// Returns an error if writing to stdout fails.
    pub fn flush(&mut self) -> io::Result<()> {
        let stdout = io::stdout();
        let mut lock = stdout.lock();
        self.output.flush_to(&mut lock)
    }

    /// Write the queued output to `w`.
    ///
    /// # Errors
    ///
    /// Returns an error if writing to `w` fails.
    pub fn flush_to(&mut self, w: &mut impl Write) -> io::Result<()> {
        self.output.flush_to(w)
    }

    /// Drop the previous frame so the next render repaints everything.
    pub fn force_redraw(&mut self) {
        self.previous = None;
    }

    fn store_frame(&mut self, current: &FrameBuffer) {
        match &mut self.previous {
            Some(prev) => prev.copy_from(current),
            None => self.previous = Some(current.clone()),
        }
    }
}

impl Default for DiffRenderer {
    fn default() -> Self {
        Self::new()
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────
