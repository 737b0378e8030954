//! Printing.
//!
//! [`SpoolPrinter`] hands the plain text to the system spooler (`lp`) over
//! stdin, or writes it to a file when the print dialog chose one.

use std::io::{self, Write};
use std::process::{Command, Stdio};
use std::thread;

use log::info;

use crate::dialog::PrintDestination;
use crate::error::PrintError;
use crate::fileio;

/// Renders document text to a print destination.
pub trait Printer {
    /// # Errors
    ///
    /// Returns a [`PrintError`] if the job could not be delivered.
    fn print(&mut self, destination: &PrintDestination, text: &str) -> Result<(), PrintError>;
}

/// Prints through a spooler command, `lp` by default.
#[derive(Debug, Clone)]
pub struct SpoolPrinter {
    program: String,
}

impl SpoolPrinter {
    #[must_use]
    pub fn new() -> Self {
        Self::with_program("lp")
    }

    /// Use another spooler command. It must accept `-d QUEUE` and read the
    /// job from stdin.
    #[must_use]
    pub fn with_program(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }

    fn spool(&self, queue: Option<&str>, text: &str) -> Result<(), PrintError> {
        let spooler_err = |source| PrintError::Spooler {
            program: self.program.clone(),
            source,
        };

        let mut cmd = Command::new(&self.program);
        if let Some(queue) = queue {
            cmd.arg("-d").arg(queue);
        }
        let mut child = cmd
            .stdin(Stdio::piped())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(spooler_err)?;

        // Feed stdin on its own thread while stderr drains on this one.
        let stdin = child.stdin.take();
        let (written, output) = thread::scope(|scope| {
            let writer = scope.spawn(move || match stdin {
                Some(mut stdin) => stdin.write_all(text.as_bytes()),
                None => Ok(()),
            });
            let output = child.wait_with_output();
            let written = writer
                .join()
                .unwrap_or_else(|_| Err(io::Error::other("stdin writer panicked")));
            (written, output)
        });
        let output = output.map_err(spooler_err)?;
        match written {
            // The exit status below says why it stopped reading.
            Err(e) if e.kind() != io::ErrorKind::BrokenPipe => return Err(spooler_err(e)),
            _ => {}
        }
        if output.status.success() {
            return Ok(());
        }
        let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
        Err(PrintError::Failed {
            program: self.program.clone(),
            status: if stderr.is_empty() {
                output.status.to_string()
            } else {
                stderr
            },
        })
    }
}

impl Default for SpoolPrinter {
    fn default() -> Self {
        Self::new()
    }
}

impl Printer for SpoolPrinter {
    fn print(&mut self, destination: &PrintDestination, text: &str) -> Result<(), PrintError> {
        match destination {
            PrintDestination::Spooler { queue } => {
                self.spool(queue.as_deref(), text)?;
                info!(
                    "sent {} bytes to {} (queue: {})",
                    text.len(),
                    self.program,
                    queue.as_deref().unwrap_or("default")
                );
            }
            PrintDestination::File(path) => {
                fileio::write_text(path, text)?;
                info!("printed to file {}", path.display());
            }
        }
        Ok(())
    }
}
