//! Undo/redo history: transaction-based edit tracking.
//!
//! Every buffer mutation is recorded as a reversible [`Edit`] inside a
//! [`Transaction`], the unit that undo and redo operate on:
//!
//! - a run of typed characters is one transaction, closed by any other
//!   action (cursor move, paste, cut, delete);
//! - every other edit command is a transaction of its own.
//!
//! ```text
//! history.begin(cursor);
//! history.record_insert(at, text);
//! history.record_delete(at, removed);
//! history.commit(cursor);
//! ```
//!
//! Empty transactions are discarded on commit. Recording a new transaction
//! drops the redo stack; history does not branch.

use crate::buffer::Buffer;
use crate::position::Position;

// ---------------------------------------------------------------------------
// Edit
// ---------------------------------------------------------------------------

/// A single reversible edit, addressed by absolute char index.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Edit {
    Insert { at: usize, text: String },
    Delete { at: usize, text: String },
}

// ---------------------------------------------------------------------------
// Transaction
// ---------------------------------------------------------------------------

/// Edits that undo and redo together, plus the cursor on either side.
#[derive(Debug, Clone)]
struct Transaction {
    edits: Vec<Edit>,
    cursor_before: Position,
    cursor_after: Position,
}

impl Transaction {
    fn undo(&self, buf: &mut Buffer) {
        for edit in self.edits.iter().rev() {
            match edit {
                Edit::Insert { at, text } => {
                    buf.remove(*at..at + text.chars().count());
                }
                Edit::Delete { at, text } => buf.insert(*at, text),
            }
        }
    }

    fn redo(&self, buf: &mut Buffer) {
        for edit in &self.edits {
            match edit {
                Edit::Insert { at, text } => buf.insert(*at, text),
                Edit::Delete { at, text } => {
                    buf.remove(*at..at + text.chars().count());
                }
            }
        }
    }
}

// ---------------------------------------------------------------------------
// History
// ---------------------------------------------------------------------------

#[derive(Debug)]
pub struct History {
    undo_stack: Vec<Transaction>,
    redo_stack: Vec<Transaction>,
    pending: Option<Transaction>,
}

impl History {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            undo_stack: Vec::new(),
            redo_stack: Vec::new(),
            pending: None,
        }
    }

    /// Open a transaction. A still-open one is committed first.
    pub fn begin(&mut self, cursor: Position) {
        if self.pending.is_some() {
            self.commit(cursor);
        }
        self.pending = Some(Transaction {
            edits: Vec::new(),
            cursor_before: cursor,
            cursor_after: cursor,
        });
    }

    /// Is a transaction open?
    #[must_use]
    pub const fn is_open(&self) -> bool {
        self.pending.is_some()
    }

    /// Record an insert already applied to the buffer. Ignored when no
    /// transaction is open.
    pub fn record_insert(&mut self, at: usize, text: &str) {
        if let Some(txn) = &mut self.pending {
            txn.edits.push(Edit::Insert {
                at,
                text: text.to_string(),
            });
        }
    }

    /// Record a delete already applied to the buffer.
    pub fn record_delete(&mut self, at: usize, text: &str) {
        if let Some(txn) = &mut self.pending {
            txn.edits.push(Edit::Delete {
                at,
                text: text.to_string(),
            });
        }
    }

    /// Close the open transaction with the cursor after its edits.
    pub fn commit(&mut self, cursor: Position) {
        if let Some(mut txn) = self.pending.take() {
            if txn.edits.is_empty() {
                return;
            }
            txn.cursor_after = cursor;
            self.redo_stack.clear();
            self.undo_stack.push(txn);
        }
    }

    /// Undo the last transaction and return the cursor to restore.
    pub fn undo(&mut self, buf: &mut Buffer) -> Option<Position> {
        if let Some(txn) = self.pending.take() {
            if !txn.edits.is_empty() {
                self.redo_stack.clear();
                self.undo_stack.push(txn);
            }
        }

        let txn = self.undo_stack.pop()?;
        txn.undo(buf);
        let cursor = txn.cursor_before;
        self.redo_stack.push(txn);
        Some(cursor)
    }

    /// Redo the last undone transaction and return the cursor to restore.
    pub fn redo(&mut self, buf: &mut Buffer) -> Option<Position> {
        let txn = self.redo_stack.pop()?;
        txn.redo(buf);
        let cursor = txn.cursor_after;
        self.undo_stack.push(txn);
        Some(cursor)
    }

    #[must_use]
    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty() || self.pending.as_ref().is_some_and(|t| !t.edits.is_empty())
    }

    #[must_use]
    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    /// Forget everything, as when the whole text is replaced.
    pub fn clear(&mut self) {
        self.undo_stack.clear();
        self.redo_stack.clear();
        self.pending = None;
    }
}

impl Default for History {
    fn default() -> Self {
        Self::new()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
