// SPDX-License-Identifier: MIT
//
// notepyd-term: the terminal host notepyd draws its window in.
//
// Raw termios, ANSI output and a cell grid diffed frame to frame. An
// `EventLoop` drives one `App`; modal dialogs run nested on the same `Ui`
// so menu commands can ask a question and wait for the answer.

pub mod ansi;
pub mod buffer;
pub mod cell;
pub mod color;
pub mod diff;
pub mod event_loop;
pub mod input;
pub mod output;
pub mod reader;
pub mod terminal;
