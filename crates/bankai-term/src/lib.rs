// SPDX-License-Identifier: MIT
//
// bankai-term — Terminal plumbing for bankai.
//
// Everything that touches the terminal at the byte level lives here: raw
// mode and its guaranteed restore, geometry queries, the control sequences
// the viewer emits, the frame buffer that turns a whole screen update into
// one write, and the key decoder that turns stdin bytes back into keys.
//
// Direct termios and ANSI escape sequences, no TUI framework. The viewer
// needs a handful of sequences and one input mode; every byte sent to the
// terminal is accounted for.

pub mod ansi;
pub mod error;
pub mod input;
pub mod output;
pub mod reader;
pub mod terminal;

pub use error::{Error, Result};
