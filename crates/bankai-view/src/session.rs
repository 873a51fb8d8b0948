//! Session — the viewer's main loop.
//!
//! One iteration: render a frame, write it, decode one key, act on it.
//!
//! ```text
//! ┌──────────┐   ┌──────────┐   ┌──────────┐
//! │ render   │──▶│ decode   │──▶│ dispatch │──┐
//! └──────────┘   └──────────┘   └──────────┘  │
//!      ▲                                      │
//!      └──────────────────────────────────────┘
//! ```
//!
//! All session state lives in [`Session`] and is passed explicitly; there
//! is no global. The loop is generic over its input and output so it can be
//! driven by a byte script and a `Vec<u8>` in tests.

use std::io::Write;

use tracing::{debug, trace};

use bankai_term::ansi;
use bankai_term::input::{ByteSource, Key, KeyDecoder};
use bankai_term::terminal::Size;
use bankai_term::Error as TermError;

use crate::compose;
use crate::cursor::CursorState;
use crate::document::Document;
use crate::error::Result;

/// What the loop does after handling a key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// Keep going.
    Continue,
    /// Clear the screen and stop.
    Quit,
}

/// Viewer state for one run: the document, the viewport, and the cursor.
#[derive(Debug)]
pub struct Session {
    document: Document,
    size: Size,
    cursor: CursorState,
}

impl Session {
    /// Start a session with the cursor at the origin.
    #[must_use]
    pub const fn new(document: Document, size: Size) -> Self {
        Self {
            document,
            size,
            cursor: CursorState::ORIGIN,
        }
    }

    /// Current cursor.
    #[inline]
    #[must_use]
    pub const fn cursor(&self) -> CursorState {
        self.cursor
    }

    /// Compose the current frame and write it in one go.
    ///
    /// `out` must not buffer. A line-buffered writer such as
    /// `std::io::Stdout` splits the frame at its last row break.
    ///
    /// # Errors
    ///
    /// Returns [`TermError::Io`] if the write fails.
    pub fn refresh(&self, out: &mut impl Write) -> Result<()> {
        let mut frame = compose::render(&self.document, self.cursor, self.size);
        trace!(bytes = frame.len(), "frame");
        frame
            .flush_to(out)
            .map_err(|e| TermError::io("write", e))?;
        Ok(())
    }

    /// Handle one key.
    pub fn step(&mut self, key: Key) -> Action {
        if key == Key::QUIT {
            return Action::Quit;
        }
        if key.is_navigation() {
            self.cursor = self.cursor.apply(key, self.size);
        }
        Action::Continue
    }

    /// Run until the quit key.
    ///
    /// On quit the screen is cleared and the cursor sent home before
    /// returning, leaving the terminal blank for whatever runs next.
    ///
    /// # Errors
    ///
    /// Returns the first read or write failure; the loop does not retry.
    pub fn run<S: ByteSource>(
        &mut self,
        keys: &mut KeyDecoder<S>,
        out: &mut impl Write,
    ) -> Result<()> {
        debug!(
            rows = self.size.rows,
            cols = self.size.cols,
            lines = self.document.line_count(),
            "session start"
        );
        loop {
            self.refresh(out)?;
            let key = keys.decode()?;
            if self.step(key) == Action::Quit {
                break;
            }
        }
        clear(out)?;
        debug!("session quit");
        Ok(())
    }
}

/// Clear the screen and home the cursor.
///
/// # Errors
///
/// Returns [`TermError::Io`] if the write fails.
pub fn clear(out: &mut impl Write) -> Result<()> {
    let io = |e| TermError::io("write", e);
    ansi::clear_screen(out).map_err(io)?;
    ansi::cursor_home(out).map_err(io)?;
    out.flush().map_err(io)?;
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
