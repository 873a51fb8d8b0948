//! Frame compositor — document + cursor → one terminal update.
//!
//! A frame is assembled in an [`OutputBuffer`] and handed back whole; the
//! caller writes it with a single `write`. Nothing here touches the
//! terminal.
//!
//! Frame layout, top to bottom:
//!
//! ```text
//! ESC[?25l ESC[H                         hide cursor, go home
//! <row 0> ESC[K \r\n                     one entry per screen row
//! ...
//! <row rows-1> ESC[K                     no line break after the last row
//! ESC[{y+1};{x+1}H ESC[?25h              place and show the cursor
//! ```
//!
//! Each row is the document line at that index truncated to the viewport
//! width, or a `~` marker past the end of the document. An empty document
//! gets a centered welcome banner a third of the way down.
//!
//! Clearing line-by-line instead of the whole screen up front means rows are
//! overwritten in place, never blanked and redrawn.

use bankai_term::ansi;
use bankai_term::output::OutputBuffer;
use bankai_term::terminal::Size;

use crate::cursor::CursorState;
use crate::document::Document;

/// Welcome text shown when no file is loaded.
pub const BANNER: &str = concat!("Bankai Version - ", env!("CARGO_PKG_VERSION"));

/// Marker drawn at the start of rows past the end of the document.
const EMPTY_ROW: u8 = b'~';

/// Render a full frame.
#[must_use]
pub fn render(document: &Document, cursor: CursorState, size: Size) -> OutputBuffer {
    let mut out = OutputBuffer::new();

    ansi::cursor_hide(&mut out).ok();
    ansi::cursor_home(&mut out).ok();

    draw_rows(&mut out, document, size);

    ansi::cursor_to(&mut out, cursor.x, cursor.y).ok();
    ansi::cursor_show(&mut out).ok();

    out
}

/// The row of the welcome banner for a viewport.
#[inline]
#[must_use]
pub const fn banner_row(size: Size) -> u16 {
    size.rows / 3
}

fn draw_rows(out: &mut OutputBuffer, document: &Document, size: Size) {
    let cols = usize::from(size.cols);

    for y in 0..size.rows {
        if let Some(line) = document.line(usize::from(y)) {
            let bytes = line.as_bytes();
            out.append(&bytes[..bytes.len().min(cols)]);
        } else if document.is_empty() && y == banner_row(size) {
            draw_banner(out, cols);
        } else {
            out.append(&[EMPTY_ROW]);
        }

        ansi::clear_line(out).ok();
        if y + 1 < size.rows {
            ansi::line_break(out).ok();
        }
    }
}

/// `~`, then spaces up to the centering column, then the banner.
///
/// On a viewport narrower than the banner there is no room to pad: the
/// marker is dropped and the banner is cut to fit.
fn draw_banner(out: &mut OutputBuffer, cols: usize) {
    let text = &BANNER.as_bytes()[..BANNER.len().min(cols)];
    let padding = (cols - text.len()) / 2;

    if padding > 0 {
        out.append(&[EMPTY_ROW]);
        out.append_repeated(b' ', padding - 1);
    }
    out.append(text);
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
