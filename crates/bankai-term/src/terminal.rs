// SPDX-License-Identifier: MIT
//
// Terminal control — raw mode, geometry, and RAII cleanup.
//
// Safety: This module necessarily uses `unsafe` for termios (tcgetattr,
// tcsetattr), ioctl (TIOCGWINSZ) and raw fd writes. These are
// the standard POSIX interfaces for terminal control and have no safe
// alternative. Each unsafe block is minimal.
#![allow(unsafe_code)]
//
// Raw mode is process-wide state that outlives us if we're careless: a
// viewer that dies without restoring it leaves the shell with no echo and
// no line editing. So it is held as a guard. `RawMode` restores the saved
// termios on drop, which covers normal quit and every `?` error path, and
// a panic hook restores it from a global backup, which covers panics.

use std::io::{self, Write};
use std::sync::{Mutex, Once};

use tracing::{debug, warn};

use crate::ansi;
use crate::error::{Error, Result};
use crate::input::ByteSource;

// ─── Size ───────────────────────────────────────────────────────────────────

/// Terminal dimensions in character cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Size {
    /// Number of columns (width in character cells).
    pub cols: u16,
    /// Number of rows (height in character cells).
    pub rows: u16,
}

impl Size {
    /// Create a size from row and column counts.
    #[inline]
    #[must_use]
    pub const fn new(rows: u16, cols: u16) -> Self {
        Self { cols, rows }
    }
}

// ─── Terminal Queries ───────────────────────────────────────────────────────

/// Query the current terminal size via `ioctl(TIOCGWINSZ)`.
///
/// Returns `None` if stdout is not a terminal, the query fails, or the
/// terminal reports zero columns.
#[cfg(unix)]
#[must_use]
pub fn window_size() -> Option<Size> {
    let mut ws: libc::winsize = unsafe { std::mem::zeroed() };
    let result = unsafe { libc::ioctl(libc::STDOUT_FILENO, libc::TIOCGWINSZ, &mut ws) };

    if result == 0 && ws.ws_col > 0 {
        Some(Size {
            cols: ws.ws_col,
            rows: ws.ws_row,
        })
    } else {
        None
    }
}

#[cfg(not(unix))]
#[must_use]
pub fn window_size() -> Option<Size> {
    None
}

/// Longest cursor position report we will read before giving up.
const REPORT_MAX: usize = 32;

/// Determine the terminal size.
///
/// Tries the window-size ioctl first. If that fails, parks the cursor in
/// the bottom-right corner and asks the terminal where it ended up; the
/// answer is read from `input`. Must be called with raw mode enabled so
/// the report is neither echoed nor line-buffered.
///
/// # Errors
///
/// Returns [`Error::Io`] if the query cannot be written or the report
/// cannot be read, and [`Error::Geometry`] if the report is malformed.
pub fn query_size(out: &mut impl Write, input: &mut impl ByteSource) -> Result<Size> {
    if let Some(size) = window_size() {
        debug!(rows = size.rows, cols = size.cols, "window size from ioctl");
        return Ok(size);
    }
    warn!("window size ioctl failed; probing cursor position");
    size_from_cursor_report(out, input)
}

/// The fallback half of [`query_size`]: query and parse the cursor report.
///
/// # Errors
///
/// See [`query_size`].
pub fn size_from_cursor_report(
    out: &mut impl Write,
    input: &mut impl ByteSource,
) -> Result<Size> {
    ansi::cursor_far_corner(out).map_err(|e| Error::io("write", e))?;
    ansi::request_cursor_position(out).map_err(|e| Error::io("write", e))?;
    out.flush().map_err(|e| Error::io("write", e))?;

    let mut report = Vec::with_capacity(REPORT_MAX);
    while report.len() < REPORT_MAX {
        match input.read_byte()? {
            Some(b'R') => {
                report.push(b'R');
                break;
            }
            Some(b) => report.push(b),
            None => break,
        }
    }

    let size = parse_cursor_report(&report).ok_or(Error::Geometry)?;
    debug!(rows = size.rows, cols = size.cols, "window size from cursor report");
    Ok(size)
}

/// Parse a cursor position report: `ESC [ rows ; cols R`.
#[must_use]
pub fn parse_cursor_report(report: &[u8]) -> Option<Size> {
    let body = report.strip_prefix(b"\x1b[")?;
    let body = body.strip_suffix(b"R")?;
    let text = std::str::from_utf8(body).ok()?;
    let (rows, cols) = text.split_once(';')?;
    Some(Size {
        rows: rows.parse().ok()?,
        cols: cols.parse().ok()?,
    })
}

// ─── Panic-Safe Terminal Restore ────────────────────────────────────────────

/// Global backup of original termios for panic recovery.
///
/// [`RawMode`] owns its own copy, but the panic hook can't reach it. This
/// global backup behind a [`Mutex`] lets the hook
/// restore the mode without the guard.
#[cfg(unix)]
static TERMIOS_BACKUP: Mutex<Option<libc::termios>> = Mutex::new(None);

/// Restore termios from the global backup. Best-effort, ignores errors.
#[cfg(unix)]
fn restore_termios_from_backup() {
    if let Ok(guard) = TERMIOS_BACKUP.lock() {
        if let Some(ref original) = *guard {
            unsafe {
                let _ = libc::tcsetattr(libc::STDIN_FILENO, libc::TCSAFLUSH, original);
            }
        }
    }
}

/// Emergency restore sequence: show the cursor, which a frame hides while
/// it paints.
const EMERGENCY_RESTORE: &[u8] = b"\x1b[?25h";

/// The panic hook is installed at most once per process.
static PANIC_HOOK_INSTALLED: Once = Once::new();

/// Install a panic hook that restores the terminal before printing the error.
///
/// Writes [`EMERGENCY_RESTORE`] directly to fd 1 (bypassing Rust's stdout
/// lock, which the panicking frame may hold), restores termios, then
/// delegates to the original hook so the message prints to a sane terminal.
fn install_panic_hook() {
    PANIC_HOOK_INSTALLED.call_once(|| {
        let original = std::panic::take_hook();
        std::panic::set_hook(Box::new(move |info| {
            emergency_restore();

            #[cfg(unix)]
            restore_termios_from_backup();

            original(info);
        }));
    });
}

fn emergency_restore() {
    #[cfg(unix)]
    unsafe {
        let _ = libc::write(
            libc::STDOUT_FILENO,
            EMERGENCY_RESTORE.as_ptr().cast::<libc::c_void>(),
            EMERGENCY_RESTORE.len(),
        );
    }

    #[cfg(not(unix))]
    {
        let _ = io::stdout().write_all(EMERGENCY_RESTORE);
        let _ = io::stdout().flush();
    }
}

// ─── RawMode ────────────────────────────────────────────────────────────────

/// Raw-mode guard.
///
/// While alive, stdin delivers bytes unbuffered and unechoed, with no
/// signal keys and no output post-processing. Dropping it puts the
/// original mode back.
///
/// # Example
///
/// ```no_run
/// use bankai_term::terminal::RawMode;
///
/// let raw = RawMode::enable()?;
/// // ... render frames, decode keys ...
/// drop(raw); // cooked mode again
/// # Ok::<(), bankai_term::Error>(())
/// ```
pub struct RawMode {
    #[cfg(unix)]
    original: libc::termios,
}

impl RawMode {
    /// Save the current mode and switch stdin to raw mode.
    ///
    /// Reads time out after a tenth of a second (`VMIN = 0`, `VTIME = 1`),
    /// so even a direct `read()` never blocks indefinitely.
    ///
    /// # Errors
    ///
    /// Returns [`Error::TerminalMode`] if the current mode cannot be read
    /// (e.g., stdin is not a terminal) or the raw mode cannot be applied.
    #[cfg(unix)]
    pub fn enable() -> Result<Self> {
        let fd = libc::STDIN_FILENO;

        let original = unsafe {
            let mut termios: libc::termios = std::mem::zeroed();
            if libc::tcgetattr(fd, &raw mut termios) != 0 {
                return Err(Error::mode("tcgetattr", io::Error::last_os_error()));
            }
            termios
        };

        // Back up before changing anything so a panic can always undo it.
        if let Ok(mut guard) = TERMIOS_BACKUP.lock() {
            *guard = Some(original);
        }
        install_panic_hook();

        let raw = raw_termios(original);
        unsafe {
            if libc::tcsetattr(fd, libc::TCSAFLUSH, &raw const raw) != 0 {
                return Err(Error::mode("tcsetattr", io::Error::last_os_error()));
            }
        }

        debug!("raw mode enabled");
        Ok(Self { original })
    }

    #[cfg(not(unix))]
    pub fn enable() -> Result<Self> {
        Err(Error::mode("tcgetattr", io::Error::from(io::ErrorKind::Unsupported)))
    }

    /// Restore the saved mode now, reporting failure.
    ///
    /// # Errors
    ///
    /// Returns [`Error::TerminalMode`] if `tcsetattr` fails.
    pub fn disable(self) -> Result<()> {
        let result = self.restore();
        std::mem::forget(self);
        result
    }

    #[cfg(unix)]
    fn restore(&self) -> Result<()> {
        unsafe {
            if libc::tcsetattr(libc::STDIN_FILENO, libc::TCSAFLUSH, &raw const self.original) != 0 {
                return Err(Error::mode("tcsetattr", io::Error::last_os_error()));
            }
        }

        // Restored successfully; the panic hook has nothing left to do.
        if let Ok(mut guard) = TERMIOS_BACKUP.lock() {
            *guard = None;
        }
        debug!("raw mode disabled");
        Ok(())
    }

    #[cfg(not(unix))]
    fn restore(&self) -> Result<()> {
        Ok(())
    }
}

impl Drop for RawMode {
    fn drop(&mut self) {
        let _ = self.restore();
    }
}

/// Derive raw settings from the original mode.
///
/// Input: no break-to-SIGINT, no CR→NL, no parity check, no 8th-bit strip,
/// no XON/XOFF. Output: no post-processing. Local: no echo, no canonical
/// lines, no Ctrl-V, no signal keys.
#[cfg(unix)]
fn raw_termios(mut termios: libc::termios) -> libc::termios {
    termios.c_iflag &= !(libc::BRKINT | libc::ICRNL | libc::INPCK | libc::ISTRIP | libc::IXON);
    termios.c_oflag &= !libc::OPOST;
    termios.c_cflag |= libc::CS8;
    termios.c_lflag &= !(libc::ECHO | libc::ICANON | libc::IEXTEN | libc::ISIG);

    termios.c_cc[libc::VMIN] = 0;
    termios.c_cc[libc::VTIME] = 1;
    termios
}

// ─── Tests ───────────────────────────────────────────────────────────────────
