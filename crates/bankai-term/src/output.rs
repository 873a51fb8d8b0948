// SPDX-License-Identifier: MIT
#![allow(unsafe_code)]
//
// Frame output buffering.
//
// OutputBuffer accumulates every byte of a frame in memory so the whole
// update reaches the terminal in a single write. Row-by-row writes let the
// terminal paint half a frame before the rest arrives, which shows up as
// flicker and torn redraws.
//
// A buffer lives for exactly one frame: the compositor creates it, fills it,
// the session flushes it, and it is dropped.
//
// The buffer is only half of it. `std::io::Stdout` is line-buffered, so a
// frame handed to it goes out as everything up to the last `\r\n` and then
// the tail on the next flush. `RawWriter` goes straight to the file
// descriptor instead: one `write` call is one `write(2)`.

use std::io::{self, Write};

// ─── OutputBuffer ────────────────────────────────────────────────────────────

/// A byte buffer that accumulates ANSI output for a single `write()` call.
///
/// Default capacity: 4 KB, enough for an 80×24 screen of text plus the
/// per-row escape sequences without reallocation. Larger frames grow the
/// backing `Vec` with the usual amortized doubling.
pub struct OutputBuffer {
    buf: Vec<u8>,
}

const DEFAULT_CAPACITY: usize = 4096;

impl OutputBuffer {
    /// Create an empty buffer with default capacity.
    #[must_use]
    pub fn new() -> Self {
        Self {
            buf: Vec::with_capacity(DEFAULT_CAPACITY),
        }
    }

    /// Number of bytes accumulated.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.buf.len()
    }

    /// Whether the buffer is empty.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    /// The accumulated bytes.
    #[inline]
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.buf
    }

    /// Append raw bytes.
    #[inline]
    pub fn append(&mut self, bytes: &[u8]) {
        self.buf.extend_from_slice(bytes);
    }

    /// Append `n` copies of `byte`.
    pub fn append_repeated(&mut self, byte: u8, n: usize) {
        self.buf.resize(self.buf.len() + n, byte);
    }

    /// Write accumulated output to `w` in one `write_all` and clear.
    ///
    /// # Errors
    ///
    /// Returns an error if writing to or flushing `w` fails.
    pub fn flush_to(&mut self, w: &mut impl Write) -> io::Result<()> {
        if !self.buf.is_empty() {
            w.write_all(&self.buf)?;
            w.flush()?;
            self.buf.clear();
        }
        Ok(())
    }

    /// Consume the buffer, yielding its bytes.
    #[must_use]
    pub fn into_bytes(self) -> Vec<u8> {
        self.buf
    }
}

impl Write for OutputBuffer {
    #[inline]
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.buf.extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        // Intentionally a no-op. Real flushing via flush_to().
        Ok(())
    }
}

impl Default for OutputBuffer {
    fn default() -> Self {
        Self::new()
    }
}

// ─── RawWriter ───────────────────────────────────────────────────────────────

/// An unbuffered writer on a raw file descriptor.
///
/// Each [`Write::write`] is exactly one `write(2)`; nothing is held back
/// for a later flush. `write_all` only issues a second call if the kernel
/// accepted part of the frame.
#[derive(Debug)]
pub struct RawWriter {
    #[cfg(unix)]
    fd: libc::c_int,
}

impl RawWriter {
    /// Writer on standard output.
    #[must_use]
    pub const fn stdout() -> Self {
        Self {
            #[cfg(unix)]
            fd: libc::STDOUT_FILENO,
        }
    }
}

impl Write for RawWriter {
    #[cfg(unix)]
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let n = unsafe { libc::write(self.fd, buf.as_ptr().cast::<libc::c_void>(), buf.len()) };
        usize::try_from(n).map_err(|_| io::Error::last_os_error())
    }

    #[cfg(not(unix))]
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let mut stdout = io::stdout().lock();
        stdout.write_all(buf)?;
        stdout.flush()?;
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────
