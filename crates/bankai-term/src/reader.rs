// SPDX-License-Identifier: MIT
#![allow(unsafe_code)]
//
// Bounded-wait stdin reader — pulls raw bytes from the terminal.
//
// The viewer is single-threaded: the session loop renders, then asks for
// one key, then renders again. So instead of a background thread feeding a
// channel, stdin is read directly, one byte at a time, with `poll()`
// bounding how long each read may wait.
//
// The bound matters twice. It is the polling interval of the loop, and it
// is the window in which the second byte of an escape sequence must arrive
// before a lone ESC is taken to be the Escape key.

#[cfg(unix)]
use std::io;
use std::time::Duration;

use crate::error::{Error, Result};
use crate::input::ByteSource;

/// Default wait per read: one tenth of a second, the granularity of the
/// termios `VTIME` timer.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_millis(100);

/// Shortest and longest accepted waits.
pub const MIN_TIMEOUT: Duration = Duration::from_millis(1);
pub const MAX_TIMEOUT: Duration = Duration::from_millis(1000);

/// Stdin as a [`ByteSource`].
///
/// # Example
///
/// ```no_run
/// use bankai_term::input::KeyDecoder;
/// use bankai_term::reader::{StdinSource, DEFAULT_TIMEOUT};
///
/// let mut keys = KeyDecoder::new(StdinSource::new(DEFAULT_TIMEOUT));
/// let key = keys.decode()?;
/// # Ok::<(), bankai_term::Error>(())
/// ```
pub struct StdinSource {
    #[cfg(unix)]
    fd: libc::c_int,
    timeout_ms: i32,
}

impl StdinSource {
    /// Create a source whose reads wait at most `timeout`.
    ///
    /// The timeout is clamped to `MIN_TIMEOUT..=MAX_TIMEOUT`.
    #[must_use]
    pub fn new(timeout: Duration) -> Self {
        let clamped = timeout.clamp(MIN_TIMEOUT, MAX_TIMEOUT);
        #[allow(clippy::cast_possible_truncation)] // ≤ 1000 after clamping.
        let timeout_ms = clamped.as_millis() as i32;
        Self {
            #[cfg(unix)]
            fd: libc::STDIN_FILENO,
            timeout_ms,
        }
    }

    #[cfg(unix)]
    fn read_unix(&self) -> Result<Option<u8>> {
        let fd = self.fd;

        let mut pfd = libc::pollfd {
            fd,
            events: libc::POLLIN,
            revents: 0,
        };
        let ready = unsafe { libc::poll(&raw mut pfd, 1, self.timeout_ms) };

        if ready < 0 {
            let err = io::Error::last_os_error();
            return if is_transient(&err) {
                Ok(None)
            } else {
                Err(Error::io("poll", err))
            };
        }
        if ready == 0 {
            return Ok(None);
        }

        // Hung up with nothing left to read. Pending input is still drained
        // first, since POLLIN and POLLHUP can arrive together.
        if pfd.revents & libc::POLLIN == 0
            && pfd.revents & (libc::POLLHUP | libc::POLLERR | libc::POLLNVAL) != 0
        {
            return Err(Error::io("read", closed()));
        }

        let mut byte = 0u8;
        let n = unsafe { libc::read(fd, (&raw mut byte).cast(), 1) };

        match n {
            1 => Ok(Some(byte)),
            // poll said readable, so nothing here means end of input.
            0 => Err(Error::io("read", closed())),
            _ => {
                let err = io::Error::last_os_error();
                if is_transient(&err) {
                    Ok(None)
                } else {
                    Err(Error::io("read", err))
                }
            }
        }
    }
}

impl ByteSource for StdinSource {
    #[cfg(unix)]
    fn read_byte(&mut self) -> Result<Option<u8>> {
        self.read_unix()
    }

    /// Non-unix fallback: a plain blocking read with no timeout.
    #[cfg(not(unix))]
    fn read_byte(&mut self) -> Result<Option<u8>> {
        use std::io::Read;

        let mut byte = [0u8; 1];
        match std::io::stdin().lock().read(&mut byte) {
            Ok(1) => Ok(Some(byte[0])),
            Ok(_) => Ok(None),
            Err(e) if e.kind() == std::io::ErrorKind::Interrupted => Ok(None),
            Err(e) => Err(Error::io("read", e)),
        }
    }
}

#[cfg(unix)]
fn closed() -> io::Error {
    io::Error::new(io::ErrorKind::UnexpectedEof, "stdin closed")
}

/// `EAGAIN` / `EWOULDBLOCK` / `EINTR`: nothing to read right now.
#[cfg(unix)]
fn is_transient(err: &io::Error) -> bool {
    matches!(
        err.kind(),
        io::ErrorKind::WouldBlock | io::ErrorKind::Interrupted
    )
}

// ─── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_timeout_reasonable() {
        assert!(DEFAULT_TIMEOUT >= MIN_TIMEOUT);
        assert!(DEFAULT_TIMEOUT <= MAX_TIMEOUT);
    }

    #[test]
    fn new_keeps_in_range_timeout() {
        let s = StdinSource::new(Duration::from_millis(250));
        assert_eq!(s.timeout_ms, 250);
    }

    #[test]
    fn new_clamps_zero_up() {
        let s = StdinSource::new(Duration::ZERO);
        assert_eq!(s.timeout_ms, 1);
    }

    #[test]
    fn new_clamps_huge_down() {
        let s = StdinSource::new(Duration::from_secs(3600));
        assert_eq!(s.timeout_ms, 1000);
    }

    // -- Reads from a pipe --------------------------------------------------

    /// A source reading the read end of a fresh pipe; returns the write end.
    #[cfg(unix)]
    fn piped() -> (StdinSource, libc::c_int) {
        let mut fds = [0; 2];
        assert_eq!(unsafe { libc::pipe(fds.as_mut_ptr()) }, 0);
        let mut source = StdinSource::new(Duration::from_millis(10));
        source.fd = fds[0];
        (source, fds[1])
    }

    #[cfg(unix)]
    fn send(fd: libc::c_int, bytes: &[u8]) {
        let n = unsafe { libc::write(fd, bytes.as_ptr().cast(), bytes.len()) };
        assert_eq!(usize::try_from(n).ok(), Some(bytes.len()));
    }

    #[cfg(unix)]
    #[test]
    fn idle_pipe_times_out() {
        let (mut source, tx) = piped();
        assert!(source.read_byte().unwrap().is_none());
        unsafe {
            libc::close(tx);
            libc::close(source.fd);
        }
    }

    #[cfg(unix)]
    #[test]
    fn reads_pending_bytes_in_order() {
        let (mut source, tx) = piped();
        send(tx, b"\x1b[A");
        assert_eq!(source.read_byte().unwrap(), Some(0x1B));
        assert_eq!(source.read_byte().unwrap(), Some(b'['));
        assert_eq!(source.read_byte().unwrap(), Some(b'A'));
        assert!(source.read_byte().unwrap().is_none());
        unsafe {
            libc::close(tx);
            libc::close(source.fd);
        }
    }

    #[cfg(unix)]
    #[test]
    fn hangup_is_a_read_error() {
        let (mut source, tx) = piped();
        unsafe { libc::close(tx) };
        let err = source.read_byte().unwrap_err();
        assert!(matches!(err, Error::Io { op: "read", .. }), "{err}");
        unsafe { libc::close(source.fd) };
    }

    #[cfg(unix)]
    #[test]
    fn hangup_drains_pending_input_first() {
        let (mut source, tx) = piped();
        send(tx, b"q");
        unsafe { libc::close(tx) };
        assert_eq!(source.read_byte().unwrap(), Some(b'q'));
        assert!(source.read_byte().is_err());
        unsafe { libc::close(source.fd) };
    }

    #[cfg(unix)]
    #[test]
    fn hangup_ends_decoding() {
        use crate::input::KeyDecoder;

        let (source, tx) = piped();
        unsafe { libc::close(tx) };
        let mut keys = KeyDecoder::new(source);
        assert!(keys.decode().is_err());
        unsafe { libc::close(keys.source_mut().fd) };
    }

    #[cfg(unix)]
    #[test]
    fn transient_errors() {
        assert!(is_transient(&io::Error::from(io::ErrorKind::WouldBlock)));
        assert!(is_transient(&io::Error::from(io::ErrorKind::Interrupted)));
        assert!(!is_transient(&io::Error::from(io::ErrorKind::BrokenPipe)));
    }

    #[cfg(unix)]
    #[test]
    fn eagain_is_transient() {
        assert!(is_transient(&io::Error::from_raw_os_error(libc::EAGAIN)));
        assert!(is_transient(&io::Error::from_raw_os_error(libc::EINTR)));
    }
}
