// SPDX-License-Identifier: MIT
//
// Terminal-layer errors.
//
// Every variant here is fatal. "No byte yet" is not an error and never
// reaches this type: bounded-wait reads report it as `Ok(None)`.

use std::io;

use thiserror::Error;

/// A fatal failure while talking to the terminal.
#[derive(Debug, Error)]
pub enum Error {
    /// Reading or applying the terminal mode failed (`tcgetattr`, `tcsetattr`).
    #[error("{op}: {source}")]
    TerminalMode {
        op: &'static str,
        #[source]
        source: io::Error,
    },

    /// A read or write failed for a reason other than "no data available".
    #[error("{op}: {source}")]
    Io {
        op: &'static str,
        #[source]
        source: io::Error,
    },

    /// Neither the window-size ioctl nor the cursor-report fallback
    /// produced usable dimensions.
    #[error("unable to determine terminal size")]
    Geometry,
}

impl Error {
    /// Wrap an I/O failure, naming the operation that produced it.
    #[must_use]
    pub const fn io(op: &'static str, source: io::Error) -> Self {
        Self::Io { op, source }
    }

    /// Wrap a terminal-mode failure, naming the call that produced it.
    #[must_use]
    pub const fn mode(op: &'static str, source: io::Error) -> Self {
        Self::TerminalMode { op, source }
    }
}

/// Result alias for terminal operations.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn io_error_names_operation() {
        let e = Error::io("read", io::Error::other("boom"));
        assert_eq!(e.to_string(), "read: boom");
    }

    #[test]
    fn mode_error_names_operation() {
        let e = Error::mode("tcgetattr", io::Error::other("not a tty"));
        assert_eq!(e.to_string(), "tcgetattr: not a tty");
        assert!(matches!(e, Error::TerminalMode { op: "tcgetattr", .. }));
    }

    #[test]
    fn geometry_message() {
        assert_eq!(Error::Geometry.to_string(), "unable to determine terminal size");
    }

    #[test]
    fn source_is_preserved() {
        use std::error::Error as _;
        let e = Error::io("write", io::Error::other("disk gone"));
        assert_eq!(e.source().map(ToString::to_string).as_deref(), Some("disk gone"));
    }
}
