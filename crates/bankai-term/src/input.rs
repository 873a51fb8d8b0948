// SPDX-License-Identifier: MIT
//
// Terminal key decoder.
//
// Turns raw stdin bytes into logical key events, one key per call. Handles
// the two escape dialects terminals use for navigation keys:
//
// - CSI sequences (`ESC [ A`, `ESC [ 5 ~`, ...)
// - SS3 sequences (`ESC O H`, `ESC O F`), sent by some emulators for
//   Home/End
//
// # Design
//
// The decoder pulls bytes on demand from a [`ByteSource`], where every
// read waits a bounded interval and may come back empty. That wait is what
// resolves the Escape ambiguity: a lone ESC followed by silence is the
// Escape key; ESC followed promptly by `[` or `O` is the start of a
// sequence. Anything the tables below don't recognise collapses to a bare
// Escape literal rather than leaking half a sequence into the caller.

use std::collections::VecDeque;

use tracing::trace;

use crate::error::Result;

/// The escape byte that introduces every multi-byte sequence.
pub const ESC: u8 = 0x1B;

// ─── Key ─────────────────────────────────────────────────────────────────────

/// A decoded key.
///
/// Ordinary characters and control codes arrive as [`Literal`](Key::Literal)
/// bytes. Navigation keys that terminals encode as escape sequences get
/// their own variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    /// A single input byte (printable, control code, or bare Escape).
    Literal(u8),
    MoveUp,
    MoveDown,
    MoveLeft,
    MoveRight,
    PageUp,
    PageDown,
    Home,
    End,
    Delete,
}

impl Key {
    /// Ctrl-Q, the quit chord.
    pub const QUIT: Self = Self::ctrl(b'q');

    /// The literal a terminal sends for Ctrl + `key` (the low five bits).
    #[inline]
    #[must_use]
    pub const fn ctrl(key: u8) -> Self {
        Self::Literal(key & 0x1F)
    }

    /// Whether this key moves the cursor.
    #[must_use]
    pub const fn is_navigation(self) -> bool {
        matches!(
            self,
            Self::MoveUp
                | Self::MoveDown
                | Self::MoveLeft
                | Self::MoveRight
                | Self::PageUp
                | Self::PageDown
                | Self::Home
                | Self::End
        )
    }
}

// ─── Byte sources ────────────────────────────────────────────────────────────

/// A stream of input bytes read with a bounded wait.
///
/// `Ok(None)` means the wait elapsed with nothing to read. That is the
/// normal idle state of a terminal and never an error.
pub trait ByteSource {
    /// Read one byte, waiting at most the source's timeout.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying read fails for any reason other
    /// than "no data yet".
    fn read_byte(&mut self) -> Result<Option<u8>>;
}

/// In-memory source: bytes are served front to back, and an empty queue
/// behaves like a read that timed out.
impl ByteSource for VecDeque<u8> {
    fn read_byte(&mut self) -> Result<Option<u8>> {
        Ok(self.pop_front())
    }
}

impl<S: ByteSource + ?Sized> ByteSource for &mut S {
    fn read_byte(&mut self) -> Result<Option<u8>> {
        (**self).read_byte()
    }
}

// ─── Decoder ─────────────────────────────────────────────────────────────────

/// Byte-driven key decoder.
///
/// Owns its [`ByteSource`]. Each [`decode`](KeyDecoder::decode) call
/// consumes exactly the bytes of one key.
///
/// # Example
///
/// ```
/// use std::collections::VecDeque;
/// use bankai_term::input::{Key, KeyDecoder};
///
/// let mut decoder = KeyDecoder::new(VecDeque::from(b"\x1b[A".to_vec()));
/// assert_eq!(decoder.decode().unwrap(), Key::MoveUp);
/// ```
pub struct KeyDecoder<S> {
    source: S,
}

impl<S: ByteSource> KeyDecoder<S> {
    /// Wrap a byte source.
    pub const fn new(source: S) -> Self {
        Self { source }
    }

    /// The wrapped source.
    pub const fn source_mut(&mut self) -> &mut S {
        &mut self.source
    }

    /// Block until a key arrives and return it.
    ///
    /// Retries indefinitely while the source reports no data; each retry
    /// waits at most one source timeout.
    ///
    /// # Errors
    ///
    /// Propagates read failures from the source.
    pub fn decode(&mut self) -> Result<Key> {
        loop {
            if let Some(key) = self.try_decode()? {
                return Ok(key);
            }
        }
    }

    /// One decode attempt: `Ok(None)` if no byte arrived within one wait.
    ///
    /// Once a first byte has arrived, the rest of the key is read here too,
    /// so a `Some` is always a complete key.
    ///
    /// # Errors
    ///
    /// Propagates read failures from the source.
    pub fn try_decode(&mut self) -> Result<Option<Key>> {
        let Some(b0) = self.source.read_byte()? else {
            return Ok(None);
        };
        let key = if b0 == ESC {
            self.escape()?
        } else {
            Key::Literal(b0)
        };
        trace!(?key, "decoded");
        Ok(Some(key))
    }

    /// Decode what follows an ESC. Every dead end is a bare Escape.
    fn escape(&mut self) -> Result<Key> {
        let bare = Key::Literal(ESC);

        let Some(b1) = self.source.read_byte()? else {
            return Ok(bare);
        };

        match b1 {
            b'[' => {
                let Some(b2) = self.source.read_byte()? else {
                    return Ok(bare);
                };
                if b2.is_ascii_digit() {
                    // `ESC [ n ~`: editing keypad.
                    let Some(b3) = self.source.read_byte()? else {
                        return Ok(bare);
                    };
                    if b3 != b'~' {
                        return Ok(bare);
                    }
                    Ok(tilde_key(b2).unwrap_or(bare))
                } else {
                    Ok(csi_key(b2).unwrap_or(bare))
                }
            }
            b'O' => {
                let Some(b2) = self.source.read_byte()? else {
                    return Ok(bare);
                };
                Ok(ss3_key(b2).unwrap_or(bare))
            }
            // Not a dialect we speak; the trailing byte is dropped.
            _ => Ok(bare),
        }
    }
}

// ─── Sequence tables ─────────────────────────────────────────────────────────

/// `ESC [ digit ~`. 1/7 and 4/8 are the rxvt and xterm spellings of
/// Home and End.
const fn tilde_key(digit: u8) -> Option<Key> {
    match digit {
        b'1' | b'7' => Some(Key::Home),
        b'3' => Some(Key::Delete),
        b'4' | b'8' => Some(Key::End),
        b'5' => Some(Key::PageUp),
        b'6' => Some(Key::PageDown),
        _ => None,
    }
}

/// `ESC [ letter`.
const fn csi_key(letter: u8) -> Option<Key> {
    match letter {
        b'A' => Some(Key::MoveUp),
        b'B' => Some(Key::MoveDown),
        b'C' => Some(Key::MoveRight),
        b'D' => Some(Key::MoveLeft),
        b'H' => Some(Key::Home),
        b'F' => Some(Key::End),
        _ => None,
    }
}

/// `ESC O letter`.
const fn ss3_key(letter: u8) -> Option<Key> {
    match letter {
        b'H' => Some(Key::Home),
        b'F' => Some(Key::End),
        _ => None,
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────
