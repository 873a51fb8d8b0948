//! Document — the lines being viewed.
//!
//! A `Document` is built once, at startup, and never changes afterwards.
//! Lines are kept as raw bytes: the viewer draws one byte per terminal
//! column and makes no attempt to decode UTF-8, so a file in any 8-bit
//! encoding loads without error.
//!
//! Line splitting is on `\n`. Every trailing `\n` and `\r` is stripped, so
//! Unix and Windows line endings both produce clean lines, and a final line
//! without a newline is kept as-is.

use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::Path;

use tracing::debug;

use crate::error::{Error, Result};

// ---------------------------------------------------------------------------
// TextLine
// ---------------------------------------------------------------------------

/// One line of the document, without its line terminator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextLine {
    bytes: Box<[u8]>,
}

impl TextLine {
    /// Build a line from raw bytes, stripping trailing `\n` / `\r`.
    #[must_use]
    pub fn new(raw: &[u8]) -> Self {
        let end = raw
            .iter()
            .rposition(|&b| b != b'\n' && b != b'\r')
            .map_or(0, |i| i + 1);
        Self {
            bytes: raw[..end].into(),
        }
    }

    /// The line's content.
    #[inline]
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Length in bytes.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    /// True for an empty line.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

// ---------------------------------------------------------------------------
// Document
// ---------------------------------------------------------------------------

/// An ordered, read-only sequence of lines. Empty when no file was given.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Document {
    lines: Vec<TextLine>,
}

impl Document {
    /// An empty document.
    #[must_use]
    pub const fn new() -> Self {
        Self { lines: Vec::new() }
    }

    /// Load a document from a file.
    ///
    /// # Errors
    ///
    /// Returns [`Error::FileOpen`] if the file cannot be opened and
    /// [`Error::Read`] if reading it fails partway.
    pub fn open(path: &Path) -> Result<Self> {
        let file = File::open(path).map_err(|source| Error::FileOpen {
            path: path.to_path_buf(),
            source,
        })?;
        let doc = Self::from_reader(BufReader::new(file)).map_err(|source| Error::Read {
            path: path.to_path_buf(),
            source,
        })?;
        debug!(path = %path.display(), lines = doc.line_count(), "document loaded");
        Ok(doc)
    }

    /// Read lines from any buffered byte stream until EOF.
    ///
    /// # Errors
    ///
    /// Propagates read errors from `reader`.
    pub fn from_reader(mut reader: impl BufRead) -> io::Result<Self> {
        let mut lines = Vec::new();
        let mut raw = Vec::new();
        loop {
            raw.clear();
            if reader.read_until(b'\n', &mut raw)? == 0 {
                break;
            }
            lines.push(TextLine::new(&raw));
        }
        Ok(Self { lines })
    }

    /// Number of lines.
    #[inline]
    #[must_use]
    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    /// True when there are no lines at all.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Line `idx`, if it exists.
    #[inline]
    #[must_use]
    pub fn line(&self, idx: usize) -> Option<&TextLine> {
        self.lines.get(idx)
    }

    /// All lines in file order.
    pub fn lines(&self) -> impl Iterator<Item = &TextLine> {
        self.lines.iter()
    }
}

impl FromIterator<TextLine> for Document {
    fn from_iter<I: IntoIterator<Item = TextLine>>(iter: I) -> Self {
        Self {
            lines: iter.into_iter().collect(),
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::io::Write;

    fn contents(doc: &Document) -> Vec<&[u8]> {
        doc.lines().map(TextLine::as_bytes).collect()
    }

    // -- TextLine -----------------------------------------------------------

    #[test]
    fn line_strips_lf() {
        assert_eq!(TextLine::new(b"a\n").as_bytes(), b"a");
    }

    #[test]
    fn line_strips_crlf() {
        assert_eq!(TextLine::new(b"bb\r\n").as_bytes(), b"bb");
    }

    #[test]
    fn line_strips_every_trailing_terminator() {
        assert_eq!(TextLine::new(b"x\r\r\n\n").as_bytes(), b"x");
    }

    #[test]
    fn line_keeps_interior_cr() {
        assert_eq!(TextLine::new(b"a\rb\n").as_bytes(), b"a\rb");
    }

    #[test]
    fn blank_line_is_empty() {
        let line = TextLine::new(b"\n");
        assert!(line.is_empty());
        assert_eq!(line.len(), 0);
    }

    // -- Loading ------------------------------------------------------------

    #[test]
    fn mixed_endings_and_blank_line() {
        let doc = Document::from_reader(&b"a\nbb\r\n\n"[..]).unwrap();
        assert_eq!(doc.line_count(), 3);
        assert_eq!(contents(&doc), vec![&b"a"[..], &b"bb"[..], &b""[..]]);
        let sizes: Vec<usize> = doc.lines().map(TextLine::len).collect();
        assert_eq!(sizes, vec![1, 2, 0]);
    }

    #[test]
    fn last_line_without_newline_is_kept() {
        let doc = Document::from_reader(&b"one\ntwo"[..]).unwrap();
        assert_eq!(contents(&doc), vec![&b"one"[..], &b"two"[..]]);
    }

    #[test]
    fn empty_input_is_empty_document() {
        let doc = Document::from_reader(&b""[..]).unwrap();
        assert!(doc.is_empty());
        assert_eq!(doc.line(0), None);
    }

    #[test]
    fn non_utf8_bytes_survive() {
        let doc = Document::from_reader(&b"\xff\xfe\n"[..]).unwrap();
        assert_eq!(doc.line(0).unwrap().as_bytes(), b"\xff\xfe");
    }

    #[test]
    fn open_reads_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"a\nbb\r\n\n").unwrap();

        let doc = Document::open(file.path()).unwrap();

        assert_eq!(contents(&doc), vec![&b"a"[..], &b"bb"[..], &b""[..]]);
    }

    #[test]
    fn open_missing_file_is_file_open_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nope.txt");

        let err = Document::open(&path).unwrap_err();

        assert!(matches!(err, Error::FileOpen { path: ref p, .. } if *p == path));
    }

    #[test]
    fn new_document_is_empty() {
        assert!(Document::new().is_empty());
        assert_eq!(Document::default(), Document::new());
    }

    #[test]
    fn collect_from_lines() {
        let doc: Document = [TextLine::new(b"x"), TextLine::new(b"y\n")].into_iter().collect();
        assert_eq!(contents(&doc), vec![&b"x"[..], &b"y"[..]]);
    }
}
