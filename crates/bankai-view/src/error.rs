//! Viewer errors.
//!
//! Loading a document can fail on its own terms (the file is missing, or
//! reading it breaks partway). Everything else is a terminal failure from
//! `bankai-term`, carried through unchanged.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// A fatal viewer error.
#[derive(Debug, Error)]
pub enum Error {
    /// The requested file could not be opened.
    #[error("{}: {source}", path.display())]
    FileOpen {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The file opened but reading its lines failed.
    #[error("read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Terminal I/O failed while rendering or reading keys.
    #[error(transparent)]
    Term(#[from] bankai_term::Error),
}

/// Result alias for viewer operations.
pub type Result<T> = std::result::Result<T, Error>;
