//! Error types for the opak-core library.

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for the opak library.
#[derive(Error, Debug)]
pub enum OpakError {
    /// Journal record decoding error.
    #[error("journal error: {0}")]
    Journal(#[from] JournalError),

    /// Directory walk error.
    #[error("walk error: {0}")]
    Walk(#[from] WalkError),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors related to decoding a single journal record.
///
/// These never abort a document: the caller skips the offending record and
/// keeps going.
#[derive(Error, Debug)]
pub enum JournalError {
    /// Record payload is shorter than its declared field layout.
    #[error("record 0x{record_type:02X} payload too short: {len} bytes")]
    ShortPayload { record_type: u16, len: usize },

    /// A field could not be decoded.
    #[error("failed to decode {field}: {reason}")]
    Field { field: &'static str, reason: String },
}

/// Errors scoped to one file during a directory walk.
#[derive(Error, Debug)]
pub enum WalkError {
    /// The journal file could not be read.
    #[error("failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The scan root does not exist or is not a directory.
    #[error("not a directory: {}", .0.display())]
    NotADirectory(PathBuf),
}

/// Result type for the opak library.
pub type Result<T> = std::result::Result<T, OpakError>;
