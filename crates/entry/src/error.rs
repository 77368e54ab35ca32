//! The shared error vocabulary for every crate in the workspace.
//!
//! Every layer — WAL, SSTable, memtable, the coordinator — returns
//! [`StorageError`] so callers (and tests) can match on `kind()` instead of
//! parsing message strings. See `SPEC_FULL.md` §7 for the propagation policy.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// One of the five distinct, observable error kinds this engine surfaces.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Caller-supplied data failed a precondition (size bound, ordering, emptiness).
    Validation,
    /// On-disk bytes do not conform to the expected binary layout.
    Format,
    /// A checksum did not match the bytes it covers.
    Integrity,
    /// The underlying filesystem operation failed.
    Io,
    /// The operation is invalid given the current lifecycle state of the object.
    State,
}

/// The single error type returned by every public operation in this workspace.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("validation error: {0}")]
    Validation(String),

    #[error("format error: {0}")]
    Format(String),

    #[error("integrity error: {0}")]
    Integrity(String),

    #[error("io error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("state error: {0}")]
    State(String),
}

impl StorageError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            StorageError::Validation(_) => ErrorKind::Validation,
            StorageError::Format(_) => ErrorKind::Format,
            StorageError::Integrity(_) => ErrorKind::Integrity,
            StorageError::Io { .. } => ErrorKind::Io,
            StorageError::State(_) => ErrorKind::State,
        }
    }

    pub fn validation(msg: impl Into<String>) -> Self {
        StorageError::Validation(msg.into())
    }

    pub fn format(msg: impl Into<String>) -> Self {
        StorageError::Format(msg.into())
    }

    pub fn integrity(msg: impl Into<String>) -> Self {
        StorageError::Integrity(msg.into())
    }

    pub fn state(msg: impl Into<String>) -> Self {
        StorageError::State(msg.into())
    }

    pub fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        StorageError::Io {
            path: path.into(),
            source,
        }
    }
}

/// Convenience conversion for call sites that don't have a path handy
/// (e.g. operations on an already-open file handle). The path is recorded
/// as empty; prefer [`StorageError::io`] when a path is available.
impl From<io::Error> for StorageError {
    fn from(source: io::Error) -> Self {
        StorageError::Io {
            path: PathBuf::new(),
            source,
        }
    }
}

pub type Result<T> = std::result::Result<T, StorageError>;
