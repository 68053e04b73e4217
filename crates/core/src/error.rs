//! Error types for the BPE tokenizer library.

use std::path::PathBuf;
use thiserror::Error;

use crate::store::KeyKind;

/// Main error type for the tokenizer library.
///
/// Logical outcomes (duplicate key on insert, key not found on search or
/// delete, empty pair table at selection time) are *not* errors; they are
/// reported through [`crate::store::InsertOutcome`], `Option` and `bool`
/// return values so callers can branch on them routinely.
#[derive(Error, Debug)]
pub enum TokenizerError {
    /// A store was created with a zero bucket count
    #[error("Invalid store capacity: {0}")]
    InvalidCapacity(usize),

    /// A key of the wrong kind was handed to a store
    #[error("Key type mismatch: store holds {expected:?} keys, got {found:?}")]
    KeyTypeMismatch { expected: KeyKind, found: KeyKind },

    /// Probing wrapped the full table without finding a free bucket
    #[error("Store full: no free bucket after probing all {capacity} slots")]
    StoreFull { capacity: usize },

    /// A writer panicked while holding the store lock; the table may be
    /// inconsistent and is treated as unusable
    #[error("Store lock poisoned by a panicking writer")]
    Poisoned,

    /// A merge pair key did not hold exactly two space-separated symbols
    #[error("Invalid merge pair {0:?}: expected exactly two space-separated symbols")]
    InvalidMerge(String),

    /// A special token resolved to an empty string, or was absent from a
    /// loaded tokenizer file
    #[error("Missing or empty special token: {0}")]
    InvalidSpecialToken(&'static str),

    /// I/O error with file context
    #[error("I/O error for {path}: {err}")]
    Io {
        path: PathBuf,
        #[source]
        err: std::io::Error,
    },

    /// File did not start with the expected format magic
    #[error("Bad magic in {path}: expected {expected:#010x}, found {found:#010x}")]
    BadMagic {
        path: PathBuf,
        expected: u32,
        found: u32,
    },

    /// File carried a format version this codec does not understand
    #[error("Unsupported format version {found} in {path} (expected {expected})")]
    BadVersion {
        path: PathBuf,
        expected: i32,
        found: i32,
    },

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl TokenizerError {
    /// Attach path context to a raw I/O error.
    pub fn io(path: impl Into<PathBuf>, err: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            err,
        }
    }
}

/// Result type alias for tokenizer operations.
pub type Result<T> = std::result::Result<T, TokenizerError>;
