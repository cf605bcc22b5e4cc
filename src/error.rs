//! Errors surfaced by the resolver and the fallback writer.

use std::path::PathBuf;

use thiserror::Error;

use crate::key::KeyError;
use crate::storage::StorageError;

/// Errors returned by [`Translator`](crate::translator::Translator) calls.
#[derive(Error, Debug)]
pub enum TranslatorError {
    /// Empty or malformed `language` / `key` argument.
    #[error("Invalid argument '{name}': {reason}")]
    InvalidArgument { name: &'static str, reason: String },

    /// A language file exists but is not a language document.
    ///
    /// Never repaired automatically; the file may hold translator edits.
    #[error("'{}' is not a language file: {reason}", path.display())]
    InvalidDocument { path: PathBuf, reason: String },

    /// Reading or writing a language file failed.
    #[error("Failed to persist fallback translation to '{}': {source}", path.display())]
    Persistence {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl TranslatorError {
    #[must_use]
    pub fn invalid_argument(name: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidArgument { name, reason: reason.into() }
    }

    /// Whether the caller may still use the text computed for this call.
    #[must_use]
    pub const fn is_recoverable(&self) -> bool {
        matches!(self, Self::Persistence { .. })
    }
}

impl From<KeyError> for TranslatorError {
    fn from(err: KeyError) -> Self {
        Self::invalid_argument("key", err.to_string())
    }
}

impl From<StorageError> for TranslatorError {
    fn from(err: StorageError) -> Self {
        match err {
            StorageError::Io { path, source } => Self::Persistence { path, source },
            StorageError::Malformed { path, message } => {
                Self::InvalidDocument { path, reason: message }
            }
        }
    }
}
