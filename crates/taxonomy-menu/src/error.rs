//! Error types for taxonomy menu synchronization

use thiserror::Error;

use crate::term::{TermId, VocabularyId};

/// Main error type for taxonomy menu operations
#[derive(Error, Debug)]
pub enum TaxonomyMenuError {
    /// User-correctable input problem; nothing was mutated
    #[error("Validation error on '{field}': {message}")]
    Validation {
        /// Form field the error belongs to
        field: String,
        /// Message shown to the editor
        message: String,
    },

    /// A stable menu reference could not be parsed
    #[error("Invalid menu parent reference: {0:?}")]
    InvalidParent(String),

    /// A term cannot be placed in the tree
    #[error("Invalid term {id}: {reason}")]
    InvalidTerm {
        /// Offending term
        id: TermId,
        /// Why it was rejected
        reason: String,
    },

    /// The vocabulary is not bound to any menu
    #[error("Vocabulary '{0}' has no menu binding")]
    MissingBinding(VocabularyId),

    /// A collaborator store failed to read or write
    #[error("Storage error: {0}")]
    Storage(String),

    /// Settings file could not be read or written
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Settings file is not valid JSON for the settings schema
    #[error("Settings encoding error: {0}")]
    Json(#[from] serde_json::Error),

    /// A previous holder of the vocabulary lock panicked
    #[error("Lock for vocabulary '{0}' is poisoned")]
    LockPoisoned(VocabularyId),
}

impl TaxonomyMenuError {
    /// Build a validation error for a form field.
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        TaxonomyMenuError::Validation {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Build an invalid-term error.
    pub fn invalid_term(id: TermId, reason: impl Into<String>) -> Self {
        TaxonomyMenuError::InvalidTerm {
            id,
            reason: reason.into(),
        }
    }

    /// Whether this error is user-correctable.
    pub fn is_validation(&self) -> bool {
        matches!(self, TaxonomyMenuError::Validation { .. })
    }
}

/// Result type alias for taxonomy menu operations
pub type Result<T> = std::result::Result<T, TaxonomyMenuError>;
