use crate::domain::model::{BookId, EntityKind, PatronId};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum LibraryError {
    #[error("{kind} not found with id: {id}")]
    NotFound { kind: EntityKind, id: u64 },

    #[error("Book ISBN already exists: {isbn}")]
    DuplicateIsbn { isbn: String },

    #[error("Book with id {book_id} is already borrowed")]
    AlreadyBorrowed { book_id: BookId },

    #[error("Borrowing record not found for bookId: {book_id} and patronId: {patron_id}")]
    BorrowingRecordNotFound { book_id: BookId, patron_id: PatronId },

    #[error("Validation error on {field}: {message}")]
    ValidationError { field: String, message: String },

    #[error("Invalid API key")]
    Unauthorized,

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Invalid value for {field} ({value}): {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Entity store error: {message}")]
    StoreError { message: String },

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Client,
    Conflict,
    Auth,
    Configuration,
    Internal,
}

impl LibraryError {
    pub fn book_not_found(id: BookId) -> Self {
        Self::NotFound {
            kind: EntityKind::Book,
            id: id.value(),
        }
    }

    pub fn patron_not_found(id: PatronId) -> Self {
        Self::NotFound {
            kind: EntityKind::Patron,
            id: id.value(),
        }
    }

    pub fn validation(field: &str, message: impl Into<String>) -> Self {
        Self::ValidationError {
            field: field.to_string(),
            message: message.into(),
        }
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            LibraryError::NotFound { .. }
            | LibraryError::BorrowingRecordNotFound { .. }
            | LibraryError::ValidationError { .. } => ErrorCategory::Client,
            LibraryError::DuplicateIsbn { .. } | LibraryError::AlreadyBorrowed { .. } => {
                ErrorCategory::Conflict
            }
            LibraryError::Unauthorized => ErrorCategory::Auth,
            LibraryError::ConfigError { .. } | LibraryError::InvalidConfigValueError { .. } => {
                ErrorCategory::Configuration
            }
            LibraryError::StoreError { .. }
            | LibraryError::IoError(_)
            | LibraryError::SerializationError(_) => ErrorCategory::Internal,
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            LibraryError::NotFound { .. } | LibraryError::BorrowingRecordNotFound { .. }
        )
    }
}

pub type Result<T> = std::result::Result<T, LibraryError>;
