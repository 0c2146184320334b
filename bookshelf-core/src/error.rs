//! Error types and result types for catalog operations.
//!
//! The first five variants of [`CatalogError`] are the expected, recoverable outcomes of
//! validating input against the catalog's rules. The remaining variants describe failures of
//! the storage layer itself. Callers dispatch on the variant, never on the message text.

use bson::error::Error as BsonError;
use serde_json::Error as SerdeJsonError;
use thiserror::Error;

/// Represents all possible errors that can occur when interacting with the catalog.
#[derive(Error, Debug)]
pub enum CatalogError {
    /// A live book already carries this title (compared case-insensitively).
    #[error("A book titled '{0}' already exists")]
    DuplicateTitle(String),
    /// The publication year lies outside the accepted range.
    #[error("Year {0} is out of range, expected a year between {min} and {max}", min = crate::validate::MIN_YEAR, max = crate::validate::MAX_YEAR)]
    YearOutOfRange(i64),
    /// The price is zero or negative.
    #[error("Price must be positive, got {0}")]
    NonPositivePrice(i64),
    /// No book with the given id exists.
    #[error("Book {0} not found")]
    NotFound(String),
    /// A genre filter named a tag outside the genre enumeration.
    #[error("Invalid genre: {0}")]
    InvalidGenre(String),
    /// Serialization/deserialization error when converting between record formats (BSON, JSON).
    #[error("Serialization error: {0}")]
    Serialization(String),
    /// A stored value does not have the shape of a record.
    #[error("Invalid document: {0}")]
    InvalidDocument(String),
    /// An error occurred in the underlying storage backend.
    #[error("Backend error: {0}")]
    Backend(String),
}

impl CatalogError {
    /// Returns `true` for the validation outcomes that a caller caused and can correct.
    pub fn is_rejection(&self) -> bool {
        matches!(
            self,
            CatalogError::DuplicateTitle(_)
                | CatalogError::YearOutOfRange(_)
                | CatalogError::NonPositivePrice(_)
                | CatalogError::NotFound(_)
                | CatalogError::InvalidGenre(_)
        )
    }
}

/// A specialized `Result` type for catalog operations.
pub type CatalogResult<T> = Result<T, CatalogError>;

impl From<BsonError> for CatalogError {
    fn from(err: BsonError) -> Self {
        CatalogError::Serialization(err.to_string())
    }
}

impl From<SerdeJsonError> for CatalogError {
    fn from(err: SerdeJsonError) -> Self {
        CatalogError::Serialization(err.to_string())
    }
}
