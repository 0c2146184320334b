//! Book records and their serialization.
//!
//! This module defines the single entity of the catalog, [`Book`], together with its
//! identifier type [`BookId`], the closed [`Genre`] enumeration and the [`NewBook`] payload
//! used to create records. It also provides the [`Document`] trait which converts records to
//! and from the BSON representation used by storage backends.

use std::{fmt, str::FromStr};

use bson::{Bson, de::deserialize_from_bson, ser::serialize_to_bson};
use serde::{Deserialize, Deserializer, Serialize};

use crate::error::{CatalogError, CatalogResult};

/// System-assigned identifier of a book.
///
/// Ids are positive, assigned in strictly increasing order starting at 1 and never reused.
/// A `BookId` can be parsed from text or deserialized from either a JSON number or a JSON
/// string, so callers holding an id in either representation compare by value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct BookId(i64);

impl BookId {
    /// Wraps a raw id value.
    pub const fn new(value: i64) -> Self {
        Self(value)
    }

    /// Returns the raw id value.
    pub const fn get(self) -> i64 {
        self.0
    }
}

impl From<i64> for BookId {
    fn from(value: i64) -> Self {
        Self(value)
    }
}

impl From<BookId> for Bson {
    fn from(id: BookId) -> Self {
        Bson::Int64(id.0)
    }
}

impl fmt::Display for BookId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for BookId {
    type Err = CatalogError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim()
            .parse::<i64>()
            .map(BookId)
            .map_err(|_| CatalogError::NotFound(s.to_string()))
    }
}

impl<'de> Deserialize<'de> for BookId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Repr {
            Number(i64),
            Text(String),
        }

        match Repr::deserialize(deserializer)? {
            Repr::Number(value) => Ok(BookId(value)),
            Repr::Text(text) => text
                .parse()
                .map_err(|_| serde::de::Error::custom(format!("invalid book id '{text}'"))),
        }
    }
}

/// The fixed set of genre tags a book may carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Genre {
    SciFi,
    Novel,
    History,
    Manga,
    Romance,
    Professional,
}

impl Genre {
    /// Every genre, in declaration order.
    pub const ALL: [Genre; 6] = [
        Genre::SciFi,
        Genre::Novel,
        Genre::History,
        Genre::Manga,
        Genre::Romance,
        Genre::Professional,
    ];

    /// Returns the wire tag of this genre.
    pub const fn as_str(self) -> &'static str {
        match self {
            Genre::SciFi => "SCI_FI",
            Genre::Novel => "NOVEL",
            Genre::History => "HISTORY",
            Genre::Manga => "MANGA",
            Genre::Romance => "ROMANCE",
            Genre::Professional => "PROFESSIONAL",
        }
    }
}

impl fmt::Display for Genre {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Genre {
    type Err = CatalogError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Genre::ALL
            .into_iter()
            .find(|genre| genre.as_str() == s)
            .ok_or_else(|| CatalogError::InvalidGenre(s.to_string()))
    }
}

impl From<Genre> for Bson {
    fn from(genre: Genre) -> Self {
        Bson::String(genre.as_str().to_string())
    }
}

/// A book record as stored in and returned by the catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Book {
    pub id: BookId,
    pub title: String,
    pub author: String,
    pub year: i64,
    pub price: i64,
    #[serde(default)]
    pub genres: Vec<Genre>,
}

/// The caller-supplied fields of a book that is about to be created.
///
/// A blank `title` is rejected while deserializing, so every `NewBook` carries a
/// non-empty title.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewBook {
    #[serde(deserialize_with = "non_blank")]
    pub title: String,
    pub author: String,
    pub year: i64,
    pub price: i64,
    #[serde(default)]
    pub genres: Vec<Genre>,
}

impl NewBook {
    /// Converts this payload to the BSON document handed to a backend for insertion.
    pub fn to_bson(&self) -> CatalogResult<Bson> {
        Ok(serialize_to_bson(self)?)
    }
}

fn non_blank<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    let value = String::deserialize(deserializer)?;

    if value.trim().is_empty() {
        return Err(serde::de::Error::custom("title must not be empty"));
    }

    Ok(value)
}

/// Core trait for records kept by a storage backend.
///
/// Backends store records as BSON documents; this trait names the record's identifier so
/// that typed layers can address the stored document.
pub trait Document: Serialize + for<'de> Deserialize<'de> + Send + Sync + Clone + 'static {
    /// Returns this record's identifier.
    fn id(&self) -> BookId;
}

impl Document for Book {
    fn id(&self) -> BookId {
        self.id
    }
}

/// Extension trait providing BSON conversion for documents.
///
/// This trait is automatically implemented for all types that implement [`Document`].
pub trait DocumentExt: Document {
    /// Converts this document to a BSON value for storage.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    fn to_bson(&self) -> CatalogResult<Bson>;

    /// Creates a document from a BSON value.
    ///
    /// # Errors
    ///
    /// Returns an error if deserialization fails or the structure is invalid.
    fn from_bson(bson: Bson) -> CatalogResult<Self>;
}

impl<D: Document> DocumentExt for D {
    fn to_bson(&self) -> CatalogResult<Bson> {
        Ok(serialize_to_bson(self)?)
    }

    fn from_bson(bson: Bson) -> CatalogResult<Self> {
        Ok(deserialize_from_bson(bson)?)
    }
}
