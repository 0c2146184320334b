//! Business rules checked before a record is created or its price replaced.
//!
//! Checks run in a fixed order and the first failure is returned, so the same input always
//! produces the same error.

use crate::{
    book::{Book, BookId, NewBook},
    error::{CatalogError, CatalogResult},
};

/// Earliest accepted publication year (inclusive).
pub const MIN_YEAR: i64 = 1940;
/// Latest accepted publication year (inclusive).
pub const MAX_YEAR: i64 = 2100;

/// Validates a creation request against the live records.
///
/// Order: duplicate title, then year range, then price.
pub fn validate_create(book: &NewBook, existing: &[Book]) -> CatalogResult<()> {
    let title = book.title.to_lowercase();

    if existing.iter().any(|other| other.title.to_lowercase() == title) {
        return Err(CatalogError::DuplicateTitle(book.title.clone()));
    }

    if !(MIN_YEAR..=MAX_YEAR).contains(&book.year) {
        return Err(CatalogError::YearOutOfRange(book.year));
    }

    validate_price(book.price)
}

/// Validates a price replacement for the record `id`, given its current state.
///
/// Returns the price the record holds before the replacement.
pub fn validate_price_update(id: BookId, current: Option<&Book>, price: i64) -> CatalogResult<i64> {
    let book = current.ok_or_else(|| CatalogError::NotFound(id.to_string()))?;
    validate_price(price)?;

    Ok(book.price)
}

fn validate_price(price: i64) -> CatalogResult<()> {
    if price <= 0 {
        return Err(CatalogError::NonPositivePrice(price));
    }

    Ok(())
}
