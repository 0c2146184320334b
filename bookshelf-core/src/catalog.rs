//! Main catalog interface for working with books.
//!
//! [`Catalog`] composes a [`StoreBackend`] with the rules in [`crate::validate`] and the
//! criteria in [`crate::criteria`]. It is the object request handlers are given: construct
//! one per process (or one per test) and share it behind an `Arc`.
//!
//! # Example
//!
//! ```ignore
//! use bookshelf::{catalog::Catalog, memory::InMemoryStore};
//!
//! let catalog = Catalog::new(InMemoryStore::new());
//! let id = catalog.create(new_book).await?;
//! let previous = catalog.update_price(id, 25).await?;
//! ```

use std::fmt;

use mea::mutex::Mutex;
use tracing::{debug, info};

use crate::{
    backend::StoreBackend,
    book::{Book, BookId, Document, DocumentExt, NewBook},
    criteria::BookCriteria,
    error::{CatalogError, CatalogResult},
    query::Query,
    validate,
};

/// The book catalog bound to a specific backend implementation.
///
/// Writes (create, price update, delete) are serialized behind an async mutex so that the
/// validation a write depends on and the write itself are applied as one step. Reads go
/// straight to the backend, which returns consistent snapshots.
pub struct Catalog<B: StoreBackend> {
    backend: B,
    writes: Mutex<()>,
}

impl<B: StoreBackend> fmt::Debug for Catalog<B> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Catalog")
            .field("backend", &self.backend)
            .finish_non_exhaustive()
    }
}

impl<B: StoreBackend> Catalog<B> {
    /// Creates a new catalog over the given backend.
    pub fn new(backend: B) -> Self {
        Self {
            backend,
            writes: Mutex::new(()),
        }
    }

    /// Returns the underlying backend.
    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Validates and stores a new book, returning its assigned id.
    ///
    /// # Errors
    ///
    /// [`CatalogError::DuplicateTitle`], [`CatalogError::YearOutOfRange`] or
    /// [`CatalogError::NonPositivePrice`], checked in that order.
    pub async fn create(&self, book: NewBook) -> CatalogResult<BookId> {
        let _guard = self.writes.lock().await;

        let existing = self.snapshot().await?;
        validate::validate_create(&book, &existing).inspect_err(|err| {
            debug!(title = %book.title, error = %err, "rejected new book");
        })?;

        let id = self.backend.insert_document(book.to_bson()?).await?;
        info!(%id, title = %book.title, "created book");

        Ok(id)
    }

    /// Looks up a book by id.
    ///
    /// # Errors
    ///
    /// [`CatalogError::NotFound`] if no book has this id.
    pub async fn get(&self, id: BookId) -> CatalogResult<Book> {
        self.find(id)
            .await?
            .ok_or_else(|| CatalogError::NotFound(id.to_string()))
    }

    /// Replaces the price of a book and returns the price it held before.
    ///
    /// # Errors
    ///
    /// [`CatalogError::NotFound`] if no book has this id, otherwise
    /// [`CatalogError::NonPositivePrice`] if `price` is not positive.
    pub async fn update_price(&self, id: BookId, price: i64) -> CatalogResult<i64> {
        let _guard = self.writes.lock().await;

        let current = self.find(id).await?;
        let previous = validate::validate_price_update(id, current.as_ref(), price)
            .inspect_err(|err| debug!(%id, price, error = %err, "rejected price update"))?;

        let mut book = current.ok_or_else(|| CatalogError::NotFound(id.to_string()))?;
        book.price = price;

        if !self.backend.update_document(book.id(), book.to_bson()?).await? {
            return Err(CatalogError::NotFound(id.to_string()));
        }
        info!(%id, previous, price, "updated book price");

        Ok(previous)
    }

    /// Deletes a book and returns how many books remain.
    ///
    /// The deleted id is never assigned again.
    ///
    /// # Errors
    ///
    /// [`CatalogError::NotFound`] if no book has this id.
    pub async fn delete(&self, id: BookId) -> CatalogResult<usize> {
        let _guard = self.writes.lock().await;

        if !self.backend.delete_document(id).await? {
            debug!(%id, "delete of unknown book");
            return Err(CatalogError::NotFound(id.to_string()));
        }

        let remaining = self.backend.len().await?;
        info!(%id, remaining, "deleted book");

        Ok(remaining)
    }

    /// Returns the books matching `criteria`, sorted by title (case- and accent-insensitive).
    pub async fn list(&self, criteria: &BookCriteria) -> CatalogResult<Vec<Book>> {
        let query = Query::builder()
            .maybe_filter(criteria.to_expr())
            .sort("title")
            .build();

        self.backend
            .query_documents(query)
            .await?
            .into_iter()
            .map(Book::from_bson)
            .collect()
    }

    /// Returns how many books match `criteria`.
    pub async fn count(&self, criteria: &BookCriteria) -> CatalogResult<usize> {
        self.backend.count_documents(criteria.to_expr()).await
    }

    async fn find(&self, id: BookId) -> CatalogResult<Option<Book>> {
        self.backend
            .get_document(id)
            .await?
            .map(Book::from_bson)
            .transpose()
    }

    async fn snapshot(&self) -> CatalogResult<Vec<Book>> {
        self.backend
            .all_documents()
            .await?
            .into_iter()
            .map(Book::from_bson)
            .collect()
    }
}
