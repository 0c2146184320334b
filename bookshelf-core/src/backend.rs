//! Storage backend abstraction for the catalog.
//!
//! The [`StoreBackend`] trait is the record store: it owns the stored records and the id
//! sequence, and offers primitive access without any business validation. Validation lives
//! in [`crate::validate`] and is composed with a backend by [`crate::catalog::Catalog`].
//!
//! # Examples
//!
//! ```ignore
//! use bookshelf::backend::StoreBackend;
//! use bson::{Bson, doc};
//!
//! let backend = MyBackendImpl::new();
//! let id = backend
//!     .insert_document(Bson::Document(doc! { "title": "Dune", "price": 20_i64 }))
//!     .await?;
//! assert!(backend.get_document(id).await?.is_some());
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

use async_trait::async_trait;
use bson::Bson;
use std::fmt::Debug;

use crate::{
    book::BookId,
    error::CatalogResult,
    query::{Expr, Query},
};

/// Abstract interface for record storage backends.
///
/// # Thread Safety
///
/// Every method must observe and apply changes atomically: a reader never sees a partially
/// applied write. Sequences of calls are not atomic; callers that need check-then-write
/// semantics serialize their writes themselves.
///
/// # Identifiers
///
/// Ids are assigned by [`insert_document`](StoreBackend::insert_document) in strictly
/// increasing order starting at 1 and are never reassigned, even after deletion.
#[async_trait]
pub trait StoreBackend: Send + Sync + Debug {
    /// Stores a new record and returns the id assigned to it.
    ///
    /// The assigned id is written into the document's `id` field.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::InvalidDocument`](crate::error::CatalogError::InvalidDocument)
    /// if `document` is not a BSON document.
    async fn insert_document(&self, document: Bson) -> CatalogResult<BookId>;

    /// Retrieves the record with the given id, if present.
    async fn get_document(&self, id: BookId) -> CatalogResult<Option<Bson>>;

    /// Returns a snapshot of every stored record, in id order.
    ///
    /// The returned documents are copies; later writes do not affect them.
    async fn all_documents(&self) -> CatalogResult<Vec<Bson>>;

    /// Returns the records matching `query.filter`, ordered by `query.sort` when present and
    /// by id otherwise.
    async fn query_documents(&self, query: Query) -> CatalogResult<Vec<Bson>>;

    /// Counts the records matching `filter` without sorting them.
    async fn count_documents(&self, filter: Option<Expr>) -> CatalogResult<usize>;

    /// Replaces the record with the given id.
    ///
    /// Returns `false` if no such record exists, in which case nothing is written.
    /// Fails with [`CatalogError::InvalidDocument`](crate::error::CatalogError::InvalidDocument) if `document` is not a document or
    /// carries an `id` other than `id`.
    async fn update_document(&self, id: BookId, document: Bson) -> CatalogResult<bool>;

    /// Removes the record with the given id.
    ///
    /// Returns whether a record was removed. The id is retired either way.
    async fn delete_document(&self, id: BookId) -> CatalogResult<bool>;

    /// Returns the number of stored records.
    async fn len(&self) -> CatalogResult<usize>;
}

/// Factory trait for constructing store backend instances.
#[async_trait]
pub trait StoreBackendBuilder: Send + Sync {
    /// The type of backend this builder constructs.
    type Backend: StoreBackend;

    /// Builds and returns a new store backend instance.
    async fn build(self) -> CatalogResult<Self::Backend>;
}
