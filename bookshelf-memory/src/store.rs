//! In-memory storage implementation for the catalog.
//!
//! This module provides a simple in-memory backend that keeps records as BSON documents in
//! an ordered map keyed by id, together with the id sequence, behind one async-safe
//! read-write lock.

use std::{collections::BTreeMap, sync::Arc};
use async_trait::async_trait;
use mea::rwlock::RwLock;
use bson::Bson;

use bookshelf_core::{
    book::BookId,
    query::{Expr, Query},
    error::{CatalogError, CatalogResult},
    backend::{StoreBackend, StoreBackendBuilder},
};

use crate::evaluator::{DocumentEvaluator, SortKey};

/// Records and the id sequence, guarded together so an insert is observed whole.
#[derive(Debug, Default)]
struct StoreState {
    /// The last id handed out; 0 before the first insert.
    last_id: i64,
    documents: BTreeMap<i64, Bson>,
}

/// Thread-safe in-memory record storage backend.
///
/// # Thread Safety
///
/// `InMemoryStore` is cloneable and uses an `Arc`-wrapped internal state, allowing
/// it to be safely shared across async tasks. Multiple clones of the same instance
/// share the same underlying data.
///
/// # Performance
///
/// Queries scan every record (no indexing); lookups by id are logarithmic.
///
/// # Example
///
/// ```ignore
/// use bookshelf_memory::InMemoryStore;
/// use bookshelf::backend::StoreBackend;
/// use bson::{Bson, doc};
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let store = InMemoryStore::new();
///
///     let id = store.insert_document(Bson::Document(doc! { "title": "Dune" })).await?;
///     assert_eq!(id.get(), 1);
///     assert!(store.get_document(id).await?.is_some());
///
///     Ok(())
/// }
/// ```
#[derive(Default, Clone, Debug)]
pub struct InMemoryStore {
    state: Arc<RwLock<StoreState>>,
}

impl InMemoryStore {
    /// Creates a new empty in-memory store whose first id will be 1.
    pub fn new() -> Self {
        Self {
            state: Arc::new(RwLock::new(StoreState::default())),
        }
    }

    /// Creates a builder for constructing an `InMemoryStore`.
    pub fn builder() -> InMemoryStoreBuilder {
        InMemoryStoreBuilder::default()
    }
}

#[async_trait]
impl StoreBackend for InMemoryStore {
    async fn insert_document(&self, document: Bson) -> CatalogResult<BookId> {
        let mut document = expect_document(document)?;

        let mut state = self.state.write().await;
        let id = state.last_id + 1;

        document.insert("id", Bson::Int64(id));
        state.documents.insert(id, Bson::Document(document));
        state.last_id = id;

        Ok(BookId::new(id))
    }

    async fn get_document(&self, id: BookId) -> CatalogResult<Option<Bson>> {
        Ok(
            self.state
                .read()
                .await
                .documents
                .get(&id.get())
                .cloned()
        )
    }

    async fn all_documents(&self) -> CatalogResult<Vec<Bson>> {
        Ok(
            self.state
                .read()
                .await
                .documents
                .values()
                .cloned()
                .collect()
        )
    }

    async fn query_documents(&self, query: Query) -> CatalogResult<Vec<Bson>> {
        let state = self.state.read().await;

        // Apply filter expressions if present
        let mut documents = match &query.filter {
            Some(filter) => DocumentEvaluator::filter_documents(
                state.documents.values(),
                filter,
            )?,
            None => state
                .documents
                .values()
                .cloned()
                .collect::<Vec<_>>(),
        };

        // Stable sort keeps id order among equal keys
        if let Some(sort) = &query.sort {
            documents.sort_by_cached_key(|document| SortKey::of(document, &sort.field));
        }

        Ok(documents)
    }

    async fn count_documents(&self, filter: Option<Expr>) -> CatalogResult<usize> {
        let state = self.state.read().await;

        match &filter {
            Some(filter) => Ok(
                DocumentEvaluator::filter_documents(state.documents.values(), filter)?.len()
            ),
            None => Ok(state.documents.len()),
        }
    }

    async fn update_document(&self, id: BookId, document: Bson) -> CatalogResult<bool> {
        let mut document = expect_document(document)?;

        // The stored id always matches the key it is filed under
        match document.get("id") {
            None => {
                document.insert("id", Bson::Int64(id.get()));
            }
            Some(Bson::Int64(stored)) if *stored == id.get() => {}
            Some(Bson::Int32(stored)) if i64::from(*stored) == id.get() => {}
            Some(other) => {
                return Err(CatalogError::InvalidDocument(format!(
                    "document id {other} does not match record {id}"
                )));
            }
        }

        let mut state = self.state.write().await;

        match state.documents.get_mut(&id.get()) {
            Some(existing) => {
                *existing = Bson::Document(document);
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn delete_document(&self, id: BookId) -> CatalogResult<bool> {
        Ok(
            self.state
                .write()
                .await
                .documents
                .remove(&id.get())
                .is_some()
        )
    }

    async fn len(&self) -> CatalogResult<usize> {
        Ok(self.state.read().await.documents.len())
    }
}

fn expect_document(document: Bson) -> CatalogResult<bson::Document> {
    match document {
        Bson::Document(document) => Ok(document),
        other => Err(CatalogError::InvalidDocument(format!(
            "expected a document, found {:?}",
            other.element_type()
        ))),
    }
}

/// Builder for constructing [`InMemoryStore`] instances.
///
/// # Example
///
/// ```ignore
/// use bookshelf_memory::InMemoryStore;
/// use bookshelf::backend::StoreBackendBuilder;
///
/// #[tokio::main]
/// async fn main() {
///     let store = InMemoryStore::builder().build().await.unwrap();
/// }
/// ```
#[derive(Default)]
pub struct InMemoryStoreBuilder;

#[async_trait]
impl StoreBackendBuilder for InMemoryStoreBuilder {
    type Backend = InMemoryStore;

    /// Builds and returns a new, empty [`InMemoryStore`].
    async fn build(self) -> CatalogResult<Self::Backend> {
        Ok(InMemoryStore::new())
    }
}

#[cfg(test)]
mod tests {
    use bson::doc;
    use bookshelf_core::query::Filter;

    use super::*;

    fn titled(title: &str) -> Bson {
        Bson::Document(doc! { "title": title, "price": 10_i64 })
    }

    fn title_of(document: &Bson) -> &str {
        document
            .as_document()
            .and_then(|doc| doc.get_str("title").ok())
            .unwrap()
    }

    #[tokio::test]
    async fn ids_start_at_one_and_increase() {
        let store = InMemoryStore::new();

        let first = store.insert_document(titled("A")).await.unwrap();
        let second = store.insert_document(titled("B")).await.unwrap();

        assert_eq!(first, BookId::new(1));
        assert_eq!(second, BookId::new(2));

        let stored = store.get_document(second).await.unwrap().unwrap();
        assert_eq!(stored.as_document().unwrap().get_i64("id").unwrap(), 2);
    }

    #[tokio::test]
    async fn deleted_ids_are_not_reused() {
        let store = InMemoryStore::new();

        let first = store.insert_document(titled("A")).await.unwrap();
        assert!(store.delete_document(first).await.unwrap());
        assert!(!store.delete_document(first).await.unwrap());

        let next = store.insert_document(titled("B")).await.unwrap();
        assert_eq!(next, BookId::new(2));
        assert_eq!(store.len().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn rejects_non_document_values() {
        let store = InMemoryStore::new();
        let result = store.insert_document(Bson::Int64(5)).await;

        assert!(matches!(result, Err(CatalogError::InvalidDocument(_))));
        assert_eq!(store.len().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn snapshots_are_detached_from_later_writes() {
        let store = InMemoryStore::new();
        let id = store.insert_document(titled("A")).await.unwrap();

        let snapshot = store.all_documents().await.unwrap();
        store.update_document(id, titled("Z")).await.unwrap();
        store.insert_document(titled("B")).await.unwrap();

        assert_eq!(snapshot.len(), 1);
        assert_eq!(title_of(&snapshot[0]), "A");
    }

    #[tokio::test]
    async fn update_rejects_values_that_are_not_records() {
        let store = InMemoryStore::new();
        let id = store.insert_document(titled("A")).await.unwrap();

        let scalar = store.update_document(id, Bson::Int64(7)).await;
        let moved = store
            .update_document(id, Bson::Document(doc! { "id": 9_i64, "title": "B" }))
            .await;

        assert!(matches!(scalar, Err(CatalogError::InvalidDocument(_))));
        assert!(matches!(moved, Err(CatalogError::InvalidDocument(_))));

        let stored = store.get_document(id).await.unwrap().unwrap();
        assert_eq!(title_of(&stored), "A");
        assert_eq!(stored.as_document().unwrap().get_i64("id").unwrap(), 1);
    }

    #[tokio::test]
    async fn update_keeps_the_record_id() {
        let store = InMemoryStore::new();
        let id = store.insert_document(titled("A")).await.unwrap();

        assert!(store.update_document(id, titled("B")).await.unwrap());

        let stored = store.get_document(id).await.unwrap().unwrap();
        assert_eq!(title_of(&stored), "B");
        assert_eq!(stored.as_document().unwrap().get_i64("id").unwrap(), 1);
    }

    #[tokio::test]
    async fn update_of_missing_record_writes_nothing() {
        let store = InMemoryStore::new();

        assert!(!store.update_document(BookId::new(3), titled("A")).await.unwrap());
        assert_eq!(store.len().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn query_sorts_by_base_collation() {
        let store = InMemoryStore::builder().build().await.unwrap();
        for title in ["banana", "Érable", "apple", "Cherry"] {
            store.insert_document(titled(title)).await.unwrap();
        }

        let sorted = store
            .query_documents(Query::builder().sort("title").build())
            .await
            .unwrap();
        let titles = sorted.iter().map(title_of).collect::<Vec<_>>();

        assert_eq!(titles, vec!["apple", "banana", "Cherry", "Érable"]);
    }

    #[tokio::test]
    async fn query_sorts_large_integers_exactly() {
        let store = InMemoryStore::new();
        for (title, price) in [("high", 9_007_199_254_740_993_i64), ("low", 9_007_199_254_740_992_i64)] {
            store.insert_document(Bson::Document(doc! { "title": title, "price": price })).await.unwrap();
        }

        let sorted = store
            .query_documents(Query::builder().sort("price").build())
            .await
            .unwrap();
        let titles = sorted.iter().map(title_of).collect::<Vec<_>>();

        assert_eq!(titles, vec!["low", "high"]);
    }

    #[tokio::test]
    async fn unsorted_query_keeps_id_order() {
        let store = InMemoryStore::new();
        for title in ["b", "a", "c"] {
            store.insert_document(titled(title)).await.unwrap();
        }

        let all = store.query_documents(Query::new()).await.unwrap();
        let titles = all.iter().map(title_of).collect::<Vec<_>>();

        assert_eq!(titles, vec!["b", "a", "c"]);
    }

    #[tokio::test]
    async fn count_applies_the_filter() {
        let store = InMemoryStore::new();
        store.insert_document(Bson::Document(doc! { "title": "A", "price": 5_i64 })).await.unwrap();
        store.insert_document(Bson::Document(doc! { "title": "B", "price": 15_i64 })).await.unwrap();

        assert_eq!(store.count_documents(None).await.unwrap(), 2);
        assert_eq!(store.count_documents(Some(Filter::gte("price", 10_i64))).await.unwrap(), 1);
    }
}
