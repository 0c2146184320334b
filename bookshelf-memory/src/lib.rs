//! In-memory storage backend for the bookshelf catalog.
//!
//! This crate provides a thread-safe, in-memory implementation of the `StoreBackend` trait.
//! It keeps records as BSON documents behind an async-aware read-write lock and evaluates
//! queries with a visitor over the stored documents.
//!
//! # Features
//!
//! - **Thread-safe access** - Concurrent reads and writes using async-aware RwLock
//! - **Monotonic ids** - Ids start at 1, increase strictly and are never reused
//! - **Full query support** - Filtering and base-collation sorting
//!
//! # Quick Start
//!
//! ```ignore
//! use bookshelf::{catalog::Catalog, memory::InMemoryStore};
//!
//! #[tokio::main]
//! async fn main() {
//!     let backend = InMemoryStore::builder().build().await.unwrap();
//!     let catalog = Catalog::new(backend);
//!
//!     let count = catalog.count(&Default::default()).await.unwrap();
//!     assert_eq!(count, 0);
//! }
//! ```

#[allow(unused_extern_crates)]
extern crate self as bookshelf_memory;

pub mod evaluator;
pub mod store;

pub use store::{InMemoryStore, InMemoryStoreBuilder};
