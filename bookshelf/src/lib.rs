//! Main bookshelf crate providing a unified interface to the book catalog.
//!
//! This crate is the primary entry point for users of the bookshelf workspace. It re-exports
//! the core types from the sub-crates, the in-memory backend and the HTTP transport, and
//! hosts the `bookshelf` server binary.
//!
//! # Features
//!
//! - **Validated writes** - Unique titles, bounded years and positive prices
//! - **Composable filtering** - Author, price and year bounds, genre sets
//! - **Title ordering** - Listings sorted case- and accent-insensitively
//! - **HTTP surface** - An axum router over a shared catalog
//!
//! # Quick Start
//!
//! ```ignore
//! use bookshelf::{prelude::*, memory::InMemoryStore};
//!
//! #[tokio::main]
//! async fn main() {
//!     let catalog = Catalog::new(InMemoryStore::builder().build().await.unwrap());
//!
//!     let id = catalog
//!         .create(NewBook {
//!             title: "Dune".to_string(),
//!             author: "Herbert".to_string(),
//!             year: 1965,
//!             price: 20,
//!             genres: vec![Genre::SciFi],
//!         })
//!         .await
//!         .unwrap();
//!
//!     let criteria = BookCriteria {
//!         genres: Some(vec![Genre::SciFi]),
//!         ..Default::default()
//!     };
//!     let books = catalog.list(&criteria).await.unwrap();
//!     assert_eq!(books[0].id, id);
//! }
//! ```

pub mod config;
pub mod prelude;

pub use bookshelf_core::{backend, book, catalog, criteria, error, query, validate};

// Re-export BSON types for convenience
pub use bson;

/// In-memory storage backend implementations.
pub mod memory {
    pub use bookshelf_memory::{InMemoryStore, InMemoryStoreBuilder};
}

/// HTTP transport.
pub mod http {
    pub use bookshelf_http::{ApiError, PriceUpdate, router, serve};
}
