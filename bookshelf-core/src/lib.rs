//! Core of the bookshelf catalog: book records, validation rules and the query model.
//!
//! This crate provides:
//!
//! - **Book records** ([`book`]) - The `Book` entity, its id, the genre enumeration and BSON conversion
//! - **Store backend abstraction** ([`backend`]) - The record store contract implemented by backends
//! - **Query and filtering API** ([`query`]) - Filter expressions, sorting and the evaluation visitor
//! - **Filter criteria** ([`criteria`]) - Text parameters parsed into typed, optional criteria
//! - **Validation** ([`validate`]) - Creation and price-update rules
//! - **Catalog** ([`catalog`]) - The service composing a backend with validation and criteria
//! - **Error handling** ([`error`]) - The error taxonomy and result type
//!
//! # Example
//!
//! ```ignore
//! use bookshelf_core::{catalog::Catalog, book::{NewBook, Genre}};
//!
//! let catalog = Catalog::new(backend);
//! let id = catalog
//!     .create(NewBook {
//!         title: "Dune".to_string(),
//!         author: "Herbert".to_string(),
//!         year: 1965,
//!         price: 20,
//!         genres: vec![Genre::SciFi],
//!     })
//!     .await?;
//! ```

#[allow(unused_extern_crates)]
extern crate self as bookshelf_core;

pub mod backend;
pub mod book;
pub mod catalog;
pub mod criteria;
pub mod error;
pub mod query;
pub mod validate;
