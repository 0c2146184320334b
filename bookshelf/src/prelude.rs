//! Convenient re-exports of commonly used types from bookshelf.
//!
//! ```ignore
//! use bookshelf::prelude::*;
//! ```

pub use bookshelf_core::{
    backend::{StoreBackend, StoreBackendBuilder},
    book::{Book, BookId, Document, DocumentExt, Genre, NewBook},
    catalog::Catalog,
    criteria::{BookCriteria, CriteriaParams},
    query::{Query, QueryVisitor, Expr, Sort, FieldOp, QueryBuilder, Filter},
    error::{CatalogError, CatalogResult},
};
