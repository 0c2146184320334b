//! HTTP transport for the bookshelf catalog.
//!
//! Uses axum for routing. Handlers receive a shared [`Catalog`] through router state.
//!
//! ## Routes
//!
//! - `GET /health` — returns `OK`.
//! - `POST /books` — create a book from a JSON body; returns its id.
//! - `GET /books` — books matching the query-string criteria, sorted by title.
//! - `GET /books/count` — number of books matching the query-string criteria.
//! - `GET /books/:id` — a single book.
//! - `PUT /books/:id/price` — replace the price (`{"price": 25}`); returns the previous price.
//! - `DELETE /books/:id` — delete a book; returns how many books remain.
//!
//! Failures are returned as `{"message": "..."}` with a status derived from the error kind.
//!
//! ## Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use bookshelf::{catalog::Catalog, memory::InMemoryStore};
//!
//! let catalog = Arc::new(Catalog::new(InMemoryStore::new()));
//!
//! // Get the router to compose with other axum routes
//! let app = bookshelf_http::router(catalog.clone());
//!
//! // Or serve directly until ctrl-c
//! bookshelf_http::serve(catalog, "127.0.0.1:3000", async {
//!     let _ = tokio::signal::ctrl_c().await;
//! })
//! .await?;
//! ```

mod error;

use std::{future::Future, sync::Arc};

use axum::{
    Json, Router,
    extract::{Path, Query, State, rejection::{JsonRejection, QueryRejection}},
    routing::{get, put},
};
use serde::Deserialize;
use tracing::info;

use bookshelf_core::{
    backend::StoreBackend,
    book::{Book, BookId, NewBook},
    catalog::Catalog,
    criteria::{BookCriteria, CriteriaParams},
};

pub use error::ApiError;

type ApiResult<T> = Result<Json<T>, ApiError>;

/// Body of a price update request.
#[derive(Debug, Clone, Deserialize)]
pub struct PriceUpdate {
    pub price: i64,
}

/// Build an axum `Router` serving the given catalog.
pub fn router<B: StoreBackend + 'static>(catalog: Arc<Catalog<B>>) -> Router {
    Router::new()
        .route("/health", get(health_handler))
        .route("/books", get(list_handler).post(create_handler))
        .route("/books/count", get(count_handler))
        .route("/books/:id", get(get_handler).delete(delete_handler))
        .route("/books/:id/price", put(update_price_handler))
        .with_state(catalog)
}

/// Serve the catalog over HTTP at the given address (e.g. `"0.0.0.0:3000"`) until
/// `shutdown` completes.
pub async fn serve<B, F>(
    catalog: Arc<Catalog<B>>,
    addr: &str,
    shutdown: F,
) -> Result<(), std::io::Error>
where
    B: StoreBackend + 'static,
    F: Future<Output = ()> + Send + 'static,
{
    let app = router(catalog);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(addr = %listener.local_addr()?, "bookshelf listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown)
        .await
}

/// `GET /health`
async fn health_handler() -> &'static str {
    "OK"
}

/// `POST /books`
async fn create_handler<B: StoreBackend + 'static>(
    State(catalog): State<Arc<Catalog<B>>>,
    body: Result<Json<NewBook>, JsonRejection>,
) -> ApiResult<BookId> {
    let Json(book) = body?;
    Ok(Json(catalog.create(book).await?))
}

/// `GET /books`
async fn list_handler<B: StoreBackend + 'static>(
    State(catalog): State<Arc<Catalog<B>>>,
    params: Result<Query<CriteriaParams>, QueryRejection>,
) -> ApiResult<Vec<Book>> {
    let Query(params) = params?;
    let criteria = BookCriteria::try_from(params)?;
    Ok(Json(catalog.list(&criteria).await?))
}

/// `GET /books/count`
async fn count_handler<B: StoreBackend + 'static>(
    State(catalog): State<Arc<Catalog<B>>>,
    params: Result<Query<CriteriaParams>, QueryRejection>,
) -> ApiResult<usize> {
    let Query(params) = params?;
    let criteria = BookCriteria::try_from(params)?;
    Ok(Json(catalog.count(&criteria).await?))
}

/// `GET /books/:id`
async fn get_handler<B: StoreBackend + 'static>(
    State(catalog): State<Arc<Catalog<B>>>,
    Path(id): Path<String>,
) -> ApiResult<Book> {
    let id = id.parse::<BookId>()?;
    Ok(Json(catalog.get(id).await?))
}

/// `PUT /books/:id/price`
async fn update_price_handler<B: StoreBackend + 'static>(
    State(catalog): State<Arc<Catalog<B>>>,
    Path(id): Path<String>,
    body: Result<Json<PriceUpdate>, JsonRejection>,
) -> ApiResult<i64> {
    let id = id.parse::<BookId>()?;
    let Json(update) = body?;
    Ok(Json(catalog.update_price(id, update.price).await?))
}

/// `DELETE /books/:id`
async fn delete_handler<B: StoreBackend + 'static>(
    State(catalog): State<Arc<Catalog<B>>>,
    Path(id): Path<String>,
) -> ApiResult<usize> {
    let id = id.parse::<BookId>()?;
    Ok(Json(catalog.delete(id).await?))
}
