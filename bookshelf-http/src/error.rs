//! Mapping of catalog outcomes onto HTTP responses.

use axum::{
    Json,
    extract::rejection::{JsonRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;
use tracing::error;

use bookshelf_core::error::CatalogError;

/// Error type returned by request handlers.
#[derive(Error, Debug)]
pub enum ApiError {
    /// An outcome reported by the catalog.
    #[error(transparent)]
    Catalog(#[from] CatalogError),
    /// The request body or query string could not be decoded.
    #[error("{0}")]
    BadRequest(String),
}

impl ApiError {
    /// Maps this error to its HTTP status code.
    ///
    /// The mapping is driven by the error kind only, never by its message.
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Catalog(err) => match err {
                CatalogError::DuplicateTitle(_)
                | CatalogError::YearOutOfRange(_)
                | CatalogError::NonPositivePrice(_) => StatusCode::CONFLICT,
                CatalogError::NotFound(_) => StatusCode::NOT_FOUND,
                CatalogError::InvalidGenre(_) => StatusCode::BAD_REQUEST,
                CatalogError::Serialization(_)
                | CatalogError::InvalidDocument(_)
                | CatalogError::Backend(_) => StatusCode::INTERNAL_SERVER_ERROR,
            },
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        if let ApiError::Catalog(err) = &self {
            if !err.is_rejection() {
                error!(error = %err, "request failed");
            }
        }

        (status, Json(json!({ "message": self.to_string() }))).into_response()
    }
}
