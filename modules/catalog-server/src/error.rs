//! HTTP mapping for catalog errors.
//!
//! Product routes answer `{"message": ...}`; the search routes answer
//! `{"error": ...}` with their own generic failure text.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use thiserror::Error;
use tracing::warn;

use catalog_common::CatalogError;

/// Which surface failed; picks the body key and the generic 500 text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Surface {
    Product,
    Search,
    Suggestion,
}

impl Surface {
    fn body_key(self) -> &'static str {
        match self {
            Surface::Product => "message",
            Surface::Search | Surface::Suggestion => "error",
        }
    }

    fn failure_text(self) -> &'static str {
        match self {
            Surface::Product => "Internal server error",
            Surface::Search => "Search failed",
            Surface::Suggestion => "Suggestion failed",
        }
    }
}

#[derive(Debug, Error)]
#[error("{source}")]
pub struct ApiError {
    #[source]
    source: CatalogError,
    surface: Surface,
}

impl ApiError {
    pub fn new(source: CatalogError, surface: Surface) -> Self {
        Self { source, surface }
    }

    pub fn status(&self) -> StatusCode {
        match &self.source {
            CatalogError::NotFound(_) => StatusCode::NOT_FOUND,
            CatalogError::InvalidPattern(_) | CatalogError::Validation(_) => StatusCode::BAD_REQUEST,
            CatalogError::Conflict(_) => StatusCode::CONFLICT,
            CatalogError::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn client_message(&self) -> String {
        match &self.source {
            CatalogError::NotFound(_) => "Product not found".to_string(),
            CatalogError::InvalidPattern(_) => "Invalid search pattern".to_string(),
            CatalogError::Validation(msg) => msg.clone(),
            CatalogError::Conflict(_) => "Product already exists".to_string(),
            CatalogError::Store(_) => self.surface.failure_text().to_string(),
        }
    }
}

impl From<CatalogError> for ApiError {
    fn from(source: CatalogError) -> Self {
        Self::new(source, Surface::Product)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            warn!(error = %self.source, surface = ?self.surface, "Request failed");
        }
        let mut body = serde_json::Map::new();
        body.insert(
            self.surface.body_key().to_string(),
            serde_json::Value::String(self.client_message()),
        );
        (status, Json(serde_json::Value::Object(body))).into_response()
    }
}

/// Tag a store result with the surface it was produced for.
pub trait SurfaceExt<T> {
    fn on(self, surface: Surface) -> Result<T, ApiError>;
}

impl<T> SurfaceExt<T> for Result<T, CatalogError> {
    fn on(self, surface: Surface) -> Result<T, ApiError> {
        self.map_err(|e| ApiError::new(e, surface))
    }
}
