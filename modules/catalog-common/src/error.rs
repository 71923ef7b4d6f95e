//! Typed errors shared by the store and the HTTP layer.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum CatalogError {
    /// No product with this id
    #[error("product not found: {0}")]
    NotFound(String),

    /// Search pattern was rejected by the regular expression engine
    #[error("invalid search pattern: {0}")]
    InvalidPattern(String),

    /// Document failed validation
    #[error("validation error: {0}")]
    Validation(String),

    /// A product with this id already exists
    #[error("product already exists: {0}")]
    Conflict(String),

    /// Backing store failure
    #[error("store error: {0}")]
    Store(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl CatalogError {
    pub fn store(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Store(Box::new(err))
    }
}

pub type CatalogResult<T> = std::result::Result<T, CatalogError>;
