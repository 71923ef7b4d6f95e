use std::collections::HashMap;

use async_trait::async_trait;

use catalog_common::{CatalogResult, ListQuery, Product};

/// One page of a listing plus the unpaginated match count.
#[derive(Debug, Clone, Default)]
pub struct ProductPage {
    pub products: Vec<Product>,
    pub total: u64,
}

#[async_trait]
pub trait ProductStore: Send + Sync {
    /// Filter, sort and slice. Returned products omit `related_enriched`.
    async fn list(&self, query: &ListQuery) -> CatalogResult<ProductPage>;

    /// Full document by id.
    async fn get(&self, id: &str) -> CatalogResult<Option<Product>>;

    /// Batched lookup keyed by id. Unknown ids are simply absent.
    async fn get_many(&self, ids: &[String]) -> CatalogResult<HashMap<String, Product>>;

    /// Insert a new product. Fails with `Conflict` if the id exists.
    async fn insert(&self, product: &Product) -> CatalogResult<()>;

    /// Insert or replace a batch of documents. Returns how many were written.
    async fn upsert_many(&self, products: &[Product]) -> CatalogResult<u64>;
}
