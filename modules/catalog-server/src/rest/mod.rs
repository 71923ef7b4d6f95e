pub mod products;
pub mod related;
pub mod search;

use catalog_common::{CatalogError, CatalogResult, Product};
use catalog_store::ProductStore;

/// Full document or `NotFound`.
pub(crate) async fn load_product(store: &dyn ProductStore, id: &str) -> CatalogResult<Product> {
    store
        .get(id)
        .await?
        .ok_or_else(|| CatalogError::NotFound(id.to_string()))
}
