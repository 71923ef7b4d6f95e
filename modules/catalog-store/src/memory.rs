//! In-process store for tests; no database, no Docker.
//!
//! Sorting and the `_id` byte-order tie-break follow the Postgres store.
//! Patterns run on the `regex` engine, which rejects look-around that
//! Postgres accepts.

use std::collections::{BTreeMap, HashMap};

use async_trait::async_trait;
use tokio::sync::RwLock;

use catalog_common::query::compare_by_keys;
use catalog_common::{CatalogError, CatalogResult, ListQuery, Product, TextFilter};

use crate::store::{ProductPage, ProductStore};

#[derive(Default)]
pub struct MemoryProductStore {
    docs: RwLock<BTreeMap<String, Product>>,
}

impl MemoryProductStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_products(products: impl IntoIterator<Item = Product>) -> Self {
        let docs = products.into_iter().map(|p| (p.id.clone(), p)).collect();
        Self {
            docs: RwLock::new(docs),
        }
    }

    pub async fn count(&self) -> usize {
        self.docs.read().await.len()
    }
}

#[async_trait]
impl ProductStore for MemoryProductStore {
    async fn list(&self, query: &ListQuery) -> CatalogResult<ProductPage> {
        let matcher = query.filter.as_ref().map(TextFilter::compile).transpose()?;
        let docs = self.docs.read().await;
        let mut matched: Vec<&Product> = docs
            .values()
            .filter(|p| matcher.as_ref().map_or(true, |m| m.matches(p)))
            .collect();
        matched.sort_by(|a, b| compare_by_keys(&query.sort, a, b));

        let total = matched.len() as u64;
        let products = matched
            .into_iter()
            .skip(query.skip as usize)
            .take(query.limit as usize)
            .map(|p| p.clone().into_summary())
            .collect();
        Ok(ProductPage { products, total })
    }

    async fn get(&self, id: &str) -> CatalogResult<Option<Product>> {
        Ok(self.docs.read().await.get(id).cloned())
    }

    async fn get_many(&self, ids: &[String]) -> CatalogResult<HashMap<String, Product>> {
        let docs = self.docs.read().await;
        Ok(ids
            .iter()
            .filter_map(|id| docs.get(id).map(|p| (id.clone(), p.clone())))
            .collect())
    }

    async fn insert(&self, product: &Product) -> CatalogResult<()> {
        let mut docs = self.docs.write().await;
        if docs.contains_key(&product.id) {
            return Err(CatalogError::Conflict(product.id.clone()));
        }
        docs.insert(product.id.clone(), product.clone());
        Ok(())
    }

    async fn upsert_many(&self, products: &[Product]) -> CatalogResult<u64> {
        let mut docs = self.docs.write().await;
        for p in products {
            docs.insert(p.id.clone(), p.clone());
        }
        Ok(products.len() as u64)
    }
}
