//! Postgres-backed document store: one JSONB document per product.

use std::collections::HashMap;

use async_trait::async_trait;
use sqlx::migrate::Migrator;
use sqlx::types::Json;
use sqlx::PgPool;
use tracing::debug;

use catalog_common::{
    CatalogError, CatalogResult, ListQuery, Product, SortDirection, SortField, SortKey, TextFilter,
};

use crate::store::{ProductPage, ProductStore};

pub static MIGRATOR: Migrator = sqlx::migrate!("../../migrations");

/// SQLSTATE for an invalid regular expression.
const INVALID_REGEX: &str = "2201B";

#[derive(Clone)]
pub struct PgProductStore {
    pool: PgPool,
}

impl PgProductStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

fn order_expr(key: &SortKey) -> String {
    let column = match key.field {
        SortField::Id => r#"id COLLATE "C""#.to_string(),
        field => numeric_field(field.field()),
    };
    let direction = match key.direction {
        SortDirection::Asc => "ASC NULLS FIRST",
        SortDirection::Desc => "DESC NULLS LAST",
    };
    format!("{column} {direction}")
}

/// Numeric document field, NULL when absent or not a number.
fn numeric_field(name: &str) -> String {
    format!("(CASE WHEN jsonb_typeof(doc->'{name}') = 'number' THEN (doc->>'{name}')::float8 END)")
}

fn order_clause(keys: &[SortKey]) -> String {
    if keys.is_empty() {
        return r#"ORDER BY id COLLATE "C" ASC"#.to_string();
    }
    let parts: Vec<String> = keys.iter().map(order_expr).collect();
    format!("ORDER BY {}", parts.join(", "))
}

/// WHERE clause for the text filter; the pattern is always bound as `$1`.
fn where_clause(filter: Option<&TextFilter>) -> &'static str {
    match filter {
        None => "",
        Some(f) if f.include_name() => "WHERE (doc->>'title' ~* $1 OR doc->>'name' ~* $1)",
        Some(_) => "WHERE doc->>'title' ~* $1",
    }
}

fn map_err(err: sqlx::Error) -> CatalogError {
    if let sqlx::Error::Database(db) = &err {
        if db.code().as_deref() == Some(INVALID_REGEX) {
            return CatalogError::InvalidPattern(db.message().to_string());
        }
    }
    CatalogError::store(err)
}

#[async_trait]
impl ProductStore for PgProductStore {
    async fn list(&self, query: &ListQuery) -> CatalogResult<ProductPage> {
        let filter = query.filter.as_ref();
        let where_sql = where_clause(filter);

        let (limit_param, offset_param) = if filter.is_some() { ("$2", "$3") } else { ("$1", "$2") };
        let page_sql = format!(
            "SELECT doc - 'related_enriched' FROM products {where_sql} {} LIMIT {limit_param} OFFSET {offset_param}",
            order_clause(&query.sort),
        );
        let count_sql = format!("SELECT COUNT(*) FROM products {where_sql}");
        debug!(sql = %page_sql, "Listing products");

        let mut page_q = sqlx::query_scalar::<_, Json<Product>>(&page_sql);
        let mut count_q = sqlx::query_scalar::<_, i64>(&count_sql);
        if let Some(f) = filter {
            page_q = page_q.bind(f.pattern());
            count_q = count_q.bind(f.pattern());
        }

        let products = page_q
            .bind(i64::try_from(query.limit).unwrap_or(i64::MAX))
            .bind(i64::try_from(query.skip).unwrap_or(i64::MAX))
            .fetch_all(&self.pool)
            .await
            .map_err(map_err)?;
        let total = count_q.fetch_one(&self.pool).await.map_err(map_err)?;

        Ok(ProductPage {
            products: products.into_iter().map(|Json(p)| p).collect(),
            total: total.max(0) as u64,
        })
    }

    async fn get(&self, id: &str) -> CatalogResult<Option<Product>> {
        let row = sqlx::query_scalar::<_, Json<Product>>("SELECT doc FROM products WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(map_err)?;
        Ok(row.map(|Json(p)| p))
    }

    async fn get_many(&self, ids: &[String]) -> CatalogResult<HashMap<String, Product>> {
        if ids.is_empty() {
            return Ok(HashMap::new());
        }
        let rows = sqlx::query_scalar::<_, Json<Product>>("SELECT doc FROM products WHERE id = ANY($1)")
            .bind(ids)
            .fetch_all(&self.pool)
            .await
            .map_err(map_err)?;
        Ok(rows.into_iter().map(|Json(p)| (p.id.clone(), p)).collect())
    }

    async fn insert(&self, product: &Product) -> CatalogResult<()> {
        let result = sqlx::query(
            r#"
            INSERT INTO products (id, doc)
            VALUES ($1, $2)
            ON CONFLICT (id) DO NOTHING
            "#,
        )
        .bind(&product.id)
        .bind(Json(product))
        .execute(&self.pool)
        .await
        .map_err(map_err)?;

        if result.rows_affected() == 0 {
            return Err(CatalogError::Conflict(product.id.clone()));
        }
        Ok(())
    }

    async fn upsert_many(&self, products: &[Product]) -> CatalogResult<u64> {
        let mut tx = self.pool.begin().await.map_err(map_err)?;
        let mut written = 0;
        for product in products {
            let result = sqlx::query(
                r#"
                INSERT INTO products (id, doc)
                VALUES ($1, $2)
                ON CONFLICT (id) DO UPDATE SET doc = EXCLUDED.doc, updated_at = now()
                "#,
            )
            .bind(&product.id)
            .bind(Json(product))
            .execute(&mut *tx)
            .await
            .map_err(map_err)?;
            written += result.rows_affected();
        }
        tx.commit().await.map_err(map_err)?;
        Ok(written)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use catalog_common::SortOption;

    #[test]
    fn default_listing_order() {
        assert_eq!(
            order_clause(&SortOption::Default.listing_keys()),
            "ORDER BY (CASE WHEN jsonb_typeof(doc->'rating_number') = 'number' \
             THEN (doc->>'rating_number')::float8 END) DESC NULLS LAST, id COLLATE \"C\" ASC NULLS FIRST"
        );
    }

    #[test]
    fn ascending_puts_missing_first() {
        let sql = order_expr(&SortKey::asc(SortField::Price));
        assert!(sql.contains("doc->>'price'"));
        assert!(sql.ends_with("ASC NULLS FIRST"));
    }

    #[test]
    fn where_clause_depends_on_name_matching() {
        assert_eq!(where_clause(None), "");
        let title = TextFilter::new(Some("ssd"), false);
        assert_eq!(where_clause(title.as_ref()), "WHERE doc->>'title' ~* $1");
        let both = TextFilter::new(Some("ssd"), true);
        assert!(where_clause(both.as_ref()).contains("doc->>'name'"));
    }
}
