use axum::{
    extract::{rejection::JsonRejection, Path, Query, State},
    http::StatusCode,
    response::Json,
};
use serde::{Deserialize, Serialize};
use tracing::info;

use catalog_common::query::DEFAULT_LIST_LIMIT;
use catalog_common::{CatalogError, ListQuery, Pagination, Product, SortOption, TextFilter};

use super::load_product;
use crate::error::ApiError;
use crate::routes::AppState;

// --- Query structs ---

/// Raw strings so malformed numbers fall back to defaults instead of 400.
#[derive(Deserialize)]
pub struct ProductsQuery {
    page: Option<String>,
    limit: Option<String>,
    search: Option<String>,
    sort: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductsResponse {
    pub total_products: u64,
    pub current_page: u64,
    pub total_pages: u64,
    pub products: Vec<Product>,
}

// --- Handlers ---

pub async fn api_products(
    State(state): State<AppState>,
    Query(params): Query<ProductsQuery>,
) -> Result<Json<ProductsResponse>, ApiError> {
    let pagination = Pagination::parse(params.page.as_deref(), params.limit.as_deref(), DEFAULT_LIST_LIMIT);
    let filter = TextFilter::new(params.search.as_deref().map(str::trim), false);
    let sort = SortOption::parse(params.sort.as_deref());

    let query = ListQuery::new(filter, sort.listing_keys(), pagination);
    let page = state.store.list(&query).await?;

    Ok(Json(ProductsResponse {
        total_products: page.total,
        current_page: pagination.page,
        total_pages: pagination.total_pages(page.total),
        products: page.products,
    }))
}

pub async fn api_product_detail(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Product>, ApiError> {
    let product = load_product(state.store.as_ref(), &id).await?;
    Ok(Json(product))
}

pub async fn api_create_product(
    State(state): State<AppState>,
    body: Result<Json<Product>, JsonRejection>,
) -> Result<(StatusCode, Json<Product>), ApiError> {
    let Json(product) = body.map_err(|e| CatalogError::Validation(e.body_text()))?;
    product.validate()?;
    state.store.insert(&product).await?;

    info!(id = %product.id, "Product created");
    Ok((StatusCode::CREATED, Json(product)))
}
