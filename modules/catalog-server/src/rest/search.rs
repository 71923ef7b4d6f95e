use std::collections::HashSet;

use axum::{
    extract::{Query, State},
    response::Json,
};
use serde::{Deserialize, Serialize};

use catalog_common::query::DEFAULT_SEARCH_LIMIT;
use catalog_common::{CatalogError, ListQuery, Pagination, Product, SortOption, TextFilter};

use crate::error::{ApiError, Surface, SurfaceExt};
use crate::routes::AppState;

pub const MAX_SUGGESTIONS: u64 = 8;
pub const MIN_SUGGESTION_QUERY: usize = 2;

#[derive(Deserialize)]
pub struct SearchQuery {
    q: Option<String>,
    page: Option<String>,
    limit: Option<String>,
    sort: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchResponse {
    pub products: Vec<Product>,
    pub page: u64,
    pub total_pages: u64,
    pub total: u64,
}

#[derive(Deserialize)]
pub struct SuggestionsQuery {
    q: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct SuggestionsResponse {
    pub suggestions: Vec<String>,
}

/// Title/name search with popularity tie-breaks.
pub async fn api_search(
    State(state): State<AppState>,
    Query(params): Query<SearchQuery>,
) -> Result<Json<SearchResponse>, ApiError> {
    let pagination = Pagination::parse(params.page.as_deref(), params.limit.as_deref(), DEFAULT_SEARCH_LIMIT);
    let filter = TextFilter::new(params.q.as_deref(), true);
    let sort = SortOption::parse(params.sort.as_deref());

    let query = ListQuery::new(filter, sort.search_keys(), pagination);
    let page = state.store.list(&query).await.on(Surface::Search)?;

    Ok(Json(SearchResponse {
        products: page.products,
        page: pagination.page,
        total_pages: pagination.total_pages(page.total),
        total: page.total,
    }))
}

/// Up to eight distinct display names for a partial query.
pub async fn api_search_suggestions(
    State(state): State<AppState>,
    Query(params): Query<SuggestionsQuery>,
) -> Result<Json<SuggestionsResponse>, ApiError> {
    let q = params.q.as_deref().unwrap_or_default();
    if q.trim().chars().count() < MIN_SUGGESTION_QUERY {
        return Ok(Json(SuggestionsResponse { suggestions: Vec::new() }));
    }

    let query = ListQuery::new(
        TextFilter::new(Some(q), true),
        SortOption::Default.search_keys(),
        Pagination { page: 1, limit: MAX_SUGGESTIONS },
    );
    let page = match state.store.list(&query).await {
        Ok(page) => page,
        // Half-typed patterns such as "usb (" are common here; treat them as no match.
        Err(CatalogError::InvalidPattern(_)) => {
            return Ok(Json(SuggestionsResponse { suggestions: Vec::new() }));
        }
        Err(e) => return Err(ApiError::new(e, Surface::Suggestion)),
    };

    Ok(Json(SuggestionsResponse {
        suggestions: distinct_names(&page.products),
    }))
}

fn distinct_names(products: &[Product]) -> Vec<String> {
    let mut seen = HashSet::new();
    products
        .iter()
        .filter_map(Product::display_name)
        .filter(|name| seen.insert(*name))
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn named(id: &str, title: &str, name: Option<&str>) -> Product {
        Product {
            id: id.into(),
            title: title.into(),
            name: name.map(str::to_string),
            ..Default::default()
        }
    }

    #[test]
    fn distinct_names_dedupes_in_order() {
        let products = vec![
            named("1", "SSD 1TB", None),
            named("2", "Other", Some("SSD 1TB")),
            named("3", "NVMe SSD", None),
        ];
        assert_eq!(distinct_names(&products), ["SSD 1TB", "NVMe SSD"]);
    }
}
