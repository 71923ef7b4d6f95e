//! Related-product panels. Both views read the precomputed
//! `related_enriched` array and join it with live product fields.

use axum::{
    extract::{Path, Query, State},
    response::Json,
};
use serde::{Deserialize, Serialize};
use tracing::debug;

use catalog_common::related::{self, RelatedBuckets};
use catalog_common::RelatedProduct;

use super::load_product;
use crate::error::ApiError;
use crate::routes::AppState;

#[derive(Deserialize)]
pub struct RelatedQuery {
    limit: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct RelatedResponse {
    pub related: Vec<RelatedProduct>,
}

/// Flat list, strongest `final_score` first.
pub async fn api_related(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Query(params): Query<RelatedQuery>,
) -> Result<Json<RelatedResponse>, ApiError> {
    let limit = related::clamp_limit(params.limit.as_deref());
    let product = load_product(state.store.as_ref(), &id).await?;

    let ranked = related::rank_by_final_score(&product.related_enriched, limit);
    let ids = related::referenced_ids(ranked.iter().copied());
    let live = state.store.get_many(&ids).await?;

    Ok(Json(RelatedResponse {
        related: related::join_live(&ranked, &live),
    }))
}

/// Six signal buckets, each sorted by its own signal.
pub async fn api_related_signals(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Query(params): Query<RelatedQuery>,
) -> Result<Json<RelatedBuckets>, ApiError> {
    let limit = related::clamp_limit(params.limit.as_deref());
    let product = load_product(state.store.as_ref(), &id).await?;

    let groups = related::group_by_signal(&product.related_enriched, limit);
    let ids = related::referenced_ids(groups.iter().flat_map(|(_, hits)| hits.iter().copied()));
    let live = state.store.get_many(&ids).await?;

    debug!(
        id = %id,
        entries = product.related_enriched.len(),
        referenced = ids.len(),
        found = live.len(),
        "Grouped related products"
    );

    Ok(Json(RelatedBuckets::from_groups(&groups, &live)))
}
