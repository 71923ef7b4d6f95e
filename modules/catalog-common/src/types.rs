use serde::{Deserialize, Serialize};

use crate::error::{CatalogError, CatalogResult};

// --- Product ---

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProductImage {
    #[serde(default)]
    pub thumb: Option<String>,
    #[serde(default)]
    pub large: Option<String>,
    #[serde(default)]
    pub variant: Option<String>,
    #[serde(default)]
    pub hi_res: Option<String>,
}

/// A catalog document keyed by its ASIN.
///
/// Documents are written by the bulk import; the API only reads them, apart
/// from the single create endpoint.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Product {
    #[serde(rename = "_id")]
    pub id: String,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default)]
    pub average_rating: Option<f64>,
    #[serde(default)]
    pub rating_number: Option<i64>,
    #[serde(default)]
    pub features: Vec<String>,
    #[serde(default)]
    pub description: Vec<String>,
    /// `None` means out of stock.
    #[serde(default)]
    pub price: Option<f64>,
    #[serde(default)]
    pub images: Vec<ProductImage>,
    #[serde(default)]
    pub categories: Vec<String>,
    #[serde(default)]
    pub related: Vec<String>,
    /// Upstream source record, passed through untouched.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meta_all: Option<serde_json::Value>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub related_enriched: Vec<RelatedEnriched>,
}

impl Product {
    /// Reject documents the catalog cannot key or display.
    pub fn validate(&self) -> CatalogResult<()> {
        if self.id.trim().is_empty() {
            return Err(CatalogError::Validation("_id is required".into()));
        }
        if self.title.trim().is_empty() {
            return Err(CatalogError::Validation("title is required".into()));
        }
        if let Some(meta) = &self.meta_all {
            if !meta.is_object() {
                return Err(CatalogError::Validation("meta_all must be an object".into()));
            }
        }
        Ok(())
    }

    /// Listing projection: drop the heavy relation arrays.
    pub fn into_summary(mut self) -> Self {
        self.related_enriched = Vec::new();
        self
    }

    /// Name shown in search suggestions.
    pub fn display_name(&self) -> Option<&str> {
        self.name
            .as_deref()
            .filter(|n| !n.is_empty())
            .or(Some(self.title.as_str()).filter(|t| !t.is_empty()))
    }
}

// --- Precomputed relations ---

/// The seven offline signals. Opaque floats, never recomputed here.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct SignalScores {
    #[serde(default)]
    pub co_purchase: f64,
    #[serde(default)]
    pub same_louvain: f64,
    #[serde(default)]
    pub same_spectral: f64,
    #[serde(default)]
    pub category: f64,
    #[serde(default)]
    pub title: f64,
    #[serde(default)]
    pub node2vec: f64,
    #[serde(default)]
    pub gcn: f64,
}

/// One scored edge from a product to another, as stored by the pipeline.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RelatedEnriched {
    pub asin: String,
    #[serde(default)]
    pub scores: SignalScores,
    #[serde(default)]
    pub final_score: f64,
    #[serde(default)]
    pub raw_w: f64,
    #[serde(default)]
    pub reasons: Vec<String>,
    #[serde(default)]
    pub louvain_comm: Option<i64>,
    #[serde(default)]
    pub spectral_comm: Option<i64>,
}

/// A related entry joined with the live fields of the product it points at.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RelatedProduct {
    pub asin: String,
    pub title: String,
    pub categories: Vec<String>,
    pub images: Vec<ProductImage>,
    pub average_rating: Option<f64>,
    pub rating_number: Option<i64>,
    pub price: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub meta_all: Option<serde_json::Value>,
    pub scores: SignalScores,
    pub final_score: f64,
    pub raw_w: f64,
    pub reasons: Vec<String>,
    pub louvain_comm: Option<i64>,
    pub spectral_comm: Option<i64>,
}

impl RelatedProduct {
    pub fn join(entry: &RelatedEnriched, live: &Product) -> Self {
        Self {
            asin: entry.asin.clone(),
            title: live.title.clone(),
            categories: live.categories.clone(),
            images: live.images.clone(),
            average_rating: live.average_rating,
            rating_number: live.rating_number,
            price: live.price,
            meta_all: live.meta_all.clone(),
            scores: entry.scores,
            final_score: entry.final_score,
            raw_w: entry.raw_w,
            reasons: entry.reasons.clone(),
            louvain_comm: entry.louvain_comm,
            spectral_comm: entry.spectral_comm,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sparse_document_fills_defaults() {
        let p: Product = serde_json::from_value(serde_json::json!({
            "_id": "B000123",
            "title": "USB-C cable",
            "related_enriched": [{ "asin": "B000999", "scores": { "gcn": 0.7 } }]
        }))
        .unwrap();

        assert_eq!(p.id, "B000123");
        assert!(p.price.is_none());
        assert!(p.categories.is_empty());
        assert_eq!(p.related_enriched[0].scores.gcn, 0.7);
        assert_eq!(p.related_enriched[0].scores.co_purchase, 0.0);
        assert_eq!(p.related_enriched[0].final_score, 0.0);
    }

    #[test]
    fn id_serializes_as_underscore_id() {
        let p = Product {
            id: "B1".into(),
            title: "t".into(),
            ..Default::default()
        };
        let v = serde_json::to_value(&p).unwrap();
        assert_eq!(v["_id"], "B1");
        assert!(v.get("related_enriched").is_none());
        assert!(v.get("name").is_none());
    }

    #[test]
    fn validate_rejects_blank_title() {
        let p = Product {
            id: "B1".into(),
            title: "  ".into(),
            ..Default::default()
        };
        assert!(matches!(p.validate(), Err(CatalogError::Validation(_))));
    }

    #[test]
    fn validate_rejects_non_object_meta() {
        let p = Product {
            id: "B1".into(),
            title: "t".into(),
            meta_all: Some(serde_json::json!([1, 2])),
            ..Default::default()
        };
        assert!(p.validate().is_err());
    }

    #[test]
    fn display_name_prefers_name_over_title() {
        let mut p = Product {
            id: "B1".into(),
            title: "Title".into(),
            ..Default::default()
        };
        assert_eq!(p.display_name(), Some("Title"));
        p.name = Some("Name".into());
        assert_eq!(p.display_name(), Some("Name"));
        p.name = Some(String::new());
        assert_eq!(p.display_name(), Some("Title"));
    }

    #[test]
    fn join_takes_live_fields_and_keeps_scores() {
        let entry = RelatedEnriched {
            asin: "B2".into(),
            final_score: 0.9,
            reasons: vec!["gcn".into()],
            louvain_comm: Some(4),
            ..Default::default()
        };
        let live = Product {
            id: "B2".into(),
            title: "Fresh title".into(),
            categories: vec!["Cables".into()],
            price: Some(9.99),
            ..Default::default()
        };

        let joined = RelatedProduct::join(&entry, &live);
        assert_eq!(joined.title, "Fresh title");
        assert_eq!(joined.categories, vec!["Cables".to_string()]);
        assert_eq!(joined.final_score, 0.9);
        assert_eq!(joined.louvain_comm, Some(4));
    }
}
