//! Display transforms over a product's precomputed `related_enriched` list.
//!
//! Scores come from the offline pipeline and are never modified here. These
//! functions only filter, sort (stable, so pipeline order breaks ties),
//! truncate, and join entries with live product documents.

use std::collections::{HashMap, HashSet};

use serde::Serialize;

use crate::query::parse_int_prefix;
use crate::types::{Product, RelatedEnriched, RelatedProduct, SignalScores};

pub const DEFAULT_RELATED_LIMIT: usize = 10;
pub const MAX_RELATED_LIMIT: usize = 50;

/// Continuous embedding/text signals qualify at or above this value.
pub const CONTINUOUS_THRESHOLD: f64 = 0.5;

/// Parse a `limit` query value and bound it to 1..=50.
pub fn clamp_limit(raw: Option<&str>) -> usize {
    match raw.and_then(parse_int_prefix) {
        Some(n) => n.clamp(1, MAX_RELATED_LIMIT as i64) as usize,
        None => DEFAULT_RELATED_LIMIT,
    }
}

/// Flat list: descending by `final_score`, truncated to `limit`.
pub fn rank_by_final_score(entries: &[RelatedEnriched], limit: usize) -> Vec<&RelatedEnriched> {
    let mut ranked: Vec<&RelatedEnriched> = entries.iter().collect();
    ranked.sort_by(|a, b| b.final_score.total_cmp(&a.final_score));
    ranked.truncate(limit);
    ranked
}

// --- Signal buckets ---

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Signal {
    Spectral,
    Louvain,
    Category,
    Title,
    Node2Vec,
    Gcn,
}

impl Signal {
    pub const ALL: [Signal; 6] = [
        Signal::Spectral,
        Signal::Louvain,
        Signal::Category,
        Signal::Title,
        Signal::Node2Vec,
        Signal::Gcn,
    ];

    pub fn score(self, scores: &SignalScores) -> f64 {
        match self {
            Signal::Spectral => scores.same_spectral,
            Signal::Louvain => scores.same_louvain,
            Signal::Category => scores.category,
            Signal::Title => scores.title,
            Signal::Node2Vec => scores.node2vec,
            Signal::Gcn => scores.gcn,
        }
    }

    /// Community and category signals are 0/1 flags; the rest are continuous.
    fn is_flag(self) -> bool {
        matches!(self, Signal::Spectral | Signal::Louvain | Signal::Category)
    }

    pub fn qualifies(self, scores: &SignalScores) -> bool {
        let v = self.score(scores);
        if self.is_flag() {
            v == 1.0
        } else {
            v >= CONTINUOUS_THRESHOLD
        }
    }
}

impl std::fmt::Display for Signal {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Signal::Spectral => write!(f, "spectral"),
            Signal::Louvain => write!(f, "louvain"),
            Signal::Category => write!(f, "category"),
            Signal::Title => write!(f, "title"),
            Signal::Node2Vec => write!(f, "node2vec"),
            Signal::Gcn => write!(f, "gcn"),
        }
    }
}

/// Entries that pass `signal`'s predicate, strongest first, at most `limit`.
pub fn bucket(entries: &[RelatedEnriched], signal: Signal, limit: usize) -> Vec<&RelatedEnriched> {
    let mut hits: Vec<&RelatedEnriched> = entries
        .iter()
        .filter(|e| signal.qualifies(&e.scores))
        .collect();
    hits.sort_by(|a, b| signal.score(&b.scores).total_cmp(&signal.score(&a.scores)));
    hits.truncate(limit);
    hits
}

/// Partition into all six buckets. An entry may land in several.
pub fn group_by_signal(
    entries: &[RelatedEnriched],
    limit: usize,
) -> Vec<(Signal, Vec<&RelatedEnriched>)> {
    Signal::ALL
        .iter()
        .map(|&s| (s, bucket(entries, s, limit)))
        .collect()
}

/// Distinct referenced ids in first-seen order, for a single batched lookup.
pub fn referenced_ids<'a>(entries: impl IntoIterator<Item = &'a RelatedEnriched>) -> Vec<String> {
    let mut seen = HashSet::new();
    entries
        .into_iter()
        .filter(|&e| seen.insert(e.asin.as_str()))
        .map(|e| e.asin.clone())
        .collect()
}

/// Join entries with live documents. Entries whose product is gone are dropped.
pub fn join_live(entries: &[&RelatedEnriched], live: &HashMap<String, Product>) -> Vec<RelatedProduct> {
    entries
        .iter()
        .filter_map(|e| live.get(&e.asin).map(|p| RelatedProduct::join(e, p)))
        .collect()
}

/// Response body for the grouped view.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RelatedBuckets {
    pub spectral: Vec<RelatedProduct>,
    pub louvain: Vec<RelatedProduct>,
    pub category: Vec<RelatedProduct>,
    pub title: Vec<RelatedProduct>,
    pub node2vec: Vec<RelatedProduct>,
    pub gcn: Vec<RelatedProduct>,
}

impl RelatedBuckets {
    pub fn from_groups(
        groups: &[(Signal, Vec<&RelatedEnriched>)],
        live: &HashMap<String, Product>,
    ) -> Self {
        let mut out = Self::default();
        for (signal, entries) in groups {
            let joined = join_live(entries, live);
            match signal {
                Signal::Spectral => out.spectral = joined,
                Signal::Louvain => out.louvain = joined,
                Signal::Category => out.category = joined,
                Signal::Title => out.title = joined,
                Signal::Node2Vec => out.node2vec = joined,
                Signal::Gcn => out.gcn = joined,
            }
        }
        out
    }
}
