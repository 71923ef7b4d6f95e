//! Listing/search query model: sort options, pagination and text filters.
//!
//! Query-string parsing is deliberately lenient: numbers are read like
//! JavaScript's `parseInt` and anything unparseable falls back to a default.

use std::cmp::Ordering;

use regex::{Regex, RegexBuilder};

use crate::error::{CatalogError, CatalogResult};
use crate::types::Product;

pub const DEFAULT_LIST_LIMIT: u64 = 10;
pub const DEFAULT_SEARCH_LIMIT: u64 = 20;
pub const MAX_PAGE_LIMIT: u64 = 100;

// --- Sorting ---

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortOption {
    PriceAsc,
    PriceDesc,
    RatingAsc,
    RatingDesc,
    #[default]
    Default,
}

impl SortOption {
    pub fn parse(raw: Option<&str>) -> Self {
        match raw.map(str::trim) {
            Some("price-asc") => Self::PriceAsc,
            Some("price-desc") => Self::PriceDesc,
            Some("rating-asc") => Self::RatingAsc,
            Some("rating-desc") | Some("rating-dsc") => Self::RatingDesc,
            _ => Self::Default,
        }
    }

    /// Sort keys for the product listing.
    pub fn listing_keys(self) -> Vec<SortKey> {
        vec![self.primary(), SortKey::asc(SortField::Id)]
    }

    /// Sort keys for the search surface, which breaks ties on popularity.
    pub fn search_keys(self) -> Vec<SortKey> {
        let secondary = match self {
            Self::Default => SortKey::desc(SortField::AverageRating),
            _ => SortKey::desc(SortField::RatingNumber),
        };
        vec![self.primary(), secondary, SortKey::asc(SortField::Id)]
    }

    fn primary(self) -> SortKey {
        match self {
            Self::PriceAsc => SortKey::asc(SortField::Price),
            Self::PriceDesc => SortKey::desc(SortField::Price),
            Self::RatingAsc => SortKey::asc(SortField::AverageRating),
            Self::RatingDesc => SortKey::desc(SortField::AverageRating),
            Self::Default => SortKey::desc(SortField::RatingNumber),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortField {
    Price,
    AverageRating,
    RatingNumber,
    Id,
}

impl SortField {
    /// Document field name.
    pub fn field(self) -> &'static str {
        match self {
            Self::Price => "price",
            Self::AverageRating => "average_rating",
            Self::RatingNumber => "rating_number",
            Self::Id => "_id",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Asc,
    Desc,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SortKey {
    pub field: SortField,
    pub direction: SortDirection,
}

impl SortKey {
    pub fn asc(field: SortField) -> Self {
        Self { field, direction: SortDirection::Asc }
    }

    pub fn desc(field: SortField) -> Self {
        Self { field, direction: SortDirection::Desc }
    }

    /// Compare two products on this key. Missing values sort as smallest.
    pub fn compare(&self, a: &Product, b: &Product) -> Ordering {
        let ord = match self.field {
            SortField::Price => cmp_opt_f64(a.price, b.price),
            SortField::AverageRating => cmp_opt_f64(a.average_rating, b.average_rating),
            SortField::RatingNumber => a.rating_number.cmp(&b.rating_number),
            SortField::Id => a.id.cmp(&b.id),
        };
        match self.direction {
            SortDirection::Asc => ord,
            SortDirection::Desc => ord.reverse(),
        }
    }
}

fn cmp_opt_f64(a: Option<f64>, b: Option<f64>) -> Ordering {
    match (a, b) {
        (Some(x), Some(y)) => x.total_cmp(&y),
        (None, Some(_)) => Ordering::Less,
        (Some(_), None) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

/// Compare by each key in turn.
pub fn compare_by_keys(keys: &[SortKey], a: &Product, b: &Product) -> Ordering {
    keys.iter()
        .map(|k| k.compare(a, b))
        .find(|o| o.is_ne())
        .unwrap_or(Ordering::Equal)
}

// --- Pagination ---

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    pub page: u64,
    pub limit: u64,
}

impl Pagination {
    pub fn parse(page: Option<&str>, limit: Option<&str>, default_limit: u64) -> Self {
        let page = page
            .and_then(parse_int_prefix)
            .filter(|p| *p >= 1)
            .map(|p| p as u64)
            .unwrap_or(1);
        let limit = limit
            .and_then(parse_int_prefix)
            .filter(|l| *l >= 1)
            .map(|l| (l as u64).min(MAX_PAGE_LIMIT))
            .unwrap_or(default_limit);
        Self { page, limit }
    }

    pub fn skip(&self) -> u64 {
        (self.page - 1).saturating_mul(self.limit)
    }

    pub fn total_pages(&self, total: u64) -> u64 {
        total.div_ceil(self.limit)
    }
}

/// Read a leading integer the way `parseInt` does: optional whitespace and
/// sign, then digits; trailing garbage is ignored.
pub fn parse_int_prefix(raw: &str) -> Option<i64> {
    let s = raw.trim_start();
    let (neg, digits) = match s.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, s.strip_prefix('+').unwrap_or(s)),
    };
    let end = digits
        .char_indices()
        .find(|(_, c)| !c.is_ascii_digit())
        .map(|(i, _)| i)
        .unwrap_or(digits.len());
    if end == 0 {
        return None;
    }
    let value: i64 = digits[..end].parse().ok()?;
    Some(if neg { -value } else { value })
}

// --- Text filter ---

/// Case-insensitive regular expression over `title` (and `name` for search).
///
/// The pattern is kept as typed; the store that runs it decides whether it
/// is valid and reports `CatalogError::InvalidPattern` otherwise.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextFilter {
    pattern: String,
    include_name: bool,
}

impl TextFilter {
    /// Build a filter from user input. Empty input means no filter.
    pub fn new(raw: Option<&str>, include_name: bool) -> Option<Self> {
        match raw {
            Some(p) if !p.is_empty() => Some(Self {
                pattern: p.to_string(),
                include_name,
            }),
            _ => None,
        }
    }

    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    pub fn include_name(&self) -> bool {
        self.include_name
    }

    /// Compile for in-process matching with the `regex` engine.
    pub fn compile(&self) -> CatalogResult<TextMatcher> {
        let regex = RegexBuilder::new(&self.pattern)
            .case_insensitive(true)
            .size_limit(1 << 20)
            .build()
            .map_err(|e| CatalogError::InvalidPattern(e.to_string()))?;
        Ok(TextMatcher {
            regex,
            include_name: self.include_name,
        })
    }
}

/// A compiled [`TextFilter`].
#[derive(Debug, Clone)]
pub struct TextMatcher {
    regex: Regex,
    include_name: bool,
}

impl TextMatcher {
    pub fn matches(&self, product: &Product) -> bool {
        if self.regex.is_match(&product.title) {
            return true;
        }
        self.include_name
            && product
                .name
                .as_deref()
                .is_some_and(|n| self.regex.is_match(n))
    }
}

// --- Store query ---

/// Everything a store needs to answer a listing or search page.
#[derive(Debug, Clone)]
pub struct ListQuery {
    pub filter: Option<TextFilter>,
    pub sort: Vec<SortKey>,
    pub skip: u64,
    pub limit: u64,
}

impl ListQuery {
    pub fn new(filter: Option<TextFilter>, sort: Vec<SortKey>, pagination: Pagination) -> Self {
        Self {
            filter,
            sort,
            skip: pagination.skip(),
            limit: pagination.limit,
        }
    }
}
