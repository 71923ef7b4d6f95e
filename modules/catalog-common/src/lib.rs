pub mod config;
pub mod error;
pub mod query;
pub mod related;
pub mod types;

pub use config::Config;
pub use error::{CatalogError, CatalogResult};
pub use query::{ListQuery, Pagination, SortDirection, SortField, SortKey, SortOption, TextFilter, TextMatcher};
pub use related::{RelatedBuckets, Signal};
pub use types::*;
