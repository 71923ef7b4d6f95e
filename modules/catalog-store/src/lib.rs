//! Product document storage.
//!
//! Documents are opaque JSONB keyed by ASIN. Reads go through the
//! [`ProductStore`] trait so the HTTP layer can be exercised against the
//! in-memory implementation without a database.

#[cfg(any(test, feature = "test-utils"))]
pub mod memory;
pub mod postgres;
pub mod store;

#[cfg(any(test, feature = "test-utils"))]
pub use memory::MemoryProductStore;
pub use postgres::{PgProductStore, MIGRATOR};
pub use store::{ProductPage, ProductStore};
