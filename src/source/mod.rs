//! Catalog sources.
//!
//! The exporter reads two row sets per request: running classes and active
//! ticket types. Both are read in full or not at all; a failure part-way
//! through a result set discards the rows already read.
//!
//! - [`MySqlSource`]: production database
//! - [`FixtureSource`]: rows from a JSON file or memory, for offline renders and tests

pub mod fixture;
pub mod mysql;

use async_trait::async_trait;

use crate::error::Result;
use crate::models::{ClassRow, PassRow};

// Re-export for convenience
pub use fixture::FixtureSource;
pub use mysql::MySqlSource;

/// Trait for backends that supply catalog rows.
#[async_trait]
pub trait CatalogSource: Send + Sync {
    /// Classes that are visible, not deleted, and running today.
    async fn fetch_classes(&self) -> Result<Vec<ClassRow>>;

    /// Active ticket types with a description, cheapest first.
    async fn fetch_passes(&self) -> Result<Vec<PassRow>>;
}
