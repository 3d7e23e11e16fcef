//! In-memory catalog source.
//!
//! Loads rows from a JSON document shaped like
//!
//! ```json
//! { "classes": [ { "id": 1, "name": "Сальса", "mon": "19:00:00" } ],
//!   "passes":  [ { "name": "Месяц", "description": "…", "price": 4300,
//!                  "lifetime": 30, "hours": 8 } ] }
//! ```

use std::path::Path;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::models::{ClassRow, PassRow};
use crate::source::CatalogSource;

/// Catalog source serving fixed rows.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FixtureSource {
    #[serde(default)]
    classes: Vec<ClassRow>,
    #[serde(default)]
    passes: Vec<PassRow>,
}

impl FixtureSource {
    /// Passes are reordered by price the way the database query returns them,
    /// with missing prices first.
    pub fn new(classes: Vec<ClassRow>, mut passes: Vec<PassRow>) -> Self {
        passes.sort_by_key(|p| p.price);
        Self { classes, passes }
    }

    /// Read a JSON fixture file.
    pub async fn load(path: impl AsRef<Path>) -> Result<Self> {
        let bytes = tokio::fs::read(path.as_ref()).await?;
        let fixture: FixtureSource = serde_json::from_slice(&bytes)?;
        log::info!(
            "Loaded fixture {} ({} classes, {} passes)",
            path.as_ref().display(),
            fixture.classes.len(),
            fixture.passes.len()
        );
        Ok(Self::new(fixture.classes, fixture.passes))
    }
}

#[async_trait]
impl CatalogSource for FixtureSource {
    async fn fetch_classes(&self) -> Result<Vec<ClassRow>> {
        Ok(self.classes.clone())
    }

    async fn fetch_passes(&self) -> Result<Vec<PassRow>> {
        Ok(self.passes.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_load_fixture() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("catalog.json");
        tokio::fs::write(
            &path,
            r#"{
                "classes": [{"id": 3, "name": "Бачата", "fri": "20:00:00"}],
                "passes": [
                    {"name": "Полгода", "description": "x", "price": 20000, "lifetime": 180, "hours": 48},
                    {"name": "Месяц", "description": "y", "price": 4300, "lifetime": 30, "hours": 8}
                ]
            }"#,
        )
        .await
        .unwrap();

        let source = FixtureSource::load(&path).await.unwrap();
        let classes = source.fetch_classes().await.unwrap();
        let passes = source.fetch_passes().await.unwrap();

        assert_eq!(classes[0].name, "Бачата");
        assert_eq!(passes[0].name, "Месяц");
        assert_eq!(passes[1].name, "Полгода");
    }

    #[tokio::test]
    async fn test_missing_file_is_data_access_error() {
        let err = FixtureSource::load("/nonexistent/catalog.json")
            .await
            .unwrap_err();
        assert!(err.is_data_access());
    }

    #[tokio::test]
    async fn test_empty_document() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("empty.json");
        tokio::fs::write(&path, "{}").await.unwrap();

        let source = FixtureSource::load(&path).await.unwrap();
        assert!(source.fetch_classes().await.unwrap().is_empty());
        assert!(source.fetch_passes().await.unwrap().is_empty());
    }
}
