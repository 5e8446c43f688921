//! Read-only catalog served from a JSON snapshot file.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use sprout_core::catalog::{CatalogError, FoodCatalog, InMemoryFoodCatalog};
use sprout_core::domain::food::{FoodId, FoodRecord};
use tracing::info;

/// A JSON array of food records, read once and never written back.
pub struct SnapshotCatalog {
    path: PathBuf,
    foods: InMemoryFoodCatalog,
}

impl SnapshotCatalog {
    pub async fn load(path: &Path) -> Result<Self, CatalogError> {
        let raw = tokio::fs::read_to_string(path).await.map_err(|error| {
            CatalogError::Unavailable(format!("could not read `{}`: {error}", path.display()))
        })?;

        let records: Vec<FoodRecord> = serde_json::from_str(&raw).map_err(|error| {
            CatalogError::Decode(format!("`{}` is not a food snapshot: {error}", path.display()))
        })?;

        info!(
            event_name = "catalog.snapshot.loaded",
            correlation_id = "snapshot",
            path = %path.display(),
            record_count = records.len(),
            "food catalog snapshot loaded"
        );

        Ok(Self { path: path.to_path_buf(), foods: InMemoryFoodCatalog::new(records) })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl FoodCatalog for SnapshotCatalog {
    async fn lookup_by_ids(&self, ids: &[FoodId]) -> Result<Vec<FoodRecord>, CatalogError> {
        self.foods.lookup_by_ids(ids).await
    }

    async fn list_by_locale(&self, locale: &str) -> Result<Vec<FoodRecord>, CatalogError> {
        self.foods.list_by_locale(locale).await
    }
}
