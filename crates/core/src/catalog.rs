use async_trait::async_trait;
use thiserror::Error;
use tokio::sync::RwLock;

use crate::domain::food::{FoodId, FoodRecord};

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("catalog unavailable: {0}")]
    Unavailable(String),
    #[error("decode error: {0}")]
    Decode(String),
}

/// Read-only access to the food catalog.
#[async_trait]
pub trait FoodCatalog: Send + Sync {
    /// Resolve ids to records. Unknown ids are omitted, not an error.
    async fn lookup_by_ids(&self, ids: &[FoodId]) -> Result<Vec<FoodRecord>, CatalogError>;

    /// Every record of one locale, in catalog order.
    async fn list_by_locale(&self, locale: &str) -> Result<Vec<FoodRecord>, CatalogError>;
}

#[async_trait]
impl<T: FoodCatalog + ?Sized> FoodCatalog for std::sync::Arc<T> {
    async fn lookup_by_ids(&self, ids: &[FoodId]) -> Result<Vec<FoodRecord>, CatalogError> {
        (**self).lookup_by_ids(ids).await
    }

    async fn list_by_locale(&self, locale: &str) -> Result<Vec<FoodRecord>, CatalogError> {
        (**self).list_by_locale(locale).await
    }
}

/// Insertion order is the catalog iteration order.
#[derive(Default)]
pub struct InMemoryFoodCatalog {
    foods: RwLock<Vec<FoodRecord>>,
}

impl InMemoryFoodCatalog {
    pub fn new(foods: Vec<FoodRecord>) -> Self {
        Self { foods: RwLock::new(foods) }
    }

    pub async fn insert(&self, food: FoodRecord) {
        self.foods.write().await.push(food);
    }

    pub async fn len(&self) -> usize {
        self.foods.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.foods.read().await.is_empty()
    }
}

#[async_trait]
impl FoodCatalog for InMemoryFoodCatalog {
    async fn lookup_by_ids(&self, ids: &[FoodId]) -> Result<Vec<FoodRecord>, CatalogError> {
        let foods = self.foods.read().await;
        Ok(foods.iter().filter(|food| ids.contains(&food.id)).cloned().collect())
    }

    async fn list_by_locale(&self, locale: &str) -> Result<Vec<FoodRecord>, CatalogError> {
        let foods = self.foods.read().await;
        Ok(foods.iter().filter(|food| food.locale == locale).cloned().collect())
    }
}
