use std::sync::Arc;

use uuid::Uuid;

use crate::core::error::{AppError, Result};
use crate::features::categories::models::Category;
use crate::modules::storage::Storage;
use crate::shared::ui::Operation;

/// Service for category lookups and mutations
pub struct CategoryService {
    storage: Arc<dyn Storage>,
}

impl CategoryService {
    pub fn new(storage: Arc<dyn Storage>) -> Self {
        Self { storage }
    }

    /// Exact, case-sensitive lookup by name
    pub async fn find_category_by_name(&self, name: &str) -> Result<Option<Category>> {
        self.storage.find_category_by_name(name).await
    }

    /// Categories whose name contains `filter`, ignoring case
    pub async fn find_categories(&self, filter: &str) -> Result<Vec<Category>> {
        self.storage.find_categories(filter.trim()).await
    }

    pub async fn get(&self, id: Uuid) -> Result<Category> {
        self.storage
            .get_category(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Category {} not found", id)))
    }

    /// Create (`Add`) or rename (`Edit`) a category. Names must be unique, and
    /// editing a category that no longer exists is `NotFound`.
    pub async fn save_category(
        &self,
        category: &Category,
        operation: Operation,
    ) -> Result<Category> {
        if let Some(existing) = self.storage.find_category_by_name(&category.name).await? {
            if existing.id != category.id {
                return Err(AppError::Conflict(format!(
                    "Category '{}' already exists",
                    category.name
                )));
            }
        }

        let saved = match operation {
            Operation::Add => self.storage.insert_category(category).await?,
            Operation::Edit => self.storage.update_category(category).await?,
        };
        tracing::info!("Category saved: id={}, name={}", saved.id, saved.name);
        Ok(saved)
    }

    /// Delete a category; its reviews become "undefined". Returns how many
    /// reviews were detached.
    pub async fn delete_category(&self, category: &Category) -> Result<u64> {
        let detached = self.storage.delete_category(category.id).await?;
        tracing::info!(
            "Category deleted: id={}, name={}, detached_reviews={}",
            category.id,
            category.name,
            detached
        );
        Ok(detached)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::test_helpers::memory_services;

    #[tokio::test]
    async fn test_save_rejects_duplicate_name() {
        let services = memory_services();
        services
            .categories
            .save_category(&Category::new("Ales"), Operation::Add)
            .await
            .unwrap();

        let result = services
            .categories
            .save_category(&Category::new("Ales"), Operation::Add)
            .await;
        assert!(matches!(result, Err(AppError::Conflict(_))));
    }

    #[tokio::test]
    async fn test_resaving_same_category_is_allowed() {
        let services = memory_services();
        let ales = services
            .categories
            .save_category(&Category::new("Ales"), Operation::Add)
            .await
            .unwrap();

        assert!(services
            .categories
            .save_category(&ales, Operation::Edit)
            .await
            .is_ok());
    }

    #[tokio::test]
    async fn test_editing_deleted_category_is_not_found() {
        let services = memory_services();
        let mut ales = services
            .categories
            .save_category(&Category::new("Ales"), Operation::Add)
            .await
            .unwrap();
        services.categories.delete_category(&ales).await.unwrap();

        ales.name = "Pale Ales".to_string();
        let result = services.categories.save_category(&ales, Operation::Edit).await;
        assert!(matches!(result, Err(AppError::NotFound(_))));
        assert!(services.categories.find_categories("").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_get_missing_category() {
        let services = memory_services();
        let result = services.categories.get(Uuid::now_v7()).await;
        assert!(matches!(result, Err(AppError::NotFound(_))));
    }
}
