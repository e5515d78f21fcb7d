use std::sync::Arc;

use chrono::Utc;
use uuid::Uuid;

use crate::core::error::{AppError, Result};
use crate::features::reviews::models::Review;
use crate::modules::storage::Storage;
use crate::shared::ui::Operation;

/// Service for review lookups and mutations
pub struct ReviewService {
    storage: Arc<dyn Storage>,
}

impl ReviewService {
    pub fn new(storage: Arc<dyn Storage>) -> Self {
        Self { storage }
    }

    /// Reviews whose name or category name contains `search_text`, ignoring
    /// case. An empty string returns everything.
    pub async fn find_reviews(&self, search_text: &str) -> Result<Vec<Review>> {
        self.storage.find_reviews(search_text.trim()).await
    }

    pub async fn get(&self, id: Uuid) -> Result<Review> {
        self.storage
            .get_review(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Review {} not found", id)))
    }

    pub async fn count_reviews_in_category(&self, category_id: Uuid) -> Result<u64> {
        self.storage.count_reviews_in_category(category_id).await
    }

    /// Create (`Add`) or overwrite (`Edit`) a review, stamping today's date as
    /// the last update. Editing a review that no longer exists is `NotFound`.
    pub async fn save_review(&self, review: &Review, operation: Operation) -> Result<Review> {
        let stamped = Review {
            date: Utc::now().date_naive(),
            ..review.clone()
        };

        let saved = match operation {
            Operation::Add => self.storage.insert_review(&stamped).await?,
            Operation::Edit => self.storage.update_review(&stamped).await?,
        };
        tracing::info!(
            "Review saved: id={}, name={}, category={}",
            saved.id,
            saved.name,
            saved.category_name()
        );
        Ok(saved)
    }

    pub async fn delete_review(&self, review: &Review) -> Result<()> {
        self.storage.delete_review(review.id).await?;
        tracing::info!("Review deleted: id={}, name={}", review.id, review.name);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::test_helpers::{memory_services, sample_review};
    use chrono::NaiveDate;

    #[tokio::test]
    async fn test_save_stamps_last_update() {
        let services = memory_services();
        let mut review = sample_review("Orval", None);
        review.date = NaiveDate::from_ymd_opt(2001, 1, 1).unwrap();

        let saved = services.reviews.save_review(&review, Operation::Add).await.unwrap();
        assert_eq!(saved.date, Utc::now().date_naive());
    }

    #[tokio::test]
    async fn test_empty_search_returns_everything() {
        let services = memory_services();
        for name in ["Orval", "Westmalle Tripel", "Chimay Blue"] {
            services
                .reviews
                .save_review(&sample_review(name, None), Operation::Add)
                .await
                .unwrap();
        }

        assert_eq!(services.reviews.find_reviews("").await.unwrap().len(), 3);
        assert_eq!(services.reviews.find_reviews("  ").await.unwrap().len(), 3);
        let found = services.reviews.find_reviews("tRiPeL").await.unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].name, "Westmalle Tripel");
    }

    #[tokio::test]
    async fn test_editing_deleted_review_is_not_found() {
        let services = memory_services();
        let orval = services
            .reviews
            .save_review(&sample_review("Orval", None), Operation::Add)
            .await
            .unwrap();
        services.reviews.delete_review(&orval).await.unwrap();

        let result = services.reviews.save_review(&orval, Operation::Edit).await;
        assert!(matches!(result, Err(AppError::NotFound(_))));
        assert!(services.reviews.find_reviews("").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_delete_missing_review() {
        let services = memory_services();
        let result = services
            .reviews
            .delete_review(&sample_review("Ghost", None))
            .await;
        assert!(matches!(result, Err(AppError::NotFound(_))));
    }
}
