//! In-memory storage, used when no database is configured and by the tests.

use std::collections::BTreeMap;

use async_trait::async_trait;
use chrono::{Duration, Utc};
use tokio::sync::RwLock;
use uuid::Uuid;

use super::{contains_ignore_case, Storage};
use crate::core::error::{AppError, Result};
use crate::features::categories::models::Category;
use crate::features::reviews::models::Review;

#[derive(Debug, Clone)]
struct StoredCategory {
    id: Uuid,
    name: String,
}

#[derive(Debug, Clone)]
struct StoredReview {
    id: Uuid,
    name: String,
    score: i32,
    count: i32,
    date: chrono::NaiveDate,
    category_id: Option<Uuid>,
}

#[derive(Debug, Default)]
struct State {
    categories: BTreeMap<Uuid, StoredCategory>,
    reviews: BTreeMap<Uuid, StoredReview>,
}

impl State {
    fn beverage_count(&self, category_id: Uuid) -> i64 {
        self.reviews
            .values()
            .filter(|r| r.category_id == Some(category_id))
            .count() as i64
    }

    fn category(&self, id: Uuid) -> Option<Category> {
        self.categories.get(&id).map(|c| Category {
            id: c.id,
            name: c.name.clone(),
            beverage_count: self.beverage_count(c.id),
        })
    }

    fn review(&self, stored: &StoredReview) -> Review {
        Review {
            id: stored.id,
            name: stored.name.clone(),
            score: stored.score,
            count: stored.count,
            date: stored.date,
            category: stored.category_id.and_then(|id| self.category(id)),
        }
    }

    fn store_category(&mut self, category: &Category) -> Result<Category> {
        if self
            .categories
            .values()
            .any(|c| c.name == category.name && c.id != category.id)
        {
            return Err(AppError::Conflict(format!(
                "Category '{}' already exists",
                category.name
            )));
        }

        self.categories.insert(
            category.id,
            StoredCategory {
                id: category.id,
                name: category.name.clone(),
            },
        );
        self.category(category.id)
            .ok_or_else(|| AppError::Internal("Category vanished after insert".to_string()))
    }

    fn store_review(&mut self, review: &Review) -> Result<Review> {
        let category_id = review.category_id();
        if let Some(id) = category_id {
            if !self.categories.contains_key(&id) {
                return Err(AppError::BadRequest(format!("Category {} does not exist", id)));
            }
        }

        let stored = StoredReview {
            id: review.id,
            name: review.name.clone(),
            score: review.score,
            count: review.count,
            date: review.date,
            category_id,
        };
        self.reviews.insert(review.id, stored);

        // Read back so the embedded category carries the updated beverage count
        self.reviews
            .get(&review.id)
            .map(|r| self.review(r))
            .ok_or_else(|| AppError::Internal("Review vanished after insert".to_string()))
    }
}

#[derive(Debug, Default)]
pub struct MemoryStorage {
    state: RwLock<State>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// A store pre-filled with a few categories and reviews.
    pub fn with_demo_data() -> Self {
        let mut state = State::default();
        let today = Utc::now().date_naive();

        let categories = ["Ales", "Lagers", "Stouts", "Ciders", "Mineral Water"];
        let ids: Vec<Uuid> = categories
            .iter()
            .map(|name| {
                let id = Uuid::now_v7();
                state.categories.insert(
                    id,
                    StoredCategory {
                        id,
                        name: name.to_string(),
                    },
                );
                id
            })
            .collect();

        let reviews = [
            ("Punk IPA", 4, 3, Some(0)),
            ("Orval", 5, 7, Some(0)),
            ("Pilsner Urquell", 4, 12, Some(1)),
            ("Augustiner Helles", 5, 4, Some(1)),
            ("Guinness Draught", 3, 9, Some(2)),
            ("Old Rasputin", 4, 2, Some(2)),
            ("Aspall Dry", 3, 1, Some(3)),
            ("San Pellegrino", 2, 20, Some(4)),
        ];
        for (offset, (name, score, count, category)) in reviews.into_iter().enumerate() {
            let id = Uuid::now_v7();
            state.reviews.insert(
                id,
                StoredReview {
                    id,
                    name: name.to_string(),
                    score,
                    count,
                    date: today - Duration::days(offset as i64 * 3),
                    category_id: category.map(|i| ids[i]),
                },
            );
        }

        Self {
            state: RwLock::new(state),
        }
    }
}

#[async_trait]
impl Storage for MemoryStorage {
    async fn find_categories(&self, filter: &str) -> Result<Vec<Category>> {
        let state = self.state.read().await;
        let mut categories: Vec<Category> = state
            .categories
            .values()
            .filter(|c| contains_ignore_case(&c.name, filter))
            .filter_map(|c| state.category(c.id))
            .collect();
        categories.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(categories)
    }

    async fn get_category(&self, id: Uuid) -> Result<Option<Category>> {
        Ok(self.state.read().await.category(id))
    }

    async fn find_category_by_name(&self, name: &str) -> Result<Option<Category>> {
        let state = self.state.read().await;
        Ok(state
            .categories
            .values()
            .find(|c| c.name == name)
            .and_then(|c| state.category(c.id)))
    }

    async fn insert_category(&self, category: &Category) -> Result<Category> {
        let mut state = self.state.write().await;
        if state.categories.contains_key(&category.id) {
            return Err(AppError::Conflict(format!(
                "Category {} already exists",
                category.id
            )));
        }
        state.store_category(category)
    }

    async fn update_category(&self, category: &Category) -> Result<Category> {
        let mut state = self.state.write().await;
        if !state.categories.contains_key(&category.id) {
            return Err(AppError::NotFound(format!(
                "Category {} not found",
                category.id
            )));
        }
        state.store_category(category)
    }

    async fn delete_category(&self, id: Uuid) -> Result<u64> {
        let mut state = self.state.write().await;
        if state.categories.remove(&id).is_none() {
            return Err(AppError::NotFound(format!("Category {} not found", id)));
        }

        let mut detached = 0;
        for review in state.reviews.values_mut() {
            if review.category_id == Some(id) {
                review.category_id = None;
                detached += 1;
            }
        }
        Ok(detached)
    }

    async fn find_reviews(&self, filter: &str) -> Result<Vec<Review>> {
        let state = self.state.read().await;
        let mut reviews: Vec<Review> = state
            .reviews
            .values()
            .map(|r| state.review(r))
            .filter(|r| {
                contains_ignore_case(&r.name, filter)
                    || r.category
                        .as_ref()
                        .is_some_and(|c| contains_ignore_case(&c.name, filter))
            })
            .collect();
        reviews.sort_by(|a, b| a.name.cmp(&b.name).then(a.id.cmp(&b.id)));
        Ok(reviews)
    }

    async fn get_review(&self, id: Uuid) -> Result<Option<Review>> {
        let state = self.state.read().await;
        Ok(state.reviews.get(&id).map(|r| state.review(r)))
    }

    async fn count_reviews_in_category(&self, category_id: Uuid) -> Result<u64> {
        Ok(self.state.read().await.beverage_count(category_id) as u64)
    }

    async fn insert_review(&self, review: &Review) -> Result<Review> {
        let mut state = self.state.write().await;
        if state.reviews.contains_key(&review.id) {
            return Err(AppError::Conflict(format!(
                "Review {} already exists",
                review.id
            )));
        }
        state.store_review(review)
    }

    async fn update_review(&self, review: &Review) -> Result<Review> {
        let mut state = self.state.write().await;
        if !state.reviews.contains_key(&review.id) {
            return Err(AppError::NotFound(format!("Review {} not found", review.id)));
        }
        state.store_review(review)
    }

    async fn delete_review(&self, id: Uuid) -> Result<()> {
        self.state
            .write()
            .await
            .reviews
            .remove(&id)
            .map(|_| ())
            .ok_or_else(|| AppError::NotFound(format!("Review {} not found", id)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn review(name: &str, category: Option<Category>) -> Review {
        Review {
            name: name.to_string(),
            score: 4,
            count: 1,
            category,
            ..Review::blank()
        }
    }

    #[tokio::test]
    async fn test_category_names_are_unique() {
        let storage = MemoryStorage::new();
        storage.insert_category(&Category::new("Ales")).await.unwrap();

        let result = storage.insert_category(&Category::new("Ales")).await;
        assert!(matches!(result, Err(AppError::Conflict(_))));

        // Different case is a different name
        assert!(storage.insert_category(&Category::new("ales")).await.is_ok());
    }

    #[tokio::test]
    async fn test_renaming_category_keeps_identity() {
        let storage = MemoryStorage::new();
        let mut ales = storage.insert_category(&Category::new("Ales")).await.unwrap();
        ales.name = "Pale Ales".to_string();
        storage.update_category(&ales).await.unwrap();

        let all = storage.find_categories("").await.unwrap();
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].name, "Pale Ales");
    }

    #[tokio::test]
    async fn test_deleting_category_detaches_reviews() {
        let storage = MemoryStorage::new();
        let ales = storage.insert_category(&Category::new("Ales")).await.unwrap();
        let lagers = storage.insert_category(&Category::new("Lagers")).await.unwrap();
        storage.insert_review(&review("IPA #1", Some(ales.clone()))).await.unwrap();
        storage.insert_review(&review("IPA #2", Some(ales.clone()))).await.unwrap();
        storage.insert_review(&review("Helles", Some(lagers.clone()))).await.unwrap();

        assert_eq!(storage.count_reviews_in_category(ales.id).await.unwrap(), 2);
        assert_eq!(storage.delete_category(ales.id).await.unwrap(), 2);

        let reviews = storage.find_reviews("").await.unwrap();
        let detached: Vec<_> = reviews.iter().filter(|r| r.category.is_none()).collect();
        assert_eq!(detached.len(), 2);
        assert_eq!(
            storage.get_category(lagers.id).await.unwrap().unwrap().beverage_count,
            1
        );
    }

    #[tokio::test]
    async fn test_review_search_matches_name_or_category() {
        let storage = MemoryStorage::new();
        let stouts = storage.insert_category(&Category::new("Stouts")).await.unwrap();
        storage.insert_review(&review("IPA #1", None)).await.unwrap();
        storage.insert_review(&review("Guinness", Some(stouts))).await.unwrap();

        assert_eq!(storage.find_reviews("").await.unwrap().len(), 2);
        assert_eq!(storage.find_reviews("ipa").await.unwrap()[0].name, "IPA #1");
        assert_eq!(storage.find_reviews("STOUT").await.unwrap()[0].name, "Guinness");
        assert!(storage.find_reviews("porter").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_review_with_unknown_category_is_rejected() {
        let storage = MemoryStorage::new();
        let ghost = Category::new("Ghost");
        let result = storage.insert_review(&review("Phantom", Some(ghost))).await;
        assert!(matches!(result, Err(AppError::BadRequest(_))));
    }

    #[tokio::test]
    async fn test_updating_a_deleted_entity_does_not_recreate_it() {
        let storage = MemoryStorage::new();
        let ales = storage.insert_category(&Category::new("Ales")).await.unwrap();
        let orval = storage.insert_review(&review("Orval", None)).await.unwrap();
        storage.delete_category(ales.id).await.unwrap();
        storage.delete_review(orval.id).await.unwrap();

        let result = storage.update_category(&ales).await;
        assert!(matches!(result, Err(AppError::NotFound(_))));
        let result = storage.update_review(&orval).await;
        assert!(matches!(result, Err(AppError::NotFound(_))));
        assert!(storage.find_categories("").await.unwrap().is_empty());
        assert!(storage.find_reviews("").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_demo_data_is_consistent() {
        let storage = MemoryStorage::with_demo_data();
        let categories = storage.find_categories("").await.unwrap();
        let reviews = storage.find_reviews("").await.unwrap();

        let total: i64 = categories.iter().map(|c| c.beverage_count).sum();
        assert_eq!(total as usize, reviews.len());
    }
}
