//! Storage backends for categories and reviews
//!
//! The services only talk to [`Storage`]; which backend sits behind it is
//! decided once at startup. Both backends keep the same invariant: a review
//! either references an existing category or has none, and deleting a
//! category detaches its reviews in the same operation.

mod memory;
mod postgres;

pub use memory::MemoryStorage;
pub use postgres::PostgresStorage;

use async_trait::async_trait;
use uuid::Uuid;

use crate::core::error::Result;
use crate::features::categories::models::Category;
use crate::features::reviews::models::Review;

#[async_trait]
pub trait Storage: Send + Sync {
    /// Categories whose name contains `filter` (case-insensitive), ordered by name.
    async fn find_categories(&self, filter: &str) -> Result<Vec<Category>>;

    async fn get_category(&self, id: Uuid) -> Result<Option<Category>>;

    /// Exact, case-sensitive lookup.
    async fn find_category_by_name(&self, name: &str) -> Result<Option<Category>>;

    /// A name taken by another category is a conflict.
    async fn insert_category(&self, category: &Category) -> Result<Category>;

    /// Rename an existing category. A missing id is `NotFound`; it is never
    /// re-created.
    async fn update_category(&self, category: &Category) -> Result<Category>;

    /// Remove a category, detaching its reviews. Returns how many were detached.
    async fn delete_category(&self, id: Uuid) -> Result<u64>;

    /// Reviews whose name or category name contains `filter` (case-insensitive).
    async fn find_reviews(&self, filter: &str) -> Result<Vec<Review>>;

    async fn get_review(&self, id: Uuid) -> Result<Option<Review>>;

    async fn count_reviews_in_category(&self, category_id: Uuid) -> Result<u64>;

    /// The referenced category must exist.
    async fn insert_review(&self, review: &Review) -> Result<Review>;

    /// Overwrite an existing review. A missing id is `NotFound`.
    async fn update_review(&self, review: &Review) -> Result<Review>;

    async fn delete_review(&self, id: Uuid) -> Result<()>;
}

/// Case-insensitive substring match; an empty needle matches everything.
pub(crate) fn contains_ignore_case(haystack: &str, needle: &str) -> bool {
    needle.is_empty() || haystack.to_lowercase().contains(&needle.to_lowercase())
}
