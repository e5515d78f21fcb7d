//! The review list page: search box, "New Review" button, paginated grid with
//! a per-row edit button, and the review editor dialog.

use std::sync::Arc;

use async_trait::async_trait;
use serde::Serialize;
use uuid::Uuid;

use crate::core::error::Result;
use crate::features::reviews::editor::review_editor;
use crate::features::reviews::models::Review;
use crate::features::reviews::services::ReviewService;
use crate::features::AppServices;
use crate::shared::ui::{ListSource, ListView, Operation, Page};

pub const TITLE: &str = "Review List";

#[derive(Debug, Serialize)]
pub struct ReviewRow {
    id: Uuid,
    name: String,
    category: String,
    undefined_category: bool,
    score: i32,
    date: String,
}

/// Reviews as seen by the list page.
pub struct ReviewSource {
    reviews: Arc<ReviewService>,
}

#[async_trait]
impl ListSource for ReviewSource {
    type Item = Review;
    type Row = ReviewRow;

    const HEADER: &'static str = "Reviews";
    const SUBJECT: &'static str = "Beverage";
    const TEMPLATE: &'static str = "reviews_list.html";

    fn blank() -> Review {
        Review::blank()
    }

    fn row(review: &Review) -> ReviewRow {
        ReviewRow {
            id: review.id,
            name: review.name.clone(),
            category: review.category_name().to_string(),
            undefined_category: review.category.is_none(),
            score: review.score,
            date: review.date.format("%Y-%m-%d").to_string(),
        }
    }

    async fn find(&self, search: &str) -> Result<Vec<Review>> {
        self.reviews.find_reviews(search).await
    }

    async fn get(&self, id: Uuid) -> Result<Review> {
        self.reviews.get(id).await
    }

    async fn save(&self, review: &Review, operation: Operation) -> Result<()> {
        self.reviews.save_review(review, operation).await.map(|_| ())
    }

    async fn delete(&self, review: &Review) -> Result<()> {
        self.reviews.delete_review(review).await
    }
}

pub type ReviewsList = ListView<ReviewSource>;

#[async_trait]
impl Page for ReviewsList {
    const TITLE: &'static str = TITLE;
    const PATH: &'static str = "/reviews";

    async fn load(services: &AppServices, page_size: usize) -> Result<Self> {
        let source = ReviewSource {
            reviews: Arc::clone(&services.reviews),
        };
        let dialog = review_editor(Arc::clone(&services.categories));
        ListView::new(source, dialog, page_size).await
    }
}
