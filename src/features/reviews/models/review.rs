use chrono::{NaiveDate, Utc};
use serde::Serialize;
use sqlx::FromRow;
use uuid::Uuid;

use crate::features::categories::models::Category;
use crate::shared::constants::UNDEFINED_CATEGORY;

/// A tasting review of one beverage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Review {
    pub id: Uuid,
    pub name: String,
    /// Rating from 1 to 5, 0 while unset
    pub score: i32,
    /// Times tasted, 0 while unset
    pub count: i32,
    /// Date of the last update
    pub date: NaiveDate,
    /// `None` is the "undefined" state left behind by a deleted category
    pub category: Option<Category>,
}

impl Review {
    /// Fresh instance loaded into the editor for ADD.
    pub fn blank() -> Self {
        Self {
            id: Uuid::now_v7(),
            name: String::new(),
            score: 0,
            count: 0,
            date: Utc::now().date_naive(),
            category: None,
        }
    }

    pub fn category_id(&self) -> Option<Uuid> {
        self.category.as_ref().map(|c| c.id)
    }

    /// Category name for display; never fails on a missing reference.
    pub fn category_name(&self) -> &str {
        self.category
            .as_ref()
            .map(|c| c.name.as_str())
            .unwrap_or(UNDEFINED_CATEGORY)
    }
}

/// Flat row as returned by the review/category join
#[derive(Debug, Clone, FromRow)]
pub struct ReviewRow {
    pub id: Uuid,
    pub name: String,
    pub score: i32,
    pub count: i32,
    pub date: NaiveDate,
    pub category_id: Option<Uuid>,
    pub category_name: Option<String>,
    pub category_beverage_count: Option<i64>,
}

impl From<ReviewRow> for Review {
    fn from(row: ReviewRow) -> Self {
        let category = match (row.category_id, row.category_name) {
            (Some(id), Some(name)) => Some(Category {
                id,
                name,
                beverage_count: row.category_beverage_count.unwrap_or(0),
            }),
            _ => None,
        };

        Self {
            id: row.id,
            name: row.name,
            score: row.score,
            count: row.count,
            date: row.date,
            category,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_category_renders_as_undefined() {
        let review = Review::blank();
        assert_eq!(review.category_name(), "undefined");
        assert_eq!(review.category_id(), None);
    }

    #[test]
    fn test_row_without_category_maps_to_undefined() {
        let row = ReviewRow {
            id: Uuid::now_v7(),
            name: "Orval".to_string(),
            score: 5,
            count: 2,
            date: NaiveDate::from_ymd_opt(2024, 5, 1).unwrap(),
            category_id: None,
            category_name: None,
            category_beverage_count: None,
        };
        let review = Review::from(row);
        assert!(review.category.is_none());
        assert_eq!(review.name, "Orval");
    }
}
