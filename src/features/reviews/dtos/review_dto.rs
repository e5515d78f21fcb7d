use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::{Validate, ValidationError};

use crate::features::reviews::models::Review;
use crate::shared::constants::REVIEW_NAME_TOO_SHORT;
use crate::shared::validation::{check_name, into_validation_error};

fn validate_review_name(name: &str) -> Result<(), ValidationError> {
    into_validation_error(check_name(name, REVIEW_NAME_TOO_SHORT))
}

/// Request DTO for creating or updating a review
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ReviewRequestDto {
    /// Beverage name, 3 to 255 printable characters after trimming
    #[validate(custom(function = "validate_review_name"))]
    pub name: String,

    #[validate(range(min = 1, max = 5, message = "The rating must be between 1 and 5"))]
    pub score: i32,

    #[validate(range(
        min = 1,
        max = 99,
        message = "The number of times tasted must be between 1 and 99"
    ))]
    pub count: i32,

    /// Omit to leave the review "undefined"
    pub category_id: Option<Uuid>,
}

/// Response DTO for review
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ReviewResponseDto {
    pub id: Uuid,
    pub name: String,
    pub score: i32,
    pub count: i32,
    pub date: NaiveDate,
    pub category_id: Option<Uuid>,
    /// Category name, or "undefined" when the review has none
    pub category_name: String,
}

impl From<Review> for ReviewResponseDto {
    fn from(r: Review) -> Self {
        Self {
            id: r.id,
            category_id: r.category_id(),
            category_name: r.category_name().to_string(),
            name: r.name,
            score: r.score,
            count: r.count,
            date: r.date,
        }
    }
}
