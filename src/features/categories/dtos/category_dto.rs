use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::{Validate, ValidationError};

use crate::features::categories::models::Category;
use crate::shared::constants::CATEGORY_NAME_TOO_SHORT;
use crate::shared::validation::{check_name, into_validation_error};

fn validate_category_name(name: &str) -> Result<(), ValidationError> {
    into_validation_error(check_name(name, CATEGORY_NAME_TOO_SHORT))
}

/// Request DTO for creating or renaming a category
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CategoryRequestDto {
    /// Unique category name, 3 to 255 printable characters after trimming
    #[validate(custom(function = "validate_category_name"))]
    pub name: String,
}

/// Response DTO for category
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CategoryResponseDto {
    pub id: Uuid,
    pub name: String,
    /// Number of reviews filed under this category
    pub beverage_count: i64,
}

impl From<Category> for CategoryResponseDto {
    fn from(c: Category) -> Self {
        Self {
            id: c.id,
            name: c.name,
            beverage_count: c.beverage_count,
        }
    }
}

/// Response DTO for a deleted category
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DeleteCategoryResponseDto {
    pub id: Uuid,
    /// Reviews whose category is now "undefined"
    pub detached_reviews: u64,
}
