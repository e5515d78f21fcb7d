use utoipa::{Modify, OpenApi};

use crate::features::categories::{dtos as categories_dtos, handlers as categories_handlers};
use crate::features::reviews::{dtos as reviews_dtos, handlers as reviews_handlers};
use crate::shared::types::{ApiResponse, Meta};

#[derive(OpenApi)]
#[openapi(
    paths(
        // Categories
        categories_handlers::list_categories,
        categories_handlers::get_category,
        categories_handlers::create_category,
        categories_handlers::update_category,
        categories_handlers::delete_category,
        // Reviews
        reviews_handlers::list_reviews,
        reviews_handlers::get_review,
        reviews_handlers::create_review,
        reviews_handlers::update_review,
        reviews_handlers::delete_review,
    ),
    components(
        schemas(
            // Shared
            Meta,
            // Categories
            categories_dtos::CategoryRequestDto,
            categories_dtos::CategoryResponseDto,
            categories_dtos::DeleteCategoryResponseDto,
            ApiResponse<Vec<categories_dtos::CategoryResponseDto>>,
            ApiResponse<categories_dtos::CategoryResponseDto>,
            ApiResponse<categories_dtos::DeleteCategoryResponseDto>,
            // Reviews
            reviews_dtos::ReviewRequestDto,
            reviews_dtos::ReviewResponseDto,
            ApiResponse<Vec<reviews_dtos::ReviewResponseDto>>,
            ApiResponse<reviews_dtos::ReviewResponseDto>,
        )
    ),
    tags(
        (name = "categories", description = "Beverage categories"),
        (name = "reviews", description = "Beverage reviews"),
    ),
    info(
        title = "Herman API",
        version = "0.1.0",
        description = "Beverage reviews and their categories",
    )
)]
pub struct ApiDoc;

/// Modifier to override OpenAPI info from config
pub struct ApiInfoModifier {
    pub title: String,
    pub version: String,
}

impl Modify for ApiInfoModifier {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        openapi.info.title = self.title.clone();
        openapi.info.version = self.version.clone();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_document_lists_every_api_path() {
        let mut openapi = ApiDoc::openapi();
        ApiInfoModifier {
            title: "Beer Ratings".to_string(),
            version: "2.0.0".to_string(),
        }
        .modify(&mut openapi);

        assert_eq!(openapi.info.title, "Beer Ratings");
        assert_eq!(openapi.info.version, "2.0.0");
        for path in [
            "/api/categories",
            "/api/categories/{id}",
            "/api/reviews",
            "/api/reviews/{id}",
        ] {
            assert!(openapi.paths.paths.contains_key(path), "missing {}", path);
        }
    }
}
