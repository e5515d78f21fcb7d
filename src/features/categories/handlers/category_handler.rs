use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use uuid::Uuid;
use validator::Validate;

use crate::core::error::{AppError, Result};
use crate::core::extractor::AppJson;
use crate::features::categories::dtos::{
    CategoryRequestDto, CategoryResponseDto, DeleteCategoryResponseDto,
};
use crate::features::categories::models::Category;
use crate::features::AppServices;
use crate::shared::types::{ApiResponse, ListQuery, Meta};
use crate::shared::ui::Operation;

fn validated(dto: CategoryRequestDto) -> Result<CategoryRequestDto> {
    let dto = CategoryRequestDto {
        name: dto.name.trim().to_string(),
    };
    dto.validate().map_err(|e| AppError::Fields(e.into()))?;
    Ok(dto)
}

/// List categories
///
/// `search` filters by a case-insensitive substring of the name.
#[utoipa::path(
    get,
    path = "/api/categories",
    params(ListQuery),
    responses(
        (status = 200, description = "List of categories", body = ApiResponse<Vec<CategoryResponseDto>>),
    ),
    tag = "categories"
)]
pub async fn list_categories(
    State(services): State<AppServices>,
    Query(query): Query<ListQuery>,
) -> Result<Json<ApiResponse<Vec<CategoryResponseDto>>>> {
    let categories = services.categories.find_categories(&query.search).await?;
    let total = categories.len() as i64;
    let items = query
        .apply(categories)
        .into_iter()
        .map(CategoryResponseDto::from)
        .collect();

    Ok(Json(ApiResponse::success(
        Some(items),
        None,
        Some(Meta { total }),
    )))
}

/// Get category by id
#[utoipa::path(
    get,
    path = "/api/categories/{id}",
    params(
        ("id" = Uuid, Path, description = "Category ID")
    ),
    responses(
        (status = 200, description = "Category found", body = ApiResponse<CategoryResponseDto>),
        (status = 404, description = "Category not found")
    ),
    tag = "categories"
)]
pub async fn get_category(
    State(services): State<AppServices>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<CategoryResponseDto>>> {
    let category = services.categories.get(id).await?;
    Ok(Json(ApiResponse::success(Some(category.into()), None, None)))
}

/// Create a category
#[utoipa::path(
    post,
    path = "/api/categories",
    request_body = CategoryRequestDto,
    responses(
        (status = 201, description = "Category created", body = ApiResponse<CategoryResponseDto>),
        (status = 400, description = "Validation error"),
        (status = 409, description = "Category name already taken")
    ),
    tag = "categories"
)]
pub async fn create_category(
    State(services): State<AppServices>,
    AppJson(dto): AppJson<CategoryRequestDto>,
) -> Result<(StatusCode, Json<ApiResponse<CategoryResponseDto>>)> {
    let dto = validated(dto)?;
    let category = services
        .categories
        .save_category(&Category::new(dto.name), Operation::Add)
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(
            Some(category.into()),
            Some("Category successfully added.".to_string()),
            None,
        )),
    ))
}

/// Rename a category
#[utoipa::path(
    put,
    path = "/api/categories/{id}",
    params(
        ("id" = Uuid, Path, description = "Category ID")
    ),
    request_body = CategoryRequestDto,
    responses(
        (status = 200, description = "Category updated", body = ApiResponse<CategoryResponseDto>),
        (status = 400, description = "Validation error"),
        (status = 404, description = "Category not found"),
        (status = 409, description = "Category name already taken")
    ),
    tag = "categories"
)]
pub async fn update_category(
    State(services): State<AppServices>,
    Path(id): Path<Uuid>,
    AppJson(dto): AppJson<CategoryRequestDto>,
) -> Result<Json<ApiResponse<CategoryResponseDto>>> {
    let dto = validated(dto)?;
    let existing = services.categories.get(id).await?;
    let category = services
        .categories
        .save_category(
            &Category {
                name: dto.name,
                ..existing
            },
            Operation::Edit,
        )
        .await?;

    Ok(Json(ApiResponse::success(
        Some(category.into()),
        Some("Category successfully edited.".to_string()),
        None,
    )))
}

/// Delete a category
///
/// Reviews filed under it are kept and become "undefined".
#[utoipa::path(
    delete,
    path = "/api/categories/{id}",
    params(
        ("id" = Uuid, Path, description = "Category ID")
    ),
    responses(
        (status = 200, description = "Category deleted", body = ApiResponse<DeleteCategoryResponseDto>),
        (status = 404, description = "Category not found")
    ),
    tag = "categories"
)]
pub async fn delete_category(
    State(services): State<AppServices>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<DeleteCategoryResponseDto>>> {
    let category = services.categories.get(id).await?;
    let detached_reviews = services.categories.delete_category(&category).await?;

    Ok(Json(ApiResponse::success(
        Some(DeleteCategoryResponseDto {
            id,
            detached_reviews,
        }),
        Some("Category successfully deleted.".to_string()),
        None,
    )))
}

#[cfg(test)]
mod tests {
    use axum::{routing::get, Router};
    use axum_test::TestServer;
    use serde_json::{json, Value};

    use super::*;
    use crate::shared::test_helpers::{memory_services, sample_review};

    fn server(services: AppServices) -> TestServer {
        let app = Router::new()
            .route(
                "/api/categories",
                get(list_categories).post(create_category),
            )
            .route(
                "/api/categories/{id}",
                get(get_category)
                    .put(update_category)
                    .delete(delete_category),
            )
            .with_state(services);
        TestServer::new(app).unwrap()
    }

    #[tokio::test]
    async fn test_create_list_and_search() {
        let server = server(memory_services());

        for name in ["Ales", "Lagers", "Pale Ales"] {
            server
                .post("/api/categories")
                .json(&json!({ "name": name }))
                .await
                .assert_status(StatusCode::CREATED);
        }

        let body: Value = server
            .get("/api/categories")
            .add_query_param("search", "ALE")
            .await
            .json();
        assert_eq!(body["meta"]["total"], 2);
        assert_eq!(body["data"][0]["name"], "Ales");
        assert_eq!(body["data"][0]["beverageCount"], 0);
    }

    #[tokio::test]
    async fn test_create_rejects_short_and_duplicate_names() {
        let server = server(memory_services());

        let response = server
            .post("/api/categories")
            .json(&json!({ "name": "  Al  " }))
            .await;
        response.assert_status_bad_request();
        let body: Value = response.json();
        assert_eq!(
            body["errors"][0],
            "Category name must contain at least 3 printable characters"
        );

        server
            .post("/api/categories")
            .json(&json!({ "name": "Ales" }))
            .await
            .assert_status(StatusCode::CREATED);
        server
            .post("/api/categories")
            .json(&json!({ "name": "Ales" }))
            .await
            .assert_status(StatusCode::CONFLICT);
    }

    #[tokio::test]
    async fn test_name_rule_matches_the_dialog() {
        let services = memory_services();
        let server = server(services.clone());

        // The bell character is not printable, leaving two characters
        let response = server
            .post("/api/categories")
            .json(&json!({ "name": "A\u{7}l" }))
            .await;
        response.assert_status_bad_request();
        let body: Value = response.json();
        assert_eq!(
            body["errors"][0],
            "Category name must contain at least 3 printable characters"
        );

        let response = server
            .post("/api/categories")
            .json(&json!({ "name": "a".repeat(256) }))
            .await;
        response.assert_status_bad_request();
        assert!(services
            .categories
            .find_categories("")
            .await
            .unwrap()
            .is_empty());
    }

    #[tokio::test]
    async fn test_delete_detaches_reviews() {
        let services = memory_services();
        let ales = services
            .categories
            .save_category(&Category::new("Ales"), Operation::Add)
            .await
            .unwrap();
        services
            .reviews
            .save_review(&sample_review("IPA #1", Some(ales.clone())), Operation::Add)
            .await
            .unwrap();
        let server = server(services.clone());

        let body: Value = server
            .delete(&format!("/api/categories/{}", ales.id))
            .await
            .json();
        assert_eq!(body["data"]["detachedReviews"], 1);

        server
            .get(&format!("/api/categories/{}", ales.id))
            .await
            .assert_status_not_found();
        let reviews = services.reviews.find_reviews("").await.unwrap();
        assert_eq!(reviews[0].category_name(), "undefined");
    }
}
