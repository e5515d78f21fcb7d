use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use uuid::Uuid;
use validator::Validate;

use crate::core::error::{AppError, Result};
use crate::core::extractor::AppJson;
use crate::features::categories::models::Category;
use crate::features::reviews::dtos::{ReviewRequestDto, ReviewResponseDto};
use crate::features::reviews::models::Review;
use crate::features::AppServices;
use crate::shared::constants::UNKNOWN_CATEGORY;
use crate::shared::types::{ApiResponse, ListQuery, Meta};
use crate::shared::ui::Operation;
use crate::shared::validation::FieldErrors;

/// Validate the request and resolve its category.
async fn bind(
    services: &AppServices,
    dto: ReviewRequestDto,
) -> Result<(ReviewRequestDto, Option<Category>)> {
    let dto = ReviewRequestDto {
        name: dto.name.trim().to_string(),
        ..dto
    };
    dto.validate().map_err(|e| AppError::Fields(e.into()))?;

    let category = match dto.category_id {
        None => None,
        Some(id) => match services.categories.get(id).await {
            Ok(category) => Some(category),
            Err(AppError::NotFound(_)) => {
                let mut errors = FieldErrors::default();
                errors.add("categoryId", UNKNOWN_CATEGORY);
                return Err(AppError::Fields(errors));
            }
            Err(e) => return Err(e),
        },
    };
    Ok((dto, category))
}

/// List reviews
///
/// `search` matches the beverage name or the category name, ignoring case.
#[utoipa::path(
    get,
    path = "/api/reviews",
    params(ListQuery),
    responses(
        (status = 200, description = "List of reviews", body = ApiResponse<Vec<ReviewResponseDto>>),
    ),
    tag = "reviews"
)]
pub async fn list_reviews(
    State(services): State<AppServices>,
    Query(query): Query<ListQuery>,
) -> Result<Json<ApiResponse<Vec<ReviewResponseDto>>>> {
    let reviews = services.reviews.find_reviews(&query.search).await?;
    let total = reviews.len() as i64;
    let items = query
        .apply(reviews)
        .into_iter()
        .map(ReviewResponseDto::from)
        .collect();

    Ok(Json(ApiResponse::success(
        Some(items),
        None,
        Some(Meta { total }),
    )))
}

/// Get review by id
#[utoipa::path(
    get,
    path = "/api/reviews/{id}",
    params(
        ("id" = Uuid, Path, description = "Review ID")
    ),
    responses(
        (status = 200, description = "Review found", body = ApiResponse<ReviewResponseDto>),
        (status = 404, description = "Review not found")
    ),
    tag = "reviews"
)]
pub async fn get_review(
    State(services): State<AppServices>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<ReviewResponseDto>>> {
    let review = services.reviews.get(id).await?;
    Ok(Json(ApiResponse::success(Some(review.into()), None, None)))
}

/// Create a review
///
/// The review date is set to today.
#[utoipa::path(
    post,
    path = "/api/reviews",
    request_body = ReviewRequestDto,
    responses(
        (status = 201, description = "Review created", body = ApiResponse<ReviewResponseDto>),
        (status = 400, description = "Validation error")
    ),
    tag = "reviews"
)]
pub async fn create_review(
    State(services): State<AppServices>,
    AppJson(dto): AppJson<ReviewRequestDto>,
) -> Result<(StatusCode, Json<ApiResponse<ReviewResponseDto>>)> {
    let (dto, category) = bind(&services, dto).await?;
    let review = services
        .reviews
        .save_review(
            &Review {
                name: dto.name,
                score: dto.score,
                count: dto.count,
                category,
                ..Review::blank()
            },
            Operation::Add,
        )
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(
            Some(review.into()),
            Some("Beverage successfully added.".to_string()),
            None,
        )),
    ))
}

/// Update a review
#[utoipa::path(
    put,
    path = "/api/reviews/{id}",
    params(
        ("id" = Uuid, Path, description = "Review ID")
    ),
    request_body = ReviewRequestDto,
    responses(
        (status = 200, description = "Review updated", body = ApiResponse<ReviewResponseDto>),
        (status = 400, description = "Validation error"),
        (status = 404, description = "Review not found")
    ),
    tag = "reviews"
)]
pub async fn update_review(
    State(services): State<AppServices>,
    Path(id): Path<Uuid>,
    AppJson(dto): AppJson<ReviewRequestDto>,
) -> Result<Json<ApiResponse<ReviewResponseDto>>> {
    let existing = services.reviews.get(id).await?;
    let (dto, category) = bind(&services, dto).await?;
    let review = services
        .reviews
        .save_review(
            &Review {
                name: dto.name,
                score: dto.score,
                count: dto.count,
                category,
                ..existing
            },
            Operation::Edit,
        )
        .await?;

    Ok(Json(ApiResponse::success(
        Some(review.into()),
        Some("Beverage successfully edited.".to_string()),
        None,
    )))
}

/// Delete a review
#[utoipa::path(
    delete,
    path = "/api/reviews/{id}",
    params(
        ("id" = Uuid, Path, description = "Review ID")
    ),
    responses(
        (status = 200, description = "Review deleted", body = ApiResponse<ReviewResponseDto>),
        (status = 404, description = "Review not found")
    ),
    tag = "reviews"
)]
pub async fn delete_review(
    State(services): State<AppServices>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<ReviewResponseDto>>> {
    let review = services.reviews.get(id).await?;
    services.reviews.delete_review(&review).await?;

    Ok(Json(ApiResponse::success(
        Some(review.into()),
        Some("Beverage successfully deleted.".to_string()),
        None,
    )))
}

#[cfg(test)]
mod tests {
    use axum::{routing::get, Router};
    use axum_test::TestServer;
    use serde_json::{json, Value};

    use super::*;
    use crate::shared::constants::REVIEW_NAME_TOO_SHORT;
    use crate::shared::test_helpers::memory_services;

    fn server(services: AppServices) -> TestServer {
        let app = Router::new()
            .route("/api/reviews", get(list_reviews).post(create_review))
            .route(
                "/api/reviews/{id}",
                get(get_review).put(update_review).delete(delete_review),
            )
            .with_state(services);
        TestServer::new(app).unwrap()
    }

    #[tokio::test]
    async fn test_create_and_search_by_category_name() {
        let services = memory_services();
        let stouts = services
            .categories
            .save_category(&Category::new("Stouts"), Operation::Add)
            .await
            .unwrap();
        let server = server(services);

        let response = server
            .post("/api/reviews")
            .json(&json!({ "name": " Guinness ", "score": 4, "count": 12, "categoryId": stouts.id }))
            .await;
        response.assert_status(StatusCode::CREATED);
        let body: Value = response.json();
        assert_eq!(body["data"]["name"], "Guinness");
        assert_eq!(body["data"]["categoryName"], "Stouts");
        assert_eq!(body["message"], "Beverage successfully added.");

        server
            .post("/api/reviews")
            .json(&json!({ "name": "Orval", "score": 5, "count": 1 }))
            .await
            .assert_status(StatusCode::CREATED);

        let body: Value = server
            .get("/api/reviews")
            .add_query_param("search", "stout")
            .await
            .json();
        assert_eq!(body["meta"]["total"], 1);
        assert_eq!(body["data"][0]["name"], "Guinness");

        let body: Value = server.get("/api/reviews").await.json();
        assert_eq!(body["meta"]["total"], 2);
        assert_eq!(body["data"][1]["categoryName"], "undefined");
    }

    #[tokio::test]
    async fn test_invalid_review_lists_every_problem() {
        let server = server(memory_services());

        let response = server
            .post("/api/reviews")
            .json(&json!({ "name": "ab", "score": 0, "count": 100 }))
            .await;
        response.assert_status_bad_request();
        let body: Value = response.json();
        let errors = body["errors"].as_array().unwrap();
        assert_eq!(errors.len(), 3);

        let response = server
            .post("/api/reviews")
            .json(&json!({ "name": "O\u{0}v", "score": 3, "count": 1 }))
            .await;
        response.assert_status_bad_request();
        let body: Value = response.json();
        assert_eq!(body["errors"][0], REVIEW_NAME_TOO_SHORT);

        let response = server
            .post("/api/reviews")
            .json(&json!({ "name": "Orval", "score": 3, "count": 1, "categoryId": Uuid::now_v7() }))
            .await;
        response.assert_status_bad_request();
        let body: Value = response.json();
        assert_eq!(body["errors"][0], UNKNOWN_CATEGORY);
    }

    #[tokio::test]
    async fn test_update_and_delete() {
        let services = memory_services();
        let server = server(services.clone());

        let body: Value = server
            .post("/api/reviews")
            .json(&json!({ "name": "Orval", "score": 3, "count": 1 }))
            .await
            .json();
        let id = body["data"]["id"].as_str().unwrap().to_string();

        let body: Value = server
            .put(&format!("/api/reviews/{}", id))
            .json(&json!({ "name": "Orval Trappist", "score": 5, "count": 2 }))
            .await
            .json();
        assert_eq!(body["data"]["name"], "Orval Trappist");
        assert_eq!(body["data"]["id"], id.as_str());

        server
            .delete(&format!("/api/reviews/{}", id))
            .await
            .assert_status_ok();
        server
            .get(&format!("/api/reviews/{}", id))
            .await
            .assert_status_not_found();
        assert!(services.reviews.find_reviews("").await.unwrap().is_empty());
    }
}
