//! PostgreSQL storage, selected when `DATABASE_URL` is set.

use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use super::Storage;
use crate::core::error::{AppError, Result};
use crate::features::categories::models::Category;
use crate::features::reviews::models::{Review, ReviewRow};

const CATEGORY_COLUMNS: &str = r#"
    c.id, c.name,
    (SELECT COUNT(*) FROM reviews r WHERE r.category_id = c.id) AS beverage_count
"#;

const REVIEW_SELECT: &str = r#"
    SELECT r.id, r.name, r.score, r.tasted_count AS count, r.date,
           c.id AS category_id, c.name AS category_name,
           (SELECT COUNT(*) FROM reviews r2 WHERE r2.category_id = c.id) AS category_beverage_count
    FROM reviews r
    LEFT JOIN categories c ON c.id = r.category_id
"#;

/// Convert database error to a more specific AppError
fn handle_db_error(e: sqlx::Error) -> AppError {
    if let sqlx::Error::Database(db_err) = &e {
        // Unique constraint violation
        if db_err.code() == Some(std::borrow::Cow::Borrowed("23505")) {
            return AppError::Conflict("A category with this name already exists.".to_string());
        }

        // Foreign key violation
        if db_err.code() == Some(std::borrow::Cow::Borrowed("23503")) {
            return AppError::BadRequest("Referenced category does not exist.".to_string());
        }
    }

    tracing::error!("Storage query failed: {:?}", e);
    AppError::Database(e)
}

/// Turn user input into an ILIKE pattern matching it as a literal substring
fn like_pattern(filter: &str) -> String {
    let escaped = filter
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_");
    format!("%{}%", escaped)
}

pub struct PostgresStorage {
    pool: PgPool,
}

impl PostgresStorage {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl Storage for PostgresStorage {
    async fn find_categories(&self, filter: &str) -> Result<Vec<Category>> {
        let query = format!(
            "SELECT {} FROM categories c WHERE c.name ILIKE $1 ORDER BY c.name",
            CATEGORY_COLUMNS
        );
        sqlx::query_as::<_, Category>(&query)
            .bind(like_pattern(filter))
            .fetch_all(&self.pool)
            .await
            .map_err(handle_db_error)
    }

    async fn get_category(&self, id: Uuid) -> Result<Option<Category>> {
        let query = format!("SELECT {} FROM categories c WHERE c.id = $1", CATEGORY_COLUMNS);
        sqlx::query_as::<_, Category>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(handle_db_error)
    }

    async fn find_category_by_name(&self, name: &str) -> Result<Option<Category>> {
        let query = format!(
            "SELECT {} FROM categories c WHERE c.name = $1",
            CATEGORY_COLUMNS
        );
        sqlx::query_as::<_, Category>(&query)
            .bind(name)
            .fetch_optional(&self.pool)
            .await
            .map_err(handle_db_error)
    }

    async fn insert_category(&self, category: &Category) -> Result<Category> {
        sqlx::query("INSERT INTO categories (id, name) VALUES ($1, $2)")
            .bind(category.id)
            .bind(&category.name)
            .execute(&self.pool)
            .await
            .map_err(handle_db_error)?;

        self.get_category(category.id)
            .await?
            .ok_or_else(|| AppError::Internal("Category vanished after insert".to_string()))
    }

    async fn update_category(&self, category: &Category) -> Result<Category> {
        let updated = sqlx::query(
            "UPDATE categories SET name = $2, updated_at = NOW() WHERE id = $1",
        )
        .bind(category.id)
        .bind(&category.name)
        .execute(&self.pool)
        .await
        .map_err(handle_db_error)?
        .rows_affected();

        if updated == 0 {
            return Err(AppError::NotFound(format!(
                "Category {} not found",
                category.id
            )));
        }

        self.get_category(category.id)
            .await?
            .ok_or_else(|| AppError::Internal("Category vanished after update".to_string()))
    }

    async fn delete_category(&self, id: Uuid) -> Result<u64> {
        let mut tx = self.pool.begin().await.map_err(handle_db_error)?;

        let detached = sqlx::query(
            "UPDATE reviews SET category_id = NULL, updated_at = NOW() WHERE category_id = $1",
        )
        .bind(id)
        .execute(&mut *tx)
        .await
        .map_err(handle_db_error)?
        .rows_affected();

        let deleted = sqlx::query("DELETE FROM categories WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await
            .map_err(handle_db_error)?
            .rows_affected();

        if deleted == 0 {
            // Dropping the transaction rolls back the detach
            return Err(AppError::NotFound(format!("Category {} not found", id)));
        }

        tx.commit().await.map_err(handle_db_error)?;
        Ok(detached)
    }

    async fn find_reviews(&self, filter: &str) -> Result<Vec<Review>> {
        let query = format!(
            "{} WHERE r.name ILIKE $1 OR c.name ILIKE $1 ORDER BY r.name, r.id",
            REVIEW_SELECT
        );
        let rows = sqlx::query_as::<_, ReviewRow>(&query)
            .bind(like_pattern(filter))
            .fetch_all(&self.pool)
            .await
            .map_err(handle_db_error)?;

        Ok(rows.into_iter().map(Review::from).collect())
    }

    async fn get_review(&self, id: Uuid) -> Result<Option<Review>> {
        let query = format!("{} WHERE r.id = $1", REVIEW_SELECT);
        let row = sqlx::query_as::<_, ReviewRow>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(handle_db_error)?;

        Ok(row.map(Review::from))
    }

    async fn count_reviews_in_category(&self, category_id: Uuid) -> Result<u64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM reviews WHERE category_id = $1")
            .bind(category_id)
            .fetch_one(&self.pool)
            .await
            .map_err(handle_db_error)?;

        Ok(count.max(0) as u64)
    }

    async fn insert_review(&self, review: &Review) -> Result<Review> {
        sqlx::query(
            r#"
            INSERT INTO reviews (id, name, score, tasted_count, date, category_id)
            VALUES ($1, $2, $3, $4, $5, $6)
            "#,
        )
        .bind(review.id)
        .bind(&review.name)
        .bind(review.score)
        .bind(review.count)
        .bind(review.date)
        .bind(review.category_id())
        .execute(&self.pool)
        .await
        .map_err(handle_db_error)?;

        self.get_review(review.id)
            .await?
            .ok_or_else(|| AppError::Internal("Review vanished after insert".to_string()))
    }

    async fn update_review(&self, review: &Review) -> Result<Review> {
        let updated = sqlx::query(
            r#"
            UPDATE reviews SET
                name = $2,
                score = $3,
                tasted_count = $4,
                date = $5,
                category_id = $6,
                updated_at = NOW()
            WHERE id = $1
            "#,
        )
        .bind(review.id)
        .bind(&review.name)
        .bind(review.score)
        .bind(review.count)
        .bind(review.date)
        .bind(review.category_id())
        .execute(&self.pool)
        .await
        .map_err(handle_db_error)?
        .rows_affected();

        if updated == 0 {
            return Err(AppError::NotFound(format!("Review {} not found", review.id)));
        }

        self.get_review(review.id)
            .await?
            .ok_or_else(|| AppError::Internal("Review vanished after update".to_string()))
    }

    async fn delete_review(&self, id: Uuid) -> Result<()> {
        let deleted = sqlx::query("DELETE FROM reviews WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(handle_db_error)?
            .rows_affected();

        if deleted == 0 {
            return Err(AppError::NotFound(format!("Review {} not found", id)));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_like_pattern_escapes_wildcards() {
        assert_eq!(like_pattern(""), "%%");
        assert_eq!(like_pattern("ipa"), "%ipa%");
        assert_eq!(like_pattern("100%_a\\b"), "%100\\%\\_a\\\\b%");
    }
}
