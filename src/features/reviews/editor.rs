//! Editor dialog for reviews.

use std::sync::Arc;

use async_trait::async_trait;
use uuid::Uuid;

use crate::core::error::{AppError, Result};
use crate::features::categories::services::CategoryService;
use crate::features::reviews::models::Review;
use crate::shared::constants::{
    REVIEW_COUNT_OUT_OF_RANGE, REVIEW_NAME_TOO_SHORT, REVIEW_SCORE_OUT_OF_RANGE,
    UNDEFINED_CATEGORY, UNKNOWN_CATEGORY,
};
use crate::shared::ui::{
    Binder, Binding, DeleteImmediately, EditorDialog, FormField, Operation, SelectOption,
};
use crate::shared::validation::{
    check_name, parse_number, trimmed, FieldErrors, FormValues, NumberRange,
};

pub const FIELD_NAME: &str = "name";
pub const FIELD_SCORE: &str = "score";
pub const FIELD_COUNT: &str = "count";
pub const FIELD_CATEGORY: &str = "category";

const SCORE_RANGE: NumberRange<i32> = NumberRange {
    min: 1,
    max: 5,
    message: REVIEW_SCORE_OUT_OF_RANGE,
};

const COUNT_RANGE: NumberRange<i32> = NumberRange {
    min: 1,
    max: 99,
    message: REVIEW_COUNT_OUT_OF_RANGE,
};

/// Reviews are deleted without a confirmation step.
pub fn review_editor(categories: Arc<CategoryService>) -> EditorDialog<Review> {
    EditorDialog::new(
        "review",
        Arc::new(ReviewBinder { categories }),
        Arc::new(DeleteImmediately),
    )
}

pub struct ReviewBinder {
    categories: Arc<CategoryService>,
}

impl ReviewBinder {
    fn required_in_range(
        values: &FormValues,
        field: &str,
        range: &NumberRange<i32>,
    ) -> std::result::Result<i32, String> {
        let value = parse_number::<i32>(values, field, range.message)?
            .ok_or_else(|| range.message.to_string())?;
        range.check(value)?;
        Ok(value)
    }
}

#[async_trait]
impl Binder<Review> for ReviewBinder {
    async fn fields(&self, _entity: &Review) -> Result<Vec<FormField>> {
        let mut options = vec![SelectOption {
            value: String::new(),
            label: UNDEFINED_CATEGORY.to_string(),
        }];
        options.extend(
            self.categories
                .find_categories("")
                .await?
                .into_iter()
                .map(|c| SelectOption {
                    value: c.id.to_string(),
                    label: c.name,
                }),
        );

        Ok(vec![
            FormField::text(FIELD_NAME, "Beverage"),
            FormField::number(FIELD_SCORE, "Rating"),
            FormField::number(FIELD_COUNT, "Times tasted"),
            FormField::select(FIELD_CATEGORY, "Category", options),
        ])
    }

    fn read(&self, entity: &Review) -> FormValues {
        let number = |n: i32| if n == 0 { String::new() } else { n.to_string() };
        FormValues::from([
            (FIELD_NAME.to_string(), entity.name.clone()),
            (FIELD_SCORE.to_string(), number(entity.score)),
            (FIELD_COUNT.to_string(), number(entity.count)),
            (
                FIELD_CATEGORY.to_string(),
                entity
                    .category_id()
                    .map(|id| id.to_string())
                    .unwrap_or_default(),
            ),
        ])
    }

    async fn write(
        &self,
        values: &FormValues,
        entity: &Review,
        _operation: Operation,
    ) -> Result<Binding<Review>> {
        let mut errors = FieldErrors::default();

        let name = trimmed(values, FIELD_NAME);
        errors.check(FIELD_NAME, check_name(&name, REVIEW_NAME_TOO_SHORT));

        let score = Self::required_in_range(values, FIELD_SCORE, &SCORE_RANGE);
        let count = Self::required_in_range(values, FIELD_COUNT, &COUNT_RANGE);

        let raw_category = trimmed(values, FIELD_CATEGORY);
        let category = if raw_category.is_empty() {
            None
        } else {
            match raw_category.parse::<Uuid>() {
                Ok(id) => match self.categories.get(id).await {
                    Ok(category) => Some(category),
                    Err(AppError::NotFound(_)) => {
                        errors.add(FIELD_CATEGORY, UNKNOWN_CATEGORY);
                        None
                    }
                    Err(e) => return Err(e),
                },
                Err(_) => {
                    errors.add(FIELD_CATEGORY, UNKNOWN_CATEGORY);
                    None
                }
            }
        };

        match (score, count) {
            (Ok(score), Ok(count)) if errors.is_empty() => Ok(Binding::Valid(Review {
                name,
                score,
                count,
                category,
                ..entity.clone()
            })),
            (score, count) => {
                errors.check(FIELD_SCORE, score.map(|_| ()));
                errors.check(FIELD_COUNT, count.map(|_| ()));
                Ok(Binding::Invalid(errors))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::categories::models::Category;
    use crate::shared::test_helpers::{memory_services, sample_review};
    use crate::shared::ui::dialog::DialogOutcome;

    #[tokio::test]
    async fn test_blank_review_shows_empty_numbers() {
        let services = memory_services();
        let mut editor = review_editor(services.categories.clone());
        editor.open(Review::blank(), Operation::Add).await.unwrap();

        let snapshot = editor.snapshot().unwrap();
        assert_eq!(snapshot.title, "New review");
        assert_eq!(snapshot.values.get(FIELD_SCORE).map(String::as_str), Some(""));
        assert_eq!(snapshot.values.get(FIELD_CATEGORY).map(String::as_str), Some(""));
        assert!(!snapshot.can_delete);
    }

    #[tokio::test]
    async fn test_every_invalid_field_gets_a_message() {
        let services = memory_services();
        let mut editor = review_editor(services.categories.clone());
        editor.open(Review::blank(), Operation::Add).await.unwrap();
        editor.set_field(FIELD_NAME, "ab").unwrap();
        editor.set_field(FIELD_SCORE, "6").unwrap();
        editor.set_field(FIELD_COUNT, "many").unwrap();
        editor
            .set_field(FIELD_CATEGORY, Uuid::now_v7().to_string())
            .unwrap();

        assert_eq!(editor.confirm().await.unwrap(), DialogOutcome::Invalid);
        let errors = editor.errors();
        assert_eq!(errors.get(FIELD_NAME), Some(REVIEW_NAME_TOO_SHORT));
        assert_eq!(errors.get(FIELD_SCORE), Some(REVIEW_SCORE_OUT_OF_RANGE));
        assert_eq!(errors.get(FIELD_COUNT), Some(REVIEW_COUNT_OUT_OF_RANGE));
        assert_eq!(errors.get(FIELD_CATEGORY), Some(UNKNOWN_CATEGORY));
    }

    #[tokio::test]
    async fn test_valid_form_binds_category() {
        let services = memory_services();
        let ales = services
            .categories
            .save_category(&Category::new("Ales"), Operation::Add)
            .await
            .unwrap();
        let mut editor = review_editor(services.categories.clone());
        editor.open(Review::blank(), Operation::Add).await.unwrap();
        editor.set_field(FIELD_NAME, " IPA #1 ").unwrap();
        editor.set_field(FIELD_SCORE, "4").unwrap();
        editor.set_field(FIELD_COUNT, "2").unwrap();
        editor.set_field(FIELD_CATEGORY, ales.id.to_string()).unwrap();

        match editor.confirm().await.unwrap() {
            DialogOutcome::Save(review, Operation::Add) => {
                assert_eq!(review.name, "IPA #1");
                assert_eq!((review.score, review.count), (4, 2));
                assert_eq!(review.category_name(), "Ales");
            }
            other => panic!("unexpected outcome: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_review_delete_needs_no_confirmation() {
        let services = memory_services();
        let review = services
            .reviews
            .save_review(&sample_review("Orval", None), Operation::Add)
            .await
            .unwrap();
        let mut editor = review_editor(services.categories.clone());
        editor.open(review.clone(), Operation::Edit).await.unwrap();

        assert_eq!(
            editor.request_delete().await.unwrap(),
            DialogOutcome::Delete(review)
        );
    }
}
