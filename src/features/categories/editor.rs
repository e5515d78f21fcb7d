//! Editor dialog for categories.

use std::sync::Arc;

use async_trait::async_trait;

use crate::core::error::Result;
use crate::features::categories::models::Category;
use crate::features::categories::services::CategoryService;
use crate::features::reviews::services::ReviewService;
use crate::shared::constants::{CATEGORY_NAME_NOT_UNIQUE, CATEGORY_NAME_TOO_SHORT};
use crate::shared::ui::{
    Binder, Binding, Confirmation, DeleteGuard, EditorDialog, FormField, Operation,
};
use crate::shared::validation::{self, trimmed, FieldErrors, FormValues};

pub const FIELD_NAME: &str = "name";
pub const FIELD_BEVERAGES: &str = "beverage_count";

pub fn category_editor(
    categories: Arc<CategoryService>,
    reviews: Arc<ReviewService>,
) -> EditorDialog<Category> {
    EditorDialog::new(
        "category",
        Arc::new(CategoryBinder { categories }),
        Arc::new(CategoryDeleteGuard { reviews }),
    )
}

/// Validates the category name: trim, length, then uniqueness.
pub struct CategoryBinder {
    categories: Arc<CategoryService>,
}

impl CategoryBinder {
    /// Run the name pipeline. `Ok(Err(message))` is a validation failure.
    pub async fn check_name(
        &self,
        raw: &str,
        entity: &Category,
        operation: Operation,
    ) -> Result<std::result::Result<String, String>> {
        let name = raw.trim().to_string();
        if let Err(message) = validation::check_name(&name, CATEGORY_NAME_TOO_SHORT) {
            return Ok(Err(message));
        }

        let taken = self
            .categories
            .find_category_by_name(&name)
            .await?
            .is_some_and(|existing| operation == Operation::Add || existing.id != entity.id);
        if taken {
            return Ok(Err(CATEGORY_NAME_NOT_UNIQUE.to_string()));
        }

        Ok(Ok(name))
    }
}

#[async_trait]
impl Binder<Category> for CategoryBinder {
    async fn fields(&self, _entity: &Category) -> Result<Vec<FormField>> {
        Ok(vec![
            FormField::text(FIELD_NAME, "Name"),
            FormField::read_only(FIELD_BEVERAGES, "Beverages"),
        ])
    }

    fn read(&self, entity: &Category) -> FormValues {
        FormValues::from([
            (FIELD_NAME.to_string(), entity.name.clone()),
            (
                FIELD_BEVERAGES.to_string(),
                entity.beverage_count.to_string(),
            ),
        ])
    }

    async fn write(
        &self,
        values: &FormValues,
        entity: &Category,
        operation: Operation,
    ) -> Result<Binding<Category>> {
        let raw = trimmed(values, FIELD_NAME);
        match self.check_name(&raw, entity, operation).await? {
            Ok(name) => Ok(Binding::Valid(Category {
                name,
                ..entity.clone()
            })),
            Err(message) => {
                let mut errors = FieldErrors::default();
                errors.add(FIELD_NAME, message);
                Ok(Binding::Invalid(errors))
            }
        }
    }
}

/// Asks before deleting a category that still has reviews.
pub struct CategoryDeleteGuard {
    reviews: Arc<ReviewService>,
}

#[async_trait]
impl DeleteGuard<Category> for CategoryDeleteGuard {
    async fn confirmation_for(&self, entity: &Category) -> Result<Option<Confirmation>> {
        let review_count = self.reviews.count_reviews_in_category(entity.id).await?;
        if review_count == 0 {
            return Ok(None);
        }

        Ok(Some(Confirmation {
            title: "Delete category".to_string(),
            question: delete_question(&entity.name, review_count),
            detail: "Deleting the category will mark the associated reviews as “undefined”. \
                     You can edit individual reviews to select another category."
                .to_string(),
        }))
    }
}

fn delete_question(name: &str, review_count: u64) -> String {
    let associated = if review_count == 1 {
        "There is 1 review".to_string()
    } else {
        format!("There are {} reviews", review_count)
    };
    format!(
        "Are you sure you want to delete the “{}” category? {} associated with this category.",
        name, associated
    )
}
