//! The category list page. Same layout as the review list: a filter box, a
//! "New Category" button and a paginated grid of categories with their
//! beverage counts.

use std::sync::Arc;

use async_trait::async_trait;
use serde::Serialize;
use uuid::Uuid;

use crate::core::error::Result;
use crate::features::categories::editor::category_editor;
use crate::features::categories::models::Category;
use crate::features::categories::services::CategoryService;
use crate::features::AppServices;
use crate::shared::ui::{ListSource, ListView, Operation, Page};

pub const TITLE: &str = "Category List";

#[derive(Debug, Serialize)]
pub struct CategoryRow {
    id: Uuid,
    name: String,
    beverage_count: i64,
}

pub struct CategorySource {
    categories: Arc<CategoryService>,
}

#[async_trait]
impl ListSource for CategorySource {
    type Item = Category;
    type Row = CategoryRow;

    const HEADER: &'static str = "Categories";
    const SUBJECT: &'static str = "Category";
    const TEMPLATE: &'static str = "categories_list.html";

    fn blank() -> Category {
        Category::blank()
    }

    fn row(category: &Category) -> CategoryRow {
        CategoryRow {
            id: category.id,
            name: category.name.clone(),
            beverage_count: category.beverage_count,
        }
    }

    async fn find(&self, filter: &str) -> Result<Vec<Category>> {
        self.categories.find_categories(filter).await
    }

    /// Reloads the category so the beverage count is current.
    async fn get(&self, id: Uuid) -> Result<Category> {
        self.categories.get(id).await
    }

    async fn save(&self, category: &Category, operation: Operation) -> Result<()> {
        self.categories
            .save_category(category, operation)
            .await
            .map(|_| ())
    }

    async fn delete(&self, category: &Category) -> Result<()> {
        self.categories.delete_category(category).await.map(|_| ())
    }
}

pub type CategoriesList = ListView<CategorySource>;

#[async_trait]
impl Page for CategoriesList {
    const TITLE: &'static str = TITLE;
    const PATH: &'static str = "/categories";

    async fn load(services: &AppServices, page_size: usize) -> Result<Self> {
        let source = CategorySource {
            categories: Arc::clone(&services.categories),
        };
        let dialog = category_editor(
            Arc::clone(&services.categories),
            Arc::clone(&services.reviews),
        );
        ListView::new(source, dialog, page_size).await
    }
}
