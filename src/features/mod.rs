//! Feature modules: one folder per entity, each with its models, DTOs,
//! service, editor dialog, list view, handlers and routes.

pub mod categories;
pub mod reviews;

use std::sync::Arc;

use crate::modules::storage::Storage;
use categories::CategoryService;
use reviews::ReviewService;

/// Services shared by every view and API handler
#[derive(Clone)]
pub struct AppServices {
    pub categories: Arc<CategoryService>,
    pub reviews: Arc<ReviewService>,
}

impl AppServices {
    pub fn new(storage: Arc<dyn Storage>) -> Self {
        Self {
            categories: Arc::new(CategoryService::new(Arc::clone(&storage))),
            reviews: Arc::new(ReviewService::new(storage)),
        }
    }
}
