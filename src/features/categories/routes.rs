use axum::{
    routing::{get, post},
    Router,
};

use crate::core::config::UiConfig;
use crate::features::categories::handlers;
use crate::features::categories::view::CategoriesList;
use crate::features::AppServices;
use crate::shared::ui::{page, PageState};

/// Create routes for the categories feature: the JSON API and the
/// server-rendered category list page.
pub fn routes(services: AppServices, ui: &UiConfig) -> Router {
    let api = Router::new()
        .route(
            "/api/categories",
            get(handlers::list_categories).post(handlers::create_category),
        )
        .route(
            "/api/categories/{id}",
            get(handlers::get_category)
                .put(handlers::update_category)
                .delete(handlers::delete_category),
        )
        .with_state(services.clone());

    let pages = Router::new()
        .route("/categories", get(page::show::<CategoriesList>))
        .route(
            "/categories/ui/{view_id}/events",
            post(page::handle_event::<CategoriesList>),
        )
        .with_state(PageState::<CategoriesList>::new(services, ui));

    api.merge(pages)
}
