use axum::{
    routing::{get, post},
    Router,
};

use crate::core::config::UiConfig;
use crate::features::reviews::handlers;
use crate::features::reviews::view::ReviewsList;
use crate::features::AppServices;
use crate::shared::ui::{page, PageState};

/// Create routes for the reviews feature: the JSON API and the
/// server-rendered review list page.
pub fn routes(services: AppServices, ui: &UiConfig) -> Router {
    let api = Router::new()
        .route(
            "/api/reviews",
            get(handlers::list_reviews).post(handlers::create_review),
        )
        .route(
            "/api/reviews/{id}",
            get(handlers::get_review)
                .put(handlers::update_review)
                .delete(handlers::delete_review),
        )
        .with_state(services.clone());

    let pages = Router::new()
        .route("/reviews", get(page::show::<ReviewsList>))
        .route(
            "/reviews/ui/{view_id}/events",
            post(page::handle_event::<ReviewsList>),
        )
        .with_state(PageState::<ReviewsList>::new(services, ui));

    api.merge(pages)
}
