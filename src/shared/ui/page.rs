//! HTTP endpoints shared by every server-rendered list page.
//!
//! | Method | Endpoint | Description |
//! |--------|----------|-------------|
//! | GET | `{PATH}` | Create a view instance and render the full page |
//! | POST | `{PATH}/ui/{view_id}/events` | Apply one [`ViewEvent`] and return a [`ViewUpdate`] |

use std::sync::Arc;

use async_trait::async_trait;
use axum::{
    extract::{Path, State},
    response::Html,
    Json,
};
use uuid::Uuid;

use crate::core::config::UiConfig;
use crate::core::error::Result;
use crate::core::extractor::AppJson;
use crate::features::AppServices;
use crate::shared::templates::render_page;
use crate::shared::ui::view::{dispatch, View, ViewEvent, ViewRegistry, ViewUpdate};

/// A view that can be mounted as a page of its own.
#[async_trait]
pub trait Page: View + Sized + 'static {
    const TITLE: &'static str;
    /// Route the page is served from, e.g. `/reviews`
    const PATH: &'static str;

    async fn load(services: &AppServices, page_size: usize) -> Result<Self>;
}

/// Router state for one kind of page.
pub struct PageState<V> {
    pub services: AppServices,
    pub views: Arc<ViewRegistry<V>>,
    pub page_size: usize,
}

impl<V: View> PageState<V> {
    pub fn new(services: AppServices, ui: &UiConfig) -> Self {
        Self {
            services,
            views: Arc::new(ViewRegistry::new(ui.view_ttl)),
            page_size: ui.page_size,
        }
    }
}

impl<V> Clone for PageState<V> {
    fn clone(&self) -> Self {
        Self {
            services: self.services.clone(),
            views: Arc::clone(&self.views),
            page_size: self.page_size,
        }
    }
}

pub fn events_url(path: &str, view_id: Uuid) -> String {
    format!("{}/ui/{}/events", path, view_id)
}

pub async fn show<V: Page>(State(state): State<PageState<V>>) -> Result<Html<String>> {
    let view = V::load(&state.services, state.page_size).await?;
    let body = view.render()?;
    let (view_id, _) = state.views.insert(view).await;
    tracing::debug!(
        "Opened {} view {} ({} live)",
        V::TITLE,
        view_id,
        state.views.len().await
    );

    let page = render_page(V::TITLE, view_id, &events_url(V::PATH, view_id), &body)?;
    Ok(Html(page))
}

pub async fn handle_event<V: Page>(
    State(state): State<PageState<V>>,
    Path(view_id): Path<Uuid>,
    AppJson(event): AppJson<ViewEvent>,
) -> Result<Json<ViewUpdate>> {
    let view = state.views.get(view_id).await?;
    let mut view = view.lock().await;
    let update = dispatch(&mut *view, event).await?;
    Ok(Json(update))
}
