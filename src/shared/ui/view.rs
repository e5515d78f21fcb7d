//! Server-side view instances and the events that drive them.
//!
//! Every page load creates a view instance held in a [`ViewRegistry`]. The
//! browser then posts [`ViewEvent`]s to it one at a time and swaps in the
//! re-rendered HTML from the returned [`ViewUpdate`].

use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::sync::{Mutex, RwLock};
use uuid::Uuid;

use crate::core::error::{AppError, Result};
use crate::shared::constants::GENERIC_FAILURE_MESSAGE;
use crate::shared::ui::notification::Notification;
use crate::shared::ui::shortcut::KeyPress;
use crate::shared::validation::FormValues;

#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ViewEvent {
    SearchChanged {
        value: String,
    },
    PageSelected {
        page: usize,
    },
    NewClicked,
    EditClicked {
        id: Uuid,
    },
    /// Submit the dialog form; `values` are applied before validating
    Submit {
        #[serde(default)]
        values: FormValues,
    },
    CancelDialog,
    DeleteRequested,
    ConfirmDelete,
    CancelDelete,
    KeyPressed(KeyPress),
}

#[derive(Debug, Clone, Serialize)]
pub struct ViewUpdate {
    pub html: String,
    /// Element id the client should focus
    pub focus: Option<String>,
    pub notification: Option<Notification>,
}

#[async_trait]
pub trait View: Send {
    async fn handle(&mut self, event: ViewEvent) -> Result<()>;

    fn render(&self) -> Result<String>;

    /// Pending focus request, cleared on read.
    fn take_focus(&mut self) -> Option<String>;

    /// Pending notification, cleared on read.
    fn take_notification(&mut self) -> Option<Notification>;

    fn notify(&mut self, notification: Notification);
}

/// Apply one event and produce the client update. Service failures become an
/// error notification and the view stays usable; rejected events are
/// returned as errors.
pub async fn dispatch<V: View>(view: &mut V, event: ViewEvent) -> Result<ViewUpdate> {
    match view.handle(event).await {
        Ok(()) => {}
        Err(e @ AppError::BadRequest(_)) => return Err(e),
        Err(e) => {
            tracing::warn!("View event failed: {}", e);
            view.notify(Notification::error(GENERIC_FAILURE_MESSAGE));
        }
    }

    Ok(ViewUpdate {
        html: view.render()?,
        focus: view.take_focus(),
        notification: view.take_notification(),
    })
}

struct Entry<V> {
    view: Arc<Mutex<V>>,
    last_used: Instant,
}

/// Live view instances of one kind, evicted after `ttl` without events.
pub struct ViewRegistry<V> {
    views: RwLock<HashMap<Uuid, Entry<V>>>,
    ttl: Duration,
}

impl<V: View> ViewRegistry<V> {
    pub fn new(ttl: Duration) -> Self {
        Self {
            views: RwLock::new(HashMap::new()),
            ttl,
        }
    }

    pub async fn insert(&self, view: V) -> (Uuid, Arc<Mutex<V>>) {
        let id = Uuid::now_v7();
        let view = Arc::new(Mutex::new(view));

        let mut views = self.views.write().await;
        let before = views.len();
        let ttl = self.ttl;
        views.retain(|_, entry| entry.last_used.elapsed() < ttl);
        if views.len() < before {
            tracing::debug!("Evicted {} idle views", before - views.len());
        }

        views.insert(
            id,
            Entry {
                view: Arc::clone(&view),
                last_used: Instant::now(),
            },
        );
        (id, view)
    }

    pub async fn get(&self, id: Uuid) -> Result<Arc<Mutex<V>>> {
        let mut views = self.views.write().await;
        let Some(entry) = views.get_mut(&id) else {
            return Err(AppError::NotFound(format!("View {} not found", id)));
        };

        if entry.last_used.elapsed() < self.ttl {
            entry.last_used = Instant::now();
            return Ok(Arc::clone(&entry.view));
        }

        views.remove(&id);
        Err(AppError::NotFound(format!("View {} has expired", id)))
    }

    pub async fn len(&self) -> usize {
        self.views.read().await.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct Counter {
        clicks: usize,
        notification: Option<Notification>,
    }

    #[async_trait]
    impl View for Counter {
        async fn handle(&mut self, event: ViewEvent) -> Result<()> {
            match event {
                ViewEvent::NewClicked => {
                    self.clicks += 1;
                    Ok(())
                }
                ViewEvent::DeleteRequested => Err(AppError::Internal("boom".to_string())),
                _ => Err(AppError::BadRequest("unsupported".to_string())),
            }
        }

        fn render(&self) -> Result<String> {
            Ok(format!("<p>{}</p>", self.clicks))
        }

        fn take_focus(&mut self) -> Option<String> {
            None
        }

        fn take_notification(&mut self) -> Option<Notification> {
            self.notification.take()
        }

        fn notify(&mut self, notification: Notification) {
            self.notification = Some(notification);
        }
    }

    #[test]
    fn test_events_deserialize_from_tagged_json() {
        let event: ViewEvent =
            serde_json::from_str(r#"{"type":"search_changed","value":"ipa"}"#).unwrap();
        assert!(matches!(event, ViewEvent::SearchChanged { value } if value == "ipa"));

        let event: ViewEvent =
            serde_json::from_str(r#"{"type":"key_pressed","key":"+","code":"NumpadAdd"}"#)
                .unwrap();
        assert!(matches!(event, ViewEvent::KeyPressed(press) if press.key == "+"));

        let event: ViewEvent = serde_json::from_str(r#"{"type":"submit"}"#).unwrap();
        assert!(matches!(event, ViewEvent::Submit { values } if values.is_empty()));
    }

    #[tokio::test]
    async fn test_dispatch_turns_failures_into_notifications() {
        let mut view = Counter::default();

        let update = dispatch(&mut view, ViewEvent::NewClicked).await.unwrap();
        assert_eq!(update.html, "<p>1</p>");
        assert!(update.notification.is_none());

        let update = dispatch(&mut view, ViewEvent::DeleteRequested).await.unwrap();
        assert_eq!(update.html, "<p>1</p>");
        assert_eq!(
            update.notification.unwrap().text,
            "Something went wrong. Please try again."
        );

        let rejected = dispatch(&mut view, ViewEvent::ConfirmDelete).await;
        assert!(matches!(rejected, Err(AppError::BadRequest(_))));
    }

    #[tokio::test]
    async fn test_registry_lookup_and_expiry() {
        let registry = ViewRegistry::new(Duration::from_secs(60));
        let (id, _) = registry.insert(Counter::default()).await;
        assert!(registry.get(id).await.is_ok());
        assert!(matches!(
            registry.get(Uuid::now_v7()).await,
            Err(AppError::NotFound(_))
        ));

        let expired = ViewRegistry::new(Duration::ZERO);
        let (id, _) = expired.insert(Counter::default()).await;
        assert!(expired.get(id).await.is_err());
        assert_eq!(expired.len().await, 0);
    }
}
