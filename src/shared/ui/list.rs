//! The list page shared by reviews and categories: a search box, a "New"
//! button, a paginated grid with a per-row edit button and an editor dialog.
//!
//! [`ListView`] owns the event routing and the refresh/notify cycle; a
//! [`ListSource`] supplies the entity-specific queries, row shape and wording.

use async_trait::async_trait;
use serde::Serialize;
use uuid::Uuid;

use crate::core::error::{AppError, Result};
use crate::shared::templates::render_template;
use crate::shared::ui::dialog::{DialogOutcome, DialogSnapshot, EditorDialog, Operation};
use crate::shared::ui::grid::{PaginatedGrid, Paginator};
use crate::shared::ui::notification::Notification;
use crate::shared::ui::shortcut::{KeyMatch, Shortcuts};
use crate::shared::ui::view::{View, ViewEvent};

pub const SEARCH_FIELD_ID: &str = "search";

#[async_trait]
pub trait ListSource: Send + Sync + 'static {
    type Item: Clone + Send + Sync + 'static;
    /// Template context for one grid row
    type Row: Serialize;

    /// Header while the search box is empty
    const HEADER: &'static str;
    /// Subject of the notifications ("Beverage successfully added.")
    const SUBJECT: &'static str;
    const TEMPLATE: &'static str;

    fn blank() -> Self::Item;

    fn row(item: &Self::Item) -> Self::Row;

    async fn find(&self, search: &str) -> Result<Vec<Self::Item>>;

    async fn get(&self, id: Uuid) -> Result<Self::Item>;

    async fn save(&self, item: &Self::Item, operation: Operation) -> Result<()>;

    async fn delete(&self, item: &Self::Item) -> Result<()>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Shortcut {
    FocusSearch,
    New,
}

#[derive(Debug, Serialize)]
struct RenderContext<'a, R> {
    header: &'a str,
    search: &'a str,
    search_field_id: &'a str,
    rows: Vec<R>,
    paginator: Paginator,
    dialog: Option<DialogSnapshot>,
}

pub struct ListView<S: ListSource> {
    source: S,
    search: String,
    header: String,
    grid: PaginatedGrid<S::Item>,
    dialog: EditorDialog<S::Item>,
    shortcuts: Shortcuts<Shortcut>,
    focus: Option<String>,
    notification: Option<Notification>,
}

impl<S: ListSource> ListView<S> {
    /// Build the view and fetch the unfiltered list.
    pub async fn new(source: S, dialog: EditorDialog<S::Item>, page_size: usize) -> Result<Self> {
        let mut view = Self {
            source,
            search: String::new(),
            header: String::new(),
            grid: PaginatedGrid::new(page_size),
            dialog,
            shortcuts: Shortcuts::new()
                .bind(KeyMatch::CtrlCode("KeyF"), Shortcut::FocusSearch)
                .bind(KeyMatch::Character('+'), Shortcut::New),
            focus: None,
            notification: None,
        };
        view.update_view().await?;
        Ok(view)
    }

    /// Re-query on every change of the search text and start from page one.
    pub async fn set_search(&mut self, text: impl Into<String>) -> Result<()> {
        self.search = text.into();
        self.grid.reset_page();
        self.update_view().await
    }

    pub async fn open_new(&mut self) -> Result<()> {
        self.ensure_dialog_closed()?;
        self.dialog.open(S::blank(), Operation::Add).await
    }

    /// Reloads the item so the form shows its current state.
    pub async fn open_edit(&mut self, id: Uuid) -> Result<()> {
        self.ensure_dialog_closed()?;
        let item = self.source.get(id).await?;
        self.dialog.open(item, Operation::Edit).await
    }

    /// Persist an item coming out of the dialog.
    pub async fn save_update(&mut self, item: S::Item, operation: Operation) -> Result<()> {
        match self.source.save(&item, operation).await {
            Ok(()) => {
                self.update_view().await?;
                self.notification = Some(Notification::success(format!(
                    "{} successfully {}ed.",
                    S::SUBJECT,
                    operation.name_in_text()
                )));
                Ok(())
            }
            Err(AppError::NotFound(_)) => self.gone().await,
            Err(e) => Err(e),
        }
    }

    pub async fn delete_update(&mut self, item: S::Item) -> Result<()> {
        match self.source.delete(&item).await {
            Ok(()) => {
                self.update_view().await?;
                self.notification = Some(Notification::contrast(format!(
                    "{} successfully deleted.",
                    S::SUBJECT
                )));
                Ok(())
            }
            Err(AppError::NotFound(_)) => self.gone().await,
            Err(e) => Err(e),
        }
    }

    pub fn header(&self) -> &str {
        &self.header
    }

    pub fn grid(&self) -> &PaginatedGrid<S::Item> {
        &self.grid
    }

    pub fn dialog(&self) -> &EditorDialog<S::Item> {
        &self.dialog
    }

    /// The item was deleted elsewhere while the dialog was open.
    async fn gone(&mut self) -> Result<()> {
        self.update_view().await?;
        self.notification = Some(Notification::error(format!(
            "{} no longer exists.",
            S::SUBJECT
        )));
        Ok(())
    }

    async fn update_view(&mut self) -> Result<()> {
        let items = self.source.find(&self.search).await?;
        self.grid.set_items(items);

        self.header = if self.search.is_empty() {
            S::HEADER.to_string()
        } else {
            format!("Search for “{}”", self.search)
        };
        Ok(())
    }

    async fn apply(&mut self, outcome: DialogOutcome<S::Item>) -> Result<()> {
        match outcome {
            DialogOutcome::Save(item, operation) => self.save_update(item, operation).await,
            DialogOutcome::Delete(item) => self.delete_update(item).await,
            DialogOutcome::Invalid | DialogOutcome::AwaitingConfirmation => Ok(()),
        }
    }

    fn ensure_dialog_closed(&self) -> Result<()> {
        if self.dialog.is_open() {
            return Err(AppError::BadRequest(
                "Close the open dialog first".to_string(),
            ));
        }
        Ok(())
    }
}

#[async_trait]
impl<S: ListSource> View for ListView<S> {
    async fn handle(&mut self, event: ViewEvent) -> Result<()> {
        match event {
            ViewEvent::SearchChanged { value } => self.set_search(value).await,
            ViewEvent::PageSelected { page } => {
                self.grid.go_to_page(page);
                Ok(())
            }
            ViewEvent::NewClicked => self.open_new().await,
            ViewEvent::EditClicked { id } => self.open_edit(id).await,
            ViewEvent::Submit { values } => {
                for (field, value) in values {
                    self.dialog.set_field(&field, value)?;
                }
                let outcome = self.dialog.confirm().await?;
                self.apply(outcome).await
            }
            ViewEvent::CancelDialog => {
                self.dialog.close();
                Ok(())
            }
            ViewEvent::DeleteRequested => {
                let outcome = self.dialog.request_delete().await?;
                self.apply(outcome).await
            }
            ViewEvent::ConfirmDelete => {
                let outcome = self.dialog.confirm_delete()?;
                self.apply(outcome).await
            }
            ViewEvent::CancelDelete => self.dialog.cancel_delete(),
            ViewEvent::KeyPressed(press) => match self.shortcuts.resolve(&press) {
                Some(Shortcut::FocusSearch) => {
                    self.focus = Some(SEARCH_FIELD_ID.to_string());
                    Ok(())
                }
                // The "+" may be typed into an open form
                Some(Shortcut::New) if !self.dialog.is_open() => self.open_new().await,
                _ => Ok(()),
            },
        }
    }

    fn render(&self) -> Result<String> {
        let ctx = RenderContext {
            header: &self.header,
            search: &self.search,
            search_field_id: SEARCH_FIELD_ID,
            rows: self.grid.visible_items().iter().map(S::row).collect(),
            paginator: self.grid.paginator(),
            dialog: self.dialog.snapshot(),
        };
        Ok(render_template(S::TEMPLATE, ctx)?)
    }

    fn take_focus(&mut self) -> Option<String> {
        self.focus.take()
    }

    fn take_notification(&mut self) -> Option<Notification> {
        self.notification.take()
    }

    fn notify(&mut self, notification: Notification) {
        self.notification = Some(notification);
    }
}
