//! Generic modal editor dialog.
//!
//! An [`EditorDialog`] edits one entity at a time. It does not persist
//! anything itself: `confirm` and the delete path return a [`DialogOutcome`]
//! that the owning view hands to its save/delete handlers.
//!
//! ```text
//! Closed --open--> Open(Add|Edit) --confirm ok--> Closed (Save)
//!                  Open(..)       --confirm err-> Open(..) with field errors
//!                  Open(Edit)     --delete-----> ConfirmingDelete | Closed (Delete)
//! ConfirmingDelete --yes--> Closed (Delete)
//! ConfirmingDelete --no---> Open(Edit)
//! ```

use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::core::error::{AppError, Result};
use crate::shared::validation::{FieldErrors, FormValues};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Operation {
    Add,
    Edit,
}

impl Operation {
    /// Verb used in notifications ("add" -> "added")
    pub fn name_in_text(&self) -> &'static str {
        match self {
            Operation::Add => "add",
            Operation::Edit => "edit",
        }
    }

    pub fn title_prefix(&self) -> &'static str {
        match self {
            Operation::Add => "New",
            Operation::Edit => "Edit",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DialogState {
    Closed,
    Open(Operation),
    ConfirmingDelete,
}

/// Yes/no question shown before a delete goes through.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Confirmation {
    pub title: String,
    pub question: String,
    pub detail: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct SelectOption {
    pub value: String,
    pub label: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FieldKind {
    Text,
    Number,
    ReadOnly,
    Select { options: Vec<SelectOption> },
}

/// One input in the dialog's form layout.
#[derive(Debug, Clone, Serialize)]
pub struct FormField {
    pub name: &'static str,
    pub label: &'static str,
    #[serde(flatten)]
    pub kind: FieldKind,
}

impl FormField {
    pub fn text(name: &'static str, label: &'static str) -> Self {
        Self {
            name,
            label,
            kind: FieldKind::Text,
        }
    }

    pub fn number(name: &'static str, label: &'static str) -> Self {
        Self {
            name,
            label,
            kind: FieldKind::Number,
        }
    }

    pub fn read_only(name: &'static str, label: &'static str) -> Self {
        Self {
            name,
            label,
            kind: FieldKind::ReadOnly,
        }
    }

    pub fn select(name: &'static str, label: &'static str, options: Vec<SelectOption>) -> Self {
        Self {
            name,
            label,
            kind: FieldKind::Select { options },
        }
    }
}

pub enum Binding<T> {
    Valid(T),
    Invalid(FieldErrors),
}

/// Two-way binding between an entity and the dialog's form.
#[async_trait]
pub trait Binder<T: Send + Sync>: Send + Sync {
    /// Form layout for `entity`.
    async fn fields(&self, entity: &T) -> Result<Vec<FormField>>;

    /// Field values shown when `entity` is loaded.
    fn read(&self, entity: &T) -> FormValues;

    /// Run converters and validators, writing the form onto a copy of `entity`.
    async fn write(&self, values: &FormValues, entity: &T, operation: Operation)
        -> Result<Binding<T>>;
}

/// Decides whether deleting an entity needs a confirmation first.
#[async_trait]
pub trait DeleteGuard<T: Send + Sync>: Send + Sync {
    async fn confirmation_for(&self, entity: &T) -> Result<Option<Confirmation>>;
}

/// Delete guard that never asks.
pub struct DeleteImmediately;

#[async_trait]
impl<T: Send + Sync> DeleteGuard<T> for DeleteImmediately {
    async fn confirmation_for(&self, _entity: &T) -> Result<Option<Confirmation>> {
        Ok(None)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DialogOutcome<T> {
    Save(T, Operation),
    Delete(T),
    Invalid,
    AwaitingConfirmation,
}

/// Serializable picture of the dialog for rendering.
#[derive(Debug, Clone, Serialize)]
pub struct DialogSnapshot {
    pub state: DialogState,
    pub title: String,
    pub can_delete: bool,
    pub fields: Vec<FormField>,
    pub values: FormValues,
    pub errors: FieldErrors,
    pub confirmation: Option<Confirmation>,
}

pub struct EditorDialog<T: Send + Sync> {
    entity_label: &'static str,
    binder: Arc<dyn Binder<T>>,
    delete_guard: Arc<dyn DeleteGuard<T>>,
    state: DialogState,
    operation: Operation,
    current: Option<T>,
    fields: Vec<FormField>,
    values: FormValues,
    errors: FieldErrors,
    confirmation: Option<Confirmation>,
}

impl<T: Clone + Send + Sync> EditorDialog<T> {
    pub fn new(
        entity_label: &'static str,
        binder: Arc<dyn Binder<T>>,
        delete_guard: Arc<dyn DeleteGuard<T>>,
    ) -> Self {
        Self {
            entity_label,
            binder,
            delete_guard,
            state: DialogState::Closed,
            operation: Operation::Add,
            current: None,
            fields: Vec::new(),
            values: FormValues::new(),
            errors: FieldErrors::default(),
            confirmation: None,
        }
    }

    /// Load `entity` into the form and show the dialog.
    pub async fn open(&mut self, entity: T, operation: Operation) -> Result<()> {
        self.fields = self.binder.fields(&entity).await?;
        self.values = self.binder.read(&entity);
        self.errors = FieldErrors::default();
        self.confirmation = None;
        self.current = Some(entity);
        self.operation = operation;
        self.state = DialogState::Open(operation);
        Ok(())
    }

    pub fn set_field(&mut self, field: &str, value: impl Into<String>) -> Result<()> {
        self.require_open()?;
        if !self.fields.iter().any(|f| f.name == field) {
            return Err(AppError::BadRequest(format!("Unknown field '{}'", field)));
        }
        self.values.insert(field.to_string(), value.into());
        Ok(())
    }

    /// Validate the form. Errors keep the dialog open.
    pub async fn confirm(&mut self) -> Result<DialogOutcome<T>> {
        let operation = self.require_open()?;
        let current = self.current_item()?;

        match self.binder.write(&self.values, current, operation).await? {
            Binding::Valid(entity) => {
                self.close();
                Ok(DialogOutcome::Save(entity, operation))
            }
            Binding::Invalid(errors) => {
                self.errors = errors;
                Ok(DialogOutcome::Invalid)
            }
        }
    }

    /// Ask the delete guard whether a confirmation is needed first.
    pub async fn request_delete(&mut self) -> Result<DialogOutcome<T>> {
        if self.require_open()? != Operation::Edit {
            return Err(AppError::BadRequest(
                "Only existing items can be deleted".to_string(),
            ));
        }

        let current = self.current_item()?;
        match self.delete_guard.confirmation_for(current).await? {
            Some(confirmation) => {
                self.open_confirmation(confirmation);
                Ok(DialogOutcome::AwaitingConfirmation)
            }
            None => self.do_delete(),
        }
    }

    /// Present a yes/no question in front of the form.
    pub fn open_confirmation(&mut self, confirmation: Confirmation) {
        self.confirmation = Some(confirmation);
        self.state = DialogState::ConfirmingDelete;
    }

    /// "Yes" on the confirmation.
    pub fn confirm_delete(&mut self) -> Result<DialogOutcome<T>> {
        if self.state != DialogState::ConfirmingDelete {
            return Err(AppError::BadRequest("No delete is awaiting confirmation".to_string()));
        }
        self.do_delete()
    }

    /// "No" on the confirmation: back to the form.
    pub fn cancel_delete(&mut self) -> Result<()> {
        if self.state != DialogState::ConfirmingDelete {
            return Err(AppError::BadRequest("No delete is awaiting confirmation".to_string()));
        }
        self.confirmation = None;
        self.state = DialogState::Open(self.operation);
        Ok(())
    }

    pub fn close(&mut self) {
        self.state = DialogState::Closed;
        self.current = None;
        self.fields.clear();
        self.values.clear();
        self.errors = FieldErrors::default();
        self.confirmation = None;
    }

    pub fn state(&self) -> DialogState {
        self.state
    }

    pub fn is_open(&self) -> bool {
        self.state != DialogState::Closed
    }

    pub fn title(&self) -> String {
        format!("{} {}", self.operation.title_prefix(), self.entity_label)
    }

    pub fn errors(&self) -> &FieldErrors {
        &self.errors
    }

    pub fn confirmation(&self) -> Option<&Confirmation> {
        self.confirmation.as_ref()
    }

    pub fn current_item(&self) -> Result<&T> {
        self.current
            .as_ref()
            .ok_or_else(|| AppError::BadRequest("The dialog is not open".to_string()))
    }

    pub fn snapshot(&self) -> Option<DialogSnapshot> {
        if !self.is_open() {
            return None;
        }
        Some(DialogSnapshot {
            state: self.state,
            title: self.title(),
            can_delete: self.operation == Operation::Edit,
            fields: self.fields.clone(),
            values: self.values.clone(),
            errors: self.errors.clone(),
            confirmation: self.confirmation.clone(),
        })
    }

    fn do_delete(&mut self) -> Result<DialogOutcome<T>> {
        let entity = self.current_item()?.clone();
        self.close();
        Ok(DialogOutcome::Delete(entity))
    }

    fn require_open(&self) -> Result<Operation> {
        match self.state {
            DialogState::Open(operation) => Ok(operation),
            DialogState::ConfirmingDelete => Err(AppError::BadRequest(
                "Answer the delete confirmation first".to_string(),
            )),
            DialogState::Closed => Err(AppError::BadRequest("The dialog is not open".to_string())),
        }
    }
}
