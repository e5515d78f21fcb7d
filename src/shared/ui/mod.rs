//! Building blocks for the server-side views: editor dialog, paginated grid,
//! notifications, keyboard shortcuts, the generic list page, the view
//! instance registry and the page endpoints.

pub mod dialog;
pub mod grid;
pub mod list;
pub mod notification;
pub mod page;
pub mod shortcut;
pub mod view;

pub use dialog::{
    Binder, Binding, Confirmation, DeleteGuard, DeleteImmediately, EditorDialog, FormField,
    Operation, SelectOption,
};
pub use list::{ListSource, ListView};
pub use page::{Page, PageState};
