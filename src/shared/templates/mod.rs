//! HTML rendering for the server-side views.

pub mod engine;

pub use engine::{render_template, TemplateError};

use minijinja::context;

/// Wrap a rendered view in the page shell that wires browser events back to
/// the view instance.
pub fn render_page(
    title: &str,
    view_id: uuid::Uuid,
    events_url: &str,
    body: &str,
) -> Result<String, TemplateError> {
    render_template(
        "layout.html",
        context! {
            title => title,
            view_id => view_id.to_string(),
            events_url => events_url,
            body => body,
        },
    )
}
