//! Template engine for the server-rendered views, using Jinja2 syntax.
//!
//! Templates live in `templates/views/` and are compiled into the binary so
//! rendering never depends on the working directory. Files ending in `.html`
//! are auto-escaped.

use minijinja::{Environment, Value};
use serde::Serialize;
use std::sync::OnceLock;
use thiserror::Error;

use crate::core::error::AppError;

/// Global template environment
static TEMPLATE_ENV: OnceLock<Environment<'static>> = OnceLock::new();

const TEMPLATES: &[(&str, &str)] = &[
    (
        "layout.html",
        include_str!("../../../templates/views/layout.html"),
    ),
    (
        "dialog.html",
        include_str!("../../../templates/views/dialog.html"),
    ),
    (
        "paginator.html",
        include_str!("../../../templates/views/paginator.html"),
    ),
    (
        "reviews_list.html",
        include_str!("../../../templates/views/reviews_list.html"),
    ),
    (
        "categories_list.html",
        include_str!("../../../templates/views/categories_list.html"),
    ),
];

/// Errors that can occur during template operations
#[derive(Debug, Error)]
pub enum TemplateError {
    #[error("Template '{0}' not found")]
    NotFound(String),

    #[error("Failed to render template: {0}")]
    RenderError(String),
}

impl From<TemplateError> for AppError {
    fn from(e: TemplateError) -> Self {
        AppError::Internal(e.to_string())
    }
}

fn init_environment() -> Environment<'static> {
    let mut env = Environment::new();
    for (name, source) in TEMPLATES {
        if let Err(e) = env.add_template(name, source) {
            tracing::warn!("Failed to load template {}: {}", name, e);
        } else {
            tracing::debug!("Loaded template: {}", name);
        }
    }
    env
}

fn get_environment() -> &'static Environment<'static> {
    TEMPLATE_ENV.get_or_init(init_environment)
}

/// Render `template_name` with any serializable context.
pub fn render_template<S: Serialize>(template_name: &str, ctx: S) -> Result<String, TemplateError> {
    let template = get_environment()
        .get_template(template_name)
        .map_err(|_| TemplateError::NotFound(template_name.to_string()))?;

    template
        .render(Value::from_serialize(&ctx))
        .map_err(|e| TemplateError::RenderError(e.to_string()))
}
