//! Askama rendering with HTMX patterns
//!
//! [`HxTemplate`] turns any askama template into an HTML response, logging
//! and answering 500 when rendering fails. The page and fragment templates
//! themselves live in [`pages`]; their sources are under `templates/`.
//!
//! # Examples
//!
//! ```rust
//! use askama::Template;
//! use promptdeck::template::HxTemplate;
//!
//! #[derive(Template)]
//! #[template(source = "<p>{{ message }}</p>", ext = "html")]
//! struct Notice {
//!     message: String,
//! }
//!
//! let response = Notice { message: "Saved".into() }.render_html();
//! assert_eq!(response.status(), 200);
//! ```

use askama::Template;
use axum::{
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};

use crate::htmx::AlertTrigger;

pub mod pages;

/// Extension trait for Askama templates
pub trait HxTemplate: Template {
    /// Render as HTML response
    fn render_html(&self) -> Response {
        match self.render() {
            Ok(html) => Html(html).into_response(),
            Err(err) => rendering_failed(&err),
        }
    }

    /// Render as HTML response that also raises a browser alert
    fn render_with_alert(&self, message: &str) -> Response {
        match self.render() {
            Ok(html) => (AlertTrigger::new(message), Html(html)).into_response(),
            Err(err) => rendering_failed(&err),
        }
    }

    /// Render as HTML response, raising `alert` when there is one
    fn render_fragment(&self, alert: Option<&str>) -> Response {
        match alert {
            Some(message) => self.render_with_alert(message),
            None => self.render_html(),
        }
    }
}

impl<T: Template> HxTemplate for T {}

fn rendering_failed(err: &askama::Error) -> Response {
    tracing::error!("Template rendering error: {}", err);
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        "Template rendering failed",
    )
        .into_response()
}
