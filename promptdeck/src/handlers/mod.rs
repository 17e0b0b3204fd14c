//! HTTP handlers and routing
//!
//! Every page interaction targets `/views/{view_id}/...` and answers with
//! the HTML fragment htmx swaps in. Handlers follow one pattern: lock the
//! view, snapshot what the backend call needs, release the lock, await the
//! backend, then lock again to apply the outcome and render.

use std::time::Instant;

use axum::{
    response::Response,
    routing::{get, post},
    Router,
};
use tower::ServiceBuilder;
use tower_http::{limit::RequestBodyLimitLayer, trace::TraceLayer};
use uuid::Uuid;

use crate::error::PromptDeckError;
use crate::state::PromptDeckState;
use crate::template::pages::MainPanel;
use crate::template::HxTemplate;
use crate::views::{GenerateView, SharedView};

pub mod editor;
pub mod generate;
pub mod health;
pub mod pages;
pub mod selector;

/// Result type of fragment handlers
pub type HandlerResult = Result<Response, PromptDeckError>;

/// Build the application router
pub fn router(state: PromptDeckState) -> Router {
    let body_limit = state.config().server.body_limit_bytes;

    Router::new()
        .route("/", get(pages::index))
        .route("/views/{view_id}", get(pages::show))
        .route("/views/{view_id}/templates", get(selector::filter))
        .route("/views/{view_id}/templates/load", post(selector::load))
        .route("/views/{view_id}/select/{template_id}", post(selector::select))
        .route("/views/{view_id}/back", post(selector::back))
        .route("/views/{view_id}/values", post(generate::set_values))
        .route("/views/{view_id}/generate", post(generate::generate))
        .route(
            "/views/{view_id}/copy",
            post(generate::report_copy).get(generate::copy_state),
        )
        .route("/views/{view_id}/editor/new", post(editor::open_create))
        .route("/views/{view_id}/editor/edit", post(editor::open_selected))
        .route(
            "/views/{view_id}/editor/edit/{template_id}",
            post(editor::open_existing),
        )
        .route(
            "/views/{view_id}/editor/variables/add",
            post(editor::add_variable),
        )
        .route(
            "/views/{view_id}/editor/variables/{index}/remove",
            post(editor::remove_variable),
        )
        .route("/views/{view_id}/editor/extract", post(editor::extract))
        .route("/views/{view_id}/editor/save", post(editor::save))
        .route("/views/{view_id}/editor/cancel", post(editor::cancel))
        .route("/views/{view_id}/editor/delete", post(editor::delete))
        .route("/health", get(health::health_check))
        .route("/health/live", get(health::liveness))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(RequestBodyLimitLayer::new(body_limit)),
        )
        .with_state(state)
}

/// Live view for `view_id`
pub(crate) fn lookup(state: &PromptDeckState, view_id: Uuid) -> Result<SharedView, PromptDeckError> {
    state
        .views()
        .get(view_id)
        .ok_or(PromptDeckError::ViewNotFound(view_id))
}

/// Render the main panel, optionally raising an alert
pub(crate) fn main_panel(view_id: Uuid, view: &GenerateView, alert: Option<&str>) -> HandlerResult {
    Ok(MainPanel::new(view_id, view, Instant::now())?.render_fragment(alert))
}
