//! Full page handlers

use std::time::Instant;

use axum::{
    extract::{Path, State},
    response::{IntoResponse, Redirect},
};
use uuid::Uuid;

use super::{lookup, main_panel, HandlerResult};
use crate::error::PromptDeckError;
use crate::htmx::HxRequest;
use crate::state::PromptDeckState;
use crate::template::pages::IndexPage;
use crate::template::HxTemplate;

/// Mount a fresh view and render the whole page
pub async fn index(State(state): State<PromptDeckState>) -> HandlerResult {
    let view_id = state.views().open(state.new_view());
    let shared = lookup(&state, view_id)?;
    let page = IndexPage::new(view_id, &shared.lock(), Instant::now())?;
    Ok(page.render_html())
}

/// Re-render an existing view
///
/// htmx requests get the main panel only. A browser navigating to an
/// expired view is sent back to `/` for a fresh one.
pub async fn show(
    State(state): State<PromptDeckState>,
    HxRequest(is_htmx): HxRequest,
    Path(view_id): Path<Uuid>,
) -> HandlerResult {
    let shared = match lookup(&state, view_id) {
        Ok(shared) => shared,
        Err(PromptDeckError::ViewNotFound(_)) if !is_htmx => {
            return Ok(Redirect::to("/").into_response());
        }
        Err(error) => return Err(error),
    };

    let view = shared.lock();
    if is_htmx {
        return main_panel(view_id, &view, None);
    }
    let page = IndexPage::new(view_id, &view, Instant::now())?;
    Ok(page.render_html())
}
