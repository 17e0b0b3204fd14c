//! Variable values, generation and copy feedback

use std::time::Instant;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Form,
};
use serde::Deserialize;
use uuid::Uuid;

use super::{lookup, HandlerResult};
use crate::error::ViewError;
use crate::state::PromptDeckState;
use crate::template::pages::{CopyButton, ResultPanel};
use crate::template::HxTemplate;
use crate::views::{CopyOutcome, GenerateView};

/// Copy outcome reported by the browser
#[derive(Debug, Deserialize)]
pub struct CopyReport {
    /// Whether the clipboard write succeeded
    pub outcome: CopyOutcome,
}

fn apply_values(view: &mut GenerateView, pairs: Vec<(String, String)>) -> Result<(), ViewError> {
    for (name, value) in pairs {
        view.set_value(&name, &value)?;
    }
    Ok(())
}

/// Single change handler for variable inputs
pub async fn set_values(
    State(state): State<PromptDeckState>,
    Path(view_id): Path<Uuid>,
    Form(pairs): Form<Vec<(String, String)>>,
) -> HandlerResult {
    let shared = lookup(&state, view_id)?;
    apply_values(&mut shared.lock(), pairs)?;
    Ok(StatusCode::NO_CONTENT.into_response())
}

/// Generate the selected template with the submitted values
///
/// A failed call keeps the previous result on screen and raises an alert.
pub async fn generate(
    State(state): State<PromptDeckState>,
    Path(view_id): Path<Uuid>,
    Form(pairs): Form<Vec<(String, String)>>,
) -> HandlerResult {
    let shared = lookup(&state, view_id)?;
    let request = {
        let mut view = shared.lock();
        apply_values(&mut view, pairs)?;
        view.begin_generation()?
    };
    tracing::info!(%view_id, template_id = %request.template_id, "generating");

    let outcome = state.api().generate(&request).await;

    let mut view = shared.lock();
    let alert = view.finish_generation(outcome);
    let selection = view.selection().ok_or(ViewError::NoSelection)?;
    Ok(ResultPanel::new(view_id, selection, Instant::now())?.render_fragment(alert))
}

/// Record the clipboard outcome and re-render the copy control
pub async fn report_copy(
    State(state): State<PromptDeckState>,
    Path(view_id): Path<Uuid>,
    Form(report): Form<CopyReport>,
) -> HandlerResult {
    let shared = lookup(&state, view_id)?;
    let mut view = shared.lock();
    let now = Instant::now();
    let alert = view.record_copy(report.outcome, now)?;
    let selection = view.selection().ok_or(ViewError::NoSelection)?;
    Ok(CopyButton::new(view_id, selection, now).render_fragment(alert))
}

/// Current copy control, polled when the indicator should revert
pub async fn copy_state(
    State(state): State<PromptDeckState>,
    Path(view_id): Path<Uuid>,
) -> HandlerResult {
    let shared = lookup(&state, view_id)?;
    let view = shared.lock();
    let selection = view.selection().ok_or(ViewError::NoSelection)?;
    Ok(CopyButton::new(view_id, selection, Instant::now()).render_html())
}
