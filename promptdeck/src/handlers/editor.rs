//! Template editor handlers
//!
//! Editor actions post the whole editor form; the draft is synced from it
//! before the action itself runs, so nothing typed is lost when the panel
//! re-renders.

use axum::{
    extract::{Path, State},
    Form,
};
use uuid::Uuid;

use super::{lookup, main_panel, HandlerResult};
use crate::error::ViewError;
use crate::state::PromptDeckState;
use crate::views::editor::{DELETE_FAILED_MESSAGE, EXTRACT_FAILED_MESSAGE, SAVE_FAILED_MESSAGE};
use crate::views::{EditorFields, GenerateView, TemplateEditor};

type EditorForm = Form<Vec<(String, String)>>;

fn sync(view: &mut GenerateView, pairs: Vec<(String, String)>) -> Result<&mut TemplateEditor, ViewError> {
    let editor = view.editor_mut()?;
    editor.apply_fields(EditorFields::from_pairs(pairs));
    Ok(editor)
}

/// Open an empty editor
pub async fn open_create(
    State(state): State<PromptDeckState>,
    Path(view_id): Path<Uuid>,
) -> HandlerResult {
    let shared = lookup(&state, view_id)?;
    let mut view = shared.lock();
    view.open_create()?;
    main_panel(view_id, &view, None)
}

/// Open the editor on the selected template
pub async fn open_selected(
    State(state): State<PromptDeckState>,
    Path(view_id): Path<Uuid>,
) -> HandlerResult {
    let shared = lookup(&state, view_id)?;
    let mut view = shared.lock();
    view.open_edit_selected()?;
    main_panel(view_id, &view, None)
}

/// Open the editor on a catalog entry
pub async fn open_existing(
    State(state): State<PromptDeckState>,
    Path((view_id, template_id)): Path<(Uuid, String)>,
) -> HandlerResult {
    let shared = lookup(&state, view_id)?;
    let cached = shared.lock().selector().find(&template_id).cloned();
    let template = match cached {
        Some(template) => template,
        None => state.api().get_template(&template_id).await?,
    };

    let mut view = shared.lock();
    view.open_edit(template)?;
    main_panel(view_id, &view, None)
}

/// Append a blank variable row
pub async fn add_variable(
    State(state): State<PromptDeckState>,
    Path(view_id): Path<Uuid>,
    Form(pairs): EditorForm,
) -> HandlerResult {
    let shared = lookup(&state, view_id)?;
    let mut view = shared.lock();
    sync(&mut view, pairs)?.add_variable();
    main_panel(view_id, &view, None)
}

/// Drop a variable row by position
pub async fn remove_variable(
    State(state): State<PromptDeckState>,
    Path((view_id, index)): Path<(Uuid, usize)>,
    Form(pairs): EditorForm,
) -> HandlerResult {
    let shared = lookup(&state, view_id)?;
    let mut view = shared.lock();
    if !sync(&mut view, pairs)?.remove_variable(index) {
        tracing::debug!(%view_id, index, "no variable row to remove");
    }
    main_panel(view_id, &view, None)
}

/// Replace the rows with the names the backend finds in the content
pub async fn extract(
    State(state): State<PromptDeckState>,
    Path(view_id): Path<Uuid>,
    Form(pairs): EditorForm,
) -> HandlerResult {
    let shared = lookup(&state, view_id)?;
    let content = {
        let mut view = shared.lock();
        let checked = sync(&mut view, pairs)?
            .extraction_content()
            .map(str::to_owned);
        match checked {
            Ok(content) => content,
            Err(error) => return main_panel(view_id, &view, Some(&error.to_string())),
        }
    };

    let outcome = state.api().extract_variables(&content).await;

    let mut view = shared.lock();
    match outcome {
        Ok(names) => {
            tracing::debug!(%view_id, count = names.len(), "variables extracted");
            view.editor_mut()?.apply_extracted(names);
            main_panel(view_id, &view, None)
        }
        Err(error) => {
            tracing::error!(%view_id, %error, "variable extraction failed");
            main_panel(view_id, &view, Some(EXTRACT_FAILED_MESSAGE))
        }
    }
}

/// Validate and store the draft
///
/// Validation problems are reported with their own message; backend
/// failures keep the editor open with a generic one.
pub async fn save(
    State(state): State<PromptDeckState>,
    Path(view_id): Path<Uuid>,
    Form(pairs): EditorForm,
) -> HandlerResult {
    let shared = lookup(&state, view_id)?;
    let draft = {
        let mut view = shared.lock();
        sync(&mut view, pairs)?.clone()
    };

    let outcome = draft.save(state.api()).await;

    let mut view = shared.lock();
    match outcome {
        Ok(saved) => {
            view.finish_save(saved)?;
            main_panel(view_id, &view, None)
        }
        Err(error) if error.is_validation() => {
            tracing::debug!(%view_id, %error, "save rejected");
            main_panel(view_id, &view, Some(&error.to_string()))
        }
        Err(error) => {
            tracing::error!(%view_id, %error, "save failed");
            main_panel(view_id, &view, Some(SAVE_FAILED_MESSAGE))
        }
    }
}

/// Close the editor without saving
pub async fn cancel(State(state): State<PromptDeckState>, Path(view_id): Path<Uuid>) -> HandlerResult {
    let shared = lookup(&state, view_id)?;
    let mut view = shared.lock();
    view.cancel_editing()?;
    main_panel(view_id, &view, None)
}

/// Delete the edited template
pub async fn delete(State(state): State<PromptDeckState>, Path(view_id): Path<Uuid>) -> HandlerResult {
    let shared = lookup(&state, view_id)?;
    let template_id = {
        let view = shared.lock();
        let editor = view.editor().ok_or(ViewError::NotEditing)?;
        editor
            .template_id()
            .ok_or(ViewError::NotPersisted)?
            .to_string()
    };

    let outcome = state.api().delete_template(&template_id).await;

    let mut view = shared.lock();
    match outcome {
        Ok(()) => {
            tracing::info!(%view_id, %template_id, "template deleted");
            view.finish_delete()?;
            main_panel(view_id, &view, None)
        }
        Err(error) => {
            tracing::error!(%view_id, %template_id, %error, "delete failed");
            main_panel(view_id, &view, Some(DELETE_FAILED_MESSAGE))
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::api::{MockTemplateApi, TemplateVariable};
    use crate::error::ApiError;
    use crate::testing::{assert_alert, assert_no_alert, template, TestApp};
    use axum::http::StatusCode;

    fn essay() -> crate::api::Template {
        let mut t = template("t1", "Essay");
        t.content = "Write about {{topic}}".into();
        t.variables = vec![TemplateVariable::placeholder("topic", 0)];
        t
    }

    fn editor_form<'a>(name: &'a str, content: &'a str) -> Vec<(&'a str, &'a str)> {
        vec![
            ("name", name),
            ("description", ""),
            ("category", "writing"),
            ("content", content),
            ("is_public", "false"),
        ]
    }

    #[tokio::test]
    async fn test_open_and_cancel() {
        let app = TestApp::new(MockTemplateApi::new());
        let view_id = app.mount_selected(essay());

        let html = app
            .server()
            .post(&format!("/views/{view_id}/editor/edit"))
            .await
            .text();
        assert!(html.contains("Edit template"));
        assert!(html.contains("Write about"));

        let html = app
            .server()
            .post(&format!("/views/{view_id}/editor/cancel"))
            .await
            .text();
        assert!(html.contains("id=\"variable-form\""));
    }

    #[tokio::test]
    async fn test_second_editor_is_rejected() {
        let app = TestApp::new(MockTemplateApi::new());
        let view_id = app.mount();
        app.server()
            .post(&format!("/views/{view_id}/editor/new"))
            .await
            .assert_status_ok();
        let response = app
            .server()
            .post(&format!("/views/{view_id}/editor/new"))
            .await;
        response.assert_status(StatusCode::CONFLICT);
        assert_alert(&response, "already open");
    }

    #[tokio::test]
    async fn test_rows_sync_before_add_and_remove() {
        let app = TestApp::new(MockTemplateApi::new());
        let view_id = app.mount();
        app.server().post(&format!("/views/{view_id}/editor/new")).await;

        let mut form = editor_form("Essay", "Write about {{topic}}");
        app.server()
            .post(&format!("/views/{view_id}/editor/variables/add"))
            .form(&form)
            .await
            .assert_status_ok();

        form.push(("variables.0.name", "topic"));
        let html = app
            .server()
            .post(&format!("/views/{view_id}/editor/variables/add"))
            .form(&form)
            .await
            .text();
        assert!(html.contains("value=\"topic\""));
        assert!(html.contains("name=\"variables.1.name\""));

        let html = app
            .server()
            .post(&format!("/views/{view_id}/editor/variables/0/remove"))
            .form(&form)
            .await
            .text();
        assert!(!html.contains("value=\"topic\""));
        assert!(!html.contains("name=\"variables.1.name\""));
    }

    #[tokio::test]
    async fn test_extract_merges_rows() {
        let mut api = MockTemplateApi::new();
        api.expect_extract_variables()
            .withf(|content| content.contains("{{audience}}"))
            .times(1)
            .returning(|_| Ok(vec!["audience".to_string(), "topic".to_string()]));
        let app = TestApp::new(api);
        let view_id = app.mount_editing(essay());

        let mut form = editor_form("Essay", "For {{audience}}: {{topic}}");
        form.push(("variables.0.name", "topic"));
        form.push(("variables.0.display_name", "Subject"));
        let html = app
            .server()
            .post(&format!("/views/{view_id}/editor/extract"))
            .form(&form)
            .await
            .text();
        assert!(html.contains("value=\"audience\""));
        assert!(html.contains("value=\"Subject\""));
    }

    #[tokio::test]
    async fn test_extract_blank_content_skips_backend() {
        let app = TestApp::new(MockTemplateApi::new());
        let view_id = app.mount_editing(essay());
        let response = app
            .server()
            .post(&format!("/views/{view_id}/editor/extract"))
            .form(&editor_form("Essay", "   "))
            .await;
        response.assert_status_ok();
        assert!(response.headers().contains_key("hx-trigger"));
    }

    #[tokio::test]
    async fn test_extract_failure_alerts() {
        let mut api = MockTemplateApi::new();
        api.expect_extract_variables().returning(|_| {
            Err(ApiError::Status {
                status: StatusCode::BAD_GATEWAY,
                message: None,
            })
        });
        let app = TestApp::new(api);
        let view_id = app.mount_editing(essay());
        let response = app
            .server()
            .post(&format!("/views/{view_id}/editor/extract"))
            .form(&editor_form("Essay", "Write about {{topic}}"))
            .await;
        assert_alert(&response, "Variable extraction failed");
    }

    #[tokio::test]
    async fn test_save_validation_stays_offline() {
        let app = TestApp::new(MockTemplateApi::new());
        let view_id = app.mount();
        app.server().post(&format!("/views/{view_id}/editor/new")).await;

        let response = app
            .server()
            .post(&format!("/views/{view_id}/editor/save"))
            .form(&editor_form("  ", "content"))
            .await;
        assert_alert(&response, "Please fill in the template name and content");

        let mut form = editor_form("Essay", "Write about {{1st}}");
        form.push(("variables.0.name", "1st"));
        app.server()
            .post(&format!("/views/{view_id}/editor/variables/add"))
            .form(&editor_form("Essay", "Write about {{1st}}"))
            .await;
        let response = app
            .server()
            .post(&format!("/views/{view_id}/editor/save"))
            .form(&form)
            .await;
        assert_alert(&response, "Invalid variable names: 1st");
        assert!(response.text().contains("New template"));
    }

    #[tokio::test]
    async fn test_save_updates_and_selects() {
        let mut api = MockTemplateApi::new();
        api.expect_update_template()
            .withf(|id, payload| {
                id.to_string() == "t1"
                    && payload.name == "Essay v2"
                    && payload.category.as_deref() == Some("writing")
            })
            .times(1)
            .returning(|_, _| {
                let mut saved = essay();
                saved.name = "Essay v2".into();
                Ok(saved)
            });
        let app = TestApp::new(api);
        let view_id = app.mount_editing(essay());

        let mut form = editor_form("Essay v2", "Write about {{topic}}");
        form.push(("variables.0.name", "topic"));
        let response = app
            .server()
            .post(&format!("/views/{view_id}/editor/save"))
            .form(&form)
            .await;
        response.assert_status_ok();
        assert_no_alert(&response);
        assert!(response.text().contains("id=\"variable-form\""));
        assert!(response.text().contains("Essay v2"));
    }

    #[tokio::test]
    async fn test_save_backend_failure_keeps_editor() {
        let mut api = MockTemplateApi::new();
        api.expect_create_template().returning(|_| {
            Err(ApiError::Status {
                status: StatusCode::INTERNAL_SERVER_ERROR,
                message: None,
            })
        });
        let app = TestApp::new(api);
        let view_id = app.mount();
        app.server().post(&format!("/views/{view_id}/editor/new")).await;

        let response = app
            .server()
            .post(&format!("/views/{view_id}/editor/save"))
            .form(&editor_form("Essay", "Static text"))
            .await;
        assert_alert(&response, "Save failed, please retry");
        assert!(response.text().contains("value=\"Essay\""));
    }

    #[tokio::test]
    async fn test_delete_returns_to_list() {
        let mut api = MockTemplateApi::new();
        api.expect_delete_template()
            .withf(|id| id.to_string() == "t1")
            .times(1)
            .returning(|_| Ok(()));
        let app = TestApp::new(api);
        let view_id = app.mount_editing(essay());

        let html = app
            .server()
            .post(&format!("/views/{view_id}/editor/delete"))
            .await
            .text();
        assert!(html.contains("id=\"browsing\""));
    }

    #[tokio::test]
    async fn test_delete_needs_persisted_template() {
        let app = TestApp::new(MockTemplateApi::new());
        let view_id = app.mount();
        app.server().post(&format!("/views/{view_id}/editor/new")).await;
        let response = app
            .server()
            .post(&format!("/views/{view_id}/editor/delete"))
            .await;
        response.assert_status(StatusCode::CONFLICT);
    }
}
