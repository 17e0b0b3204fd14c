//! Catalog handlers: filtering, fetching and selecting

use axum::extract::{Path, Query, State};
use serde::Deserialize;
use uuid::Uuid;

use super::{lookup, main_panel, HandlerResult};
use crate::state::PromptDeckState;
use crate::template::pages::TemplateList;
use crate::template::HxTemplate;
use crate::views::form::with_extracted_variables;

/// Query string of the filter inputs
#[derive(Debug, Default, Deserialize)]
pub struct ListQuery {
    /// Search text
    pub q: Option<String>,
    /// Category scope
    pub category: Option<String>,
}

/// Apply search text or a category change and re-render the list
///
/// Search filters the fetched catalog locally. A category change marks the
/// catalog stale, so the rendered list triggers a re-fetch.
pub async fn filter(
    State(state): State<PromptDeckState>,
    Path(view_id): Path<Uuid>,
    Query(query): Query<ListQuery>,
) -> HandlerResult {
    let shared = lookup(&state, view_id)?;
    let mut view = shared.lock();
    let selector = view.selector_mut();
    if let Some(category) = query.category {
        let category = Some(category).filter(|c| !c.trim().is_empty());
        if selector.set_category(category) {
            tracing::debug!(%view_id, category = ?selector.category(), "category changed");
        }
    }
    if let Some(q) = query.q {
        selector.set_query(q);
    }
    Ok(TemplateList::new(view_id, selector).render_html())
}

/// Fetch (or retry fetching) the public catalog
pub async fn load(State(state): State<PromptDeckState>, Path(view_id): Path<Uuid>) -> HandlerResult {
    let shared = lookup(&state, view_id)?;
    let query = shared.lock().selector_mut().begin_load();

    let outcome = state
        .api()
        .list_public_templates(&query)
        .await
        .map(|page| page.data);

    let mut view = shared.lock();
    let selector = view.selector_mut();
    selector.finish_load(outcome);
    Ok(TemplateList::new(view_id, selector).render_html())
}

/// Select a template and show its variable form
///
/// Templates already in the fetched catalog are used as they are; others are
/// fetched by id. Templates without variables get them extracted first.
pub async fn select(
    State(state): State<PromptDeckState>,
    Path((view_id, template_id)): Path<(Uuid, String)>,
) -> HandlerResult {
    let shared = lookup(&state, view_id)?;
    let cached = shared.lock().selector().find(&template_id).cloned();

    let template = match cached {
        Some(template) => template,
        None => state.api().get_template(&template_id).await?,
    };
    let template = with_extracted_variables(state.api(), template).await;

    let mut view = shared.lock();
    view.select(template)?;
    main_panel(view_id, &view, None)
}

/// Return to the catalog
pub async fn back(State(state): State<PromptDeckState>, Path(view_id): Path<Uuid>) -> HandlerResult {
    let shared = lookup(&state, view_id)?;
    let mut view = shared.lock();
    view.back_to_list()?;
    main_panel(view_id, &view, None)
}

#[cfg(test)]
mod tests {
    use crate::api::{MockTemplateApi, Paginated, TemplateVariable};
    use crate::error::ApiError;
    use crate::testing::{assert_alert, template, TestApp};
    use axum::http::StatusCode;

    fn catalog_api() -> MockTemplateApi {
        let mut api = MockTemplateApi::new();
        api.expect_list_public_templates().returning(|query| {
            let mut essay = template("t1", "Essay Helper");
            essay.description = "Write essays".into();
            essay.variables = vec![TemplateVariable::placeholder("topic", 0)];
            Ok(Paginated {
                data: vec![essay, template("t2", "Code Review")],
                page: query.page,
                page_size: query.page_size,
                total: 2,
            })
        });
        api
    }

    #[tokio::test]
    async fn test_load_renders_cards() {
        let app = TestApp::new(catalog_api());
        let view_id = app.mount();
        let response = app.server().post(&format!("/views/{view_id}/templates/load")).await;
        response.assert_status_ok();
        let html = response.text();
        assert!(html.contains("Essay Helper"));
        assert!(html.contains("Code Review"));
    }

    #[tokio::test]
    async fn test_load_reads_public_catalog_in_scope() {
        let mut api = MockTemplateApi::new();
        api.expect_list_templates().never();
        api.expect_list_public_templates()
            .withf(|query| query.page == 1 && query.category.as_deref() == Some("writing"))
            .times(1)
            .returning(|query| {
                Ok(Paginated {
                    data: vec![template("t1", "Public Essay")],
                    page: query.page,
                    page_size: query.page_size,
                    total: 1,
                })
            });
        let app = TestApp::new(api);
        let view_id = app.mount();
        app.state()
            .views()
            .get(view_id)
            .unwrap()
            .lock()
            .selector_mut()
            .set_category(Some("writing".into()));

        let html = app
            .server()
            .post(&format!("/views/{view_id}/templates/load"))
            .await
            .text();
        assert!(html.contains("Public Essay"));
    }

    #[tokio::test]
    async fn test_edit_action_does_not_select() {
        let app = TestApp::new(catalog_api());
        let view_id = app.mount();
        let html = app
            .server()
            .post(&format!("/views/{view_id}/templates/load"))
            .await
            .text();

        let edit = format!("hx-post=\"/views/{view_id}/editor/edit/t1\"");
        let start = html.find(&edit).expect("card offers an edit action");
        let button_end = start + html[start..].find('>').unwrap();
        assert!(html[start..button_end].contains("hx-on:click=\"event.stopPropagation()\""));
        assert!(html.contains(&format!("hx-post=\"/views/{view_id}/select/t1\"")));
    }

    #[tokio::test]
    async fn test_load_failure_offers_retry() {
        let mut api = MockTemplateApi::new();
        api.expect_list_public_templates().returning(|_| {
            Err(ApiError::Status {
                status: StatusCode::INTERNAL_SERVER_ERROR,
                message: None,
            })
        });
        let app = TestApp::new(api);
        let view_id = app.mount();
        let html = app
            .server()
            .post(&format!("/views/{view_id}/templates/load"))
            .await
            .text();
        assert!(html.contains("Failed to load templates, please retry"));
        assert!(html.contains("Retry"));
    }

    #[tokio::test]
    async fn test_search_filters_locally() {
        let app = TestApp::new(catalog_api());
        let view_id = app.mount();
        app.server().post(&format!("/views/{view_id}/templates/load")).await;

        let html = app
            .server()
            .get(&format!("/views/{view_id}/templates"))
            .add_query_param("q", "ESSAY")
            .await
            .text();
        assert!(html.contains("Essay Helper"));
        assert!(!html.contains("Code Review"));

        let html = app
            .server()
            .get(&format!("/views/{view_id}/templates"))
            .add_query_param("q", "nothing like it")
            .await
            .text();
        assert!(html.contains("No matching templates"));
    }

    #[tokio::test]
    async fn test_category_change_refetches() {
        let app = TestApp::new(catalog_api());
        let view_id = app.mount();
        app.server().post(&format!("/views/{view_id}/templates/load")).await;

        let html = app
            .server()
            .get(&format!("/views/{view_id}/templates"))
            .add_query_param("category", "writing")
            .await
            .text();
        assert!(html.contains("hx-trigger=\"load\""));
        let shared = app.state().views().get(view_id).unwrap();
        assert_eq!(shared.lock().selector().category(), Some("writing"));
    }

    #[tokio::test]
    async fn test_select_uses_cached_template() {
        let app = TestApp::new(catalog_api());
        let view_id = app.mount();
        app.server().post(&format!("/views/{view_id}/templates/load")).await;

        let html = app
            .server()
            .post(&format!("/views/{view_id}/select/t1"))
            .await
            .text();
        assert!(html.contains("id=\"variable-form\""));
        assert!(html.contains("name=\"topic\""));
    }

    #[tokio::test]
    async fn test_select_fetches_and_extracts() {
        let mut api = MockTemplateApi::new();
        api.expect_get_template()
            .withf(|id| id.to_string() == "t9")
            .returning(|_| {
                let mut t = template("t9", "Summary");
                t.content = "Summarize {{topic}}".into();
                Ok(t)
            });
        api.expect_extract_variables()
            .times(1)
            .returning(|_| Ok(vec!["topic".to_string()]));
        let app = TestApp::new(api);
        let view_id = app.mount();

        let html = app
            .server()
            .post(&format!("/views/{view_id}/select/t9"))
            .await
            .text();
        assert!(html.contains("Summary"));
        assert!(html.contains("name=\"topic\""));
    }

    #[tokio::test]
    async fn test_select_unknown_template_alerts() {
        let mut api = MockTemplateApi::new();
        api.expect_get_template().returning(|_| {
            Err(ApiError::Status {
                status: StatusCode::NOT_FOUND,
                message: Some("template not found".into()),
            })
        });
        let app = TestApp::new(api);
        let view_id = app.mount();

        let response = app.server().post(&format!("/views/{view_id}/select/nope")).await;
        response.assert_status(StatusCode::BAD_GATEWAY);
        assert_alert(&response, "template not found");
    }

    #[tokio::test]
    async fn test_back_returns_to_stale_list() {
        let app = TestApp::new(catalog_api());
        let view_id = app.mount();
        app.server().post(&format!("/views/{view_id}/templates/load")).await;
        app.server().post(&format!("/views/{view_id}/select/t1")).await;

        let html = app.server().post(&format!("/views/{view_id}/back")).await.text();
        assert!(html.contains("id=\"browsing\""));
        assert!(html.contains("hx-trigger=\"load\""));
    }

    #[tokio::test]
    async fn test_back_while_browsing_is_a_no_op() {
        let app = TestApp::new(MockTemplateApi::new());
        let view_id = app.mount();
        app.server()
            .post(&format!("/views/{view_id}/back"))
            .await
            .assert_status_ok();
    }
}
