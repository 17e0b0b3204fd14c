//! Test application wrapping the real router around a mocked backend

use std::sync::Arc;

use axum_test::TestServer;
use uuid::Uuid;

use crate::api::{MockTemplateApi, Template};
use crate::config::PromptDeckConfig;
use crate::handlers::router;
use crate::state::PromptDeckState;

/// Router under test plus direct access to its state
pub struct TestApp {
    server: TestServer,
    state: PromptDeckState,
}

impl TestApp {
    /// App with default configuration
    pub fn new(api: MockTemplateApi) -> Self {
        Self::with_config(PromptDeckConfig::default(), api)
    }

    /// App with explicit configuration
    ///
    /// # Panics
    ///
    /// Panics if the test server cannot be started
    pub fn with_config(config: PromptDeckConfig, api: MockTemplateApi) -> Self {
        let state = PromptDeckState::new(config, Arc::new(api));
        let server = TestServer::new(router(state.clone())).expect("test server");
        Self { server, state }
    }

    /// Server to send requests to
    pub const fn server(&self) -> &TestServer {
        &self.server
    }

    /// Shared state behind the router
    pub const fn state(&self) -> &PromptDeckState {
        &self.state
    }

    /// Open a fresh view
    pub fn mount(&self) -> Uuid {
        self.state.views().open(self.state.new_view())
    }

    /// Open a view with `template` selected
    ///
    /// # Panics
    ///
    /// Panics if the selection is rejected
    pub fn mount_selected(&self, template: Template) -> Uuid {
        let mut view = self.state.new_view();
        view.select(template).expect("select");
        self.state.views().open(view)
    }

    /// Open a view editing `template`
    ///
    /// # Panics
    ///
    /// Panics if the editor cannot be opened
    pub fn mount_editing(&self, template: Template) -> Uuid {
        let mut view = self.state.new_view();
        view.open_edit(template).expect("open editor");
        self.state.views().open(view)
    }
}
