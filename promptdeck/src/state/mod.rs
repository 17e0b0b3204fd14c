//! Application state management
//!
//! Shared by every handler: configuration, the backend client and the
//! registry of open pages.

use std::sync::Arc;

use crate::api::{HttpTemplateApi, TemplateApi};
use crate::config::PromptDeckConfig;
use crate::error::ApiError;
use crate::views::{GenerateView, TemplateSelector, ViewRegistry};

/// Application state for the PromptDeck server
///
/// # Example
///
/// ```rust
/// use promptdeck::{config::PromptDeckConfig, state::PromptDeckState};
///
/// # fn example() -> anyhow::Result<()> {
/// let state = PromptDeckState::from_config(PromptDeckConfig::default())?;
/// let app = promptdeck::handlers::router(state);
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct PromptDeckState {
    config: Arc<PromptDeckConfig>,
    api: Arc<dyn TemplateApi>,
    views: ViewRegistry,
}

impl PromptDeckState {
    /// State backed by the HTTP client described in `config`
    ///
    /// # Errors
    ///
    /// Returns an error if the configured base URL is unusable.
    pub fn from_config(config: PromptDeckConfig) -> Result<Self, ApiError> {
        let api = HttpTemplateApi::new(&config.api)?;
        tracing::info!(base_url = %api.base_url(), "backend client ready");
        Ok(Self::new(config, Arc::new(api)))
    }

    /// State with an explicit backend implementation
    #[must_use]
    pub fn new(config: PromptDeckConfig, api: Arc<dyn TemplateApi>) -> Self {
        let views = ViewRegistry::new(config.ui.view_idle());
        Self {
            config: Arc::new(config),
            api,
            views,
        }
    }

    /// Get application configuration
    #[must_use]
    pub fn config(&self) -> &PromptDeckConfig {
        &self.config
    }

    /// Backend client
    #[must_use]
    pub fn api(&self) -> &dyn TemplateApi {
        self.api.as_ref()
    }

    /// Open pages
    #[must_use]
    pub const fn views(&self) -> &ViewRegistry {
        &self.views
    }

    /// A fresh page state, scoped to the configured default category
    #[must_use]
    pub fn new_view(&self) -> GenerateView {
        let selector = TemplateSelector::new(
            self.config.ui.default_category.clone(),
            self.config.api.page_size,
        );
        GenerateView::new(selector, self.config.ui.copied_indicator())
    }
}

impl std::fmt::Debug for PromptDeckState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PromptDeckState")
            .field("config", &self.config)
            .field("views", &self.views.len())
            .finish_non_exhaustive()
    }
}
