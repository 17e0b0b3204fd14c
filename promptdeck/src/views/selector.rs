//! Template catalog selector
//!
//! Holds the fetched public catalog and a search query. Filtering happens
//! locally against the full fetched set; the backend is only asked again
//! when the category changes, on retry, or after the list was invalidated.

use crate::api::{Template, TemplateQuery};
use crate::error::ApiError;

/// Message shown when the catalog could not be fetched
pub const LOAD_FAILED_MESSAGE: &str = "Failed to load templates, please retry";

/// Fetch state of the catalog
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadState {
    /// A fetch is due or in flight
    Loading,
    /// The last fetch failed
    Failed(String),
    /// Templates are available
    Ready,
}

/// What the list area should show, exactly one at a time
#[derive(Debug, PartialEq, Eq)]
pub enum SelectorView<'a> {
    /// Spinner
    Loading,
    /// Error message with a retry action
    Error(&'a str),
    /// No cards; `filtered` tells whether a query hid them
    Empty {
        /// A search query is active
        filtered: bool,
    },
    /// Matching templates in catalog order
    Cards(Vec<&'a Template>),
}

/// Catalog and search state
#[derive(Debug, Clone)]
pub struct TemplateSelector {
    category: Option<String>,
    page_size: u32,
    templates: Vec<Template>,
    query: String,
    state: LoadState,
}

impl TemplateSelector {
    /// Selector that still has to fetch its catalog
    #[must_use]
    pub fn new(category: Option<String>, page_size: u32) -> Self {
        Self {
            category: category.filter(|c| !c.is_empty()),
            page_size,
            templates: Vec::new(),
            query: String::new(),
            state: LoadState::Loading,
        }
    }

    /// Active category scope
    #[must_use]
    pub fn category(&self) -> Option<&str> {
        self.category.as_deref()
    }

    /// Current search query
    #[must_use]
    pub fn query(&self) -> &str {
        &self.query
    }

    /// Current fetch state
    #[must_use]
    pub const fn state(&self) -> &LoadState {
        &self.state
    }

    /// Whether a fetch is due
    #[must_use]
    pub const fn is_loading(&self) -> bool {
        matches!(self.state, LoadState::Loading)
    }

    /// Change the category scope
    ///
    /// Returns `true` when it changed, in which case a fetch is due.
    pub fn set_category(&mut self, category: Option<String>) -> bool {
        let category = category
            .map(|c| c.trim().to_string())
            .filter(|c| !c.is_empty());
        if category == self.category {
            return false;
        }
        self.category = category;
        self.state = LoadState::Loading;
        true
    }

    /// Replace the search query
    pub fn set_query(&mut self, query: impl Into<String>) {
        self.query = query.into();
    }

    /// Mark the fetched catalog as stale and clear the query
    pub fn invalidate(&mut self) {
        self.query.clear();
        self.state = LoadState::Loading;
    }

    /// Start a fetch, returning the listing parameters to use
    pub fn begin_load(&mut self) -> TemplateQuery {
        self.state = LoadState::Loading;
        TemplateQuery::first_page(self.category.clone(), self.page_size)
    }

    /// Apply the outcome of a fetch
    pub fn finish_load(&mut self, outcome: Result<Vec<Template>, ApiError>) {
        match outcome {
            Ok(templates) => {
                tracing::debug!(count = templates.len(), category = ?self.category, "catalog loaded");
                self.templates = templates;
                self.state = LoadState::Ready;
            }
            Err(error) => {
                tracing::error!(%error, category = ?self.category, "catalog fetch failed");
                self.state = LoadState::Failed(LOAD_FAILED_MESSAGE.to_string());
            }
        }
    }

    /// Fetched template by id
    #[must_use]
    pub fn find(&self, id: &str) -> Option<&Template> {
        self.templates.iter().find(|template| template.id == id)
    }

    /// Templates whose name or description contains the query, ignoring case
    #[must_use]
    pub fn filtered(&self) -> Vec<&Template> {
        let needle = self.query.to_lowercase();
        self.templates
            .iter()
            .filter(|template| {
                needle.is_empty()
                    || template.name.to_lowercase().contains(&needle)
                    || template.description.to_lowercase().contains(&needle)
            })
            .collect()
    }

    /// Render state of the list area
    #[must_use]
    pub fn view(&self) -> SelectorView<'_> {
        match &self.state {
            LoadState::Loading => SelectorView::Loading,
            LoadState::Failed(message) => SelectorView::Error(message),
            LoadState::Ready => {
                let cards = self.filtered();
                if cards.is_empty() {
                    SelectorView::Empty {
                        filtered: !self.query.is_empty(),
                    }
                } else {
                    SelectorView::Cards(cards)
                }
            }
        }
    }
}
