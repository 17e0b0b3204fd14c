//! Backend API adapter
//!
//! [`TemplateApi`] is the seam between the UI and the template backend.
//! [`HttpTemplateApi`] implements it over `reqwest`. Every template that
//! crosses this boundary has its `variables` normalized into a list, see
//! [`normalize_variables`].
//!
//! Failures are returned as [`ApiError`]. There is no retry and no caching;
//! the calling UI action decides how to recover.

use async_trait::async_trait;

use crate::error::ApiError;

mod client;
mod normalize;
mod types;

pub use client::HttpTemplateApi;
pub use normalize::normalize_variables;
pub use types::{
    BackendHealth, GenerateRequest, GenerateResponse, Paginated, RawTemplate, Template,
    TemplatePayload, TemplateQuery, TemplateVariable,
};

/// Operations offered by the template backend
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TemplateApi: Send + Sync {
    /// Probe the backend health endpoint
    async fn health(&self) -> Result<BackendHealth, ApiError>;

    /// List templates visible to the current user
    async fn list_templates(&self, query: &TemplateQuery)
        -> Result<Paginated<Template>, ApiError>;

    /// List the public catalog
    async fn list_public_templates(
        &self,
        query: &TemplateQuery,
    ) -> Result<Paginated<Template>, ApiError>;

    /// Fetch one template
    async fn get_template(&self, id: &str) -> Result<Template, ApiError>;

    /// Create a template, returning the stored record
    async fn create_template(&self, payload: &TemplatePayload) -> Result<Template, ApiError>;

    /// Update a template, returning the stored record
    async fn update_template(
        &self,
        id: &str,
        payload: &TemplatePayload,
    ) -> Result<Template, ApiError>;

    /// Delete a template
    async fn delete_template(&self, id: &str) -> Result<(), ApiError>;

    /// Render a template with the given values
    async fn generate(&self, request: &GenerateRequest) -> Result<GenerateResponse, ApiError>;

    /// Names of the placeholders found in `content`, in order of appearance
    async fn extract_variables(&self, content: &str) -> Result<Vec<String>, ApiError>;
}
