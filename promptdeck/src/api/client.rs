//! `reqwest` implementation of [`TemplateApi`]

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response, Url};
use serde::de::DeserializeOwned;

use super::types::{
    BackendHealth, ExtractRequest, ExtractResponse, GenerateRequest, GenerateResponse, Paginated,
    Template, TemplatePayload, TemplateQuery,
};
use super::TemplateApi;
use crate::config::ApiSettings;
use crate::error::ApiError;

/// HTTP client for the template backend
#[derive(Debug, Clone)]
pub struct HttpTemplateApi {
    http: Client,
    base_url: Url,
}

impl HttpTemplateApi {
    /// Client for the backend described by `settings`
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::InvalidBaseUrl`] if the base URL does not parse or
    /// cannot carry a path.
    pub fn new(settings: &ApiSettings) -> Result<Self, ApiError> {
        Self::with_client(Client::new(), &settings.base_url)
    }

    /// Client reusing an existing `reqwest::Client`
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::InvalidBaseUrl`] if `base_url` is unusable.
    pub fn with_client(http: Client, base_url: &str) -> Result<Self, ApiError> {
        let base_url = Url::parse(base_url)
            .map_err(|error| ApiError::InvalidBaseUrl(format!("{base_url}: {error}")))?;
        if base_url.cannot_be_a_base() {
            return Err(ApiError::InvalidBaseUrl(base_url.to_string()));
        }
        Ok(Self { http, base_url })
    }

    /// Base URL requests are resolved against
    #[must_use]
    pub const fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Append percent-encoded path segments to the base URL
    fn endpoint(&self, segments: &[&str]) -> Result<Url, ApiError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| ApiError::InvalidBaseUrl(self.base_url.to_string()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    async fn execute(
        &self,
        operation: &'static str,
        request: RequestBuilder,
    ) -> Result<Response, ApiError> {
        let response = request.send().await.map_err(|error| {
            tracing::error!(operation, %error, "backend request failed");
            ApiError::Transport(error)
        })?;

        let status = response.status();
        if status.is_success() {
            tracing::debug!(operation, %status, "backend call succeeded");
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        let error = ApiError::from_status(status, &body);
        tracing::error!(operation, %status, %error, "backend returned an error");
        Err(error)
    }

    async fn fetch<T: DeserializeOwned>(
        &self,
        operation: &'static str,
        request: RequestBuilder,
    ) -> Result<T, ApiError> {
        self.execute(operation, request)
            .await?
            .json::<T>()
            .await
            .map_err(|error| {
                tracing::error!(operation, %error, "backend response did not decode");
                ApiError::Decode(error.to_string())
            })
    }
}

#[async_trait]
impl TemplateApi for HttpTemplateApi {
    async fn health(&self) -> Result<BackendHealth, ApiError> {
        let url = self.endpoint(&["health"])?;
        self.fetch("health", self.http.get(url)).await
    }

    async fn list_templates(
        &self,
        query: &TemplateQuery,
    ) -> Result<Paginated<Template>, ApiError> {
        let url = self.endpoint(&["templates"])?;
        self.fetch("list_templates", self.http.get(url).query(query))
            .await
    }

    async fn list_public_templates(
        &self,
        query: &TemplateQuery,
    ) -> Result<Paginated<Template>, ApiError> {
        let url = self.endpoint(&["templates", "public"])?;
        let page: Paginated<Template> = self
            .fetch("list_public_templates", self.http.get(url).query(query))
            .await?;
        tracing::debug!(
            count = page.data.len(),
            total = page.total,
            category = query.category.as_deref(),
            "fetched public catalog"
        );
        Ok(page)
    }

    async fn get_template(&self, id: &str) -> Result<Template, ApiError> {
        let url = self.endpoint(&["templates", id])?;
        self.fetch("get_template", self.http.get(url)).await
    }

    async fn create_template(&self, payload: &TemplatePayload) -> Result<Template, ApiError> {
        let url = self.endpoint(&["templates"])?;
        self.fetch("create_template", self.http.post(url).json(payload))
            .await
    }

    async fn update_template(
        &self,
        id: &str,
        payload: &TemplatePayload,
    ) -> Result<Template, ApiError> {
        let url = self.endpoint(&["templates", id])?;
        self.fetch("update_template", self.http.put(url).json(payload))
            .await
    }

    async fn delete_template(&self, id: &str) -> Result<(), ApiError> {
        let url = self.endpoint(&["templates", id])?;
        self.execute("delete_template", self.http.delete(url)).await?;
        Ok(())
    }

    async fn generate(&self, request: &GenerateRequest) -> Result<GenerateResponse, ApiError> {
        let url = self.endpoint(&["generate"])?;
        self.fetch("generate", self.http.post(url).json(request))
            .await
    }

    async fn extract_variables(&self, content: &str) -> Result<Vec<String>, ApiError> {
        let url = self.endpoint(&["generate", "extract-variables"])?;
        let response: ExtractResponse = self
            .fetch(
                "extract_variables",
                self.http.post(url).json(&ExtractRequest { content }),
            )
            .await?;
        Ok(response.variables.unwrap_or_default())
    }
}
