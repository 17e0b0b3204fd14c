//! Error types and error handling
//!
//! Each layer has its own enum: [`ApiError`] for backend calls,
//! [`EditorError`] for the save pipeline, [`ViewError`] for rejected state
//! transitions and [`PromptDeckError`] at the HTTP edge. Only the last one
//! turns into a response.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_htmx::HxRefresh;
use thiserror::Error;
use uuid::Uuid;

use crate::htmx::AlertTrigger;

/// Backend call failure
#[derive(Debug, Error)]
pub enum ApiError {
    /// Connection, TLS or protocol failure before a response arrived
    #[error("Backend unreachable: {0}")]
    Transport(#[from] reqwest::Error),

    /// Backend answered with a non-success status
    #[error("Backend returned {status}{}", .message.as_ref().map(|m| format!(": {m}")).unwrap_or_default())]
    Status {
        /// HTTP status returned
        status: StatusCode,
        /// Message decoded from the backend error body, if any
        message: Option<String>,
    },

    /// Response body did not match the expected shape
    #[error("Undecodable backend response: {0}")]
    Decode(String),

    /// Configured base URL cannot be used
    #[error("Invalid backend base URL: {0}")]
    InvalidBaseUrl(String),
}

impl ApiError {
    /// Build a status error from a backend error body
    ///
    /// The backend answers `{"error": <status text>, "message": <detail>}`,
    /// the detail being omitted for server errors.
    #[must_use]
    pub fn from_status(status: StatusCode, body: &str) -> Self {
        #[derive(serde::Deserialize)]
        struct ErrorBody {
            error: Option<String>,
            message: Option<String>,
        }

        let message = serde_json::from_str::<ErrorBody>(body)
            .ok()
            .and_then(|body| body.message.or(body.error))
            .filter(|message| !message.is_empty());

        Self::Status { status, message }
    }

    /// Status code for status errors
    #[must_use]
    pub const fn status(&self) -> Option<StatusCode> {
        match self {
            Self::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// Save pipeline failure
#[derive(Debug, Error)]
pub enum EditorError {
    /// Name or content blank after trimming
    #[error("Please fill in the template name and content")]
    MissingRequiredFields,

    /// Variable names that are not identifiers
    #[error(
        "Invalid variable names: {}\nVariable names may only contain letters, digits and underscores, and cannot start with a digit",
        .0.join(", ")
    )]
    InvalidVariableNames(Vec<String>),

    /// Extraction requested with blank content
    #[error("Template content is empty")]
    EmptyContent,

    /// Backend rejected or never received the call
    #[error(transparent)]
    Api(#[from] ApiError),
}

impl EditorError {
    /// Whether the failure happened before any network call
    #[must_use]
    pub const fn is_validation(&self) -> bool {
        !matches!(self, Self::Api(_))
    }
}

/// Transition rejected by the generate view state machine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ViewError {
    /// Operation needs a selected template
    #[error("No template is selected")]
    NoSelection,

    /// Operation needs an open editor
    #[error("The editor is not open")]
    NotEditing,

    /// Editor already open
    #[error("The editor is already open")]
    AlreadyEditing,

    /// Operation needs a template that exists on the backend
    #[error("The template has not been saved yet")]
    NotPersisted,
}

/// Web layer error type
#[derive(Debug, Error)]
pub enum PromptDeckError {
    /// View id unknown or expired
    #[error("View not found: {0}")]
    ViewNotFound(Uuid),

    /// Rejected state transition
    #[error(transparent)]
    View(#[from] ViewError),

    /// Backend failure outside a recoverable UI action
    #[error(transparent)]
    Api(#[from] ApiError),

    /// Askama rendering failure
    #[error("Template rendering failed: {0}")]
    Template(#[from] askama::Error),
}

impl IntoResponse for PromptDeckError {
    fn into_response(self) -> Response {
        match self {
            Self::ViewNotFound(view_id) => {
                tracing::info!(%view_id, "unknown view, asking browser to reload");
                (StatusCode::NOT_FOUND, HxRefresh(true), "View expired").into_response()
            }
            Self::View(error) => {
                tracing::warn!(%error, "rejected view transition");
                let message = error.to_string();
                (StatusCode::CONFLICT, AlertTrigger::new(&message), message).into_response()
            }
            Self::Api(error) => {
                let backend_status = error.status().map(|status| status.as_u16());
                tracing::error!(%error, ?backend_status, "backend call failed");
                let status = StatusCode::BAD_GATEWAY;
                (status, AlertTrigger::new(&error.to_string()), "Backend call failed")
                    .into_response()
            }
            Self::Template(error) => {
                tracing::error!("Template rendering error: {}", error);
                (StatusCode::INTERNAL_SERVER_ERROR, "Template rendering failed").into_response()
            }
        }
    }
}
