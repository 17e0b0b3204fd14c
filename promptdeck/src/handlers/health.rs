//! Health check endpoints
//!
//! `/health/live` answers as long as the process runs. `/health` also
//! probes the template backend and reports it as a component.

use std::collections::BTreeMap;
use std::time::{Instant, SystemTime};

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

use crate::state::PromptDeckState;

/// Health check status, ordered by severity
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum HealthStatus {
    /// Service is healthy and ready
    Healthy,
    /// Service is degraded but operational
    Degraded,
    /// Service is unhealthy
    Unhealthy,
}

/// Health of one dependency
#[derive(Debug, Clone, Serialize)]
pub struct ComponentHealth {
    /// Component status
    pub status: HealthStatus,
    /// What the probe saw
    pub message: String,
    /// Probe round trip in milliseconds
    pub response_time_ms: u64,
}

/// Overall health check response
#[derive(Debug, Clone, Serialize)]
pub struct HealthCheckResponse {
    /// Worst status among the components
    pub status: HealthStatus,
    /// Application version
    pub version: &'static str,
    /// Unix timestamp of the check
    pub timestamp: u64,
    /// Component healths by name
    pub components: BTreeMap<&'static str, ComponentHealth>,
}

impl HealthCheckResponse {
    fn new() -> Self {
        Self {
            status: HealthStatus::Healthy,
            version: env!("CARGO_PKG_VERSION"),
            timestamp: SystemTime::now()
                .duration_since(SystemTime::UNIX_EPOCH)
                .map_or(0, |d| d.as_secs()),
            components: BTreeMap::new(),
        }
    }

    fn add_component(&mut self, name: &'static str, health: ComponentHealth) {
        self.status = self.status.max(health.status);
        self.components.insert(name, health);
    }

    /// HTTP status for the overall health
    #[must_use]
    pub const fn status_code(&self) -> StatusCode {
        match self.status {
            HealthStatus::Healthy | HealthStatus::Degraded => StatusCode::OK,
            HealthStatus::Unhealthy => StatusCode::SERVICE_UNAVAILABLE,
        }
    }
}

impl IntoResponse for HealthCheckResponse {
    fn into_response(self) -> Response {
        let status = self.status_code();
        (status, Json(self)).into_response()
    }
}

/// Liveness probe
#[allow(clippy::unused_async)]
pub async fn liveness() -> impl IntoResponse {
    (StatusCode::OK, "OK")
}

/// Health check including the template backend
///
/// The UI cannot work without the backend, so a failed probe makes the
/// whole service unhealthy. A backend reporting a status other than `ok`
/// is treated as degraded.
pub async fn health_check(State(state): State<PromptDeckState>) -> HealthCheckResponse {
    let mut response = HealthCheckResponse::new();

    let started = Instant::now();
    let probe = state.api().health().await;
    let response_time_ms = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX);

    let (status, message) = match probe {
        Ok(health) if matches!(health.status.to_ascii_lowercase().as_str(), "ok" | "up") => {
            (HealthStatus::Healthy, health.service)
        }
        Ok(health) => (
            HealthStatus::Degraded,
            format!("{} reports {}", health.service, health.status),
        ),
        Err(error) => {
            tracing::warn!(%error, "backend health probe failed");
            (HealthStatus::Unhealthy, error.to_string())
        }
    };
    response.add_component(
        "backend",
        ComponentHealth {
            status,
            message,
            response_time_ms,
        },
    );
    response
}
