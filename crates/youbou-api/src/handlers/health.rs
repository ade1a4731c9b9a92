//! Health check handler for service monitoring.
//!
//! Reports whether the submission store answers, and how many submissions it
//! holds. Never reveals identifiers.

use std::{sync::Arc, time::Instant};

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{debug, error, instrument};
use youbou_core::SubmissionStore;

use crate::AppState;

/// Health check response structure.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// Overall service health status
    pub status: HealthStatus,
    /// Timestamp when health check was performed
    pub timestamp: DateTime<Utc>,
    /// Individual component health checks
    pub checks: HealthChecks,
    /// Service version information
    pub version: String,
}

/// Overall health status enumeration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum HealthStatus {
    /// All systems operational
    Healthy,
    /// Critical systems failing
    Unhealthy,
}

/// Individual component health check results.
#[derive(Debug, Serialize)]
pub struct HealthChecks {
    /// Submission store reachability
    pub submission_store: ComponentHealth,
}

/// Health status for individual components.
#[derive(Debug, Serialize)]
pub struct ComponentHealth {
    /// Component status
    pub status: ComponentStatus,
    /// Number of recorded submissions, when the store answered
    #[serde(skip_serializing_if = "Option::is_none")]
    pub recorded: Option<usize>,
    /// Optional error message if unhealthy
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    /// Response time in milliseconds
    pub response_time_ms: u64,
}

/// Component-level health status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ComponentStatus {
    /// Component is healthy
    Up,
    /// Component is experiencing issues
    Down,
}

/// Runs health checks against the service's collaborators.
pub struct HealthService {
    store: Arc<dyn SubmissionStore>,
}

impl HealthService {
    /// Creates a health service over the given store.
    pub fn new(store: Arc<dyn SubmissionStore>) -> Self {
        Self { store }
    }

    /// Performs all health checks.
    pub async fn health_check(&self) -> HealthResponse {
        debug!("Performing health check");

        let timestamp = Utc::now();
        let start_time = Instant::now();

        let store_health = self.check_store_health().await;
        let elapsed = start_time.elapsed();

        let overall_status = match store_health.status {
            ComponentStatus::Up => HealthStatus::Healthy,
            ComponentStatus::Down => HealthStatus::Unhealthy,
        };

        HealthResponse {
            status: overall_status,
            timestamp,
            checks: HealthChecks {
                submission_store: ComponentHealth {
                    response_time_ms: u64::try_from(elapsed.as_millis()).unwrap_or(u64::MAX),
                    ..store_health
                },
            },
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }

    async fn check_store_health(&self) -> ComponentHealth {
        match self.store.count().await {
            Ok(recorded) => {
                debug!(recorded, "Submission store health check passed");
                ComponentHealth {
                    status: ComponentStatus::Up,
                    recorded: Some(recorded),
                    message: None,
                    response_time_ms: 0,
                }
            },
            Err(e) => {
                error!("Submission store health check failed: {}", e);
                ComponentHealth {
                    status: ComponentStatus::Down,
                    recorded: None,
                    message: Some(format!("Submission store unavailable: {e}")),
                    response_time_ms: 0,
                }
            },
        }
    }
}

/// Health check endpoint handler.
#[instrument(name = "health_check", skip(app_state))]
pub async fn health_check(State(app_state): State<AppState>) -> Response {
    let response = HealthService::new(app_state.store.clone()).health_check().await;

    let status_code = match response.status {
        HealthStatus::Healthy => StatusCode::OK,
        HealthStatus::Unhealthy => StatusCode::SERVICE_UNAVAILABLE,
    };

    debug!(
        status = ?response.status,
        store_status = ?response.checks.submission_store.status,
        "Health check completed"
    );

    (status_code, Json(response)).into_response()
}

#[cfg(test)]
mod tests {
    use async_trait::async_trait;
    use youbou_core::{
        EncryptedUserId, InMemorySubmissionStore, MessageTs, Result, YoubouError,
    };

    use super::*;

    struct BrokenStore;

    #[async_trait]
    impl SubmissionStore for BrokenStore {
        async fn record(&self, _ts: MessageTs, _submitter: EncryptedUserId) -> Result<()> {
            Err(YoubouError::storage("offline"))
        }

        async fn count(&self) -> Result<usize> {
            Err(YoubouError::storage("offline"))
        }
    }

    #[tokio::test]
    async fn healthy_store_reports_record_count() {
        let store = Arc::new(InMemorySubmissionStore::new());
        store
            .record(MessageTs::new("1700000000.000100"), EncryptedUserId::new("sealed"))
            .await
            .unwrap();

        let response = HealthService::new(store).health_check().await;

        assert_eq!(response.status, HealthStatus::Healthy);
        assert_eq!(response.checks.submission_store.status, ComponentStatus::Up);
        assert_eq!(response.checks.submission_store.recorded, Some(1));
        assert_eq!(response.version, env!("CARGO_PKG_VERSION"));
    }

    #[tokio::test]
    async fn failing_store_is_unhealthy() {
        let response = HealthService::new(Arc::new(BrokenStore)).health_check().await;

        assert_eq!(response.status, HealthStatus::Unhealthy);
        assert_eq!(response.checks.submission_store.status, ComponentStatus::Down);
        assert!(response.checks.submission_store.recorded.is_none());
        assert!(response.checks.submission_store.message.unwrap().contains("offline"));
    }

    #[tokio::test]
    async fn serialized_response_has_expected_shape() {
        let response =
            HealthService::new(Arc::new(InMemorySubmissionStore::new())).health_check().await;
        let json = serde_json::to_value(&response).unwrap();

        assert_eq!(json["status"], "healthy");
        assert_eq!(json["checks"]["submission_store"]["status"], "up");
        assert_eq!(json["checks"]["submission_store"]["recorded"], 0);
        assert!(json["checks"]["submission_store"].get("message").is_none());
        assert!(json["timestamp"].is_string());
    }
}
