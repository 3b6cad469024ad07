//! Service health check.

use chrono::{DateTime, Utc};
use reqwest::Method;
use serde::{Deserialize, Serialize};
use tracing::instrument;

use super::{ApiClient, ApiError};

/// Body of `GET /api/health`. Unlike other endpoints it is not enveloped.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthStatus {
    pub status: String,
    #[serde(default)]
    pub timestamp: Option<DateTime<Utc>>,
    #[serde(default)]
    pub service: Option<String>,
}

impl HealthStatus {
    #[must_use]
    pub fn is_healthy(&self) -> bool {
        self.status.eq_ignore_ascii_case("healthy") || self.status.eq_ignore_ascii_case("ok")
    }
}

impl ApiClient {
    /// Check that the service is up.
    ///
    /// # Errors
    ///
    /// Returns an error if the service is unreachable or answers with a
    /// non-success status.
    #[instrument(skip(self))]
    pub async fn health(&self) -> Result<HealthStatus, ApiError> {
        let body = self
            .execute_raw(self.request(Method::GET, "/api/health"))
            .await?;
        Ok(serde_json::from_str(&body)?)
    }
}
