//! Data administration endpoints and the bulk "save all" run.

use std::fmt;
use std::str::FromStr;

use reqwest::Method;
use serde::Serialize;
use thiserror::Error;
use tracing::{info, instrument, warn};

use dancemode_core::models::{
    BulkCreateRequest, BulkOperationResponse, BulkResource, DataStatistics, DatabaseExport,
    SaveAllBatch,
};

use super::{ApiClient, ApiError};

/// Resources in the order "save all" creates them. Events reference
/// venues, so venues go first.
const SAVE_ORDER: [BulkResource; 3] = [
    BulkResource::Venues,
    BulkResource::Packages,
    BulkResource::Events,
];

/// How "save all" reacts to a failed step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BulkPolicy {
    /// Record the failure and run the remaining steps.
    #[default]
    ContinueOnError,
    /// Skip every step after the first failure.
    AbortOnError,
}

#[derive(Debug, Error)]
#[error("unknown bulk policy '{0}', expected 'continue' or 'abort'")]
pub struct ParseBulkPolicyError(String);

impl FromStr for BulkPolicy {
    type Err = ParseBulkPolicyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "continue" | "continue-on-error" => Ok(Self::ContinueOnError),
            "abort" | "abort-on-error" => Ok(Self::AbortOnError),
            other => Err(ParseBulkPolicyError(other.to_string())),
        }
    }
}

impl fmt::Display for BulkPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::ContinueOnError => "continue",
            Self::AbortOnError => "abort",
        })
    }
}

/// Result of one "save all" step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StepOutcome {
    /// The batch had no records of this kind; nothing was sent.
    Empty,
    /// The server processed the step.
    Completed(BulkOperationResponse),
    /// The request itself failed.
    Failed(String),
    /// Not attempted because an earlier step ended the run.
    Skipped,
}

impl StepOutcome {
    /// Whether this step failed or reported per-record errors.
    #[must_use]
    pub const fn is_failure(&self) -> bool {
        match self {
            Self::Completed(response) => response.error_count > 0,
            Self::Failed(_) => true,
            Self::Empty | Self::Skipped => false,
        }
    }
}

/// Outcome of a "save all" run, one entry per resource in creation order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SaveAllReport {
    pub policy: BulkPolicy,
    pub steps: Vec<(BulkResource, StepOutcome)>,
}

impl SaveAllReport {
    /// Outcome for `resource`.
    #[must_use]
    pub fn outcome(&self, resource: BulkResource) -> Option<&StepOutcome> {
        self.steps
            .iter()
            .find(|(r, _)| *r == resource)
            .map(|(_, outcome)| outcome)
    }

    /// Records created across all steps.
    #[must_use]
    pub fn success_count(&self) -> usize {
        self.responses().map(|r| r.success_count).sum()
    }

    /// Records rejected across all completed steps.
    #[must_use]
    pub fn error_count(&self) -> usize {
        self.responses().map(|r| r.error_count).sum()
    }

    /// Whether every attempted step succeeded without record errors.
    #[must_use]
    pub fn is_success(&self) -> bool {
        !self.steps.iter().any(|(_, outcome)| outcome.is_failure())
            && !self.was_aborted()
    }

    /// Whether any step was skipped.
    #[must_use]
    pub fn was_aborted(&self) -> bool {
        self.steps
            .iter()
            .any(|(_, outcome)| matches!(outcome, StepOutcome::Skipped))
    }

    fn responses(&self) -> impl Iterator<Item = &BulkOperationResponse> {
        self.steps.iter().filter_map(|(_, outcome)| match outcome {
            StepOutcome::Completed(response) => Some(response),
            _ => None,
        })
    }
}

impl ApiClient {
    /// Dump every record the service holds.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self))]
    pub async fn export_data(&self) -> Result<DatabaseExport, ApiError> {
        self.send(self.request(Method::GET, "/api/data/export"))
            .await
    }

    /// Load a previously exported dump.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self, export), fields(version = %export.version))]
    pub async fn import_data(&self, export: &DatabaseExport) -> Result<(), ApiError> {
        self.send_ack(self.request(Method::POST, "/api/data/import").json(export))
            .await
    }

    /// Record counts per collection.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self))]
    pub async fn data_statistics(&self) -> Result<DataStatistics, ApiError> {
        self.send(self.request(Method::GET, "/api/data/statistics"))
            .await
    }

    /// Delete every record.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self))]
    pub async fn clear_data(&self) -> Result<(), ApiError> {
        self.send_ack(self.request(Method::DELETE, "/api/data/clear"))
            .await
    }

    /// Create many records of one kind in a single request.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self, request), fields(resource = %resource, count = request.data.len()))]
    pub async fn bulk_create<T: Serialize + Sync>(
        &self,
        resource: BulkResource,
        request: &BulkCreateRequest<T>,
    ) -> Result<BulkOperationResponse, ApiError> {
        self.send(
            self.request(Method::POST, &format!("/api/data/bulk/{resource}"))
                .json(request),
        )
        .await
    }

    /// Create venues, then packages, then events from `batch`.
    ///
    /// Steps run one after another. Under `ContinueOnError` a failed step is
    /// recorded and the run goes on; under `AbortOnError` the remaining steps
    /// are marked skipped. A step fails when its request errors or the server
    /// reports `error_count > 0`. An `Unauthorized` response ends the run
    /// under either policy.
    #[instrument(skip(self, batch), fields(policy = %policy))]
    pub async fn save_all(&self, batch: &SaveAllBatch, policy: BulkPolicy) -> SaveAllReport {
        let mut steps = Vec::with_capacity(SAVE_ORDER.len());
        let mut halted = false;

        for resource in SAVE_ORDER {
            if halted {
                steps.push((resource, StepOutcome::Skipped));
                continue;
            }

            let outcome = match self.save_step(batch, resource).await {
                Ok(None) => StepOutcome::Empty,
                Ok(Some(response)) => {
                    info!(
                        resource = %resource,
                        created = response.success_count,
                        errors = response.error_count,
                        "Bulk step complete"
                    );
                    StepOutcome::Completed(response)
                }
                Err(e) => {
                    warn!(resource = %resource, error = %e, "Bulk step failed");
                    halted = matches!(e, ApiError::Unauthorized);
                    StepOutcome::Failed(e.to_string())
                }
            };

            if policy == BulkPolicy::AbortOnError && outcome.is_failure() {
                halted = true;
            }
            steps.push((resource, outcome));
        }

        SaveAllReport { policy, steps }
    }

    async fn save_step(
        &self,
        batch: &SaveAllBatch,
        resource: BulkResource,
    ) -> Result<Option<BulkOperationResponse>, ApiError> {
        match resource {
            BulkResource::Venues => {
                self.bulk_slice(resource, &batch.venues, batch.replace_existing)
                    .await
            }
            BulkResource::Packages => {
                self.bulk_slice(resource, &batch.packages, batch.replace_existing)
                    .await
            }
            BulkResource::Events => {
                self.bulk_slice(resource, &batch.events, batch.replace_existing)
                    .await
            }
        }
    }

    /// Send `data` unless it is empty.
    async fn bulk_slice<T: Serialize + Sync>(
        &self,
        resource: BulkResource,
        data: &[T],
        replace_existing: bool,
    ) -> Result<Option<BulkOperationResponse>, ApiError> {
        if data.is_empty() {
            return Ok(None);
        }
        let request = BulkCreateRequest {
            data: data.iter().collect::<Vec<_>>(),
            replace_existing,
        };
        self.bulk_create(resource, &request).await.map(Some)
    }
}
