//! Bulk data administration payloads (`/api/data/*`).

use core::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::catalog::{
    CreateEventRequest, CreatePackageRequest, CreateVenueRequest, Event, Package, Venue,
};
use super::registration::Registration;

/// Resource collections accepted by `POST /api/data/bulk/{resource}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BulkResource {
    Venues,
    Packages,
    Events,
}

impl BulkResource {
    /// Path segment used by the bulk endpoint.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Venues => "venues",
            Self::Packages => "packages",
            Self::Events => "events",
        }
    }
}

impl fmt::Display for BulkResource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Body of `POST /api/data/bulk/{resource}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BulkCreateRequest<T> {
    pub data: Vec<T>,
    #[serde(default)]
    pub replace_existing: bool,
}

/// Per-request outcome reported by the bulk endpoint.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BulkOperationResponse {
    pub success_count: usize,
    pub error_count: usize,
    #[serde(default)]
    pub errors: Vec<String>,
}

/// Records created together by a "save all" run.
///
/// Venues are listed first because events reference them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SaveAllBatch {
    #[serde(default)]
    pub venues: Vec<CreateVenueRequest>,
    #[serde(default)]
    pub packages: Vec<CreatePackageRequest>,
    #[serde(default)]
    pub events: Vec<CreateEventRequest>,
    #[serde(default)]
    pub replace_existing: bool,
}

impl SaveAllBatch {
    /// Whether the batch contains no records at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.venues.is_empty() && self.packages.is_empty() && self.events.is_empty()
    }
}

/// Full dump returned by `GET /api/data/export` and accepted by
/// `POST /api/data/import`.
///
/// Users are kept as raw JSON: the export carries server-side account fields
/// the client never interprets but must hand back unchanged on import.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DatabaseExport {
    #[serde(default)]
    pub users: Vec<serde_json::Value>,
    #[serde(default)]
    pub events: Vec<Event>,
    #[serde(default)]
    pub venues: Vec<Venue>,
    #[serde(default)]
    pub packages: Vec<Package>,
    #[serde(default)]
    pub registrations: Vec<Registration>,
    pub exported_at: DateTime<Utc>,
    pub version: String,
}

/// Record counts returned by `GET /api/data/statistics`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DataStatistics {
    pub users: usize,
    pub events: usize,
    pub venues: usize,
    pub packages: usize,
    pub registrations: usize,
    pub total_records: usize,
    pub last_updated: DateTime<Utc>,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_bulk_request_body_shape() {
        let request = BulkCreateRequest::<CreateVenueRequest> {
            data: vec![],
            replace_existing: true,
        };
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json, serde_json::json!({ "data": [], "replace_existing": true }));
    }

    #[test]
    fn test_save_all_batch_defaults() {
        let batch: SaveAllBatch = serde_json::from_str("{}").unwrap();
        assert!(batch.is_empty());
        assert!(!batch.replace_existing);
    }

    #[test]
    fn test_bulk_resource_path_segment() {
        assert_eq!(BulkResource::Venues.to_string(), "venues");
        assert_eq!(BulkResource::Events.as_str(), "events");
    }
}
