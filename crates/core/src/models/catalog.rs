//! Events, venues and packages offered by the ticketing service.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::types::{EventId, EventType, PackageId, Price, VenueId};

/// A scheduled dance event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Event {
    pub id: EventId,
    pub title: String,
    pub description: String,
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
    pub venue_id: VenueId,
    pub max_participants: u32,
    #[serde(default)]
    pub current_participants: u32,
    pub price: Price,
    pub event_type: EventType,
}

impl Event {
    /// Seats still available.
    #[must_use]
    pub const fn remaining_capacity(&self) -> u32 {
        self.max_participants.saturating_sub(self.current_participants)
    }

    /// Whether no seats are left.
    #[must_use]
    pub const fn is_sold_out(&self) -> bool {
        self.remaining_capacity() == 0
    }
}

/// Body of `POST /api/events` and `PUT /api/events/{id}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateEventRequest {
    pub title: String,
    pub description: String,
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
    pub venue_id: VenueId,
    pub max_participants: u32,
    pub price: Price,
    pub event_type: EventType,
}

/// A location hosting events.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Venue {
    pub id: VenueId,
    pub name: String,
    pub address: String,
    pub capacity: u32,
    #[serde(default)]
    pub description: Option<String>,
}

/// Body of `POST /api/venues` and `PUT /api/venues/{id}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateVenueRequest {
    pub name: String,
    pub address: String,
    pub capacity: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// A bundle of events sold as one ticket (e.g., a festival pass).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Package {
    pub id: PackageId,
    pub name: String,
    pub description: String,
    pub price: Price,
    pub duration_days: u32,
    pub max_participants: u32,
}

/// Body of `POST /api/packages` and `PUT /api/packages/{id}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreatePackageRequest {
    pub name: String,
    pub description: String,
    pub price: Price,
    pub duration_days: u32,
    pub max_participants: u32,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_event_from_backend_json() {
        let json = r#"{
            "id": "9b7e7a4e-5f0a-4a55-8f3b-0d1f4b2c6a10",
            "title": "Lindy Exchange",
            "description": "Three nights of social dancing",
            "start_date": "2025-06-01T18:00:00Z",
            "end_date": "2025-06-04T02:00:00Z",
            "venue_id": "1c2d3e4f-0000-4000-8000-000000000001",
            "max_participants": 200,
            "current_participants": 200,
            "price": 89.0,
            "event_type": "Festival"
        }"#;
        let event: Event = serde_json::from_str(json).unwrap();
        assert_eq!(event.price, Price::from_cents(8900));
        assert!(event.is_sold_out());
    }

    #[test]
    fn test_remaining_capacity_saturates() {
        let json = r#"{
            "id": "9b7e7a4e-5f0a-4a55-8f3b-0d1f4b2c6a10",
            "title": "Overbooked",
            "description": "More dancers than spots",
            "start_date": "2025-06-01T18:00:00Z",
            "end_date": "2025-06-01T22:00:00Z",
            "venue_id": "1c2d3e4f-0000-4000-8000-000000000001",
            "max_participants": 10,
            "current_participants": 12,
            "price": 15,
            "event_type": "Social"
        }"#;
        let event: Event = serde_json::from_str(json).unwrap();
        assert_eq!(event.remaining_capacity(), 0);
    }

    #[test]
    fn test_venue_request_omits_missing_description() {
        let request = CreateVenueRequest {
            name: "Clärchens Ballhaus".to_string(),
            address: "Auguststraße 24, Berlin".to_string(),
            capacity: 300,
            description: None,
        };
        let json = serde_json::to_value(&request).unwrap();
        assert!(json.get("description").is_none());
    }
}
