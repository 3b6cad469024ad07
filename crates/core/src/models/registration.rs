//! Registrations (tickets) and payments.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::types::{
    EventId, PackageId, PaymentStatus, Price, RegistrationId, RegistrationStatus, UserId,
};

/// A user's registration for an event or a package.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Registration {
    pub id: RegistrationId,
    pub user_id: UserId,
    #[serde(default)]
    pub event_id: Option<EventId>,
    #[serde(default)]
    pub package_id: Option<PackageId>,
    pub status: RegistrationStatus,
    pub payment_status: PaymentStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(default)]
    pub amount_paid: Price,
}

/// Body of `POST /api/registrations`. Exactly one of the two ids is set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateRegistrationRequest {
    pub event_id: Option<EventId>,
    pub package_id: Option<PackageId>,
}

impl CreateRegistrationRequest {
    /// Register for a single event.
    #[must_use]
    pub const fn for_event(event_id: EventId) -> Self {
        Self {
            event_id: Some(event_id),
            package_id: None,
        }
    }

    /// Register for a package.
    #[must_use]
    pub const fn for_package(package_id: PackageId) -> Self {
        Self {
            event_id: None,
            package_id: Some(package_id),
        }
    }
}

/// Body of `POST /api/registrations/{id}/payment`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentRequest {
    pub registration_id: RegistrationId,
    pub payment_method: String,
    pub amount: Price,
}
