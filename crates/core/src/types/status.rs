//! Status and category enums exchanged with the ticketing service.
//!
//! Variants are serialized with their Rust names (`"Workshop"`,
//! `"WaitingList"`), matching the backend's representation.

use core::fmt;
use core::str::FromStr;

use serde::{Deserialize, Serialize};

/// Kind of dance event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EventType {
    Workshop,
    Festival,
    Intensive,
    Social,
    Competition,
}

/// Self-declared dance experience of a user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum DanceExperience {
    #[default]
    Beginner,
    Intermediate,
    Advanced,
    Professional,
}

impl DanceExperience {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Beginner => "Beginner",
            Self::Intermediate => "Intermediate",
            Self::Advanced => "Advanced",
            Self::Professional => "Professional",
        }
    }
}

impl fmt::Display for DanceExperience {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Parses case-insensitively (`"beginner"`, `"Advanced"`).
impl FromStr for DanceExperience {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "beginner" => Ok(Self::Beginner),
            "intermediate" => Ok(Self::Intermediate),
            "advanced" => Ok(Self::Advanced),
            "professional" => Ok(Self::Professional),
            other => Err(format!("unknown dance experience '{other}'")),
        }
    }
}

/// Lifecycle of a registration for an event or package.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RegistrationStatus {
    Pending,
    Confirmed,
    Cancelled,
    WaitingList,
}

impl RegistrationStatus {
    /// Whether the registration still holds a spot.
    #[must_use]
    pub const fn is_active(self) -> bool {
        matches!(self, Self::Pending | Self::Confirmed | Self::WaitingList)
    }
}

/// Payment state of a registration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PaymentStatus {
    Pending,
    Completed,
    Failed,
    Refunded,
}

impl PaymentStatus {
    /// Whether the registration still needs to be paid.
    #[must_use]
    pub const fn is_outstanding(self) -> bool {
        matches!(self, Self::Pending | Self::Failed)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_backend_variant_names() {
        assert_eq!(
            serde_json::to_string(&RegistrationStatus::WaitingList).unwrap(),
            "\"WaitingList\""
        );
        let parsed: EventType = serde_json::from_str("\"Festival\"").unwrap();
        assert_eq!(parsed, EventType::Festival);
    }

    #[test]
    fn test_status_predicates() {
        assert!(RegistrationStatus::WaitingList.is_active());
        assert!(!RegistrationStatus::Cancelled.is_active());
        assert!(PaymentStatus::Failed.is_outstanding());
        assert!(!PaymentStatus::Refunded.is_outstanding());
    }

    #[test]
    fn test_dance_experience_from_str() {
        assert_eq!("advanced".parse::<DanceExperience>().unwrap(), DanceExperience::Advanced);
        assert_eq!(
            " Professional ".parse::<DanceExperience>().unwrap(),
            DanceExperience::Professional
        );
        assert!("guru".parse::<DanceExperience>().is_err());
        assert_eq!(DanceExperience::Intermediate.to_string(), "Intermediate");
    }
}
