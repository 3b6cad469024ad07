//! User profile and credential payloads.

use chrono::{DateTime, Utc};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize, Serializer};

use crate::types::{DanceExperience, UserId};

/// Role of an account on the platform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    Creator,
    Admin,
    /// Also used for roles this client does not know.
    #[default]
    #[serde(other)]
    User,
}

/// Public profile of the signed-in user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    pub id: UserId,
    pub first_name: String,
    pub last_name: String,
    #[serde(default)]
    pub username: Option<String>,
    pub email: String,
    #[serde(default)]
    pub role: UserRole,
    #[serde(default)]
    pub avatar: Option<String>,
    #[serde(default)]
    pub is_creator: bool,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub dance_experience: Option<DanceExperience>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

impl UserProfile {
    /// Name to show in the UI: the username when set, otherwise the full name.
    #[must_use]
    pub fn display_name(&self) -> String {
        match &self.username {
            Some(username) if !username.is_empty() => username.clone(),
            _ => format!("{} {}", self.first_name, self.last_name)
                .trim()
                .to_string(),
        }
    }

    /// Whether this profile grants creator privileges.
    #[must_use]
    pub fn has_creator_access(&self) -> bool {
        self.role == UserRole::Creator || self.is_creator
    }

    /// Merge a partial update into this profile, field by field.
    pub fn apply(&mut self, update: UserProfileUpdate) {
        let UserProfileUpdate {
            first_name,
            last_name,
            username,
            email,
            role,
            avatar,
            is_creator,
            phone,
            dance_experience,
        } = update;

        if let Some(v) = first_name {
            self.first_name = v;
        }
        if let Some(v) = last_name {
            self.last_name = v;
        }
        if let Some(v) = username {
            self.username = Some(v);
        }
        if let Some(v) = email {
            self.email = v;
        }
        if let Some(v) = role {
            self.role = v;
        }
        if let Some(v) = avatar {
            self.avatar = Some(v);
        }
        if let Some(v) = is_creator {
            self.is_creator = v;
        }
        if let Some(v) = phone {
            self.phone = Some(v);
        }
        if let Some(v) = dance_experience {
            self.dance_experience = Some(v);
        }
    }
}

/// Partial profile update. `None` fields are left untouched.
///
/// Doubles as the body of `PUT /api/users/profile`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfileUpdate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<UserRole>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_creator: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dance_experience: Option<DanceExperience>,
}

/// Body of `POST /api/auth/login`.
///
/// Implements `Debug` manually to redact the password.
#[derive(Clone, Serialize)]
pub struct LoginRequest {
    pub email: String,
    #[serde(serialize_with = "expose_password")]
    pub password: SecretString,
}

impl std::fmt::Debug for LoginRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoginRequest")
            .field("email", &self.email)
            .field("password", &"[REDACTED]")
            .finish()
    }
}

/// Body of `POST /api/auth/register`.
#[derive(Clone, Serialize)]
pub struct RegisterRequest {
    pub email: String,
    #[serde(serialize_with = "expose_password")]
    pub password: SecretString,
    pub first_name: String,
    pub last_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    pub dance_experience: DanceExperience,
}

impl std::fmt::Debug for RegisterRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RegisterRequest")
            .field("email", &self.email)
            .field("password", &"[REDACTED]")
            .field("first_name", &self.first_name)
            .field("last_name", &self.last_name)
            .field("phone", &self.phone)
            .field("dance_experience", &self.dance_experience)
            .finish()
    }
}

/// Payload returned by login and registration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct AuthResponse {
    pub token: String,
    pub user: UserProfile,
}

fn expose_password<S: Serializer>(
    password: &SecretString,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(password.expose_secret())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
pub(crate) mod tests {
    use super::*;

    pub(crate) fn profile(role: UserRole) -> UserProfile {
        UserProfile {
            id: UserId::new(uuid::Uuid::nil()),
            first_name: "Ada".to_string(),
            last_name: "Lindy".to_string(),
            username: None,
            email: "ada@example.com".to_string(),
            role,
            avatar: None,
            is_creator: false,
            phone: None,
            dance_experience: Some(DanceExperience::Intermediate),
            created_at: None,
        }
    }

    #[test]
    fn test_unknown_role_maps_to_user() {
        let role: UserRole = serde_json::from_str("\"moderator\"").unwrap();
        assert_eq!(role, UserRole::User);
        let role: UserRole = serde_json::from_str("\"creator\"").unwrap();
        assert_eq!(role, UserRole::Creator);
    }

    #[test]
    fn test_backend_profile_without_optional_fields() {
        let json = r#"{
            "id": "00000000-0000-0000-0000-000000000000",
            "email": "ada@example.com",
            "first_name": "Ada",
            "last_name": "Lindy",
            "phone": null,
            "dance_experience": "Advanced",
            "created_at": "2024-05-01T10:00:00Z"
        }"#;
        let parsed: UserProfile = serde_json::from_str(json).unwrap();
        assert_eq!(parsed.role, UserRole::User);
        assert_eq!(parsed.dance_experience, Some(DanceExperience::Advanced));
        assert!(!parsed.has_creator_access());
    }

    #[test]
    fn test_display_name() {
        let mut user = profile(UserRole::User);
        assert_eq!(user.display_name(), "Ada Lindy");
        user.username = Some("ada_swings".to_string());
        assert_eq!(user.display_name(), "ada_swings");
    }

    #[test]
    fn test_apply_only_touches_given_fields() {
        let mut user = profile(UserRole::User);
        user.apply(UserProfileUpdate {
            last_name: Some("Hopper".to_string()),
            avatar: Some("https://cdn.example.com/a.png".to_string()),
            ..UserProfileUpdate::default()
        });
        assert_eq!(user.first_name, "Ada");
        assert_eq!(user.last_name, "Hopper");
        assert_eq!(user.avatar.as_deref(), Some("https://cdn.example.com/a.png"));
        assert_eq!(user.email, "ada@example.com");
    }

    #[test]
    fn test_update_body_skips_unset_fields() {
        let update = UserProfileUpdate {
            phone: Some("+49 30 1234".to_string()),
            ..UserProfileUpdate::default()
        };
        let json = serde_json::to_value(&update).unwrap();
        assert_eq!(json, serde_json::json!({ "phone": "+49 30 1234" }));
    }

    #[test]
    fn test_login_request_serializes_password_but_debug_redacts() {
        let request = LoginRequest {
            email: "ada@example.com".to_string(),
            password: SecretString::from("hunter2-but-longer"),
        };
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["password"], "hunter2-but-longer");

        let debug = format!("{request:?}");
        assert!(debug.contains("[REDACTED]"));
        assert!(!debug.contains("hunter2"));
    }
}
