//! Authentication state and its transitions.
//!
//! `AuthState` is a two-state machine: anonymous or authenticated. All
//! transitions here are pure; persisting the result is the caller's job.
//!
//! ## Invariant
//!
//! `is_authenticated` is `true` exactly when `token` is `Some`. The fields
//! are public for serialization, so the constructors below are the only
//! supported way to build a state.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::models::user::{UserProfile, UserProfileUpdate};

/// Errors that can occur when entering the authenticated state.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AuthStateError {
    /// The token contained nothing but non-ASCII characters (or nothing at all).
    #[error("token is empty after sanitizing")]
    EmptyToken,
}

/// Strip every character outside the ASCII range (`0x00`-`0x7F`).
///
/// HTTP header values must be ASCII; tokens pasted from rich-text sources
/// sometimes pick up stray characters that would make the request fail.
///
/// ```
/// use dancemode_core::sanitize_token;
///
/// assert_eq!(sanitize_token("abc\u{e9}123"), "abc123");
/// ```
#[must_use]
pub fn sanitize_token(token: &str) -> String {
    token.chars().filter(char::is_ascii).collect()
}

/// Authentication state of the client.
///
/// Implements `Debug` manually to redact the token.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct AuthState {
    pub is_authenticated: bool,
    pub user: Option<UserProfile>,
    pub token: Option<String>,
    #[serde(default)]
    pub is_creator: bool,
}

impl std::fmt::Debug for AuthState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthState")
            .field("is_authenticated", &self.is_authenticated)
            .field("user", &self.user)
            .field("token", &self.token.as_ref().map(|_| "[REDACTED]"))
            .field("is_creator", &self.is_creator)
            .finish()
    }
}

impl AuthState {
    /// The logged-out state.
    #[must_use]
    pub const fn anonymous() -> Self {
        Self {
            is_authenticated: false,
            user: None,
            token: None,
            is_creator: false,
        }
    }

    /// The logged-in state for `user` holding `token`.
    ///
    /// The token is sanitized first; `is_creator` is derived from the
    /// profile's role and creator flag.
    ///
    /// # Errors
    ///
    /// Returns `AuthStateError::EmptyToken` if nothing is left of the token
    /// after sanitizing.
    pub fn authenticated(user: UserProfile, token: &str) -> Result<Self, AuthStateError> {
        let token = sanitize_token(token);
        if token.is_empty() {
            return Err(AuthStateError::EmptyToken);
        }

        Ok(Self {
            is_authenticated: true,
            is_creator: user.has_creator_access(),
            user: Some(user),
            token: Some(token),
        })
    }

    /// A copy of this state with `update` merged into the user profile.
    ///
    /// Anonymous states are returned unchanged: an update never fabricates a
    /// user. The creator flag is re-derived from the merged profile.
    #[must_use]
    pub fn with_user_update(&self, update: UserProfileUpdate) -> Self {
        let Some(user) = &self.user else {
            return self.clone();
        };
        if !self.is_authenticated {
            return self.clone();
        }

        let mut user = user.clone();
        user.apply(update);

        Self {
            is_authenticated: true,
            is_creator: user.has_creator_access(),
            user: Some(user),
            token: self.token.clone(),
        }
    }

    /// The token to send as a bearer credential, if any.
    ///
    /// Sanitizes again because persisted state may predate sanitizing.
    #[must_use]
    pub fn bearer_token(&self) -> Option<String> {
        self.token
            .as_deref()
            .map(sanitize_token)
            .filter(|t| !t.is_empty())
    }

    /// Whether the state satisfies the authenticated/token invariant.
    #[must_use]
    pub const fn is_consistent(&self) -> bool {
        self.is_authenticated == self.token.is_some()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::models::user::UserRole;
    use crate::models::user::tests::profile;

    #[test]
    fn test_sanitize_strips_non_ascii() {
        assert_eq!(sanitize_token("abc\u{e9}123"), "abc123");
        assert_eq!(sanitize_token("eyJ\u{200b}hbGci"), "eyJhbGci");
        assert_eq!(sanitize_token("plain.jwt.value"), "plain.jwt.value");
    }

    #[test]
    fn test_authenticated_sets_fields() {
        let state = AuthState::authenticated(profile(UserRole::User), "tok\u{e9}en").unwrap();
        assert!(state.is_authenticated);
        assert_eq!(state.token.as_deref(), Some("token"));
        assert!(!state.is_creator);
        assert!(state.is_consistent());
    }

    #[test]
    fn test_creator_from_role_or_flag() {
        let by_role = AuthState::authenticated(profile(UserRole::Creator), "t").unwrap();
        assert!(by_role.is_creator);

        let mut flagged = profile(UserRole::User);
        flagged.is_creator = true;
        let by_flag = AuthState::authenticated(flagged, "t").unwrap();
        assert!(by_flag.is_creator);
    }

    #[test]
    fn test_empty_token_rejected() {
        let result = AuthState::authenticated(profile(UserRole::User), "\u{e9}\u{e8}");
        assert_eq!(result, Err(AuthStateError::EmptyToken));
    }

    #[test]
    fn test_anonymous_is_consistent() {
        let state = AuthState::anonymous();
        assert!(!state.is_authenticated);
        assert!(state.user.is_none());
        assert!(state.token.is_none());
        assert!(state.is_consistent());
        assert_eq!(state, AuthState::default());
    }

    #[test]
    fn test_update_on_anonymous_is_noop() {
        let state = AuthState::anonymous();
        let updated = state.with_user_update(UserProfileUpdate {
            first_name: Some("Ghost".to_string()),
            ..UserProfileUpdate::default()
        });
        assert_eq!(updated, state);
        assert!(updated.user.is_none());
    }

    #[test]
    fn test_update_merges_and_rederives_creator() {
        let state = AuthState::authenticated(profile(UserRole::User), "t").unwrap();
        let updated = state.with_user_update(UserProfileUpdate {
            role: Some(UserRole::Creator),
            ..UserProfileUpdate::default()
        });
        assert!(updated.is_creator);
        assert_eq!(updated.token, state.token);
        assert_eq!(updated.user.unwrap().first_name, "Ada");
    }

    #[test]
    fn test_bearer_token_resanitizes() {
        let state = AuthState {
            is_authenticated: true,
            user: None,
            token: Some("ab\u{e9}c".to_string()),
            is_creator: false,
        };
        assert_eq!(state.bearer_token().as_deref(), Some("abc"));
        assert_eq!(AuthState::anonymous().bearer_token(), None);
    }

    #[test]
    fn test_debug_redacts_token() {
        let state = AuthState::authenticated(profile(UserRole::User), "very-secret-token").unwrap();
        let debug = format!("{state:?}");
        assert!(debug.contains("[REDACTED]"));
        assert!(!debug.contains("very-secret-token"));
    }

    #[test]
    fn test_persisted_shape_is_camel_case() {
        let json = serde_json::to_value(AuthState::anonymous()).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "isAuthenticated": false,
                "user": null,
                "token": null,
                "isCreator": false
            })
        );
    }
}
