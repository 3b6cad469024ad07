//! Session lifecycle: login, logout, profile updates and forced expiry.

use thiserror::Error;
use tracing::{error, info, instrument, warn};

use dancemode_core::models::{LoginRequest, RegisterRequest, UserProfile, UserProfileUpdate};
use dancemode_core::{AuthState, AuthStateError};

use crate::api::{ApiClient, ApiError};
use crate::state::{ClientState, keys, pages};
use crate::store::{Readable, Store};

/// What logout clears besides authentication.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LogoutPolicy {
    /// Empty the cart when the user logs out.
    pub clear_cart: bool,
}

impl Default for LogoutPolicy {
    fn default() -> Self {
        Self { clear_cart: true }
    }
}

/// Errors from session operations that talk to the API.
#[derive(Debug, Error)]
pub enum AuthError {
    #[error(transparent)]
    Api(#[from] ApiError),
    #[error("Invalid session: {0}")]
    State(#[from] AuthStateError),
}

/// Applies authentication transitions to the client stores.
#[derive(Debug, Clone)]
pub struct AuthService {
    state: ClientState,
    policy: LogoutPolicy,
}

impl AuthService {
    #[must_use]
    pub const fn new(state: ClientState, policy: LogoutPolicy) -> Self {
        Self { state, policy }
    }

    #[must_use]
    pub const fn policy(&self) -> LogoutPolicy {
        self.policy
    }

    #[must_use]
    pub const fn state(&self) -> &ClientState {
        &self.state
    }

    /// Sanitized token of the current session, if any.
    #[must_use]
    pub fn bearer_token(&self) -> Option<String> {
        self.state.auth().get().bearer_token()
    }

    /// Enter the authenticated state and persist it.
    ///
    /// # Errors
    ///
    /// Returns `AuthStateError::EmptyToken` if the token has no ASCII
    /// characters; the current state is left untouched.
    pub fn login(&self, user: UserProfile, token: &str) -> Result<(), AuthStateError> {
        let next = AuthState::authenticated(user, token)?;
        info!(
            creator = next.is_creator,
            user_id = ?next.user.as_ref().map(|u| u.id),
            "User logged in"
        );
        self.state.auth().set(next);
        Ok(())
    }

    /// Return to the anonymous state and remove persisted credentials.
    ///
    /// Clears the cart as well when the policy says so.
    pub fn logout(&self) {
        self.reset_auth();
        if self.policy.clear_cart {
            self.state.cart().clear();
        }
        info!(cleared_cart = self.policy.clear_cart, "User logged out");
    }

    /// Merge `update` into the signed-in user's profile.
    ///
    /// Does nothing while anonymous.
    pub fn update_user(&self, update: UserProfileUpdate) {
        self.state.auth().update(|auth| auth.with_user_update(update));
    }

    /// Replace the signed-in user's profile, keeping the token.
    pub fn replace_user(&self, user: UserProfile) {
        self.state.auth().update(|auth| match auth.token.as_deref() {
            Some(token) if auth.is_authenticated => {
                AuthState::authenticated(user, token).unwrap_or_else(|_| auth.clone())
            }
            _ => auth.clone(),
        });
    }

    /// Forced logout after the server rejected the credentials.
    ///
    /// Removes every auth entry from storage and navigates to the login
    /// page. The cart is kept so the user can pick up after signing in.
    pub fn expire(&self) {
        warn!("Session expired, forcing logout");
        self.reset_auth();
        self.state.navigation().update(|nav| {
            let mut nav = nav.clone();
            nav.current_page = pages::LOGIN.to_string();
            nav.is_menu_open = false;
            nav
        });
    }

    fn reset_auth(&self) {
        self.state.auth().clear();
        for key in keys::AUTH_KEYS {
            if let Err(e) = self.state.storage().remove(key) {
                error!(key, error = %e, "Failed to remove auth entry");
            }
        }
    }

    // =========================================================================
    // API-backed flows
    // =========================================================================

    /// Log in through the API and store the session.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the returned token is unusable.
    #[instrument(skip(self, api, request), fields(email = %request.email))]
    pub async fn sign_in(&self, api: &ApiClient, request: &LoginRequest) -> Result<(), AuthError> {
        self.set_loading(true);
        let result = api.login(request).await;
        self.set_loading(false);

        let response = result?;
        self.login(response.user, &response.token)?;
        Ok(())
    }

    /// Create an account through the API and store the session.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the returned token is unusable.
    #[instrument(skip(self, api, request), fields(email = %request.email))]
    pub async fn register(
        &self,
        api: &ApiClient,
        request: &RegisterRequest,
    ) -> Result<(), AuthError> {
        self.set_loading(true);
        let result = api.register(request).await;
        self.set_loading(false);

        let response = result?;
        self.login(response.user, &response.token)?;
        Ok(())
    }

    /// Tell the API the session is over, then log out locally.
    ///
    /// The local logout happens even if the request fails.
    #[instrument(skip(self, api))]
    pub async fn sign_out(&self, api: &ApiClient) {
        if self.state.auth().get().is_authenticated
            && let Err(e) = api.logout().await
        {
            warn!(error = %e, "Logout request failed, clearing local session anyway");
        }
        self.logout();
    }

    /// Fetch the profile from the API and store it.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    pub async fn refresh_profile(&self, api: &ApiClient) -> Result<UserProfile, AuthError> {
        let profile = api.get_profile().await?;
        self.replace_user(profile.clone());
        Ok(profile)
    }

    /// Send `update` to the API and store the resulting profile.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    pub async fn save_profile(
        &self,
        api: &ApiClient,
        update: &UserProfileUpdate,
    ) -> Result<UserProfile, AuthError> {
        let profile = api.update_profile(update).await?;
        self.replace_user(profile.clone());
        Ok(profile)
    }

    fn set_loading(&self, loading: bool) {
        self.state.loading().update(|l| {
            let mut l = *l;
            l.auth = loading;
            l
        });
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::Arc;
    use std::time::Duration;

    use dancemode_core::models::UserRole;
    use dancemode_core::{CartItem, CartItemKind, Price};
    use uuid::Uuid;

    use super::*;
    use crate::services::notifications::Notifications;
    use crate::storage::{MemoryStorage, Storage};

    fn user(role: UserRole) -> UserProfile {
        serde_json::from_value(serde_json::json!({
            "id": Uuid::from_u128(7),
            "first_name": "Frankie",
            "last_name": "Manning",
            "email": "frankie@example.com",
            "role": role,
            "is_creator": false,
        }))
        .unwrap()
    }

    fn setup(policy: LogoutPolicy) -> (Arc<MemoryStorage>, ClientState, AuthService) {
        let storage = Arc::new(MemoryStorage::new());
        let state = ClientState::new(
            Arc::clone(&storage) as Arc<dyn Storage>,
            Notifications::new(Duration::from_secs(5)),
        );
        let auth = AuthService::new(state.clone(), policy);
        (storage, state, auth)
    }

    fn fill_cart(state: &ClientState) {
        state.cart().update(|c| {
            c.with_item(CartItem::new(
                Uuid::from_u128(1),
                CartItemKind::Event,
                Price::from_cents(1000),
            ))
        });
    }

    #[test]
    fn test_login_persists_sanitized_token() {
        let (storage, state, auth) = setup(LogoutPolicy::default());
        auth.login(user(UserRole::User), "abc\u{e9}123").unwrap();

        let current = state.auth().get();
        assert!(current.is_authenticated);
        assert_eq!(current.token.as_deref(), Some("abc123"));
        assert!(!current.is_creator);
        assert!(storage.contains(keys::AUTH));
    }

    #[test]
    fn test_login_derives_creator_from_role() {
        let (_, state, auth) = setup(LogoutPolicy::default());
        auth.login(user(UserRole::Creator), "token").unwrap();
        assert!(state.auth().get().is_creator);
    }

    #[test]
    fn test_login_rejects_empty_token() {
        let (_, state, auth) = setup(LogoutPolicy::default());
        let err = auth.login(user(UserRole::User), "\u{e9}\u{e8}").unwrap_err();
        assert_eq!(err, AuthStateError::EmptyToken);
        assert!(!state.auth().get().is_authenticated);
    }

    #[test]
    fn test_logout_clears_auth_and_cart() {
        let (storage, state, auth) = setup(LogoutPolicy::default());
        auth.login(user(UserRole::User), "token").unwrap();
        storage.set(keys::AUTH_TOKEN, "\"legacy\"").unwrap();
        fill_cart(&state);

        auth.logout();

        assert_eq!(state.auth().get(), AuthState::anonymous());
        assert!(!storage.contains(keys::AUTH));
        assert!(!storage.contains(keys::AUTH_TOKEN));
        assert!(state.cart().get().is_empty());
    }

    #[test]
    fn test_logout_can_keep_cart() {
        let (_, state, auth) = setup(LogoutPolicy { clear_cart: false });
        auth.login(user(UserRole::User), "token").unwrap();
        fill_cart(&state);

        auth.logout();

        assert!(!state.auth().get().is_authenticated);
        assert_eq!(state.cart().get().len(), 1);
    }

    #[test]
    fn test_update_user_is_noop_when_anonymous() {
        let (_, state, auth) = setup(LogoutPolicy::default());
        auth.update_user(UserProfileUpdate {
            first_name: Some("Norma".to_string()),
            ..Default::default()
        });
        assert_eq!(state.auth().get(), AuthState::anonymous());
    }

    #[test]
    fn test_update_user_merges_profile() {
        let (_, state, auth) = setup(LogoutPolicy::default());
        auth.login(user(UserRole::User), "token").unwrap();
        auth.update_user(UserProfileUpdate {
            first_name: Some("Norma".to_string()),
            ..Default::default()
        });

        let current = state.auth().get();
        let profile = current.user.unwrap();
        assert_eq!(profile.first_name, "Norma");
        assert_eq!(profile.last_name, "Manning");
        assert_eq!(current.token.as_deref(), Some("token"));
    }

    #[test]
    fn test_replace_user_keeps_token() {
        let (_, state, auth) = setup(LogoutPolicy::default());
        auth.login(user(UserRole::User), "token").unwrap();
        auth.replace_user(user(UserRole::Creator));

        let current = state.auth().get();
        assert!(current.is_creator);
        assert_eq!(current.token.as_deref(), Some("token"));
    }

    #[test]
    fn test_expire_keeps_cart_and_navigates_to_login() {
        let (storage, state, auth) = setup(LogoutPolicy::default());
        auth.login(user(UserRole::User), "token").unwrap();
        storage.set(keys::USER, "{}").unwrap();
        fill_cart(&state);

        auth.expire();

        assert!(!state.auth().get().is_authenticated);
        assert!(!storage.contains(keys::AUTH));
        assert!(!storage.contains(keys::USER));
        assert_eq!(state.cart().get().len(), 1);
        assert_eq!(state.navigation().get().current_page, pages::LOGIN);
    }
}
