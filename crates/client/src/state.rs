//! Client state shared across services.
//!
//! `ClientState` owns every store the client uses. It is created once at
//! the root of the application and handed to whatever needs it; there are
//! no global stores.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use dancemode_core::models::{DataStatistics, Event, Package, UserProfile, Venue};
use dancemode_core::{AuthState, CartState, Price};

use crate::services::notifications::Notifications;
use crate::storage::Storage;
use crate::store::{Derived, MemoryStore, PersistedStore, Readable};

/// Durable storage keys.
pub mod keys {
    /// Serialized [`AuthState`](dancemode_core::AuthState).
    pub const AUTH: &str = "auth";
    /// Bare token written by older clients.
    pub const AUTH_TOKEN: &str = "auth_token";
    /// Bare user profile written by older clients.
    pub const USER: &str = "user";
    /// Serialized [`Theme`](super::Theme).
    pub const THEME: &str = "theme";
    /// Serialized [`CartState`](dancemode_core::CartState).
    pub const CART: &str = "cart";

    /// Every key holding authentication data.
    pub const AUTH_KEYS: [&str; 3] = [AUTH, AUTH_TOKEN, USER];
}

/// Page names used for navigation.
pub mod pages {
    pub const HOME: &str = "home";
    pub const LOGIN: &str = "login";
}

/// Color theme preference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    /// The other theme.
    #[must_use]
    pub const fn toggled(self) -> Self {
        match self {
            Self::Light => Self::Dark,
            Self::Dark => Self::Light,
        }
    }
}

/// Navigation chrome state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavigationState {
    pub is_menu_open: bool,
    pub current_page: String,
}

impl Default for NavigationState {
    fn default() -> Self {
        Self {
            is_menu_open: false,
            current_page: pages::HOME.to_string(),
        }
    }
}

/// In-flight request flags, one per resource.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LoadingState {
    pub events: bool,
    pub packages: bool,
    pub venues: bool,
    pub auth: bool,
}

/// Creator dashboard data.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CreatorState {
    pub content: Option<serde_json::Value>,
    pub analytics: Option<serde_json::Value>,
    pub elements: Vec<serde_json::Value>,
}

/// Every store owned by the client.
///
/// This struct is cheaply cloneable; clones share the same stores.
#[derive(Clone)]
pub struct ClientState {
    inner: Arc<ClientStateInner>,
}

struct ClientStateInner {
    storage: Arc<dyn Storage>,
    auth: PersistedStore<AuthState>,
    cart: PersistedStore<CartState>,
    theme: PersistedStore<Theme>,
    navigation: MemoryStore<NavigationState>,
    events: MemoryStore<Vec<Event>>,
    venues: MemoryStore<Vec<Venue>>,
    packages: MemoryStore<Vec<Package>>,
    statistics: MemoryStore<Option<DataStatistics>>,
    loading: MemoryStore<LoadingState>,
    creator: MemoryStore<CreatorState>,
    notifications: Notifications,
}

impl std::fmt::Debug for ClientState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClientState")
            .field("auth", &self.inner.auth)
            .field("cart", &self.inner.cart)
            .field("theme", &self.inner.theme)
            .finish_non_exhaustive()
    }
}

impl ClientState {
    /// Create the client state, rehydrating persisted stores from `storage`.
    ///
    /// Credentials stored by older clients under `auth_token` and `user`
    /// are folded into the `auth` entry first.
    pub fn new(storage: Arc<dyn Storage>, notifications: Notifications) -> Self {
        migrate_legacy_auth(storage.as_ref());

        Self {
            inner: Arc::new(ClientStateInner {
                auth: PersistedStore::new(keys::AUTH, AuthState::anonymous(), Arc::clone(&storage)),
                cart: PersistedStore::new(keys::CART, CartState::empty(), Arc::clone(&storage)),
                theme: PersistedStore::new(keys::THEME, Theme::default(), Arc::clone(&storage)),
                storage,
                navigation: MemoryStore::new(NavigationState::default()),
                events: MemoryStore::new(Vec::new()),
                venues: MemoryStore::new(Vec::new()),
                packages: MemoryStore::new(Vec::new()),
                statistics: MemoryStore::new(None),
                loading: MemoryStore::new(LoadingState::default()),
                creator: MemoryStore::new(CreatorState::default()),
                notifications,
            }),
        }
    }

    /// Durable storage shared by the persisted stores.
    #[must_use]
    pub fn storage(&self) -> &Arc<dyn Storage> {
        &self.inner.storage
    }

    /// Authentication state (persisted under `auth`).
    #[must_use]
    pub fn auth(&self) -> &PersistedStore<AuthState> {
        &self.inner.auth
    }

    /// Shopping cart (persisted under `cart`).
    #[must_use]
    pub fn cart(&self) -> &PersistedStore<CartState> {
        &self.inner.cart
    }

    /// Theme preference (persisted under `theme`).
    #[must_use]
    pub fn theme(&self) -> &PersistedStore<Theme> {
        &self.inner.theme
    }

    #[must_use]
    pub fn navigation(&self) -> &MemoryStore<NavigationState> {
        &self.inner.navigation
    }

    /// Last fetched events.
    #[must_use]
    pub fn events(&self) -> &MemoryStore<Vec<Event>> {
        &self.inner.events
    }

    /// Last fetched venues.
    #[must_use]
    pub fn venues(&self) -> &MemoryStore<Vec<Venue>> {
        &self.inner.venues
    }

    /// Last fetched packages.
    #[must_use]
    pub fn packages(&self) -> &MemoryStore<Vec<Package>> {
        &self.inner.packages
    }

    /// Last fetched data statistics.
    #[must_use]
    pub fn statistics(&self) -> &MemoryStore<Option<DataStatistics>> {
        &self.inner.statistics
    }

    #[must_use]
    pub fn loading(&self) -> &MemoryStore<LoadingState> {
        &self.inner.loading
    }

    #[must_use]
    pub fn creator(&self) -> &MemoryStore<CreatorState> {
        &self.inner.creator
    }

    #[must_use]
    pub fn notifications(&self) -> &Notifications {
        &self.inner.notifications
    }

    /// Number of items in the cart, kept in step with the cart store.
    #[must_use]
    pub fn cart_item_count(&self) -> Derived<PersistedStore<CartState>, CartState, usize> {
        Derived::new(self.inner.cart.clone(), cart_item_count)
    }

    /// Cart total, kept in step with the cart store.
    #[must_use]
    pub fn cart_total(&self) -> Derived<PersistedStore<CartState>, CartState, Price> {
        Derived::new(self.inner.cart.clone(), CartState::total)
    }

    /// Name of the signed-in user, if any.
    #[must_use]
    pub fn display_name(&self) -> Derived<PersistedStore<AuthState>, AuthState, Option<String>> {
        Derived::new(self.inner.auth.clone(), display_name)
    }

    /// Whether the signed-in user is a creator.
    #[must_use]
    pub fn is_creator(&self) -> Derived<PersistedStore<AuthState>, AuthState, bool> {
        Derived::new(self.inner.auth.clone(), is_creator)
    }

    /// Whether a user is signed in.
    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.inner.auth.get().is_authenticated
    }
}

/// Build the `auth` entry from the bare `auth_token` and `user` entries.
///
/// Does nothing when `auth` already exists or either legacy entry is
/// missing. The legacy entries are removed once migrated.
fn migrate_legacy_auth(storage: &dyn Storage) {
    if !matches!(storage.get(keys::AUTH), Ok(None)) {
        return;
    }
    let (Ok(Some(raw_token)), Ok(Some(raw_user))) =
        (storage.get(keys::AUTH_TOKEN), storage.get(keys::USER))
    else {
        return;
    };

    // Older clients wrote the token either bare or as a JSON string
    let token = serde_json::from_str::<String>(&raw_token).unwrap_or(raw_token);
    let migrated = serde_json::from_str::<UserProfile>(&raw_user)
        .map_err(|e| e.to_string())
        .and_then(|user| AuthState::authenticated(user, &token).map_err(|e| e.to_string()))
        .and_then(|auth| serde_json::to_string(&auth).map_err(|e| e.to_string()));

    match migrated {
        Ok(raw) => {
            if let Err(e) = storage.set(keys::AUTH, &raw) {
                warn!(error = %e, "Failed to store migrated session");
                return;
            }
            for key in [keys::AUTH_TOKEN, keys::USER] {
                if let Err(e) = storage.remove(key) {
                    warn!(key, error = %e, "Failed to remove legacy auth entry");
                }
            }
            info!("Migrated legacy session entries");
        }
        Err(e) => warn!(error = %e, "Ignoring unusable legacy session entries"),
    }
}

// =============================================================================
// Projections
// =============================================================================

/// Number of items in `cart`.
#[must_use]
pub fn cart_item_count(cart: &CartState) -> usize {
    cart.len()
}

/// Whether `cart` is empty.
#[must_use]
pub fn cart_is_empty(cart: &CartState) -> bool {
    cart.is_empty()
}

/// Display name of the signed-in user.
#[must_use]
pub fn display_name(auth: &AuthState) -> Option<String> {
    auth.user.as_ref().map(dancemode_core::models::UserProfile::display_name)
}

/// Whether the signed-in user has creator access.
#[must_use]
pub const fn is_creator(auth: &AuthState) -> bool {
    auth.is_authenticated && auth.is_creator
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::time::Duration;

    use dancemode_core::{CartItem, CartItemKind};

    use super::*;
    use crate::storage::MemoryStorage;
    use crate::store::Store;

    fn state(storage: Arc<dyn Storage>) -> ClientState {
        ClientState::new(storage, Notifications::new(Duration::from_secs(5)))
    }

    #[test]
    fn test_fresh_state_defaults() {
        let state = state(Arc::new(MemoryStorage::new()));
        assert_eq!(state.auth().get(), AuthState::anonymous());
        assert!(state.cart().get().is_empty());
        assert_eq!(state.theme().get(), Theme::Light);
        assert_eq!(state.navigation().get().current_page, pages::HOME);
        assert!(!state.is_authenticated());
    }

    #[test]
    fn test_persisted_stores_survive_restart() {
        let storage: Arc<dyn Storage> = Arc::new(MemoryStorage::new());
        let first = state(Arc::clone(&storage));
        first.theme().update(|t| t.toggled());
        first.cart().update(|c| {
            c.with_item(CartItem::new(
                uuid::Uuid::from_u128(1),
                CartItemKind::Event,
                Price::from_cents(1500),
            ))
        });
        first.events().set(Vec::new());

        let second = state(storage);
        assert_eq!(second.theme().get(), Theme::Dark);
        assert_eq!(second.cart().get().total(), Price::from_cents(1500));
    }

    #[test]
    fn test_derived_cart_projections() {
        let state = state(Arc::new(MemoryStorage::new()));
        let count = state.cart_item_count();
        let total = state.cart_total();
        assert_eq!(count.get(), 0);

        state.cart().update(|c| {
            c.with_item(CartItem::new(
                uuid::Uuid::from_u128(2),
                CartItemKind::Package,
                Price::from_cents(4000),
            ))
        });
        assert_eq!(count.get(), 1);
        assert_eq!(total.get(), Price::from_cents(4000));
        assert!(!cart_is_empty(&state.cart().get()));
    }

    #[test]
    fn test_legacy_session_is_migrated() {
        let storage = Arc::new(MemoryStorage::new());
        storage.set(keys::AUTH_TOKEN, "tok\u{e9}en").unwrap();
        storage
            .set(
                keys::USER,
                r#"{"id":"00000000-0000-0000-0000-000000000001","first_name":"Ada","last_name":"Lindy","email":"ada@example.com","role":"creator"}"#,
            )
            .unwrap();

        let state = state(Arc::clone(&storage) as Arc<dyn Storage>);
        let auth = state.auth().get();
        assert!(auth.is_authenticated);
        assert!(auth.is_creator);
        assert_eq!(auth.token.as_deref(), Some("token"));
        assert!(!storage.contains(keys::AUTH_TOKEN));
        assert!(!storage.contains(keys::USER));
        assert_eq!(state.display_name().get().as_deref(), Some("Ada Lindy"));
    }

    #[test]
    fn test_unusable_legacy_session_is_ignored() {
        let storage = Arc::new(MemoryStorage::new());
        storage.set(keys::AUTH_TOKEN, "token").unwrap();
        storage.set(keys::USER, "not json").unwrap();

        let state = state(Arc::clone(&storage) as Arc<dyn Storage>);
        assert!(!state.is_authenticated());
        assert!(storage.contains(keys::AUTH_TOKEN));
    }

    #[test]
    fn test_auth_projections_on_anonymous() {
        let state = state(Arc::new(MemoryStorage::new()));
        assert_eq!(state.display_name().get(), None);
        assert!(!state.is_creator().get());
    }
}
