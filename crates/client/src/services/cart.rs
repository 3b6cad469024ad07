//! Cart operations and checkout.

use thiserror::Error;
use tracing::{info, instrument, warn};
use uuid::Uuid;

use dancemode_core::models::{CreateRegistrationRequest, Registration};
use dancemode_core::{CartItem, CartItemKind, EventId, PackageId};

use crate::api::{ApiClient, ApiError};
use crate::state::ClientState;
use crate::store::{Readable, Store};

/// Errors that can occur during checkout.
#[derive(Debug, Error)]
pub enum CartError {
    #[error("Cart is empty")]
    Empty,
    #[error("Sign in to check out")]
    NotAuthenticated,
    #[error("Checkout stopped after {} registration(s): {source}", .completed.len())]
    Checkout {
        /// Registrations created before the failure.
        completed: Vec<Registration>,
        source: ApiError,
    },
}

/// Applies cart transitions to the persisted cart store.
#[derive(Debug, Clone)]
pub struct CartService {
    state: ClientState,
}

impl CartService {
    #[must_use]
    pub const fn new(state: ClientState) -> Self {
        Self { state }
    }

    /// Add `item` unless an item with the same id and kind is present.
    pub fn add_item(&self, item: CartItem) {
        self.state.cart().update(|cart| cart.with_item(item));
    }

    /// Remove every item matching `id` and `kind`.
    pub fn remove_item(&self, id: Uuid, kind: CartItemKind) {
        self.state.cart().update(|cart| cart.without_item(id, kind));
    }

    /// Empty the cart and remove its persisted entry.
    pub fn clear_cart(&self) {
        self.state.cart().clear();
    }

    #[must_use]
    pub fn contains(&self, id: Uuid, kind: CartItemKind) -> bool {
        self.state.cart().get().contains(id, kind)
    }

    /// Register the signed-in user for every item in the cart.
    ///
    /// Items are registered one at a time in cart order, and each item
    /// leaves the cart as soon as its registration succeeds. If one fails,
    /// the rest stay in the cart. Items added while checkout is running are
    /// not part of it and are kept.
    ///
    /// # Errors
    ///
    /// Returns `CartError::Empty` or `CartError::NotAuthenticated` before
    /// sending anything, or `CartError::Checkout` on the first failed
    /// registration.
    #[instrument(skip(self, api))]
    pub async fn checkout(&self, api: &ApiClient) -> Result<Vec<Registration>, CartError> {
        let cart = self.state.cart().get();
        if cart.is_empty() {
            return Err(CartError::Empty);
        }
        if !self.state.is_authenticated() {
            return Err(CartError::NotAuthenticated);
        }

        let mut completed = Vec::with_capacity(cart.len());
        for item in cart.items() {
            match api.create_registration(&registration_request(item)).await {
                Ok(registration) => {
                    self.remove_item(item.id, item.kind);
                    completed.push(registration);
                }
                Err(source) => {
                    warn!(
                        item_id = %item.id,
                        kind = %item.kind,
                        completed = completed.len(),
                        error = %source,
                        "Checkout stopped"
                    );
                    self.state
                        .notifications()
                        .show_error(format!("Registration failed: {source}"));
                    return Err(CartError::Checkout { completed, source });
                }
            }
        }

        info!(registrations = completed.len(), "Checkout complete");
        self.state.notifications().show_success(format!(
            "Registered for {} item(s), total {}",
            completed.len(),
            cart.total().display()
        ));
        Ok(completed)
    }
}

fn registration_request(item: &CartItem) -> CreateRegistrationRequest {
    match item.kind {
        CartItemKind::Event => CreateRegistrationRequest::for_event(EventId::new(item.id)),
        CartItemKind::Package => CreateRegistrationRequest::for_package(PackageId::new(item.id)),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::Arc;
    use std::time::Duration;

    use dancemode_core::Price;

    use super::*;
    use crate::services::notifications::Notifications;
    use crate::storage::MemoryStorage;

    fn service() -> (ClientState, CartService) {
        let state = ClientState::new(
            Arc::new(MemoryStorage::new()),
            Notifications::new(Duration::from_secs(5)),
        );
        (state.clone(), CartService::new(state))
    }

    fn item(n: u128, kind: CartItemKind, euros: i64) -> CartItem {
        CartItem::new(Uuid::from_u128(n), kind, Price::from_cents(euros * 100))
    }

    #[test]
    fn test_add_then_remove_scenario() {
        let (state, cart) = service();
        cart.add_item(item(1, CartItemKind::Event, 10));
        cart.add_item(item(2, CartItemKind::Package, 25));
        cart.remove_item(Uuid::from_u128(1), CartItemKind::Event);

        let current = state.cart().get();
        assert_eq!(current.len(), 1);
        assert_eq!(current.items().first().unwrap().id, Uuid::from_u128(2));
        assert_eq!(current.total(), Price::from_cents(2500));
    }

    #[test]
    fn test_add_is_idempotent() {
        let (state, cart) = service();
        cart.add_item(item(1, CartItemKind::Event, 10));
        let before = state.cart().get();
        cart.add_item(item(1, CartItemKind::Event, 10));
        assert_eq!(state.cart().get(), before);
    }

    #[test]
    fn test_same_id_different_kind_are_distinct() {
        let (_, cart) = service();
        cart.add_item(item(1, CartItemKind::Event, 10));
        assert!(cart.contains(Uuid::from_u128(1), CartItemKind::Event));
        assert!(!cart.contains(Uuid::from_u128(1), CartItemKind::Package));
    }

    #[test]
    fn test_clear_cart_removes_entry() {
        let (state, cart) = service();
        cart.add_item(item(1, CartItemKind::Event, 10));
        assert!(state.storage().get(crate::state::keys::CART).unwrap().is_some());

        cart.clear_cart();
        assert!(state.cart().get().is_empty());
        assert_eq!(state.cart().get().total(), Price::ZERO);
        assert!(state.storage().get(crate::state::keys::CART).unwrap().is_none());
    }

    #[test]
    fn test_registration_request_by_kind() {
        let event = registration_request(&item(3, CartItemKind::Event, 1));
        assert_eq!(event.event_id, Some(EventId::new(Uuid::from_u128(3))));
        assert_eq!(event.package_id, None);

        let package = registration_request(&item(4, CartItemKind::Package, 1));
        assert_eq!(package.package_id, Some(PackageId::new(Uuid::from_u128(4))));
        assert_eq!(package.event_id, None);
    }
}
