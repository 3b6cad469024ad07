//! Root context wiring storage, stores, services and the API client.

use std::sync::Arc;

use tracing::{debug, info};

use crate::api::{ApiClient, ApiError};
use crate::config::ClientConfig;
use crate::services::{AuthService, CartService, CatalogService, Notifications};
use crate::state::ClientState;
use crate::storage::{FileStorage, NoopStorage, Storage};

/// Everything a front end needs, built once from configuration.
///
/// This struct is cheaply cloneable via `Arc`; clones share every store
/// and the HTTP connection pool.
#[derive(Clone)]
pub struct DancemodeClient {
    inner: Arc<DancemodeClientInner>,
}

struct DancemodeClientInner {
    config: ClientConfig,
    state: ClientState,
    auth: AuthService,
    cart: CartService,
    catalog: CatalogService,
    api: ApiClient,
}

impl std::fmt::Debug for DancemodeClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DancemodeClient")
            .field("config", &self.inner.config)
            .field("api", &self.inner.api)
            .finish_non_exhaustive()
    }
}

impl DancemodeClient {
    /// Create a client persisting to `config.state_dir`.
    ///
    /// Without a state directory nothing is persisted.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(config: ClientConfig) -> Result<Self, ApiError> {
        let storage: Arc<dyn Storage> = match &config.state_dir {
            Some(dir) => {
                info!(dir = %dir.display(), "Using file storage for client state");
                Arc::new(FileStorage::new(dir.clone()))
            }
            None => {
                debug!("No state directory, client state is not persisted");
                Arc::new(NoopStorage)
            }
        };
        Self::with_storage(config, storage)
    }

    /// Create a client on top of an explicit storage backend.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn with_storage(config: ClientConfig, storage: Arc<dyn Storage>) -> Result<Self, ApiError> {
        let notifications = Notifications::new(config.notification_clear_after);
        let state = ClientState::new(storage, notifications);
        let auth = AuthService::new(state.clone(), config.logout_policy);
        let api = ApiClient::new(&config.api, auth.clone())?;
        let cart = CartService::new(state.clone());
        let catalog = CatalogService::new(api.clone(), state.clone());

        Ok(Self {
            inner: Arc::new(DancemodeClientInner {
                config,
                state,
                auth,
                cart,
                catalog,
                api,
            }),
        })
    }

    #[must_use]
    pub fn config(&self) -> &ClientConfig {
        &self.inner.config
    }

    #[must_use]
    pub fn state(&self) -> &ClientState {
        &self.inner.state
    }

    #[must_use]
    pub fn auth(&self) -> &AuthService {
        &self.inner.auth
    }

    #[must_use]
    pub fn cart(&self) -> &CartService {
        &self.inner.cart
    }

    #[must_use]
    pub fn catalog(&self) -> &CatalogService {
        &self.inner.catalog
    }

    #[must_use]
    pub fn api(&self) -> &ApiClient {
        &self.inner.api
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use dancemode_core::models::UserProfile;

    use super::*;
    use crate::store::Readable;

    fn profile() -> UserProfile {
        serde_json::from_value(serde_json::json!({
            "id": "00000000-0000-0000-0000-000000000009",
            "first_name": "Norma",
            "last_name": "Miller",
            "email": "norma@example.com",
        }))
        .unwrap()
    }

    #[test]
    fn test_session_survives_restart_with_file_storage() {
        let dir = tempfile::tempdir().unwrap();
        let config = ClientConfig {
            state_dir: Some(dir.path().to_path_buf()),
            ..ClientConfig::default()
        };

        let first = DancemodeClient::new(config.clone()).unwrap();
        first.auth().login(profile(), "secret-token").unwrap();

        let second = DancemodeClient::new(config).unwrap();
        assert!(second.state().is_authenticated());
        assert_eq!(second.auth().bearer_token().as_deref(), Some("secret-token"));
        assert_eq!(second.state().display_name().get().as_deref(), Some("Norma Miller"));
    }

    #[test]
    fn test_without_state_dir_nothing_persists() {
        let config = ClientConfig {
            state_dir: None,
            ..ClientConfig::default()
        };
        let first = DancemodeClient::new(config.clone()).unwrap();
        first.auth().login(profile(), "secret-token").unwrap();
        assert!(first.state().is_authenticated());

        let second = DancemodeClient::new(config).unwrap();
        assert!(!second.state().is_authenticated());
    }
}
