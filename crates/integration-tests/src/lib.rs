//! Integration tests for the Dancemode client.
//!
//! Each test starts a `wiremock` server standing in for the ticketing
//! service and points a fresh [`DancemodeClient`] at it. Client state lives
//! in a [`MemoryStorage`] the test can inspect.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p dancemode-integration-tests
//! ```
//!
//! # Test Categories
//!
//! - `session` - Bearer header, login/logout, forced logout on 401
//! - `envelope` - Envelope decoding and error mapping
//! - `save_all` - Bulk creation under both failure policies
//! - `catalog_cart` - Catalog loading and checkout

#![allow(clippy::unwrap_used, clippy::missing_panics_doc)]

use std::sync::Arc;
use std::time::Duration;

use serde_json::{Value, json};
use url::Url;
use uuid::Uuid;
use wiremock::MockServer;

use dancemode_client::DancemodeClient;
use dancemode_client::config::{ApiConfig, ClientConfig};
use dancemode_client::storage::{MemoryStorage, Storage};
use dancemode_core::models::UserProfile;

/// Mock service plus a client pointed at it.
pub struct TestContext {
    pub server: MockServer,
    pub client: DancemodeClient,
    pub storage: Arc<MemoryStorage>,
}

impl TestContext {
    /// Start a mock server and a client with default settings.
    pub async fn new() -> Self {
        Self::with_config(|_| {}).await
    }

    /// Start a mock server and a client with `configure` applied.
    pub async fn with_config(configure: impl FnOnce(&mut ClientConfig)) -> Self {
        let server = MockServer::start().await;
        let mut config = ClientConfig {
            api: ApiConfig {
                base_url: Url::parse(&server.uri()).unwrap(),
                timeout: Duration::from_secs(5),
            },
            state_dir: None,
            ..ClientConfig::default()
        };
        configure(&mut config);

        let storage = Arc::new(MemoryStorage::new());
        let client = DancemodeClient::with_storage(config, Arc::clone(&storage) as Arc<dyn Storage>)
            .unwrap();

        Self {
            server,
            client,
            storage,
        }
    }

    /// Store a session locally without calling the service.
    pub fn sign_in(&self, token: &str) {
        self.client.auth().login(user(), token).unwrap();
    }

    /// `Authorization` headers of every request the server received.
    pub async fn authorization_headers(&self) -> Vec<Option<String>> {
        self.server
            .received_requests()
            .await
            .unwrap_or_default()
            .iter()
            .map(|request| {
                request
                    .headers
                    .get("authorization")
                    .and_then(|v| v.to_str().ok())
                    .map(str::to_string)
            })
            .collect()
    }
}

// =============================================================================
// Fixtures
// =============================================================================

/// A successful envelope around `data`.
#[must_use]
pub fn ok(data: Value) -> Value {
    json!({ "success": true, "data": data })
}

/// A rejected envelope.
#[must_use]
pub fn rejected(error: &str) -> Value {
    json!({ "success": false, "data": null, "error": error })
}

#[must_use]
pub fn user_json() -> Value {
    json!({
        "id": "00000000-0000-0000-0000-00000000000a",
        "first_name": "Ada",
        "last_name": "Lindy",
        "email": "ada@example.com",
        "role": "user",
        "is_creator": false,
        "dance_experience": "Intermediate",
    })
}

#[must_use]
pub fn user() -> UserProfile {
    serde_json::from_value(user_json()).unwrap()
}

#[must_use]
pub fn id(n: u128) -> Uuid {
    Uuid::from_u128(n)
}

#[must_use]
pub fn event_json(n: u128, price: f64) -> Value {
    json!({
        "id": id(n),
        "title": format!("Lindy Exchange {n}"),
        "description": "Three nights of social dancing",
        "start_date": "2025-06-06T18:00:00Z",
        "end_date": "2025-06-08T23:00:00Z",
        "venue_id": id(100),
        "max_participants": 120,
        "current_participants": 40,
        "price": price,
        "event_type": "Festival",
    })
}

#[must_use]
pub fn venue_json(n: u128) -> Value {
    json!({
        "id": id(n),
        "name": "Ballhaus",
        "address": "Auguststrasse 24, Berlin",
        "capacity": 300,
    })
}

#[must_use]
pub fn package_json(n: u128, price: f64) -> Value {
    json!({
        "id": id(n),
        "name": "Full Pass",
        "description": "All workshops and parties",
        "price": price,
        "duration_days": 3,
        "max_participants": 80,
    })
}

#[must_use]
pub fn registration_json(n: u128, event: Option<u128>, package: Option<u128>) -> Value {
    json!({
        "id": id(n),
        "user_id": id(10),
        "event_id": event.map(id),
        "package_id": package.map(id),
        "status": "Pending",
        "payment_status": "Pending",
        "created_at": "2025-05-01T10:00:00Z",
        "updated_at": "2025-05-01T10:00:00Z",
    })
}

#[must_use]
pub fn statistics_json() -> Value {
    json!({
        "users": 12,
        "events": 3,
        "venues": 2,
        "packages": 1,
        "registrations": 20,
        "total_records": 38,
        "last_updated": "2025-05-01T10:00:00Z",
    })
}

#[must_use]
pub fn bulk_json(success_count: usize, errors: &[&str]) -> Value {
    json!({
        "success_count": success_count,
        "error_count": errors.len(),
        "errors": errors,
    })
}
