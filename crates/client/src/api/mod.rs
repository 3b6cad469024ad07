//! REST API client for the ticketing service.
//!
//! # Architecture
//!
//! - One `reqwest::Client` with a fixed base URL, JSON content type and a
//!   request timeout
//! - Every request carries `Authorization: Bearer <token>` when the auth
//!   store holds a usable token
//! - A `401` from any endpoint expires the session before the error is
//!   returned to the caller
//! - Responses are `{ success, data, error }` envelopes; `success: false`
//!   becomes [`ApiError::Rejected`]
//!
//! Resource groups live in submodules, each an `impl ApiClient` block.
//!
//! # Example
//!
//! ```rust,ignore
//! let api = ApiClient::new(&config.api, auth.clone())?;
//! let events = api.list_events().await?;
//! ```

mod auth;
mod creator;
mod data;
mod elements;
mod events;
mod health;
mod packages;
mod registrations;
mod users;
mod venues;

pub use data::{BulkPolicy, ParseBulkPolicyError, SaveAllReport, StepOutcome};
pub use health::HealthStatus;

use std::sync::Arc;

use reqwest::header::{ACCEPT, CONTENT_TYPE, HeaderMap, HeaderValue};
use reqwest::{Method, RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use thiserror::Error;
use tracing::{debug, error};
use url::Url;

use dancemode_core::models::ApiEnvelope;

use crate::config::ApiConfig;
use crate::services::auth::AuthService;

/// Errors that can occur when calling the REST API.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Transport failure (connection, timeout, TLS).
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The server rejected the credentials; the session has been expired.
    #[error("Unauthorized: please log in again")]
    Unauthorized,

    /// Non-success HTTP status other than 401.
    #[error("API error {status}: {message}")]
    Status { status: u16, message: String },

    /// The envelope reported `success: false`.
    #[error("Request rejected: {0}")]
    Rejected(String),

    /// The envelope reported success without the expected `data`.
    #[error("Response has no data")]
    MissingData,

    /// The body was not the expected JSON.
    #[error("Failed to decode response: {0}")]
    Decode(#[from] serde_json::Error),

    /// An identifier that cannot be used as a single path segment.
    #[error("Invalid identifier '{0}'")]
    InvalidId(String),
}

// =============================================================================
// ApiClient
// =============================================================================

/// Client for the ticketing REST API.
///
/// Cheap to clone; clones share the connection pool and session.
#[derive(Clone)]
pub struct ApiClient {
    inner: Arc<ApiClientInner>,
}

struct ApiClientInner {
    client: reqwest::Client,
    base_url: Url,
    auth: AuthService,
}

impl std::fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiClient")
            .field("base_url", &self.inner.base_url.as_str())
            .finish_non_exhaustive()
    }
}

impl ApiClient {
    /// Create a client for `config.base_url`.
    ///
    /// `auth` supplies the bearer token and is expired on a `401`.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(config: &ApiConfig, auth: AuthService) -> Result<Self, ApiError> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(config.timeout)
            .build()?;

        Ok(Self {
            inner: Arc::new(ApiClientInner {
                client,
                base_url: config.base_url.clone(),
                auth,
            }),
        })
    }

    #[must_use]
    pub fn base_url(&self) -> &Url {
        &self.inner.base_url
    }

    /// Session this client authenticates with.
    #[must_use]
    pub fn auth(&self) -> &AuthService {
        &self.inner.auth
    }

    /// Absolute URL for an endpoint path such as `/api/events`.
    ///
    /// The path is appended to the base URL's own path, so a base of
    /// `https://host/backend` keeps its prefix.
    fn endpoint(&self, path: &str) -> Url {
        let mut url = self.inner.base_url.clone();
        let joined = format!("{}{path}", url.path().trim_end_matches('/'));
        url.set_path(&joined);
        url
    }

    /// URL of one item in `collection`, with `id` percent-encoded as a
    /// single path segment.
    fn item_endpoint(&self, collection: &str, id: &str) -> Result<Url, ApiError> {
        if matches!(id, "" | "." | "..") {
            return Err(ApiError::InvalidId(id.to_string()));
        }
        let mut url = self.endpoint(collection);
        url.path_segments_mut()
            .map_err(|()| ApiError::InvalidId(id.to_string()))?
            .pop_if_empty()
            .push(id);
        Ok(url)
    }

    /// Start a request for `path` with the bearer token attached when there
    /// is one.
    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        self.authorized(method, self.endpoint(path))
    }

    /// Start a request for one item addressed by a free-form `id`.
    fn item_request(
        &self,
        method: Method,
        collection: &str,
        id: &str,
    ) -> Result<RequestBuilder, ApiError> {
        Ok(self.authorized(method, self.item_endpoint(collection, id)?))
    }

    fn authorized(&self, method: Method, url: Url) -> RequestBuilder {
        let request = self.inner.client.request(method, url);
        match self.inner.auth.bearer_token() {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    /// Send a request and decode the envelope.
    async fn execute<T: DeserializeOwned>(
        &self,
        request: RequestBuilder,
    ) -> Result<ApiEnvelope<T>, ApiError> {
        let body = self.execute_raw(request).await?;

        let envelope: ApiEnvelope<T> = serde_json::from_str(&body).map_err(|e| {
            error!(
                error = %e,
                body = %truncate(&body),
                "Failed to parse API response"
            );
            ApiError::Decode(e)
        })?;

        if !envelope.success {
            let message = envelope.failure_message();
            debug!(message = %message, "API rejected request");
            return Err(ApiError::Rejected(message));
        }

        Ok(envelope)
    }

    /// Send a request and return the raw body of a successful response.
    async fn execute_raw(&self, request: RequestBuilder) -> Result<String, ApiError> {
        let response = request.send().await?;
        let status = response.status();

        if status == StatusCode::UNAUTHORIZED {
            self.inner.auth.expire();
            return Err(ApiError::Unauthorized);
        }

        // Get response body as text first for better error diagnostics
        let body = response.text().await?;

        if !status.is_success() {
            error!(
                status = %status,
                body = %truncate(&body),
                "API returned non-success status"
            );
            let message = serde_json::from_str::<ApiEnvelope<serde_json::Value>>(&body)
                .map_or_else(|_| truncate(&body), |envelope| envelope.failure_message());
            return Err(ApiError::Status {
                status: status.as_u16(),
                message,
            });
        }

        Ok(body)
    }

    /// Send a request and return the envelope's `data`.
    async fn send<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T, ApiError> {
        self.execute(request).await?.data.ok_or(ApiError::MissingData)
    }

    /// Send a request whose `data`, if any, is not needed.
    async fn send_ack(&self, request: RequestBuilder) -> Result<(), ApiError> {
        self.execute::<serde_json::Value>(request).await.map(|_| ())
    }
}

fn truncate(body: &str) -> String {
    body.chars().take(200).collect()
}
