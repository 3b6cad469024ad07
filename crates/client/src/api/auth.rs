//! Authentication endpoints.

use reqwest::Method;
use tracing::instrument;

use dancemode_core::models::{AuthResponse, LoginRequest, RegisterRequest};

use super::{ApiClient, ApiError};

impl ApiClient {
    /// Create an account.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the account is rejected.
    #[instrument(skip(self, request), fields(email = %request.email))]
    pub async fn register(&self, request: &RegisterRequest) -> Result<AuthResponse, ApiError> {
        self.send(self.request(Method::POST, "/api/auth/register").json(request))
            .await
    }

    /// Exchange credentials for a token.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the credentials are rejected.
    #[instrument(skip(self, request), fields(email = %request.email))]
    pub async fn login(&self, request: &LoginRequest) -> Result<AuthResponse, ApiError> {
        self.send(self.request(Method::POST, "/api/auth/login").json(request))
            .await
    }

    /// End the server-side session.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    #[instrument(skip(self))]
    pub async fn logout(&self) -> Result<(), ApiError> {
        self.send_ack(self.request(Method::POST, "/api/auth/logout"))
            .await
    }
}
