//! Page element endpoints.

use reqwest::Method;
use serde_json::Value;
use tracing::instrument;

use super::{ApiClient, ApiError};

impl ApiClient {
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self))]
    pub async fn list_elements(&self) -> Result<Vec<Value>, ApiError> {
        self.send(self.request(Method::GET, "/api/elements")).await
    }

    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self, element))]
    pub async fn save_element(&self, element: &Value) -> Result<Value, ApiError> {
        self.send(self.request(Method::POST, "/api/elements").json(element))
            .await
    }

    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self, element))]
    pub async fn update_element(&self, id: &str, element: &Value) -> Result<Value, ApiError> {
        self.send(self.item_request(Method::PUT, "/api/elements", id)?.json(element))
            .await
    }

    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self))]
    pub async fn delete_element(&self, id: &str) -> Result<(), ApiError> {
        self.send_ack(self.item_request(Method::DELETE, "/api/elements", id)?)
            .await
    }
}
