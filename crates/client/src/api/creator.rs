//! Creator dashboard endpoints.
//!
//! Content, analytics and elements are free-form JSON owned by the page
//! builder, so they are passed through as `serde_json::Value`.

use reqwest::Method;
use serde_json::Value;
use tracing::instrument;

use super::{ApiClient, ApiError};

impl ApiClient {
    /// Content owned by the signed-in creator.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self))]
    pub async fn creator_content(&self) -> Result<Value, ApiError> {
        self.send(self.request(Method::GET, "/api/creator/content"))
            .await
    }

    /// Analytics for the signed-in creator.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self))]
    pub async fn creator_analytics(&self) -> Result<Value, ApiError> {
        self.send(self.request(Method::GET, "/api/creator/analytics"))
            .await
    }

    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self))]
    pub async fn list_creator_elements(&self) -> Result<Vec<Value>, ApiError> {
        self.send(self.request(Method::GET, "/api/creator/elements"))
            .await
    }

    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self, element))]
    pub async fn save_creator_element(&self, element: &Value) -> Result<Value, ApiError> {
        self.send(self.request(Method::POST, "/api/creator/elements").json(element))
            .await
    }

    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self, element))]
    pub async fn update_creator_element(
        &self,
        id: &str,
        element: &Value,
    ) -> Result<Value, ApiError> {
        self.send(self.item_request(Method::PUT, "/api/creator/elements", id)?.json(element))
            .await
    }

    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self))]
    pub async fn delete_creator_element(&self, id: &str) -> Result<(), ApiError> {
        self.send_ack(self.item_request(Method::DELETE, "/api/creator/elements", id)?)
            .await
    }
}
