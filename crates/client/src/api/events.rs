//! Event endpoints.

use reqwest::Method;
use tracing::instrument;

use dancemode_core::models::{CreateEventRequest, Event};
use dancemode_core::EventId;

use super::{ApiClient, ApiError};

impl ApiClient {
    /// List all events.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self))]
    pub async fn list_events(&self) -> Result<Vec<Event>, ApiError> {
        self.send(self.request(Method::GET, "/api/events")).await
    }

    /// Get a single event.
    ///
    /// # Errors
    ///
    /// Returns an error if the event does not exist or the API request fails.
    #[instrument(skip(self), fields(id = %id))]
    pub async fn get_event(&self, id: EventId) -> Result<Event, ApiError> {
        self.send(self.request(Method::GET, &format!("/api/events/{id}")))
            .await
    }

    /// Create an event.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self, request))]
    pub async fn create_event(&self, request: &CreateEventRequest) -> Result<Event, ApiError> {
        self.send(self.request(Method::POST, "/api/events").json(request))
            .await
    }

    /// Replace an event.
    ///
    /// # Errors
    ///
    /// Returns an error if the event does not exist or the API request fails.
    #[instrument(skip(self, request), fields(id = %id))]
    pub async fn update_event(
        &self,
        id: EventId,
        request: &CreateEventRequest,
    ) -> Result<Event, ApiError> {
        self.send(
            self.request(Method::PUT, &format!("/api/events/{id}"))
                .json(request),
        )
        .await
    }

    /// Delete an event.
    ///
    /// # Errors
    ///
    /// Returns an error if the event does not exist or the API request fails.
    #[instrument(skip(self), fields(id = %id))]
    pub async fn delete_event(&self, id: EventId) -> Result<(), ApiError> {
        self.send_ack(self.request(Method::DELETE, &format!("/api/events/{id}")))
            .await
    }
}
