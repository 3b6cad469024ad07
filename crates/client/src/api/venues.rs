//! Venue endpoints.

use reqwest::Method;
use tracing::instrument;

use dancemode_core::models::{CreateVenueRequest, Venue};
use dancemode_core::VenueId;

use super::{ApiClient, ApiError};

impl ApiClient {
    /// List all venues.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self))]
    pub async fn list_venues(&self) -> Result<Vec<Venue>, ApiError> {
        self.send(self.request(Method::GET, "/api/venues")).await
    }

    /// Get a single venue.
    ///
    /// # Errors
    ///
    /// Returns an error if the venue does not exist or the API request fails.
    #[instrument(skip(self), fields(id = %id))]
    pub async fn get_venue(&self, id: VenueId) -> Result<Venue, ApiError> {
        self.send(self.request(Method::GET, &format!("/api/venues/{id}")))
            .await
    }

    /// Create a venue.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self, request))]
    pub async fn create_venue(&self, request: &CreateVenueRequest) -> Result<Venue, ApiError> {
        self.send(self.request(Method::POST, "/api/venues").json(request))
            .await
    }

    /// Replace a venue.
    ///
    /// # Errors
    ///
    /// Returns an error if the venue does not exist or the API request fails.
    #[instrument(skip(self, request), fields(id = %id))]
    pub async fn update_venue(
        &self,
        id: VenueId,
        request: &CreateVenueRequest,
    ) -> Result<Venue, ApiError> {
        self.send(
            self.request(Method::PUT, &format!("/api/venues/{id}"))
                .json(request),
        )
        .await
    }

    /// Delete a venue.
    ///
    /// # Errors
    ///
    /// Returns an error if the venue does not exist or the API request fails.
    #[instrument(skip(self), fields(id = %id))]
    pub async fn delete_venue(&self, id: VenueId) -> Result<(), ApiError> {
        self.send_ack(self.request(Method::DELETE, &format!("/api/venues/{id}")))
            .await
    }
}
