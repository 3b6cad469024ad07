//! Profile endpoints.

use reqwest::Method;
use tracing::instrument;

use dancemode_core::models::{UserProfile, UserProfileUpdate};

use super::{ApiClient, ApiError};

impl ApiClient {
    /// Profile of the signed-in user.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self))]
    pub async fn get_profile(&self) -> Result<UserProfile, ApiError> {
        self.send(self.request(Method::GET, "/api/users/profile"))
            .await
    }

    /// Update fields of the signed-in user's profile.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self, update))]
    pub async fn update_profile(
        &self,
        update: &UserProfileUpdate,
    ) -> Result<UserProfile, ApiError> {
        self.send(self.request(Method::PUT, "/api/users/profile").json(update))
            .await
    }
}
