//! Package endpoints.

use reqwest::Method;
use tracing::instrument;

use dancemode_core::models::{CreatePackageRequest, Package};
use dancemode_core::PackageId;

use super::{ApiClient, ApiError};

impl ApiClient {
    /// List all packages.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self))]
    pub async fn list_packages(&self) -> Result<Vec<Package>, ApiError> {
        self.send(self.request(Method::GET, "/api/packages")).await
    }

    /// Get a single package.
    ///
    /// # Errors
    ///
    /// Returns an error if the package does not exist or the API request fails.
    #[instrument(skip(self), fields(id = %id))]
    pub async fn get_package(&self, id: PackageId) -> Result<Package, ApiError> {
        self.send(self.request(Method::GET, &format!("/api/packages/{id}")))
            .await
    }

    /// Create a package.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self, request))]
    pub async fn create_package(
        &self,
        request: &CreatePackageRequest,
    ) -> Result<Package, ApiError> {
        self.send(self.request(Method::POST, "/api/packages").json(request))
            .await
    }

    /// Replace a package.
    ///
    /// # Errors
    ///
    /// Returns an error if the package does not exist or the API request fails.
    #[instrument(skip(self, request), fields(id = %id))]
    pub async fn update_package(
        &self,
        id: PackageId,
        request: &CreatePackageRequest,
    ) -> Result<Package, ApiError> {
        self.send(
            self.request(Method::PUT, &format!("/api/packages/{id}"))
                .json(request),
        )
        .await
    }

    /// Delete a package.
    ///
    /// # Errors
    ///
    /// Returns an error if the package does not exist or the API request fails.
    #[instrument(skip(self), fields(id = %id))]
    pub async fn delete_package(&self, id: PackageId) -> Result<(), ApiError> {
        self.send_ack(self.request(Method::DELETE, &format!("/api/packages/{id}")))
            .await
    }
}
