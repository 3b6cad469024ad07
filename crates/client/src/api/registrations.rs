//! Registration and payment endpoints.

use reqwest::Method;
use tracing::instrument;

use dancemode_core::RegistrationId;
use dancemode_core::models::{CreateRegistrationRequest, PaymentRequest, Registration};

use super::{ApiClient, ApiError};

impl ApiClient {
    /// Register the signed-in user for an event or package.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails or the registration is refused.
    #[instrument(
        skip(self, request),
        fields(event_id = ?request.event_id, package_id = ?request.package_id)
    )]
    pub async fn create_registration(
        &self,
        request: &CreateRegistrationRequest,
    ) -> Result<Registration, ApiError> {
        self.send(self.request(Method::POST, "/api/registrations").json(request))
            .await
    }

    /// Registrations of the signed-in user.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self))]
    pub async fn my_registrations(&self) -> Result<Vec<Registration>, ApiError> {
        self.send(self.request(Method::GET, "/api/users/registrations"))
            .await
    }

    /// Pay for a registration.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails or the payment is refused.
    #[instrument(skip(self, payment), fields(id = %id, amount = %payment.amount))]
    pub async fn pay_registration(
        &self,
        id: RegistrationId,
        payment: &PaymentRequest,
    ) -> Result<Registration, ApiError> {
        self.send(
            self.request(Method::POST, &format!("/api/registrations/{id}/payment"))
                .json(payment),
        )
        .await
    }
}
