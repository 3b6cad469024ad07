//! Registration commands.

use tracing::info;

use dancemode_client::DancemodeClient;
use dancemode_core::RegistrationId;
use dancemode_core::models::PaymentRequest;

/// # Errors
///
/// Returns an error if the request fails.
pub async fn list(client: &DancemodeClient) -> Result<(), Box<dyn std::error::Error>> {
    let registrations = client.api().my_registrations().await?;
    info!("Registrations ({})", registrations.len());
    for r in &registrations {
        let target = r
            .event_id
            .map(|id| format!("event {id}"))
            .or_else(|| r.package_id.map(|id| format!("package {id}")))
            .unwrap_or_default();
        info!(
            "  {} | {target} | {:?} | payment {:?} | paid {}",
            r.id,
            r.status,
            r.payment_status,
            r.amount_paid.display()
        );
    }
    Ok(())
}

/// Pay the outstanding amount of a registration.
///
/// The amount is the price of the event or package registered for.
///
/// # Errors
///
/// Returns an error if the registration is unknown, already paid, or the
/// payment is refused.
pub async fn pay(
    client: &DancemodeClient,
    id: RegistrationId,
    payment_method: String,
) -> Result<(), Box<dyn std::error::Error>> {
    let api = client.api();
    let registration = api
        .my_registrations()
        .await?
        .into_iter()
        .find(|r| r.id == id)
        .ok_or_else(|| format!("No registration {id}"))?;

    if !registration.payment_status.is_outstanding() {
        return Err(format!("Registration {id} has nothing to pay").into());
    }

    let amount = match (registration.event_id, registration.package_id) {
        (Some(event_id), _) => api.get_event(event_id).await?.price,
        (None, Some(package_id)) => api.get_package(package_id).await?.price,
        (None, None) => return Err(format!("Registration {id} has no event or package").into()),
    };

    let payment = PaymentRequest {
        registration_id: id,
        payment_method,
        amount,
    };
    let updated = api.pay_registration(id, &payment).await?;
    info!(
        "Paid {} for {}, payment {:?}",
        amount.display(),
        updated.id,
        updated.payment_status
    );
    Ok(())
}
