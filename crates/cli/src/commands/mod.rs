//! CLI command implementations.
//!
//! Output goes through `tracing` like every other log line.

pub mod cart;
pub mod catalog;
pub mod data;
pub mod registrations;
pub mod session;

use tracing::{info, warn};

use dancemode_client::DancemodeClient;

/// Check the service health endpoint.
///
/// # Errors
///
/// Returns an error if the service is unreachable.
pub async fn health(client: &DancemodeClient) -> Result<(), Box<dyn std::error::Error>> {
    let status = client.api().health().await?;
    if status.is_healthy() {
        info!(
            service = status.service.as_deref().unwrap_or("unknown"),
            url = %client.api().base_url(),
            "Service is healthy"
        );
    } else {
        warn!(status = %status.status, "Service reports a degraded state");
    }
    Ok(())
}
