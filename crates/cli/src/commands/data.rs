//! Data administration commands.

use std::path::Path;

use tracing::{error, info, warn};

use dancemode_client::DancemodeClient;
use dancemode_client::api::{BulkPolicy, StepOutcome};
use dancemode_core::models::{DatabaseExport, SaveAllBatch};

/// Write a full export to `output`.
///
/// # Errors
///
/// Returns an error if the request fails or the file cannot be written.
pub async fn export(
    client: &DancemodeClient,
    output: &Path,
) -> Result<(), Box<dyn std::error::Error>> {
    let export = client.api().export_data().await?;
    let json = serde_json::to_string_pretty(&export)?;
    tokio::fs::write(output, json).await?;

    info!(
        path = %output.display(),
        events = export.events.len(),
        venues = export.venues.len(),
        packages = export.packages.len(),
        registrations = export.registrations.len(),
        "Export written"
    );
    Ok(())
}

/// Load an export file into the service.
///
/// # Errors
///
/// Returns an error if the file is unreadable or the request fails.
pub async fn import(
    client: &DancemodeClient,
    file: &Path,
) -> Result<(), Box<dyn std::error::Error>> {
    let content = tokio::fs::read_to_string(file).await?;
    let export: DatabaseExport = serde_json::from_str(&content)?;
    info!(version = %export.version, exported_at = %export.exported_at, "Importing export");

    client.api().import_data(&export).await?;
    info!("Import complete");
    Ok(())
}

/// # Errors
///
/// Returns an error if the request fails.
pub async fn stats(client: &DancemodeClient) -> Result<(), Box<dyn std::error::Error>> {
    let stats = client.catalog().load_statistics().await?;

    info!("Data Statistics");
    info!("===============");
    info!("Users: {}", stats.users);
    info!("Events: {}", stats.events);
    info!("Venues: {}", stats.venues);
    info!("Packages: {}", stats.packages);
    info!("Registrations: {}", stats.registrations);
    info!("Total records: {}", stats.total_records);
    info!("Last updated: {}", stats.last_updated);
    Ok(())
}

/// Delete every record on the service.
///
/// # Errors
///
/// Returns an error without `--yes` or if the request fails.
pub async fn clear(
    client: &DancemodeClient,
    confirmed: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    if !confirmed {
        return Err("Refusing to clear data without --yes".into());
    }
    client.api().clear_data().await?;
    warn!("All data cleared");
    Ok(())
}

/// Create venues, packages and events from a YAML or JSON file.
///
/// # Errors
///
/// Returns an error if the file cannot be read, or if any step failed.
pub async fn seed(
    client: &DancemodeClient,
    file: &Path,
    policy: BulkPolicy,
    replace: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    if !file.exists() {
        return Err(format!("File not found: {}", file.display()).into());
    }

    info!(path = %file.display(), "Loading batch from file");

    // YAML is a superset of JSON, so one parser covers both
    let content = tokio::fs::read_to_string(file).await?;
    let mut batch: SaveAllBatch = serde_yaml::from_str(&content)?;
    batch.replace_existing |= replace;

    if batch.is_empty() {
        warn!("Batch is empty, nothing to save");
        return Ok(());
    }

    info!(
        venues = batch.venues.len(),
        packages = batch.packages.len(),
        events = batch.events.len(),
        policy = %policy,
        "Starting save"
    );

    let report = client.api().save_all(&batch, policy).await;
    let notifications = client.state().notifications();

    info!("Save complete");
    for (resource, outcome) in &report.steps {
        match outcome {
            StepOutcome::Empty => info!("  {resource}: nothing to save"),
            StepOutcome::Completed(response) => {
                info!(
                    "  {resource}: {} created, {} failed",
                    response.success_count, response.error_count
                );
                for err in &response.errors {
                    error!("    - {err}");
                }
            }
            StepOutcome::Failed(err) => error!("  {resource}: request failed: {err}"),
            StepOutcome::Skipped => warn!("  {resource}: skipped"),
        }
    }

    if report.is_success() {
        notifications.show_success(format!("Saved {} records", report.success_count()));
        Ok(())
    } else {
        notifications.show_error(format!(
            "Saved {} records, {} errors",
            report.success_count(),
            report.error_count()
        ));
        Err("Some records were not saved".into())
    }
}
