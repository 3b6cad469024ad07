//! Catalog browsing commands.

use tracing::info;

use dancemode_client::DancemodeClient;
use dancemode_core::models::{Event, Package, Venue};

/// # Errors
///
/// Returns an error if the request fails.
pub async fn list_events(client: &DancemodeClient) -> Result<(), Box<dyn std::error::Error>> {
    let events = client.catalog().load_events().await?;
    log_events(&events);
    Ok(())
}

/// # Errors
///
/// Returns an error if the request fails.
pub async fn list_venues(client: &DancemodeClient) -> Result<(), Box<dyn std::error::Error>> {
    let venues = client.catalog().load_venues().await?;
    log_venues(&venues);
    Ok(())
}

/// # Errors
///
/// Returns an error if the request fails.
pub async fn list_packages(client: &DancemodeClient) -> Result<(), Box<dyn std::error::Error>> {
    let packages = client.catalog().load_packages().await?;
    log_packages(&packages);
    Ok(())
}

/// Load everything concurrently and print a summary.
///
/// # Errors
///
/// Returns the first failed load.
pub async fn load_all(client: &DancemodeClient) -> Result<(), Box<dyn std::error::Error>> {
    use dancemode_client::store::Readable;

    client.catalog().load_all().await?;

    let state = client.state();
    log_events(&state.events().get());
    log_venues(&state.venues().get());
    log_packages(&state.packages().get());
    if let Some(stats) = state.statistics().get() {
        info!(
            users = stats.users,
            registrations = stats.registrations,
            total = stats.total_records,
            "Statistics as of {}",
            stats.last_updated
        );
    }
    Ok(())
}

fn log_events(events: &[Event]) {
    info!("Events ({})", events.len());
    for event in events {
        let availability = if event.is_sold_out() {
            "sold out".to_string()
        } else {
            format!("{} left", event.remaining_capacity())
        };
        info!(
            "  {} | {} | {:?} | {} | {} | {availability}",
            event.id,
            event.title,
            event.event_type,
            event.start_date.format("%Y-%m-%d"),
            event.price.display(),
        );
    }
}

fn log_venues(venues: &[Venue]) {
    info!("Venues ({})", venues.len());
    for venue in venues {
        info!(
            "  {} | {} | {} | capacity {}",
            venue.id, venue.name, venue.address, venue.capacity
        );
    }
}

fn log_packages(packages: &[Package]) {
    info!("Packages ({})", packages.len());
    for package in packages {
        info!(
            "  {} | {} | {} days | {}",
            package.id,
            package.name,
            package.duration_days,
            package.price.display()
        );
    }
}
