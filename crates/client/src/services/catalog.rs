//! Fetches catalog data into the client stores.

use tracing::{debug, instrument};

use dancemode_core::models::{DataStatistics, Event, Package, Venue};

use crate::api::{ApiClient, ApiError};
use crate::state::{ClientState, LoadingState};
use crate::store::Store;

/// Loads events, venues and packages, keeping loading flags current.
///
/// A failed load leaves the cached list as it was and shows an error
/// notification; the error is also returned to the caller.
#[derive(Debug, Clone)]
pub struct CatalogService {
    api: ApiClient,
    state: ClientState,
}

impl CatalogService {
    #[must_use]
    pub const fn new(api: ApiClient, state: ClientState) -> Self {
        Self { api, state }
    }

    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self))]
    pub async fn load_events(&self) -> Result<Vec<Event>, ApiError> {
        self.set_loading(|l, v| l.events = v, true);
        let result = self.api.list_events().await;
        self.set_loading(|l, v| l.events = v, false);
        self.finish(result, "events", |state, events| state.events().set(events))
    }

    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self))]
    pub async fn load_venues(&self) -> Result<Vec<Venue>, ApiError> {
        self.set_loading(|l, v| l.venues = v, true);
        let result = self.api.list_venues().await;
        self.set_loading(|l, v| l.venues = v, false);
        self.finish(result, "venues", |state, venues| state.venues().set(venues))
    }

    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self))]
    pub async fn load_packages(&self) -> Result<Vec<Package>, ApiError> {
        self.set_loading(|l, v| l.packages = v, true);
        let result = self.api.list_packages().await;
        self.set_loading(|l, v| l.packages = v, false);
        self.finish(result, "packages", |state, packages| {
            state.packages().set(packages);
        })
    }

    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self))]
    pub async fn load_statistics(&self) -> Result<DataStatistics, ApiError> {
        let result = self.api.data_statistics().await;
        self.finish(result, "statistics", |state, stats| {
            state.statistics().set(Some(stats));
        })
    }

    /// Fetch events, venues, packages and statistics concurrently.
    ///
    /// Every load runs to completion, so no loading flag is left set when
    /// one of them fails.
    ///
    /// # Errors
    ///
    /// Returns the first error in the order events, venues, packages,
    /// statistics; the loads that succeeded keep their results in the stores.
    #[instrument(skip(self))]
    pub async fn load_all(&self) -> Result<(), ApiError> {
        let (events, venues, packages, stats) = tokio::join!(
            self.load_events(),
            self.load_venues(),
            self.load_packages(),
            self.load_statistics(),
        );
        let (events, venues, packages, stats) = (events?, venues?, packages?, stats?);
        debug!(
            events = events.len(),
            venues = venues.len(),
            packages = packages.len(),
            total_records = stats.total_records,
            "Catalog loaded"
        );
        Ok(())
    }

    fn set_loading(&self, field: impl FnOnce(&mut LoadingState, bool), value: bool) {
        self.state.loading().update(|current| {
            let mut next = *current;
            field(&mut next, value);
            next
        });
    }

    fn finish<T: Clone>(
        &self,
        result: Result<T, ApiError>,
        what: &str,
        store: impl FnOnce(&ClientState, T),
    ) -> Result<T, ApiError> {
        match result {
            Ok(value) => {
                store(&self.state, value.clone());
                Ok(value)
            }
            Err(e) => {
                self.state
                    .notifications()
                    .show_error(format!("Failed to load {what}: {e}"));
                Err(e)
            }
        }
    }
}
