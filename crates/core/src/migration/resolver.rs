//! Stop resolution against the API service.
//!
//! Each distinct stop is fetched at most once per migration run. Outcomes,
//! failures included, are cached so every bookmark and recent stop that
//! references the same stop sees the same answer.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use std::time::Duration;

use futures_util::future::join_all;
use oba_transit::{RegionIdentifier, Stop, StopIdentifier, StopService};
use tracing::{debug, warn};

use crate::migration::error::MigrationError;
use crate::migration::legacy::LegacyBookmark;

pub struct StopResolver {
    service: Arc<dyn StopService>,
    region_identifier: RegionIdentifier,
    fetch_timeout: Duration,
    stops: HashMap<StopIdentifier, Result<Stop, MigrationError>>,
}

impl StopResolver {
    pub fn new(service: Arc<dyn StopService>, region_identifier: RegionIdentifier, fetch_timeout: Duration) -> Self {
        Self {
            service,
            region_identifier,
            fetch_timeout,
            stops: HashMap::new(),
        }
    }

    /// Fails if the service is known to talk to a region other than the one
    /// being migrated to
    pub fn check_region(&self) -> Result<(), MigrationError> {
        match self.service.region_identifier() {
            Some(configured) if configured != self.region_identifier => Err(MigrationError::RegionMismatch {
                expected: self.region_identifier,
                configured,
            }),
            _ => Ok(()),
        }
    }

    /// Fetch every stop in `ids` that has not been resolved yet, concurrently
    pub async fn prefetch<I>(&mut self, ids: I)
    where
        I: IntoIterator<Item = StopIdentifier>,
    {
        let mut seen = HashSet::new();
        let pending: Vec<StopIdentifier> = ids
            .into_iter()
            .filter(|id| !self.stops.contains_key(id) && seen.insert(id.clone()))
            .collect();

        if pending.is_empty() {
            return;
        }

        if let Err(err) = self.check_region() {
            warn!("not fetching {} stops: {err}", pending.len());
            for id in pending {
                self.stops.insert(id, Err(err.clone()));
            }
            return;
        }

        debug!(count = pending.len(), "fetching stops");

        let service = &self.service;
        let timeout = self.fetch_timeout;
        let fetches = pending.iter().map(|id| async move {
            match tokio::time::timeout(timeout, service.fetch_stop(id)).await {
                Ok(result) => result.map_err(MigrationError::from),
                Err(_) => Err(MigrationError::Network(format!(
                    "timed out after {}s fetching stop {id}",
                    timeout.as_secs_f64()
                ))),
            }
        });
        let results = join_all(fetches).await;

        for (id, result) in pending.into_iter().zip(results) {
            match &result {
                Ok(stop) => debug!(stop_id = %id, name = %stop.name, "resolved stop"),
                Err(err) => debug!(stop_id = %id, "failed to resolve stop: {err}"),
            }
            self.stops.insert(id, result);
        }
    }

    /// The live stop for `id`, fetching it if it was not prefetched
    pub async fn stop(&mut self, id: &StopIdentifier) -> Result<Stop, MigrationError> {
        if !self.stops.contains_key(id) {
            self.prefetch([id.clone()]).await;
        }

        self.stops
            .get(id)
            .cloned()
            .unwrap_or_else(|| Err(MigrationError::StopNotFound(id.clone())))
    }

    /// Resolve the stop of `bookmark` and check that the bookmarked trip still
    /// departs from it. Stop bookmarks only need their stop.
    pub async fn validate_bookmark(&mut self, bookmark: &LegacyBookmark) -> Result<Stop, MigrationError> {
        let stop = self.stop(&bookmark.stop_id).await?;

        if let Some(trip) = bookmark.trip_key() {
            if !stop.serves_route(&trip.route_id) {
                return Err(MigrationError::NoActiveTrips);
            }
        }

        Ok(stop)
    }

    pub fn fetched_count(&self) -> usize {
        self.stops.len()
    }
}
