//! In-memory stop service backed by a fixed set of stops.
//!
//! Used wherever a real API service is unavailable: fixtures, offline
//! replays of recorded responses, and tests that need to inject failures.

use std::collections::HashMap;
use std::future::Future;
use std::pin::Pin;
use std::sync::{Arc, Mutex};

use crate::identifiers::*;
use crate::models::types::*;
use crate::network::traits::StopService;

// ============================================================================
// Static Provider
// ============================================================================

/// In-memory stop service
///
/// This type is cheap to clone since all data is stored in `Arc`s. Clones share
/// fetch counters.
#[derive(Clone, Default)]
pub struct StaticStopService {
    stop_map: Arc<HashMap<StopIdentifier, Stop>>,

    // Stops whose fetch fails with a network error, and the message to report
    network_failures: Arc<HashMap<StopIdentifier, String>>,

    region: Option<RegionIdentifier>,
    fetch_counts: Arc<Mutex<HashMap<StopIdentifier, usize>>>,
}

impl StaticStopService {
    /// Create a new empty service; every fetch reports `StopNotFound`
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a service from raw data
    pub fn from_stops(stops: Vec<Stop>) -> Self {
        let stop_map: HashMap<_, _> = stops
            .into_iter()
            .map(|s| (s.id.clone(), s))
            .collect();

        Self {
            stop_map: Arc::new(stop_map),
            ..Self::default()
        }
    }

    /// Make fetches of `id` fail as if the server could not be reached
    pub fn with_network_failure(mut self, id: impl Into<StopIdentifier>, message: impl Into<String>) -> Self {
        Arc::make_mut(&mut self.network_failures).insert(id.into(), message.into());
        self
    }

    pub fn with_region(mut self, region: RegionIdentifier) -> Self {
        self.region = Some(region);
        self
    }

    pub fn get_stop(&self, id: &StopIdentifier) -> Option<&Stop> {
        self.stop_map.get(id)
    }

    /// Number of times `id` has been requested through [`StopService::fetch_stop`]
    pub fn fetch_count(&self, id: &StopIdentifier) -> usize {
        self.fetch_counts
            .lock()
            .map(|counts| counts.get(id).copied().unwrap_or(0))
            .unwrap_or(0)
    }

    /// Total number of fetches across all stops
    pub fn total_fetches(&self) -> usize {
        self.fetch_counts
            .lock()
            .map(|counts| counts.values().sum())
            .unwrap_or(0)
    }

    fn lookup(&self, id: &StopIdentifier) -> Result<Stop> {
        if let Ok(mut counts) = self.fetch_counts.lock() {
            *counts.entry(id.clone()).or_insert(0) += 1;
        }

        if let Some(message) = self.network_failures.get(id) {
            return Err(TransitError::Network(message.clone()));
        }

        self.stop_map
            .get(id)
            .cloned()
            .ok_or_else(|| TransitError::StopNotFound(id.clone()))
    }
}

impl StopService for StaticStopService {
    fn fetch_stop<'a>(
        &'a self,
        id: &'a StopIdentifier,
    ) -> Pin<Box<dyn Future<Output = Result<Stop>> + Send + 'a>> {
        let result = self.lookup(id);
        Box::pin(async move { result })
    }

    fn region_identifier(&self) -> Option<RegionIdentifier> {
        self.region
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::task::{Context, Poll, Waker};

    // The static service never suspends, so a single poll completes it.
    fn poll_once<T>(mut fut: Pin<Box<dyn Future<Output = T> + Send + '_>>) -> T {
        let mut cx = Context::from_waker(Waker::noop());
        match fut.as_mut().poll(&mut cx) {
            Poll::Ready(value) => value,
            Poll::Pending => panic!("static stop service should never be pending"),
        }
    }

    #[test]
    fn test_empty_service() {
        let service = StaticStopService::new();
        let id = StopIdentifier::new("1_1121");

        assert_eq!(
            poll_once(service.fetch_stop(&id)),
            Err(TransitError::StopNotFound(id.clone()))
        );
        assert_eq!(service.region_identifier(), None);
    }

    #[test]
    fn test_service_lookups() {
        let stop = Stop::new("1_1121", "Westlake Station - Bay A", 47.6115, -122.3370);
        let service = StaticStopService::from_stops(vec![stop.clone()]);

        assert!(service.get_stop(&StopIdentifier::new("1_1121")).is_some());
        assert_eq!(poll_once(service.fetch_stop(&stop.id)), Ok(stop));
    }

    #[test]
    fn test_network_failure_and_counts() {
        let stop = Stop::new("1_1121", "Westlake Station - Bay A", 47.6115, -122.3370);
        let service = StaticStopService::from_stops(vec![stop.clone()])
            .with_network_failure("1_1121", "The Internet connection appears to be offline.")
            .with_region(RegionIdentifier::new(1));
        let observer = service.clone();

        let result = poll_once(service.fetch_stop(&stop.id));
        assert!(matches!(result, Err(TransitError::Network(_))));
        let _ = poll_once(service.fetch_stop(&stop.id));

        // Clones share counters
        assert_eq!(observer.fetch_count(&stop.id), 2);
        assert_eq!(observer.total_fetches(), 2);
        assert_eq!(observer.region_identifier(), Some(RegionIdentifier::new(1)));
    }
}
