//! Pluggable networking traits.
//!
//! External crates implement these to provide data fetching capabilities.

use std::future::Future;
use std::pin::Pin;

use crate::identifiers::{RegionIdentifier, StopIdentifier};
use crate::models::types::{Result, Stop};

/// The OneBusAway API service as seen by consumers that only need stops.
///
/// Implementations must distinguish a stop the server does not know
/// (`TransitError::StopNotFound`) from a request that never got an answer
/// (`TransitError::Network`).
pub trait StopService: Send + Sync {
    /// Fetch a stop with its routes resolved
    fn fetch_stop<'a>(
        &'a self,
        id: &'a StopIdentifier,
    ) -> Pin<Box<dyn Future<Output = Result<Stop>> + Send + 'a>>;

    /// The region this service is configured to talk to, if known
    fn region_identifier(&self) -> Option<RegionIdentifier> {
        None
    }
}
