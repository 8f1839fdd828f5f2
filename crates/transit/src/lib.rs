//! # oba-transit
//!
//! Transit reference data (stops, routes, regions) and the pluggable API
//! service used to fetch it.
//!
//! ## Features
//!
//! - **Opaque identifiers**: Arc-backed, never parsed or case-folded
//! - **Pluggable networking**: Implement [`StopService`] over your own client
//! - **Offline service**: [`StaticStopService`] for fixtures and replays
//! - **serde** (optional): Serialize/Deserialize on all models
//!
//! ## Example
//!
//! ```
//! use oba_transit::prelude::*;
//!
//! let route = Route {
//!     id: RouteIdentifier::new("40_100479"),
//!     agency_id: AgencyIdentifier::new("40"),
//!     route_type: RouteType::Tram,
//!     short_name: "Link".into(),
//!     long_name: "Link light rail".into(),
//! };
//!
//! let stop = Stop::new("1_99610", "Capitol Hill Link Station", 47.6196, -122.3204)
//!     .with_route(route);
//!
//! let service = StaticStopService::from_stops(vec![stop]);
//! let found = service.get_stop(&StopIdentifier::new("1_99610")).unwrap();
//! assert!(found.serves_route(&RouteIdentifier::new("40_100479")));
//! ```

pub mod identifiers;
pub mod models;
pub mod provider;
pub mod network;

// Re-exports for convenience
pub mod prelude {
    pub use crate::identifiers::*;
    pub use crate::models::types::*;
    pub use crate::provider::static_provider::StaticStopService;
    pub use crate::network::traits::*;
}

pub use prelude::*;
