//! Core data types and enums for transit data.

use geo::Point;

use crate::identifiers::*;

// ============================================================================
// Enums
// ============================================================================

/// GTFS route types
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[repr(u8)]
pub enum RouteType {
    Tram = 0,
    Subway = 1,
    Rail = 2,
    Bus = 3,
    Ferry = 4,
    CableTram = 5,
    AerialLift = 6,
    Funicular = 7,
}

impl RouteType {
    pub fn from_gtfs(value: u16) -> Option<Self> {
        match value {
            0 => Some(Self::Tram),
            1 => Some(Self::Subway),
            2 => Some(Self::Rail),
            3 => Some(Self::Bus),
            4 => Some(Self::Ferry),
            5 => Some(Self::CableTram),
            6 => Some(Self::AerialLift),
            7 => Some(Self::Funicular),
            _ => None,
        }
    }
}

// ============================================================================
// Data Structures
// ============================================================================

/// A transit route (e.g. "10", "Link light rail")
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Route {
    pub id: RouteIdentifier,
    pub agency_id: AgencyIdentifier,
    pub route_type: RouteType,

    /// Short name (e.g., "10", "Link")
    pub short_name: String,

    /// Long name (e.g., "Capitol Hill - Downtown Seattle")
    pub long_name: String,
}

/// A single boarding location as returned by the API service.
///
/// `location` follows the geo convention: x is longitude, y is latitude.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Stop {
    pub id: StopIdentifier,
    pub name: String,
    pub code: Option<String>,

    /// Compass direction of travel at the stop (e.g. "N", "SW")
    pub direction: Option<String>,
    pub location: Point,

    /// IDs of every route serving this stop
    pub route_ids: Vec<RouteIdentifier>,

    /// Resolved routes; may be a subset of `route_ids` if the service
    /// omitted some references
    pub routes: Vec<Route>,
}

impl Stop {
    pub fn new(id: impl Into<StopIdentifier>, name: impl Into<String>, latitude: f64, longitude: f64) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            code: None,
            direction: None,
            location: Point::new(longitude, latitude),
            route_ids: Vec::new(),
            routes: Vec::new(),
        }
    }

    /// Attach a resolved route, recording its ID as well
    pub fn with_route(mut self, route: Route) -> Self {
        if !self.route_ids.contains(&route.id) {
            self.route_ids.push(route.id.clone());
        }
        self.routes.push(route);
        self
    }

    pub fn latitude(&self) -> f64 {
        self.location.y()
    }

    pub fn longitude(&self) -> f64 {
        self.location.x()
    }

    /// Does `route_id` still serve this stop?
    pub fn serves_route(&self, route_id: &RouteIdentifier) -> bool {
        self.route_ids.contains(route_id) || self.routes.iter().any(|r| &r.id == route_id)
    }

    pub fn route(&self, route_id: &RouteIdentifier) -> Option<&Route> {
        self.routes.iter().find(|r| &r.id == route_id)
    }
}

// ============================================================================
// Errors
// ============================================================================

#[derive(Clone, Debug, PartialEq, thiserror::Error)]
pub enum TransitError {
    #[error("Stop not found: {0}")]
    StopNotFound(StopIdentifier),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Invalid data: {0}")]
    InvalidData(String),
}

pub type Result<T> = std::result::Result<T, TransitError>;
