//! Current-generation bookmarks.
//!
//! A bookmark points at a stop, optionally narrowed to one trip (route and
//! headsign) departing from it. Bookmarks are scoped to a region and may
//! belong to a [`BookmarkGroup`].

use std::fmt;
use std::sync::Arc;

use oba_transit::{RegionIdentifier, RouteIdentifier, Stop, StopIdentifier};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier of a [`Bookmark`]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BookmarkIdentifier(Uuid);

impl BookmarkIdentifier {
    pub fn random() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl fmt::Display for BookmarkIdentifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.hyphenated())
    }
}

/// Identifier of a [`BookmarkGroup`].
///
/// Groups keep the UUID string they had in the legacy store, verbatim: no
/// parsing, no case-folding.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BookmarkGroupIdentifier(Arc<str>);

impl BookmarkGroupIdentifier {
    pub fn new(s: impl AsRef<str>) -> Self {
        Self(s.as_ref().into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for BookmarkGroupIdentifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for BookmarkGroupIdentifier {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookmarkGroup {
    pub id: BookmarkGroupIdentifier,
    pub name: String,
    pub sort_order: i64,
}

impl BookmarkGroup {
    pub fn new(id: BookmarkGroupIdentifier, name: impl Into<String>, sort_order: i64) -> Self {
        Self {
            id,
            name: name.into(),
            sort_order,
        }
    }
}

/// The trip a bookmark follows at its stop
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct TripBookmarkKey {
    pub route_id: RouteIdentifier,
    pub route_short_name: String,
    pub trip_headsign: String,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Bookmark {
    pub id: BookmarkIdentifier,
    pub group_id: Option<BookmarkGroupIdentifier>,
    pub name: String,
    pub region_identifier: RegionIdentifier,
    pub stop_id: StopIdentifier,

    /// Full copy of the stop at the time the bookmark was made
    pub stop: Stop,

    /// Shown in widgets when set. `false` for new bookmarks.
    pub is_favorite: bool,

    /// `i64::MAX` until the user reorders their bookmarks
    pub sort_order: i64,

    pub route_short_name: Option<String>,
    pub route_id: Option<RouteIdentifier>,
    pub trip_headsign: Option<String>,
}

impl Bookmark {
    /// A bookmark for every departure at `stop`
    pub fn for_stop(name: impl Into<String>, region_identifier: RegionIdentifier, stop: Stop) -> Self {
        Self {
            id: BookmarkIdentifier::random(),
            group_id: None,
            name: name.into(),
            region_identifier,
            stop_id: stop.id.clone(),
            stop,
            is_favorite: false,
            sort_order: i64::MAX,
            route_short_name: None,
            route_id: None,
            trip_headsign: None,
        }
    }

    /// A bookmark for one trip departing from `stop`
    pub fn for_trip(
        name: impl Into<String>,
        region_identifier: RegionIdentifier,
        stop: Stop,
        trip: TripBookmarkKey,
    ) -> Self {
        Self {
            route_short_name: Some(trip.route_short_name),
            route_id: Some(trip.route_id),
            trip_headsign: Some(trip.trip_headsign),
            ..Self::for_stop(name, region_identifier, stop)
        }
    }

    pub fn in_group(mut self, group: Option<&BookmarkGroup>) -> Self {
        self.group_id = group.map(|g| g.id.clone());
        self
    }

    pub fn is_trip_bookmark(&self) -> bool {
        self.route_short_name.is_some() && self.route_id.is_some() && self.trip_headsign.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stop() -> Stop {
        Stop::new("1_29270", "E John St & Broadway  E", 47.6202, -122.3209)
    }

    fn trip() -> TripBookmarkKey {
        TripBookmarkKey {
            route_id: RouteIdentifier::new("1_100002"),
            route_short_name: "10".into(),
            trip_headsign: "Capitol Hill Via 15th Ave E".into(),
        }
    }

    #[test]
    fn test_new_bookmark_defaults() {
        let bookmark = Bookmark::for_stop("Home stop", RegionIdentifier::new(1), stop());

        assert_eq!(bookmark.stop_id, StopIdentifier::new("1_29270"));
        assert_eq!(bookmark.sort_order, i64::MAX);
        assert!(!bookmark.is_favorite);
        assert!(bookmark.group_id.is_none());
        assert!(!bookmark.is_trip_bookmark());
    }

    #[test]
    fn test_trip_bookmark() {
        let group = BookmarkGroup::new("C8AD00F0-8C30-48B1-B194-E5167E45C80E".into(), "Home", 2);
        let bookmark = Bookmark::for_trip("10 to Home", RegionIdentifier::new(1), stop(), trip())
            .in_group(Some(&group));

        assert!(bookmark.is_trip_bookmark());
        assert_eq!(bookmark.route_short_name.as_deref(), Some("10"));
        assert_eq!(
            bookmark.group_id.as_ref().map(|id| id.as_str()),
            Some("C8AD00F0-8C30-48B1-B194-E5167E45C80E")
        );
    }

    #[test]
    fn test_bookmark_ids_are_unique() {
        let a = Bookmark::for_stop("a", RegionIdentifier::new(1), stop());
        let b = Bookmark::for_stop("a", RegionIdentifier::new(1), stop());
        assert_ne!(a.id, b.id);
    }

    #[test]
    fn test_bookmark_serialized_field_names() {
        let bookmark = Bookmark::for_trip("10 to Home", RegionIdentifier::new(1), stop(), trip());
        let json = serde_json::to_value(&bookmark).unwrap();

        assert_eq!(json["regionIdentifier"], 1);
        assert_eq!(json["stopId"], "1_29270");
        assert_eq!(json["routeId"], "1_100002");
        assert_eq!(json["isFavorite"], false);
        assert!(json["groupId"].is_null());
    }

    #[test]
    fn test_group_deserializes_with_verbatim_id() {
        let group: BookmarkGroup = serde_json::from_str(
            r#"{ "id": "c8ad00f0-8C30-48B1-B194-E5167E45C80E", "name": "Home", "sortOrder": 2 }"#,
        )
        .unwrap();

        assert_eq!(group.id.as_str(), "c8ad00f0-8C30-48B1-B194-E5167E45C80E");
        assert_eq!(group.sort_order, 2);

        let bookmark = Bookmark::for_stop("Home stop", RegionIdentifier::new(1), stop()).in_group(Some(&group));
        let json = serde_json::to_value(&bookmark).unwrap();
        assert_eq!(json["groupId"], "c8ad00f0-8C30-48B1-B194-E5167E45C80E");
    }
}
