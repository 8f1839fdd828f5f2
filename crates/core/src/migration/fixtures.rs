//! Puget Sound test data: a classic-app preference export and the stops the
//! API service returns for it.

use oba_transit::{AgencyIdentifier, RegionIdentifier, Route, RouteIdentifier, RouteType, StaticStopService, Stop};
use serde_json::json;

use crate::migration::store::InMemoryLegacyStore;

pub const USER_ID: &str = "B72C5F1A-B8E5-4FB3-A857-CAC6EAC86DE0";
pub const PUGET_SOUND: RegionIdentifier = RegionIdentifier(1);

pub const WORK_GROUP: &str = "E87AFBD5-6B61-4916-947F-458476ACBF98";
pub const HOME_GROUP: &str = "C8AD00F0-8C30-48B1-B194-E5167E45C80E";
pub const MIKA_GROUP: &str = "7CFB03E7-8C74-4CF6-A415-B1EEE7259812";

pub fn legacy_store() -> InMemoryLegacyStore {
    InMemoryLegacyStore::from_json_str(&legacy_preferences().to_string())
        .expect("fixture preferences are a JSON object")
}

pub fn legacy_preferences() -> serde_json::Value {
    json!({
        "OBAApplicationUserId": USER_ID,
        "oBARegion": { "name": "Puget Sound", "identifier": 1 },
        "bookmarkGroups": [
            {
                "name": "Home",
                "UUID": HOME_GROUP,
                "sortOrder": 2,
                "open": true,
                "bookmarkGroupType": 0,
                "bookmarks": [
                    {
                        "name": "10 to Home",
                        "stopId": "1_29270",
                        "regionIdentifier": 1,
                        "routeID": "1_100002",
                        "routeShortName": "10",
                        "tripHeadsign": "Capitol Hill Via 15th Ave E"
                    }
                ]
            },
            {
                "name": "Mika",
                "UUID": MIKA_GROUP,
                "sortOrder": 3,
                "open": false,
                "bookmarkGroupType": 1,
                "bookmarks": [
                    {
                        "name": "48 to UW",
                        "stopId": "1_29320",
                        "regionIdentifier": 1,
                        "routeID": "1_100228",
                        "routeShortName": "48",
                        "tripHeadsign": "University District"
                    },
                    {
                        "name": "49 to UW",
                        "stopId": "1_11250",
                        "regionIdentifier": 1,
                        "routeID": "1_100447",
                        "routeShortName": "49",
                        "tripHeadsign": "University District"
                    }
                ]
            },
            {
                "name": "Work",
                "UUID": WORK_GROUP,
                "sortOrder": 1,
                "open": true,
                "bookmarkGroupType": 0,
                "bookmarks": [
                    {
                        "name": "10 to Work",
                        "stopId": "1_11370",
                        "regionIdentifier": 1,
                        "routeID": "1_100002",
                        "routeShortName": "10",
                        "tripHeadsign": "Downtown Seattle"
                    }
                ]
            }
        ],
        "bookmarks": [
            {
                "name": "Link to CHS",
                "stopId": "1_1121",
                "regionIdentifier": 1,
                "routeID": "40_100479",
                "routeShortName": "Link",
                "tripHeadsign": "University Of Washington Station"
            },
            {
                "name": "8 to Seattle Center",
                "stopId": "1_99610",
                "regionIdentifier": 1,
                "routeID": "1_100275",
                "routeShortName": "8",
                "tripHeadsign": "Seattle Center"
            }
        ],
        "mostRecentStops": [
            { "stopID": "1_99610", "title": "Capitol Hill Link Station" },
            { "stopID": "1_29320", "title": "24th Ave E & E Galer St" },
            "1_29270",
            "1_11370",
            { "stopID": "1_11250" },
            "1_1121"
        ]
    })
}

fn route(id: &str, agency: &str, route_type: RouteType, short_name: &str, long_name: &str) -> Route {
    Route {
        id: RouteIdentifier::new(id),
        agency_id: AgencyIdentifier::new(agency),
        route_type,
        short_name: short_name.into(),
        long_name: long_name.into(),
    }
}

pub fn stops() -> Vec<Stop> {
    let link = route("40_100479", "40", RouteType::Tram, "Link", "Link light rail");
    let route_10 = route("1_100002", "1", RouteType::Bus, "10", "Capitol Hill - Downtown Seattle");
    let route_48 = route("1_100228", "1", RouteType::Bus, "48", "Mount Baker - University District");
    let route_49 = route("1_100447", "1", RouteType::Bus, "49", "University District - Broadway");

    vec![
        Stop::new("1_99610", "Capitol Hill Link Station", 47.6196, -122.3204).with_route(link.clone()),
        Stop::new("1_29320", "24th Ave E & E Galer St", 47.6324, -122.3009).with_route(route_48),
        Stop::new("1_29270", "E John St & Broadway  E", 47.6203, -122.3209).with_route(route_10.clone()),
        Stop::new("1_11370", "15th Ave E & E Galer St", 47.6325, -122.3124).with_route(route_10),
        Stop::new("1_11250", "10th Ave E & E Galer St", 47.6324, -122.3197).with_route(route_49),
        Stop::new("1_1121", "Westlake Station - Bay A", 47.6115, -122.3370).with_route(link),
    ]
}

pub fn stop_service() -> StaticStopService {
    StaticStopService::from_stops(stops()).with_region(PUGET_SOUND)
}
