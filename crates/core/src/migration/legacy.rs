//! Legacy model decoding.
//!
//! The classic app stored its data as loosely-typed property-list values. This
//! module is the only place that looks at that raw shape: every record either
//! decodes into a typed legacy struct or is skipped with a [`DecodeError`]
//! naming the offending field. A skipped record never affects its siblings.

use oba_transit::{RegionIdentifier, RouteIdentifier, StopIdentifier};
use serde_json::{Map, Value};

use crate::bookmarks::TripBookmarkKey;

/// UUID of the placeholder group that holds ungrouped bookmarks
pub const UNGROUPED_GROUP_UUID: &str = "00000000-0000-0000-0000-000000000000";

// ============================================================================
// Records
// ============================================================================

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct LegacyBookmark {
    pub name: String,
    pub stop_id: StopIdentifier,

    /// Empty for bookmarks of a whole stop
    pub route_id: String,
    pub route_short_name: String,
    pub trip_headsign: String,

    pub region_identifier: Option<i64>,
    pub sort_order: Option<i64>,
}

impl LegacyBookmark {
    /// Stop bookmarks follow every departure; they remember no route
    pub fn is_stop_bookmark(&self) -> bool {
        self.route_id.is_empty()
    }

    pub fn trip_key(&self) -> Option<TripBookmarkKey> {
        if self.is_stop_bookmark() {
            return None;
        }

        Some(TripBookmarkKey {
            route_id: RouteIdentifier::new(&self.route_id),
            route_short_name: self.route_short_name.clone(),
            trip_headsign: self.trip_headsign.clone(),
        })
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct LegacyBookmarkGroup {
    pub uuid: String,
    pub name: Option<String>,

    /// Read verbatim from the store; never derived from position
    pub sort_order: i64,
    pub open: bool,
    pub today_screen_visible: bool,
    pub bookmarks: Vec<LegacyBookmark>,
}

impl LegacyBookmarkGroup {
    /// Placeholder group carrying the bookmarks that had no group
    pub fn ungrouped(bookmarks: Vec<LegacyBookmark>) -> Self {
        Self {
            uuid: UNGROUPED_GROUP_UUID.into(),
            name: None,
            sort_order: i64::MIN,
            open: true,
            today_screen_visible: false,
            bookmarks,
        }
    }

    pub fn is_ungrouped(&self) -> bool {
        self.uuid == UNGROUPED_GROUP_UUID
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct LegacyRegion {
    pub name: String,
    pub identifier: RegionIdentifier,
}

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct LegacyRecentStop {
    pub stop_id: StopIdentifier,

    /// Name cached by the classic app, if it kept one
    pub title: Option<String>,
}

impl LegacyRecentStop {
    pub fn display_title(&self) -> &str {
        self.title.as_deref().unwrap_or(self.stop_id.as_str())
    }
}

// ============================================================================
// Errors
// ============================================================================

/// Why a single legacy record was skipped. `path` locates the record in the
/// store, e.g. `bookmarkGroups[1].bookmarks[0]`.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum DecodeError {
    #[error("{path}: missing required field `{field}`")]
    Missing { path: String, field: &'static str },

    #[error("{path}: field `{field}` is not a {expected}")]
    WrongType {
        path: String,
        field: &'static str,
        expected: &'static str,
    },

    #[error("{path}: expected a dictionary or an array of records")]
    NotACollection { path: String },
}

impl DecodeError {
    pub fn path(&self) -> &str {
        match self {
            Self::Missing { path, .. } | Self::WrongType { path, .. } | Self::NotACollection { path } => path,
        }
    }
}

/// Outcome of decoding one raw record
#[derive(Clone, Debug, PartialEq)]
pub enum Decoded<T> {
    Record(T),
    Skipped(DecodeError),
}

impl<T> Decoded<T> {
    pub fn record(self) -> Option<T> {
        match self {
            Self::Record(record) => Some(record),
            Self::Skipped(_) => None,
        }
    }

    pub fn skipped(&self) -> Option<&DecodeError> {
        match self {
            Self::Record(_) => None,
            Self::Skipped(err) => Some(err),
        }
    }
}

impl<T> From<Result<T, DecodeError>> for Decoded<T> {
    fn from(result: Result<T, DecodeError>) -> Self {
        match result {
            Ok(record) => Self::Record(record),
            Err(err) => Self::Skipped(err),
        }
    }
}

pub type DecodeResult<T> = Result<T, DecodeError>;

// ============================================================================
// Field access
// ============================================================================

/// Typed view over one raw dictionary. Each accessor takes the accepted
/// spellings of a key; the first one present wins.
struct Fields<'a> {
    map: &'a Map<String, Value>,
    path: &'a str,
}

impl<'a> Fields<'a> {
    fn of(value: &'a Value, path: &'a str) -> DecodeResult<Self> {
        match value {
            Value::Object(map) => Ok(Self { map, path }),
            _ => Err(DecodeError::NotACollection { path: path.to_string() }),
        }
    }

    fn get(&self, keys: &[&'static str]) -> Option<(&'static str, &'a Value)> {
        keys.iter()
            .find_map(|k| self.map.get(*k).filter(|v| !v.is_null()).map(|v| (*k, v)))
    }

    fn wrong_type(&self, field: &'static str, expected: &'static str) -> DecodeError {
        DecodeError::WrongType {
            path: self.path.to_string(),
            field,
            expected,
        }
    }

    fn required_str(&self, keys: &[&'static str]) -> DecodeResult<&'a str> {
        match self.get(keys) {
            Some((_, Value::String(s))) => Ok(s.as_str()),
            Some((field, _)) => Err(self.wrong_type(field, "string")),
            None => Err(DecodeError::Missing {
                path: self.path.to_string(),
                field: keys[0],
            }),
        }
    }

    fn optional_str(&self, keys: &[&'static str]) -> DecodeResult<Option<&'a str>> {
        match self.get(keys) {
            Some((_, Value::String(s))) => Ok(Some(s.as_str())),
            Some((field, _)) => Err(self.wrong_type(field, "string")),
            None => Ok(None),
        }
    }

    fn optional_int(&self, keys: &[&'static str]) -> DecodeResult<Option<i64>> {
        match self.get(keys) {
            Some((field, value)) => as_int(value).map(Some).ok_or_else(|| self.wrong_type(field, "integer")),
            None => Ok(None),
        }
    }

    fn required_int(&self, keys: &[&'static str]) -> DecodeResult<i64> {
        self.optional_int(keys)?.ok_or_else(|| DecodeError::Missing {
            path: self.path.to_string(),
            field: keys[0],
        })
    }

    fn optional_bool(&self, keys: &[&'static str]) -> DecodeResult<Option<bool>> {
        match self.get(keys) {
            Some((_, Value::Bool(b))) => Ok(Some(*b)),
            Some((field, value)) => match as_int(value) {
                Some(0) => Ok(Some(false)),
                Some(1) => Ok(Some(true)),
                _ => Err(self.wrong_type(field, "boolean")),
            },
            None => Ok(None),
        }
    }

    fn required_array(&self, keys: &[&'static str]) -> DecodeResult<(&'static str, &'a Vec<Value>)> {
        match self.get(keys) {
            Some((field, Value::Array(items))) => Ok((field, items)),
            Some((field, _)) => Err(self.wrong_type(field, "array")),
            None => Err(DecodeError::Missing {
                path: self.path.to_string(),
                field: keys[0],
            }),
        }
    }
}

/// Property lists write integers as reals at times; accept whole reals
fn as_int(value: &Value) -> Option<i64> {
    let Value::Number(n) = value else {
        return None;
    };

    n.as_i64().or_else(|| {
        n.as_f64()
            .filter(|f| f.fract() == 0.0 && *f >= i64::MIN as f64 && *f <= i64::MAX as f64)
            .map(|f| f as i64)
    })
}

/// A raw collection is normally an array; a lone dictionary is one record
fn records<'a>(value: &'a Value, key: &str) -> DecodeResult<Vec<(String, &'a Value)>> {
    match value {
        Value::Array(items) => Ok(items
            .iter()
            .enumerate()
            .map(|(i, item)| (format!("{key}[{i}]"), item))
            .collect()),
        Value::Object(_) => Ok(vec![(key.to_string(), value)]),
        _ => Err(DecodeError::NotACollection { path: key.to_string() }),
    }
}

fn decode_each<T>(
    value: &Value,
    key: &str,
    decode: impl Fn(&Value, &str) -> DecodeResult<T>,
) -> Vec<Decoded<T>> {
    match records(value, key) {
        Ok(items) => items
            .into_iter()
            .map(|(path, item)| decode(item, &path).into())
            .collect(),
        Err(err) => vec![Decoded::Skipped(err)],
    }
}

// ============================================================================
// Decoders
// ============================================================================

pub fn decode_bookmark(value: &Value, path: &str) -> DecodeResult<LegacyBookmark> {
    let fields = Fields::of(value, path)?;

    Ok(LegacyBookmark {
        name: fields.required_str(&["name"])?.to_string(),
        stop_id: StopIdentifier::new(fields.required_str(&["stopId", "stopID"])?),
        route_id: fields.optional_str(&["routeId", "routeID"])?.unwrap_or_default().to_string(),
        route_short_name: fields.optional_str(&["routeShortName"])?.unwrap_or_default().to_string(),
        trip_headsign: fields.optional_str(&["tripHeadsign"])?.unwrap_or_default().to_string(),
        region_identifier: fields.optional_int(&["regionIdentifier"])?,
        sort_order: fields.optional_int(&["sortOrder"])?,
    })
}

pub fn decode_bookmarks(value: &Value, key: &str) -> Vec<Decoded<LegacyBookmark>> {
    decode_each(value, key, decode_bookmark)
}

/// Decode one group. Malformed bookmarks inside the group are dropped and
/// returned alongside it so the caller can account for them.
pub fn decode_bookmark_group(value: &Value, path: &str) -> DecodeResult<(LegacyBookmarkGroup, Vec<DecodeError>)> {
    let fields = Fields::of(value, path)?;

    let uuid = fields.required_str(&["uuid", "UUID"])?.to_string();
    let (bookmarks_key, raw_bookmarks) = fields.required_array(&["bookmarks"])?;

    // Only the UUID and bookmarks are load-bearing. Any other field of the
    // wrong type falls back to its default.
    let name = fields.optional_str(&["name"]).ok().flatten().map(str::to_string);
    let sort_order = fields.optional_int(&["sortOrder"]).ok().flatten().unwrap_or(0);
    let open = fields.optional_bool(&["open"]).ok().flatten().unwrap_or(false);
    let today_screen_visible = match fields.optional_bool(&["todayScreenVisible"]).ok().flatten() {
        Some(visible) => visible,
        None => fields.optional_int(&["bookmarkGroupType"]).ok().flatten() == Some(1),
    };

    let mut bookmarks = Vec::with_capacity(raw_bookmarks.len());
    let mut skipped = Vec::new();
    for (i, raw) in raw_bookmarks.iter().enumerate() {
        match decode_bookmark(raw, &format!("{path}.{bookmarks_key}[{i}]")) {
            Ok(bookmark) => bookmarks.push(bookmark),
            Err(err) => skipped.push(err),
        }
    }

    let group = LegacyBookmarkGroup {
        uuid,
        name,
        sort_order,
        open,
        today_screen_visible,
        bookmarks,
    };

    Ok((group, skipped))
}

pub fn decode_bookmark_groups(value: &Value, key: &str) -> Vec<Decoded<(LegacyBookmarkGroup, Vec<DecodeError>)>> {
    decode_each(value, key, decode_bookmark_group)
}

pub fn decode_region(value: &Value, key: &str) -> Decoded<LegacyRegion> {
    let decode = || -> DecodeResult<LegacyRegion> {
        let fields = Fields::of(value, key)?;
        Ok(LegacyRegion {
            name: fields.required_str(&["name", "regionName"])?.to_string(),
            identifier: RegionIdentifier::new(fields.required_int(&["identifier", "id"])?),
        })
    };

    decode().into()
}

pub fn decode_recent_stop(value: &Value, path: &str) -> DecodeResult<LegacyRecentStop> {
    if let Value::String(stop_id) = value {
        return Ok(LegacyRecentStop {
            stop_id: StopIdentifier::new(stop_id),
            title: None,
        });
    }

    let fields = Fields::of(value, path)?;
    Ok(LegacyRecentStop {
        stop_id: StopIdentifier::new(fields.required_str(&["stopID", "stopId"])?),
        title: fields.optional_str(&["title", "name"])?.map(str::to_string),
    })
}

pub fn decode_recent_stops(value: &Value, key: &str) -> Vec<Decoded<LegacyRecentStop>> {
    match value {
        // A single bare ID is one recent stop
        Value::String(_) => vec![decode_recent_stop(value, key).into()],
        _ => decode_each(value, key, decode_recent_stop),
    }
}

pub fn decode_user_id(value: &Value) -> Option<String> {
    value.as_str().filter(|s| !s.is_empty()).map(str::to_string)
}
