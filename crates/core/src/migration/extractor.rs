//! Extraction of classic-app data from the legacy preference store.
//!
//! All reads are side-effect free: the store is never written and every call
//! decodes afresh, so repeated or reordered calls return identical results.

use std::sync::Arc;

use serde_json::Value;
use tracing::warn;

use crate::config::LegacyKeys;
use crate::migration::legacy::*;
use crate::migration::store::LegacyStore;

/// Everything found in the legacy store, decoded in one pass
#[derive(Clone, Debug, Default, PartialEq)]
pub struct LegacyData {
    pub user_id: Option<String>,
    pub region: Option<LegacyRegion>,

    /// Named groups, in storage order
    pub bookmark_groups: Vec<LegacyBookmarkGroup>,
    pub ungrouped_bookmarks: Vec<LegacyBookmark>,
    pub recent_stops: Vec<LegacyRecentStop>,

    /// Records that could not be decoded
    pub skipped: Vec<DecodeError>,
}

pub struct MigrationDataExtractor {
    store: Arc<dyn LegacyStore>,
    keys: LegacyKeys,
}

impl MigrationDataExtractor {
    pub fn new(store: Arc<dyn LegacyStore>, keys: LegacyKeys) -> Self {
        Self { store, keys }
    }

    /// True if any of the known keys holds a non-empty value
    pub fn has_data_to_migrate(&self) -> bool {
        [
            &self.keys.user_id,
            &self.keys.region,
            &self.keys.bookmark_groups,
            &self.keys.bookmarks,
            &self.keys.recent_stops,
        ]
        .into_iter()
        .any(|key| self.raw(key).is_some_and(|v| !is_empty_value(&v)))
    }

    pub fn extract_user_id(&self) -> Option<String> {
        self.raw(&self.keys.user_id).and_then(|v| decode_user_id(&v))
    }

    pub fn extract_region(&self) -> Option<LegacyRegion> {
        let value = self.raw(&self.keys.region)?;
        match decode_region(&value, &self.keys.region) {
            Decoded::Record(region) => Some(region),
            Decoded::Skipped(err) => {
                warn!("skipping legacy region: {err}");
                None
            }
        }
    }

    /// Named groups plus, when ungrouped bookmarks exist, a placeholder group
    /// holding them. The placeholder comes first and has no name.
    pub fn extract_bookmark_groups(&self) -> Option<Vec<LegacyBookmarkGroup>> {
        let named = self.decode_groups(&mut Vec::new());
        let ungrouped = self.extract_bookmarks();

        if named.is_none() && ungrouped.is_none() {
            return None;
        }

        let mut groups = Vec::new();
        if let Some(bookmarks) = ungrouped.filter(|b| !b.is_empty()) {
            groups.push(LegacyBookmarkGroup::ungrouped(bookmarks));
        }
        groups.extend(named.unwrap_or_default());

        Some(groups)
    }

    /// Bookmarks that belong to no group
    pub fn extract_bookmarks(&self) -> Option<Vec<LegacyBookmark>> {
        self.decode_ungrouped(&mut Vec::new())
    }

    pub fn extract_recent_stops(&self) -> Option<Vec<LegacyRecentStop>> {
        self.decode_recent(&mut Vec::new())
    }

    /// Decode everything, collecting skipped records instead of only logging them
    pub fn extract(&self) -> LegacyData {
        let mut skipped = Vec::new();

        let region = self.raw(&self.keys.region).and_then(|value| {
            match decode_region(&value, &self.keys.region) {
                Decoded::Record(region) => Some(region),
                Decoded::Skipped(err) => {
                    warn!("skipping legacy region: {err}");
                    skipped.push(err);
                    None
                }
            }
        });

        let bookmark_groups = self.decode_groups(&mut skipped).unwrap_or_default();
        let ungrouped_bookmarks = self.decode_ungrouped(&mut skipped).unwrap_or_default();
        let recent_stops = self.decode_recent(&mut skipped).unwrap_or_default();

        LegacyData {
            user_id: self.extract_user_id(),
            region,
            bookmark_groups,
            ungrouped_bookmarks,
            recent_stops,
            skipped,
        }
    }

    fn raw(&self, key: &str) -> Option<Value> {
        self.store.value(key).filter(|v| !v.is_null())
    }

    fn decode_groups(&self, skipped: &mut Vec<DecodeError>) -> Option<Vec<LegacyBookmarkGroup>> {
        let key = &self.keys.bookmark_groups;
        let value = self.raw(key)?;

        let mut groups = Vec::new();
        for decoded in decode_bookmark_groups(&value, key) {
            match decoded {
                Decoded::Record((group, dropped)) => {
                    log_skipped(&dropped);
                    skipped.extend(dropped);
                    groups.push(group);
                }
                Decoded::Skipped(err) => {
                    log_skipped(std::slice::from_ref(&err));
                    skipped.push(err);
                }
            }
        }

        Some(groups)
    }

    fn decode_ungrouped(&self, skipped: &mut Vec<DecodeError>) -> Option<Vec<LegacyBookmark>> {
        let key = &self.keys.bookmarks;
        let value = self.raw(key)?;
        Some(collect(decode_bookmarks(&value, key), skipped))
    }

    fn decode_recent(&self, skipped: &mut Vec<DecodeError>) -> Option<Vec<LegacyRecentStop>> {
        let key = &self.keys.recent_stops;
        let value = self.raw(key)?;
        Some(collect(decode_recent_stops(&value, key), skipped))
    }
}

fn collect<T>(decoded: Vec<Decoded<T>>, skipped: &mut Vec<DecodeError>) -> Vec<T> {
    let mut records = Vec::with_capacity(decoded.len());
    for item in decoded {
        match item {
            Decoded::Record(record) => records.push(record),
            Decoded::Skipped(err) => {
                log_skipped(std::slice::from_ref(&err));
                skipped.push(err);
            }
        }
    }
    records
}

fn log_skipped(errors: &[DecodeError]) {
    for err in errors {
        warn!("skipping legacy record: {err}");
    }
}

fn is_empty_value(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(s) => s.is_empty(),
        Value::Array(items) => items.is_empty(),
        Value::Object(map) => map.is_empty(),
        Value::Bool(_) | Value::Number(_) => false,
    }
}
