//! The per-record ledger of one migration run.
//!
//! Every legacy record the migrator considered has exactly one result. The
//! report is assembled by the migrator and read-only once handed out.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::migration::error::{MigrationError, MigrationResult};
use crate::migration::legacy::{DecodeError, LegacyBookmark, LegacyBookmarkGroup, LegacyRecentStop};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum MigrationStatus {
    /// The migration ran; individual records may still have failed
    Completed,

    /// A previous run finished and the migration was not forced
    AlreadyPerformed,

    /// The legacy store holds nothing to migrate
    NothingToMigrate,
}

/// Results for one legacy bookmark group, in the group's own bookmark order
#[derive(Clone, Debug, PartialEq)]
pub struct BookmarkGroupMigrationResult {
    pub group: LegacyBookmarkGroup,
    pub bookmarks: Vec<(LegacyBookmark, MigrationResult)>,

    /// Whether the group reached the data storer, i.e. at least one of its
    /// bookmarks migrated
    pub forwarded: bool,
}

#[derive(Clone, Debug)]
pub struct MigrationReport {
    pub(crate) status: MigrationStatus,
    pub(crate) date_started: DateTime<Utc>,
    pub(crate) date_finished: Option<DateTime<Utc>>,

    pub(crate) user_id_migration_result: Option<MigrationResult>,
    pub(crate) region_migration_result: Option<MigrationResult>,

    pub(crate) recent_stops_migration_result: HashMap<LegacyRecentStop, MigrationResult>,
    pub(crate) recent_stop_order: Vec<LegacyRecentStop>,

    pub(crate) bookmarks_migration_result: HashMap<LegacyBookmark, MigrationResult>,
    pub(crate) ungrouped_bookmarks_result: Vec<(LegacyBookmark, MigrationResult)>,
    pub(crate) bookmark_groups_migration_result: Vec<BookmarkGroupMigrationResult>,

    pub(crate) skipped_records: Vec<DecodeError>,
}

impl MigrationReport {
    pub(crate) fn started(date_started: DateTime<Utc>) -> Self {
        Self {
            status: MigrationStatus::Completed,
            date_started,
            date_finished: None,
            user_id_migration_result: None,
            region_migration_result: None,
            recent_stops_migration_result: HashMap::new(),
            recent_stop_order: Vec::new(),
            bookmarks_migration_result: HashMap::new(),
            ungrouped_bookmarks_result: Vec::new(),
            bookmark_groups_migration_result: Vec::new(),
            skipped_records: Vec::new(),
        }
    }

    pub(crate) fn finish(mut self, status: MigrationStatus, date_finished: DateTime<Utc>) -> Self {
        self.status = status;
        self.date_finished = Some(date_finished);
        self
    }

    pub(crate) fn record_recent_stop(&mut self, recent_stop: LegacyRecentStop, result: MigrationResult) {
        if self.recent_stops_migration_result.insert(recent_stop.clone(), result).is_none() {
            self.recent_stop_order.push(recent_stop);
        }
    }

    pub(crate) fn record_bookmark(&mut self, bookmark: LegacyBookmark, result: MigrationResult) {
        self.bookmarks_migration_result.insert(bookmark, result);
    }

    pub fn status(&self) -> MigrationStatus {
        self.status
    }

    pub fn date_started(&self) -> DateTime<Utc> {
        self.date_started
    }

    pub fn date_finished(&self) -> Option<DateTime<Utc>> {
        self.date_finished
    }

    pub fn is_finished(&self) -> bool {
        self.date_finished.is_some()
    }

    /// `None` if the legacy store had no user ID
    pub fn user_id_migration_result(&self) -> Option<&MigrationResult> {
        self.user_id_migration_result.as_ref()
    }

    /// `None` if the legacy store had no readable region
    pub fn region_migration_result(&self) -> Option<&MigrationResult> {
        self.region_migration_result.as_ref()
    }

    pub fn recent_stops_migration_result(&self) -> &HashMap<LegacyRecentStop, MigrationResult> {
        &self.recent_stops_migration_result
    }

    /// Every legacy bookmark considered, grouped or not. Identical legacy
    /// bookmarks share one entry holding the last result; the per-group and
    /// ungrouped lists keep each occurrence.
    pub fn bookmarks_migration_result(&self) -> &HashMap<LegacyBookmark, MigrationResult> {
        &self.bookmarks_migration_result
    }

    pub fn bookmark_result(&self, bookmark: &LegacyBookmark) -> Option<&MigrationResult> {
        self.bookmarks_migration_result.get(bookmark)
    }

    /// Named groups in `sort_order` order
    pub fn bookmark_groups_migration_result(&self) -> &[BookmarkGroupMigrationResult] {
        &self.bookmark_groups_migration_result
    }

    /// Ungrouped bookmarks in their legacy order
    pub fn ungrouped_bookmarks_result(&self) -> &[(LegacyBookmark, MigrationResult)] {
        &self.ungrouped_bookmarks_result
    }

    /// Legacy records that could not be read at all
    pub fn skipped_records(&self) -> &[DecodeError] {
        &self.skipped_records
    }

    pub fn failed_bookmarks(&self) -> impl Iterator<Item = (&LegacyBookmark, &MigrationError)> {
        self.bookmarks_migration_result
            .iter()
            .filter_map(|(bookmark, result)| result.as_ref().err().map(|err| (bookmark, err)))
    }

    pub fn failed_recent_stops(&self) -> impl Iterator<Item = (&LegacyRecentStop, &MigrationError)> {
        self.recent_stops_migration_result
            .iter()
            .filter_map(|(stop, result)| result.as_ref().err().map(|err| (stop, err)))
    }

    pub fn summary(&self) -> ReportSummary {
        let mut sections = Vec::new();

        sections.push(SummarySection {
            title: "Metadata".into(),
            items: vec![
                SummaryItem::new("User ID", self.user_id_migration_result.as_ref()),
                SummaryItem::new("Region", self.region_migration_result.as_ref()),
            ],
        });

        sections.push(SummarySection {
            title: "Recent Stops".into(),
            items: self
                .recent_stop_order
                .iter()
                .map(|stop| SummaryItem::new(stop.display_title(), self.recent_stops_migration_result.get(stop)))
                .collect(),
        });

        sections.push(SummarySection {
            title: "Bookmarks".into(),
            items: self
                .ungrouped_bookmarks_result
                .iter()
                .map(|(bookmark, result)| SummaryItem::new(&bookmark.name, Some(result)))
                .collect(),
        });

        for group in &self.bookmark_groups_migration_result {
            sections.push(SummarySection {
                title: group.group.name.clone().unwrap_or_else(|| "<unnamed group>".into()),
                items: group
                    .bookmarks
                    .iter()
                    .map(|(bookmark, result)| SummaryItem::new(&bookmark.name, Some(result)))
                    .collect(),
            });
        }

        let (bookmarks_migrated, bookmarks_failed) = self
            .ungrouped_bookmarks_result
            .iter()
            .chain(self.bookmark_groups_migration_result.iter().flat_map(|g| g.bookmarks.iter()))
            .fold((0, 0), |(ok, failed), (_, result)| match result {
                Ok(()) => (ok + 1, failed),
                Err(_) => (ok, failed + 1),
            });
        let recent_stops_failed = self.failed_recent_stops().count();

        ReportSummary {
            status: self.status,
            sections,
            bookmarks_migrated,
            bookmarks_failed,
            recent_stops_migrated: self.recent_stops_migration_result.len() - recent_stops_failed,
            recent_stops_failed,
            skipped_records: self.skipped_records.len(),
        }
    }
}

// ============================================================================
// Summary
// ============================================================================

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum ItemStatus {
    Succeeded,
    Failed,

    /// Nothing was there to migrate
    Skipped,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct SummaryItem {
    pub title: String,
    pub status: ItemStatus,
    pub error: Option<String>,
}

impl SummaryItem {
    fn new(title: impl Into<String>, result: Option<&MigrationResult>) -> Self {
        let (status, error) = match result {
            Some(Ok(())) => (ItemStatus::Succeeded, None),
            Some(Err(err)) => (ItemStatus::Failed, Some(err.to_string())),
            None => (ItemStatus::Skipped, None),
        };

        Self {
            title: title.into(),
            status,
            error,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct SummarySection {
    pub title: String,
    pub items: Vec<SummaryItem>,
}

impl SummarySection {
    pub fn overall_successful(&self) -> bool {
        self.items.iter().all(|item| item.status != ItemStatus::Failed)
    }
}

/// Presentation-ready digest of a [`MigrationReport`]
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportSummary {
    pub status: MigrationStatus,
    pub sections: Vec<SummarySection>,
    pub bookmarks_migrated: usize,
    pub bookmarks_failed: usize,
    pub recent_stops_migrated: usize,
    pub recent_stops_failed: usize,
    pub skipped_records: usize,
}

#[cfg(test)]
mod tests {
    use super::*;
    use oba_transit::StopIdentifier;

    fn bookmark(name: &str, stop: &str) -> LegacyBookmark {
        LegacyBookmark {
            name: name.into(),
            stop_id: StopIdentifier::new(stop),
            route_id: "1_100002".into(),
            route_short_name: "10".into(),
            trip_headsign: "Downtown Seattle".into(),
            region_identifier: Some(1),
            sort_order: None,
        }
    }

    fn recent(stop: &str, title: Option<&str>) -> LegacyRecentStop {
        LegacyRecentStop {
            stop_id: StopIdentifier::new(stop),
            title: title.map(str::to_string),
        }
    }

    #[test]
    fn test_new_report_is_unfinished() {
        let report = MigrationReport::started(Utc::now());
        assert!(!report.is_finished());
        assert!(report.date_finished().is_none());

        let report = report.finish(MigrationStatus::NothingToMigrate, Utc::now());
        assert!(report.is_finished());
        assert_eq!(report.status(), MigrationStatus::NothingToMigrate);
        assert!(report.date_finished().unwrap() >= report.date_started());
    }

    #[test]
    fn test_recent_stop_recorded_once() {
        let mut report = MigrationReport::started(Utc::now());
        report.record_recent_stop(recent("1_1121", None), Ok(()));
        report.record_recent_stop(recent("1_1121", None), Ok(()));

        assert_eq!(report.recent_stops_migration_result().len(), 1);
        assert_eq!(report.recent_stop_order.len(), 1);
    }

    #[test]
    fn test_summary() {
        let mut report = MigrationReport::started(Utc::now());
        report.user_id_migration_result = Some(Ok(()));

        report.record_recent_stop(recent("1_1121", None), Ok(()));
        report.record_recent_stop(
            recent("1_99610", Some("Capitol Hill Link Station")),
            Err(MigrationError::Network("offline".into())),
        );

        let loose = bookmark("Link to CHS", "1_1121");
        let failing = bookmark("8 to Seattle Center", "1_99610");
        let grouped = bookmark("10 to Work", "1_11370");
        for (b, r) in [
            (loose.clone(), Ok(())),
            (failing.clone(), Err(MigrationError::NoActiveTrips)),
        ] {
            report.record_bookmark(b.clone(), r.clone());
            report.ungrouped_bookmarks_result.push((b, r));
        }
        report.record_bookmark(grouped.clone(), Ok(()));
        report.bookmark_groups_migration_result.push(BookmarkGroupMigrationResult {
            group: LegacyBookmarkGroup {
                uuid: "A".into(),
                name: None,
                sort_order: 1,
                open: true,
                today_screen_visible: false,
                bookmarks: vec![grouped.clone()],
            },
            bookmarks: vec![(grouped, Ok(()))],
            forwarded: true,
        });

        let report = report.finish(MigrationStatus::Completed, Utc::now());
        let summary = report.summary();

        let titles: Vec<&str> = summary.sections.iter().map(|s| s.title.as_str()).collect();
        assert_eq!(titles, vec!["Metadata", "Recent Stops", "Bookmarks", "<unnamed group>"]);

        let metadata = &summary.sections[0];
        assert_eq!(metadata.items[0].status, ItemStatus::Succeeded);
        assert_eq!(metadata.items[1].status, ItemStatus::Skipped);
        assert!(metadata.overall_successful());

        let recent_stops = &summary.sections[1];
        assert_eq!(recent_stops.items[0].title, "1_1121");
        assert_eq!(recent_stops.items[1].title, "Capitol Hill Link Station");
        assert!(!recent_stops.overall_successful());

        let bookmarks = &summary.sections[2];
        assert_eq!(bookmarks.items[1].error.as_deref(), Some("no active trips for the bookmarked route at this stop"));

        assert_eq!(summary.bookmarks_migrated, 2);
        assert_eq!(summary.bookmarks_failed, 1);
        assert_eq!(summary.recent_stops_migrated, 1);
        assert_eq!(summary.recent_stops_failed, 1);

        assert_eq!(report.bookmark_result(&failing), Some(&Err(MigrationError::NoActiveTrips)));
        assert_eq!(report.failed_bookmarks().count(), 1);
    }

    #[test]
    fn test_summary_counts_every_occurrence() {
        let mut report = MigrationReport::started(Utc::now());
        let shared = bookmark("10 to Work", "1_11370");

        for (uuid, result) in [("A", Ok(())), ("B", Err(MigrationError::Network("offline".into())))] {
            report.record_bookmark(shared.clone(), result.clone());
            report.bookmark_groups_migration_result.push(BookmarkGroupMigrationResult {
                group: LegacyBookmarkGroup {
                    uuid: uuid.into(),
                    name: Some(uuid.into()),
                    sort_order: 0,
                    open: true,
                    today_screen_visible: false,
                    bookmarks: vec![shared.clone()],
                },
                bookmarks: vec![(shared.clone(), result.clone())],
                forwarded: result.is_ok(),
            });
        }

        let summary = report.finish(MigrationStatus::Completed, Utc::now()).summary();
        assert_eq!(summary.bookmarks_migrated, 1);
        assert_eq!(summary.bookmarks_failed, 1);

        let items: usize = summary.sections.iter().skip(2).map(|s| s.items.len()).sum();
        assert_eq!(items, summary.bookmarks_migrated + summary.bookmarks_failed);
    }

    #[test]
    fn test_summary_serializes() {
        let report = MigrationReport::started(Utc::now()).finish(MigrationStatus::AlreadyPerformed, Utc::now());
        let json = serde_json::to_value(report.summary()).unwrap();

        assert_eq!(json["status"], "alreadyPerformed");
        assert_eq!(json["bookmarksMigrated"], 0);
        assert_eq!(json["sections"][0]["items"][0]["status"], "skipped");
    }
}
