//! The migration orchestrator.
//!
//! A run walks a fixed sequence of stages. Every stage runs whatever happened
//! in the previous one, and every legacy record ends up with exactly one
//! result in the [`MigrationReport`]. Nothing in here fails as a whole: the
//! worst case is a report in which every network-dependent record failed.

use std::sync::Arc;

use chrono::Utc;
use oba_transit::{RegionIdentifier, Stop, StopService};
use tokio::sync::watch;
use tracing::{debug, error, info, warn};

use crate::bookmarks::{Bookmark, BookmarkGroup, BookmarkGroupIdentifier};
use crate::config::MigrationConfig;
use crate::migration::error::{MigrationError, MigrationResult, StorerError};
use crate::migration::extractor::{LegacyData, MigrationDataExtractor};
use crate::migration::legacy::LegacyBookmark;
use crate::migration::report::{BookmarkGroupMigrationResult, MigrationReport, MigrationStatus};
use crate::migration::resolver::StopResolver;
use crate::migration::store::LegacyStore;
use crate::migration::storer::DataStorer;
use crate::region::MigrationRegion;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MigrationParameters {
    /// Run even if a previous migration completed
    pub force_migration: bool,

    /// Region the migrated bookmarks are assigned to
    pub region_identifier: RegionIdentifier,
}

impl MigrationParameters {
    pub fn new(region_identifier: RegionIdentifier) -> Self {
        Self {
            force_migration: false,
            region_identifier,
        }
    }

    pub fn forced(mut self) -> Self {
        self.force_migration = true;
        self
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord)]
pub enum MigrationStage {
    #[default]
    Idle,
    Extracting,
    MigratingUserId,
    MigratingRegion,
    MigratingRecentStops,
    MigratingBookmarkGroups,
    MigratingBookmarks,
    Finished,
}

pub struct DataMigrator {
    extractor: MigrationDataExtractor,
    stop_service: Arc<dyn StopService>,
    config: MigrationConfig,
    stage: watch::Sender<MigrationStage>,
}

impl DataMigrator {
    pub fn new(legacy_store: Arc<dyn LegacyStore>, stop_service: Arc<dyn StopService>) -> Self {
        Self::with_config(legacy_store, stop_service, MigrationConfig::default())
    }

    pub fn with_config(
        legacy_store: Arc<dyn LegacyStore>,
        stop_service: Arc<dyn StopService>,
        config: MigrationConfig,
    ) -> Self {
        Self {
            extractor: MigrationDataExtractor::new(legacy_store, config.legacy_keys.clone()),
            stop_service,
            config,
            stage: watch::Sender::new(MigrationStage::Idle),
        }
    }

    pub fn extractor(&self) -> &MigrationDataExtractor {
        &self.extractor
    }

    pub fn has_data_to_migrate(&self) -> bool {
        self.extractor.has_data_to_migrate()
    }

    /// Whether the user should be offered a migration
    pub fn should_perform_migration<D>(&self, storer: &D) -> bool
    where
        D: DataStorer + ?Sized,
    {
        self.has_data_to_migrate() && !storer.is_migration_performed()
    }

    /// Record that the user declined, so they are not asked again. The legacy
    /// data is left in place and a forced migration remains possible.
    pub fn stop_migration_prompts<D>(&self, storer: &mut D) -> Result<(), StorerError>
    where
        D: DataStorer + ?Sized,
    {
        info!("migration declined; no longer prompting");
        storer.mark_migration_performed()
    }

    /// Follow the stage of the current (or last) run
    pub fn subscribe_stage(&self) -> watch::Receiver<MigrationStage> {
        self.stage.subscribe()
    }

    pub fn stage(&self) -> MigrationStage {
        *self.stage.borrow()
    }

    pub async fn perform_migration<D>(&self, parameters: MigrationParameters, storer: &mut D) -> MigrationReport
    where
        D: DataStorer + ?Sized,
    {
        let mut report = MigrationReport::started(Utc::now());

        if !parameters.force_migration && storer.is_migration_performed() {
            info!("data migration already performed");
            self.set_stage(MigrationStage::Finished);
            return report.finish(MigrationStatus::AlreadyPerformed, Utc::now());
        }

        if !self.has_data_to_migrate() {
            info!("no legacy data to migrate");
            self.set_stage(MigrationStage::Finished);
            return report.finish(MigrationStatus::NothingToMigrate, Utc::now());
        }

        info!(
            region = %parameters.region_identifier,
            forced = parameters.force_migration,
            "starting data migration"
        );

        self.set_stage(MigrationStage::Extracting);
        let LegacyData {
            user_id,
            region,
            mut bookmark_groups,
            ungrouped_bookmarks,
            recent_stops,
            skipped,
        } = self.extractor.extract();
        report.skipped_records = skipped;

        self.set_stage(MigrationStage::MigratingUserId);
        if let Some(user_id) = user_id {
            let result = storer.migrate_user_id(&user_id).map_err(MigrationError::from);
            log_failure("user ID", &result);
            report.user_id_migration_result = Some(result);
        }

        self.set_stage(MigrationStage::MigratingRegion);
        if let Some(region) = region {
            let result = storer
                .migrate_region(MigrationRegion {
                    name: region.name,
                    identifier: region.identifier,
                })
                .map_err(MigrationError::from);
            log_failure("region", &result);
            report.region_migration_result = Some(result);
        }

        // Nothing above touches the network. From here on, every stop the
        // remaining stages need is fetched up front, once.
        self.set_stage(MigrationStage::MigratingRecentStops);
        let mut resolver = StopResolver::new(
            self.stop_service.clone(),
            parameters.region_identifier,
            self.config.fetch_timeout(),
        );
        let stop_ids = recent_stops
            .iter()
            .map(|s| s.stop_id.clone())
            .chain(bookmark_groups.iter().flat_map(|g| g.bookmarks.iter()).map(|b| b.stop_id.clone()))
            .chain(ungrouped_bookmarks.iter().map(|b| b.stop_id.clone()));
        resolver.prefetch(stop_ids).await;

        for recent_stop in recent_stops {
            let result = match resolver.stop(&recent_stop.stop_id).await {
                Ok(stop) => storer.migrate_recent_stop(stop).map_err(MigrationError::from),
                Err(err) => Err(err),
            };
            log_failure(&format!("recent stop {}", recent_stop.stop_id), &result);
            report.record_recent_stop(recent_stop, result);
        }

        self.set_stage(MigrationStage::MigratingBookmarkGroups);
        bookmark_groups.sort_by_key(|g| g.sort_order);
        for legacy_group in bookmark_groups {
            let group = BookmarkGroup::new(
                BookmarkGroupIdentifier::new(&legacy_group.uuid),
                legacy_group.name.clone().unwrap_or_default(),
                legacy_group.sort_order,
            );

            let results = self
                .migrate_bookmarks(&legacy_group.bookmarks, Some(&group), parameters, &mut resolver, storer)
                .await;
            let forwarded = results.iter().any(|(_, result)| result.is_ok());
            if !forwarded {
                debug!(group = %group.id, "no bookmark migrated; dropping group");
            }

            for (bookmark, result) in &results {
                report.record_bookmark(bookmark.clone(), result.clone());
            }
            report.bookmark_groups_migration_result.push(BookmarkGroupMigrationResult {
                group: legacy_group,
                bookmarks: results,
                forwarded,
            });
        }

        self.set_stage(MigrationStage::MigratingBookmarks);
        let results = self
            .migrate_bookmarks(&ungrouped_bookmarks, None, parameters, &mut resolver, storer)
            .await;
        for (bookmark, result) in &results {
            report.record_bookmark(bookmark.clone(), result.clone());
        }
        report.ungrouped_bookmarks_result = results;

        if let Err(err) = storer.mark_migration_performed() {
            error!("failed to mark data migration as performed: {err}");
        }

        self.set_stage(MigrationStage::Finished);
        let report = report.finish(MigrationStatus::Completed, Utc::now());

        let summary = report.summary();
        info!(
            bookmarks_migrated = summary.bookmarks_migrated,
            bookmarks_failed = summary.bookmarks_failed,
            recent_stops_migrated = summary.recent_stops_migrated,
            recent_stops_failed = summary.recent_stops_failed,
            skipped_records = summary.skipped_records,
            "data migration finished"
        );

        report
    }

    async fn migrate_bookmarks<D>(
        &self,
        bookmarks: &[LegacyBookmark],
        group: Option<&BookmarkGroup>,
        parameters: MigrationParameters,
        resolver: &mut StopResolver,
        storer: &mut D,
    ) -> Vec<(LegacyBookmark, MigrationResult)>
    where
        D: DataStorer + ?Sized,
    {
        let mut results = Vec::with_capacity(bookmarks.len());

        for legacy in bookmarks {
            let result = match resolver.validate_bookmark(legacy).await {
                Ok(stop) => {
                    let bookmark = migrated_bookmark(legacy, stop, parameters.region_identifier, group);
                    storer
                        .migrate_bookmark(bookmark, group.cloned())
                        .map_err(MigrationError::from)
                }
                Err(err) => Err(err),
            };
            log_failure(&format!("bookmark \"{}\"", legacy.name), &result);
            results.push((legacy.clone(), result));
        }

        results
    }

    fn set_stage(&self, stage: MigrationStage) {
        debug!(?stage, "migration stage");
        self.stage.send_replace(stage);
    }
}

fn migrated_bookmark(
    legacy: &LegacyBookmark,
    stop: Stop,
    region_identifier: RegionIdentifier,
    group: Option<&BookmarkGroup>,
) -> Bookmark {
    let bookmark = match legacy.trip_key() {
        Some(trip) => Bookmark::for_trip(&legacy.name, region_identifier, stop, trip),
        None => Bookmark::for_stop(&legacy.name, region_identifier, stop),
    };
    bookmark.in_group(group)
}

fn log_failure(record: &str, result: &MigrationResult) {
    if let Err(err) = result {
        warn!("failed to migrate {record}: {err}");
    }
}

impl std::fmt::Debug for DataMigrator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DataMigrator")
            .field("config", &self.config)
            .field("stage", &self.stage())
            .finish_non_exhaustive()
    }
}
