//! Destination side of the migration.

use std::sync::Arc;

use oba_transit::Stop;

use crate::bookmarks::{Bookmark, BookmarkGroup};
use crate::migration::error::StorerError;
use crate::region::{MigrationRegion, Region, RegionRegistry};

/// Current-generation storage that receives migrated records.
///
/// The migrator is the only writer while a migration runs and calls these
/// methods one at a time. The storer owns durability of what it accepts.
pub trait DataStorer: Send {
    fn migrate_user_id(&mut self, user_id: &str) -> Result<(), StorerError>;

    fn migrate_region(&mut self, region: MigrationRegion) -> Result<(), StorerError>;

    fn migrate_recent_stop(&mut self, stop: Stop) -> Result<(), StorerError>;

    /// `group` is `None` for bookmarks that belonged to no group
    fn migrate_bookmark(&mut self, bookmark: Bookmark, group: Option<BookmarkGroup>) -> Result<(), StorerError>;

    /// Whether a previous run already completed
    fn is_migration_performed(&self) -> bool;

    fn mark_migration_performed(&mut self) -> Result<(), StorerError>;
}

#[derive(Default)]
pub struct InMemoryDataStore {
    user_id: Option<String>,
    region: Option<MigrationRegion>,
    current_region: Option<Arc<Region>>,
    recent_stops: Vec<Stop>,
    bookmarks: Vec<Bookmark>,
    bookmark_groups: Vec<BookmarkGroup>,
    migration_performed: bool,

    registry: Option<Arc<dyn RegionRegistry>>,
}

impl InMemoryDataStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Migrated regions that the registry knows also become the current region
    pub fn with_region_registry(registry: Arc<dyn RegionRegistry>) -> Self {
        Self {
            registry: Some(registry),
            ..Self::default()
        }
    }

    pub fn user_id(&self) -> Option<&str> {
        self.user_id.as_deref()
    }

    pub fn region(&self) -> Option<&MigrationRegion> {
        self.region.as_ref()
    }

    pub fn current_region(&self) -> Option<&Region> {
        self.current_region.as_deref()
    }

    pub fn recent_stops(&self) -> &[Stop] {
        &self.recent_stops
    }

    pub fn bookmarks(&self) -> &[Bookmark] {
        &self.bookmarks
    }

    pub fn bookmark_groups(&self) -> &[BookmarkGroup] {
        &self.bookmark_groups
    }
}

impl DataStorer for InMemoryDataStore {
    fn migrate_user_id(&mut self, user_id: &str) -> Result<(), StorerError> {
        self.user_id = Some(user_id.to_string());
        Ok(())
    }

    fn migrate_region(&mut self, region: MigrationRegion) -> Result<(), StorerError> {
        if let Some(found) = self.registry.as_ref().and_then(|r| r.find(region.identifier)) {
            self.current_region = Some(found);
        }
        self.region = Some(region);
        Ok(())
    }

    fn migrate_recent_stop(&mut self, stop: Stop) -> Result<(), StorerError> {
        match self.recent_stops.iter_mut().find(|s| s.id == stop.id) {
            Some(existing) => *existing = stop,
            None => self.recent_stops.push(stop),
        }
        Ok(())
    }

    fn migrate_bookmark(&mut self, mut bookmark: Bookmark, group: Option<BookmarkGroup>) -> Result<(), StorerError> {
        if self.bookmarks.iter().any(|b| b.id == bookmark.id) {
            return Err(StorerError::Duplicate(format!("bookmark {}", bookmark.id)));
        }

        bookmark.group_id = group.as_ref().map(|g| g.id.clone());
        if let Some(group) = group {
            if !self.bookmark_groups.iter().any(|g| g.id == group.id) {
                self.bookmark_groups.push(group);
            }
        }

        self.bookmarks.push(bookmark);
        Ok(())
    }

    fn is_migration_performed(&self) -> bool {
        self.migration_performed
    }

    fn mark_migration_performed(&mut self) -> Result<(), StorerError> {
        self.migration_performed = true;
        Ok(())
    }
}
