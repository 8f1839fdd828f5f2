//! One-time migration of classic-app data into current storage.
//!
//! [`DataMigrator`] reads the legacy preference store through the
//! [`MigrationDataExtractor`], validates bookmarks and recent stops against the
//! API service, hands what survives to a [`DataStorer`] and returns a
//! [`MigrationReport`] with one result per legacy record.

pub mod error;
pub mod extractor;
pub mod legacy;
pub mod migrator;
pub mod report;
pub mod resolver;
pub mod store;
pub mod storer;

#[cfg(test)]
pub(crate) mod fixtures;

pub use error::{MigrationError, MigrationResult, StorerError};
pub use extractor::{LegacyData, MigrationDataExtractor};
pub use legacy::{DecodeError, LegacyBookmark, LegacyBookmarkGroup, LegacyRecentStop, LegacyRegion};
pub use migrator::{DataMigrator, MigrationParameters, MigrationStage};
pub use report::{BookmarkGroupMigrationResult, ItemStatus, MigrationReport, MigrationStatus, ReportSummary};
pub use store::{InMemoryLegacyStore, LegacyStore};
pub use storer::{DataStorer, InMemoryDataStore};
