//! Service regions.

use std::collections::HashMap;
use std::sync::Arc;

use oba_transit::RegionIdentifier;
use serde::{Deserialize, Serialize};

/// The region that was selected in the legacy app
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MigrationRegion {
    pub name: String,
    pub identifier: RegionIdentifier,
}

/// Region metadata as published by the regions server
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Region {
    pub identifier: RegionIdentifier,
    pub name: String,
    pub api_base_url: String,
}

/// Maps a region identifier to its metadata
pub trait RegionRegistry: Send + Sync {
    fn find(&self, identifier: RegionIdentifier) -> Option<Arc<Region>>;
}

#[derive(Clone, Default)]
pub struct StaticRegionRegistry {
    regions: HashMap<RegionIdentifier, Arc<Region>>,
}

impl StaticRegionRegistry {
    pub fn from_regions(regions: Vec<Region>) -> Self {
        Self {
            regions: regions
                .into_iter()
                .map(|r| (r.identifier, Arc::new(r)))
                .collect(),
        }
    }
}

impl RegionRegistry for StaticRegionRegistry {
    fn find(&self, identifier: RegionIdentifier) -> Option<Arc<Region>> {
        self.regions.get(&identifier).cloned()
    }
}
