use oba_transit::{RegionIdentifier, StopIdentifier, TransitError};

/// Errors a data storer may report for a single write
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum StorerError {
    #[error("already stored: {0}")]
    Duplicate(String),

    #[error("rejected by the data store: {0}")]
    Rejected(String),

    #[error("data store backend error: {0}")]
    Backend(String),
}

/// Why one legacy record did not migrate
#[derive(Clone, Debug, PartialEq, thiserror::Error)]
pub enum MigrationError {
    /// The stop exists but the bookmark's route no longer serves it
    #[error("no active trips for the bookmarked route at this stop")]
    NoActiveTrips,

    #[error("stop {0} no longer exists")]
    StopNotFound(StopIdentifier),

    #[error("network error: {0}")]
    Network(String),

    #[error("invalid response from the API service: {0}")]
    InvalidResponse(String),

    /// The API service talks to a different region than the one being migrated to
    #[error("API service is configured for region {configured}, expected region {expected}")]
    RegionMismatch {
        expected: RegionIdentifier,
        configured: RegionIdentifier,
    },

    #[error(transparent)]
    Storer(#[from] StorerError),
}

impl From<TransitError> for MigrationError {
    fn from(err: TransitError) -> Self {
        match err {
            TransitError::StopNotFound(id) => Self::StopNotFound(id),
            TransitError::Network(message) => Self::Network(message),
            TransitError::InvalidData(message) => Self::InvalidResponse(message),
        }
    }
}

pub type MigrationResult = Result<(), MigrationError>;
