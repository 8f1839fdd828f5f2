//! Transit data models and types.

pub mod types;

// Re-exports for convenience
pub use types::{Result, Route, RouteType, Stop, TransitError};
