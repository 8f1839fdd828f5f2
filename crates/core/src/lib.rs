//! # oba-core
//!
//! Current-generation bookmarks and regions, and the one-time migration of
//! data left behind by the classic app.

pub mod bookmarks;
pub mod config;
pub mod logging;
pub mod migration;
pub mod region;

// Re-export transit from the transit crate
pub use oba_transit as transit;
