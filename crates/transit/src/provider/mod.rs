//! Stop service providers.

pub mod static_provider;

pub use static_provider::StaticStopService;
