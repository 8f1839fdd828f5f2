//! Log setup for hosts embedding the library.
//!
//! Library code only emits `tracing` events; nothing is printed unless the host
//! calls [`setup_logging`] or installs its own subscriber.

use std::sync::Once;

use tracing_subscriber::{
    filter::FilterFn, fmt::format::Format, layer::SubscriberExt, util::SubscriberInitExt,
};

/// Install a stderr subscriber for `oba*` events. Safe to call more than once.
pub fn setup_logging() {
    static LOGGING_SETUP: Once = Once::new();

    LOGGING_SETUP.call_once(|| {
        let filter = FilterFn::new(|meta| meta.module_path().unwrap_or_default().starts_with("oba"));
        let layer = tracing_subscriber::fmt::layer()
            .event_format(Format::default().without_time())
            .with_writer(std::io::stderr)
            .with_ansi(false);

        // Another subscriber may already be installed by the host
        if tracing_subscriber::registry()
            .with(layer)
            .with(filter)
            .try_init()
            .is_err()
        {
            tracing::debug!("global subscriber already set; keeping it");
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_setup_logging_is_idempotent() {
        setup_logging();
        setup_logging();
        tracing::info!("logging ready");
    }
}
