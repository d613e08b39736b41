//! Unified logging integration
//!
//! One `tracing-subscriber` fmt subscriber for the whole process; the level is
//! taken from `RUST_LOG` and defaults to `info`.

use std::sync::Once;
use tracing::Level;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

static INIT: Once = Once::new();

/// Initialize logging. Safe to call more than once.
pub fn init_logging() {
    INIT.call_once(|| {
        let subscriber = FmtSubscriber::builder()
            .with_max_level(Level::DEBUG)
            .with_env_filter(
                EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
            )
            .with_target(false)
            .with_writer(std::io::stderr)
            .finish();

        // A subscriber installed by an embedding program wins.
        if tracing::subscriber::set_global_default(subscriber).is_ok() {
            tracing::debug!("📝 Initialized tracing logging");
        }
    });
}

/// Log a fatal stage failure in one consistent shape
#[macro_export]
macro_rules! log_error {
    ($operation:expr, $error:expr) => {
        tracing::error!("❌ {} failed: {}", $operation, $error);
    };
}
