//! # Tracklet Core
//!
//! Shared building blocks for fetching exchange account history and folding it
//! into a portfolio ledger.
//!
//! - **Exact decimals** - every quantity is an [`Amount`], never a float
//! - **Date-range paging** - bounded windows over a long look-back
//! - **Explicit configuration** - loaded once, passed by reference
//! - **JSON snapshots** - one owner-only file per data kind

pub mod amount;
pub mod config;
pub mod logging;
pub mod output;
pub mod paging;
pub mod runtime;
pub mod store;
pub mod timing;

// Re-export commonly used items
pub use amount::{Amount, AmountError};
pub use config::{ConfigError, TrackletConfig};
pub use logging::init_logging;
pub use paging::{DateRange, date_ranges};
pub use store::{DataStore, StoreError, WriteBatch, kinds};
pub use timing::{PerfTimer, now_millis};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::amount::{Amount, AmountError};
    pub use crate::config::{ExchangeSettings, GeneralSettings, TrackletConfig};
    pub use crate::logging::init_logging;
    pub use crate::paging::{DateRange, date_ranges, date_ranges_from};
    pub use crate::store::{DataStore, kinds};
    pub use crate::timing::{DAY_MS, PerfTimer, now_millis};

    // Common external types
    pub use monoio;
    pub use serde::{Deserialize, Serialize};
}
