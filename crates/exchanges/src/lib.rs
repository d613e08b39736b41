//! # Tracklet Exchange Integrations
//!
//! Account-history clients for crypto exchanges and the portfolio ledger built
//! from what they return.
//!
//! ## Architecture
//!
//! - **monoio-based HTTPS client** - Single-threaded async, rustls TLS
//! - **One retry policy** - [`RestClient`] retries every exchange the same way
//! - **Pluggable signing** - one [`RequestSigner`] per exchange
//! - **Exact decimals** - ledger math on [`tracklet_core::Amount`]

pub mod auth;
pub mod binance;
pub mod client;
pub mod errors;
pub mod http;
pub mod traits;
pub mod types;
pub mod wallet;

#[cfg(feature = "coingecko")]
pub mod coingecko;
#[cfg(feature = "kucoin")]
pub mod kucoin;

#[cfg(test)]
pub(crate) mod testing;

// Re-export main types
pub use auth::{Credentials, NoAuth, sign_base64, sign_hex};
pub use binance::{BinanceProcessor, BinanceRestClient, BinanceSigner, BinanceTickerPrices};
pub use client::{ClientConfig, RestClient};
pub use errors::{ExchangeError, Result};
pub use http::MonoioHttpsClient;
pub use traits::{HttpTransport, PriceSource, RequestSigner};
pub use types::*;
pub use wallet::{Holding, Stats, Wallet};

#[cfg(feature = "coingecko")]
pub use coingecko::CoinGeckoPriceSource;
#[cfg(feature = "kucoin")]
pub use kucoin::{KucoinProcessor, KucoinRestClient, KucoinSigner};

/// Print `value` as JSON when running verbosely.
pub(crate) fn show<T: serde::Serialize + ?Sized>(verbose: bool, value: &T) -> Result<()> {
    if verbose {
        tracklet_core::output::print_json(value)?;
    }
    Ok(())
}

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::auth::{Credentials, NoAuth};
    pub use crate::binance::{BinanceProcessor, BinanceRestClient, BinanceTickerPrices};
    pub use crate::client::{ClientConfig, RestClient};
    pub use crate::errors::{ExchangeError, Result};
    pub use crate::traits::{HttpTransport, PriceSource, RequestSigner};
    pub use crate::types::*;
    pub use crate::wallet::Wallet;
    pub use tracklet_core::prelude::*;

    #[cfg(feature = "coingecko")]
    pub use crate::coingecko::CoinGeckoPriceSource;
    #[cfg(feature = "kucoin")]
    pub use crate::kucoin::{KucoinProcessor, KucoinRestClient};
}
