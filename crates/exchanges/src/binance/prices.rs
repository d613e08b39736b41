//! Spot prices from Binance tickers

use crate::binance::rest::BinanceRestClient;
use crate::errors::{ExchangeError, Result};
use crate::traits::PriceSource;
use crate::types::AssetQuote;
use async_trait::async_trait;
use tracklet_core::Amount;

/// Stablecoin every asset is quoted against
pub const QUOTE_ASSET: &str = "USDT";

/// Prices `ASSET` from the `ASSETUSDT` ticker.
pub struct BinanceTickerPrices {
    client: BinanceRestClient,
}

impl BinanceTickerPrices {
    pub fn new(client: BinanceRestClient) -> Self {
        Self { client }
    }
}

#[async_trait(?Send)]
impl PriceSource for BinanceTickerPrices {
    fn name(&self) -> &str {
        "binance"
    }

    async fn quote(&self, asset: &str) -> Result<AssetQuote> {
        if asset.is_empty() {
            return Err(ExchangeError::PriceUnavailable {
                asset: asset.to_string(),
                reason: "no asset symbol".to_string(),
            });
        }
        if asset == QUOTE_ASSET {
            return Ok(AssetQuote { name: None, price: Amount::ONE });
        }

        let ticker = self.client.ticker_price(&format!("{asset}{QUOTE_ASSET}")).await?;
        let price = Amount::parse(&ticker.price).map_err(|source| ExchangeError::InvalidNumber {
            kind: "ticker_price".to_string(),
            field: "price",
            source,
        })?;

        Ok(AssetQuote { name: None, price })
    }
}
