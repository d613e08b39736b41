//! CoinGecko price source
//!
//! Symbols are resolved to CoinGecko ids through the coin list, fetched once on
//! first use. Several coins can share a ticker symbol; the first listed wins.

use crate::auth::NoAuth;
use crate::client::{ClientConfig, RestClient};
use crate::coingecko::types::{CoinList, CoinPrice};
use crate::errors::{ExchangeError, Result};
use crate::traits::PriceSource;
use crate::types::AssetQuote;
use async_trait::async_trait;
use std::cell::RefCell;
use std::collections::HashMap;
use tracing::{debug, info};
use tracklet_core::Amount;
use tracklet_core::config::{AggregatorSettings, GeneralSettings};

pub const API_BASE_URL: &str = "https://api.coingecko.com";

pub mod endpoints {
    pub const COIN_LIST: &str = "/api/v3/coins/list";
    pub const COINS: &str = "/api/v3/coins";
}

const PRICE_PARAMS: &[(&str, &str)] = &[
    ("tickers", "false"),
    ("market_data", "true"),
    ("community_data", "false"),
    ("developer_data", "false"),
];

#[derive(Debug, Clone)]
struct CoinRef {
    id: String,
    name: String,
}

pub struct CoinGeckoPriceSource {
    client: RestClient,
    coins: RefCell<Option<HashMap<String, CoinRef>>>,
}

impl CoinGeckoPriceSource {
    pub fn new(general: &GeneralSettings, settings: &AggregatorSettings) -> Result<Self> {
        let config = ClientConfig::from_settings(general, &settings.api_base_url);
        Ok(Self::from_client(RestClient::new(config, Box::new(NoAuth))?))
    }

    pub fn from_client(client: RestClient) -> Self {
        Self {
            client,
            coins: RefCell::new(None),
        }
    }

    pub async fn coin_list(&self) -> Result<CoinList> {
        self.client
            .fetch_public_json("coin_list", endpoints::COIN_LIST, &[])
            .await
    }

    pub async fn coin_price(&self, id: &str) -> Result<CoinPrice> {
        let endpoint = format!("{}/{id}", endpoints::COINS);
        self.client
            .fetch_public_json("coin_price", &endpoint, PRICE_PARAMS)
            .await
    }

    async fn resolve(&self, asset: &str) -> Result<CoinRef> {
        if self.coins.borrow().is_none() {
            let list = self.coin_list().await?;
            info!(coins = list.len(), "loaded CoinGecko coin list");

            let mut by_symbol = HashMap::with_capacity(list.len());
            for coin in list {
                by_symbol
                    .entry(coin.symbol.to_lowercase())
                    .or_insert(CoinRef { id: coin.id, name: coin.name });
            }
            *self.coins.borrow_mut() = Some(by_symbol);
        }

        self.coins
            .borrow()
            .as_ref()
            .and_then(|coins| coins.get(&asset.to_lowercase()).cloned())
            .ok_or_else(|| ExchangeError::PriceUnavailable {
                asset: asset.to_string(),
                reason: "symbol not listed on CoinGecko".to_string(),
            })
    }
}

#[async_trait(?Send)]
impl PriceSource for CoinGeckoPriceSource {
    fn name(&self) -> &str {
        "coingecko"
    }

    async fn quote(&self, asset: &str) -> Result<AssetQuote> {
        let coin = self.resolve(asset).await?;
        debug!(asset, id = %coin.id, "resolved coin");

        let price = self.coin_price(&coin.id).await?;
        let usd = price
            .market_data
            .current_price
            .usd
            .ok_or_else(|| ExchangeError::PriceUnavailable {
                asset: asset.to_string(),
                reason: "no USD price".to_string(),
            })?;

        let price = Amount::from_f64(usd).map_err(|source| ExchangeError::InvalidNumber {
            kind: "coin_price".to_string(),
            field: "usd",
            source,
        })?;

        Ok(AssetQuote {
            name: Some(coin.name),
            price,
        })
    }
}
