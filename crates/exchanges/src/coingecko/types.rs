//! CoinGecko response shapes

use serde::{Deserialize, Serialize};

/// Entry of `/api/v3/coins/list`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Coin {
    pub id: String,
    pub symbol: String,
    pub name: String,
}

pub type CoinList = Vec<Coin>;

/// `/api/v3/coins/{id}` with market data only
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CoinPrice {
    pub id: String,
    pub symbol: String,
    pub name: String,
    #[serde(default)]
    pub market_data: MarketData,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MarketData {
    #[serde(default)]
    pub current_price: CurrentPrice,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CurrentPrice {
    pub eur: Option<f64>,
    pub usd: Option<f64>,
}
