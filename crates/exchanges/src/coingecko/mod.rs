//! CoinGecko market data, used to value wallet holdings

pub mod rest;
pub mod types;

pub use rest::CoinGeckoPriceSource;
pub use types::{Coin, CoinList, CoinPrice};
