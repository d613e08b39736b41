//! Portfolio ledger rebuilt from persisted Binance history
//!
//! Every run starts from an empty wallet and folds, in order:
//! 1. completed fiat purchases
//! 2. trades, as a base leg and a quote leg
//! 3. optional valuation through a [`PriceSource`]
//! 4. aggregate stats
//!
//! Numeric parse failures in 1-2 abort the run. Valuation failures only leave
//! the affected holding unvalued.

use crate::binance::types::{FiatPayments, Trade, TradingPair, TradingPairs};
use crate::errors::{ExchangeError, Result};
use crate::traits::PriceSource;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use tracing::{error, info, warn};
use tracklet_core::{Amount, DataStore, kinds};

/// Per-asset position
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Holding {
    pub quantity: Amount,
    pub current_value: Amount,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Stats {
    pub total_invested: Amount,
    pub total_value: Amount,
    pub gain_value: Amount,
    pub total_assets: usize,
    /// `gain_value / total_invested * 100`; absent with nothing invested
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gain_percent: Option<Amount>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Wallet {
    pub holdings: BTreeMap<String, Holding>,
    pub stats: Stats,
}

impl Wallet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Quantity held of `asset`, zero when absent
    pub fn quantity(&self, asset: &str) -> Amount {
        self.holdings
            .get(asset)
            .map(|h| h.quantity)
            .unwrap_or(Amount::ZERO)
    }

    /// Read-modify-write of one holding's quantity.
    fn post(&mut self, asset: &str, delta: Amount) {
        let previous = self.quantity(asset);
        self.holdings.entry(asset.to_string()).or_default().quantity = previous + delta;
    }

    /// Credit completed fiat purchases; everything else is ignored.
    pub fn fold_fiat_payments(&mut self, payments: &FiatPayments) -> Result<()> {
        info!("Calculating fiat payments...");

        for payment in payments.data.iter().filter(|p| p.is_completed()) {
            let source = parse(&payment.source_amount, kinds::FIAT_PAYMENTS, "sourceAmount")?;
            let obtained = parse(&payment.obtain_amount, kinds::FIAT_PAYMENTS, "obtainAmount")?;

            self.stats.total_invested += source;
            self.post(&payment.crypto_currency, obtained);
        }

        Ok(())
    }

    /// Post each trade's base and quote legs.
    ///
    /// A symbol missing from `pairs` keeps whatever assets the trade record
    /// carries, normally none, so it posts to the `""` key.
    pub fn fold_trades(&mut self, trades: &[Trade], pairs: &TradingPairs) -> Result<()> {
        info!("Calculating trades...");

        let lookup: HashMap<&str, &TradingPair> = pairs
            .symbols
            .iter()
            .map(|pair| (pair.symbol.as_str(), pair))
            .collect();

        for trade in trades {
            let (base, quote) = match lookup.get(trade.symbol.as_str()) {
                Some(pair) => (pair.base_asset.as_str(), pair.quote_asset.as_str()),
                None => {
                    warn!(symbol = %trade.symbol, id = trade.id, "trade symbol not found in trading pairs");
                    (trade.base_asset.as_str(), trade.quote_asset.as_str())
                }
            };

            let qty = parse(&trade.qty, kinds::TRADING_HISTORY, "qty")?;
            let quote_qty = parse(&trade.quote_qty, kinds::TRADING_HISTORY, "quoteQty")?;

            if trade.is_buyer {
                self.post(base, qty);
                self.post(quote, -quote_qty);
            } else {
                self.post(base, -qty);
                self.post(quote, quote_qty);
            }
        }

        Ok(())
    }

    /// Value every non-zero holding at its current unit price.
    pub async fn value_holdings(&mut self, prices: &dyn PriceSource) {
        info!(source = prices.name(), "Calculating prices...");

        for (asset, holding) in self.holdings.iter_mut() {
            if holding.quantity.is_zero() {
                continue;
            }

            let quantity = holding.quantity;
            let valued = prices.quote(asset).await.and_then(|quote| {
                quantity
                    .checked_mul(quote.price)
                    .map(|value| (value, quote.name))
                    .ok_or_else(|| ExchangeError::PriceUnavailable {
                        asset: asset.clone(),
                        reason: format!("{quantity} x {} overflows", quote.price),
                    })
            });

            match valued {
                Ok((value, name)) => {
                    holding.current_value = value;
                    if name.is_some() {
                        holding.name = name;
                    }
                }
                Err(e) => error!(asset = %asset, error = %e, "Could not get price"),
            }
        }
    }

    /// Recompute aggregates from the holdings.
    pub fn compute_stats(&mut self) {
        info!("Calculating wallet stats...");

        self.stats.total_assets = self.holdings.len();
        self.stats.total_value = self.holdings.values().map(|h| h.current_value).sum();
        self.stats.gain_value = self.stats.total_value - self.stats.total_invested;
        self.stats.gain_percent = self.stats.gain_value.percent_of(self.stats.total_invested);
    }

    /// Fold already-loaded collections without valuation.
    pub fn from_history(payments: &FiatPayments, trades: &[Trade], pairs: &TradingPairs) -> Result<Self> {
        let mut wallet = Self::new();
        wallet.fold_fiat_payments(payments)?;
        wallet.fold_trades(trades, pairs)?;
        wallet.compute_stats();
        Ok(wallet)
    }

    /// Rebuild the wallet from the snapshots in `store`.
    pub async fn process(store: &DataStore, prices: Option<&dyn PriceSource>) -> Result<Self> {
        let payments: FiatPayments = store.read(kinds::FIAT_PAYMENTS)?;
        let trades: Vec<Trade> = store.read(kinds::TRADING_HISTORY)?;
        let pairs: TradingPairs = store.read(kinds::TRADING_PAIRS)?;

        let mut wallet = Self::new();
        wallet.fold_fiat_payments(&payments)?;
        wallet.fold_trades(&trades, &pairs)?;

        if let Some(prices) = prices {
            wallet.value_holdings(prices).await;
        }

        wallet.compute_stats();
        Ok(wallet)
    }
}

fn parse(raw: &str, kind: &str, field: &'static str) -> Result<Amount> {
    Amount::parse(raw).map_err(|source| ExchangeError::InvalidNumber {
        kind: kind.to_string(),
        field,
        source,
    })
}
