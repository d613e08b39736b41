//! Binance account-history records
//!
//! Decimal quantities stay as the strings Binance sends; they are parsed into
//! [`Amount`](tracklet_core::Amount) only when the ledger folds them, so a
//! malformed value fails the fold instead of the fetch.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

/// Collections that are fetched window by window and concatenated.
pub trait PageRecords: Default + DeserializeOwned {
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Append another page's records after ours.
    fn append(&mut self, page: Self);
}

impl<T: DeserializeOwned> PageRecords for Vec<T> {
    fn len(&self) -> usize {
        Vec::len(self)
    }

    fn append(&mut self, mut page: Self) {
        Vec::append(self, &mut page);
    }
}

/// `/api/v1/exchangeInfo`, reduced to the symbol table
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TradingPairs {
    #[serde(default)]
    pub symbols: Vec<TradingPair>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TradingPair {
    pub symbol: String,
    pub base_asset: String,
    pub quote_asset: String,
}

impl TradingPairs {
    /// Keep only the listed symbols; an empty list keeps everything.
    pub fn retain_symbols(&mut self, include: &[String]) {
        if include.is_empty() {
            return;
        }
        self.symbols
            .retain(|pair| include.iter().any(|s| s.eq_ignore_ascii_case(&pair.symbol)));
    }

    pub fn find(&self, symbol: &str) -> Option<&TradingPair> {
        self.symbols.iter().find(|pair| pair.symbol == symbol)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FiatPayments {
    #[serde(default)]
    pub data: Vec<FiatPayment>,
}

impl PageRecords for FiatPayments {
    fn len(&self) -> usize {
        self.data.len()
    }

    fn append(&mut self, mut page: Self) {
        self.data.append(&mut page.data);
    }
}

/// Status of a fiat purchase that actually settled
pub const FIAT_COMPLETED: &str = "Completed";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FiatPayment {
    pub order_no: String,
    pub source_amount: String,
    pub fiat_currency: String,
    pub obtain_amount: String,
    pub crypto_currency: String,
    pub total_fee: String,
    pub price: String,
    pub status: String,
    pub create_time: i64,
}

impl FiatPayment {
    pub fn is_completed(&self) -> bool {
        self.status == FIAT_COMPLETED
    }
}

/// One fill from `/api/v3/myTrades`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Trade {
    pub symbol: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub base_asset: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub quote_asset: String,
    pub id: i64,
    pub price: String,
    pub qty: String,
    pub quote_qty: String,
    pub commission: String,
    pub commission_asset: String,
    pub is_buyer: bool,
    pub time: i64,
}

pub type TradingHistory = Vec<Trade>;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DustConversion {
    #[serde(default)]
    pub user_asset_dribblets: Vec<Dribblet>,
}

impl PageRecords for DustConversion {
    fn len(&self) -> usize {
        self.user_asset_dribblets.len()
    }

    fn append(&mut self, mut page: Self) {
        self.user_asset_dribblets.append(&mut page.user_asset_dribblets);
    }
}

/// One dust sweep, converting several small balances into BNB
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Dribblet {
    pub operate_time: i64,
    pub total_transfered_amount: String,
    #[serde(default)]
    pub user_asset_dribblet_details: Vec<DribbletDetail>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DribbletDetail {
    pub from_asset: String,
    pub amount: String,
    pub transfered_amount: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DividendHistory {
    #[serde(default)]
    pub rows: Vec<Dividend>,
}

impl PageRecords for DividendHistory {
    fn len(&self) -> usize {
        self.rows.len()
    }

    fn append(&mut self, mut page: Self) {
        self.rows.append(&mut page.rows);
    }
}

/// Staking or airdrop distribution
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Dividend {
    pub amount: String,
    pub asset: String,
    pub div_time: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Deposit {
    pub amount: String,
    pub coin: String,
    pub insert_time: i64,
}

pub type DepositHistory = Vec<Deposit>;

/// Withdrawals report `applyTime` as a "YYYY-MM-DD HH:MM:SS" string.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Withdraw {
    pub amount: String,
    pub coin: String,
    pub apply_time: String,
}

pub type WithdrawHistory = Vec<Withdraw>;

/// `/api/v3/ticker/price` for one symbol
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TickerPrice {
    pub symbol: String,
    pub price: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServerTime {
    pub server_time: i64,
}
