//! KuCoin account records

use serde::{Deserialize, Serialize};

/// Code KuCoin puts in the envelope of every successful response
pub const SUCCESS_CODE: &str = "200000";

/// `{code, data}` wrapper around every KuCoin payload
#[derive(Debug, Clone, Deserialize)]
pub struct Envelope<T> {
    pub code: String,
    #[serde(default)]
    pub msg: Option<String>,
    pub data: Option<T>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Account {
    pub id: String,
    pub currency: String,
    /// `main`, `trade` or `margin`
    #[serde(rename = "type")]
    pub account_type: String,
    pub balance: String,
    pub available: String,
    pub holds: String,
}

pub type Accounts = Vec<Account>;

/// Paginated list as returned by the deposit and withdrawal endpoints
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    #[serde(default)]
    pub current_page: u32,
    #[serde(default)]
    pub page_size: u32,
    #[serde(default)]
    pub total_num: u32,
    #[serde(default)]
    pub total_page: u32,
    #[serde(default = "Vec::new")]
    pub items: Vec<T>,
}

impl<T> Default for Page<T> {
    fn default() -> Self {
        Self {
            current_page: 0,
            page_size: 0,
            total_num: 0,
            total_page: 0,
            items: Vec::new(),
        }
    }
}

/// A deposit or a withdrawal; both endpoints share the shape.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transfer {
    #[serde(default)]
    pub address: String,
    pub amount: String,
    #[serde(default)]
    pub fee: String,
    pub currency: String,
    #[serde(default)]
    pub is_inner: bool,
    pub status: String,
    pub created_at: i64,
}

pub type DepositHistory = Page<Transfer>;
pub type WithdrawHistory = Page<Transfer>;
