//! KuCoin account integration

pub mod auth;
pub mod rest;
pub mod types;

use crate::show;
use crate::errors::Result;
use serde::Serialize;
use tracing::info;
use std::path::PathBuf;
use tracklet_core::{DataStore, kinds, log_error};

pub use auth::KucoinSigner;
pub use rest::KucoinRestClient;
pub use types::{Account, Accounts, DepositHistory, Page, Transfer, WithdrawHistory};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct KucoinData {
    pub accounts: Accounts,
    pub deposit_history: DepositHistory,
    pub withdraw_history: WithdrawHistory,
}

pub struct KucoinProcessor {
    client: KucoinRestClient,
    store: DataStore,
}

impl KucoinProcessor {
    pub fn new(client: KucoinRestClient, store: DataStore) -> Self {
        Self { client, store }
    }

    /// Fetch accounts, deposits and withdrawals, then persist all three.
    pub async fn process(&self, verbose: bool) -> Result<KucoinData> {
        info!("Starting process KuCoin data...");
        let data = self
            .fetch_all(verbose)
            .await
            .inspect_err(|e| { log_error!("KuCoin fetch", e); })?;
        self.save(&data)
            .inspect_err(|e| { log_error!("KuCoin save", e); })?;
        Ok(data)
    }

    async fn fetch_all(&self, verbose: bool) -> Result<KucoinData> {
        info!("Fetching accounts data...");
        let accounts = self.client.accounts().await?;
        show(verbose, &accounts)?;

        info!("Fetching deposit history data...");
        let deposit_history = self.client.deposit_history().await?;
        show(verbose, &deposit_history)?;

        info!("Fetching withdraw history data...");
        let withdraw_history = self.client.withdraw_history().await?;
        show(verbose, &withdraw_history)?;

        Ok(KucoinData {
            accounts,
            deposit_history,
            withdraw_history,
        })
    }

    /// Replace all three snapshots together.
    pub fn save(&self, data: &KucoinData) -> Result<Vec<PathBuf>> {
        let mut batch = self.store.batch();
        batch
            .stage(kinds::KUCOIN_ACCOUNTS, &data.accounts)?
            .stage(kinds::KUCOIN_DEPOSIT_HISTORY, &data.deposit_history)?
            .stage(kinds::KUCOIN_WITHDRAW_HISTORY, &data.withdraw_history)?;
        Ok(batch.commit()?)
    }
}
