//! KuCoin account fetchers (single shot, no date paging)

use crate::auth::Credentials;
use crate::client::{ClientConfig, RestClient};
use crate::errors::{ExchangeError, Result};
use crate::kucoin::auth::KucoinSigner;
use crate::kucoin::types::{Accounts, DepositHistory, Envelope, SUCCESS_CODE, WithdrawHistory};
use serde::de::DeserializeOwned;
use tracing::info;
use tracklet_core::config::{ExchangeSettings, GeneralSettings};

pub const API_BASE_URL: &str = "https://api.kucoin.com";

pub mod endpoints {
    pub const ACCOUNTS: &str = "/api/v1/accounts";
    pub const DEPOSIT_HISTORY: &str = "/api/v1/deposits";
    pub const WITHDRAW_HISTORY: &str = "/api/v1/withdrawals";
}

pub struct KucoinRestClient {
    client: RestClient,
}

impl KucoinRestClient {
    /// Signed client; needs key, secret and passphrase.
    pub fn new(general: &GeneralSettings, settings: &ExchangeSettings) -> Result<Self> {
        let credentials = Credentials::from_settings("kucoin", settings)?;
        let signer = KucoinSigner::new(credentials)?;
        let config = ClientConfig::from_settings(general, &settings.api_base_url);

        info!("Initializing KuCoin client...");
        Ok(Self::from_client(RestClient::new(config, Box::new(signer))?))
    }

    pub fn from_client(client: RestClient) -> Self {
        Self { client }
    }

    /// Fetch and unwrap the `{code, data}` envelope.
    async fn fetch_data<T: DeserializeOwned>(&self, kind: &str, endpoint: &str) -> Result<T> {
        let envelope: Envelope<T> = self.client.fetch_json(kind, endpoint, &[]).await?;

        if envelope.code != SUCCESS_CODE {
            return Err(ExchangeError::ApiError {
                code: envelope.code,
                message: envelope.msg.unwrap_or_default(),
            });
        }

        envelope
            .data
            .ok_or_else(|| ExchangeError::decode(kind, "response has no data"))
    }

    pub async fn accounts(&self) -> Result<Accounts> {
        self.fetch_data("kucoin_accounts", endpoints::ACCOUNTS).await
    }

    pub async fn deposit_history(&self) -> Result<DepositHistory> {
        self.fetch_data("kucoin_deposit_history", endpoints::DEPOSIT_HISTORY)
            .await
    }

    pub async fn withdraw_history(&self) -> Result<WithdrawHistory> {
        self.fetch_data("kucoin_withdraw_history", endpoints::WITHDRAW_HISTORY)
            .await
    }
}
