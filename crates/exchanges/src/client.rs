//! Shared retrying REST client
//!
//! Every exchange routes its calls through [`RestClient`]. The client owns the
//! retry policy; the per-exchange [`RequestSigner`] only decides what gets
//! signed and which headers carry it.

use crate::errors::{ExchangeError, Result};
use crate::http::MonoioHttpsClient;
use crate::traits::{HttpTransport, RequestSigner};
use crate::types::PreparedRequest;

use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::{debug, warn};
use tracklet_core::config::GeneralSettings;
use url::Url;

/// Connection and retry parameters for one exchange
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    pub base_url: String,
    pub timeout: Duration,
    pub retry_delay: Duration,
    /// Retries after the first attempt; `10` allows up to 11 calls.
    pub max_retries: u32,
    pub max_history_days: u32,
}

impl ClientConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        let defaults = GeneralSettings::default();
        Self::from_settings(&defaults, base_url)
    }

    pub fn from_settings(settings: &GeneralSettings, base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            timeout: Duration::from_secs(settings.timeout),
            retry_delay: Duration::from_secs(settings.retry_delay),
            max_retries: settings.max_retries,
            max_history_days: settings.max_history,
        }
    }

    pub fn with_retries(mut self, max_retries: u32, retry_delay: Duration) -> Self {
        self.max_retries = max_retries;
        self.retry_delay = retry_delay;
        self
    }

    pub fn with_max_history(mut self, days: u32) -> Self {
        self.max_history_days = days;
        self
    }
}

/// Signed, retrying GET client bound to one base URL
pub struct RestClient {
    config: ClientConfig,
    base_url: Url,
    signer: Box<dyn RequestSigner>,
    transport: Box<dyn HttpTransport>,
}

impl RestClient {
    /// Client over the monoio HTTPS transport
    pub fn new(config: ClientConfig, signer: Box<dyn RequestSigner>) -> Result<Self> {
        Self::with_transport(config, signer, Box::new(MonoioHttpsClient::new()))
    }

    pub fn with_transport(
        config: ClientConfig,
        signer: Box<dyn RequestSigner>,
        transport: Box<dyn HttpTransport>,
    ) -> Result<Self> {
        let base_url = Url::parse(&config.base_url)?;

        Ok(Self {
            config,
            base_url,
            signer,
            transport,
        })
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Signed GET; returns the raw body of the first successful attempt.
    pub async fn fetch(&self, endpoint: &str, params: &[(&str, &str)]) -> Result<Vec<u8>> {
        self.execute(endpoint, params, true).await
    }

    /// Unsigned GET through the same retry path.
    pub async fn fetch_public(&self, endpoint: &str, params: &[(&str, &str)]) -> Result<Vec<u8>> {
        self.execute(endpoint, params, false).await
    }

    /// Signed GET decoded as `T`. Decode failures are not retried.
    pub async fn fetch_json<T: DeserializeOwned>(
        &self,
        kind: &str,
        endpoint: &str,
        params: &[(&str, &str)],
    ) -> Result<T> {
        let body = self.fetch(endpoint, params).await?;
        decode_json(kind, &body)
    }

    /// Unsigned GET decoded as `T`.
    pub async fn fetch_public_json<T: DeserializeOwned>(
        &self,
        kind: &str,
        endpoint: &str,
        params: &[(&str, &str)],
    ) -> Result<T> {
        let body = self.fetch_public(endpoint, params).await?;
        decode_json(kind, &body)
    }

    async fn execute(&self, endpoint: &str, params: &[(&str, &str)], signed: bool) -> Result<Vec<u8>> {
        let max_retries = self.config.max_retries;
        let mut retries = 0;

        loop {
            // Rebuilt per attempt so timestamps and signatures are fresh.
            let mut request = PreparedRequest::get(endpoint, params);
            if signed {
                self.signer.authenticate(&mut request)?;
            }
            let url = request.url(&self.base_url)?;

            debug!(
                exchange = self.signer.name(),
                endpoint,
                attempt = retries + 1,
                "GET"
            );

            let outcome = match self
                .transport
                .get(&url, &request.headers, self.config.timeout)
                .await
            {
                Ok(response) => response.into_body(),
                Err(err) => Err(err),
            };

            let err = match outcome {
                Ok(body) => return Ok(body),
                Err(err) if err.is_transient() => err,
                Err(err) => return Err(ExchangeError::request_failed(endpoint, err)),
            };

            if retries >= max_retries {
                return Err(ExchangeError::request_failed(endpoint, err));
            }
            retries += 1;

            warn!(
                exchange = self.signer.name(),
                endpoint,
                attempt = retries,
                max = max_retries,
                error = %err,
                "Retrying... [{retries}/{max_retries}]"
            );

            if !self.config.retry_delay.is_zero() {
                monoio::time::sleep(self.config.retry_delay).await;
            }
        }
    }
}

/// Decode a response body, tagging failures with the data kind.
pub fn decode_json<T: DeserializeOwned>(kind: &str, body: &[u8]) -> Result<T> {
    serde_json::from_slice(body).map_err(|e| ExchangeError::decode(kind, e))
}
