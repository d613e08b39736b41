//! KuCoin request signing (API key version 2)
//!
//! The signature is the base64 HMAC-SHA256 of `timestamp + method + path`,
//! where path includes the query string when there is one. The passphrase is
//! signed with the same secret.

use crate::auth::{Credentials, sign_base64};
use crate::errors::{ExchangeError, Result};
use crate::traits::RequestSigner;
use crate::types::PreparedRequest;
use tracklet_core::now_millis;

pub const KEY_VERSION: &str = "2";

pub struct KucoinSigner {
    credentials: Credentials,
    clock: fn() -> i64,
}

impl KucoinSigner {
    /// Fails when the passphrase is missing.
    pub fn new(credentials: Credentials) -> Result<Self> {
        if credentials.passphrase.is_none() {
            return Err(ExchangeError::MissingCredentials("kucoin passphrase".to_string()));
        }
        Ok(Self {
            credentials,
            clock: now_millis,
        })
    }

    pub fn with_clock(mut self, clock: fn() -> i64) -> Self {
        self.clock = clock;
        self
    }

    /// Prehash string for one request at `timestamp`
    pub fn prehash(timestamp: i64, request: &PreparedRequest) -> String {
        format!("{timestamp}{}{}", request.method, request.request_path())
    }
}

impl RequestSigner for KucoinSigner {
    fn name(&self) -> &str {
        "kucoin"
    }

    fn authenticate(&self, request: &mut PreparedRequest) -> Result<()> {
        let timestamp = (self.clock)();
        let secret = &self.credentials.secret_key;

        let signature = sign_base64(secret, &Self::prehash(timestamp, request))?;
        let passphrase = sign_base64(secret, self.credentials.passphrase.as_deref().unwrap_or_default())?;

        request.set_header("KC-API-KEY", self.credentials.api_key.clone());
        request.set_header("KC-API-SIGN", signature);
        request.set_header("KC-API-TIMESTAMP", timestamp.to_string());
        request.set_header("KC-API-PASSPHRASE", passphrase);
        request.set_header("KC-API-KEY-VERSION", KEY_VERSION);
        Ok(())
    }
}
