//! Credentials and HMAC-SHA256 primitives shared by exchange signers

use crate::errors::{ExchangeError, Result};
use crate::traits::RequestSigner;
use crate::types::PreparedRequest;

use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64;
use hmac::{Hmac, Mac};
use sha2::Sha256;
use tracklet_core::config::ExchangeSettings;

type HmacSha256 = Hmac<Sha256>;

/// API credentials for one exchange
#[derive(Clone)]
pub struct Credentials {
    pub api_key: String,
    pub secret_key: String,
    pub passphrase: Option<String>,
}

impl Credentials {
    pub fn new(api_key: impl Into<String>, secret_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            secret_key: secret_key.into(),
            passphrase: None,
        }
    }

    pub fn with_passphrase(mut self, passphrase: impl Into<String>) -> Self {
        self.passphrase = Some(passphrase.into());
        self
    }

    /// Take credentials from configuration, failing if key or secret is empty.
    pub fn from_settings(exchange: &str, settings: &ExchangeSettings) -> Result<Self> {
        if settings.api_key.is_empty() {
            return Err(ExchangeError::MissingCredentials(format!("{exchange} api_key")));
        }
        if settings.secret_key.is_empty() {
            return Err(ExchangeError::MissingCredentials(format!("{exchange} secret_key")));
        }

        Ok(Self {
            api_key: settings.api_key.clone(),
            secret_key: settings.secret_key.clone(),
            passphrase: settings.passphrase.clone().filter(|p| !p.is_empty()),
        })
    }
}

// Keep secrets out of debug logs.
impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("api_key", &mask(&self.api_key))
            .field("secret_key", &"***")
            .field("passphrase", &self.passphrase.as_ref().map(|_| "***"))
            .finish()
    }
}

fn mask(key: &str) -> String {
    if key.chars().count() <= 8 {
        return "***".to_string();
    }
    let head: String = key.chars().take(4).collect();
    let mut tail: Vec<char> = key.chars().rev().take(4).collect();
    tail.reverse();
    format!("{head}...{}", tail.into_iter().collect::<String>())
}

fn hmac_sha256(secret: &str, message: &str) -> Result<Vec<u8>> {
    let mut mac = HmacSha256::new_from_slice(secret.as_bytes())
        .map_err(|e| ExchangeError::SigningError(format!("HMAC setup failed: {e}")))?;
    mac.update(message.as_bytes());
    Ok(mac.finalize().into_bytes().to_vec())
}

/// HMAC-SHA256 of `message`, hex encoded
pub fn sign_hex(secret: &str, message: &str) -> Result<String> {
    hmac_sha256(secret, message).map(hex::encode)
}

/// HMAC-SHA256 of `message`, base64 encoded
pub fn sign_base64(secret: &str, message: &str) -> Result<String> {
    hmac_sha256(secret, message).map(|digest| BASE64.encode(digest))
}

/// Signer for public APIs: leaves the request untouched.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoAuth;

impl RequestSigner for NoAuth {
    fn name(&self) -> &str {
        "public"
    }

    fn authenticate(&self, _request: &mut PreparedRequest) -> Result<()> {
        Ok(())
    }
}
