//! Binance request signing
//!
//! Signed endpoints take `timestamp` and `signature` query parameters. The
//! signature is the hex HMAC-SHA256 of the key-sorted, URL-encoded query and
//! must be the last parameter on the wire.

use crate::auth::{Credentials, sign_hex};
use crate::errors::Result;
use crate::traits::RequestSigner;
use crate::types::PreparedRequest;
use tracklet_core::now_millis;

use tracing::trace;

pub const API_KEY_HEADER: &str = "X-MBX-APIKEY";

/// Validity window Binance grants a signed request, in milliseconds
pub const DEFAULT_RECV_WINDOW: u64 = 5000;

/// Binance request signer
pub struct BinanceSigner {
    credentials: Credentials,
    recv_window: u64,
    clock: fn() -> i64,
}

impl BinanceSigner {
    pub fn new(credentials: Credentials) -> Self {
        Self {
            credentials,
            recv_window: DEFAULT_RECV_WINDOW,
            clock: now_millis,
        }
    }

    pub fn with_recv_window(mut self, recv_window: u64) -> Self {
        self.recv_window = recv_window;
        self
    }

    /// Replace the wall clock used for `timestamp`
    pub fn with_clock(mut self, clock: fn() -> i64) -> Self {
        self.clock = clock;
        self
    }
}

impl RequestSigner for BinanceSigner {
    fn name(&self) -> &str {
        "binance"
    }

    fn authenticate(&self, request: &mut PreparedRequest) -> Result<()> {
        request.set_header(API_KEY_HEADER, self.credentials.api_key.clone());

        // Parameterless calls are key-only (USER_STREAM / MARKET_DATA security)
        if request.params.is_empty() {
            return Ok(());
        }

        request.push_param("recvWindow", self.recv_window.to_string());
        request.push_param("timestamp", (self.clock)().to_string());
        request.params.sort_by(|a, b| a.0.cmp(&b.0));

        let signature = sign_hex(&self.credentials.secret_key, &request.query_string())?;
        request.push_param("signature", signature);

        trace!(path = %request.path, "signed binance request");
        Ok(())
    }
}
