//! Seams between the shared client and its per-exchange strategies
//!
//! All futures run on a single monoio thread, so the async traits opt out of
//! `Send`.

use crate::errors::Result;
use crate::types::{AssetQuote, HttpResponse, PreparedRequest};
use async_trait::async_trait;
use std::rc::Rc;
use std::time::Duration;

/// Issues one HTTP GET. Implementations do not retry.
#[async_trait(?Send)]
pub trait HttpTransport {
    async fn get(
        &self,
        url: &str,
        headers: &[(String, String)],
        timeout: Duration,
    ) -> Result<HttpResponse>;
}

#[async_trait(?Send)]
impl<T: HttpTransport + ?Sized> HttpTransport for Rc<T> {
    async fn get(
        &self,
        url: &str,
        headers: &[(String, String)],
        timeout: Duration,
    ) -> Result<HttpResponse> {
        (**self).get(url, headers, timeout).await
    }
}

/// Exchange-specific request authentication.
///
/// Called once per attempt, after every other parameter is final, so each retry
/// carries a fresh timestamp.
pub trait RequestSigner {
    /// Exchange name for log lines
    fn name(&self) -> &str;

    fn authenticate(&self, request: &mut PreparedRequest) -> Result<()>;
}

/// Current unit price (and display name) of an asset.
///
/// Owns its own retry policy; the wallet treats any error as "value unknown".
#[async_trait(?Send)]
pub trait PriceSource {
    fn name(&self) -> &str;

    async fn quote(&self, asset: &str) -> Result<AssetQuote>;
}
