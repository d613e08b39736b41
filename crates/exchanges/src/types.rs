//! Common request/response types shared by every exchange client

use crate::errors::{ExchangeError, Result};
use serde::{Deserialize, Serialize};
use tracklet_core::Amount;
use url::Url;

/// A GET request being assembled: path, ordered query parameters and headers.
///
/// Signers mutate it in place right before each attempt, so the query that is
/// signed is byte-for-byte the query that is sent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreparedRequest {
    pub method: &'static str,
    pub path: String,
    pub params: Vec<(String, String)>,
    pub headers: Vec<(String, String)>,
}

impl PreparedRequest {
    pub fn get(path: &str, params: &[(&str, &str)]) -> Self {
        Self {
            method: "GET",
            path: path.to_string(),
            params: params
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
            headers: Vec::new(),
        }
    }

    pub fn push_param(&mut self, key: &str, value: impl Into<String>) {
        self.params.push((key.to_string(), value.into()));
    }

    pub fn set_header(&mut self, key: &str, value: impl Into<String>) {
        let value = value.into();
        match self.headers.iter_mut().find(|(k, _)| k.eq_ignore_ascii_case(key)) {
            Some(existing) => existing.1 = value,
            None => self.headers.push((key.to_string(), value)),
        }
    }

    pub fn header(&self, key: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(key))
            .map(|(_, v)| v.as_str())
    }

    pub fn param(&self, key: &str) -> Option<&str> {
        self.params
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// URL-encoded query string in parameter order
    pub fn query_string(&self) -> String {
        self.params
            .iter()
            .map(|(k, v)| format!("{}={}", urlencoding::encode(k), urlencoding::encode(v)))
            .collect::<Vec<_>>()
            .join("&")
    }

    /// Path plus `?query` when there are parameters
    pub fn request_path(&self) -> String {
        let query = self.query_string();
        if query.is_empty() {
            self.path.clone()
        } else {
            format!("{}?{}", self.path, query)
        }
    }

    /// Full URL against `base_url`, keeping the query exactly as signed.
    pub fn url(&self, base_url: &Url) -> Result<String> {
        let url = format!(
            "{}{}",
            base_url.as_str().trim_end_matches('/'),
            self.request_path()
        );
        Url::parse(&url)?;
        Ok(url)
    }
}

/// HTTP response as read off the wire
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub headers: Vec<(String, String)>,
    pub body: Vec<u8>,
}

impl HttpResponse {
    pub fn new(status: u16, body: impl Into<Vec<u8>>) -> Self {
        Self {
            status,
            headers: Vec::new(),
            body: body.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    pub fn header(&self, key: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(key))
            .map(|(_, v)| v.as_str())
    }

    pub fn body_text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }

    /// Turn an unsuccessful status into the transient error the client retries.
    pub fn into_body(self) -> Result<Vec<u8>> {
        if self.is_success() {
            Ok(self.body)
        } else {
            let body = self.body_text();
            Err(ExchangeError::HttpError(self.status, body))
        }
    }
}

/// Display name and unit price (USD) of one asset
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssetQuote {
    pub name: Option<String>,
    pub price: Amount,
}
