//! Tracklet configuration
//!
//! Loaded once at startup from `tracklet.toml` and passed by reference into every
//! client. Credentials may also come from the environment (or a `.env` file),
//! which take precedence over the file.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// File name searched for in the config directories
pub const CONFIG_FILE_NAME: &str = "tracklet.toml";

/// Configuration errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("could not find tracklet.toml (searched: {searched})")]
    NotFound { searched: String },

    #[error("could not read config file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("could not determine the user home directory")]
    NoHomeDir,
}

/// Top-level configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TrackletConfig {
    pub tracklet: GeneralSettings,
    pub exchanges: ExchangesSettings,
    pub aggregators: AggregatorsSettings,
}

/// Settings shared by every exchange session
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralSettings {
    /// Look-back window for history endpoints, in days
    pub max_history: u32,
    /// HTTP timeout, in seconds
    pub timeout: u64,
    /// Delay between retries, in seconds
    pub retry_delay: u64,
    pub max_retries: u32,
    /// Where fetched collections are written; defaults to `~/.tracklet/data`
    pub data_dir: Option<PathBuf>,
}

impl Default for GeneralSettings {
    fn default() -> Self {
        Self {
            max_history: 365,
            timeout: 30,
            retry_delay: 5,
            max_retries: 10,
            data_dir: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExchangesSettings {
    pub binance: ExchangeSettings,
    pub kucoin: ExchangeSettings,
}

impl Default for ExchangesSettings {
    fn default() -> Self {
        Self {
            binance: ExchangeSettings::with_base_url("https://api.binance.com"),
            kucoin: ExchangeSettings::with_base_url("https://api.kucoin.com"),
        }
    }
}

/// Per-exchange endpoint and credentials
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ExchangeSettings {
    pub api_base_url: String,
    pub api_key: String,
    pub secret_key: String,
    pub passphrase: Option<String>,
    /// Restrict trade-history fetches to these symbols; empty means all
    pub include_pairs: Vec<String>,
}

impl ExchangeSettings {
    pub fn with_base_url(url: &str) -> Self {
        Self {
            api_base_url: url.to_string(),
            ..Default::default()
        }
    }

    pub fn has_credentials(&self) -> bool {
        !self.api_key.is_empty() && !self.secret_key.is_empty()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AggregatorsSettings {
    pub coingecko: AggregatorSettings,
}

impl Default for AggregatorsSettings {
    fn default() -> Self {
        Self {
            coingecko: AggregatorSettings {
                api_base_url: "https://api.coingecko.com".to_string(),
            },
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AggregatorSettings {
    pub api_base_url: String,
}

impl TrackletConfig {
    /// Load from an explicit path, or search `./config` then `~/.tracklet`.
    pub fn load(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        dotenv::dotenv().ok();

        let path = match explicit {
            Some(path) => path.to_path_buf(),
            None => Self::locate()?,
        };

        let mut config = Self::from_file(&path)?;
        config.apply_env();
        tracing::info!("📝 Loaded configuration from {}", path.display());
        Ok(config)
    }

    /// Parse a TOML file without consulting the environment.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&raw).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn from_toml_str(raw: &str) -> Result<Self, toml::de::Error> {
        let mut config: Self = toml::from_str(raw)?;
        config.fill_default_urls();
        Ok(config)
    }

    /// A table such as `[exchanges.binance]` that omits `api_base_url` deserializes
    /// it as empty; put the well-known endpoint back.
    fn fill_default_urls(&mut self) {
        let defaults = Self::default();
        let fill = |target: &mut String, default: &str| {
            if target.trim().is_empty() {
                *target = default.to_string();
            }
        };

        fill(
            &mut self.exchanges.binance.api_base_url,
            &defaults.exchanges.binance.api_base_url,
        );
        fill(
            &mut self.exchanges.kucoin.api_base_url,
            &defaults.exchanges.kucoin.api_base_url,
        );
        fill(
            &mut self.aggregators.coingecko.api_base_url,
            &defaults.aggregators.coingecko.api_base_url,
        );
    }

    /// Candidate locations, in search order
    pub fn search_paths() -> Vec<PathBuf> {
        let mut paths = vec![PathBuf::from("config").join(CONFIG_FILE_NAME)];
        if let Some(home) = dirs::home_dir() {
            paths.push(home.join(".tracklet").join(CONFIG_FILE_NAME));
        }
        paths
    }

    fn locate() -> Result<PathBuf, ConfigError> {
        let candidates = Self::search_paths();
        candidates
            .iter()
            .find(|path| path.is_file())
            .cloned()
            .ok_or_else(|| ConfigError::NotFound {
                searched: candidates
                    .iter()
                    .map(|p| p.display().to_string())
                    .collect::<Vec<_>>()
                    .join(", "),
            })
    }

    /// Override credentials from `BINANCE_*` / `KUCOIN_*` environment variables.
    pub fn apply_env(&mut self) {
        self.apply_env_with(|key| std::env::var(key).ok());
    }

    fn apply_env_with(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        let set = |target: &mut String, key: &str| {
            if let Some(value) = lookup(key).filter(|v| !v.is_empty()) {
                *target = value;
            }
        };

        set(&mut self.exchanges.binance.api_key, "BINANCE_API_KEY");
        set(&mut self.exchanges.binance.secret_key, "BINANCE_SECRET_KEY");
        set(&mut self.exchanges.kucoin.api_key, "KUCOIN_API_KEY");
        set(&mut self.exchanges.kucoin.secret_key, "KUCOIN_SECRET_KEY");

        if let Some(passphrase) = lookup("KUCOIN_PASSPHRASE").filter(|v| !v.is_empty()) {
            self.exchanges.kucoin.passphrase = Some(passphrase);
        }
    }

    /// Resolved data directory (`data_dir` or `~/.tracklet/data`)
    pub fn data_dir(&self) -> Result<PathBuf, ConfigError> {
        match &self.tracklet.data_dir {
            Some(dir) => Ok(dir.clone()),
            None => dirs::home_dir()
                .map(|home| home.join(".tracklet").join("data"))
                .ok_or(ConfigError::NoHomeDir),
        }
    }
}
