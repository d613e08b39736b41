//! On-disk snapshots of fetched collections
//!
//! Each data kind is one indented JSON file named after it. The wallet reads the
//! same files back, so a fetch run and a wallet run only share this directory.

use serde::Serialize;
use serde::de::DeserializeOwned;
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::info;

/// Storage errors
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("could not create data directory {path}: {source}")]
    CreateDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("could not write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("could not read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("could not encode '{kind}': {source}")]
    Encode {
        kind: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("could not decode {path}: {source}")]
    Decode {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// File stems for every persisted collection
pub mod kinds {
    pub const TRADING_PAIRS: &str = "trading_pairs";
    pub const FIAT_PAYMENTS: &str = "fiat_payments";
    pub const TRADING_HISTORY: &str = "trading_history";
    pub const DUST_CONVERSION: &str = "dust_conversion";
    pub const DIVIDEND_HISTORY: &str = "dividend_history";
    pub const DEPOSIT_HISTORY: &str = "deposit_history";
    pub const WITHDRAW_HISTORY: &str = "withdraw_history";
    pub const BINANCE_WALLET: &str = "binance_wallet";
    pub const KUCOIN_ACCOUNTS: &str = "kucoin_accounts";
    pub const KUCOIN_DEPOSIT_HISTORY: &str = "kucoin_deposit_history";
    pub const KUCOIN_WITHDRAW_HISTORY: &str = "kucoin_withdraw_history";
}

/// Directory of `<kind>.json` snapshots
#[derive(Debug, Clone)]
pub struct DataStore {
    root: PathBuf,
}

impl DataStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Path of the snapshot for `kind`
    pub fn path_for(&self, kind: &str) -> PathBuf {
        self.root.join(format!("{kind}.json"))
    }

    pub fn exists(&self, kind: &str) -> bool {
        self.path_for(kind).is_file()
    }

    /// Write `value` as indented JSON, readable by the owning user only.
    pub fn write<T: Serialize + ?Sized>(&self, kind: &str, value: &T) -> Result<PathBuf, StoreError> {
        let path = self.path_for(kind);
        self.write_file(kind, &path, value)?;

        info!("💾 Saved '{}' to {}", kind, path.display());
        Ok(path)
    }

    /// Start a group of writes that replace their snapshots together.
    pub fn batch(&self) -> WriteBatch<'_> {
        WriteBatch {
            store: self,
            staged: Vec::new(),
        }
    }

    fn staging_path_for(&self, kind: &str) -> PathBuf {
        self.root.join(format!(".{kind}.json.tmp"))
    }

    fn write_file<T: Serialize + ?Sized>(&self, kind: &str, path: &Path, value: &T) -> Result<(), StoreError> {
        fs::create_dir_all(&self.root).map_err(|source| StoreError::CreateDir {
            path: self.root.clone(),
            source,
        })?;

        let data = serde_json::to_vec_pretty(value).map_err(|source| StoreError::Encode {
            kind: kind.to_string(),
            source,
        })?;

        let write_err = |source| StoreError::Write {
            path: path.to_path_buf(),
            source,
        };

        let mut file = owner_only(OpenOptions::new().write(true).create(true).truncate(true))
            .open(path)
            .map_err(write_err)?;
        file.write_all(&data).map_err(write_err)?;
        file.sync_all().map_err(write_err)
    }

    /// Read back a snapshot written by [`DataStore::write`].
    pub fn read<T: DeserializeOwned>(&self, kind: &str) -> Result<T, StoreError> {
        let path = self.path_for(kind);
        let data = fs::read(&path).map_err(|source| StoreError::Read {
            path: path.clone(),
            source,
        })?;

        serde_json::from_slice(&data).map_err(|source| StoreError::Decode { path, source })
    }
}

/// Snapshots staged next to their targets, renamed into place on commit.
///
/// Dropping an uncommitted batch removes its staged files and leaves the
/// existing snapshots untouched.
#[derive(Debug)]
pub struct WriteBatch<'a> {
    store: &'a DataStore,
    staged: Vec<(String, PathBuf)>,
}

impl WriteBatch<'_> {
    pub fn stage<T: Serialize + ?Sized>(&mut self, kind: &str, value: &T) -> Result<&mut Self, StoreError> {
        let temp = self.store.staging_path_for(kind);
        // Tracked before writing so a partial file is cleaned up too.
        self.staged.push((kind.to_string(), temp.clone()));
        self.store.write_file(kind, &temp, value)?;
        Ok(self)
    }

    /// Move every staged snapshot into place.
    pub fn commit(mut self) -> Result<Vec<PathBuf>, StoreError> {
        let mut saved = Vec::with_capacity(self.staged.len());
        while !self.staged.is_empty() {
            let (kind, temp) = self.staged.remove(0);
            let path = self.store.path_for(&kind);
            if let Err(source) = fs::rename(&temp, &path) {
                let _ = fs::remove_file(&temp);
                return Err(StoreError::Write { path, source });
            }
            info!("💾 Saved '{}' to {}", kind, path.display());
            saved.push(path);
        }
        Ok(saved)
    }
}

impl Drop for WriteBatch<'_> {
    fn drop(&mut self) {
        for (_, temp) in self.staged.drain(..) {
            let _ = fs::remove_file(temp);
        }
    }
}

#[cfg(unix)]
fn owner_only(options: &mut OpenOptions) -> &mut OpenOptions {
    use std::os::unix::fs::OpenOptionsExt;
    options.mode(0o600)
}

#[cfg(not(unix))]
fn owner_only(options: &mut OpenOptions) -> &mut OpenOptions {
    options
}
