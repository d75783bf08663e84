//! # Configuration
//!
//! Rentstore configuration is managed by [`confique`], layered in priority order:
//! 1. **Environment variables**: `RENTSTORE_CATALOG_FILE`, `RENTSTORE_LIMIT_PREMIUM`, etc.
//! 2. **Data directory config**: `<data dir>/rentstore.toml`, skipped when absent.
//! 3. **Compiled defaults**: via `#[config(default = ...)]`.
//!
//! ## Available Settings
//!
//! | Key | Default | Description |
//! |-----|---------|-------------|
//! | `catalog_file` | `Game_Info.txt` | Catalog table, relative to the data directory |
//! | `ledger_file` | `Rental.txt` | Ledger table |
//! | `feedback_file` | `feedback.json` | Customer ratings |
//! | `subscriptions_file` | `subscriptions.json` | Renter tiers |
//! | `limit_basic` | `1` | Simultaneous rentals for the basic tier |
//! | `limit_standard` | `3` | ... standard tier |
//! | `limit_premium` | `5` | ... premium tier |
//!
//! The data directory itself is resolved by [`resolve_data_dir`], not by this file.

use crate::collab::TierLimits;
use crate::error::{RentError, Result};
use confique::Config;
use directories::ProjectDirs;
use serde::Serialize;
use std::path::{Path, PathBuf};

pub const CONFIG_FILENAME: &str = "rentstore.toml";
pub const DATA_DIR_ENV: &str = "RENTSTORE_DATA_DIR";

/// Configuration for a store, read from `rentstore.toml`.
#[derive(Config, Serialize, Debug, Clone, PartialEq, Eq)]
pub struct StoreConfig {
    #[config(env = "RENTSTORE_CATALOG_FILE", default = "Game_Info.txt")]
    pub catalog_file: String,

    #[config(env = "RENTSTORE_LEDGER_FILE", default = "Rental.txt")]
    pub ledger_file: String,

    #[config(env = "RENTSTORE_FEEDBACK_FILE", default = "feedback.json")]
    pub feedback_file: String,

    #[config(env = "RENTSTORE_SUBSCRIPTIONS_FILE", default = "subscriptions.json")]
    pub subscriptions_file: String,

    #[config(env = "RENTSTORE_LIMIT_BASIC", default = 1)]
    pub limit_basic: u32,

    #[config(env = "RENTSTORE_LIMIT_STANDARD", default = 3)]
    pub limit_standard: u32,

    #[config(env = "RENTSTORE_LIMIT_PREMIUM", default = 5)]
    pub limit_premium: u32,
}

impl Default for StoreConfig {
    fn default() -> Self {
        let limits = TierLimits::default();
        Self {
            catalog_file: "Game_Info.txt".to_string(),
            ledger_file: "Rental.txt".to_string(),
            feedback_file: "feedback.json".to_string(),
            subscriptions_file: "subscriptions.json".to_string(),
            limit_basic: limits.basic,
            limit_standard: limits.standard,
            limit_premium: limits.premium,
        }
    }
}

impl StoreConfig {
    /// Load from the environment and `<data_dir>/rentstore.toml`.
    pub fn load(data_dir: &Path) -> Result<Self> {
        Self::builder()
            .env()
            .file(data_dir.join(CONFIG_FILENAME))
            .load()
            .map_err(|e| RentError::Config(e.to_string()))
    }

    pub fn tier_limits(&self) -> TierLimits {
        TierLimits {
            basic: self.limit_basic,
            standard: self.limit_standard,
            premium: self.limit_premium,
        }
    }

    pub fn feedback_path(&self, data_dir: &Path) -> PathBuf {
        data_dir.join(&self.feedback_file)
    }

    pub fn subscriptions_path(&self, data_dir: &Path) -> PathBuf {
        data_dir.join(&self.subscriptions_file)
    }
}

/// `explicit` if given, else `$RENTSTORE_DATA_DIR`, else the OS data directory.
pub fn resolve_data_dir(explicit: Option<PathBuf>) -> Result<PathBuf> {
    if let Some(dir) = explicit {
        return Ok(dir);
    }
    if let Some(dir) = std::env::var_os(DATA_DIR_ENV).filter(|v| !v.is_empty()) {
        return Ok(PathBuf::from(dir));
    }
    ProjectDirs::from("com", "rentstore", "rentstore")
        .map(|dirs| dirs.data_dir().to_path_buf())
        .ok_or_else(|| RentError::Config("could not determine a data directory".into()))
}
