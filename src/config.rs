//! Wallet construction parameters
//!
//! The owner list, confirmation threshold and daily limit a wallet is
//! created with, plus the optional initial deposit that funds it.

use crate::crypto::Address;
use crate::multisig::{MultiSigWallet, OwnerRegistry, WalletError};
use crate::units::{parse_ether, UnitsError};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use std::path::Path;
use thiserror::Error;

/// Configuration errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    IoError(#[from] io::Error),
    #[error("Parse error: {0}")]
    ParseError(#[from] serde_json::Error),
    #[error("Invalid amount: {0}")]
    UnitsError(#[from] UnitsError),
    #[error("Invalid wallet parameters: {0}")]
    WalletError(#[from] WalletError),
}

/// Parameters fixed at wallet construction
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct WalletConfig {
    /// Initial owners
    pub owners: Vec<Address>,
    /// Confirmations required
    pub required: usize,
    /// Daily limit in ether, e.g. "2"
    pub daily_limit: String,
    /// Account that funds the wallet after creation
    #[serde(default)]
    pub deployer: Option<Address>,
    /// Initial deposit in ether, e.g. "10"
    #[serde(default)]
    pub initial_deposit: Option<String>,
}

impl WalletConfig {
    /// Load a configuration from a JSON file
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path)?;
        let config: WalletConfig = serde_json::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Check the parameters without building a wallet
    pub fn validate(&self) -> Result<(), ConfigError> {
        OwnerRegistry::new(self.owners.clone(), self.required)?;
        self.daily_limit_wei()?;
        self.initial_deposit_wei()?;
        Ok(())
    }

    pub fn daily_limit_wei(&self) -> Result<u128, ConfigError> {
        Ok(parse_ether(&self.daily_limit)?)
    }

    pub fn initial_deposit_wei(&self) -> Result<Option<u128>, ConfigError> {
        match &self.initial_deposit {
            Some(amount) => Ok(Some(parse_ether(amount)?)),
            None => Ok(None),
        }
    }

    /// Create the wallet described by this configuration
    ///
    /// The initial deposit is not applied here; it needs an environment.
    pub fn build(&self, now: DateTime<Utc>) -> Result<MultiSigWallet, ConfigError> {
        Ok(MultiSigWallet::new(
            self.owners.clone(),
            self.required,
            self.daily_limit_wei()?,
            now,
        )?)
    }
}
