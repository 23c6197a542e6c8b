//! Wallet state persistence
//!
//! Saves and loads the wallet together with its local account book as
//! JSON, with atomic writes and rotating backups.

use crate::chain::AccountBook;
use crate::multisig::MultiSigWallet;
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::{self, BufReader, BufWriter};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Storage errors
#[derive(Error, Debug)]
pub enum StorageError {
    #[error("IO error: {0}")]
    IoError(#[from] io::Error),
    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),
    #[error("Invalid data: {0}")]
    InvalidData(String),
}

/// Everything persisted between CLI invocations
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct WalletState {
    pub wallet: MultiSigWallet,
    pub accounts: AccountBook,
}

/// Storage configuration
#[derive(Debug, Clone)]
pub struct StorageConfig {
    pub data_dir: PathBuf,
    pub state_file: String,
    pub backup_enabled: bool,
    pub max_backups: usize,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from(".multisig_data"),
            state_file: "wallet.json".to_string(),
            backup_enabled: true,
            max_backups: 5,
        }
    }
}

/// Wallet state storage manager
pub struct Storage {
    config: StorageConfig,
}

impl Storage {
    /// Create a new storage manager
    pub fn new(config: StorageConfig) -> Result<Self, StorageError> {
        fs::create_dir_all(&config.data_dir)?;
        Ok(Self { config })
    }

    fn state_path(&self) -> PathBuf {
        self.config.data_dir.join(&self.config.state_file)
    }

    fn backup_path(&self, index: usize) -> PathBuf {
        self.config
            .data_dir
            .join(format!("{}.backup.{}", self.config.state_file, index))
    }

    /// Save the wallet state to disk
    pub fn save(&self, state: &WalletState) -> Result<(), StorageError> {
        let path = self.state_path();

        if self.config.backup_enabled && self.config.max_backups > 0 && path.exists() {
            self.rotate_backups()?;
            fs::copy(&path, self.backup_path(0))?;
        }

        // Write to temporary file first
        let temp_path = self.config.data_dir.join("wallet.tmp");
        let file = fs::File::create(&temp_path)?;
        let writer = BufWriter::new(file);

        serde_json::to_writer_pretty(writer, state)?;

        // Atomic rename
        fs::rename(&temp_path, &path)?;

        log::debug!("Wallet state saved to {:?}", path);
        Ok(())
    }

    /// Load the wallet state from disk
    pub fn load(&self) -> Result<WalletState, StorageError> {
        let path = self.state_path();

        if !path.exists() {
            return Err(StorageError::InvalidData(
                "Wallet state file not found".to_string(),
            ));
        }

        load_from_file(&path)
    }

    /// Check if a saved wallet exists
    pub fn exists(&self) -> bool {
        self.state_path().exists()
    }

    /// Delete the saved wallet
    pub fn delete(&self) -> Result<(), StorageError> {
        let path = self.state_path();
        if path.exists() {
            fs::remove_file(path)?;
        }
        Ok(())
    }

    fn rotate_backups(&self) -> Result<(), StorageError> {
        // Delete oldest backup
        let oldest = self.backup_path(self.config.max_backups - 1);
        if oldest.exists() {
            fs::remove_file(&oldest)?;
        }

        // Shift existing backups
        for i in (0..self.config.max_backups - 1).rev() {
            let current = self.backup_path(i);
            if current.exists() {
                fs::rename(&current, self.backup_path(i + 1))?;
            }
        }

        Ok(())
    }

    /// Restore from a backup
    pub fn restore_backup(&self, backup_index: usize) -> Result<WalletState, StorageError> {
        let backup_path = self.backup_path(backup_index);

        if !backup_path.exists() {
            return Err(StorageError::InvalidData(format!(
                "Backup {} not found",
                backup_index
            )));
        }

        load_from_file(&backup_path)
    }

    /// List available backups
    pub fn list_backups(&self) -> Vec<usize> {
        (0..self.config.max_backups)
            .filter(|i| self.backup_path(*i).exists())
            .collect()
    }

    /// Get storage statistics
    pub fn stats(&self) -> Result<StorageStats, StorageError> {
        let path = self.state_path();

        let file_size = if path.exists() {
            fs::metadata(&path)?.len()
        } else {
            0
        };

        Ok(StorageStats {
            file_size,
            backup_count: self.list_backups().len(),
            data_dir: self.config.data_dir.clone(),
        })
    }
}

/// Storage statistics
#[derive(Debug)]
pub struct StorageStats {
    pub file_size: u64,
    pub backup_count: usize,
    pub data_dir: PathBuf,
}

/// Save wallet state to a specific file path
pub fn save_to_file(state: &WalletState, path: &Path) -> Result<(), StorageError> {
    let file = fs::File::create(path)?;
    let writer = BufWriter::new(file);
    serde_json::to_writer_pretty(writer, state)?;
    Ok(())
}

/// Load wallet state from a specific file path
pub fn load_from_file(path: &Path) -> Result<WalletState, StorageError> {
    let file = fs::File::open(path)?;
    let reader = BufReader::new(file);
    Ok(serde_json::from_reader(reader)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::units::WEI_PER_ETHER;
    use chrono::Utc;

    fn sample_state() -> WalletState {
        let accounts = AccountBook::new();
        let owners = vec!["a".into(), "b".into()];
        let mut wallet = MultiSigWallet::new(owners, 2, WEI_PER_ETHER, Utc::now()).unwrap();
        wallet
            .deposit(&"deployer".into(), 3 * WEI_PER_ETHER, &accounts)
            .unwrap();
        WalletState { wallet, accounts }
    }

    fn temp_storage(temp_dir: &tempfile::TempDir) -> Storage {
        let config = StorageConfig {
            data_dir: temp_dir.path().to_path_buf(),
            ..Default::default()
        };
        Storage::new(config).unwrap()
    }

    #[test]
    fn test_save_load_state() {
        let temp_dir = tempfile::tempdir().unwrap();
        let storage = temp_storage(&temp_dir);
        let state = sample_state();

        assert!(!storage.exists());
        storage.save(&state).unwrap();
        assert!(storage.exists());

        let loaded = storage.load().unwrap();
        assert_eq!(loaded.wallet.address(), state.wallet.address());
        assert_eq!(loaded.wallet.balance(), 3 * WEI_PER_ETHER);
        assert_eq!(loaded.wallet.events(), state.wallet.events());
    }

    #[test]
    fn test_load_missing() {
        let temp_dir = tempfile::tempdir().unwrap();
        let storage = temp_storage(&temp_dir);
        assert!(matches!(storage.load(), Err(StorageError::InvalidData(_))));
    }

    #[test]
    fn test_backup_rotation() {
        let temp_dir = tempfile::tempdir().unwrap();
        let storage = temp_storage(&temp_dir);
        let mut state = sample_state();

        storage.save(&state).unwrap();
        assert!(storage.list_backups().is_empty());

        let accounts = AccountBook::new();
        state
            .wallet
            .deposit(&"deployer".into(), WEI_PER_ETHER, &accounts)
            .unwrap();
        storage.save(&state).unwrap();
        storage.save(&state).unwrap();

        assert_eq!(storage.list_backups(), vec![0, 1]);
        let restored = storage.restore_backup(1).unwrap();
        assert_eq!(restored.wallet.balance(), 3 * WEI_PER_ETHER);
        assert!(storage.restore_backup(4).is_err());

        let stats = storage.stats().unwrap();
        assert_eq!(stats.backup_count, 2);
        assert!(stats.file_size > 0);

        storage.delete().unwrap();
        assert!(!storage.exists());
    }

    #[test]
    fn test_export_import_file() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("export.json");
        let state = sample_state();

        save_to_file(&state, &path).unwrap();
        let loaded = load_from_file(&path).unwrap();
        assert_eq!(loaded.wallet.required(), 2);
    }
}
