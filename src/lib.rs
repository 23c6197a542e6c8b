//! Multisig Wallet: a multi-owner wallet with a daily spending limit
//!
//! This crate provides the authorization core of a shared wallet:
//! - Owner registry with an N-of-M confirmation threshold
//! - Transaction ledger with per-owner confirmations and revocations
//! - Daily spending limit that lets a single owner move small amounts
//! - Execution engine that commits state before any external call
//! - Governance (owners, threshold, limit) through the wallet's own transactions
//! - JSON persistence and a command-line interface
//!
//! # Example
//!
//! ```rust
//! use multisig_wallet::chain::AccountBook;
//! use multisig_wallet::crypto::Address;
//! use multisig_wallet::multisig::{ExecutionOutcome, MultiSigWallet};
//! use multisig_wallet::units::parse_ether;
//! use chrono::Utc;
//!
//! let owners: Vec<Address> = vec!["alice".into(), "bob".into(), "carol".into()];
//! let mut wallet = MultiSigWallet::new(owners, 2, parse_ether("1").unwrap(), Utc::now()).unwrap();
//! let mut env = AccountBook::new();
//!
//! wallet.deposit(&"funder".into(), parse_ether("10").unwrap(), &env).unwrap();
//!
//! // Under the daily limit: executes with a single confirmation
//! let small = wallet
//!     .submit_transaction(&"alice".into(), "shop".into(), parse_ether("0.5").unwrap(), vec![], &mut env)
//!     .unwrap();
//! assert!(small.outcome.is_executed());
//!
//! // Over the limit: waits for a second owner
//! let large = wallet
//!     .submit_transaction(&"alice".into(), "shop".into(), parse_ether("5").unwrap(), vec![], &mut env)
//!     .unwrap();
//! assert_eq!(large.outcome, ExecutionOutcome::Pending);
//! let outcome = wallet.confirm_transaction(&"bob".into(), large.id, &mut env).unwrap();
//! assert!(outcome.is_executed());
//! ```

pub mod chain;
pub mod cli;
pub mod config;
pub mod crypto;
pub mod multisig;
pub mod storage;
pub mod units;

// Re-export commonly used types
pub use chain::{AccountBook, CallRecord};
pub use config::{ConfigError, WalletConfig};
pub use crypto::Address;
pub use multisig::{
    CallError, Environment, EventKind, ExecutionOutcome, ExecutionPath, GovernanceCall,
    MultiSigWallet, Submission, Transaction, TxFilter, TxId, WalletError, WalletEvent,
};
pub use storage::{Storage, StorageConfig, StorageError, WalletState};
pub use units::{format_ether, parse_ether};
