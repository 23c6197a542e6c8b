//! Wallet error taxonomy

use crate::crypto::Address;
use crate::multisig::ledger::TxId;
use crate::multisig::owners::MAX_OWNER_COUNT;
use thiserror::Error;

/// Errors raised by wallet operations
///
/// Every variant except [`WalletError::ExecutionFailed`] aborts the call
/// without changing any state.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum WalletError {
    #[error("Caller is not an owner: {0}")]
    NotAnOwner(Address),
    #[error("Transaction not found: {0}")]
    UnknownTransaction(TxId),
    #[error("Owner not found: {0}")]
    UnknownOwner(Address),
    #[error("Duplicate owner: {0}")]
    DuplicateOwner(Address),
    #[error("Transaction {0} already executed")]
    AlreadyExecuted(TxId),
    #[error("Transaction {id} not confirmed by {owner}")]
    NotConfirmed { id: TxId, owner: Address },
    #[error("Invalid threshold: {required} required of {owners} owners")]
    InvalidThreshold { required: usize, owners: usize },
    #[error("Too many owners: {0} exceeds the maximum of {}", MAX_OWNER_COUNT)]
    TooManyOwners(usize),
    #[error("Cannot remove the last owner")]
    LastOwner,
    #[error("Invalid address: identity is empty")]
    InvalidAddress,
    #[error("Daily limit exceeded: requested {requested}, remaining {remaining}")]
    LimitExceeded { requested: u128, remaining: u128 },
    #[error("Execution of transaction {id} failed: {reason}")]
    ExecutionFailed { id: TxId, reason: String },
    #[error("Invalid governance payload: {0}")]
    InvalidPayload(String),
    #[error("Balance overflow")]
    BalanceOverflow,
}

/// Result alias for wallet operations
pub type Result<T> = std::result::Result<T, WalletError>;
