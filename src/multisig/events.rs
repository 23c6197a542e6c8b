//! Wallet events
//!
//! Observable side effects, appended to the wallet's event log in the
//! order they happen.

use crate::crypto::Address;
use crate::multisig::execution::ExecutionPath;
use crate::multisig::ledger::TxId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// What happened
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub enum EventKind {
    Submission { id: TxId, submitted_by: Address },
    Confirmation { id: TxId, owner: Address },
    Revocation { id: TxId, owner: Address },
    Execution { id: TxId, path: ExecutionPath },
    ExecutionFailure { id: TxId, path: ExecutionPath, reason: String },
    Deposit { from: Address, value: u128 },
    OwnerAddition { owner: Address },
    OwnerRemoval { owner: Address },
    RequirementChange { required: usize },
    DailyLimitChange { limit: u128 },
    DailyWindowReset { day: i64 },
}

/// A timestamped wallet event
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct WalletEvent {
    pub timestamp: DateTime<Utc>,
    pub kind: EventKind,
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EventKind::Submission { id, submitted_by } => {
                write!(f, "transaction {} submitted by {}", id, submitted_by)
            }
            EventKind::Confirmation { id, owner } => {
                write!(f, "transaction {} confirmed by {}", id, owner)
            }
            EventKind::Revocation { id, owner } => {
                write!(f, "confirmation of transaction {} revoked by {}", id, owner)
            }
            EventKind::Execution { id, path } => {
                write!(f, "transaction {} executed via {}", id, path)
            }
            EventKind::ExecutionFailure { id, path, reason } => {
                write!(f, "transaction {} failed via {}: {}", id, path, reason)
            }
            EventKind::Deposit { from, value } => write!(f, "deposit of {} from {}", value, from),
            EventKind::OwnerAddition { owner } => write!(f, "owner {} added", owner),
            EventKind::OwnerRemoval { owner } => write!(f, "owner {} removed", owner),
            EventKind::RequirementChange { required } => {
                write!(f, "requirement changed to {}", required)
            }
            EventKind::DailyLimitChange { limit } => write!(f, "daily limit changed to {}", limit),
            EventKind::DailyWindowReset { day } => write!(f, "daily window reset on day {}", day),
        }
    }
}
