//! Transaction ledger
//!
//! Append-only record of proposed wallet transactions. Ids are issued
//! sequentially from 0 with no gaps, and a record's only mutation after
//! submission is the one-way `executed` flag.

use crate::crypto::Address;
use crate::multisig::error::{Result, WalletError};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Sequential transaction identifier
pub type TxId = u64;

bitflags::bitflags! {
    /// Selects transactions by execution state
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    pub struct TxFilter: u8 {
        const PENDING = 0b01;
        const EXECUTED = 0b10;
        const ALL = Self::PENDING.bits() | Self::EXECUTED.bits();
    }
}

impl TxFilter {
    /// Check whether a transaction is selected by this filter
    pub fn matches(&self, tx: &Transaction) -> bool {
        if tx.executed {
            self.contains(TxFilter::EXECUTED)
        } else {
            self.contains(TxFilter::PENDING)
        }
    }
}

/// Serde adapter writing payloads as hex strings
mod payload_hex {
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(bytes: &[u8], serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&hex::encode(bytes))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<u8>, D::Error> {
        let s = String::deserialize(deserializer)?;
        hex::decode(s).map_err(serde::de::Error::custom)
    }
}

/// A proposed wallet transaction
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct Transaction {
    /// Ledger position
    pub id: TxId,
    /// Recipient of the value and payload
    pub destination: Address,
    /// Amount in wei
    pub value: u128,
    /// Opaque call data; empty for a plain value transfer
    #[serde(with = "payload_hex")]
    pub payload: Vec<u8>,
    /// Set once, before the external effect runs
    pub executed: bool,
    /// Owner who submitted the transaction
    pub submitted_by: Address,
    /// Submission timestamp
    pub submitted_at: DateTime<Utc>,
}

impl Transaction {
    /// A transfer with no call data, eligible for the daily-limit path
    pub fn is_plain_transfer(&self) -> bool {
        self.payload.is_empty()
    }
}

/// Append-only transaction store
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct TransactionLedger {
    /// Indexed by id
    transactions: Vec<Transaction>,
}

impl TransactionLedger {
    pub fn new() -> Self {
        Self {
            transactions: Vec::new(),
        }
    }

    /// Record a new transaction and return its id
    pub(crate) fn submit(
        &mut self,
        destination: Address,
        value: u128,
        payload: Vec<u8>,
        submitted_by: Address,
        submitted_at: DateTime<Utc>,
    ) -> TxId {
        let id = self.transactions.len() as TxId;
        self.transactions.push(Transaction {
            id,
            destination,
            value,
            payload,
            executed: false,
            submitted_by,
            submitted_at,
        });
        id
    }

    /// Get a transaction by id
    pub fn get(&self, id: TxId) -> Result<&Transaction> {
        usize::try_from(id)
            .ok()
            .and_then(|index| self.transactions.get(index))
            .ok_or(WalletError::UnknownTransaction(id))
    }

    /// Flip `executed` to true; fails if it already is
    pub(crate) fn mark_executed(&mut self, id: TxId) -> Result<()> {
        let tx = usize::try_from(id)
            .ok()
            .and_then(|index| self.transactions.get_mut(index))
            .ok_or(WalletError::UnknownTransaction(id))?;

        if tx.executed {
            return Err(WalletError::AlreadyExecuted(id));
        }
        tx.executed = true;
        Ok(())
    }

    /// Number of transactions ever submitted
    pub fn len(&self) -> usize {
        self.transactions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.transactions.is_empty()
    }

    /// Count transactions selected by `filter`
    pub fn count(&self, filter: TxFilter) -> usize {
        self.transactions.iter().filter(|tx| filter.matches(tx)).count()
    }

    /// Ids in `[from, to)` selected by `filter`
    pub fn ids(&self, from: TxId, to: TxId, filter: TxFilter) -> Vec<TxId> {
        self.transactions
            .iter()
            .filter(|tx| tx.id >= from && tx.id < to && filter.matches(tx))
            .map(|tx| tx.id)
            .collect()
    }

    /// Iterate over all transactions in id order
    pub fn iter(&self) -> impl Iterator<Item = &Transaction> {
        self.transactions.iter()
    }
}
