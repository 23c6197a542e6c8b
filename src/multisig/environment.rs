//! Execution environment seam
//!
//! The wallet never reads a clock or moves value on its own. The caller
//! supplies an [`Environment`] that provides the current time and performs
//! the external call of an executed transaction.

use crate::crypto::Address;
use crate::multisig::wallet::MultiSigWallet;
use chrono::{DateTime, Utc};
use thiserror::Error;

/// Failure of the external effect of an executed transaction
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CallError {
    #[error("Destination rejected the call: {0}")]
    Rejected(String),
    #[error("Insufficient wallet balance: have {have}, need {need}")]
    InsufficientBalance { have: u128, need: u128 },
}

/// Host of the wallet: clock plus external call target
pub trait Environment {
    /// Current time, used for the daily-limit window and event timestamps
    fn now(&self) -> DateTime<Utc>;

    /// Transfer `value` and deliver `payload` to `destination`
    ///
    /// The wallet has already committed the transaction as executed when
    /// this runs. The callee gets the wallet back mutably and may re-enter
    /// any of its public operations before returning.
    fn call(
        &mut self,
        wallet: &mut MultiSigWallet,
        destination: &Address,
        value: u128,
        payload: &[u8],
    ) -> Result<(), CallError>;
}
