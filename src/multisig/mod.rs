//! Multi-signature wallet with a daily spending limit
//!
//! M-of-N owners authorize transactions by confirming them; a plain value
//! transfer that fits in the remaining daily allowance can execute on a
//! single owner's submission.
//!
//! # Example
//!
//! ```ignore
//! use multisig_wallet::multisig::{GovernanceCall, MultiSigWallet};
//!
//! // 3-of-5 wallet with a 2 ether daily limit
//! let mut wallet = MultiSigWallet::new(owners, 3, parse_ether("2")?, env.now())?;
//! wallet.deposit(&deployer, parse_ether("10")?, &env)?;
//!
//! // Small transfers go through on submission
//! let small = wallet.submit_transaction(&alice, bob, parse_ether("1")?, vec![], &mut env)?;
//!
//! // Everything else needs confirmations
//! let large = wallet.submit_transaction(&alice, bob, parse_ether("5")?, vec![], &mut env)?;
//! wallet.confirm_transaction(&carol, large.id, &mut env)?;
//! wallet.confirm_transaction(&dave, large.id, &mut env)?;
//!
//! // Governance is a transaction addressed to the wallet itself
//! let payload = GovernanceCall::ChangeRequirement { required: 4 }.encode()?;
//! wallet.submit_transaction(&alice, wallet.address().clone(), 0, payload, &mut env)?;
//! ```

pub mod confirmations;
pub mod daily_limit;
pub mod environment;
pub mod error;
pub mod events;
pub mod execution;
pub mod governance;
pub mod ledger;
pub mod owners;
pub mod wallet;

#[cfg(test)]
pub(crate) mod test_support;

pub use confirmations::ConfirmationTracker;
pub use daily_limit::{day_index, DailyLimitEngine, SECONDS_PER_DAY};
pub use environment::{CallError, Environment};
pub use error::{Result, WalletError};
pub use events::{EventKind, WalletEvent};
pub use execution::{ExecutionOutcome, ExecutionPath};
pub use governance::GovernanceCall;
pub use ledger::{Transaction, TransactionLedger, TxFilter, TxId};
pub use owners::{OwnerRegistry, MAX_OWNER_COUNT};
pub use wallet::{MultiSigWallet, Submission};
