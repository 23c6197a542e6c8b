//! Execution engine
//!
//! Decides whether a pending transaction may execute and performs it.
//! Every state change an execution implies (the `executed` flag, the
//! daily-limit debit, the balance debit) is committed before the external
//! call, which is the only point where control leaves the wallet.

use crate::multisig::daily_limit::day_index;
use crate::multisig::environment::{CallError, Environment};
use crate::multisig::error::{Result, WalletError};
use crate::multisig::events::EventKind;
use crate::multisig::governance::GovernanceCall;
use crate::multisig::ledger::{Transaction, TxId};
use crate::multisig::wallet::MultiSigWallet;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Which eligibility rule allowed an execution
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub enum ExecutionPath {
    /// Enough owner confirmations
    Threshold,
    /// Plain transfer within today's allowance
    DailyLimit,
}

impl fmt::Display for ExecutionPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExecutionPath::Threshold => write!(f, "threshold"),
            ExecutionPath::DailyLimit => write!(f, "daily limit"),
        }
    }
}

/// Result of an execution attempt
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ExecutionOutcome {
    /// The transaction executed and its effect succeeded
    Executed(ExecutionPath),
    /// The transaction is executed but its effect failed; it will not be retried
    Failed { path: ExecutionPath, reason: String },
    /// Not eligible yet; the transaction stays pending
    Pending,
}

impl ExecutionOutcome {
    pub fn is_executed(&self) -> bool {
        !matches!(self, ExecutionOutcome::Pending)
    }
}

impl MultiSigWallet {
    /// Start a new daily window if the day changed, recording the reset
    pub(super) fn roll_daily_window(&mut self, now: DateTime<Utc>) {
        let today = day_index(now);
        if self.daily_limit.roll_over(today) {
            log::debug!("Daily limit window reset for day {}", today);
            self.emit(now, EventKind::DailyWindowReset { day: today });
        }
    }

    /// Which path, if any, makes `id` executable right now
    fn eligible_path(&mut self, id: TxId, now: DateTime<Utc>) -> Result<Option<ExecutionPath>> {
        let tx = self.ledger.get(id)?;
        if tx.executed {
            return Err(WalletError::AlreadyExecuted(id));
        }

        if self.confirmations.is_confirmed_by_threshold(&self.owners, id) {
            return Ok(Some(ExecutionPath::Threshold));
        }

        if tx.is_plain_transfer() {
            let value = tx.value;
            self.roll_daily_window(now);
            if self.daily_limit.is_under_limit(value, day_index(now)) {
                return Ok(Some(ExecutionPath::DailyLimit));
            }
        }

        Ok(None)
    }

    /// Execute `id` if eligible
    ///
    /// Not being eligible is not an error. A failed effect is reported as
    /// [`ExecutionOutcome::Failed`] with the transaction left executed.
    pub(super) fn try_execute(
        &mut self,
        id: TxId,
        env: &mut dyn Environment,
    ) -> Result<ExecutionOutcome> {
        let now = env.now();
        let path = match self.eligible_path(id, now)? {
            Some(path) => path,
            None => {
                log::debug!("Transaction {} not eligible for execution", id);
                return Ok(ExecutionOutcome::Pending);
            }
        };

        let tx = self.ledger.get(id)?.clone();
        if path == ExecutionPath::DailyLimit {
            self.daily_limit.spend(tx.value)?;
        }
        self.ledger.mark_executed(id)?;

        let effect = if tx.destination == self.address {
            self.call_self(&tx, now)
        } else {
            self.call_external(&tx, env)
        };

        match effect {
            Ok(()) => {
                self.emit(env.now(), EventKind::Execution { id, path });
                Ok(ExecutionOutcome::Executed(path))
            }
            Err(reason) => {
                log::warn!("Transaction {} failed: {}", id, reason);
                self.emit(
                    env.now(),
                    EventKind::ExecutionFailure {
                        id,
                        path,
                        reason: reason.clone(),
                    },
                );
                Ok(ExecutionOutcome::Failed { path, reason })
            }
        }
    }

    /// A transaction addressed to the wallet itself
    ///
    /// Value stays in place; a non-empty payload must be a governance call.
    fn call_self(&mut self, tx: &Transaction, now: DateTime<Utc>) -> std::result::Result<(), String> {
        if tx.payload.is_empty() {
            return Ok(());
        }
        let call = GovernanceCall::decode(&tx.payload).map_err(|e| e.to_string())?;
        self.apply_governance(call, now).map_err(|e| e.to_string())
    }

    /// Move value out of the wallet and hand control to the environment
    fn call_external(
        &mut self,
        tx: &Transaction,
        env: &mut dyn Environment,
    ) -> std::result::Result<(), String> {
        if tx.value > self.balance {
            return Err(CallError::InsufficientBalance {
                have: self.balance,
                need: tx.value,
            }
            .to_string());
        }
        self.balance -= tx.value;

        // Suspension point: the environment may re-enter the wallet here
        match env.call(self, &tx.destination, tx.value, &tx.payload) {
            Ok(()) => Ok(()),
            Err(e) => {
                // The value never left
                self.balance = self.balance.saturating_add(tx.value);
                Err(e.to_string())
            }
        }
    }
}
