//! Account book environment
//!
//! Implements [`Environment`] by crediting transferred value to the
//! destination's balance. Destinations can be marked as rejecting to
//! simulate a call that reverts.

use crate::crypto::Address;
use crate::multisig::{CallError, Environment, MultiSigWallet};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// A delivered call
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct CallRecord {
    pub destination: Address,
    pub value: u128,
    /// Hex-encoded call data
    pub payload: String,
    pub timestamp: DateTime<Utc>,
}

/// Balances of external accounts plus a call log
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct AccountBook {
    balances: BTreeMap<Address, u128>,
    calls: Vec<CallRecord>,
    rejecting: BTreeSet<Address>,
    /// Pinned clock; wall-clock time when unset
    #[serde(skip)]
    fixed_time: Option<DateTime<Utc>>,
}

impl AccountBook {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pin the clock to `time`
    pub fn at(mut self, time: DateTime<Utc>) -> Self {
        self.fixed_time = Some(time);
        self
    }

    pub fn balance_of(&self, account: &Address) -> u128 {
        self.balances.get(account).copied().unwrap_or(0)
    }

    pub fn calls(&self) -> &[CallRecord] {
        &self.calls
    }

    /// Make calls to `account` fail
    pub fn reject_calls(&mut self, account: Address) {
        log::info!("Calls to {} will be rejected", account);
        self.rejecting.insert(account);
    }

    /// Let calls to `account` succeed again
    pub fn accept_calls(&mut self, account: &Address) {
        self.rejecting.remove(account);
    }

    pub fn is_rejecting(&self, account: &Address) -> bool {
        self.rejecting.contains(account)
    }
}

impl Environment for AccountBook {
    fn now(&self) -> DateTime<Utc> {
        self.fixed_time.unwrap_or_else(Utc::now)
    }

    fn call(
        &mut self,
        _wallet: &mut MultiSigWallet,
        destination: &Address,
        value: u128,
        payload: &[u8],
    ) -> Result<(), CallError> {
        if self.rejecting.contains(destination) {
            return Err(CallError::Rejected(format!("{} reverted", destination)));
        }

        let balance = self.balances.entry(destination.clone()).or_insert(0);
        *balance = balance
            .checked_add(value)
            .ok_or_else(|| CallError::Rejected(format!("{} balance overflow", destination)))?;

        log::debug!("Delivered {} wei to {}", value, destination);
        self.calls.push(CallRecord {
            destination: destination.clone(),
            value,
            payload: hex::encode(payload),
            timestamp: self.now(),
        });
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::multisig::{ExecutionOutcome, ExecutionPath};
    use crate::units::WEI_PER_ETHER;
    use chrono::TimeZone;

    fn setup() -> (MultiSigWallet, AccountBook) {
        let now = Utc.with_ymd_and_hms(2024, 6, 1, 9, 0, 0).unwrap();
        let book = AccountBook::new().at(now);
        let owners = vec!["a".into(), "b".into(), "c".into()];
        let mut wallet = MultiSigWallet::new(owners, 2, WEI_PER_ETHER, now).unwrap();
        wallet
            .deposit(&"deployer".into(), 5 * WEI_PER_ETHER, &book)
            .unwrap();
        (wallet, book)
    }

    #[test]
    fn test_transfer_credits_destination() {
        let (mut wallet, mut book) = setup();

        let submission = wallet
            .submit_transaction(&"a".into(), "shop".into(), WEI_PER_ETHER, vec![], &mut book)
            .unwrap();
        assert_eq!(
            submission.outcome,
            ExecutionOutcome::Executed(ExecutionPath::DailyLimit)
        );

        assert_eq!(book.balance_of(&"shop".into()), WEI_PER_ETHER);
        assert_eq!(book.calls().len(), 1);
        assert_eq!(wallet.balance(), 4 * WEI_PER_ETHER);
    }

    #[test]
    fn test_rejecting_destination() {
        let (mut wallet, mut book) = setup();
        book.reject_calls("vault".into());
        assert!(book.is_rejecting(&"vault".into()));

        let submission = wallet
            .submit_transaction(&"a".into(), "vault".into(), 2 * WEI_PER_ETHER, vec![0xab], &mut book)
            .unwrap();
        let outcome = wallet
            .confirm_transaction(&"b".into(), submission.id, &mut book)
            .unwrap();

        assert!(matches!(outcome, ExecutionOutcome::Failed { .. }));
        assert_eq!(book.balance_of(&"vault".into()), 0);
        assert!(book.calls().is_empty());
        assert_eq!(wallet.balance(), 5 * WEI_PER_ETHER);

        book.accept_calls(&"vault".into());
        assert!(!book.is_rejecting(&"vault".into()));
    }

    #[test]
    fn test_call_log_records_payload() {
        let (mut wallet, mut book) = setup();

        let id = wallet
            .submit_transaction(&"a".into(), "app".into(), 0, vec![0xca, 0xfe], &mut book)
            .unwrap()
            .id;
        wallet.confirm_transaction(&"c".into(), id, &mut book).unwrap();

        assert_eq!(book.calls()[0].payload, "cafe");
        assert_eq!(book.calls()[0].value, 0);
    }
}
