//! Multi-owner wallet with a daily limit
//!
//! [`MultiSigWallet`] ties the owner registry, transaction ledger,
//! confirmation tracker and daily-limit engine together behind the public
//! operations callers use. Every caller identity passed in is assumed to
//! be authenticated already.

use crate::crypto::{derive_wallet_address, Address};
use crate::multisig::confirmations::ConfirmationTracker;
use crate::multisig::daily_limit::{day_index, DailyLimitEngine};
use crate::multisig::environment::Environment;
use crate::multisig::error::{Result, WalletError};
use crate::multisig::events::{EventKind, WalletEvent};
use crate::multisig::execution::ExecutionOutcome;
use crate::multisig::ledger::{Transaction, TransactionLedger, TxFilter, TxId};
use crate::multisig::owners::OwnerRegistry;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Result of a submission: the new id and what happened when the
/// submitter's implicit confirmation was evaluated
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Submission {
    pub id: TxId,
    pub outcome: ExecutionOutcome,
}

/// A multi-signature wallet with a daily spending limit
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct MultiSigWallet {
    /// The wallet's own identity; transactions sent here are governance calls
    pub(super) address: Address,
    pub(super) owners: OwnerRegistry,
    pub(super) ledger: TransactionLedger,
    pub(super) confirmations: ConfirmationTracker,
    pub(super) daily_limit: DailyLimitEngine,
    /// Value held, in wei
    pub(super) balance: u128,
    pub(super) events: Vec<WalletEvent>,
    pub(super) created_at: DateTime<Utc>,
}

impl MultiSigWallet {
    /// Create a new wallet
    ///
    /// # Arguments
    /// * `owners` - Initial owners, unique and non-empty
    /// * `required` - Confirmations needed, in `[1, owners.len()]`
    /// * `daily_limit` - Value (wei) that may leave per day without quorum
    /// * `now` - Creation time; starts the first limit window
    pub fn new(
        owners: Vec<Address>,
        required: usize,
        daily_limit: u128,
        now: DateTime<Utc>,
    ) -> Result<Self> {
        let address = derive_wallet_address(&owners, required, daily_limit);
        let owners = OwnerRegistry::new(owners, required)?;

        log::info!(
            "Wallet {} created ({}, daily limit {})",
            address,
            owners.description(),
            daily_limit
        );

        Ok(Self {
            address,
            owners,
            ledger: TransactionLedger::new(),
            confirmations: ConfirmationTracker::new(),
            daily_limit: DailyLimitEngine::new(daily_limit, day_index(now)),
            balance: 0,
            events: Vec::new(),
            created_at: now,
        })
    }

    pub(super) fn emit(&mut self, timestamp: DateTime<Utc>, kind: EventKind) {
        log::info!("[{}] {}", self.address, kind);
        self.events.push(WalletEvent { timestamp, kind });
    }

    fn ensure_owner(&self, caller: &Address) -> Result<()> {
        if !self.owners.is_owner(caller) {
            return Err(WalletError::NotAnOwner(caller.clone()));
        }
        Ok(())
    }

    // -----------------------------------------------------------------
    // Mutating operations
    // -----------------------------------------------------------------

    /// Credit value sent to the wallet; anyone may deposit
    pub fn deposit(&mut self, from: &Address, value: u128, env: &dyn Environment) -> Result<()> {
        self.balance = self
            .balance
            .checked_add(value)
            .ok_or(WalletError::BalanceOverflow)?;
        self.emit(
            env.now(),
            EventKind::Deposit {
                from: from.clone(),
                value,
            },
        );
        Ok(())
    }

    /// Propose a transaction
    ///
    /// The submitter's confirmation is recorded in the same step and the
    /// transaction executes immediately if that already makes it eligible.
    pub fn submit_transaction(
        &mut self,
        caller: &Address,
        destination: Address,
        value: u128,
        payload: Vec<u8>,
        env: &mut dyn Environment,
    ) -> Result<Submission> {
        self.ensure_owner(caller)?;
        if destination.is_null() {
            return Err(WalletError::InvalidAddress);
        }

        let now = env.now();
        let id = self
            .ledger
            .submit(destination, value, payload, caller.clone(), now);
        self.emit(
            now,
            EventKind::Submission {
                id,
                submitted_by: caller.clone(),
            },
        );

        let outcome = self.confirm_transaction(caller, id, env)?;
        Ok(Submission { id, outcome })
    }

    /// Confirm a pending transaction and execute it if now eligible
    ///
    /// Confirming twice is a no-op on the confirmation set; eligibility is
    /// evaluated either way. A failed execution does not undo the
    /// confirmation and is reported in the outcome.
    pub fn confirm_transaction(
        &mut self,
        caller: &Address,
        id: TxId,
        env: &mut dyn Environment,
    ) -> Result<ExecutionOutcome> {
        let added = self
            .confirmations
            .confirm(&self.ledger, &self.owners, id, caller)?;
        if added {
            self.emit(
                env.now(),
                EventKind::Confirmation {
                    id,
                    owner: caller.clone(),
                },
            );
        }

        self.try_execute(id, env)
    }

    /// Withdraw a confirmation from a pending transaction
    pub fn revoke_confirmation(
        &mut self,
        caller: &Address,
        id: TxId,
        env: &dyn Environment,
    ) -> Result<()> {
        self.confirmations
            .revoke(&self.ledger, &self.owners, id, caller)?;
        self.emit(
            env.now(),
            EventKind::Revocation {
                id,
                owner: caller.clone(),
            },
        );
        Ok(())
    }

    /// Execute a pending transaction if it is eligible
    ///
    /// Returns [`ExecutionOutcome::Pending`] when it is not eligible yet.
    /// A failed external effect is returned as
    /// [`WalletError::ExecutionFailed`]; the transaction stays executed and
    /// must be resubmitted to retry.
    pub fn execute_transaction(
        &mut self,
        caller: &Address,
        id: TxId,
        env: &mut dyn Environment,
    ) -> Result<ExecutionOutcome> {
        self.ensure_owner(caller)?;

        match self.try_execute(id, env)? {
            ExecutionOutcome::Failed { reason, .. } => {
                Err(WalletError::ExecutionFailed { id, reason })
            }
            outcome => Ok(outcome),
        }
    }

    // -----------------------------------------------------------------
    // Queries
    // -----------------------------------------------------------------

    pub fn address(&self) -> &Address {
        &self.address
    }

    pub fn is_owner(&self, principal: &Address) -> bool {
        self.owners.is_owner(principal)
    }

    pub fn owners(&self) -> &[Address] {
        self.owners.owners()
    }

    pub fn required(&self) -> usize {
        self.owners.required()
    }

    /// Get description like "3-of-5"
    pub fn description(&self) -> String {
        self.owners.description()
    }

    pub fn transaction(&self, id: TxId) -> Result<&Transaction> {
        self.ledger.get(id)
    }

    /// Number of current owners who confirmed `id`
    pub fn confirmation_count(&self, id: TxId) -> Result<usize> {
        self.ledger.get(id)?;
        Ok(self.confirmations.confirmation_count(&self.owners, id))
    }

    /// Current owners who confirmed `id`, in owner order
    pub fn confirmations(&self, id: TxId) -> Result<Vec<Address>> {
        self.ledger.get(id)?;
        Ok(self.confirmations.confirmers(&self.owners, id))
    }

    /// Whether `id` has reached the confirmation threshold
    pub fn is_confirmed(&self, id: TxId) -> Result<bool> {
        self.ledger.get(id)?;
        Ok(self.confirmations.is_confirmed_by_threshold(&self.owners, id))
    }

    pub fn transaction_count(&self, filter: TxFilter) -> usize {
        self.ledger.count(filter)
    }

    /// Ids in `[from, to)` selected by `filter`
    pub fn transaction_ids(&self, from: TxId, to: TxId, filter: TxFilter) -> Vec<TxId> {
        self.ledger.ids(from, to, filter)
    }

    pub fn transactions(&self) -> impl Iterator<Item = &Transaction> {
        self.ledger.iter()
    }

    pub fn daily_limit(&self) -> u128 {
        self.daily_limit.current_limit()
    }

    /// Amount spent through the daily-limit path as of `now`
    pub fn spent_today(&self, now: DateTime<Utc>) -> u128 {
        self.daily_limit.spent_on(day_index(now))
    }

    /// Day index of the current limit window as of `now`
    pub fn last_reset_day(&self, now: DateTime<Utc>) -> i64 {
        self.daily_limit.last_reset_day_on(day_index(now))
    }

    /// Largest value a single owner could move right now without quorum
    pub fn calc_max_withdraw(&self, now: DateTime<Utc>) -> u128 {
        self.daily_limit
            .remaining_on(day_index(now))
            .min(self.balance)
    }

    pub fn balance(&self) -> u128 {
        self.balance
    }

    pub fn events(&self) -> &[WalletEvent] {
        &self.events
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::multisig::test_support::{addr, funded_wallet, start, wallet, TestEnv, ETHER};

    #[test]
    fn test_wallet_creation() {
        let wallet = wallet();

        assert!(wallet.address().as_str().starts_with('3'));
        assert_eq!(wallet.required(), 3);
        assert_eq!(wallet.owners().len(), 5);
        assert_eq!(wallet.description(), "3-of-5");
        assert_eq!(wallet.daily_limit(), 2 * ETHER);
        assert_eq!(wallet.balance(), 0);
        assert_eq!(wallet.transaction_count(TxFilter::ALL), 0);
    }

    #[test]
    fn test_construction_validation() {
        let owners = vec![addr("a"), addr("b")];
        assert!(MultiSigWallet::new(owners.clone(), 0, 0, start()).is_err());
        assert!(MultiSigWallet::new(owners, 3, 0, start()).is_err());
        assert_eq!(
            MultiSigWallet::new(vec![addr("a"), addr("a")], 1, 0, start()).err(),
            Some(WalletError::DuplicateOwner(addr("a")))
        );
    }

    #[test]
    fn test_submit_requires_owner_and_destination() {
        let (mut wallet, mut env) = (wallet(), TestEnv::new());

        assert_eq!(
            wallet.submit_transaction(&addr("x"), addr("y"), 1, vec![], &mut env),
            Err(WalletError::NotAnOwner(addr("x")))
        );
        assert_eq!(
            wallet.submit_transaction(&addr("a"), addr(""), 1, vec![], &mut env),
            Err(WalletError::InvalidAddress)
        );
        // Nothing was recorded
        assert_eq!(wallet.transaction_count(TxFilter::ALL), 0);
        assert!(wallet.events().is_empty());
    }

    #[test]
    fn test_double_confirmation_is_noop() {
        let (mut wallet, mut env) = (funded_wallet(), TestEnv::new());
        let id = wallet
            .submit_transaction(&addr("a"), addr("x"), 5 * ETHER, vec![], &mut env)
            .unwrap()
            .id;

        wallet.confirm_transaction(&addr("b"), id, &mut env).unwrap();
        let events = wallet.events().len();
        wallet.confirm_transaction(&addr("b"), id, &mut env).unwrap();

        assert_eq!(wallet.confirmation_count(id).unwrap(), 2);
        assert_eq!(wallet.events().len(), events);
    }

    #[test]
    fn test_revoke_then_reconfirm() {
        let (mut wallet, mut env) = (funded_wallet(), TestEnv::new());
        let id = wallet
            .submit_transaction(&addr("a"), addr("x"), 5 * ETHER, vec![], &mut env)
            .unwrap()
            .id;
        wallet.confirm_transaction(&addr("b"), id, &mut env).unwrap();

        wallet.revoke_confirmation(&addr("b"), id, &env).unwrap();
        assert_eq!(wallet.confirmations(id).unwrap(), vec![addr("a")]);
        assert_eq!(
            wallet.revoke_confirmation(&addr("zz"), id, &env),
            Err(WalletError::NotAnOwner(addr("zz")))
        );
        assert_eq!(
            wallet.revoke_confirmation(&addr("a"), 9, &env),
            Err(WalletError::UnknownTransaction(9))
        );
        assert_eq!(
            wallet.revoke_confirmation(&addr("c"), id, &env),
            Err(WalletError::NotConfirmed {
                id,
                owner: addr("c")
            })
        );

        wallet.confirm_transaction(&addr("c"), id, &mut env).unwrap();
        assert!(!wallet.is_confirmed(id).unwrap());
        wallet.confirm_transaction(&addr("d"), id, &mut env).unwrap();
        assert!(wallet.transaction(id).unwrap().executed);
        assert!(wallet.is_confirmed(id).unwrap());
    }

    #[test]
    fn test_queries_on_unknown_transaction() {
        let wallet = wallet();
        assert_eq!(
            wallet.confirmation_count(3),
            Err(WalletError::UnknownTransaction(3))
        );
        assert!(wallet.confirmations(3).is_err());
        assert!(wallet.is_confirmed(3).is_err());
        assert!(wallet.transaction(3).is_err());
    }

    #[test]
    fn test_transaction_listing() {
        let (mut wallet, mut env) = (funded_wallet(), TestEnv::new());
        wallet
            .submit_transaction(&addr("a"), addr("x"), ETHER, vec![], &mut env)
            .unwrap();
        wallet
            .submit_transaction(&addr("a"), addr("x"), 5 * ETHER, vec![], &mut env)
            .unwrap();
        wallet
            .submit_transaction(&addr("b"), addr("x"), 6 * ETHER, vec![], &mut env)
            .unwrap();

        assert_eq!(wallet.transaction_count(TxFilter::EXECUTED), 1);
        assert_eq!(wallet.transaction_count(TxFilter::PENDING), 2);
        assert_eq!(wallet.transaction_ids(0, 3, TxFilter::PENDING), vec![1, 2]);
        assert_eq!(wallet.transactions().count(), 3);
    }

    #[test]
    fn test_calc_max_withdraw() {
        let (mut wallet, mut env) = (funded_wallet(), TestEnv::new());
        assert_eq!(wallet.calc_max_withdraw(env.now()), 2 * ETHER);

        wallet
            .submit_transaction(&addr("a"), addr("x"), ETHER + ETHER / 2, vec![], &mut env)
            .unwrap();
        assert_eq!(wallet.calc_max_withdraw(env.now()), ETHER / 2);

        env.advance_days(1);
        assert_eq!(wallet.calc_max_withdraw(env.now()), 2 * ETHER);

        let unfunded = crate::multisig::test_support::wallet();
        assert_eq!(unfunded.calc_max_withdraw(env.now()), 0);
    }

    #[test]
    fn test_last_reset_day_follows_clock() {
        let (mut wallet, mut env) = (funded_wallet(), TestEnv::new());
        let created = day_index(env.now());
        wallet
            .submit_transaction(&addr("a"), addr("x"), ETHER, vec![], &mut env)
            .unwrap();
        assert_eq!(wallet.last_reset_day(env.now()), created);

        // Agrees with spent_today before any operation rolls the window
        env.advance_days(1);
        assert_eq!(wallet.spent_today(env.now()), 0);
        assert_eq!(wallet.last_reset_day(env.now()), created + 1);

        // An earlier clock reading never moves it back
        assert_eq!(wallet.last_reset_day(start()), created);
    }

    #[test]
    fn test_deposit_emits_event() {
        let wallet = funded_wallet();
        assert_eq!(wallet.balance(), 10 * ETHER);
        assert_eq!(
            wallet.events().last().map(|e| &e.kind),
            Some(&EventKind::Deposit {
                from: addr("deployer"),
                value: 10 * ETHER
            })
        );
    }

    #[test]
    fn test_deposit_overflow() {
        let (mut wallet, env) = (funded_wallet(), TestEnv::new());
        assert_eq!(
            wallet.deposit(&addr("x"), u128::MAX, &env),
            Err(WalletError::BalanceOverflow)
        );
        assert_eq!(wallet.balance(), 10 * ETHER);
    }

    #[test]
    fn test_wallet_serialization() {
        let (mut wallet, mut env) = (funded_wallet(), TestEnv::new());
        wallet
            .submit_transaction(&addr("a"), addr("x"), 5 * ETHER, vec![1, 2], &mut env)
            .unwrap();

        let json = serde_json::to_string(&wallet).unwrap();
        let restored: MultiSigWallet = serde_json::from_str(&json).unwrap();

        assert_eq!(restored.address(), wallet.address());
        assert_eq!(restored.confirmation_count(0).unwrap(), 1);
        assert_eq!(restored.transaction(0).unwrap().payload, vec![1, 2]);
        assert_eq!(restored.events(), wallet.events());
    }
}
