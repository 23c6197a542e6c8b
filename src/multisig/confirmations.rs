//! Confirmation tracking
//!
//! The `(transaction, owner)` relation. Confirmations of executed
//! transactions stay in place but are never consulted again, and
//! confirmations left by removed owners are not counted.

use crate::crypto::Address;
use crate::multisig::error::{Result, WalletError};
use crate::multisig::ledger::{TransactionLedger, TxId};
use crate::multisig::owners::OwnerRegistry;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// Per-transaction set of confirming owners
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct ConfirmationTracker {
    confirmations: BTreeMap<TxId, BTreeSet<Address>>,
}

impl ConfirmationTracker {
    pub fn new() -> Self {
        Self {
            confirmations: BTreeMap::new(),
        }
    }

    /// Shared preconditions for confirm and revoke
    fn check_editable(
        ledger: &TransactionLedger,
        owners: &OwnerRegistry,
        id: TxId,
        owner: &Address,
    ) -> Result<()> {
        if !owners.is_owner(owner) {
            return Err(WalletError::NotAnOwner(owner.clone()));
        }
        if ledger.get(id)?.executed {
            return Err(WalletError::AlreadyExecuted(id));
        }
        Ok(())
    }

    /// Record `owner`'s confirmation of `id`
    ///
    /// Returns `false` if the owner had already confirmed, in which case
    /// nothing changes.
    pub(crate) fn confirm(
        &mut self,
        ledger: &TransactionLedger,
        owners: &OwnerRegistry,
        id: TxId,
        owner: &Address,
    ) -> Result<bool> {
        Self::check_editable(ledger, owners, id, owner)?;
        Ok(self
            .confirmations
            .entry(id)
            .or_default()
            .insert(owner.clone()))
    }

    /// Withdraw `owner`'s confirmation of `id`
    pub(crate) fn revoke(
        &mut self,
        ledger: &TransactionLedger,
        owners: &OwnerRegistry,
        id: TxId,
        owner: &Address,
    ) -> Result<()> {
        Self::check_editable(ledger, owners, id, owner)?;

        let removed = self
            .confirmations
            .get_mut(&id)
            .map(|set| set.remove(owner))
            .unwrap_or(false);
        if !removed {
            return Err(WalletError::NotConfirmed {
                id,
                owner: owner.clone(),
            });
        }
        Ok(())
    }

    /// Whether `owner` has a recorded confirmation for `id`
    pub fn has_confirmed(&self, id: TxId, owner: &Address) -> bool {
        self.confirmations
            .get(&id)
            .is_some_and(|set| set.contains(owner))
    }

    /// Current owners who confirmed `id`, in owner order
    pub fn confirmers(&self, owners: &OwnerRegistry, id: TxId) -> Vec<Address> {
        owners
            .owners()
            .iter()
            .filter(|owner| self.has_confirmed(id, owner))
            .cloned()
            .collect()
    }

    /// Number of current owners who confirmed `id`
    pub fn confirmation_count(&self, owners: &OwnerRegistry, id: TxId) -> usize {
        owners
            .owners()
            .iter()
            .filter(|owner| self.has_confirmed(id, owner))
            .count()
    }

    pub fn is_confirmed_by_threshold(&self, owners: &OwnerRegistry, id: TxId) -> bool {
        self.confirmation_count(owners, id) >= owners.required()
    }
}
