//! Owner registry
//!
//! Holds the set of authorized owners and the confirmation threshold.
//! Mutations are crate-private: they are only reachable through the
//! execution of a governance transaction.

use crate::crypto::Address;
use crate::multisig::error::{Result, WalletError};
use serde::{Deserialize, Serialize};

/// Maximum number of owners a wallet may have
pub const MAX_OWNER_COUNT: usize = 50;

/// Owner set and threshold (M-of-N)
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct OwnerRegistry {
    /// Owners in insertion order, unique
    owners: Vec<Address>,
    /// Confirmations required to execute through the threshold path
    required: usize,
}

/// Check `1 <= required <= owner_count <= MAX_OWNER_COUNT`
fn validate_requirement(owner_count: usize, required: usize) -> Result<()> {
    if owner_count > MAX_OWNER_COUNT {
        return Err(WalletError::TooManyOwners(owner_count));
    }
    if required == 0 || required > owner_count {
        return Err(WalletError::InvalidThreshold {
            required,
            owners: owner_count,
        });
    }
    Ok(())
}

impl OwnerRegistry {
    /// Create a registry
    ///
    /// # Errors
    /// Fails on empty or duplicate owners, more than [`MAX_OWNER_COUNT`]
    /// owners, or a threshold outside `[1, owners.len()]`.
    pub fn new(owners: Vec<Address>, required: usize) -> Result<Self> {
        for (i, owner) in owners.iter().enumerate() {
            if owner.is_null() {
                return Err(WalletError::InvalidAddress);
            }
            if owners[..i].contains(owner) {
                return Err(WalletError::DuplicateOwner(owner.clone()));
            }
        }

        validate_requirement(owners.len(), required)?;

        Ok(Self { owners, required })
    }

    pub fn is_owner(&self, principal: &Address) -> bool {
        self.owners.contains(principal)
    }

    pub fn owners(&self) -> &[Address] {
        &self.owners
    }

    pub fn required(&self) -> usize {
        self.required
    }

    pub fn owner_count(&self) -> usize {
        self.owners.len()
    }

    /// Get description like "3-of-5"
    pub fn description(&self) -> String {
        format!("{}-of-{}", self.required, self.owners.len())
    }

    pub(crate) fn add_owner(&mut self, owner: Address) -> Result<()> {
        if owner.is_null() {
            return Err(WalletError::InvalidAddress);
        }
        if self.is_owner(&owner) {
            return Err(WalletError::DuplicateOwner(owner));
        }
        validate_requirement(self.owners.len() + 1, self.required)?;

        self.owners.push(owner);
        Ok(())
    }

    /// Remove an owner
    ///
    /// If fewer owners remain than the current threshold, the threshold is
    /// clamped down to the new owner count. Returns the new threshold when
    /// that happens.
    pub(crate) fn remove_owner(&mut self, owner: &Address) -> Result<Option<usize>> {
        let position = self
            .owners
            .iter()
            .position(|o| o == owner)
            .ok_or_else(|| WalletError::UnknownOwner(owner.clone()))?;

        if self.owners.len() == 1 {
            return Err(WalletError::LastOwner);
        }

        self.owners.remove(position);

        if self.required > self.owners.len() {
            self.required = self.owners.len();
            return Ok(Some(self.required));
        }
        Ok(None)
    }

    /// Swap `old` for `new`, keeping its position in the owner list
    pub(crate) fn replace_owner(&mut self, old: &Address, new: Address) -> Result<()> {
        if new.is_null() {
            return Err(WalletError::InvalidAddress);
        }
        let position = self
            .owners
            .iter()
            .position(|o| o == old)
            .ok_or_else(|| WalletError::UnknownOwner(old.clone()))?;
        if self.is_owner(&new) {
            return Err(WalletError::DuplicateOwner(new));
        }

        self.owners[position] = new;
        Ok(())
    }

    pub(crate) fn change_requirement(&mut self, required: usize) -> Result<()> {
        validate_requirement(self.owners.len(), required)?;
        self.required = required;
        Ok(())
    }
}
