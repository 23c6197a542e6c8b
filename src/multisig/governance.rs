//! Governance calls
//!
//! Owner and limit changes are ordinary wallet transactions addressed to
//! the wallet itself. Their payload is a JSON-encoded [`GovernanceCall`],
//! decoded and applied only when such a transaction executes.

use crate::crypto::Address;
use crate::multisig::error::{Result, WalletError};
use crate::multisig::events::EventKind;
use crate::multisig::wallet::MultiSigWallet;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A privileged mutation of the wallet
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum GovernanceCall {
    AddOwner { owner: Address },
    RemoveOwner { owner: Address },
    ReplaceOwner { owner: Address, new_owner: Address },
    ChangeRequirement { required: usize },
    ChangeDailyLimit { limit: u128 },
}

impl GovernanceCall {
    /// Encode as a transaction payload
    pub fn encode(&self) -> Result<Vec<u8>> {
        serde_json::to_vec(self).map_err(|e| WalletError::InvalidPayload(e.to_string()))
    }

    /// Decode a transaction payload
    pub fn decode(payload: &[u8]) -> Result<Self> {
        serde_json::from_slice(payload).map_err(|e| WalletError::InvalidPayload(e.to_string()))
    }
}

impl MultiSigWallet {
    /// Apply a decoded governance call; reachable only from execution
    pub(super) fn apply_governance(
        &mut self,
        call: GovernanceCall,
        now: DateTime<Utc>,
    ) -> Result<()> {
        match call {
            GovernanceCall::AddOwner { owner } => {
                self.owners.add_owner(owner.clone())?;
                self.emit(now, EventKind::OwnerAddition { owner });
            }
            GovernanceCall::RemoveOwner { owner } => {
                let clamped = self.owners.remove_owner(&owner)?;
                self.emit(now, EventKind::OwnerRemoval { owner });
                if let Some(required) = clamped {
                    self.emit(now, EventKind::RequirementChange { required });
                }
            }
            GovernanceCall::ReplaceOwner { owner, new_owner } => {
                self.owners.replace_owner(&owner, new_owner.clone())?;
                self.emit(now, EventKind::OwnerRemoval { owner });
                self.emit(now, EventKind::OwnerAddition { owner: new_owner });
            }
            GovernanceCall::ChangeRequirement { required } => {
                self.owners.change_requirement(required)?;
                self.emit(now, EventKind::RequirementChange { required });
            }
            GovernanceCall::ChangeDailyLimit { limit } => {
                self.daily_limit.change_limit(limit);
                self.emit(now, EventKind::DailyLimitChange { limit });
            }
        }
        Ok(())
    }
}
