//! Shared fixtures for wallet tests

use crate::crypto::Address;
use crate::multisig::environment::{CallError, Environment};
use crate::multisig::error::Result;
use crate::multisig::execution::ExecutionOutcome;
use crate::multisig::ledger::TxId;
use crate::multisig::wallet::MultiSigWallet;
use chrono::{DateTime, Duration, TimeZone, Utc};

pub const ETHER: u128 = 1_000_000_000_000_000_000;

pub fn addr(name: &str) -> Address {
    Address::new(name)
}

pub fn start() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap()
}

/// Owners a..e, 3 confirmations, 2 ether per day, empty balance
pub fn wallet() -> MultiSigWallet {
    let owners = ["a", "b", "c", "d", "e"].iter().map(|n| addr(n)).collect();
    MultiSigWallet::new(owners, 3, 2 * ETHER, start()).unwrap()
}

/// Same as [`wallet`], holding 10 ether
pub fn funded_wallet() -> MultiSigWallet {
    let mut wallet = wallet();
    wallet
        .deposit(&addr("deployer"), 10 * ETHER, &TestEnv::new())
        .unwrap();
    wallet
}

/// What the environment does with the wallet during its next call
pub enum Reentry {
    Execute {
        caller: Address,
        id: TxId,
    },
    Submit {
        caller: Address,
        destination: Address,
        value: u128,
    },
}

/// Manual clock plus a recording call target
pub struct TestEnv {
    pub now: DateTime<Utc>,
    pub calls: Vec<(Address, u128, Vec<u8>)>,
    pub reject: bool,
    pub reentry: Option<Reentry>,
    pub reentry_results: Vec<Result<ExecutionOutcome>>,
}

impl TestEnv {
    pub fn new() -> Self {
        Self {
            now: start(),
            calls: Vec::new(),
            reject: false,
            reentry: None,
            reentry_results: Vec::new(),
        }
    }

    pub fn advance_days(&mut self, days: i64) {
        self.now = self.now + Duration::days(days);
    }
}

impl Environment for TestEnv {
    fn now(&self) -> DateTime<Utc> {
        self.now
    }

    fn call(
        &mut self,
        wallet: &mut MultiSigWallet,
        destination: &Address,
        value: u128,
        payload: &[u8],
    ) -> std::result::Result<(), CallError> {
        self.calls
            .push((destination.clone(), value, payload.to_vec()));

        match self.reentry.take() {
            Some(Reentry::Execute { caller, id }) => {
                let result = wallet.execute_transaction(&caller, id, self);
                self.reentry_results.push(result);
            }
            Some(Reentry::Submit {
                caller,
                destination,
                value,
            }) => {
                let result = wallet
                    .submit_transaction(&caller, destination, value, vec![], self)
                    .map(|submission| submission.outcome);
                self.reentry_results.push(result);
            }
            None => {}
        }

        if self.reject {
            return Err(CallError::Rejected("test rejection".to_string()));
        }
        Ok(())
    }
}
