//! Daily spending limit
//!
//! Tracks how much value left the wallet through the daily-limit path in
//! the current day window. There is no timer: the window rolls over lazily
//! the first time it is consulted on a later day.

use crate::multisig::error::{Result, WalletError};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Length of a limit window
pub const SECONDS_PER_DAY: i64 = 86_400;

/// Day index of a timestamp (days since the Unix epoch)
pub fn day_index(now: DateTime<Utc>) -> i64 {
    now.timestamp().div_euclid(SECONDS_PER_DAY)
}

/// Limit state: cap, amount spent in the current window, window start
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct DailyLimitEngine {
    limit: u128,
    spent_today: u128,
    last_reset_day: i64,
}

impl DailyLimitEngine {
    pub fn new(limit: u128, today: i64) -> Self {
        Self {
            limit,
            spent_today: 0,
            last_reset_day: today,
        }
    }

    pub fn current_limit(&self) -> u128 {
        self.limit
    }

    /// Stored counter, without applying a pending rollover
    pub fn spent_today(&self) -> u128 {
        self.spent_today
    }

    pub fn last_reset_day(&self) -> i64 {
        self.last_reset_day
    }

    /// Remaining allowance in the stored window
    pub fn remaining(&self) -> u128 {
        self.limit.saturating_sub(self.spent_today)
    }

    /// Spent amount as it would read on `today`, without mutating
    pub fn spent_on(&self, today: i64) -> u128 {
        if today > self.last_reset_day {
            0
        } else {
            self.spent_today
        }
    }

    /// Window start as it would read on `today`, without mutating
    pub fn last_reset_day_on(&self, today: i64) -> i64 {
        self.last_reset_day.max(today)
    }

    /// Remaining allowance as it would read on `today`, without mutating
    pub fn remaining_on(&self, today: i64) -> u128 {
        self.limit.saturating_sub(self.spent_on(today))
    }

    /// Start a new window if `today` is past the stored one
    ///
    /// A clock that moves backwards never resets the window. Returns true
    /// when a reset happened.
    pub(crate) fn roll_over(&mut self, today: i64) -> bool {
        if today > self.last_reset_day {
            self.last_reset_day = today;
            self.spent_today = 0;
            return true;
        }
        false
    }

    /// Whether `value` fits in what is left of today's allowance
    pub(crate) fn is_under_limit(&mut self, value: u128, today: i64) -> bool {
        self.roll_over(today);
        value <= self.remaining()
    }

    /// Debit `value` from today's allowance
    pub(crate) fn spend(&mut self, value: u128) -> Result<()> {
        let remaining = self.remaining();
        if value > remaining {
            return Err(WalletError::LimitExceeded {
                requested: value,
                remaining,
            });
        }
        self.spent_today += value;
        Ok(())
    }

    /// Set a new cap
    ///
    /// Lowering the cap below today's spending leaves nothing to spend for
    /// the rest of the window; the counter is capped at the new limit.
    pub(crate) fn change_limit(&mut self, limit: u128) {
        self.limit = limit;
        self.spent_today = self.spent_today.min(limit);
    }
}
