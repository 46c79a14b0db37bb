//! Linear-vesting reward streams.
//!
//! Each reward token owns one [`RewardStream`]. Deposits are vested linearly
//! over a fixed window and distributed through a per-share accumulator
//! (`acc_per_share`, scaled by [`ACC_PRECISION`]). Accounts keep an
//! [`AccountRewardState`] checkpoint that is refreshed before every balance
//! change, so `pending` only ever multiplies a balance that was constant since
//! the last checkpoint.
//!
//! Topping up a running stream never drops the unvested remainder: it is
//! folded into the next window together with the new funds. Division
//! remainders are carried too, both on the stream (`acc_remainder`) and on
//! each account (`fraction`), so rounding dust is paid out by later
//! distributions instead of staying in escrow.

use common::{mul_div, mul_div_rem};
use soroban_sdk::{contracttype, Address};

/// Fixed-point scale of `acc_per_share`.
pub const ACC_PRECISION: i128 = 1_000_000_000_000_000_000;

/// Streaming state for one reward token.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct RewardStream {
    pub token: Address,
    pub whitelisted: bool,
    /// Bumped each time the token is retired; checkpoints from an older epoch
    /// are ignored.
    pub epoch: u32,
    pub stream_start: u64,
    pub stream_end: u64,
    /// Amount vesting between `stream_start` and `stream_end`.
    pub stream_total: i128,
    /// Vesting has been distributed up to this instant.
    pub last_update: u64,
    /// Funds already committed to a stream, vested or not, and not yet claimed.
    pub escrow: i128,
    pub acc_per_share: i128,
    /// Scaled vesting not yet reflected in `acc_per_share`, always below the
    /// staked total it was divided by.
    pub acc_remainder: i128,
}

/// Per-account checkpoint for one reward token.
#[contracttype]
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct AccountRewardState {
    pub epoch: u32,
    /// `acc_per_share` at the account's last checkpoint.
    pub debt: i128,
    /// Claimable credit materialised so far.
    pub accrued: i128,
    /// Sub-unit credit scaled by [`ACC_PRECISION`].
    pub fraction: i128,
}

impl RewardStream {
    pub fn new(token: Address) -> Self {
        Self {
            token,
            whitelisted: true,
            epoch: 0,
            stream_start: 0,
            stream_end: 0,
            stream_total: 0,
            last_update: 0,
            escrow: 0,
            acc_per_share: 0,
            acc_remainder: 0,
        }
    }

    /// Cumulative amount vested by `at`.
    pub fn vested_at(&self, at: u64) -> i128 {
        if self.stream_total <= 0 {
            return 0;
        }
        if self.stream_end <= self.stream_start || at >= self.stream_end {
            return self.stream_total;
        }
        if at <= self.stream_start {
            return 0;
        }
        mul_div(
            self.token.env(),
            self.stream_total,
            (at - self.stream_start) as i128,
            (self.stream_end - self.stream_start) as i128,
        )
    }

    /// True while part of the stream has not been distributed yet.
    pub fn is_active(&self) -> bool {
        self.stream_total > 0 && self.last_update < self.stream_end
    }

    /// Amount still waiting to vest as of `last_update`.
    pub fn unvested(&self) -> i128 {
        if !self.is_active() {
            return 0;
        }
        self.stream_total - self.vested_at(self.last_update)
    }

    pub fn rate_per_second(&self) -> i128 {
        if self.stream_end <= self.stream_start {
            return 0;
        }
        self.stream_total / (self.stream_end - self.stream_start) as i128
    }

    /// Distributes everything vested up to `now` across `total_staked`.
    ///
    /// With nobody staked the stream is paused: its window slides forward by
    /// the idle time so the remainder is not vested to an empty pool.
    pub fn settle(&mut self, total_staked: i128, now: u64) {
        if now <= self.last_update || !self.is_active() {
            return;
        }
        if total_staked <= 0 {
            let idle = now - self.last_update;
            self.stream_start = self.stream_start.saturating_add(idle);
            self.stream_end = self.stream_end.saturating_add(idle);
            self.last_update = now;
            return;
        }
        let to = now.min(self.stream_end);
        let delta = self.vested_at(to) - self.vested_at(self.last_update);
        if delta > 0 {
            let (step, rem) = mul_div_rem(self.token.env(), delta, ACC_PRECISION, total_staked);
            let carried = rem.saturating_add(self.acc_remainder);
            self.acc_per_share = self
                .acc_per_share
                .saturating_add(step)
                .saturating_add(carried / total_staked);
            self.acc_remainder = carried % total_staked;
        }
        self.last_update = to;
    }

    /// Starts a fresh window at `now` carrying the unvested remainder plus
    /// `new_funds`. The stream must already be settled to `now`.
    pub fn restart(&mut self, new_funds: i128, now: u64, window: u64) {
        let carried = self.unvested();
        self.stream_start = now;
        self.stream_end = now.saturating_add(window);
        self.stream_total = carried.saturating_add(new_funds);
        self.last_update = now;
        self.escrow = self.escrow.saturating_add(new_funds);
    }

    /// Takes the token off the whitelist and resets its accounting. Any
    /// remaining sub-dust escrow is released for a future distribution.
    pub fn retire(&mut self) {
        self.whitelisted = false;
        self.epoch = self.epoch.saturating_add(1);
        self.stream_start = 0;
        self.stream_end = 0;
        self.stream_total = 0;
        self.last_update = 0;
        self.escrow = 0;
        self.acc_per_share = 0;
        self.acc_remainder = 0;
    }

    /// Whole and fractional credit of an account holding `balance` since
    /// `state`.
    fn credit(&self, state: &AccountRewardState, balance: i128) -> (i128, i128) {
        let (debt, accrued, fraction) = if state.epoch == self.epoch {
            (state.debt, state.accrued, state.fraction)
        } else {
            (0, 0, 0)
        };
        let delta = self.acc_per_share.saturating_sub(debt).max(0);
        let (earned, rem) = mul_div_rem(self.token.env(), balance.max(0), delta, ACC_PRECISION);
        let fraction = fraction.saturating_add(rem);
        (
            accrued
                .saturating_add(earned)
                .saturating_add(fraction / ACC_PRECISION),
            fraction % ACC_PRECISION,
        )
    }

    /// Claimable credit of an account holding `balance` since `state`.
    pub fn pending(&self, state: &AccountRewardState, balance: i128) -> i128 {
        self.credit(state, balance).0
    }

    /// Rolls `pending` into a new checkpoint at the current accumulator.
    pub fn checkpoint(&self, state: &AccountRewardState, balance: i128) -> AccountRewardState {
        let (accrued, fraction) = self.credit(state, balance);
        AccountRewardState {
            epoch: self.epoch,
            debt: self.acc_per_share,
            accrued,
            fraction,
        }
    }
}
