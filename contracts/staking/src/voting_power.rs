//! Time-weighted voting power.
//!
//! Voting power is never stored. It is re-derived from a position's balance
//! and stake start time:
//!
//! ```text
//! vp = balance * (now - stake_start) / (unit * SECONDS_PER_DAY)
//! ```
//!
//! where `unit` is one whole underlying token in base units, so 1 000 tokens
//! held for a day is worth 1 000 votes.
//!
//! Balance changes move the start time instead of touching a stored score:
//! increases average the old credit with a fresh one, decreases scale the
//! accumulated time by the fraction kept.

pub const SECONDS_PER_DAY: u64 = 86_400;

/// Smallest non-zero resolution, both for rescaled elapsed time (seconds)
/// and for reported voting power.
pub const MIN_RESOLUTION: u64 = 1;

/// Voting power of `balance` staked since `stake_start`, measured at `now`.
pub fn voting_power(balance: i128, stake_start: u64, now: u64, unit: i128) -> i128 {
    if balance <= 0 || now <= stake_start || unit <= 0 {
        return 0;
    }
    let elapsed = (now - stake_start) as i128;
    let denominator = unit.saturating_mul(SECONDS_PER_DAY as i128);
    let vp = balance.saturating_mul(elapsed) / denominator;
    if vp == 0 {
        MIN_RESOLUTION as i128
    } else {
        vp
    }
}

/// Start time after `added` joins an existing position.
///
/// The accumulated time is diluted by the incoming balance so the position's
/// voting power at `now` is unchanged; the new tokens start with no credit.
pub fn start_after_increase(old_balance: i128, old_start: u64, added: i128, now: u64) -> u64 {
    if old_balance <= 0 || old_start > now {
        return now;
    }
    let elapsed = now - old_start;
    let new_total = old_balance.saturating_add(added.max(0));
    let diluted = rescale(elapsed, old_balance, new_total);
    now - diluted
}

/// Start time after `removed` leaves a position of `old_balance`.
///
/// The accumulated time shrinks by the same fraction as the balance, so a
/// withdrawal of fraction `f` leaves `(1 - f)^2` of the voting power. A fully
/// emptied position loses its start time.
pub fn start_after_decrease(old_balance: i128, old_start: u64, removed: i128, now: u64) -> u64 {
    let remaining = old_balance.saturating_sub(removed);
    if remaining <= 0 {
        return 0;
    }
    if old_start >= now {
        return now;
    }
    let elapsed = now - old_start;
    let kept = rescale(elapsed, remaining, old_balance);
    now - kept
}

/// `elapsed * numerator / denominator`, floored at [`MIN_RESOLUTION`] while
/// there is any credit left to scale.
fn rescale(elapsed: u64, numerator: i128, denominator: i128) -> u64 {
    if elapsed == 0 || denominator <= 0 || numerator <= 0 {
        return 0;
    }
    let scaled = (elapsed as i128).saturating_mul(numerator) / denominator;
    let scaled = scaled.min(elapsed as i128) as u64;
    scaled.max(MIN_RESOLUTION)
}
