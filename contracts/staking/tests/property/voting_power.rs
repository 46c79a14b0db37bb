//! Properties of the pure voting-power calculator.
//!
//! Invariants tested:
//! - A withdrawal of fraction `f` leaves `(1 - f)^2` of the voting power,
//!   within one second of rescale rounding.
//! - Any non-empty position with elapsed time keeps non-zero voting power.
//! - Top-ups never change voting power at the instant they happen beyond
//!   rounding.

use proptest::prelude::*;
use staking::voting_power::{start_after_decrease, start_after_increase, voting_power, SECONDS_PER_DAY};

use crate::support::UNIT;

const NOW: u64 = 2_000_000_000;

fn per_vote() -> i128 {
    UNIT * SECONDS_PER_DAY as i128
}

proptest! {
    #[test]
    fn prop_decrease_is_quadratic(
        balance in 1i128..10_000_000 * UNIT,
        elapsed in 1u64..5 * 365 * SECONDS_PER_DAY,
        removed_bps in 1i128..10_000,
    ) {
        let removed = (balance * removed_bps / 10_000).max(1).min(balance - 1);
        prop_assume!(removed > 0 && removed < balance);
        let start = NOW - elapsed;
        let remaining = balance - removed;

        let new_start = start_after_decrease(balance, start, removed, NOW);
        let after = voting_power(remaining, new_start, NOW, UNIT);

        // Exact (1 - f)^2 law evaluated with a single floor.
        let ideal = (elapsed as i128) * remaining / balance * remaining / per_vote();
        let tolerance = remaining / per_vote() + 2;
        prop_assert!((after - ideal).abs() <= tolerance, "after={} ideal={}", after, ideal);
        prop_assert!(after > 0);
        prop_assert!(after <= voting_power(balance, start, NOW, UNIT));
    }

    #[test]
    fn prop_increase_preserves_power(
        balance in 1i128..10_000_000 * UNIT,
        added in 1i128..10_000_000 * UNIT,
        elapsed in 1u64..5 * 365 * SECONDS_PER_DAY,
    ) {
        let start = NOW - elapsed;
        let before = voting_power(balance, start, NOW, UNIT);

        let new_start = start_after_increase(balance, start, added, NOW);
        let after = voting_power(balance + added, new_start, NOW, UNIT);

        let tolerance = (balance + added) / per_vote() + 1;
        prop_assert!((after - before).abs() <= tolerance, "before={} after={}", before, after);
        prop_assert!(new_start <= NOW);
    }

    #[test]
    fn prop_full_exit_clears_start(
        balance in 1i128..10_000_000 * UNIT,
        elapsed in 0u64..5 * 365 * SECONDS_PER_DAY,
    ) {
        prop_assert_eq!(start_after_decrease(balance, NOW - elapsed, balance, NOW), 0);
    }
}
