//! Integer helpers shared by the staking and governance contracts.
//!
//! All arithmetic saturates instead of trapping; callers validate inputs so
//! saturation only ever guards against pathological ledgers.

use soroban_sdk::{Env, I256};

/// Denominator for every basis-point quantity.
pub const BPS_DENOMINATOR: i128 = 10_000;

/// `a * b / denominator` together with the division remainder, rounding
/// down. Products wider than 128 bits are carried out in `I256`, so the
/// result is exact whenever the quotient itself fits. Returns `(0, 0)` for a
/// zero denominator.
pub fn mul_div_rem(env: &Env, a: i128, b: i128, denominator: i128) -> (i128, i128) {
    if denominator == 0 {
        return (0, 0);
    }
    if let Some(product) = a.checked_mul(b) {
        return (product / denominator, product % denominator);
    }

    let wide_denominator = I256::from_i128(env, denominator);
    let product = I256::from_i128(env, a).mul(&I256::from_i128(env, b));
    let quotient = product.div(&wide_denominator);
    let remainder = product.sub(&quotient.mul(&wide_denominator));

    let saturated = if (a < 0) ^ (b < 0) ^ (denominator < 0) {
        i128::MIN
    } else {
        i128::MAX
    };
    (
        quotient.to_i128().unwrap_or(saturated),
        remainder.to_i128().unwrap_or(0),
    )
}

/// `a * b / denominator`, rounding down. Returns 0 for a zero denominator.
pub fn mul_div(env: &Env, a: i128, b: i128, denominator: i128) -> i128 {
    mul_div_rem(env, a, b, denominator).0
}

/// Applies a basis-point fraction to `amount`, rounding down.
///
/// Splits `amount` around the denominator so the intermediate product never
/// exceeds `i128` for any `u32` fraction.
pub fn apply_bps(amount: i128, bps: u32) -> i128 {
    let bps = bps as i128;
    let whole = amount / BPS_DENOMINATOR;
    let rest = amount % BPS_DENOMINATOR;
    whole
        .saturating_mul(bps)
        .saturating_add(rest * bps / BPS_DENOMINATOR)
}

/// Returns true when `part / whole >= bps / 10_000`, evaluated without
/// division so nothing is lost to rounding.
pub fn meets_bps(part: i128, whole: i128, bps: u32) -> bool {
    part.saturating_mul(BPS_DENOMINATOR) >= whole.saturating_mul(bps as i128)
}
