//! Integer helpers shared by the economic kernels.
//!
//! The VM rejects floating point, so rates are basis points and the one
//! transcendental function (the punitive RAM fee) runs in 1e18 fixed point.

use crate::error::{PlatformError, Result};

/// 1.0 in fixed point.
pub const FIXED_ONE: u128 = 1_000_000_000_000_000_000;

/// Arguments above this make `exp(-x)` vanish below fixed-point resolution.
const EXP_ARGUMENT_LIMIT: u128 = 42 * FIXED_ONE;

const EXP_SERIES_TERMS: u128 = 64;

pub fn add(a: u64, b: u64) -> Result<u64> {
    a.checked_add(b).ok_or(PlatformError::Overflow)
}

pub fn sub(a: u64, b: u64) -> Result<u64> {
    a.checked_sub(b).ok_or(PlatformError::Overflow)
}

/// `floor(a * b / d)` without intermediate overflow.
pub fn mul_div_floor(a: u64, b: u64, d: u64) -> Result<u64> {
    if d == 0 {
        return Err(PlatformError::Overflow);
    }
    let q = (a as u128) * (b as u128) / (d as u128);
    u64::try_from(q).map_err(|_| PlatformError::Overflow)
}

/// `ceil(a * b / d)` without intermediate overflow.
pub fn mul_div_ceil(a: u64, b: u64, d: u64) -> Result<u64> {
    if d == 0 {
        return Err(PlatformError::Overflow);
    }
    let n = (a as u128) * (b as u128);
    let d = d as u128;
    let q = n / d + u128::from(n % d != 0);
    u64::try_from(q).map_err(|_| PlatformError::Overflow)
}

/// Applies a basis-point rate, rounding down.
pub fn apply_bps(amount: u64, bps: u64) -> Result<u64> {
    mul_div_floor(amount, bps, crate::constants::BPS_DENOMINATOR)
}

/// `e^x` for a non-negative fixed-point `x`, by Taylor series.
///
/// Returns `None` when the result does not fit the fixed-point range.
pub fn exp_fixed(x: u128) -> Option<u128> {
    let mut sum = FIXED_ONE;
    let mut term = FIXED_ONE;
    for k in 1..=EXP_SERIES_TERMS {
        let whole = (term / FIXED_ONE).checked_mul(x)?;
        let frac = (term % FIXED_ONE).checked_mul(x)? / FIXED_ONE;
        term = whole.checked_add(frac)? / k;
        if term == 0 {
            break;
        }
        sum = sum.checked_add(term)?;
    }
    Some(sum)
}

/// `e^-x` for a non-negative fixed-point `x`.
pub fn exp_neg_fixed(x: u128) -> u128 {
    if x > EXP_ARGUMENT_LIMIT {
        return 0;
    }
    match exp_fixed(x) {
        Some(e) => FIXED_ONE * FIXED_ONE / e,
        None => 0,
    }
}
