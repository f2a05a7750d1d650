//! Usage-dependent RAM trade fee.
//!
//! Accounts holding mostly unused RAM pay the basis rate until a warning has
//! aged [`RAM_PUNITIVE_FEE_WARNING_PERIODS`] penalty periods; from then on the
//! rate follows `max_rate * exp(-10 / (unused_ratio * periods))`.

use crate::constants::{
    BPS_DENOMINATOR, RAM_PUNITIVE_EXPONENT, RAM_PUNITIVE_FEE_PERIOD,
    RAM_PUNITIVE_FEE_WARNING_PERIODS, RAM_PUNITIVE_UNUSED_BPS, RAM_TRADE_BASIS_FEE_BPS,
    RAM_TRADE_MAX_FEE_BPS,
};
use crate::math::{exp_neg_fixed, FIXED_ONE};

/// Fee controller fields persisted on the account's resource row.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RamFeeState {
    /// Basis points.
    pub fee_rate: u32,
    /// Zero when the account is not under warning.
    pub last_warning_time: u64,
    pub last_update_time: u64,
}

/// Recomputes the fee state of an account owning `owned_bytes`, of which the
/// host reports `used_bytes` in use.
pub fn recompute(owned_bytes: u64, used_bytes: u64, last_warning_time: u64, now: u64) -> RamFeeState {
    let unused_bytes = owned_bytes.saturating_sub(used_bytes);

    let punitive = owned_bytes != 0
        && (unused_bytes as u128) * (BPS_DENOMINATOR as u128)
            > (owned_bytes as u128) * (RAM_PUNITIVE_UNUSED_BPS as u128);

    let (fee_rate, warning) = if !punitive {
        (RAM_TRADE_BASIS_FEE_BPS, 0)
    } else if last_warning_time == 0 {
        (RAM_TRADE_BASIS_FEE_BPS, now)
    } else {
        let periods = now.saturating_sub(last_warning_time) / RAM_PUNITIVE_FEE_PERIOD;
        let rate = if periods >= RAM_PUNITIVE_FEE_WARNING_PERIODS {
            punitive_rate(owned_bytes, unused_bytes, periods)
        } else {
            RAM_TRADE_BASIS_FEE_BPS
        };
        (rate, last_warning_time)
    };

    RamFeeState {
        fee_rate,
        last_warning_time: warning,
        last_update_time: now,
    }
}

/// `max_rate * exp(-10 / (unused/owned * periods))`, clamped to the basis and max rates.
///
/// Callers guarantee `unused_bytes > 0` and `periods > 0`.
pub fn punitive_rate(owned_bytes: u64, unused_bytes: u64, periods: u64) -> u32 {
    // 10 / (unused/owned * periods) == 10 * owned / (unused * periods)
    let denominator = (unused_bytes as u128) * (periods as u128);
    if denominator == 0 {
        return RAM_TRADE_MAX_FEE_BPS;
    }
    let exponent = (RAM_PUNITIVE_EXPONENT as u128) * (owned_bytes as u128) * FIXED_ONE / denominator;
    let factor = exp_neg_fixed(exponent);
    let rate = (RAM_TRADE_MAX_FEE_BPS as u128) * factor / FIXED_ONE;
    // rate <= RAM_TRADE_MAX_FEE_BPS since factor <= FIXED_ONE
    (rate as u32).clamp(RAM_TRADE_BASIS_FEE_BPS, RAM_TRADE_MAX_FEE_BPS)
}
