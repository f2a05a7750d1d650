//! Voteage: whole votes held, times whole [`VOTEAGE_BASIS`] periods elapsed.

use crate::constants::{VOTEAGE_BASIS, VOTE_UNIT};
use crate::error::{PlatformError, Result};

/// Voteage gained by `weight` held from `since` until `now`. A partial
/// period accrues nothing.
pub fn accrued(weight: u64, since: u64, now: u64) -> Result<u64> {
    let whole_votes = weight / VOTE_UNIT;
    let periods = now.saturating_sub(since) / VOTEAGE_BASIS;
    whole_votes.checked_mul(periods).ok_or(PlatformError::Overflow)
}

/// Brings `voteage` up to date for a weight unchanged since `since`.
pub fn refresh(voteage: u64, weight: u64, since: u64, now: u64) -> Result<u64> {
    voteage
        .checked_add(accrued(weight, since, now)?)
        .ok_or(PlatformError::Overflow)
}

/// A voter's share of a producer's voter balance, proportional to voteage.
pub fn voter_reward(voters_balance: u64, voter_voteage: u64, total_voteage: u64) -> Result<u64> {
    if total_voteage == 0 {
        return Err(PlatformError::ClaimNotAvailable);
    }
    let reward = (voters_balance as u128) * (voter_voteage as u128) / (total_voteage as u128);
    if reward > voters_balance as u128 {
        return Err(PlatformError::RewardOutOfRange);
    }
    Ok(reward as u64)
}
