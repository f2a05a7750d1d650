//! Reward emission and its apportionment across producers.

use crate::constants::{BPS_DENOMINATOR, CONTINUOUS_RATE_BPS, PERBLOCK_RATE_BPS, SECONDS_PER_YEAR};
use crate::error::{PlatformError, Result};
use crate::math::{add, apply_bps, mul_div_floor, sub};

/// New tokens for `elapsed` seconds of continuous emission on `supply`.
pub fn continuous_emission(supply: u64, elapsed: u64) -> Result<u64> {
    let numerator = (supply as u128)
        .checked_mul(elapsed as u128)
        .and_then(|n| n.checked_mul(CONTINUOUS_RATE_BPS as u128))
        .ok_or(PlatformError::Overflow)?;
    let denominator = (BPS_DENOMINATOR as u128) * (SECONDS_PER_YEAR as u128);
    u64::try_from(numerator / denominator).map_err(|_| PlatformError::Overflow)
}

/// Splits an emission into its (per-block, per-vote) parts.
pub fn split_emission(new_tokens: u64) -> Result<(u64, u64)> {
    let perblock = apply_bps(new_tokens, PERBLOCK_RATE_BPS)?;
    Ok((perblock, new_tokens - perblock))
}

/// What one producer earns in a distribution round.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ProducerPayout {
    pub per_block_pay: u64,
    pub per_vote_pay: u64,
    /// Commission routed to the producer's voters.
    pub voters_reward: u64,
    pub producer_reward: u64,
}

/// Buckets and counters left once a round has paid every producer.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RoundSettlement {
    pub perblock_bucket: u64,
    pub pervote_bucket: u64,
    pub total_unpaid_blocks: u64,
}

/// One pass of bucket apportionment.
///
/// Each share is computed against the buckets as they stood when the round
/// opened; only the sums actually paid leave the buckets, so rounding dust
/// stays for the next round.
pub struct RewardRound {
    perblock_bucket: u64,
    pervote_bucket: u64,
    total_unpaid_blocks: u64,
    total_activated_votes: u64,
    perblock_used: u64,
    pervote_used: u64,
    blocks_used: u64,
}

impl RewardRound {
    pub fn new(
        perblock_bucket: u64,
        pervote_bucket: u64,
        total_unpaid_blocks: u64,
        total_activated_votes: u64,
    ) -> Self {
        RewardRound {
            perblock_bucket,
            pervote_bucket,
            total_unpaid_blocks,
            total_activated_votes,
            perblock_used: 0,
            pervote_used: 0,
            blocks_used: 0,
        }
    }

    pub fn pay(&mut self, unpaid_blocks: u64, total_votes: u64, commission_rate: u32) -> Result<ProducerPayout> {
        let per_block_pay = if self.total_unpaid_blocks > 0 {
            mul_div_floor(self.perblock_bucket, unpaid_blocks, self.total_unpaid_blocks)?
        } else {
            0
        };
        let per_vote_pay = if self.total_activated_votes > 0 {
            mul_div_floor(self.pervote_bucket, total_votes, self.total_activated_votes)?
        } else {
            0
        };

        self.perblock_used = add(self.perblock_used, per_block_pay)?;
        self.pervote_used = add(self.pervote_used, per_vote_pay)?;
        self.blocks_used = add(self.blocks_used, unpaid_blocks)?;

        let total = add(per_block_pay, per_vote_pay)?;
        let voters_reward = apply_bps(total, commission_rate as u64)?;
        Ok(ProducerPayout {
            per_block_pay,
            per_vote_pay,
            voters_reward,
            producer_reward: total - voters_reward,
        })
    }

    pub fn settle(self) -> Result<RoundSettlement> {
        Ok(RoundSettlement {
            perblock_bucket: sub(self.perblock_bucket, self.perblock_used)?,
            pervote_bucket: sub(self.pervote_bucket, self.pervote_used)?,
            total_unpaid_blocks: sub(self.total_unpaid_blocks, self.blocks_used)?,
        })
    }
}
