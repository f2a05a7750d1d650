//! Merging stake changes into an account's pending refund.

use crate::error::{PlatformError, Result};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StakeDirection {
    Delegate,
    Undelegate,
}

/// Net and cpu magnitudes of one stake change; the direction carries the sign.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct StakeChange {
    pub direction: StakeDirection,
    pub net: u64,
    pub cpu: u64,
}

impl StakeChange {
    pub fn new(direction: StakeDirection, net: u64, cpu: u64) -> Result<Self> {
        if net == 0 && cpu == 0 {
            return Err(PlatformError::ZeroStake);
        }
        net.checked_add(cpu).ok_or(PlatformError::Overflow)?;
        Ok(StakeChange { direction, net, cpu })
    }

    pub fn total(&self) -> u64 {
        self.net + self.cpu
    }

    /// Applies the change to a (net, cpu) weight pair.
    pub fn apply_to(&self, net_weight: u64, cpu_weight: u64) -> Result<(u64, u64)> {
        match self.direction {
            StakeDirection::Delegate => Ok((
                net_weight.checked_add(self.net).ok_or(PlatformError::Overflow)?,
                cpu_weight.checked_add(self.cpu).ok_or(PlatformError::Overflow)?,
            )),
            StakeDirection::Undelegate => Ok((
                net_weight
                    .checked_sub(self.net)
                    .ok_or(PlatformError::InsufficientNetStake)?,
                cpu_weight
                    .checked_sub(self.cpu)
                    .ok_or(PlatformError::InsufficientCpuStake)?,
            )),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PendingRefund {
    pub request_time: u64,
    pub net_amount: u64,
    pub cpu_amount: u64,
}

impl PendingRefund {
    pub fn total(&self) -> u64 {
        self.net_amount.saturating_add(self.cpu_amount)
    }

    pub fn is_empty(&self) -> bool {
        self.net_amount == 0 && self.cpu_amount == 0
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RefundState {
    /// The refund row was not involved.
    Untouched,
    Open(PendingRefund),
    /// The row is fully offset and must be erased.
    Closed,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RefundUpdate {
    pub state: RefundState,
    /// A payout task must be (re)scheduled.
    pub reschedule: bool,
    /// Stake that still has to be paid into the stake pool.
    pub net_to_stake: u64,
    pub cpu_to_stake: u64,
}

impl RefundUpdate {
    pub fn to_stake(&self) -> u64 {
        self.net_to_stake + self.cpu_to_stake
    }
}

/// Folds `change` into the pending refund of the stake owner.
///
/// Undelegating adds to the refund and restarts its clock. Staking to self
/// first draws from the refund, so only the remainder needs fresh tokens.
/// Staking to others leaves the refund alone.
pub fn merge(existing: Option<PendingRefund>, change: &StakeChange, delegating_to_self: bool, now: u64) -> Result<RefundUpdate> {
    let undelegating = change.direction == StakeDirection::Undelegate;
    let (mut net_balance, mut cpu_balance) = match change.direction {
        StakeDirection::Delegate => (change.net, change.cpu),
        StakeDirection::Undelegate => (0, 0),
    };

    if !delegating_to_self && !undelegating {
        return Ok(RefundUpdate {
            state: RefundState::Untouched,
            reschedule: false,
            net_to_stake: net_balance,
            cpu_to_stake: cpu_balance,
        });
    }

    let state = match existing {
        Some(mut refund) => {
            if undelegating {
                refund.request_time = now;
                refund.net_amount = refund
                    .net_amount
                    .checked_add(change.net)
                    .ok_or(PlatformError::Overflow)?;
                refund.cpu_amount = refund
                    .cpu_amount
                    .checked_add(change.cpu)
                    .ok_or(PlatformError::Overflow)?;
            } else {
                let net_drawn = refund.net_amount.min(net_balance);
                refund.net_amount -= net_drawn;
                net_balance -= net_drawn;

                let cpu_drawn = refund.cpu_amount.min(cpu_balance);
                refund.cpu_amount -= cpu_drawn;
                cpu_balance -= cpu_drawn;
            }

            if refund.is_empty() {
                RefundState::Closed
            } else {
                RefundState::Open(refund)
            }
        }
        None if undelegating => RefundState::Open(PendingRefund {
            request_time: now,
            net_amount: change.net,
            cpu_amount: change.cpu,
        }),
        None => RefundState::Untouched,
    };

    Ok(RefundUpdate {
        reschedule: matches!(state, RefundState::Open(_)),
        state,
        net_to_stake: net_balance,
        cpu_to_stake: cpu_balance,
    })
}
