// Tests for stake changes and refund merging.

use besio_platform::error::PlatformError;
use besio_platform::refund::{merge, PendingRefund, RefundState, StakeChange, StakeDirection};

const T0: u64 = 1_700_000_000;

fn delegate(net: u64, cpu: u64) -> StakeChange {
    StakeChange::new(StakeDirection::Delegate, net, cpu).unwrap()
}

fn undelegate(net: u64, cpu: u64) -> StakeChange {
    StakeChange::new(StakeDirection::Undelegate, net, cpu).unwrap()
}

fn pending(request_time: u64, net_amount: u64, cpu_amount: u64) -> PendingRefund {
    PendingRefund {
        request_time,
        net_amount,
        cpu_amount,
    }
}

#[test]
fn test_zero_change_is_rejected() {
    assert_eq!(
        StakeChange::new(StakeDirection::Delegate, 0, 0),
        Err(PlatformError::ZeroStake)
    );
    assert_eq!(
        StakeChange::new(StakeDirection::Undelegate, u64::MAX, 1),
        Err(PlatformError::Overflow)
    );
}

#[test]
fn test_undelegating_more_than_staked_fails() {
    assert_eq!(undelegate(11, 0).apply_to(10, 10), Err(PlatformError::InsufficientNetStake));
    assert_eq!(undelegate(0, 11).apply_to(10, 10), Err(PlatformError::InsufficientCpuStake));
    assert_eq!(undelegate(10, 4).apply_to(10, 10), Ok((0, 6)));
    assert_eq!(delegate(1, 2).apply_to(10, 10), Ok((11, 12)));
}

#[test]
fn test_first_undelegation_opens_refund() {
    let update = merge(None, &undelegate(30, 20), false, T0).unwrap();
    assert_eq!(update.state, RefundState::Open(pending(T0, 30, 20)));
    assert!(update.reschedule);
    assert_eq!(update.to_stake(), 0);
}

#[test]
fn test_repeated_undelegation_keeps_one_refund() {
    let first = merge(None, &undelegate(30, 0), false, T0).unwrap();
    let existing = match first.state {
        RefundState::Open(refund) => refund,
        other => panic!("unexpected {other:?}"),
    };

    let second = merge(Some(existing), &undelegate(5, 7), false, T0 + 100).unwrap();
    assert_eq!(second.state, RefundState::Open(pending(T0 + 100, 35, 7)));
    assert!(second.reschedule);
}

#[test]
fn test_restaking_to_self_draws_from_refund() {
    let update = merge(Some(pending(T0, 100, 50)), &delegate(30, 80), true, T0 + 10).unwrap();

    // The refund clock is not restarted by restaking.
    assert_eq!(update.state, RefundState::Open(pending(T0, 70, 0)));
    assert!(update.reschedule);
    assert_eq!((update.net_to_stake, update.cpu_to_stake), (0, 30));
}

#[test]
fn test_restaking_whole_refund_closes_it() {
    let update = merge(Some(pending(T0, 100, 50)), &delegate(120, 50), true, T0 + 10).unwrap();
    assert_eq!(update.state, RefundState::Closed);
    assert!(!update.reschedule);
    assert_eq!(update.to_stake(), 20);
}

#[test]
fn test_staking_to_others_leaves_refund_alone() {
    let update = merge(Some(pending(T0, 100, 50)), &delegate(10, 10), false, T0 + 10).unwrap();
    assert_eq!(update.state, RefundState::Untouched);
    assert!(!update.reschedule);
    assert_eq!(update.to_stake(), 20);
}

#[test]
fn test_staking_to_self_without_refund() {
    let update = merge(None, &delegate(10, 5), true, T0).unwrap();
    assert_eq!(update.state, RefundState::Untouched);
    assert!(!update.reschedule);
    assert_eq!(update.to_stake(), 15);
}
