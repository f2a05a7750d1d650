multiversx_sc::imports!();

use crate::constants::REFUND_DELAY;
use crate::refund::{self, RefundState, RefundUpdate, StakeChange, StakeDirection};
use crate::types::{DeferredAction, DelegatedBandwidth, Pool, RefundRequest, UserResources, VoterInfo};

#[multiversx_sc::module]
pub trait ResourceModule:
    crate::storage::StorageModule
    + crate::events::EventsModule
    + crate::core_token::CoreTokenModule
    + crate::deferred::DeferredModule
    + crate::host::HostModule
{
    // ========================================================
    // ENDPOINT: delegatebw
    // Payment must equal net + cpu. Whatever an open refund of
    // the caller already covers is sent straight back.
    // ========================================================

    #[payable("*")]
    #[endpoint(delegatebw)]
    fn delegatebw(&self, receiver: ManagedAddress, stake_net: u64, stake_cpu: u64, transfer: bool) {
        let caller = self.blockchain().get_caller();
        let payment = self.receive_core_payment();

        require!(
            stake_net.checked_add(stake_cpu) == Some(payment),
            "payment must equal the staked net and cpu amounts"
        );
        require!(
            !transfer || caller != receiver,
            "cannot use transfer flag if delegating to self"
        );

        let change = StakeChange::new(StakeDirection::Delegate, stake_net, stake_cpu)
            .unwrap_or_else(|err| sc_panic!(err.message()));
        let update = self.change_bandwidth(&caller, &receiver, &change, transfer);

        self.send_core(&caller, change.total() - update.to_stake());

        self.delegatebw_event(&caller, &receiver, stake_net, stake_cpu, transfer);
    }

    // ========================================================
    // ENDPOINT: undelegatebw
    // Moves stake into the caller's refund; paid out after the
    // refund delay.
    // ========================================================

    #[endpoint(undelegatebw)]
    fn undelegatebw(&self, receiver: ManagedAddress, unstake_net: u64, unstake_cpu: u64) {
        let caller = self.blockchain().get_caller();
        let gstate = self.global_state().get();
        require!(
            self.chain_activated(&gstate),
            "cannot undelegate bandwidth until the chain is activated (at least 15% of all tokens participate in voting)"
        );

        let change = StakeChange::new(StakeDirection::Undelegate, unstake_net, unstake_cpu)
            .unwrap_or_else(|err| sc_panic!(err.message()));
        self.change_bandwidth(&caller, &receiver, &change, false);

        self.undelegatebw_event(&caller, &receiver, unstake_net, unstake_cpu);
    }

    // ========================================================
    // ENDPOINT: refund
    // Callable by the owner, or by the host running the
    // scheduled task.
    // ========================================================

    #[endpoint(refund)]
    fn refund(&self, owner: ManagedAddress) {
        let caller = self.blockchain().get_caller();
        require!(
            caller == owner || caller == self.blockchain().get_owner_address(),
            "only the refund owner may claim it"
        );

        let refund_mapper = self.refunds(&owner);
        require!(!refund_mapper.is_empty(), "refund request not found");
        let request = refund_mapper.get();

        let now = self.blockchain().get_block_timestamp();
        require!(
            request.request_time.saturating_add(REFUND_DELAY) <= now,
            "refund is not available yet"
        );

        let amount = request.pending().total();
        refund_mapper.clear();
        self.cancel_deferred(&owner);

        self.pay_from_pool(Pool::Stake, &owner, amount);
        self.refund_paid_event(&owner, amount);
    }

    // ========================================================
    // Internal: one stake change across every table it touches
    // ========================================================

    fn change_bandwidth(
        &self,
        source: &ManagedAddress,
        receiver: &ManagedAddress,
        change: &StakeChange,
        transfer: bool,
    ) -> RefundUpdate {
        // With `transfer` the receiver becomes the nominal owner of the stake.
        let from = if transfer { receiver.clone() } else { source.clone() };

        self.update_delegated_bandwidth(&from, receiver, change);
        self.update_user_totals(receiver, change);

        let update = self.update_refund(&from, change, !transfer && from == *receiver);
        self.credit_pool(Pool::Stake, update.to_stake());

        self.update_voter_stake(&from, change);
        update
    }

    fn update_delegated_bandwidth(&self, from: &ManagedAddress, receiver: &ManagedAddress, change: &StakeChange) {
        let del_mapper = self.delegated_bandwidth(from, receiver);
        let (net_weight, cpu_weight) = if del_mapper.is_empty() {
            (0, 0)
        } else {
            let row = del_mapper.get();
            (row.net_weight, row.cpu_weight)
        };

        let (net_weight, cpu_weight) = change
            .apply_to(net_weight, cpu_weight)
            .unwrap_or_else(|err| sc_panic!(err.message()));

        if net_weight == 0 && cpu_weight == 0 {
            del_mapper.clear();
            self.delegated_to(from).swap_remove(receiver);
        } else {
            del_mapper.set(DelegatedBandwidth {
                from: from.clone(),
                to: receiver.clone(),
                net_weight,
                cpu_weight,
            });
            self.delegated_to(from).insert(receiver.clone());
        }
    }

    fn update_user_totals(&self, receiver: &ManagedAddress, change: &StakeChange) {
        let totals_mapper = self.user_resources(receiver);
        let mut totals = if totals_mapper.is_empty() {
            UserResources::new(receiver.clone())
        } else {
            totals_mapper.get()
        };

        let (net_weight, cpu_weight) = change
            .apply_to(totals.net_weight, totals.cpu_weight)
            .unwrap_or_else(|err| sc_panic!(err.message()));
        totals.net_weight = net_weight;
        totals.cpu_weight = cpu_weight;

        self.set_resource_limits(receiver, totals.ram_bytes, totals.net_weight, totals.cpu_weight);

        if totals.is_empty() {
            totals_mapper.clear();
        } else {
            totals_mapper.set(totals);
        }
    }

    /// Folds the change into the owner's refund row and keeps exactly one
    /// payout task alive while the row is open.
    fn update_refund(&self, from: &ManagedAddress, change: &StakeChange, delegating_to_self: bool) -> RefundUpdate {
        let refund_mapper = self.refunds(from);
        let existing = if refund_mapper.is_empty() {
            None
        } else {
            Some(refund_mapper.get().pending())
        };

        let now = self.blockchain().get_block_timestamp();
        let update = refund::merge(existing, change, delegating_to_self, now)
            .unwrap_or_else(|err| sc_panic!(err.message()));

        match update.state {
            RefundState::Untouched => {}
            RefundState::Open(pending) => {
                refund_mapper.set(RefundRequest::from_pending(from.clone(), &pending));
            }
            RefundState::Closed => {
                refund_mapper.clear();
                self.cancel_deferred(from);
            }
        }

        if update.reschedule {
            self.cancel_deferred(from);
            self.schedule_deferred(from, DeferredAction::Refund, REFUND_DELAY, true);
        }
        update
    }

    fn update_voter_stake(&self, from: &ManagedAddress, change: &StakeChange) {
        let voter_mapper = self.voters(from);
        let mut voter = if voter_mapper.is_empty() {
            VoterInfo {
                votername: from.clone(),
                staked_balance: 0,
                last_claim_time: 0,
            }
        } else {
            voter_mapper.get()
        };

        voter.staked_balance = match change.direction {
            StakeDirection::Delegate => voter
                .staked_balance
                .checked_add(change.total())
                .unwrap_or_else(|| sc_panic!("voter stake overflow")),
            StakeDirection::Undelegate => voter
                .staked_balance
                .checked_sub(change.total())
                .unwrap_or_else(|| sc_panic!("stake for voting cannot be negative")),
        };
        voter_mapper.set(voter);
    }

    // ========================================================
    // VIEWS
    // ========================================================

    #[view(getUserResources)]
    fn get_user_resources(&self, owner: ManagedAddress) -> OptionalValue<UserResources<Self::Api>> {
        let mapper = self.user_resources(&owner);
        if mapper.is_empty() {
            OptionalValue::None
        } else {
            OptionalValue::Some(mapper.get())
        }
    }

    #[view(getDelegatedBandwidth)]
    fn get_delegated_bandwidth(&self, from: ManagedAddress) -> MultiValueEncoded<DelegatedBandwidth<Self::Api>> {
        let mut result = MultiValueEncoded::new();
        for to in self.delegated_to(&from).iter() {
            result.push(self.delegated_bandwidth(&from, &to).get());
        }
        result
    }

    #[view(getRefundRequest)]
    fn get_refund_request(&self, owner: ManagedAddress) -> OptionalValue<RefundRequest<Self::Api>> {
        let mapper = self.refunds(&owner);
        if mapper.is_empty() {
            OptionalValue::None
        } else {
            OptionalValue::Some(mapper.get())
        }
    }
}
