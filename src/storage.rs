multiversx_sc::imports!();

use crate::ram_curve::RamExchange;
use crate::types::{
    DeferredTask, DelegatedBandwidth, GlobalState, NameBid, Pool, ProducerInfo, ProducerKey,
    RefundRequest, ResourceLimits, UserResources, VoteInfo, VoterInfo,
};

/// Every table of the contract. Only the contract's own endpoints write them.
#[multiversx_sc::module]
pub trait StorageModule {
    // ── Configuration ──

    #[view(getCoreToken)]
    #[storage_mapper("coreToken")]
    fn core_token(&self) -> SingleValueMapper<TokenIdentifier>;

    #[view(getMinActivatedVotes)]
    #[storage_mapper("minActivatedVotes")]
    fn min_activated_votes(&self) -> SingleValueMapper<u64>;

    /// Activated votes have reached the threshold; gates rewards and undelegation.
    fn chain_activated(&self, gstate: &GlobalState) -> bool {
        gstate.total_activated_votes >= self.min_activated_votes().get()
    }

    // ── Global state ──

    #[view(getGlobalState)]
    #[storage_mapper("global")]
    fn global_state(&self) -> SingleValueMapper<GlobalState>;

    #[view(getRamMarket)]
    #[storage_mapper("ramMarket")]
    fn ram_market(&self) -> SingleValueMapper<RamExchange>;

    #[view(getCoreTokenSupply)]
    #[storage_mapper("coreTokenSupply")]
    fn core_token_supply(&self) -> SingleValueMapper<u64>;

    #[view(getPoolBalance)]
    #[storage_mapper("poolBalance")]
    fn pool_balance(&self, pool: Pool) -> SingleValueMapper<u64>;

    // ── Resources ──

    #[storage_mapper("userResources")]
    fn user_resources(&self, owner: &ManagedAddress) -> SingleValueMapper<UserResources<Self::Api>>;

    #[storage_mapper("delegatedBandwidth")]
    fn delegated_bandwidth(
        &self,
        from: &ManagedAddress,
        to: &ManagedAddress,
    ) -> SingleValueMapper<DelegatedBandwidth<Self::Api>>;

    #[storage_mapper("delegatedTo")]
    fn delegated_to(&self, from: &ManagedAddress) -> UnorderedSetMapper<ManagedAddress>;

    #[storage_mapper("refunds")]
    fn refunds(&self, owner: &ManagedAddress) -> SingleValueMapper<RefundRequest<Self::Api>>;

    // ── Host boundary ──

    #[view(getResourceLimits)]
    #[storage_mapper("resourceLimits")]
    fn resource_limits(&self, account: &ManagedAddress) -> SingleValueMapper<ResourceLimits>;

    #[view(getRamUsage)]
    #[storage_mapper("ramUsage")]
    fn ram_usage(&self, account: &ManagedAddress) -> SingleValueMapper<u64>;

    #[view(isPrivileged)]
    #[storage_mapper("privileged")]
    fn privileged(&self, account: &ManagedAddress) -> SingleValueMapper<bool>;

    #[view(getProposedSchedule)]
    #[storage_mapper("proposedSchedule")]
    fn proposed_schedule(&self) -> VecMapper<ProducerKey<Self::Api>>;

    #[view(getScheduleVersion)]
    #[storage_mapper("scheduleVersion")]
    fn schedule_version(&self) -> SingleValueMapper<u64>;

    #[storage_mapper("deferredTask")]
    fn deferred_task(&self, account: &ManagedAddress) -> SingleValueMapper<DeferredTask<Self::Api>>;

    #[storage_mapper("deferredAccounts")]
    fn deferred_accounts(&self) -> UnorderedSetMapper<ManagedAddress>;

    // ── Voting ──

    #[storage_mapper("voters")]
    fn voters(&self, voter: &ManagedAddress) -> SingleValueMapper<VoterInfo<Self::Api>>;

    #[storage_mapper("votes")]
    fn votes(
        &self,
        voter: &ManagedAddress,
        producer: &ManagedAddress,
    ) -> SingleValueMapper<VoteInfo<Self::Api>>;

    #[storage_mapper("votedProducers")]
    fn voted_producers(&self, voter: &ManagedAddress) -> UnorderedSetMapper<ManagedAddress>;

    #[storage_mapper("producers")]
    fn producers(&self) -> UnorderedSetMapper<ManagedAddress>;

    #[storage_mapper("producerInfo")]
    fn producer_info(&self, owner: &ManagedAddress) -> SingleValueMapper<ProducerInfo<Self::Api>>;

    // ── Name auction ──

    #[storage_mapper("nameBids")]
    fn name_bids(&self, name: &ManagedBuffer) -> SingleValueMapper<NameBid<Self::Api>>;

    #[storage_mapper("bidNames")]
    fn bid_names(&self) -> UnorderedSetMapper<ManagedBuffer>;
}
