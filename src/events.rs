multiversx_sc::imports!();

use crate::types::{ChainParameters, ResourceLimits};

#[multiversx_sc::module]
pub trait EventsModule {
    // ── Resources ──

    #[event("delegatebw")]
    fn delegatebw_event(
        &self,
        #[indexed] from: &ManagedAddress,
        #[indexed] receiver: &ManagedAddress,
        #[indexed] stake_net: u64,
        #[indexed] stake_cpu: u64,
        transfer: bool,
    );

    #[event("undelegatebw")]
    fn undelegatebw_event(
        &self,
        #[indexed] from: &ManagedAddress,
        #[indexed] receiver: &ManagedAddress,
        #[indexed] unstake_net: u64,
        unstake_cpu: u64,
    );

    #[event("refundPaid")]
    fn refund_paid_event(&self, #[indexed] owner: &ManagedAddress, amount: u64);

    #[event("deferredScheduled")]
    fn deferred_scheduled_event(&self, #[indexed] account: &ManagedAddress, due_time: u64);

    #[event("deferredCancelled")]
    fn deferred_cancelled_event(&self, #[indexed] account: &ManagedAddress);

    #[event("resourceLimits")]
    fn resource_limits_event(&self, #[indexed] account: &ManagedAddress, limits: &ResourceLimits);

    // ── RAM market ──

    #[event("buyram")]
    fn buyram_event(
        &self,
        #[indexed] payer: &ManagedAddress,
        #[indexed] receiver: &ManagedAddress,
        #[indexed] tokens: u64,
        #[indexed] fee: u64,
        bytes: u64,
    );

    #[event("sellram")]
    fn sellram_event(
        &self,
        #[indexed] account: &ManagedAddress,
        #[indexed] bytes: u64,
        #[indexed] fee: u64,
        tokens: u64,
    );

    #[event("ramFeeRate")]
    fn ram_fee_rate_event(
        &self,
        #[indexed] account: &ManagedAddress,
        #[indexed] last_warning_time: u64,
        fee_rate: u32,
    );

    #[event("setram")]
    fn setram_event(&self, #[indexed] old_max_ram_size: u64, max_ram_size: u64);

    // ── Producers and votes ──

    #[event("regproducer")]
    fn regproducer_event(
        &self,
        #[indexed] producer: &ManagedAddress,
        #[indexed] commission_rate: u32,
        url: &ManagedBuffer,
    );

    #[event("producerDeactivated")]
    fn producer_deactivated_event(&self, #[indexed] producer: &ManagedAddress);

    #[event("voteproducer")]
    fn voteproducer_event(
        &self,
        #[indexed] voter: &ManagedAddress,
        #[indexed] producer: &ManagedAddress,
        #[indexed] vote_num: u64,
        total_votes: u64,
    );

    #[event("chainActivated")]
    fn chain_activated_event(&self, #[indexed] total_activated_votes: u64, timestamp: u64);

    #[event("producerSchedule")]
    fn producer_schedule_event(&self, #[indexed] version: u64, size: u64);

    // ── Rewards ──

    #[event("rewardsEmitted")]
    fn rewards_emitted_event(
        &self,
        #[indexed] new_tokens: u64,
        #[indexed] perblock_bucket: u64,
        pervote_bucket: u64,
    );

    #[event("producerRewards")]
    fn producer_rewards_event(
        &self,
        #[indexed] producer: &ManagedAddress,
        #[indexed] voters_reward: u64,
        producer_reward: u64,
    );

    #[event("claimrewards")]
    fn claimrewards_event(
        &self,
        #[indexed] owner: &ManagedAddress,
        #[indexed] producer: &ManagedAddress,
        amount: u64,
    );

    // ── Name auction ──

    #[event("bidname")]
    fn bidname_event(&self, #[indexed] bidder: &ManagedAddress, #[indexed] newname: &ManagedBuffer, bid: u64);

    #[event("nameClosed")]
    fn name_closed_event(&self, #[indexed] newname: &ManagedBuffer, high_bidder: &ManagedAddress);

    // ── Administration ──

    #[event("setparams")]
    fn setparams_event(&self, params: &ChainParameters);

    #[event("setpriv")]
    fn setpriv_event(&self, #[indexed] account: &ManagedAddress, is_priv: bool);
}
