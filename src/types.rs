multiversx_sc::imports!();
multiversx_sc::derive_imports!();

use crate::constants::DEFAULT_MAX_RAM_SIZE;
use crate::refund::PendingRefund;

// ============================================================
// Global state — chain parameters plus contract totals
// ============================================================

/// Block and transaction limits enforced by the nodes.
#[type_abi]
#[derive(TopEncode, TopDecode, NestedEncode, NestedDecode, Clone, PartialEq, Debug)]
pub struct ChainParameters {
    pub max_block_net_usage: u64,
    pub target_block_net_usage_pct: u32,
    pub max_transaction_net_usage: u32,
    pub base_per_transaction_net_usage: u32,
    pub net_usage_leeway: u32,
    pub context_free_discount_net_usage_num: u32,
    pub context_free_discount_net_usage_den: u32,
    pub max_block_cpu_usage: u32,
    pub target_block_cpu_usage_pct: u32,
    pub max_transaction_cpu_usage: u32,
    pub min_transaction_cpu_usage: u32,
    pub max_transaction_lifetime: u32,
    pub deferred_trx_expiration_window: u32,
    pub max_transaction_delay: u32,
    pub max_inline_action_size: u32,
    pub max_inline_action_depth: u16,
    pub max_authority_depth: u16,
}

impl Default for ChainParameters {
    fn default() -> Self {
        ChainParameters {
            max_block_net_usage: 1024 * 1024,
            target_block_net_usage_pct: 1_000,
            max_transaction_net_usage: 512 * 1024,
            base_per_transaction_net_usage: 12,
            net_usage_leeway: 500,
            context_free_discount_net_usage_num: 20,
            context_free_discount_net_usage_den: 100,
            max_block_cpu_usage: 200_000,
            target_block_cpu_usage_pct: 1_000,
            max_transaction_cpu_usage: 150_000,
            min_transaction_cpu_usage: 100,
            max_transaction_lifetime: 3_600,
            deferred_trx_expiration_window: 600,
            max_transaction_delay: 45 * 24 * 3_600,
            max_inline_action_size: 4 * 1024,
            max_inline_action_depth: 4,
            max_authority_depth: 6,
        }
    }
}

/// Chain-wide totals. Loaded once per action, saved once on success.
#[type_abi]
#[derive(TopEncode, TopDecode, NestedEncode, NestedDecode, Clone, PartialEq, Debug)]
pub struct GlobalState {
    pub params: ChainParameters,
    pub max_ram_size: u64,
    pub total_ram_bytes_reserved: u64,
    pub total_ram_stake: u64,
    /// Block slot of the last schedule refresh.
    pub last_producer_schedule_update: u32,
    pub last_rewards_bucket_fill: u64,
    pub pervote_bucket: u64,
    pub perblock_bucket: u64,
    /// Blocks produced but not yet paid.
    pub total_unpaid_blocks: u64,
    pub total_activated_votes: u64,
    /// Zero until activated votes first cross the threshold.
    pub thresh_activated_votes_time: u64,
    pub last_producer_schedule_size: u16,
    /// Block slot of the last name auction close.
    pub last_name_close: u32,
}

impl Default for GlobalState {
    fn default() -> Self {
        GlobalState {
            params: ChainParameters::default(),
            max_ram_size: DEFAULT_MAX_RAM_SIZE,
            total_ram_bytes_reserved: 0,
            total_ram_stake: 0,
            last_producer_schedule_update: 0,
            last_rewards_bucket_fill: 0,
            pervote_bucket: 0,
            perblock_bucket: 0,
            total_unpaid_blocks: 0,
            total_activated_votes: 0,
            thresh_activated_votes_time: 0,
            last_producer_schedule_size: 0,
            last_name_close: 0,
        }
    }
}

impl GlobalState {
    /// Bytes still available for sale under the chain cap.
    pub fn free_ram(&self) -> u64 {
        self.max_ram_size.saturating_sub(self.total_ram_bytes_reserved)
    }
}

// ============================================================
// Resources
// ============================================================

#[type_abi]
#[derive(TopEncode, TopDecode, NestedEncode, NestedDecode, Clone, PartialEq, Debug)]
pub struct UserResources<M: ManagedTypeApi> {
    pub owner: ManagedAddress<M>,
    pub net_weight: u64,
    pub cpu_weight: u64,
    pub ram_bytes: u64,
    /// Basis points.
    pub ram_trading_fee_rate: u32,
    pub ram_last_warning_time: u64,
    pub ram_info_last_update_time: u64,
}

impl<M: ManagedTypeApi> UserResources<M> {
    pub fn new(owner: ManagedAddress<M>) -> Self {
        UserResources {
            owner,
            net_weight: 0,
            cpu_weight: 0,
            ram_bytes: 0,
            ram_trading_fee_rate: 0,
            ram_last_warning_time: 0,
            ram_info_last_update_time: 0,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.net_weight == 0 && self.cpu_weight == 0 && self.ram_bytes == 0
    }
}

/// Stake `from` placed on `to`. Erased once both weights reach zero.
#[type_abi]
#[derive(TopEncode, TopDecode, NestedEncode, NestedDecode, Clone, PartialEq, Debug)]
pub struct DelegatedBandwidth<M: ManagedTypeApi> {
    pub from: ManagedAddress<M>,
    pub to: ManagedAddress<M>,
    pub net_weight: u64,
    pub cpu_weight: u64,
}

#[type_abi]
#[derive(TopEncode, TopDecode, NestedEncode, NestedDecode, Clone, PartialEq, Debug)]
pub struct RefundRequest<M: ManagedTypeApi> {
    pub owner: ManagedAddress<M>,
    pub request_time: u64,
    pub net_amount: u64,
    pub cpu_amount: u64,
}

impl<M: ManagedTypeApi> RefundRequest<M> {
    pub fn from_pending(owner: ManagedAddress<M>, pending: &PendingRefund) -> Self {
        RefundRequest {
            owner,
            request_time: pending.request_time,
            net_amount: pending.net_amount,
            cpu_amount: pending.cpu_amount,
        }
    }

    pub fn pending(&self) -> PendingRefund {
        PendingRefund {
            request_time: self.request_time,
            net_amount: self.net_amount,
            cpu_amount: self.cpu_amount,
        }
    }
}

/// Quota last pushed to the node for an account.
#[type_abi]
#[derive(TopEncode, TopDecode, NestedEncode, NestedDecode, Clone, Copy, PartialEq, Debug, Default)]
pub struct ResourceLimits {
    pub ram_bytes: u64,
    pub net_weight: u64,
    pub cpu_weight: u64,
}

// ============================================================
// Voting
// ============================================================

#[type_abi]
#[derive(TopEncode, TopDecode, NestedEncode, NestedDecode, Clone, PartialEq, Debug)]
pub struct VoterInfo<M: ManagedTypeApi> {
    pub votername: ManagedAddress<M>,
    /// Stake not yet allocated to votes.
    pub staked_balance: u64,
    pub last_claim_time: u64,
}

/// One voter's vote on one producer.
#[type_abi]
#[derive(TopEncode, TopDecode, NestedEncode, NestedDecode, Clone, PartialEq, Debug)]
pub struct VoteInfo<M: ManagedTypeApi> {
    pub producer_name: ManagedAddress<M>,
    pub vote_num: u64,
    pub voteage_update_time: u64,
    pub voteage: u64,
}

#[type_abi]
#[derive(TopEncode, TopDecode, NestedEncode, NestedDecode, Clone, PartialEq, Debug)]
pub struct ProducerInfo<M: ManagedTypeApi> {
    pub owner: ManagedAddress<M>,
    pub total_votes: u64,
    pub producer_key: ManagedBuffer<M>,
    pub is_active: bool,
    pub url: ManagedBuffer<M>,
    pub unpaid_blocks: u64,
    /// Share of rewards routed to voters, in basis points.
    pub commission_rate: u32,
    pub last_commission_rate_adjustment_time: u64,
    pub location: u16,
    pub total_voteage: u64,
    pub voteage_update_time: u64,
    pub rewards_producer_balance: u64,
    pub rewards_voters_balance: u64,
}

impl<M: ManagedTypeApi> ProducerInfo<M> {
    pub fn deactivate(&mut self) {
        self.producer_key = ManagedBuffer::new();
        self.is_active = false;
    }
}

/// Entry of a proposed producer schedule.
#[type_abi]
#[derive(TopEncode, TopDecode, NestedEncode, NestedDecode, ManagedVecItem, Clone, PartialEq, Debug)]
pub struct ProducerKey<M: ManagedTypeApi> {
    pub producer_name: ManagedAddress<M>,
    pub block_signing_key: ManagedBuffer<M>,
}

// ============================================================
// Name auction
// ============================================================

#[type_abi]
#[derive(TopEncode, TopDecode, NestedEncode, NestedDecode, Clone, PartialEq, Debug)]
pub struct NameBid<M: ManagedTypeApi> {
    pub newname: ManagedBuffer<M>,
    pub high_bidder: ManagedAddress<M>,
    /// Negative once the auction is closed and the name awaits its claim.
    pub high_bid: i64,
    pub last_bid_time: u64,
}

// ============================================================
// Deferred tasks and pools
// ============================================================

#[type_abi]
#[derive(TopEncode, TopDecode, NestedEncode, NestedDecode, Clone, Copy, PartialEq, Debug)]
pub enum DeferredAction {
    /// Pays out a matured refund request.
    Refund,
}

#[type_abi]
#[derive(TopEncode, TopDecode, NestedEncode, NestedDecode, Clone, PartialEq, Debug)]
pub struct DeferredTask<M: ManagedTypeApi> {
    pub account: ManagedAddress<M>,
    pub action: DeferredAction,
    pub due_time: u64,
}

/// Contract-held balances standing for the chain's system accounts.
#[type_abi]
#[derive(TopEncode, TopDecode, NestedEncode, NestedDecode, Clone, Copy, PartialEq, Debug)]
pub enum Pool {
    Stake,
    Ram,
    RamFee,
    Rewards,
    Names,
}
