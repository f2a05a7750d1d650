#![no_std]

multiversx_sc::imports!();

pub mod constants;
pub mod core_token;
pub mod deferred;
pub mod delegate_bandwidth;
pub mod election;
pub mod emission;
pub mod error;
pub mod events;
pub mod host;
pub mod math;
pub mod name_bid;
pub mod ram_curve;
pub mod ram_fee;
pub mod ram_market;
pub mod refund;
pub mod rewards;
pub mod schedule;
pub mod storage;
pub mod types;
pub mod voteage;
pub mod voting;

use constants::{ACTIVATION_THRESHOLD_PERCENT, DEFAULT_MAX_RAM_SIZE, SCHEDULE_UPDATE_INTERVAL_SLOTS};
use ram_curve::RamExchange;
use types::{ChainParameters, GlobalState};

// ============================================================
// Contract
// ============================================================

/// System contract of the chain: bandwidth staking, the RAM market,
/// producer voting and election, block rewards and the name auction.
#[multiversx_sc::contract]
pub trait PlatformContract:
    storage::StorageModule
    + events::EventsModule
    + core_token::CoreTokenModule
    + deferred::DeferredModule
    + host::HostModule
    + delegate_bandwidth::ResourceModule
    + ram_market::RamMarketModule
    + rewards::RewardsModule
    + voting::VotingModule
    + schedule::ScheduleModule
    + name_bid::NameAuctionModule
{
    // ========================================================
    // Init / Upgrade
    // ========================================================

    /// `initial_supply` is the circulating core token supply at deployment;
    /// the activation threshold is a share of `max_supply`.
    #[init]
    fn init(&self, core_token: TokenIdentifier, initial_supply: u64, max_supply: u64, ram_token_reserve: u64) {
        require!(core_token.is_valid_esdt_identifier(), "invalid core token");
        require!(initial_supply <= max_supply, "initial supply exceeds max supply");

        let min_activated_votes = math::mul_div_floor(max_supply, ACTIVATION_THRESHOLD_PERCENT, 100)
            .unwrap_or_else(|err| sc_panic!(err.message()));
        let market = RamExchange::new(ram_token_reserve, DEFAULT_MAX_RAM_SIZE)
            .unwrap_or_else(|err| sc_panic!(err.message()));

        self.core_token().set(&core_token);
        self.core_token_supply().set(initial_supply);
        self.min_activated_votes().set(min_activated_votes);
        self.global_state().set(GlobalState::default());
        self.ram_market().set(market);
    }

    #[upgrade]
    fn upgrade(&self) {}

    // ========================================================
    // ENDPOINT: onblock
    // Called by the host for every block. `timestamp` is the
    // block slot (half seconds).
    // ========================================================

    #[only_owner]
    #[endpoint(onblock)]
    fn onblock(&self, timestamp: u32, producer: ManagedAddress) {
        let mut gstate = self.global_state().get();

        // No rewards accrue until activated stake crosses the threshold.
        if !self.chain_activated(&gstate) {
            return;
        }

        let now = self.blockchain().get_block_timestamp();
        if gstate.last_rewards_bucket_fill == 0 {
            gstate.last_rewards_bucket_fill = now;
        }

        // Bootstrap producers may not be registered.
        let prod_mapper = self.producer_info(&producer);
        if !prod_mapper.is_empty() {
            gstate.total_unpaid_blocks += 1;
            prod_mapper.update(|prod| prod.unpaid_blocks += 1);
        }

        if timestamp.saturating_sub(gstate.last_producer_schedule_update) > SCHEDULE_UPDATE_INTERVAL_SLOTS {
            self.distribute_rewards_task(&mut gstate, now);
            self.update_elected_producers(&mut gstate, timestamp);
            self.close_highest_bid(&mut gstate, timestamp, now);
        }

        self.global_state().set(gstate);
    }

    // ========================================================
    // ENDPOINT: setparams
    // ========================================================

    #[only_owner]
    #[endpoint(setparams)]
    fn setparams(&self, params: ChainParameters) {
        self.setparams_event(&params);
        self.global_state().update(|gstate| gstate.params = params);
    }
}
