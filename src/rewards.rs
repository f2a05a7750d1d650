multiversx_sc::imports!();

use crate::constants::{CLAIM_REWARDS_PERIOD, DISTRIBUTE_REWARDS_PERIOD};
use crate::emission::{self, RewardRound};
use crate::math::add;
use crate::types::{GlobalState, Pool};
use crate::voteage;

#[multiversx_sc::module]
pub trait RewardsModule:
    crate::storage::StorageModule + crate::events::EventsModule + crate::core_token::CoreTokenModule
{
    // ========================================================
    // ENDPOINT: claimrewards
    // A producer claiming from itself takes its producer
    // balance; a voter takes a voteage share of the voter
    // balance.
    // ========================================================

    #[endpoint(claimrewards)]
    fn claimrewards(&self, producer: ManagedAddress) -> u64 {
        let owner = self.blockchain().get_caller();
        let now = self.blockchain().get_block_timestamp();

        let prod_mapper = self.producer_info(&producer);
        require!(!prod_mapper.is_empty(), "producer not found");
        let voter_mapper = self.voters(&owner);
        require!(!voter_mapper.is_empty(), "voter not found");

        let gstate = self.global_state().get();
        require!(
            self.chain_activated(&gstate),
            "not enough has been staked for producers to claim rewards"
        );

        let mut voter = voter_mapper.get();
        require!(
            now.saturating_sub(voter.last_claim_time) >= CLAIM_REWARDS_PERIOD,
            "already claimed rewards within past period"
        );

        let mut prod = prod_mapper.get();
        let amount = if owner == producer {
            let amount = prod.rewards_producer_balance;
            if amount > 0 {
                prod.rewards_producer_balance = 0;
                voter.last_claim_time = now;
            }
            amount
        } else {
            let vote_mapper = self.votes(&owner, &producer);
            require!(!vote_mapper.is_empty(), "voter has not voted for this producer yet");
            let mut vote = vote_mapper.get();

            let voter_voteage = voteage::refresh(vote.voteage, vote.vote_num, vote.voteage_update_time, now)
                .unwrap_or_else(|err| sc_panic!(err.message()));
            let total_voteage = voteage::refresh(
                prod.total_voteage,
                prod.total_votes,
                prod.voteage_update_time,
                now,
            )
            .unwrap_or_else(|err| sc_panic!(err.message()));

            let reward = voteage::voter_reward(prod.rewards_voters_balance, voter_voteage, total_voteage)
                .unwrap_or_else(|err| sc_panic!(err.message()));

            voter.last_claim_time = now;
            vote.voteage = 0;
            vote.voteage_update_time = now;
            vote_mapper.set(vote);

            prod.rewards_voters_balance -= reward;
            prod.total_voteage = total_voteage.saturating_sub(voter_voteage);
            prod.voteage_update_time = now;
            reward
        };

        prod_mapper.set(prod);
        voter_mapper.set(voter);

        self.pay_from_pool(Pool::Rewards, &owner, amount);
        self.claimrewards_event(&owner, &producer, amount);
        amount
    }

    // ========================================================
    // Distribution
    // ========================================================

    /// Periodic distribution run from the block hook.
    fn distribute_rewards_task(&self, gstate: &mut GlobalState, now: u64) {
        if gstate.last_rewards_bucket_fill > 0
            && now.saturating_sub(gstate.last_rewards_bucket_fill) >= DISTRIBUTE_REWARDS_PERIOD
        {
            self.distribute_rewards(gstate, now);
        }
    }

    /// Mints the emission since the last fill into the buckets, then
    /// apportions the buckets across active producers.
    fn distribute_rewards(&self, gstate: &mut GlobalState, now: u64) {
        require!(
            self.chain_activated(gstate),
            "cannot distribute rewards until the chain is activated (at least 15% of all tokens participate in voting)"
        );
        if gstate.last_rewards_bucket_fill == 0 {
            return;
        }

        let elapsed = now.saturating_sub(gstate.last_rewards_bucket_fill);
        let new_tokens = emission::continuous_emission(self.core_token_supply().get(), elapsed)
            .unwrap_or_else(|err| sc_panic!(err.message()));
        let (to_perblock, to_pervote) =
            emission::split_emission(new_tokens).unwrap_or_else(|err| sc_panic!(err.message()));

        self.mint_to_pool(Pool::Rewards, new_tokens);
        gstate.perblock_bucket = add(gstate.perblock_bucket, to_perblock)
            .unwrap_or_else(|err| sc_panic!(err.message()));
        gstate.pervote_bucket = add(gstate.pervote_bucket, to_pervote)
            .unwrap_or_else(|err| sc_panic!(err.message()));
        gstate.last_rewards_bucket_fill = now;
        self.rewards_emitted_event(new_tokens, gstate.perblock_bucket, gstate.pervote_bucket);

        let mut round = RewardRound::new(
            gstate.perblock_bucket,
            gstate.pervote_bucket,
            gstate.total_unpaid_blocks,
            gstate.total_activated_votes,
        );
        for producer in self.producers().iter() {
            let prod_mapper = self.producer_info(&producer);
            let mut prod = prod_mapper.get();
            if !prod.is_active {
                continue;
            }

            let payout = round
                .pay(prod.unpaid_blocks, prod.total_votes, prod.commission_rate)
                .unwrap_or_else(|err| sc_panic!(err.message()));
            prod.unpaid_blocks = 0;
            prod.rewards_voters_balance = add(prod.rewards_voters_balance, payout.voters_reward)
                .unwrap_or_else(|err| sc_panic!(err.message()));
            prod.rewards_producer_balance = add(prod.rewards_producer_balance, payout.producer_reward)
                .unwrap_or_else(|err| sc_panic!(err.message()));
            prod_mapper.set(prod);

            self.producer_rewards_event(&producer, payout.voters_reward, payout.producer_reward);
        }

        let settlement = round.settle().unwrap_or_else(|err| sc_panic!(err.message()));
        gstate.perblock_bucket = settlement.perblock_bucket;
        gstate.pervote_bucket = settlement.pervote_bucket;
        gstate.total_unpaid_blocks = settlement.total_unpaid_blocks;
    }
}
