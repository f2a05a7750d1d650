multiversx_sc::imports!();

use crate::constants::{
    MAX_COMMISSION_ADJUSTMENT_PPM, MAX_COMMISSION_RATE, MAX_URL_LENGTH, MIN_COMMISSION_ADJUSTMENT_PERIOD,
    MIN_COMMISSION_RATE, VOTE_UNIT,
};
use crate::math::{add, sub};
use crate::types::{GlobalState, ProducerInfo, VoteInfo, VoterInfo};
use crate::voteage;

/// Relative change from `old_rate` to `new_rate`, in parts per million.
///
/// Negative for any decrease, so the decrease check in `regproducer` never
/// rejects. TODO: bound decreases by the magnitude of this ratio once the
/// intended adjustment limit is settled.
pub fn commission_adjustment_ppm(old_rate: u32, new_rate: u32) -> i64 {
    (new_rate as i64 - old_rate as i64) * 1_000_000 / old_rate as i64
}

#[multiversx_sc::module]
pub trait VotingModule:
    crate::storage::StorageModule
    + crate::events::EventsModule
    + crate::core_token::CoreTokenModule
    + crate::rewards::RewardsModule
{
    // ========================================================
    // ENDPOINT: regproducer
    // Registers the caller, or updates and reactivates it.
    // ========================================================

    #[endpoint(regproducer)]
    fn regproducer(&self, producer_key: ManagedBuffer, url: ManagedBuffer, location: u16, commission_rate: u32) {
        require!(url.len() < MAX_URL_LENGTH, "url too long");
        require!(
            !producer_key.is_empty(),
            "public key should not be the default value"
        );
        require!(
            (MIN_COMMISSION_RATE..=MAX_COMMISSION_RATE).contains(&commission_rate),
            "commission rate should >=1 and <= 10000"
        );

        let producer = self.blockchain().get_caller();
        let now = self.blockchain().get_block_timestamp();
        let prod_mapper = self.producer_info(&producer);

        if prod_mapper.is_empty() {
            prod_mapper.set(ProducerInfo {
                owner: producer.clone(),
                total_votes: 0,
                producer_key,
                is_active: true,
                url: url.clone(),
                unpaid_blocks: 0,
                commission_rate,
                last_commission_rate_adjustment_time: now,
                location,
                total_voteage: 0,
                voteage_update_time: now,
                rewards_producer_balance: 0,
                rewards_voters_balance: 0,
            });
            self.producers().insert(producer.clone());
        } else {
            let existing = prod_mapper.get();
            let current_rate = existing.commission_rate;
            let rate_changed = current_rate != commission_rate;

            if rate_changed {
                require!(
                    now.saturating_sub(existing.last_commission_rate_adjustment_time)
                        > MIN_COMMISSION_ADJUSTMENT_PERIOD,
                    "The commission ratio has been adjusted, please try again later"
                );
                if current_rate > commission_rate {
                    require!(
                        commission_adjustment_ppm(current_rate, commission_rate) <= MAX_COMMISSION_ADJUSTMENT_PPM,
                        "The commission ratio does not meet the adjustment requirements. Please try again after adjustment"
                    );
                }

                // Pending rewards are split at the old rate.
                self.distribute_if_activated(now);
            }

            // Reloaded: distribution may have credited this producer.
            let mut info = prod_mapper.get();
            info.producer_key = producer_key;
            info.is_active = true;
            info.url = url.clone();
            info.location = location;
            if rate_changed {
                info.commission_rate = commission_rate;
                info.last_commission_rate_adjustment_time = now;
            }
            prod_mapper.set(info);
        }

        self.regproducer_event(&producer, commission_rate, &url);
    }

    // ========================================================
    // ENDPOINT: unregprod
    // ========================================================

    #[endpoint(unregprod)]
    fn unregprod(&self) {
        let producer = self.blockchain().get_caller();
        let prod_mapper = self.producer_info(&producer);
        require!(!prod_mapper.is_empty(), "producer not found");

        let now = self.blockchain().get_block_timestamp();
        self.distribute_if_activated(now);

        self.deactivate_producer(&producer);
    }

    #[only_owner]
    #[endpoint(rmvproducer)]
    fn rmvproducer(&self, producer: ManagedAddress) {
        require!(!self.producer_info(&producer).is_empty(), "producer not found");
        self.deactivate_producer(&producer);
    }

    // ========================================================
    // ENDPOINT: voteproducer
    // Sets the caller's vote on `producer` to `vote_num`; only
    // the difference moves between the voter and the producer.
    // ========================================================

    #[endpoint(voteproducer)]
    fn voteproducer(&self, producer: ManagedAddress, vote_num: u64) {
        require!(
            vote_num > 0 && vote_num % VOTE_UNIT == 0,
            "The number of votes must be an integer"
        );

        let voter_name = self.blockchain().get_caller();
        let now = self.blockchain().get_block_timestamp();

        let voter_mapper = self.voters(&voter_name);
        require!(!voter_mapper.is_empty(), "user must stake before they can vote");
        let mut voter = voter_mapper.get();
        require!(
            vote_num <= voter.staked_balance,
            "the balance available for the vote is insufficient"
        );

        let prod_mapper = self.producer_info(&producer);
        require!(!prod_mapper.is_empty(), "producer is not registered");
        let mut prod = prod_mapper.get();

        let vote_mapper = self.votes(&voter_name, &producer);
        let previous_votes = if vote_mapper.is_empty() {
            vote_mapper.set(VoteInfo {
                producer_name: producer.clone(),
                vote_num,
                voteage_update_time: now,
                voteage: 0,
            });
            self.voted_producers(&voter_name).insert(producer.clone());
            0
        } else {
            let mut vote = vote_mapper.get();
            let previous = vote.vote_num;
            vote.voteage = voteage::refresh(vote.voteage, previous, vote.voteage_update_time, now)
                .unwrap_or_else(|err| sc_panic!(err.message()));
            vote.voteage_update_time = now;
            vote.vote_num = vote_num;
            vote_mapper.set(vote);
            previous
        };

        prod.total_voteage = voteage::refresh(prod.total_voteage, prod.total_votes, prod.voteage_update_time, now)
            .unwrap_or_else(|err| sc_panic!(err.message()));
        prod.voteage_update_time = now;

        let mut gstate = self.global_state().get();
        if vote_num >= previous_votes {
            let increase = vote_num - previous_votes;
            voter.staked_balance -= increase;
            prod.total_votes = add(prod.total_votes, increase).unwrap_or_else(|err| sc_panic!(err.message()));
            gstate.total_activated_votes = add(gstate.total_activated_votes, increase)
                .unwrap_or_else(|err| sc_panic!(err.message()));
        } else {
            let decrease = previous_votes - vote_num;
            voter.staked_balance = add(voter.staked_balance, decrease).unwrap_or_else(|err| sc_panic!(err.message()));
            prod.total_votes = sub(prod.total_votes, decrease).unwrap_or_else(|err| sc_panic!(err.message()));
            gstate.total_activated_votes = sub(gstate.total_activated_votes, decrease)
                .unwrap_or_else(|err| sc_panic!(err.message()));
        }

        self.latch_activation(&mut gstate, now);

        let total_votes = prod.total_votes;
        voter_mapper.set(voter);
        prod_mapper.set(prod);
        self.global_state().set(gstate);

        self.voteproducer_event(&voter_name, &producer, vote_num, total_votes);
    }

    // ========================================================
    // Internal
    // ========================================================

    /// Records the first time activated votes reach the threshold.
    fn latch_activation(&self, gstate: &mut GlobalState, now: u64) {
        if gstate.thresh_activated_votes_time == 0 && self.chain_activated(gstate) {
            gstate.thresh_activated_votes_time = now;
            self.chain_activated_event(gstate.total_activated_votes, now);
        }
    }

    fn distribute_if_activated(&self, now: u64) {
        let mut gstate = self.global_state().get();
        if self.chain_activated(&gstate) {
            self.distribute_rewards(&mut gstate, now);
            self.global_state().set(gstate);
        }
    }

    fn deactivate_producer(&self, producer: &ManagedAddress) {
        self.producer_info(producer).update(|info| info.deactivate());
        self.producer_deactivated_event(producer);
    }

    // ========================================================
    // VIEWS
    // ========================================================

    #[view(getVoter)]
    fn get_voter(&self, voter: ManagedAddress) -> OptionalValue<VoterInfo<Self::Api>> {
        let mapper = self.voters(&voter);
        if mapper.is_empty() {
            OptionalValue::None
        } else {
            OptionalValue::Some(mapper.get())
        }
    }

    #[view(getVotes)]
    fn get_votes(&self, voter: ManagedAddress) -> MultiValueEncoded<VoteInfo<Self::Api>> {
        let mut result = MultiValueEncoded::new();
        for producer in self.voted_producers(&voter).iter() {
            result.push(self.votes(&voter, &producer).get());
        }
        result
    }

    #[view(getProducer)]
    fn get_producer(&self, producer: ManagedAddress) -> OptionalValue<ProducerInfo<Self::Api>> {
        let mapper = self.producer_info(&producer);
        if mapper.is_empty() {
            OptionalValue::None
        } else {
            OptionalValue::Some(mapper.get())
        }
    }

    #[view(getProducers)]
    fn get_producers(&self, from: u64, count: u64) -> MultiValueEncoded<ProducerInfo<Self::Api>> {
        let mut result = MultiValueEncoded::new();
        for producer in self.producers().iter().skip(from as usize).take(count as usize) {
            result.push(self.producer_info(&producer).get());
        }
        result
    }
}
