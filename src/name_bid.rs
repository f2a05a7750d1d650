multiversx_sc::imports!();

use crate::constants::{
    MAX_BID_NAME_LENGTH, MIN_BID_INCREMENT_DIVISOR, NAME_BID_CLOSE_AGE, NAME_BID_MIN_ACTIVATION_AGE,
    SLOTS_PER_DAY,
};
use crate::types::{GlobalState, NameBid, Pool};

/// Premium names: 1 to 11 characters from `a-z`, `1-5` and `.`.
pub fn is_valid_bid_name(name: &[u8]) -> bool {
    !name.is_empty()
        && name.len() <= MAX_BID_NAME_LENGTH
        && name
            .iter()
            .all(|c| matches!(c, b'a'..=b'z' | b'1'..=b'5' | b'.'))
}

#[multiversx_sc::module]
pub trait NameAuctionModule:
    crate::storage::StorageModule + crate::events::EventsModule + crate::core_token::CoreTokenModule
{
    // ========================================================
    // ENDPOINT: bidname
    // The outbid bidder is refunded from the name-bid pool.
    // ========================================================

    #[payable("*")]
    #[endpoint(bidname)]
    fn bidname(&self, newname: ManagedBuffer) {
        let bidder = self.blockchain().get_caller();
        let payment = self.receive_core_payment();
        let bid = i64::try_from(payment).unwrap_or_else(|_| sc_panic!("bid is too large"));

        let len = newname.len();
        require!(len > 0 && len <= MAX_BID_NAME_LENGTH, "invalid name length");
        let mut buffer = [0u8; MAX_BID_NAME_LENGTH];
        let name_bytes = &mut buffer[..len];
        require!(newname.load_slice(0, name_bytes).is_ok(), "invalid name");
        require!(is_valid_bid_name(name_bytes), "name may only contain a-z, 1-5 and '.'");

        let now = self.blockchain().get_block_timestamp();
        self.credit_pool(Pool::Names, payment);

        let bid_mapper = self.name_bids(&newname);
        if bid_mapper.is_empty() {
            bid_mapper.set(NameBid {
                newname: newname.clone(),
                high_bidder: bidder.clone(),
                high_bid: bid,
                last_bid_time: now,
            });
            self.bid_names().insert(newname.clone());
        } else {
            let mut current = bid_mapper.get();
            require!(current.high_bid > 0, "this auction has already closed");
            require!(
                bid - current.high_bid > current.high_bid / MIN_BID_INCREMENT_DIVISOR,
                "must increase bid by 10%"
            );
            require!(current.high_bidder != bidder, "account is already highest bidder");

            self.pay_from_pool(Pool::Names, &current.high_bidder, current.high_bid as u64);

            current.high_bidder = bidder.clone();
            current.high_bid = bid;
            current.last_bid_time = now;
            bid_mapper.set(current);
        }

        self.bidname_event(&bidder, &newname, payment);
    }

    /// Daily close of the highest open auction, once its last bid is a day
    /// old and the chain has been active for two weeks. The bid is negated,
    /// not erased, so the row records the winner.
    fn close_highest_bid(&self, gstate: &mut GlobalState, slot: u32, now: u64) {
        if slot.saturating_sub(gstate.last_name_close) <= SLOTS_PER_DAY {
            return;
        }

        let mut highest: Option<NameBid<Self::Api>> = None;
        for name in self.bid_names().iter() {
            let bid = self.name_bids(&name).get();
            let outbids = match &highest {
                Some(best) => bid.high_bid > best.high_bid,
                None => true,
            };
            if outbids {
                highest = Some(bid);
            }
        }

        let mut bid = match highest {
            Some(bid) => bid,
            None => return,
        };

        let activated_long_enough = gstate.thresh_activated_votes_time > 0
            && now.saturating_sub(gstate.thresh_activated_votes_time) > NAME_BID_MIN_ACTIVATION_AGE;
        if bid.high_bid > 0 && bid.last_bid_time < now.saturating_sub(NAME_BID_CLOSE_AGE) && activated_long_enough {
            gstate.last_name_close = slot;
            bid.high_bid = -bid.high_bid;
            self.name_bids(&bid.newname).set(&bid);
            self.name_closed_event(&bid.newname, &bid.high_bidder);
        }
    }

    #[view(getNameBid)]
    fn get_name_bid(&self, newname: ManagedBuffer) -> OptionalValue<NameBid<Self::Api>> {
        let mapper = self.name_bids(&newname);
        if mapper.is_empty() {
            OptionalValue::None
        } else {
            OptionalValue::Some(mapper.get())
        }
    }
}
