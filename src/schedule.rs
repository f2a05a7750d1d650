multiversx_sc::imports!();

use crate::election::TopProducers;
use crate::types::{GlobalState, ProducerKey};

#[multiversx_sc::module]
pub trait ScheduleModule:
    crate::storage::StorageModule + crate::events::EventsModule + crate::host::HostModule
{
    /// Elects the top active producers and proposes them, sorted by account,
    /// unless fewer qualify than the schedule in force.
    fn update_elected_producers(&self, gstate: &mut GlobalState, slot: u32) {
        gstate.last_producer_schedule_update = slot;

        let mut top = TopProducers::new();
        for producer in self.producers().iter() {
            let info = self.producer_info(&producer).get();
            top.offer(producer.to_byte_array(), info.total_votes, info.is_active);
        }

        let schedule = match top.into_schedule(gstate.last_producer_schedule_size as usize) {
            Some(schedule) if !schedule.is_empty() => schedule,
            _ => return,
        };

        let mut producers = ManagedVec::new();
        for candidate in schedule.producers() {
            let producer_name = ManagedAddress::new_from_bytes(&candidate.key);
            let info = self.producer_info(&producer_name).get();
            producers.push(ProducerKey {
                producer_name,
                block_signing_key: info.producer_key,
            });
        }

        self.set_proposed_producers(&producers);
        gstate.last_producer_schedule_size = schedule.len() as u16;
    }
}
