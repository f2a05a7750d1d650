multiversx_sc::imports!();

use crate::types::{ProducerKey, ResourceLimits};

/// Requests the contract makes of the node: quotas, producer schedules and
/// privileges are recorded here and announced through events.
#[multiversx_sc::module]
pub trait HostModule: crate::storage::StorageModule + crate::events::EventsModule {
    fn set_resource_limits(&self, account: &ManagedAddress, ram_bytes: u64, net_weight: u64, cpu_weight: u64) {
        let limits = ResourceLimits {
            ram_bytes,
            net_weight,
            cpu_weight,
        };
        self.resource_limits(account).set(limits);
        self.resource_limits_event(account, &limits);
    }

    /// Replaces the proposed schedule and returns its version.
    fn set_proposed_producers(&self, producers: &ManagedVec<ProducerKey<Self::Api>>) -> u64 {
        let mut schedule = self.proposed_schedule();
        schedule.clear();
        for producer in producers.iter() {
            schedule.push(&producer);
        }

        let version = self.schedule_version().update(|version| {
            *version += 1;
            *version
        });
        self.producer_schedule_event(version, producers.len() as u64);
        version
    }

    fn ram_used_bytes(&self, account: &ManagedAddress) -> u64 {
        self.ram_usage(account).get()
    }

    #[only_owner]
    #[endpoint(setpriv)]
    fn setpriv(&self, account: ManagedAddress, is_priv: bool) {
        if is_priv {
            self.privileged(&account).set(true);
        } else {
            self.privileged(&account).clear();
        }
        self.setpriv_event(&account, is_priv);
    }
}
