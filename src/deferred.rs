multiversx_sc::imports!();

use crate::types::{DeferredAction, DeferredTask};

/// Delayed-task registry keyed by account. Holds at most one task per account;
/// the contract owner executes due tasks by calling the matching endpoint.
#[multiversx_sc::module]
pub trait DeferredModule: crate::storage::StorageModule + crate::events::EventsModule {
    fn schedule_deferred(
        &self,
        account: &ManagedAddress,
        action: DeferredAction,
        delay: u64,
        replace: bool,
    ) {
        let task_mapper = self.deferred_task(account);
        require!(
            replace || task_mapper.is_empty(),
            "a deferred task is already scheduled for this account"
        );

        let due_time = self.blockchain().get_block_timestamp().saturating_add(delay);
        task_mapper.set(DeferredTask {
            account: account.clone(),
            action,
            due_time,
        });
        self.deferred_accounts().insert(account.clone());

        self.deferred_scheduled_event(account, due_time);
    }

    /// Returns `false` when nothing was pending.
    fn cancel_deferred(&self, account: &ManagedAddress) -> bool {
        let task_mapper = self.deferred_task(account);
        if task_mapper.is_empty() {
            return false;
        }
        task_mapper.clear();
        self.deferred_accounts().swap_remove(account);

        self.deferred_cancelled_event(account);
        true
    }

    #[view(getDeferredTask)]
    fn get_deferred_task(&self, account: &ManagedAddress) -> OptionalValue<DeferredTask<Self::Api>> {
        let task_mapper = self.deferred_task(account);
        if task_mapper.is_empty() {
            OptionalValue::None
        } else {
            OptionalValue::Some(task_mapper.get())
        }
    }

    /// Tasks whose delay has elapsed, for the host to execute.
    #[view(getDueDeferredTasks)]
    fn get_due_deferred_tasks(&self) -> MultiValueEncoded<DeferredTask<Self::Api>> {
        let now = self.blockchain().get_block_timestamp();
        let mut result = MultiValueEncoded::new();
        for account in self.deferred_accounts().iter() {
            let task = self.deferred_task(&account).get();
            if task.due_time <= now {
                result.push(task);
            }
        }
        result
    }
}
