multiversx_sc::imports!();

use crate::constants::MAX_ASSET_AMOUNT;
use crate::types::Pool;

/// Core token movements: payments in, pool accounting, payouts and minting.
#[multiversx_sc::module]
pub trait CoreTokenModule: crate::storage::StorageModule {
    /// Amount of the single core-token payment attached to the call.
    fn receive_core_payment(&self) -> u64 {
        let payment = self.call_value().single_esdt();
        require!(
            payment.token_identifier == self.core_token().get(),
            "only the core token is accepted"
        );
        // Amounts are u64 base units capped at the signed 64-bit asset range (2^63 - 1).
        let amount = payment
            .amount
            .to_u64()
            .filter(|amount| *amount <= MAX_ASSET_AMOUNT)
            .unwrap_or_else(|| sc_panic!("payment amount is too large"));
        require!(amount > 0, "payment must be positive");
        amount
    }

    fn credit_pool(&self, pool: Pool, amount: u64) {
        if amount == 0 {
            return;
        }
        self.pool_balance(pool).update(|balance| {
            *balance = balance
                .checked_add(amount)
                .unwrap_or_else(|| sc_panic!("pool balance overflow"));
        });
    }

    fn debit_pool(&self, pool: Pool, amount: u64) {
        if amount == 0 {
            return;
        }
        let balance = self.pool_balance(pool).get();
        require!(balance >= amount, "pool balance is insufficient");
        self.pool_balance(pool).set(balance - amount);
    }

    /// Sends tokens out of the contract without touching any pool.
    fn send_core(&self, to: &ManagedAddress, amount: u64) {
        if amount == 0 {
            return;
        }
        let token = self.core_token().get();
        self.send().direct_esdt(to, &token, 0, &BigUint::from(amount));
    }

    fn pay_from_pool(&self, pool: Pool, to: &ManagedAddress, amount: u64) {
        self.debit_pool(pool, amount);
        self.send_core(to, amount);
    }

    /// Issues fresh core tokens into `pool`; the contract holds the local mint role.
    fn mint_to_pool(&self, pool: Pool, amount: u64) {
        if amount == 0 {
            return;
        }
        let token = self.core_token().get();
        self.send().esdt_local_mint(&token, 0, &BigUint::from(amount));
        self.core_token_supply().update(|supply| {
            *supply = supply
                .checked_add(amount)
                .unwrap_or_else(|| sc_panic!("core token supply overflow"));
        });
        self.credit_pool(pool, amount);
    }
}
