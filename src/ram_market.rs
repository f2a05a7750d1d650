multiversx_sc::imports!();

use crate::constants::{BPS_DENOMINATOR, MAX_RAM_SIZE_LIMIT, RAM_TRADE_BASIS_FEE_BPS};
use crate::math::{add, apply_bps, mul_div_ceil, sub};
use crate::ram_fee::{self, RamFeeState};
use crate::types::{Pool, UserResources};

/// Token/RAM bonding-curve market with a usage-dependent trade fee.
#[multiversx_sc::module]
pub trait RamMarketModule:
    crate::storage::StorageModule
    + crate::events::EventsModule
    + crate::core_token::CoreTokenModule
    + crate::host::HostModule
{
    // ========================================================
    // ENDPOINT: buyram
    // The fee is taken before the tokens enter the curve.
    // ========================================================

    #[payable("*")]
    #[endpoint(buyram)]
    fn buyram(&self, receiver: ManagedAddress) -> u64 {
        let payer = self.blockchain().get_caller();
        let quant = self.receive_core_payment();
        self.buy_ram_for(&payer, &receiver, quant)
    }

    // ========================================================
    // ENDPOINT: buyrambytes
    // Charges the exact price of `bytes` after the fee and
    // returns the rest of the payment.
    // ========================================================

    #[payable("*")]
    #[endpoint(buyrambytes)]
    fn buyrambytes(&self, receiver: ManagedAddress, bytes: u64) -> u64 {
        require!(bytes > 0, "must purchase a positive amount");
        let payer = self.blockchain().get_caller();
        let paid = self.receive_core_payment();

        let quant = self.quote_ram_bytes(&receiver, bytes);
        require!(paid >= quant, "payment does not cover the ram price");

        let bytes_out = self.buy_ram_for(&payer, &receiver, quant);
        self.send_core(&payer, paid - quant);
        bytes_out
    }

    // ========================================================
    // ENDPOINT: sellram
    // The fee is taken from the tokens the curve pays out.
    // ========================================================

    #[endpoint(sellram)]
    fn sellram(&self, bytes: u64) -> u64 {
        require!(bytes > 0, "cannot sell negative byte");
        let account = self.blockchain().get_caller();
        let fee_rate = self.current_fee_state(&account).fee_rate;

        let res_mapper = self.user_resources(&account);
        require!(!res_mapper.is_empty(), "no resource row");
        let mut res = res_mapper.get();
        require!(res.ram_bytes >= bytes, "insufficient quota");

        let mut market = self.ram_market().get();
        let tokens_out = market
            .sell(bytes)
            .unwrap_or_else(|err| sc_panic!(err.message()));

        let mut gstate = self.global_state().get();
        gstate.total_ram_bytes_reserved = sub(gstate.total_ram_bytes_reserved, bytes)
            .unwrap_or_else(|_| sc_panic!("reserved ram cannot go negative"));
        gstate.total_ram_stake = sub(gstate.total_ram_stake, tokens_out)
            .unwrap_or_else(|_| sc_panic!("error, attempt to unstake more tokens than previously staked"));

        res.ram_bytes -= bytes;
        self.set_resource_limits(&account, res.ram_bytes, res.net_weight, res.cpu_weight);
        res_mapper.set(res);

        let fee = apply_bps(tokens_out, fee_rate as u64).unwrap_or_else(|err| sc_panic!(err.message()));
        self.debit_pool(Pool::Ram, tokens_out);
        self.credit_pool(Pool::RamFee, fee);
        self.send_core(&account, tokens_out - fee);

        self.ram_market().set(market);
        self.global_state().set(gstate);

        self.refresh_fee_state(&account);
        self.sellram_event(&account, bytes, fee, tokens_out);
        tokens_out - fee
    }

    // ========================================================
    // ENDPOINT: onramusage (host report)
    // ========================================================

    #[only_owner]
    #[endpoint(onramusage)]
    fn onramusage(&self, account: ManagedAddress, used_bytes: u64) {
        self.ram_usage(&account).set(used_bytes);
        if !self.user_resources(&account).is_empty() {
            self.refresh_fee_state(&account);
        }
    }

    // ========================================================
    // ENDPOINT: setram
    // The unsold byte reserve moves with the cap.
    // ========================================================

    #[only_owner]
    #[endpoint(setram)]
    fn setram(&self, max_ram_size: u64) {
        let mut gstate = self.global_state().get();
        require!(max_ram_size < MAX_RAM_SIZE_LIMIT, "ram size is unrealistic");
        require!(
            max_ram_size > gstate.total_ram_bytes_reserved,
            "attempt to set max below reserved"
        );

        let mut market = self.ram_market().get();
        market
            .resize(gstate.max_ram_size, max_ram_size)
            .unwrap_or_else(|err| sc_panic!(err.message()));
        self.ram_market().set(market);

        self.setram_event(gstate.max_ram_size, max_ram_size);
        gstate.max_ram_size = max_ram_size;
        self.global_state().set(gstate);
    }

    // ========================================================
    // Internal
    // ========================================================

    fn buy_ram_for(&self, payer: &ManagedAddress, receiver: &ManagedAddress, quant: u64) -> u64 {
        let fee_rate = self.current_fee_state(receiver).fee_rate;
        let fee = apply_bps(quant, fee_rate as u64).unwrap_or_else(|err| sc_panic!(err.message()));
        let quant_after_fee = quant - fee;

        let mut market = self.ram_market().get();
        let bytes_out = market
            .buy(quant_after_fee)
            .unwrap_or_else(|err| sc_panic!(err.message()));

        let mut gstate = self.global_state().get();
        require!(bytes_out <= gstate.free_ram(), "reserved ram exceeds the chain maximum");
        gstate.total_ram_bytes_reserved = add(gstate.total_ram_bytes_reserved, bytes_out)
            .unwrap_or_else(|err| sc_panic!(err.message()));
        gstate.total_ram_stake = add(gstate.total_ram_stake, quant_after_fee)
            .unwrap_or_else(|err| sc_panic!(err.message()));

        self.credit_pool(Pool::Ram, quant_after_fee);
        self.credit_pool(Pool::RamFee, fee);

        let res_mapper = self.user_resources(receiver);
        let mut res = if res_mapper.is_empty() {
            UserResources::new(receiver.clone())
        } else {
            res_mapper.get()
        };
        res.ram_bytes = add(res.ram_bytes, bytes_out).unwrap_or_else(|err| sc_panic!(err.message()));
        self.set_resource_limits(receiver, res.ram_bytes, res.net_weight, res.cpu_weight);
        res_mapper.set(res);

        self.ram_market().set(market);
        self.global_state().set(gstate);

        self.refresh_fee_state(receiver);
        self.buyram_event(payer, receiver, quant, fee, bytes_out);
        bytes_out
    }

    /// Smallest payment that buys `bytes` once the fee is taken out.
    fn quote_ram_bytes(&self, receiver: &ManagedAddress, bytes: u64) -> u64 {
        let market = self.ram_market().get();
        let net_tokens = market
            .tokens_to_buy_bytes(bytes)
            .unwrap_or_else(|err| sc_panic!(err.message()));

        let fee_rate = self.current_fee_state(receiver).fee_rate as u64;
        mul_div_ceil(net_tokens, BPS_DENOMINATOR, BPS_DENOMINATOR - fee_rate)
            .unwrap_or_else(|err| sc_panic!(err.message()))
    }

    /// Fee state a trade by `account` would see now. Writes nothing.
    fn current_fee_state(&self, account: &ManagedAddress) -> RamFeeState {
        let now = self.blockchain().get_block_timestamp();
        let res_mapper = self.user_resources(account);
        if res_mapper.is_empty() {
            return RamFeeState {
                fee_rate: RAM_TRADE_BASIS_FEE_BPS,
                last_warning_time: 0,
                last_update_time: now,
            };
        }

        let res = res_mapper.get();
        ram_fee::recompute(
            res.ram_bytes,
            self.ram_used_bytes(account),
            res.ram_last_warning_time,
            now,
        )
    }

    fn refresh_fee_state(&self, account: &ManagedAddress) {
        let res_mapper = self.user_resources(account);
        require!(!res_mapper.is_empty(), "user must first register");

        let state = self.current_fee_state(account);
        let mut res = res_mapper.get();
        res.ram_trading_fee_rate = state.fee_rate;
        res.ram_last_warning_time = state.last_warning_time;
        res.ram_info_last_update_time = state.last_update_time;
        res_mapper.set(res);

        self.ram_fee_rate_event(account, state.last_warning_time, state.fee_rate);
    }

    // ========================================================
    // VIEWS
    // ========================================================

    /// Basis points a trade by `account` would pay now.
    #[view(getRamTradeFeeRate)]
    fn get_ram_trade_fee_rate(&self, account: ManagedAddress) -> u32 {
        self.current_fee_state(&account).fee_rate
    }
}
