multiversx_sc::derive_imports!();

use crate::error::{PlatformError, Result};
use crate::math::{mul_div_ceil, mul_div_floor};

/// Constant-product market between the core token and RAM bytes.
///
/// `token_reserve * ram_reserve` never increases through a trade; the RAM
/// reserve is the pool of bytes not yet sold, so it starts at `max_ram_size`.
#[type_abi]
#[derive(TopEncode, TopDecode, NestedEncode, NestedDecode, Clone, Copy, PartialEq, Eq, Debug)]
pub struct RamExchange {
    pub token_reserve: u64,
    pub ram_reserve: u64,
}

impl RamExchange {
    pub fn new(token_reserve: u64, ram_reserve: u64) -> Result<Self> {
        if token_reserve == 0 || ram_reserve == 0 {
            return Err(PlatformError::NonPositiveReserve);
        }
        Ok(RamExchange {
            token_reserve,
            ram_reserve,
        })
    }

    /// Bytes received for `tokens` at current reserves, without trading.
    pub fn bytes_for_tokens(&self, tokens: u64) -> Result<u64> {
        let denominator = self
            .token_reserve
            .checked_add(tokens)
            .ok_or(PlatformError::Overflow)?;
        mul_div_floor(self.ram_reserve, tokens, denominator)
    }

    /// Tokens received for `bytes` at current reserves, without trading.
    pub fn tokens_for_bytes(&self, bytes: u64) -> Result<u64> {
        let denominator = self
            .ram_reserve
            .checked_add(bytes)
            .ok_or(PlatformError::Overflow)?;
        mul_div_floor(self.token_reserve, bytes, denominator)
    }

    /// Smallest token input whose purchase yields at least `bytes`.
    pub fn tokens_to_buy_bytes(&self, bytes: u64) -> Result<u64> {
        if bytes >= self.ram_reserve {
            return Err(PlatformError::RamReserveExhausted);
        }
        mul_div_ceil(bytes, self.token_reserve, self.ram_reserve - bytes)
    }

    /// Moves `tokens` into the market and returns the bytes taken out.
    pub fn buy(&mut self, tokens: u64) -> Result<u64> {
        if tokens == 0 {
            return Err(PlatformError::NonPositivePurchase);
        }
        let bytes_out = self.bytes_for_tokens(tokens)?;
        if bytes_out == 0 {
            return Err(PlatformError::BytesOutTooLow);
        }
        self.token_reserve += tokens;
        self.ram_reserve -= bytes_out;
        Ok(bytes_out)
    }

    /// Moves `bytes` back into the market and returns the tokens taken out.
    pub fn sell(&mut self, bytes: u64) -> Result<u64> {
        if bytes == 0 {
            return Err(PlatformError::NonPositivePurchase);
        }
        let tokens_out = self.tokens_for_bytes(bytes)?;
        if tokens_out <= 1 {
            return Err(PlatformError::TokensOutTooLow);
        }
        self.ram_reserve += bytes;
        self.token_reserve -= tokens_out;
        Ok(tokens_out)
    }

    /// Grows or shrinks the unsold byte pool when the chain RAM cap changes.
    pub fn resize(&mut self, old_max_ram: u64, new_max_ram: u64) -> Result<()> {
        let reserve = if new_max_ram >= old_max_ram {
            self.ram_reserve
                .checked_add(new_max_ram - old_max_ram)
                .ok_or(PlatformError::Overflow)?
        } else {
            self.ram_reserve
                .checked_sub(old_max_ram - new_max_ram)
                .ok_or(PlatformError::RamReserveExhausted)?
        };
        if reserve == 0 {
            return Err(PlatformError::RamReserveExhausted);
        }
        self.ram_reserve = reserve;
        Ok(())
    }
}
