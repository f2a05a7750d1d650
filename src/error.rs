/// Failures raised by the arithmetic kernels.
///
/// Endpoints abort with [`PlatformError::message`]; the VM then discards every
/// write of the transaction.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PlatformError {
    Overflow,
    ZeroStake,
    InsufficientNetStake,
    InsufficientCpuStake,
    NonPositivePurchase,
    NonPositiveReserve,
    BytesOutTooLow,
    TokensOutTooLow,
    InsufficientRamQuota,
    RamReserveExhausted,
    ClaimNotAvailable,
    RewardOutOfRange,
}

impl PlatformError {
    pub fn message(&self) -> &'static str {
        match self {
            PlatformError::Overflow => "arithmetic overflow",
            PlatformError::ZeroStake => "should stake non-zero amount",
            PlatformError::InsufficientNetStake => "insufficient staked net bandwidth",
            PlatformError::InsufficientCpuStake => "insufficient staked cpu bandwidth",
            PlatformError::NonPositivePurchase => "must purchase a positive amount",
            PlatformError::NonPositiveReserve => "ram market reserves must be positive",
            PlatformError::BytesOutTooLow => "must reserve a positive amount",
            PlatformError::TokensOutTooLow => "token amount received from selling ram is too low",
            PlatformError::InsufficientRamQuota => "insufficient quota",
            PlatformError::RamReserveExhausted => "not enough free ram in the market",
            PlatformError::ClaimNotAvailable => "claim is not available yet",
            PlatformError::RewardOutOfRange => "rewards don't count",
        }
    }
}

pub type Result<T> = core::result::Result<T, PlatformError>;
