// ============================================================
// Token units
// ============================================================

/// The core token carries 4 decimals: 1 token = 10_000 base units.
pub const CORE_TOKEN_UNIT: u64 = 10_000;

/// Votes must be cast in whole tokens.
pub const VOTE_UNIT: u64 = CORE_TOKEN_UNIT;

/// Largest amount a single payment may carry.
pub const MAX_ASSET_AMOUNT: u64 = i64::MAX as u64;

/// Basis points denominator
pub const BPS_DENOMINATOR: u64 = 10_000;

// ============================================================
// Time (seconds, unless stated otherwise)
// ============================================================

pub const SECONDS_PER_DAY: u64 = 24 * 3_600;

/// Reward year: 52 weeks.
pub const SECONDS_PER_YEAR: u64 = 52 * 7 * SECONDS_PER_DAY;

/// Half-second block slots per day.
pub const SLOTS_PER_DAY: u32 = 2 * 24 * 3_600;

/// The producer schedule is refreshed at most once per minute (120 slots).
pub const SCHEDULE_UPDATE_INTERVAL_SLOTS: u32 = 120;

/// Undelegated stake becomes refundable after 3 days.
pub const REFUND_DELAY: u64 = 3 * SECONDS_PER_DAY;

/// Minimum spacing between two reward claims of the same voter.
pub const CLAIM_REWARDS_PERIOD: u64 = 7 * SECONDS_PER_DAY;

/// Voteage accrues one unit per whole vote per tenth of a claim period.
pub const VOTEAGE_BASIS: u64 = CLAIM_REWARDS_PERIOD / 10;

/// The block hook fills the reward buckets at most every 3 days.
pub const DISTRIBUTE_REWARDS_PERIOD: u64 = 3 * SECONDS_PER_DAY;

/// A producer may change its commission rate once per week.
pub const MIN_COMMISSION_ADJUSTMENT_PERIOD: u64 = 7 * SECONDS_PER_DAY;

// ============================================================
// Producers and rewards
// ============================================================

/// Size of the elected producer set.
pub const MAX_ELECTED_PRODUCERS: usize = 21;

pub const MIN_COMMISSION_RATE: u32 = 1;
pub const MAX_COMMISSION_RATE: u32 = 10_000;

/// Max relative commission decrease per adjustment, in parts per million (0.0005).
pub const MAX_COMMISSION_ADJUSTMENT_PPM: i64 = 500;

pub const MAX_URL_LENGTH: usize = 512;

/// Activation requires 15% of the maximum supply to be voting.
pub const ACTIVATION_THRESHOLD_PERCENT: u64 = 15;

/// 1% annual continuous emission, in basis points.
pub const CONTINUOUS_RATE_BPS: u64 = 100;

/// Share of each emission routed to the per-block bucket, in basis points.
pub const PERBLOCK_RATE_BPS: u64 = 5_000;

// ============================================================
// RAM market
// ============================================================

/// 64 GiB
pub const DEFAULT_MAX_RAM_SIZE: u64 = 64 * 1024 * 1024 * 1024;

/// Upper bound accepted by `setram` (1 PiB).
pub const MAX_RAM_SIZE_LIMIT: u64 = 1024 * 1024 * 1024 * 1024 * 1024;

/// One penalty period of the RAM trade fee controller.
pub const RAM_PUNITIVE_FEE_PERIOD: u64 = SECONDS_PER_DAY;

/// Penalty periods of grace after the first warning.
pub const RAM_PUNITIVE_FEE_WARNING_PERIODS: u64 = 7;

/// 0.5%
pub const RAM_TRADE_BASIS_FEE_BPS: u32 = 50;

/// 50%
pub const RAM_TRADE_MAX_FEE_BPS: u32 = 5_000;

/// Unused ratio (in basis points) above which the punitive regime applies.
pub const RAM_PUNITIVE_UNUSED_BPS: u64 = 5_000;

/// Numerator of the punitive exponent: `exp(-10 / (unused_ratio * periods))`.
pub const RAM_PUNITIVE_EXPONENT: u64 = 10;

// ============================================================
// Name auction
// ============================================================

/// Names of this length and above are created without bidding.
pub const MAX_BID_NAME_LENGTH: usize = 11;

/// A new bid must beat the current one by more than 1/10.
pub const MIN_BID_INCREMENT_DIVISOR: i64 = 10;

/// An auction closes once its last bid is a day old ...
pub const NAME_BID_CLOSE_AGE: u64 = SECONDS_PER_DAY;

/// ... and the chain has been active for 14 days.
pub const NAME_BID_MIN_ACTIVATION_AGE: u64 = 14 * SECONDS_PER_DAY;
