//! Error kinds that are fatal to *construction*.
//!
//! Everything else in this crate's public API reports expected failures as
//! `bool`/`Option` returns (`OversizeEntry`, `NotFound`, `Duplicate`,
//! `Rejected` never surface as a `Result`) — only a misconfigured
//! `StripedLru` or `Executor` fails loudly, because there is no sensible
//! degraded behavior to fall back to.

/// Construction-time configuration error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    /// `total_budget / shard_count` is zero (every entry would be
    /// rejected as oversize) or exceeds the implementation-defined upper
    /// bound per shard.
    #[error(
        "per-shard budget {per_shard} out of range (total_budget={total_budget}, shard_count={shard_count})"
    )]
    ShardBudgetOutOfRange {
        total_budget: u64,
        shard_count: usize,
        per_shard: u64,
    },

    /// `shard_count` was zero.
    #[error("shard_count must be nonzero")]
    ZeroShards,

    /// `low_watermark` was zero; the pool would never keep a worker alive.
    #[error("low_watermark must be nonzero")]
    ZeroLowWatermark,

    /// `high_watermark < low_watermark`.
    #[error("high_watermark ({high_watermark}) must be >= low_watermark ({low_watermark})")]
    HighBelowLow {
        low_watermark: usize,
        high_watermark: usize,
    },
}
