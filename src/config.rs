//! Construction-parameter structs for every component.
//!
//! # Design Philosophy
//!
//! Configuration structs have all public fields for simple instantiation:
//!
//! - **Simple**: just create the struct with all fields set.
//! - **No boilerplate**: no constructors or builder methods needed — the
//!   fallible ones (`StripedLruConfig`, `ExecutorConfig`) validate inside
//!   the type they configure, not here.
//!
//! # Sizing
//!
//! `max_size`/`total_budget` are byte budgets over `|key| + |value|`, not
//! entry counts and not an estimate of in-memory struct overhead — see
//! `SimpleLru`'s module docs for the exact accounting rule.

use std::time::Duration;

use crate::error::ConfigError;

/// Configuration for a single-threaded [`crate::simple_lru::SimpleLru`].
#[derive(Debug, Clone, Copy)]
pub struct SimpleLruConfig {
    /// Byte budget: `cur_size` (the sum of `|key| + |value|` over all live
    /// entries) never exceeds this after a completed public operation.
    pub max_size: u64,
}

/// Configuration for a [`crate::concurrent::striped::StripedLru`].
///
/// `total_budget` is divided evenly across `shard_count` shards; see
/// [`StripedLruConfig::per_shard_budget`] for the validated split.
#[derive(Debug, Clone, Copy)]
pub struct StripedLruConfig {
    /// Aggregate byte budget across all shards.
    pub total_budget: u64,
    /// Number of independent, independently-locked shards.
    pub shard_count: usize,
}

/// Per-shard budget above which a [`StripedLruConfig`] is rejected as
/// misconfigured — guards against one wildly oversized shard swallowing
/// the benefit of striping.
const MAX_SHARD_BUDGET: u64 = 1024 * 1024 * 1024;

impl StripedLruConfig {
    /// Computes `total_budget / shard_count`, rejecting configurations
    /// that round down to zero (every entry would be oversize) or that
    /// exceed [`MAX_SHARD_BUDGET`].
    pub(crate) fn per_shard_budget(&self) -> Result<u64, ConfigError> {
        if self.shard_count == 0 {
            return Err(ConfigError::ZeroShards);
        }
        let per_shard = self.total_budget / self.shard_count as u64;
        if per_shard == 0 || per_shard > MAX_SHARD_BUDGET {
            return Err(ConfigError::ShardBudgetOutOfRange {
                total_budget: self.total_budget,
                shard_count: self.shard_count,
                per_shard,
            });
        }
        Ok(per_shard)
    }
}

/// Configuration for an [`crate::executor::Executor`].
#[derive(Debug, Clone)]
pub struct ExecutorConfig {
    /// Name used to label spawned worker threads.
    pub name: String,
    /// Maximum number of queued-but-not-yet-running tasks.
    pub queue_cap: usize,
    /// Worker count floor while `Run`.
    pub low_watermark: usize,
    /// Worker count ceiling.
    pub high_watermark: usize,
    /// How long an idle worker waits for a task before voluntarily
    /// exiting, if above `low_watermark`.
    pub idle_time: Duration,
}

impl ExecutorConfig {
    pub(crate) fn validate(&self) -> Result<(), ConfigError> {
        if self.low_watermark == 0 {
            return Err(ConfigError::ZeroLowWatermark);
        }
        if self.high_watermark < self.low_watermark {
            return Err(ConfigError::HighBelowLow {
                low_watermark: self.low_watermark,
                high_watermark: self.high_watermark,
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn per_shard_budget_splits_evenly() {
        let cfg = StripedLruConfig { total_budget: 2048, shard_count: 8 };
        assert_eq!(cfg.per_shard_budget().unwrap(), 256);
    }

    #[test]
    fn per_shard_budget_rejects_rounding_to_zero() {
        let cfg = StripedLruConfig { total_budget: 7, shard_count: 8 };
        assert!(cfg.per_shard_budget().is_err());
    }

    #[test]
    fn per_shard_budget_rejects_zero_shards() {
        let cfg = StripedLruConfig { total_budget: 1024, shard_count: 0 };
        assert!(matches!(cfg.per_shard_budget(), Err(ConfigError::ZeroShards)));
    }

    #[test]
    fn per_shard_budget_rejects_above_upper_bound() {
        let cfg = StripedLruConfig { total_budget: u64::MAX, shard_count: 1 };
        assert!(cfg.per_shard_budget().is_err());
    }

    #[test]
    fn executor_config_rejects_zero_low_watermark() {
        let cfg = ExecutorConfig {
            name: "t".into(),
            queue_cap: 10,
            low_watermark: 0,
            high_watermark: 4,
            idle_time: Duration::from_millis(100),
        };
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn executor_config_rejects_high_below_low() {
        let cfg = ExecutorConfig {
            name: "t".into(),
            queue_cap: 10,
            low_watermark: 4,
            high_watermark: 2,
            idle_time: Duration::from_millis(100),
        };
        assert!(cfg.validate().is_err());
    }
}
