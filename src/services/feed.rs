//! Time-bucketed memoization of generated positions and trades.
//!
//! Requests with the same count and minimum inside one bucket share a
//! batch, so dashboard polls see stable data between refreshes.

use super::cache::Cache;
use super::generator::SimulationError;
use super::simulator::WhaleSimulator;
use crate::types::{Position, Trade};
use chrono::{DateTime, Utc};
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

/// Generated data plus whether it came from the cache.
#[derive(Debug, Clone)]
pub struct FeedResult<T> {
    pub items: Vec<T>,
    pub cached: bool,
}

pub struct WhaleFeed {
    simulator: Arc<WhaleSimulator>,
    positions: Cache<Vec<Position>>,
    trades: Cache<Vec<Trade>>,
    bucket_secs: u64,
}

impl WhaleFeed {
    pub fn new(simulator: Arc<WhaleSimulator>, bucket_secs: u64) -> Self {
        let bucket_secs = bucket_secs.max(1);
        let ttl = Duration::from_secs(bucket_secs);
        Self::with_caches(simulator, bucket_secs, Cache::new(ttl), Cache::new(ttl))
    }

    pub fn with_caches(
        simulator: Arc<WhaleSimulator>,
        bucket_secs: u64,
        positions: Cache<Vec<Position>>,
        trades: Cache<Vec<Trade>>,
    ) -> Self {
        Self {
            simulator,
            positions,
            trades,
            bucket_secs: bucket_secs.max(1),
        }
    }

    fn key(&self, kind: &str, now: DateTime<Utc>, min_notional: i64, count: usize) -> String {
        let bucket = now.timestamp().div_euclid(self.bucket_secs as i64);
        format!("{}:{}:{}:{}", kind, count, min_notional, bucket)
    }

    /// Positions for this bucket. `fresh` skips the cache and replaces the entry.
    pub fn positions(
        &self,
        now: DateTime<Utc>,
        min_notional: i64,
        count: usize,
        fresh: bool,
    ) -> Result<FeedResult<Position>, SimulationError> {
        let key = self.key("positions", now, min_notional, count);
        if !fresh {
            if let Some(items) = self.positions.get(&key) {
                debug!("Feed cache hit: {}", key);
                return Ok(FeedResult { items, cached: true });
            }
        }

        let items = self.simulator.positions(now, min_notional, count)?;
        self.positions.set(key, items.clone());
        Ok(FeedResult {
            items,
            cached: false,
        })
    }

    pub fn trades(
        &self,
        now: DateTime<Utc>,
        min_notional: i64,
        count: usize,
        fresh: bool,
    ) -> Result<FeedResult<Trade>, SimulationError> {
        let key = self.key("trades", now, min_notional, count);
        if !fresh {
            if let Some(items) = self.trades.get(&key) {
                debug!("Feed cache hit: {}", key);
                return Ok(FeedResult { items, cached: true });
            }
        }

        let items = self.simulator.trades(now, min_notional, count)?;
        self.trades.set(key, items.clone());
        Ok(FeedResult {
            items,
            cached: false,
        })
    }

    /// Drop expired batches. Returns the number removed.
    pub fn cleanup(&self) -> usize {
        self.positions.cleanup() + self.trades.cleanup()
    }
}
