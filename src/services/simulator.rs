//! Shared entry point for all simulated whale data.

use super::generator::{PositionModel, SimulationError, TradeModel};
use super::market_sim::{PositionBook, TransferTicker};
use super::ratios::generate_ratio_snapshots;
use super::transfers::{generate_transfers, transfer_alert, transfer_history, transfer_statistics};
use crate::types::{Position, RatioSnapshot, Trade, TransferStats, WhaleTransfer};
use chrono::{DateTime, Utc};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::sync::atomic::{AtomicU64, Ordering};

/// Owns the sampling tables and hands out a fresh RNG per call.
///
/// With a seed, the n-th call draws from `StdRng::seed_from_u64(seed + n)`,
/// so a restarted process replays the same sequence of responses.
pub struct WhaleSimulator {
    seed: Option<u64>,
    calls: AtomicU64,
    position_model: PositionModel,
    trade_model: TradeModel,
}

impl WhaleSimulator {
    pub fn new(seed: Option<u64>) -> Result<Self, SimulationError> {
        Ok(Self {
            seed,
            calls: AtomicU64::new(0),
            position_model: PositionModel::standard()?,
            trade_model: TradeModel::standard()?,
        })
    }

    pub fn seed(&self) -> Option<u64> {
        self.seed
    }

    pub fn position_model(&self) -> &PositionModel {
        &self.position_model
    }

    pub fn trade_model(&self) -> &TradeModel {
        &self.trade_model
    }

    fn rng(&self) -> StdRng {
        match self.seed {
            Some(seed) => {
                let n = self.calls.fetch_add(1, Ordering::Relaxed);
                StdRng::seed_from_u64(seed.wrapping_add(n))
            }
            None => StdRng::from_entropy(),
        }
    }

    pub fn positions(
        &self,
        now: DateTime<Utc>,
        min_notional: i64,
        count: usize,
    ) -> Result<Vec<Position>, SimulationError> {
        self.position_model
            .generate(&mut self.rng(), now, min_notional, count)
    }

    pub fn trades(
        &self,
        now: DateTime<Utc>,
        min_notional: i64,
        count: usize,
    ) -> Result<Vec<Trade>, SimulationError> {
        self.trade_model
            .generate(&mut self.rng(), now, min_notional, count)
    }

    pub fn transfers(&self, now: DateTime<Utc>, count: usize) -> Vec<WhaleTransfer> {
        generate_transfers(&mut self.rng(), now, count)
    }

    pub fn transfer_history(&self, now: DateTime<Utc>, hours: u32) -> Vec<WhaleTransfer> {
        transfer_history(&mut self.rng(), now, hours)
    }

    pub fn transfer_stats(&self) -> TransferStats {
        transfer_statistics(&mut self.rng())
    }

    pub fn transfer_alert(&self, transfer: &WhaleTransfer) -> String {
        transfer_alert(&mut self.rng(), transfer)
    }

    pub fn ratio_snapshots(
        &self,
        now: DateTime<Utc>,
        min_notional: i64,
    ) -> Result<Vec<RatioSnapshot>, SimulationError> {
        generate_ratio_snapshots(&mut self.rng(), now, min_notional)
    }

    /// Advance a session book. Returns whether it changed.
    pub fn tick_session(&self, book: &mut PositionBook, now: DateTime<Utc>) -> bool {
        book.tick(&mut self.rng(), &self.position_model, now)
    }

    pub fn refresh_session(&self, book: &mut PositionBook, now: DateTime<Utc>) {
        book.force_refresh(&mut self.rng(), &self.position_model, now);
    }

    /// Poll a transfer ticker. Returns whether a transfer was appended.
    pub fn tick_ticker(&self, ticker: &mut TransferTicker, now: DateTime<Utc>) -> bool {
        ticker.tick(&mut self.rng(), now)
    }
}
