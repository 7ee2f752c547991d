//! Session market drift
//!
//! Keeps a dashboard session's positions alive between polls: P&L wanders,
//! positions are occasionally added or retired, and the whole book is
//! sometimes replaced. Price fields are re-derived after every P&L change.
//! The transfer ticker grows by at most one transfer per poll.

use super::generator::{validate_min_notional, PositionModel, SimulationError};
use super::transfers::generate_transfer;
use crate::types::{Position, WhaleTransfer};
use chrono::{DateTime, Utc};
use rand::Rng;
use std::collections::VecDeque;
use tracing::debug;

/// Per-tick P&L change bounds, as a fraction of notional.
pub const PNL_DRIFT_RANGE: (f64, f64) = (-0.02, 0.03);

/// Nudge a position's P&L by a random step and re-derive its prices.
pub fn drift_pnl<R: Rng + ?Sized>(rng: &mut R, position: &mut Position) {
    let step = rng.gen_range(PNL_DRIFT_RANGE.0..=PNL_DRIFT_RANGE.1);
    position.set_pnl_pct(position.unrealized_pnl_pct + step);
}

fn check_chance(name: &str, value: f64) -> Result<(), SimulationError> {
    if !(0.0..=1.0).contains(&value) {
        return Err(SimulationError::InvalidArgument(format!(
            "{} must be within [0, 1], got {}",
            name, value
        )));
    }
    Ok(())
}

/// Past `hard_secs` always due; past `soft_secs` due with probability `chance`.
/// Compared in milliseconds so fractional seconds count.
fn interval_due<R: Rng + ?Sized>(
    rng: &mut R,
    last: DateTime<Utc>,
    now: DateTime<Utc>,
    soft_secs: i64,
    chance: f64,
    hard_secs: i64,
) -> bool {
    let elapsed_ms = (now - last).num_milliseconds();
    elapsed_ms > hard_secs.saturating_mul(1_000)
        || (elapsed_ms > soft_secs.saturating_mul(1_000) && rng.gen_bool(chance))
}

/// Refresh cadence and mutation odds for a [`PositionBook`].
#[derive(Debug, Clone)]
pub struct DriftPolicy {
    /// Seconds after which a refresh may happen.
    pub soft_interval_secs: i64,
    /// Chance of refreshing once past the soft interval.
    pub soft_refresh_chance: f64,
    /// Seconds after which a refresh always happens.
    pub hard_interval_secs: i64,
    /// Chance a refresh mutates the book instead of replacing it.
    pub mutate_chance: f64,
    /// Chance each position drifts during a mutation.
    pub drift_chance: f64,
    /// Chance a mutation appends one new position.
    pub add_chance: f64,
    /// Chance a mutation retires the oldest position when above `max_before_trim`.
    pub trim_chance: f64,
    pub max_before_trim: usize,
}

impl Default for DriftPolicy {
    fn default() -> Self {
        Self {
            soft_interval_secs: 20,
            soft_refresh_chance: 0.4,
            hard_interval_secs: 60,
            mutate_chance: 0.7,
            drift_chance: 0.6,
            add_chance: 0.3,
            trim_chance: 0.2,
            max_before_trim: 8,
        }
    }
}

/// A session's evolving set of open positions.
#[derive(Debug, Clone)]
pub struct PositionBook {
    positions: Vec<Position>,
    last_update: Option<DateTime<Utc>>,
    min_notional: u64,
    batch_size: usize,
    policy: DriftPolicy,
}

impl DriftPolicy {
    /// Reject chances outside [0, 1].
    pub fn validate(&self) -> Result<(), SimulationError> {
        check_chance("soft_refresh_chance", self.soft_refresh_chance)?;
        check_chance("mutate_chance", self.mutate_chance)?;
        check_chance("drift_chance", self.drift_chance)?;
        check_chance("add_chance", self.add_chance)?;
        check_chance("trim_chance", self.trim_chance)
    }
}

impl PositionBook {
    pub fn new(min_notional: i64, batch_size: usize) -> Result<Self, SimulationError> {
        Ok(Self {
            positions: Vec::new(),
            last_update: None,
            min_notional: validate_min_notional(min_notional)?,
            batch_size,
            policy: DriftPolicy::default(),
        })
    }

    pub fn with_policy(mut self, policy: DriftPolicy) -> Result<Self, SimulationError> {
        policy.validate()?;
        self.policy = policy;
        Ok(self)
    }

    pub fn positions(&self) -> &[Position] {
        &self.positions
    }

    pub fn last_update(&self) -> Option<DateTime<Utc>> {
        self.last_update
    }

    /// Advance the book to `now`. Returns whether anything changed.
    pub fn tick<R: Rng + ?Sized>(
        &mut self,
        rng: &mut R,
        model: &PositionModel,
        now: DateTime<Utc>,
    ) -> bool {
        if !self.should_refresh(rng, now) {
            return false;
        }

        if !self.positions.is_empty() && rng.gen_bool(self.policy.mutate_chance) {
            self.mutate(rng, model, now);
        } else {
            self.replace(rng, model, now);
        }

        self.last_update = Some(now);
        true
    }

    /// Replace the book unconditionally.
    pub fn force_refresh<R: Rng + ?Sized>(
        &mut self,
        rng: &mut R,
        model: &PositionModel,
        now: DateTime<Utc>,
    ) {
        self.replace(rng, model, now);
        self.last_update = Some(now);
    }

    fn should_refresh<R: Rng + ?Sized>(&self, rng: &mut R, now: DateTime<Utc>) -> bool {
        let last = match self.last_update {
            Some(last) if !self.positions.is_empty() => last,
            _ => return true,
        };

        interval_due(
            rng,
            last,
            now,
            self.policy.soft_interval_secs,
            self.policy.soft_refresh_chance,
            self.policy.hard_interval_secs,
        )
    }

    fn mutate<R: Rng + ?Sized>(&mut self, rng: &mut R, model: &PositionModel, now: DateTime<Utc>) {
        let mut drifted = 0;
        for position in self.positions.iter_mut() {
            if rng.gen_bool(self.policy.drift_chance) {
                drift_pnl(rng, position);
                drifted += 1;
            }
        }

        if rng.gen_bool(self.policy.add_chance) {
            self.positions.push(model.sample_one(rng, now, self.min_notional));
        } else if self.positions.len() > self.policy.max_before_trim
            && rng.gen_bool(self.policy.trim_chance)
        {
            self.positions.remove(0);
        }

        debug!("Drifted {} of {} session positions", drifted, self.positions.len());
    }

    fn replace<R: Rng + ?Sized>(&mut self, rng: &mut R, model: &PositionModel, now: DateTime<Utc>) {
        self.positions = (0..self.batch_size)
            .map(|_| model.sample_one(rng, now, self.min_notional))
            .collect();
        debug!("Replaced session book with {} positions", self.positions.len());
    }
}

/// Append cadence and length cap for a [`TransferTicker`].
#[derive(Debug, Clone)]
pub struct TickerPolicy {
    pub soft_interval_secs: i64,
    /// Chance of appending once past the soft interval.
    pub soft_append_chance: f64,
    /// Seconds after which a transfer is always appended.
    pub hard_interval_secs: i64,
    /// Oldest transfers are dropped beyond this many.
    pub capacity: usize,
}

impl Default for TickerPolicy {
    fn default() -> Self {
        Self {
            soft_interval_secs: 15,
            soft_append_chance: 0.3,
            hard_interval_secs: 45,
            capacity: 15,
        }
    }
}

/// Rolling whale transfer feed for a dashboard session.
#[derive(Debug, Clone, Default)]
pub struct TransferTicker {
    transfers: VecDeque<WhaleTransfer>,
    last_update: Option<DateTime<Utc>>,
    policy: TickerPolicy,
}

impl TransferTicker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_policy(mut self, policy: TickerPolicy) -> Result<Self, SimulationError> {
        check_chance("soft_append_chance", policy.soft_append_chance)?;
        if policy.capacity == 0 {
            return Err(SimulationError::InvalidArgument(
                "ticker capacity must be at least 1".to_string(),
            ));
        }
        self.policy = policy;
        Ok(self)
    }

    /// Transfers, newest first.
    pub fn transfers(&self) -> Vec<WhaleTransfer> {
        self.transfers.iter().rev().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.transfers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.transfers.is_empty()
    }

    pub fn last_update(&self) -> Option<DateTime<Utc>> {
        self.last_update
    }

    /// Poll the ticker at `now`. Appends at most one transfer and returns
    /// whether it did. The first poll always appends.
    pub fn tick<R: Rng + ?Sized>(&mut self, rng: &mut R, now: DateTime<Utc>) -> bool {
        let due = match self.last_update {
            None => true,
            Some(last) => interval_due(
                rng,
                last,
                now,
                self.policy.soft_interval_secs,
                self.policy.soft_append_chance,
                self.policy.hard_interval_secs,
            ),
        };
        if !due {
            return false;
        }

        let mut transfer = generate_transfer(rng, now);
        transfer.time = now;
        self.transfers.push_back(transfer);
        while self.transfers.len() > self.policy.capacity {
            self.transfers.pop_front();
        }
        self.last_update = Some(now);

        debug!("Transfer ticker now holds {} transfers", self.transfers.len());
        true
    }
}
