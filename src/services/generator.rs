//! Whale Position/Trade Generator
//!
//! Produces synthetic open positions and closed trades. Inputs (notional,
//! symbol, side, price noise, leverage, P&L) are sampled from fixed tables;
//! every dependent field is derived from them, never sampled.
//!
//! The random source and the clock are parameters so callers can seed runs
//! and pin timestamps.

use super::sampler::Categorical;
use crate::types::{
    Exchange, Position, PositionSide, Symbol, Trade, TradeType, LEVERAGE_CHOICES,
};
use chrono::{DateTime, Duration, Utc};
use rand::Rng;
use thiserror::Error;
use tracing::debug;

/// Open positions are stamped within this many seconds before `now`.
pub const POSITION_WINDOW_SECS: i64 = 2 * 60 * 60;
/// Closed trades are stamped within this many seconds before `now`.
pub const TRADE_WINDOW_SECS: i64 = 4 * 60 * 60;
/// Largest accepted `min_notional`, keeping the top tier bound well inside u64.
pub const MAX_MIN_NOTIONAL: i64 = 1_000_000_000_000;

/// Simulation errors.
#[derive(Debug, Error, PartialEq)]
pub enum SimulationError {
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
}

/// A notional band expressed in multiples of the caller's minimum.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NotionalTier {
    pub low_multiple: u64,
    pub high_multiple: u64,
}

impl NotionalTier {
    pub const fn new(low_multiple: u64, high_multiple: u64) -> Self {
        Self {
            low_multiple,
            high_multiple,
        }
    }

    /// Draw a USD amount uniformly from `[min * low, min * high]`.
    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R, min_notional: u64) -> u64 {
        rng.gen_range(min_notional * self.low_multiple..=min_notional * self.high_multiple)
    }
}

/// Regular / large / very large open positions.
pub const POSITION_TIERS: [(NotionalTier, f64); 3] = [
    (NotionalTier::new(1, 3), 0.6),
    (NotionalTier::new(3, 10), 0.3),
    (NotionalTier::new(10, 50), 0.1),
];

/// Regular / very large closed trades.
pub const TRADE_TIERS: [(NotionalTier, f64); 2] = [
    (NotionalTier::new(1, 10), 0.85),
    (NotionalTier::new(20, 100), 0.15),
];

pub const POSITION_SYMBOL_WEIGHTS: [(Symbol, f64); 8] = [
    (Symbol::BtcUsdt, 0.30),
    (Symbol::EthUsdt, 0.25),
    (Symbol::SolUsdt, 0.15),
    (Symbol::AdaUsdt, 0.10),
    (Symbol::BnbUsdt, 0.08),
    (Symbol::DotUsdt, 0.05),
    (Symbol::MaticUsdt, 0.04),
    (Symbol::LinkUsdt, 0.03),
];

pub const TRADE_SYMBOL_WEIGHTS: [(Symbol, f64); 8] = [
    (Symbol::BtcUsdt, 0.35),
    (Symbol::EthUsdt, 0.25),
    (Symbol::SolUsdt, 0.15),
    (Symbol::AdaUsdt, 0.08),
    (Symbol::BnbUsdt, 0.07),
    (Symbol::DotUsdt, 0.04),
    (Symbol::MaticUsdt, 0.03),
    (Symbol::LinkUsdt, 0.03),
];

/// Slight long bias.
pub const SIDE_WEIGHTS: [(PositionSide, f64); 2] =
    [(PositionSide::Long, 0.55), (PositionSide::Short, 0.45)];

pub const TRADE_TYPE_WEIGHTS: [(TradeType, f64); 2] =
    [(TradeType::Buy, 0.5), (TradeType::Sell, 0.5)];

/// Reject non-positive or oversized minimums.
pub fn validate_min_notional(min_notional: i64) -> Result<u64, SimulationError> {
    if min_notional <= 0 {
        return Err(SimulationError::InvalidArgument(format!(
            "min_notional must be a positive integer, got {}",
            min_notional
        )));
    }
    if min_notional > MAX_MIN_NOTIONAL {
        return Err(SimulationError::InvalidArgument(format!(
            "min_notional must not exceed {}, got {}",
            MAX_MIN_NOTIONAL, min_notional
        )));
    }
    Ok(min_notional as u64)
}

fn stamp<R: Rng + ?Sized>(rng: &mut R, now: DateTime<Utc>, window_secs: i64) -> DateTime<Utc> {
    now - Duration::seconds(rng.gen_range(0..=window_secs))
}

/// Sampling tables for open positions.
#[derive(Debug, Clone)]
pub struct PositionModel {
    tiers: Categorical<NotionalTier>,
    symbols: Categorical<Symbol>,
    sides: Categorical<PositionSide>,
    leverage: Categorical<u32>,
    venues: Categorical<Exchange>,
    /// Entry price noise half-width (0.05 = ±5%)
    pub price_noise: f64,
    /// Unrealized P&L fraction bounds
    pub pnl_range: (f64, f64),
    pub window_secs: i64,
}

impl PositionModel {
    /// The stock tables used by the dashboard.
    pub fn standard() -> Result<Self, SimulationError> {
        Ok(Self {
            tiers: Categorical::new(&POSITION_TIERS)?,
            symbols: Categorical::new(&POSITION_SYMBOL_WEIGHTS)?,
            sides: Categorical::new(&SIDE_WEIGHTS)?,
            leverage: Categorical::uniform(&LEVERAGE_CHOICES)?,
            venues: Categorical::uniform(&Exchange::POSITION_VENUES)?,
            price_noise: 0.05,
            pnl_range: (-0.15, 0.25),
            window_secs: POSITION_WINDOW_SECS,
        })
    }

    pub fn symbols(&self) -> &Categorical<Symbol> {
        &self.symbols
    }

    /// Generate `count` positions of at least `min_notional` USD each.
    pub fn generate<R: Rng + ?Sized>(
        &self,
        rng: &mut R,
        now: DateTime<Utc>,
        min_notional: i64,
        count: usize,
    ) -> Result<Vec<Position>, SimulationError> {
        let min_notional = validate_min_notional(min_notional)?;
        debug!("Generating {} simulated whale positions (min ${})", count, min_notional);

        Ok((0..count)
            .map(|_| self.sample_one(rng, now, min_notional))
            .collect())
    }

    /// Sample a single position. `min_notional` must already be validated.
    pub fn sample_one<R: Rng + ?Sized>(
        &self,
        rng: &mut R,
        now: DateTime<Utc>,
        min_notional: u64,
    ) -> Position {
        let notional_usd = self.tiers.sample(rng).sample(rng, min_notional);
        let symbol = self.symbols.sample(rng);
        let side = self.sides.sample(rng);

        let noise = rng.gen_range(-self.price_noise..=self.price_noise);
        let entry_price = symbol.base_price() * (1.0 + noise);

        let leverage = self.leverage.sample(rng);
        let pnl_pct = rng.gen_range(self.pnl_range.0..=self.pnl_range.1);

        let position_id = format!("POS_{}", rng.gen_range(100_000..=999_999));
        let exchange = self.venues.sample(rng);
        let opened_at = stamp(rng, now, self.window_secs);

        Position::new(
            position_id,
            opened_at,
            symbol,
            side,
            exchange,
            notional_usd,
            leverage,
            entry_price,
            pnl_pct,
        )
    }
}

/// Sampling tables for closed trades.
#[derive(Debug, Clone)]
pub struct TradeModel {
    tiers: Categorical<NotionalTier>,
    symbols: Categorical<Symbol>,
    types: Categorical<TradeType>,
    venues: Categorical<Exchange>,
    /// Execution price noise half-width (0.03 = ±3%)
    pub price_noise: f64,
    /// Market impact bounds in percent
    pub impact_range: (f64, f64),
    pub window_secs: i64,
}

impl TradeModel {
    pub fn standard() -> Result<Self, SimulationError> {
        Ok(Self {
            tiers: Categorical::new(&TRADE_TIERS)?,
            symbols: Categorical::new(&TRADE_SYMBOL_WEIGHTS)?,
            types: Categorical::new(&TRADE_TYPE_WEIGHTS)?,
            venues: Categorical::uniform(&Exchange::TRADE_VENUES)?,
            price_noise: 0.03,
            impact_range: (0.1, 2.5),
            window_secs: TRADE_WINDOW_SECS,
        })
    }

    pub fn symbols(&self) -> &Categorical<Symbol> {
        &self.symbols
    }

    /// Generate `count` trades of at least `min_notional` USD each.
    pub fn generate<R: Rng + ?Sized>(
        &self,
        rng: &mut R,
        now: DateTime<Utc>,
        min_notional: i64,
        count: usize,
    ) -> Result<Vec<Trade>, SimulationError> {
        let min_notional = validate_min_notional(min_notional)?;
        debug!("Generating {} simulated whale trades (min ${})", count, min_notional);

        Ok((0..count)
            .map(|_| self.sample_one(rng, now, min_notional))
            .collect())
    }

    pub fn sample_one<R: Rng + ?Sized>(
        &self,
        rng: &mut R,
        now: DateTime<Utc>,
        min_notional: u64,
    ) -> Trade {
        let notional_usd = self.tiers.sample(rng).sample(rng, min_notional);
        let symbol = self.symbols.sample(rng);
        let trade_type = self.types.sample(rng);

        let noise = rng.gen_range(-self.price_noise..=self.price_noise);
        let price = symbol.base_price() * (1.0 + noise);

        let impact = rng.gen_range(self.impact_range.0..=self.impact_range.1);
        let market_impact_pct = (impact * 100.0).round() / 100.0;

        let trade_id = format!("TRD_{}", rng.gen_range(1_000_000..=9_999_999));
        let exchange = self.venues.sample(rng);
        let executed_at = stamp(rng, now, self.window_secs);

        Trade::new(
            trade_id,
            executed_at,
            symbol,
            trade_type,
            exchange,
            notional_usd,
            price,
            market_impact_pct,
        )
    }
}

/// Generate simulated open positions with the standard tables.
pub fn generate_positions<R: Rng + ?Sized>(
    rng: &mut R,
    now: DateTime<Utc>,
    min_notional: i64,
    count: usize,
) -> Result<Vec<Position>, SimulationError> {
    PositionModel::standard()?.generate(rng, now, min_notional, count)
}

/// Generate simulated closed trades with the standard tables.
pub fn generate_trades<R: Rng + ?Sized>(
    rng: &mut R,
    now: DateTime<Utc>,
    min_notional: i64,
    count: usize,
) -> Result<Vec<Trade>, SimulationError> {
    TradeModel::standard()?.generate(rng, now, min_notional, count)
}
