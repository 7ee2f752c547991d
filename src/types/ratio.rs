use super::market::{PositionSide, Symbol};
use super::transfer::Sentiment;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// How pronounced a long/short imbalance is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Confidence {
    Low,
    Medium,
    High,
}

impl Confidence {
    pub fn from_ratio_diff(ratio_diff: f64) -> Self {
        if ratio_diff > 0.1 {
            Confidence::High
        } else if ratio_diff > 0.05 {
            Confidence::Medium
        } else {
            Confidence::Low
        }
    }
}

/// One reading of the top-trader long/short account ratio on a symbol,
/// with an estimated USD size for the dominant side.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RatioSnapshot {
    pub time: DateTime<Utc>,
    pub symbol: Symbol,
    /// Side holding the larger share
    pub side: PositionSide,
    pub long_ratio: f64,
    pub short_ratio: f64,
    /// |long_ratio - short_ratio|
    pub ratio_diff: f64,
    pub amount_usd: u64,
    pub confidence: Confidence,
}

impl RatioSnapshot {
    pub fn new(
        time: DateTime<Utc>,
        symbol: Symbol,
        long_ratio: f64,
        short_ratio: f64,
        amount_usd: u64,
    ) -> Self {
        let side = if long_ratio > short_ratio {
            PositionSide::Long
        } else {
            PositionSide::Short
        };
        let ratio_diff = (long_ratio - short_ratio).abs();

        Self {
            time,
            symbol,
            side,
            long_ratio,
            short_ratio,
            ratio_diff,
            amount_usd,
            confidence: Confidence::from_ratio_diff(ratio_diff),
        }
    }
}

/// Aggregate view over a batch of ratio snapshots.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RatioSummary {
    pub total_positions: usize,
    pub total_amount_usd: u64,
    pub long_positions: usize,
    pub short_positions: usize,
    pub long_percentage: f64,
    pub short_percentage: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub most_active_symbol: Option<Symbol>,
    pub sentiment: Sentiment,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_snapshot_dominant_side() {
        let snap = RatioSnapshot::new(Utc::now(), Symbol::BtcUsdt, 0.62, 0.38, 10_000);
        assert_eq!(snap.side, PositionSide::Long);
        assert!((snap.ratio_diff - 0.24).abs() < 1e-12);
        assert_eq!(snap.confidence, Confidence::High);

        let snap = RatioSnapshot::new(Utc::now(), Symbol::EthUsdt, 0.48, 0.52, 10_000);
        assert_eq!(snap.side, PositionSide::Short);
        assert_eq!(snap.confidence, Confidence::Low);
    }

    #[test]
    fn test_confidence_thresholds() {
        assert_eq!(Confidence::from_ratio_diff(0.05), Confidence::Low);
        assert_eq!(Confidence::from_ratio_diff(0.07), Confidence::Medium);
        assert_eq!(Confidence::from_ratio_diff(0.1), Confidence::Medium);
        assert_eq!(Confidence::from_ratio_diff(0.11), Confidence::High);
    }
}
