//! Long/short ratio snapshots
//!
//! Synthetic top-trader long/short readings for the major pairs. This is
//! the offline feed the dashboard shows in place of exchange ratio data.

use super::generator::{validate_min_notional, SimulationError};
use crate::types::{PositionSide, RatioSnapshot, RatioSummary, Sentiment, Symbol};
use chrono::{DateTime, Duration, Utc};
use rand::Rng;
use std::collections::HashMap;
use tracing::debug;

/// Snapshots are stamped within this many seconds before `now`.
pub const RATIO_WINDOW_SECS: i64 = 30 * 60;
/// Long share bounds for a simulated reading.
pub const LONG_RATIO_RANGE: (f64, f64) = (0.3, 0.7);
/// Largest estimated position, in multiples of the minimum.
pub const MAX_AMOUNT_MULTIPLE: u64 = 8;

/// One to three snapshots per tracked symbol, largest amount first.
pub fn generate_ratio_snapshots<R: Rng + ?Sized>(
    rng: &mut R,
    now: DateTime<Utc>,
    min_notional: i64,
) -> Result<Vec<RatioSnapshot>, SimulationError> {
    let min_notional = validate_min_notional(min_notional)?;
    let mut snapshots = Vec::new();

    for symbol in Symbol::RATIO_TRACKED {
        for _ in 0..rng.gen_range(1..=3) {
            let time = now - Duration::seconds(rng.gen_range(0..=RATIO_WINDOW_SECS));
            let long_ratio = rng.gen_range(LONG_RATIO_RANGE.0..=LONG_RATIO_RANGE.1);
            let amount = rng.gen_range(min_notional..=min_notional * MAX_AMOUNT_MULTIPLE);

            snapshots.push(RatioSnapshot::new(time, symbol, long_ratio, 1.0 - long_ratio, amount));
        }
    }

    snapshots.sort_by(|a, b| b.amount_usd.cmp(&a.amount_usd));
    debug!("Generated {} long/short ratio snapshots", snapshots.len());
    Ok(snapshots)
}

/// Counts, side shares and the most frequently seen symbol.
pub fn ratio_summary(snapshots: &[RatioSnapshot]) -> RatioSummary {
    let total = snapshots.len();
    let long_positions = snapshots
        .iter()
        .filter(|s| s.side == PositionSide::Long)
        .count();
    let short_positions = total - long_positions;

    let percentage = |n: usize| {
        if total == 0 {
            0.0
        } else {
            (n as f64 / total as f64 * 1_000.0).round() / 10.0
        }
    };

    let mut counts: HashMap<Symbol, usize> = HashMap::new();
    for snap in snapshots {
        *counts.entry(snap.symbol).or_default() += 1;
    }
    let most_active_symbol = counts
        .into_iter()
        .max_by(|a, b| a.1.cmp(&b.1).then_with(|| b.0.cmp(&a.0)))
        .map(|(symbol, _)| symbol);

    let sentiment = if long_positions > short_positions {
        Sentiment::Bullish
    } else if short_positions > long_positions {
        Sentiment::Bearish
    } else {
        Sentiment::Neutral
    };

    RatioSummary {
        total_positions: total,
        total_amount_usd: snapshots.iter().map(|s| s.amount_usd).sum(),
        long_positions,
        short_positions,
        long_percentage: percentage(long_positions),
        short_percentage: percentage(short_positions),
        most_active_symbol,
        sentiment,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Confidence;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_snapshot_invariants() {
        let mut rng = StdRng::seed_from_u64(1);
        let now = Utc::now();
        let snapshots = generate_ratio_snapshots(&mut rng, now, 10_000).unwrap();

        assert!(snapshots.len() >= 6 && snapshots.len() <= 18);
        for s in &snapshots {
            assert!((s.long_ratio + s.short_ratio - 1.0).abs() < 1e-12);
            assert!((s.ratio_diff - (s.long_ratio - s.short_ratio).abs()).abs() < 1e-12);
            assert_eq!(s.confidence, Confidence::from_ratio_diff(s.ratio_diff));
            assert!(s.amount_usd >= 10_000 && s.amount_usd <= 80_000);
            assert!(Symbol::RATIO_TRACKED.contains(&s.symbol));
            assert!(now - s.time <= Duration::seconds(RATIO_WINDOW_SECS));
        }
        assert!(snapshots.windows(2).all(|w| w[0].amount_usd >= w[1].amount_usd));
    }

    #[test]
    fn test_every_tracked_symbol_present() {
        let mut rng = StdRng::seed_from_u64(2);
        let snapshots = generate_ratio_snapshots(&mut rng, Utc::now(), 1_000).unwrap();
        for symbol in Symbol::RATIO_TRACKED {
            assert!(snapshots.iter().any(|s| s.symbol == symbol));
        }
    }

    #[test]
    fn test_rejects_invalid_minimum() {
        let mut rng = StdRng::seed_from_u64(3);
        assert!(generate_ratio_snapshots(&mut rng, Utc::now(), 0).is_err());
    }

    #[test]
    fn test_ratio_summary() {
        let now = Utc::now();
        let snapshots = vec![
            RatioSnapshot::new(now, Symbol::BtcUsdt, 0.6, 0.4, 100),
            RatioSnapshot::new(now, Symbol::BtcUsdt, 0.55, 0.45, 200),
            RatioSnapshot::new(now, Symbol::EthUsdt, 0.4, 0.6, 300),
        ];
        let summary = ratio_summary(&snapshots);

        assert_eq!(summary.total_positions, 3);
        assert_eq!(summary.total_amount_usd, 600);
        assert_eq!(summary.long_positions, 2);
        assert_eq!(summary.short_positions, 1);
        assert_eq!(summary.long_percentage, 66.7);
        assert_eq!(summary.short_percentage, 33.3);
        assert_eq!(summary.most_active_symbol, Some(Symbol::BtcUsdt));
        assert_eq!(summary.sentiment, Sentiment::Bullish);
    }

    #[test]
    fn test_ratio_summary_empty() {
        let summary = ratio_summary(&[]);
        assert_eq!(summary.total_positions, 0);
        assert_eq!(summary.long_percentage, 0.0);
        assert_eq!(summary.most_active_symbol, None);
        assert_eq!(summary.sentiment, Sentiment::Neutral);
    }
}
