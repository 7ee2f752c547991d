//! Alert filters over simulated whale activity.

use super::report::group_thousands;
use crate::types::{Position, RatioSnapshot};

/// Default `ratio_diff` above which a ratio snapshot is flagged.
pub const DEFAULT_RATIO_THRESHOLD: f64 = 0.15;

/// Alert for every snapshot whose long/short imbalance exceeds `threshold`.
pub fn imbalance_alerts(snapshots: &[RatioSnapshot], threshold: f64) -> Vec<String> {
    snapshots
        .iter()
        .filter(|s| s.ratio_diff > threshold)
        .map(|s| {
            format!(
                "Strong {} bias detected in {}: {:.1}% imbalance, ~${} position",
                s.side,
                s.symbol,
                s.ratio_diff * 100.0,
                group_thousands(s.amount_usd)
            )
        })
        .collect()
}

/// Alert for every position whose implied mark price is past liquidation.
pub fn liquidation_alerts(positions: &[Position]) -> Vec<String> {
    positions
        .iter()
        .filter(|p| p.is_liquidatable())
        .map(|p| {
            format!(
                "{} {} {} on {} at risk: mark {:.2} beyond liquidation {:.2}, ${} notional",
                p.symbol,
                p.side,
                p.leverage_label(),
                p.exchange,
                p.current_price,
                p.liquidation_price,
                group_thousands(p.notional_usd)
            )
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Exchange, PositionSide, Symbol};
    use chrono::Utc;

    #[test]
    fn test_imbalance_alerts_filter_by_threshold() {
        let now = Utc::now();
        let snapshots = vec![
            RatioSnapshot::new(now, Symbol::BtcUsdt, 0.6, 0.4, 12_345),
            RatioSnapshot::new(now, Symbol::EthUsdt, 0.45, 0.55, 50_000),
            RatioSnapshot::new(now, Symbol::SolUsdt, 0.3, 0.7, 80_000),
        ];

        let alerts = imbalance_alerts(&snapshots, DEFAULT_RATIO_THRESHOLD);
        assert_eq!(alerts.len(), 2);
        assert_eq!(
            alerts[0],
            "Strong LONG bias detected in BTCUSDT: 20.0% imbalance, ~$12,345 position"
        );
        assert!(alerts[1].starts_with("Strong SHORT bias detected in SOLUSDT: 40.0%"));
    }

    #[test]
    fn test_imbalance_alerts_empty_when_balanced() {
        let snapshots = vec![RatioSnapshot::new(Utc::now(), Symbol::BtcUsdt, 0.5, 0.5, 1)];
        assert!(imbalance_alerts(&snapshots, 0.0).is_empty());
    }

    #[test]
    fn test_liquidation_alerts() {
        let make = |leverage, pnl| {
            Position::new(
                "POS_100000".to_string(),
                Utc::now(),
                Symbol::EthUsdt,
                PositionSide::Short,
                Exchange::Bybit,
                250_000,
                leverage,
                2_500.0,
                pnl,
            )
        };

        let positions = vec![make(50, -0.10), make(2, -0.10), make(50, 0.10)];
        let alerts = liquidation_alerts(&positions);
        assert_eq!(alerts.len(), 1);
        assert!(alerts[0].starts_with("ETHUSDT SHORT 50x on Bybit at risk"));
        assert!(alerts[0].ends_with("$250,000 notional"));
    }
}
