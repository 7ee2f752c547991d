//! Whale activity report and JSON export.

use crate::types::{ActivitySummary, Position, Trade, TradeType};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt::Write as _;
use std::path::{Path, PathBuf};
use tracing::info;
use uuid::Uuid;

/// Number of rows in each "largest" table of the text report.
const REPORT_ROWS: usize = 5;
/// Number of symbols listed in the report's activity section.
const REPORT_SYMBOLS: usize = 3;

/// `1234567` -> `"1,234,567"`.
pub fn group_thousands(value: u64) -> String {
    let digits = value.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

/// `1234567.891` -> `"$1,234,567.89"`.
pub fn format_usd(value: f64) -> String {
    let sign = if value < 0.0 { "-" } else { "" };
    let cents = (value.abs() * 100.0).round() as u64;
    format!("{}${}.{:02}", sign, group_thousands(cents / 100), cents % 100)
}

/// A saved snapshot of generated activity and its analysis.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportDocument {
    pub id: Uuid,
    pub timestamp: DateTime<Utc>,
    pub positions: Vec<Position>,
    pub trades: Vec<Trade>,
    pub analysis: ActivitySummary,
}

impl ExportDocument {
    pub fn new(
        timestamp: DateTime<Utc>,
        positions: Vec<Position>,
        trades: Vec<Trade>,
        analysis: ActivitySummary,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            timestamp,
            positions,
            trades,
            analysis,
        }
    }

    /// `whale_activity_YYYYMMDD_HHMMSS.json`
    pub fn file_name(&self) -> String {
        format!("whale_activity_{}.json", self.timestamp.format("%Y%m%d_%H%M%S"))
    }

    /// Write the document as pretty JSON into `dir`, returning the file path.
    pub fn write_to(&self, dir: &Path) -> std::io::Result<PathBuf> {
        std::fs::create_dir_all(dir)?;
        let path = dir.join(self.file_name());
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(&path, json)?;
        info!("Whale activity export saved to {}", path.display());
        Ok(path)
    }
}

/// Render the plain-text whale activity report.
pub fn render_report(positions: &[Position], trades: &[Trade], analysis: &ActivitySummary) -> String {
    let mut out = String::new();
    let rule = "=".repeat(80);
    let summary = &analysis.summary;

    let _ = writeln!(out, "{}", rule);
    let _ = writeln!(out, "WHALE ACTIVITY MONITORING REPORT");
    let _ = writeln!(out, "{}", rule);

    let _ = writeln!(out, "\nMARKET OVERVIEW:");
    let _ = writeln!(out, "   Total Open Positions: {}", summary.total_open_positions);
    let _ = writeln!(
        out,
        "   Total Position Value: ${}",
        group_thousands(summary.total_position_value_usd)
    );
    let _ = writeln!(out, "   Long/Short Ratio: {}", summary.long_short_ratio);
    let _ = writeln!(out, "   Recent Trades: {}", summary.total_recent_trades);
    let _ = writeln!(
        out,
        "   Total Trade Volume: ${}",
        group_thousands(summary.total_trade_value_usd)
    );
    let _ = writeln!(out, "   Buy/Sell Ratio: {}", summary.buy_sell_ratio);

    let _ = writeln!(out, "\nLARGEST OPEN POSITIONS:");
    let mut largest: Vec<&Position> = positions.iter().collect();
    largest.sort_by(|a, b| b.notional_usd.cmp(&a.notional_usd));
    for (i, pos) in largest.iter().take(REPORT_ROWS).enumerate() {
        let marker = if pos.unrealized_pnl > 0.0 { "+" } else { "-" };
        let _ = writeln!(
            out,
            "   {}. {} {} - ${} ({}) [{}] {:.2}%",
            i + 1,
            pos.symbol,
            pos.side,
            group_thousands(pos.notional_usd),
            pos.leverage_label(),
            marker,
            pos.pnl_percent_display()
        );
    }

    let _ = writeln!(out, "\nRECENT LARGE TRADES:");
    let mut largest: Vec<&Trade> = trades.iter().collect();
    largest.sort_by(|a, b| b.notional_usd.cmp(&a.notional_usd));
    for (i, trade) in largest.iter().take(REPORT_ROWS).enumerate() {
        let marker = match trade.trade_type {
            TradeType::Buy => "+",
            TradeType::Sell => "-",
        };
        let _ = writeln!(
            out,
            "   {}. {} {} - ${} @ {} [{}] ({})",
            i + 1,
            trade.symbol,
            trade.trade_type,
            group_thousands(trade.notional_usd),
            format_usd(trade.price),
            marker,
            trade.executed_at.format("%Y-%m-%d %H:%M:%S")
        );
    }

    let _ = writeln!(out, "\nTOP SYMBOLS BY ACTIVITY:");
    for (i, activity) in analysis
        .top_symbols_positions
        .iter()
        .take(REPORT_SYMBOLS)
        .enumerate()
    {
        let _ = writeln!(
            out,
            "   {}. {}: {} positions, ${} value",
            i + 1,
            activity.symbol,
            activity.count,
            group_thousands(activity.total_value)
        );
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::aggregator::summarize;
    use crate::services::generator::{generate_positions, generate_trades};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_group_thousands() {
        assert_eq!(group_thousands(0), "0");
        assert_eq!(group_thousands(999), "999");
        assert_eq!(group_thousands(1_000), "1,000");
        assert_eq!(group_thousands(1_234_567), "1,234,567");
    }

    #[test]
    fn test_format_usd() {
        assert_eq!(format_usd(1_234_567.891), "$1,234,567.89");
        assert_eq!(format_usd(0.85), "$0.85");
        assert_eq!(format_usd(-12.5), "-$12.50");
    }

    #[test]
    fn test_render_report_sections() {
        let mut rng = StdRng::seed_from_u64(1);
        let now = Utc::now();
        let positions = generate_positions(&mut rng, now, 10_000, 15).unwrap();
        let trades = generate_trades(&mut rng, now, 5_000, 25).unwrap();
        let analysis = summarize(&positions, &trades);

        let report = render_report(&positions, &trades, &analysis);
        assert!(report.contains("MARKET OVERVIEW"));
        assert!(report.contains("Total Open Positions: 15"));
        assert!(report.contains("Recent Trades: 25"));
        assert!(report.contains("LARGEST OPEN POSITIONS"));
        assert!(report.contains("   5. "));
        assert!(report.contains("TOP SYMBOLS BY ACTIVITY"));
    }

    #[test]
    fn test_render_report_empty() {
        let analysis = summarize(&[], &[]);
        let report = render_report(&[], &[], &analysis);
        assert!(report.contains("Long/Short Ratio: ∞"));
        assert!(report.contains("Buy/Sell Ratio: ∞"));
    }

    #[test]
    fn test_export_file_name_and_write() {
        let timestamp = DateTime::parse_from_rfc3339("2025-06-01T12:34:56Z")
            .unwrap()
            .with_timezone(&Utc);
        let doc = ExportDocument::new(timestamp, vec![], vec![], summarize(&[], &[]));
        assert_eq!(doc.file_name(), "whale_activity_20250601_123456.json");

        let dir = std::env::temp_dir().join(format!("whalewatch-export-{}", doc.id));
        let path = doc.write_to(&dir).unwrap();
        let raw = std::fs::read_to_string(&path).unwrap();
        let json: serde_json::Value = serde_json::from_str(&raw).unwrap();
        assert_eq!(json["timestamp"], "2025-06-01T12:34:56Z");
        assert_eq!(json["analysis"]["summary"]["long_short_ratio"], "∞");
        std::fs::remove_dir_all(&dir).unwrap();
    }
}
