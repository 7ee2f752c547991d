//! Activity Aggregator
//!
//! Folds a batch of positions and trades into an [`ActivitySummary`].

use crate::types::{
    ActivitySummary, OverviewStats, Position, PositionSide, PositionSideStats, Ratio, Symbol,
    SymbolActivity, Trade, TradeType, TradeTypeStats,
};
use std::collections::HashMap;

/// Number of symbols kept in each ranking.
pub const TOP_SYMBOLS: usize = 5;

/// Summarize positions and trades. Empty inputs give zeroed totals and
/// infinite ratios. USD totals saturate at `u64::MAX`.
pub fn summarize(positions: &[Position], trades: &[Trade]) -> ActivitySummary {
    let mut side_stats = PositionSideStats::default();
    for pos in positions {
        match pos.side {
            PositionSide::Long => {
                side_stats.long_positions += 1;
                side_stats.long_value_usd = side_stats.long_value_usd.saturating_add(pos.notional_usd);
            }
            PositionSide::Short => {
                side_stats.short_positions += 1;
                side_stats.short_value_usd = side_stats.short_value_usd.saturating_add(pos.notional_usd);
            }
        }
    }

    let mut type_stats = TradeTypeStats::default();
    for trade in trades {
        match trade.trade_type {
            TradeType::Buy => {
                type_stats.buy_trades += 1;
                type_stats.buy_value_usd = type_stats.buy_value_usd.saturating_add(trade.notional_usd);
            }
            TradeType::Sell => {
                type_stats.sell_trades += 1;
                type_stats.sell_value_usd = type_stats.sell_value_usd.saturating_add(trade.notional_usd);
            }
        }
    }

    let summary = OverviewStats {
        total_open_positions: positions.len(),
        total_position_value_usd: side_stats
            .long_value_usd
            .saturating_add(side_stats.short_value_usd),
        long_short_ratio: Ratio::of(
            side_stats.long_value_usd as f64,
            side_stats.short_value_usd as f64,
        ),
        total_recent_trades: trades.len(),
        total_trade_value_usd: type_stats.buy_value_usd.saturating_add(type_stats.sell_value_usd),
        buy_sell_ratio: Ratio::of(type_stats.buy_value_usd as f64, type_stats.sell_value_usd as f64),
    };

    ActivitySummary {
        summary,
        positions: side_stats,
        trades: type_stats,
        top_symbols_positions: top_symbols(positions.iter().map(|p| (p.symbol, p.notional_usd))),
        top_symbols_trades: top_symbols(trades.iter().map(|t| (t.symbol, t.notional_usd))),
    }
}

/// Group `(symbol, notional)` pairs and keep the largest by total value.
/// Ties fall back to symbol order so the ranking is stable.
pub fn top_symbols<I>(entries: I) -> Vec<SymbolActivity>
where
    I: IntoIterator<Item = (Symbol, u64)>,
{
    let mut by_symbol: HashMap<Symbol, (usize, u64)> = HashMap::new();
    for (symbol, value) in entries {
        let slot = by_symbol.entry(symbol).or_insert((0, 0));
        slot.0 += 1;
        slot.1 = slot.1.saturating_add(value);
    }

    let mut ranked: Vec<SymbolActivity> = by_symbol
        .into_iter()
        .map(|(symbol, (count, total_value))| SymbolActivity {
            symbol,
            count,
            total_value,
        })
        .collect();

    ranked.sort_by(|a, b| {
        b.total_value
            .cmp(&a.total_value)
            .then_with(|| a.symbol.cmp(&b.symbol))
    });
    ranked.truncate(TOP_SYMBOLS);
    ranked
}
