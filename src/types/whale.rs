use super::market::{Exchange, PositionSide, Symbol, TradeType};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Share of margin consumed before a position is considered liquidated.
pub const LIQUIDATION_MARGIN_BUFFER: f64 = 0.8;

/// Leverage multipliers offered on simulated positions.
pub const LEVERAGE_CHOICES: [u32; 8] = [1, 2, 3, 5, 10, 20, 25, 50];

// =============================================================================
// Position Types
// =============================================================================

/// A simulated open leveraged position.
///
/// Only `notional_usd`, `entry_price`, `side`, `leverage` and
/// `unrealized_pnl_pct` are inputs. Every other price or size field is
/// produced by [`Position::derive`] and must not be written directly.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Position {
    /// Unique position ID (`POS_` + 6 digits)
    pub position_id: String,
    /// When the position was opened
    #[serde(rename = "time")]
    pub opened_at: DateTime<Utc>,
    pub symbol: Symbol,
    pub side: PositionSide,
    pub exchange: Exchange,
    /// Position size in USD before leverage
    #[serde(rename = "amount_usd", alias = "notional_usd")]
    pub notional_usd: u64,
    /// Leverage multiplier
    pub leverage: u32,
    /// Entry price
    pub entry_price: f64,
    /// Unrealized P&L as a fraction of notional (0.05 = +5%)
    pub unrealized_pnl_pct: f64,
    /// Size in base asset units
    pub position_size: f64,
    /// Unrealized P&L in USD
    pub unrealized_pnl: f64,
    /// Mark price implied by the P&L
    pub current_price: f64,
    /// Price at which the margin buffer is exhausted
    pub liquidation_price: f64,
    /// Margin posted for this position
    pub margin_used: f64,
}

impl Position {
    /// Build a position from its sampled inputs and derive the dependent fields.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        position_id: String,
        opened_at: DateTime<Utc>,
        symbol: Symbol,
        side: PositionSide,
        exchange: Exchange,
        notional_usd: u64,
        leverage: u32,
        entry_price: f64,
        unrealized_pnl_pct: f64,
    ) -> Self {
        let mut position = Self {
            position_id,
            opened_at,
            symbol,
            side,
            exchange,
            notional_usd,
            leverage,
            entry_price,
            unrealized_pnl_pct,
            position_size: 0.0,
            unrealized_pnl: 0.0,
            current_price: 0.0,
            liquidation_price: 0.0,
            margin_used: 0.0,
        };
        position.derive();
        position
    }

    /// Recompute size, margin, P&L and price fields from the inputs.
    pub fn derive(&mut self) {
        let notional = self.notional_usd as f64;
        self.position_size = notional / self.entry_price;
        self.margin_used = notional / self.leverage as f64;
        self.unrealized_pnl = notional * self.unrealized_pnl_pct;
        self.current_price = mark_price(self.entry_price, self.side, self.unrealized_pnl_pct);
        self.liquidation_price = liquidation_price(self.entry_price, self.side, self.leverage);
    }

    /// Move the position to a new P&L fraction, keeping derived fields consistent.
    pub fn set_pnl_pct(&mut self, pnl_pct: f64) {
        self.unrealized_pnl_pct = pnl_pct;
        self.derive();
    }

    /// Whether the implied mark price has crossed the liquidation price.
    pub fn is_liquidatable(&self) -> bool {
        match self.side {
            PositionSide::Long => self.current_price <= self.liquidation_price,
            PositionSide::Short => self.current_price >= self.liquidation_price,
        }
    }

    /// Leverage formatted the way traders read it ("10x").
    pub fn leverage_label(&self) -> String {
        format!("{}x", self.leverage)
    }

    /// P&L as a display percentage (12.34 for +12.34%).
    pub fn pnl_percent_display(&self) -> f64 {
        (self.unrealized_pnl_pct * 10_000.0).round() / 100.0
    }
}

/// Mark price implied by an entry price and P&L fraction.
pub fn mark_price(entry_price: f64, side: PositionSide, pnl_pct: f64) -> f64 {
    match side {
        PositionSide::Long => entry_price * (1.0 + pnl_pct),
        PositionSide::Short => entry_price * (1.0 - pnl_pct),
    }
}

/// Liquidation price under the fixed margin buffer model.
pub fn liquidation_price(entry_price: f64, side: PositionSide, leverage: u32) -> f64 {
    let buffer = LIQUIDATION_MARGIN_BUFFER / leverage as f64;
    match side {
        PositionSide::Long => entry_price * (1.0 - buffer),
        PositionSide::Short => entry_price * (1.0 + buffer),
    }
}

// =============================================================================
// Trade Types
// =============================================================================

/// A simulated closed whale trade.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Trade {
    /// Unique trade ID (`TRD_` + 7 digits)
    pub trade_id: String,
    #[serde(rename = "time")]
    pub executed_at: DateTime<Utc>,
    pub symbol: Symbol,
    #[serde(rename = "type")]
    pub trade_type: TradeType,
    pub exchange: Exchange,
    #[serde(rename = "amount_usd", alias = "notional_usd")]
    pub notional_usd: u64,
    /// Execution price
    pub price: f64,
    /// Base asset units (notional / price)
    pub quantity: f64,
    /// Assumed price impact in percent
    #[serde(rename = "market_impact")]
    pub market_impact_pct: f64,
}

impl Trade {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        trade_id: String,
        executed_at: DateTime<Utc>,
        symbol: Symbol,
        trade_type: TradeType,
        exchange: Exchange,
        notional_usd: u64,
        price: f64,
        market_impact_pct: f64,
    ) -> Self {
        Self {
            trade_id,
            executed_at,
            symbol,
            trade_type,
            exchange,
            notional_usd,
            price,
            quantity: notional_usd as f64 / price,
            market_impact_pct,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn long_btc(pnl_pct: f64, leverage: u32) -> Position {
        Position::new(
            "POS_123456".to_string(),
            Utc::now(),
            Symbol::BtcUsdt,
            PositionSide::Long,
            Exchange::Binance,
            100_000,
            leverage,
            100_000.0,
            pnl_pct,
        )
    }

    #[test]
    fn test_position_derived_fields_long() {
        let pos = long_btc(0.10, 10);
        assert!((pos.current_price - 110_000.0).abs() < 1e-6);
        assert!((pos.liquidation_price - 92_000.0).abs() < 1e-6);
        assert!((pos.margin_used - 10_000.0).abs() < 1e-9);
        assert!((pos.unrealized_pnl - 10_000.0).abs() < 1e-6);
        assert!((pos.position_size - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_position_derived_fields_short() {
        let mut pos = long_btc(0.10, 20);
        pos.side = PositionSide::Short;
        pos.derive();
        assert!((pos.current_price - 90_000.0).abs() < 1e-6);
        assert!((pos.liquidation_price - 104_000.0).abs() < 1e-6);
    }

    #[test]
    fn test_set_pnl_pct_rederives() {
        let mut pos = long_btc(0.0, 5);
        pos.set_pnl_pct(-0.05);
        assert!((pos.current_price - 95_000.0).abs() < 1e-6);
        assert!((pos.unrealized_pnl + 5_000.0).abs() < 1e-6);
        // Liquidation price depends only on entry and leverage
        assert!((pos.liquidation_price - 84_000.0).abs() < 1e-6);
    }

    #[test]
    fn test_is_liquidatable() {
        let pos = long_btc(-0.15, 50);
        // 50x long liquidates 1.6% below entry
        assert!(pos.is_liquidatable());

        let pos = long_btc(-0.15, 2);
        assert!(!pos.is_liquidatable());
    }

    #[test]
    fn test_position_serialization_field_names() {
        let pos = long_btc(0.1234, 10);
        let json = serde_json::to_value(&pos).unwrap();
        assert_eq!(json["symbol"], "BTCUSDT");
        assert_eq!(json["side"], "LONG");
        assert_eq!(json["amount_usd"], 100_000);
        assert!(json["time"].is_string());
        assert_eq!(pos.leverage_label(), "10x");
        assert_eq!(pos.pnl_percent_display(), 12.34);
    }

    #[test]
    fn test_trade_quantity() {
        let trade = Trade::new(
            "TRD_1234567".to_string(),
            Utc::now(),
            Symbol::EthUsdt,
            TradeType::Sell,
            Exchange::Kraken,
            50_000,
            2_500.0,
            1.25,
        );
        assert!((trade.quantity - 20.0).abs() < 1e-12);

        let json = serde_json::to_value(&trade).unwrap();
        assert_eq!(json["type"], "SELL");
        assert_eq!(json["market_impact"], 1.25);
    }
}
