use super::market::Symbol;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Placeholder rendered for a ratio with a zero denominator.
pub const INFINITE_RATIO_LABEL: &str = "∞";

/// A value ratio such as long/short that may have an empty denominator.
///
/// Finite values are kept rounded to two decimals; they are display values.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Ratio {
    Finite(f64),
    /// Denominator was zero (also used for 0/0).
    Infinite,
}

impl Ratio {
    pub fn of(numerator: f64, denominator: f64) -> Self {
        if denominator > 0.0 {
            Ratio::Finite((numerator / denominator * 100.0).round() / 100.0)
        } else {
            Ratio::Infinite
        }
    }

    pub fn is_infinite(&self) -> bool {
        matches!(self, Ratio::Infinite)
    }

    pub fn value(&self) -> Option<f64> {
        match self {
            Ratio::Finite(v) => Some(*v),
            Ratio::Infinite => None,
        }
    }
}

impl std::fmt::Display for Ratio {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Ratio::Finite(v) => write!(f, "{:.2}", v),
            Ratio::Infinite => f.write_str(INFINITE_RATIO_LABEL),
        }
    }
}

impl Serialize for Ratio {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Ratio::Finite(v) => serializer.serialize_f64(*v),
            Ratio::Infinite => serializer.serialize_str(INFINITE_RATIO_LABEL),
        }
    }
}

impl<'de> Deserialize<'de> for Ratio {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Number(f64),
            Label(String),
        }

        match Raw::deserialize(deserializer)? {
            Raw::Number(v) => Ok(Ratio::Finite(v)),
            Raw::Label(s) if s == INFINITE_RATIO_LABEL => Ok(Ratio::Infinite),
            Raw::Label(s) => Err(serde::de::Error::custom(format!("invalid ratio: {}", s))),
        }
    }
}

/// Aggregate activity for one symbol.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SymbolActivity {
    pub symbol: Symbol,
    pub count: usize,
    #[serde(rename = "value")]
    pub total_value: u64,
}

/// Headline figures.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OverviewStats {
    pub total_open_positions: usize,
    pub total_position_value_usd: u64,
    pub long_short_ratio: Ratio,
    pub total_recent_trades: usize,
    pub total_trade_value_usd: u64,
    pub buy_sell_ratio: Ratio,
}

/// Open position split by side.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PositionSideStats {
    pub long_positions: usize,
    pub long_value_usd: u64,
    pub short_positions: usize,
    pub short_value_usd: u64,
}

/// Closed trade split by direction.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TradeTypeStats {
    pub buy_trades: usize,
    pub buy_value_usd: u64,
    pub sell_trades: usize,
    pub sell_value_usd: u64,
}

/// Summary of a batch of positions and trades.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActivitySummary {
    pub summary: OverviewStats,
    pub positions: PositionSideStats,
    pub trades: TradeTypeStats,
    /// Top symbols by open notional, descending, at most five
    pub top_symbols_positions: Vec<SymbolActivity>,
    /// Top symbols by traded notional, descending, at most five
    pub top_symbols_trades: Vec<SymbolActivity>,
}

impl ActivitySummary {
    pub fn long_value(&self) -> u64 {
        self.positions.long_value_usd
    }

    pub fn short_value(&self) -> u64 {
        self.positions.short_value_usd
    }

    pub fn long_short_ratio(&self) -> Ratio {
        self.summary.long_short_ratio
    }

    pub fn buy_sell_ratio(&self) -> Ratio {
        self.summary.buy_sell_ratio
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ratio_of() {
        assert_eq!(Ratio::of(100.0, 300.0), Ratio::Finite(0.33));
        assert_eq!(Ratio::of(300.0, 100.0), Ratio::Finite(3.0));
        assert_eq!(Ratio::of(5.0, 0.0), Ratio::Infinite);
        assert_eq!(Ratio::of(0.0, 0.0), Ratio::Infinite);
    }

    #[test]
    fn test_ratio_display() {
        assert_eq!(Ratio::Finite(1.5).to_string(), "1.50");
        assert_eq!(Ratio::Infinite.to_string(), "∞");
    }

    #[test]
    fn test_ratio_serde() {
        assert_eq!(serde_json::to_string(&Ratio::Finite(0.33)).unwrap(), "0.33");
        assert_eq!(serde_json::to_string(&Ratio::Infinite).unwrap(), "\"∞\"");

        let parsed: Ratio = serde_json::from_str("\"∞\"").unwrap();
        assert!(parsed.is_infinite());
        let parsed: Ratio = serde_json::from_str("2.5").unwrap();
        assert_eq!(parsed.value(), Some(2.5));
        assert!(serde_json::from_str::<Ratio>("\"n/a\"").is_err());
    }
}
