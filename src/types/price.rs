use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Where a price snapshot came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PriceSource {
    CoinGecko,
    /// Static table served when the upstream is unavailable.
    Fallback,
}

impl fmt::Display for PriceSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PriceSource::CoinGecko => write!(f, "coingecko"),
            PriceSource::Fallback => write!(f, "fallback"),
        }
    }
}

/// USD quote for a single coin, in the CoinGecko simple-price shape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CoinQuote {
    pub usd: f64,
    #[serde(default)]
    pub usd_24h_change: Option<f64>,
    #[serde(default)]
    pub usd_market_cap: Option<f64>,
    #[serde(default)]
    pub usd_24h_vol: Option<f64>,
}

/// Quotes keyed by CoinGecko coin id ("bitcoin", "ethereum", ...).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PriceSnapshot {
    pub source: PriceSource,
    /// Fetch time (ms)
    pub fetched_at: i64,
    pub quotes: BTreeMap<String, CoinQuote>,
}

/// Display strings for a quote.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FormattedQuote {
    pub price: String,
    pub change_24h: String,
    pub market_cap: String,
    pub volume_24h: String,
}
