use std::env;
use std::path::PathBuf;
use std::time::Duration;

/// Whale simulation configuration.
#[derive(Debug, Clone)]
pub struct SimulationConfig {
    /// Minimum notional for simulated open positions (USD).
    pub position_min_usd: i64,
    /// Minimum notional for simulated closed trades (USD).
    pub trade_min_usd: i64,
    /// Default number of positions per request.
    pub position_count: usize,
    /// Default number of trades per request.
    pub trade_count: usize,
    /// Upper bound on any requested count.
    pub max_count: usize,
    /// Width of the memoization bucket for generated feeds (seconds).
    pub feed_bucket_secs: u64,
    /// Fixed seed for reproducible output. Entropy is used when unset.
    pub seed: Option<u64>,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            position_min_usd: 50_000,
            trade_min_usd: 5_000,
            position_count: 8,
            trade_count: 20,
            max_count: 500,
            feed_bucket_secs: 10,
            seed: None,
        }
    }
}

/// Alerting thresholds.
#[derive(Debug, Clone)]
pub struct AlertConfig {
    /// Long/short ratio difference above which an imbalance alert fires.
    pub ratio_threshold: f64,
}

impl Default for AlertConfig {
    fn default() -> Self {
        Self {
            ratio_threshold: 0.15,
        }
    }
}

/// Application configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// Server host address.
    pub host: String,
    /// Server port.
    pub port: u16,
    /// CoinGecko API key (optional, for pro tier).
    pub coingecko_api_key: Option<String>,
    /// How long a fetched price snapshot stays fresh.
    pub price_cache_ttl: Duration,
    /// Dashboard polling interval advertised to clients (seconds).
    pub refresh_interval_secs: u64,
    /// Directory export documents are written to.
    pub export_dir: PathBuf,
    /// Whale simulation configuration.
    pub simulation: SimulationConfig,
    /// Alerting thresholds.
    pub alerts: AlertConfig,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build configuration from an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = SimulationConfig::default();

        Self {
            host: lookup("HOST").unwrap_or_else(|| "0.0.0.0".to_string()),
            port: lookup("PORT")
                .and_then(|p| p.parse().ok())
                .unwrap_or(3001),
            coingecko_api_key: lookup("COINGECKO_API_KEY").filter(|k| !k.is_empty()),
            price_cache_ttl: Duration::from_secs(
                lookup("PRICE_CACHE_TTL_SECS")
                    .and_then(|v| v.parse().ok())
                    .unwrap_or(60),
            ),
            refresh_interval_secs: lookup("REFRESH_INTERVAL_SECS")
                .and_then(|v| v.parse().ok())
                .unwrap_or(10),
            export_dir: lookup("EXPORT_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(".")),
            simulation: SimulationConfig {
                position_min_usd: lookup("POSITION_MIN_USD")
                    .and_then(|v| v.parse().ok())
                    .unwrap_or(defaults.position_min_usd),
                trade_min_usd: lookup("TRADE_MIN_USD")
                    .and_then(|v| v.parse().ok())
                    .unwrap_or(defaults.trade_min_usd),
                position_count: lookup("POSITION_COUNT")
                    .and_then(|v| v.parse().ok())
                    .unwrap_or(defaults.position_count),
                trade_count: lookup("TRADE_COUNT")
                    .and_then(|v| v.parse().ok())
                    .unwrap_or(defaults.trade_count),
                max_count: lookup("MAX_GENERATE_COUNT")
                    .and_then(|v| v.parse().ok())
                    .unwrap_or(defaults.max_count),
                feed_bucket_secs: lookup("FEED_BUCKET_SECS")
                    .and_then(|v| v.parse().ok())
                    .filter(|v| *v > 0)
                    .unwrap_or(defaults.feed_bucket_secs),
                seed: lookup("WHALE_SEED").and_then(|v| v.parse().ok()),
            },
            alerts: AlertConfig {
                ratio_threshold: lookup("ALERT_RATIO_THRESHOLD")
                    .and_then(|v| v.parse().ok())
                    .unwrap_or(0.15),
            },
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::from_lookup(|_| None)
    }
}
