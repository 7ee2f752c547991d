//! CoinGecko spot prices with a static fallback.

use super::cache::Cache;
use super::report::{format_usd, group_thousands};
use crate::types::{CoinQuote, FormattedQuote, PriceSnapshot, PriceSource};
use reqwest::Client;
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

const COINGECKO_API_URL: &str = "https://api.coingecko.com/api/v3";
const COINGECKO_PRO_API_URL: &str = "https://pro-api.coingecko.com/api/v3";
const REQUEST_TIMEOUT_SECS: u64 = 10;
const CACHE_KEY: &str = "simple_price";

/// CoinGecko ids quoted on the dashboard.
pub const COIN_IDS: [&str; 6] = [
    "bitcoin",
    "ethereum",
    "solana",
    "binancecoin",
    "cardano",
    "polkadot",
];

/// Quotes served when CoinGecko cannot be reached.
pub const FALLBACK_QUOTES: [(&str, f64, f64, f64, f64); 6] = [
    ("bitcoin", 104_906.0, 2.4, 2_050_000_000_000.0, 28_000_000_000.0),
    ("ethereum", 2_526.53, -0.8, 304_000_000_000.0, 12_000_000_000.0),
    ("solana", 145.74, 1.2, 69_000_000_000.0, 2_500_000_000.0),
    ("binancecoin", 692.45, 0.5, 100_000_000_000.0, 1_800_000_000.0),
    ("cardano", 1.23, -1.5, 43_000_000_000.0, 850_000_000.0),
    ("polkadot", 7.89, 3.2, 11_000_000_000.0, 420_000_000.0),
];

/// The fallback table as a snapshot stamped `fetched_at`.
pub fn fallback_snapshot(fetched_at: i64) -> PriceSnapshot {
    let quotes = FALLBACK_QUOTES
        .iter()
        .map(|(id, usd, change, cap, vol)| {
            (
                id.to_string(),
                CoinQuote {
                    usd: *usd,
                    usd_24h_change: Some(*change),
                    usd_market_cap: Some(*cap),
                    usd_24h_vol: Some(*vol),
                },
            )
        })
        .collect();

    PriceSnapshot {
        source: PriceSource::Fallback,
        fetched_at,
        quotes,
    }
}

/// Display strings: `$104,906.00`, `+2.40%`, `$2,050,000,000,000`.
pub fn format_quotes(snapshot: &PriceSnapshot) -> BTreeMap<String, FormattedQuote> {
    snapshot
        .quotes
        .iter()
        .map(|(id, quote)| {
            let whole = |v: Option<f64>| format!("${}", group_thousands(v.unwrap_or(0.0).max(0.0).round() as u64));
            (
                id.clone(),
                FormattedQuote {
                    price: format_usd(quote.usd),
                    change_24h: format!("{:+.2}%", quote.usd_24h_change.unwrap_or(0.0)),
                    market_cap: whole(quote.usd_market_cap),
                    volume_24h: whole(quote.usd_24h_vol),
                },
            )
        })
        .collect()
}

/// Spot price client. Failures degrade to [`fallback_snapshot`].
#[derive(Clone)]
pub struct PriceFeed {
    client: Client,
    api_key: Option<String>,
    base_url: String,
    cache: Arc<Cache<PriceSnapshot>>,
}

impl PriceFeed {
    pub fn new(api_key: Option<String>, cache: Arc<Cache<PriceSnapshot>>) -> Self {
        let base_url = if api_key.is_some() {
            COINGECKO_PRO_API_URL
        } else {
            COINGECKO_API_URL
        };
        Self::with_base_url(api_key, cache, base_url)
    }

    pub fn with_base_url(
        api_key: Option<String>,
        cache: Arc<Cache<PriceSnapshot>>,
        base_url: impl Into<String>,
    ) -> Self {
        let client = Client::builder()
            .user_agent("WhaleWatch/0.1 (Whale Activity Dashboard)")
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .unwrap_or_else(|_| Client::new());

        Self {
            client,
            api_key,
            base_url: base_url.into(),
            cache,
        }
    }

    /// Current quotes and whether they were served from cache.
    pub async fn prices(&self) -> (PriceSnapshot, bool) {
        if let Some(snapshot) = self.cache.get(CACHE_KEY) {
            debug!("Price cache hit");
            return (snapshot, true);
        }

        match self.fetch().await {
            Ok(snapshot) => {
                info!("Fetched {} CoinGecko quotes", snapshot.quotes.len());
                self.cache.set(CACHE_KEY.to_string(), snapshot.clone());
                (snapshot, false)
            }
            Err(e) => {
                warn!("CoinGecko price fetch failed, serving fallback: {}", e);
                (fallback_snapshot(chrono::Utc::now().timestamp_millis()), false)
            }
        }
    }

    async fn fetch(&self) -> anyhow::Result<PriceSnapshot> {
        let mut url = format!(
            "{}/simple/price?ids={}&vs_currencies=usd&include_24hr_change=true&include_market_cap=true&include_24hr_vol=true",
            self.base_url,
            COIN_IDS.join(",")
        );

        if let Some(ref key) = self.api_key {
            url.push_str(&format!("&x_cg_pro_api_key={}", key));
        }

        let response = self
            .client
            .get(&url)
            .header("Accept", "application/json")
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let text = response.text().await.unwrap_or_default();
            let preview: String = text.chars().take(200).collect();
            warn!("CoinGecko API returned {}: {}", status, preview);
            return Err(anyhow::anyhow!("CoinGecko API error: {}", status));
        }

        let raw: HashMap<String, CoinQuote> = response.json().await?;
        if raw.is_empty() {
            return Err(anyhow::anyhow!("CoinGecko returned no quotes"));
        }

        Ok(PriceSnapshot {
            source: PriceSource::CoinGecko,
            fetched_at: chrono::Utc::now().timestamp_millis(),
            quotes: raw.into_iter().collect(),
        })
    }
}
