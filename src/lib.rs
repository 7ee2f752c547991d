//! WhaleWatch - simulated crypto whale activity dashboard server

pub mod api;
pub mod config;
pub mod error;
pub mod services;
pub mod types;

use config::Config;
use services::{
    Cache, PositionBook, PriceFeed, SimulationError, TransferTicker, WhaleFeed, WhaleSimulator,
};
use std::sync::Arc;
use tokio::sync::Mutex;

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub simulator: Arc<WhaleSimulator>,
    pub feed: Arc<WhaleFeed>,
    pub price_feed: Arc<PriceFeed>,
    pub session: Arc<Mutex<PositionBook>>,
    pub ticker: Arc<Mutex<TransferTicker>>,
}

impl AppState {
    /// Wire up services from configuration.
    pub fn new(config: Config) -> Result<Self, SimulationError> {
        let sim = &config.simulation;
        let simulator = Arc::new(WhaleSimulator::new(sim.seed)?);
        let feed = Arc::new(WhaleFeed::new(simulator.clone(), sim.feed_bucket_secs));
        let session = PositionBook::new(sim.position_min_usd, sim.position_count)?;

        let price_cache = Arc::new(Cache::new(config.price_cache_ttl));
        let price_feed = Arc::new(PriceFeed::new(config.coingecko_api_key.clone(), price_cache));

        Ok(Self {
            config: Arc::new(config),
            simulator,
            feed,
            price_feed,
            session: Arc::new(Mutex::new(session)),
            ticker: Arc::new(Mutex::new(TransferTicker::new())),
        })
    }

    /// Same as [`AppState::new`] but with an explicit price feed.
    pub fn with_price_feed(config: Config, price_feed: PriceFeed) -> Result<Self, SimulationError> {
        let mut state = Self::new(config)?;
        state.price_feed = Arc::new(price_feed);
        Ok(state)
    }
}
