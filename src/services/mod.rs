pub mod aggregator;
pub mod alerts;
pub mod cache;
pub mod feed;
pub mod generator;
pub mod market_sim;
pub mod price_feed;
pub mod ratios;
pub mod report;
pub mod sampler;
pub mod simulator;
pub mod transfers;

pub use aggregator::{summarize, top_symbols, TOP_SYMBOLS};
pub use alerts::{imbalance_alerts, liquidation_alerts, DEFAULT_RATIO_THRESHOLD};
pub use cache::{Cache, Clock, ManualClock, SystemClock};
pub use feed::{FeedResult, WhaleFeed};
pub use generator::{
    generate_positions, generate_trades, PositionModel, SimulationError, TradeModel,
};
pub use market_sim::{DriftPolicy, PositionBook, TickerPolicy, TransferTicker};
pub use price_feed::{fallback_snapshot, format_quotes, PriceFeed};
pub use ratios::{generate_ratio_snapshots, ratio_summary};
pub use report::{render_report, ExportDocument};
pub use sampler::Categorical;
pub use simulator::WhaleSimulator;
