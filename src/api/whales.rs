use axum::{
    extract::{Query, State},
    routing::{get, post},
    Json, Router,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{ApiMeta, ApiResponse};
use crate::error::{AppError, Result};
use crate::services::{
    imbalance_alerts, liquidation_alerts, ratio_summary, summarize, ExportDocument,
};
use crate::types::{
    ActivitySummary, Position, RatioSnapshot, RatioSummary, Trade, TransferStats, WhaleTransfer,
};
use crate::AppState;

const DEFAULT_TRANSFER_COUNT: usize = 10;
const DEFAULT_HISTORY_HOURS: u32 = 24;
const MAX_HISTORY_HOURS: u32 = 72;

/// Query for position and trade feeds.
#[derive(Debug, Default, Deserialize)]
pub struct FeedQuery {
    #[serde(default)]
    pub count: Option<usize>,
    #[serde(default)]
    pub min_usd: Option<i64>,
    /// Skip the time-bucket cache.
    #[serde(default)]
    pub fresh: bool,
}

#[derive(Debug, Default, Deserialize)]
pub struct SummaryQuery {
    #[serde(default)]
    pub positions: Option<usize>,
    #[serde(default)]
    pub trades: Option<usize>,
    /// Overrides both position and trade minimums.
    #[serde(default)]
    pub min_usd: Option<i64>,
}

#[derive(Debug, Default, Deserialize)]
pub struct CountQuery {
    #[serde(default)]
    pub count: Option<usize>,
}

#[derive(Debug, Default, Deserialize)]
pub struct HistoryQuery {
    #[serde(default)]
    pub hours: Option<u32>,
}

#[derive(Debug, Default, Deserialize)]
pub struct AlertsQuery {
    #[serde(default)]
    pub threshold: Option<f64>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionResponse {
    pub positions: Vec<Position>,
    pub last_update: Option<DateTime<Utc>>,
    /// Whether this poll changed the book.
    pub changed: bool,
    pub refresh_interval_secs: u64,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TransfersResponse {
    pub transfers: Vec<WhaleTransfer>,
    /// Ticker sentence for the newest transfer.
    pub latest_alert: Option<String>,
    pub last_update: Option<DateTime<Utc>>,
    /// Whether this poll appended a transfer.
    pub changed: bool,
}

#[derive(Debug, Serialize)]
pub struct RatiosResponse {
    pub snapshots: Vec<RatioSnapshot>,
    pub summary: RatioSummary,
}

#[derive(Debug, Serialize)]
pub struct AlertsResponse {
    pub threshold: f64,
    pub imbalance: Vec<String>,
    pub liquidation: Vec<String>,
}

fn check_count(state: &AppState, count: usize) -> Result<usize> {
    let max = state.config.simulation.max_count;
    if count > max {
        return Err(AppError::BadRequest(format!(
            "count {} exceeds maximum of {}",
            count, max
        )));
    }
    Ok(count)
}

/// Simulated open positions.
async fn get_positions(
    State(state): State<AppState>,
    Query(params): Query<FeedQuery>,
) -> Result<Json<ApiResponse<Vec<Position>>>> {
    let sim = &state.config.simulation;
    let count = check_count(&state, params.count.unwrap_or(sim.position_count))?;
    let min_usd = params.min_usd.unwrap_or(sim.position_min_usd);

    let result = state.feed.positions(Utc::now(), min_usd, count, params.fresh)?;
    let len = result.items.len();
    Ok(Json(ApiResponse::new(
        result.items,
        ApiMeta::with_count(result.cached, len),
    )))
}

/// Simulated closed trades.
async fn get_trades(
    State(state): State<AppState>,
    Query(params): Query<FeedQuery>,
) -> Result<Json<ApiResponse<Vec<Trade>>>> {
    let sim = &state.config.simulation;
    let count = check_count(&state, params.count.unwrap_or(sim.trade_count))?;
    let min_usd = params.min_usd.unwrap_or(sim.trade_min_usd);

    let result = state.feed.trades(Utc::now(), min_usd, count, params.fresh)?;
    let len = result.items.len();
    Ok(Json(ApiResponse::new(
        result.items,
        ApiMeta::with_count(result.cached, len),
    )))
}

/// Aggregated activity over the current position and trade feeds.
async fn get_summary(
    State(state): State<AppState>,
    Query(params): Query<SummaryQuery>,
) -> Result<Json<ApiResponse<ActivitySummary>>> {
    let sim = &state.config.simulation;
    let position_count = check_count(&state, params.positions.unwrap_or(sim.position_count))?;
    let trade_count = check_count(&state, params.trades.unwrap_or(sim.trade_count))?;
    let position_min = params.min_usd.unwrap_or(sim.position_min_usd);
    let trade_min = params.min_usd.unwrap_or(sim.trade_min_usd);

    let now = Utc::now();
    let positions = state.feed.positions(now, position_min, position_count, false)?;
    let trades = state.feed.trades(now, trade_min, trade_count, false)?;

    let analysis = summarize(&positions.items, &trades.items);
    Ok(Json(ApiResponse::new(
        analysis,
        ApiMeta::cached(positions.cached && trades.cached),
    )))
}

/// Poll the drifting session book.
async fn get_session(State(state): State<AppState>) -> Result<Json<ApiResponse<SessionResponse>>> {
    let mut book = state.session.lock().await;
    let changed = state.simulator.tick_session(&mut book, Utc::now());

    let response = SessionResponse {
        positions: book.positions().to_vec(),
        last_update: book.last_update(),
        changed,
        refresh_interval_secs: state.config.refresh_interval_secs,
    };
    let len = response.positions.len();
    Ok(Json(ApiResponse::new(response, ApiMeta::with_count(!changed, len))))
}

/// Replace the session book immediately.
async fn refresh_session(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<SessionResponse>>> {
    let mut book = state.session.lock().await;
    state.simulator.refresh_session(&mut book, Utc::now());

    let response = SessionResponse {
        positions: book.positions().to_vec(),
        last_update: book.last_update(),
        changed: true,
        refresh_interval_secs: state.config.refresh_interval_secs,
    };
    let len = response.positions.len();
    Ok(Json(ApiResponse::new(response, ApiMeta::with_count(false, len))))
}

/// Poll the rolling transfer ticker.
async fn get_transfers(State(state): State<AppState>) -> Json<ApiResponse<TransfersResponse>> {
    let mut ticker = state.ticker.lock().await;
    let changed = state.simulator.tick_ticker(&mut ticker, Utc::now());

    let transfers = ticker.transfers();
    let latest_alert = transfers.first().map(|t| state.simulator.transfer_alert(t));
    let len = transfers.len();
    Json(ApiResponse::new(
        TransfersResponse {
            transfers,
            latest_alert,
            last_update: ticker.last_update(),
            changed,
        },
        ApiMeta::with_count(!changed, len),
    ))
}

/// A one-off batch of transfers, newest first.
async fn get_transfer_batch(
    State(state): State<AppState>,
    Query(params): Query<CountQuery>,
) -> Result<Json<ApiResponse<Vec<WhaleTransfer>>>> {
    let count = check_count(&state, params.count.unwrap_or(DEFAULT_TRANSFER_COUNT))?;
    let transfers = state.simulator.transfers(Utc::now(), count);
    let len = transfers.len();
    Ok(Json(ApiResponse::new(transfers, ApiMeta::with_count(false, len))))
}

async fn get_transfer_history(
    State(state): State<AppState>,
    Query(params): Query<HistoryQuery>,
) -> Result<Json<ApiResponse<Vec<WhaleTransfer>>>> {
    let hours = params.hours.unwrap_or(DEFAULT_HISTORY_HOURS);
    if hours == 0 || hours > MAX_HISTORY_HOURS {
        return Err(AppError::BadRequest(format!(
            "hours must be between 1 and {}",
            MAX_HISTORY_HOURS
        )));
    }

    let history = state.simulator.transfer_history(Utc::now(), hours);
    let len = history.len();
    Ok(Json(ApiResponse::new(history, ApiMeta::with_count(false, len))))
}

async fn get_transfer_stats(State(state): State<AppState>) -> Json<ApiResponse<TransferStats>> {
    Json(ApiResponse::new(
        state.simulator.transfer_stats(),
        ApiMeta::simple(),
    ))
}

async fn get_ratios(State(state): State<AppState>) -> Result<Json<ApiResponse<RatiosResponse>>> {
    let snapshots = state
        .simulator
        .ratio_snapshots(Utc::now(), state.config.simulation.position_min_usd)?;
    let summary = ratio_summary(&snapshots);

    let len = snapshots.len();
    Ok(Json(ApiResponse::new(
        RatiosResponse { snapshots, summary },
        ApiMeta::with_count(false, len),
    )))
}

/// Imbalance alerts over fresh ratio snapshots and liquidation alerts over
/// the session book.
async fn get_alerts(
    State(state): State<AppState>,
    Query(params): Query<AlertsQuery>,
) -> Result<Json<ApiResponse<AlertsResponse>>> {
    let threshold = params
        .threshold
        .unwrap_or(state.config.alerts.ratio_threshold);
    if !(0.0..=1.0).contains(&threshold) {
        return Err(AppError::BadRequest(format!(
            "threshold {} must be between 0 and 1",
            threshold
        )));
    }

    let snapshots = state
        .simulator
        .ratio_snapshots(Utc::now(), state.config.simulation.position_min_usd)?;
    let imbalance = imbalance_alerts(&snapshots, threshold);
    let liquidation = liquidation_alerts(state.session.lock().await.positions());

    Ok(Json(ApiResponse::new(
        AlertsResponse {
            threshold,
            imbalance,
            liquidation,
        },
        ApiMeta::simple(),
    )))
}

/// Export document for the current feeds.
async fn get_export(State(state): State<AppState>) -> Result<Json<ApiResponse<ExportDocument>>> {
    let sim = &state.config.simulation;
    let now = Utc::now();
    let positions = state
        .feed
        .positions(now, sim.position_min_usd, sim.position_count, false)?;
    let trades = state
        .feed
        .trades(now, sim.trade_min_usd, sim.trade_count, false)?;

    let analysis = summarize(&positions.items, &trades.items);
    let cached = positions.cached && trades.cached;
    let doc = ExportDocument::new(now, positions.items, trades.items, analysis);
    Ok(Json(ApiResponse::new(doc, ApiMeta::cached(cached))))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/positions", get(get_positions))
        .route("/trades", get(get_trades))
        .route("/summary", get(get_summary))
        .route("/session", get(get_session))
        .route("/session/refresh", post(refresh_session))
        .route("/transfers", get(get_transfers))
        .route("/transfers/batch", get(get_transfer_batch))
        .route("/transfers/history", get(get_transfer_history))
        .route("/transfers/stats", get(get_transfer_stats))
        .route("/ratios", get(get_ratios))
        .route("/alerts", get(get_alerts))
        .route("/export", get(get_export))
}
