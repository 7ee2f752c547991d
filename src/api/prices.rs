use axum::{extract::State, routing::get, Json, Router};
use serde::Serialize;
use std::collections::BTreeMap;

use super::{ApiMeta, ApiResponse};
use crate::services::format_quotes;
use crate::types::{CoinQuote, FormattedQuote, PriceSource};
use crate::AppState;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PricesResponse {
    pub source: PriceSource,
    pub fetched_at: i64,
    pub quotes: BTreeMap<String, CoinQuote>,
    pub formatted: BTreeMap<String, FormattedQuote>,
}

/// Spot prices for the dashboard ticker. Never fails; falls back to static quotes.
async fn get_prices(State(state): State<AppState>) -> Json<ApiResponse<PricesResponse>> {
    let (snapshot, cached) = state.price_feed.prices().await;
    let formatted = format_quotes(&snapshot);

    Json(ApiResponse::new(
        PricesResponse {
            source: snapshot.source,
            fetched_at: snapshot.fetched_at,
            quotes: snapshot.quotes,
            formatted,
        },
        ApiMeta::cached(cached),
    ))
}

pub fn router() -> Router<AppState> {
    Router::new().route("/", get(get_prices))
}
