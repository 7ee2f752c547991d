//! Router tests for the whale API

use std::sync::Arc;
use std::time::Duration;

use axum::body::Body;
use axum::http::{Method, Request, StatusCode};
use serde_json::Value;
use tower::ServiceExt;

use whalewatch::api;
use whalewatch::config::Config;
use whalewatch::services::{Cache, PriceFeed};
use whalewatch::AppState;

fn build_test_app() -> axum::Router {
    let mut config = Config::default();
    config.simulation.seed = Some(2024);
    config.simulation.max_count = 50;
    config.simulation.feed_bucket_secs = 86_400;

    // Nothing listens on the discard port, so prices always fall back
    let price_feed = PriceFeed::with_base_url(
        None,
        Arc::new(Cache::new(Duration::from_secs(60))),
        "http://127.0.0.1:9",
    );
    let state = AppState::with_price_feed(config, price_feed).unwrap();
    api::router().with_state(state)
}

async fn send(app: axum::Router, method: Method, uri: &str) -> (StatusCode, Value) {
    let resp = app
        .oneshot(
            Request::builder()
                .method(method)
                .uri(uri)
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    let status = resp.status();
    let body = axum::body::to_bytes(resp.into_body(), usize::MAX)
        .await
        .unwrap();
    let json = serde_json::from_slice(&body).unwrap_or(Value::Null);
    (status, json)
}

async fn get(app: axum::Router, uri: &str) -> (StatusCode, Value) {
    send(app, Method::GET, uri).await
}

#[tokio::test]
async fn test_health() {
    let (status, json) = get(build_test_app(), "/api/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["status"], "ok");
    assert_eq!(json["simulated"], true);
    assert_eq!(json["seeded"], true);
}

#[tokio::test]
async fn test_positions_default_count() {
    let (status, json) = get(build_test_app(), "/api/whales/positions").await;
    assert_eq!(status, StatusCode::OK);

    let positions = json["data"].as_array().unwrap();
    assert_eq!(positions.len(), 8);
    assert_eq!(json["meta"]["count"], 8);
    for p in positions {
        assert!(p["amount_usd"].as_u64().unwrap() >= 50_000);
        assert!(p["position_id"].as_str().unwrap().starts_with("POS_"));
    }
}

#[tokio::test]
async fn test_positions_are_cached_within_bucket() {
    let app = build_test_app();
    let (_, first) = get(app.clone(), "/api/whales/positions?count=3&min_usd=100000").await;
    let (_, second) = get(app, "/api/whales/positions?count=3&min_usd=100000").await;

    assert_eq!(second["meta"]["cached"], true);
    assert_eq!(first["data"], second["data"]);
}

#[tokio::test]
async fn test_trades_with_params() {
    let (status, json) = get(build_test_app(), "/api/whales/trades?count=12&min_usd=20000").await;
    assert_eq!(status, StatusCode::OK);

    let trades = json["data"].as_array().unwrap();
    assert_eq!(trades.len(), 12);
    for t in trades {
        assert!(t["amount_usd"].as_u64().unwrap() >= 20_000);
        assert!(t["type"] == "BUY" || t["type"] == "SELL");
    }
}

#[tokio::test]
async fn test_zero_count_is_empty() {
    let (status, json) = get(build_test_app(), "/api/whales/trades?count=0").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["data"].as_array().unwrap().len(), 0);
}

#[tokio::test]
async fn test_invalid_minimum_is_bad_request() {
    let (status, json) = get(build_test_app(), "/api/whales/positions?min_usd=0").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["status"], 400);

    let (status, _) = get(build_test_app(), "/api/whales/trades?min_usd=-1").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_count_above_maximum_is_bad_request() {
    let (status, _) = get(build_test_app(), "/api/whales/positions?count=51").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_summary() {
    let (status, json) = get(build_test_app(), "/api/whales/summary?positions=10&trades=15").await;
    assert_eq!(status, StatusCode::OK);

    let data = &json["data"];
    assert_eq!(data["summary"]["total_open_positions"], 10);
    assert_eq!(data["summary"]["total_recent_trades"], 15);
    let long = data["positions"]["long_value_usd"].as_u64().unwrap();
    let short = data["positions"]["short_value_usd"].as_u64().unwrap();
    assert_eq!(
        data["summary"]["total_position_value_usd"].as_u64().unwrap(),
        long + short
    );
    assert!(data["top_symbols_positions"].as_array().unwrap().len() <= 5);
}

#[tokio::test]
async fn test_summary_empty_batches() {
    let (status, json) = get(build_test_app(), "/api/whales/summary?positions=0&trades=0").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["data"]["summary"]["long_short_ratio"], "∞");
    assert_eq!(json["data"]["summary"]["buy_sell_ratio"], "∞");
}

#[tokio::test]
async fn test_session_poll_and_refresh() {
    let app = build_test_app();
    let (status, json) = get(app.clone(), "/api/whales/session").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["data"]["changed"], true);
    assert_eq!(json["data"]["positions"].as_array().unwrap().len(), 8);

    // Second poll inside the soft interval leaves the book alone
    let (_, again) = get(app.clone(), "/api/whales/session").await;
    assert_eq!(again["data"]["changed"], false);
    assert_eq!(again["data"]["positions"], json["data"]["positions"]);

    let (status, refreshed) = send(app, Method::POST, "/api/whales/session/refresh").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(refreshed["data"]["changed"], true);
}

#[tokio::test]
async fn test_transfers() {
    let app = build_test_app();
    let (status, json) = get(app.clone(), "/api/whales/transfers").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["data"]["transfers"].as_array().unwrap().len(), 1);
    assert_eq!(json["data"]["changed"], true);
    assert!(json["data"]["latestAlert"].is_string());
    assert!(json["data"]["lastUpdate"].is_string());

    // An immediate second poll is inside the append interval
    let (_, again) = get(app, "/api/whales/transfers").await;
    assert_eq!(again["data"]["changed"], false);
    assert_eq!(again["data"]["transfers"], json["data"]["transfers"]);

    let (status, json) = get(build_test_app(), "/api/whales/transfers/batch?count=5").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["data"].as_array().unwrap().len(), 5);

    let (status, _) = get(build_test_app(), "/api/whales/transfers/batch?count=500").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, json) = get(build_test_app(), "/api/whales/transfers/stats").await;
    assert_eq!(status, StatusCode::OK);
    assert!(json["data"]["totalTransactions24h"].is_u64());
}

#[tokio::test]
async fn test_transfer_history_bounds() {
    let (status, json) = get(build_test_app(), "/api/whales/transfers/history?hours=2").await;
    assert_eq!(status, StatusCode::OK);
    assert!(json["data"].as_array().unwrap().len() >= 2);

    let (status, _) = get(build_test_app(), "/api/whales/transfers/history?hours=0").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_ratios() {
    let (status, json) = get(build_test_app(), "/api/whales/ratios").await;
    assert_eq!(status, StatusCode::OK);

    let snapshots = json["data"]["snapshots"].as_array().unwrap();
    assert!(snapshots.len() >= 6);
    assert_eq!(
        json["data"]["summary"]["total_positions"].as_u64().unwrap() as usize,
        snapshots.len()
    );
}

#[tokio::test]
async fn test_alerts_threshold() {
    let (status, json) = get(build_test_app(), "/api/whales/alerts?threshold=0.2").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["data"]["threshold"], 0.2);
    assert!(json["data"]["imbalance"].is_array());

    let (status, _) = get(build_test_app(), "/api/whales/alerts?threshold=1.5").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_export_document() {
    let (status, json) = get(build_test_app(), "/api/whales/export").await;
    assert_eq!(status, StatusCode::OK);

    let doc = &json["data"];
    assert!(doc["id"].is_string());
    assert!(doc["timestamp"].is_string());
    assert_eq!(doc["positions"].as_array().unwrap().len(), 8);
    assert_eq!(doc["trades"].as_array().unwrap().len(), 20);
    assert_eq!(doc["analysis"]["summary"]["total_open_positions"], 8);
}

#[tokio::test]
async fn test_prices_fall_back() {
    let (status, json) = get(build_test_app(), "/api/prices").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["data"]["source"], "fallback");
    assert_eq!(json["data"]["quotes"]["bitcoin"]["usd"], 104_906.0);
    assert_eq!(json["data"]["formatted"]["bitcoin"]["price"], "$104,906.00");
    assert_eq!(json["meta"]["cached"], false);
}

#[tokio::test]
async fn test_unknown_route() {
    let (status, _) = get(build_test_app(), "/api/whales/nope").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
