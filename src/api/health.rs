use crate::AppState;
use axum::{extract::State, routing::get, Json, Router};
use serde::Serialize;

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct HealthResponse {
    status: &'static str,
    version: &'static str,
    /// All whale data is synthetic.
    simulated: bool,
    /// Output is reproducible across restarts.
    seeded: bool,
    refresh_interval_secs: u64,
}

async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
        simulated: true,
        seeded: state.simulator.seed().is_some(),
        refresh_interval_secs: state.config.refresh_interval_secs,
    })
}

pub fn router() -> Router<AppState> {
    Router::new().route("/api/health", get(health))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;

    #[test]
    fn test_health_response_serialization() {
        let response = HealthResponse {
            status: "ok",
            version: "1.0.0",
            simulated: true,
            seeded: false,
            refresh_interval_secs: 10,
        };

        let json = serde_json::to_string(&response).unwrap();
        assert!(json.contains("\"status\":\"ok\""));
        assert!(json.contains("\"version\":\"1.0.0\""));
        assert!(json.contains("\"refreshIntervalSecs\":10"));
    }

    #[tokio::test]
    async fn test_health_handler() {
        let mut config = Config::default();
        config.simulation.seed = Some(1);
        let state = AppState::new(config).unwrap();

        let Json(response) = health(State(state)).await;
        assert_eq!(response.status, "ok");
        assert_eq!(response.version, env!("CARGO_PKG_VERSION"));
        assert!(response.seeded);
    }
}
