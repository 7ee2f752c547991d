pub mod health;
pub mod prices;
pub mod whales;

use crate::AppState;
use axum::Router;
use serde::Serialize;

/// API response wrapper matching frontend expectations
#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub data: T,
    pub meta: ApiMeta,
}

#[derive(Debug, Serialize)]
pub struct ApiMeta {
    pub cached: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub count: Option<usize>,
}

impl ApiMeta {
    pub fn simple() -> Self {
        Self {
            cached: false,
            count: None,
        }
    }

    pub fn cached(cached: bool) -> Self {
        Self {
            cached,
            count: None,
        }
    }

    pub fn with_count(cached: bool, count: usize) -> Self {
        Self {
            cached,
            count: Some(count),
        }
    }
}

impl<T> ApiResponse<T> {
    pub fn new(data: T, meta: ApiMeta) -> Self {
        Self { data, meta }
    }
}

/// Create the API router.
pub fn router() -> Router<AppState> {
    Router::new()
        .merge(health::router())
        .nest("/api/whales", whales::router())
        .nest("/api/prices", prices::router())
}
