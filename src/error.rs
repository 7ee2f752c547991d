use crate::services::SimulationError;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

/// Application error types.
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error(transparent)]
    Simulation(#[from] SimulationError),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            AppError::Simulation(e) => (StatusCode::BAD_REQUEST, e.to_string()),
        };

        let body = Json(json!({
            "error": message,
            "status": status.as_u16(),
        }));

        (status, body).into_response()
    }
}

pub type Result<T> = std::result::Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_simulation_error_maps_to_bad_request() {
        let err: AppError = SimulationError::InvalidArgument("min_notional must be positive".into()).into();
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_bad_request_message() {
        let err = AppError::BadRequest("count 500 exceeds maximum of 50".into());
        assert_eq!(err.to_string(), "Bad request: count 500 exceeds maximum of 50");
        assert_eq!(err.into_response().status(), StatusCode::BAD_REQUEST);
    }
}
