use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use std::time::Duration;
use utoipa::ToSchema;

use crate::propagator::PropagationError;

#[derive(Debug)]
pub enum ApiError {
    Validation(String),
    Instability(String),
    Timeout(Duration),
    OutputUnavailable(String),
}

impl From<PropagationError> for ApiError {
    fn from(e: PropagationError) -> Self {
        match e {
            PropagationError::InvalidInput { .. } => ApiError::Validation(e.to_string()),
            PropagationError::NumericalInstability { .. } => ApiError::Instability(e.to_string()),
            PropagationError::Cancelled { .. } => ApiError::OutputUnavailable(e.to_string()),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::Validation(msg) => (
                StatusCode::BAD_REQUEST,
                Json(ErrorResponse::with_details("invalid_input", &msg)),
            )
                .into_response(),
            ApiError::Instability(msg) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                Json(ErrorResponse::with_details("simulation_failed", &msg)),
            )
                .into_response(),
            ApiError::Timeout(limit) => (
                StatusCode::GATEWAY_TIMEOUT,
                Json(ErrorResponse::with_details(
                    "simulation_timeout",
                    &format!(
                        "simulation did not finish within {}",
                        humantime::format_duration(limit)
                    ),
                )),
            )
                .into_response(),
            ApiError::OutputUnavailable(msg) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse::with_details("output_unavailable", &msg)),
            )
                .into_response(),
        }
    }
}

pub type ApiResult<T> = Result<T, ApiError>;

#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorResponse {
    pub error: String,
    pub details: String,
}

impl ErrorResponse {
    pub fn with_details(error: &str, details: &str) -> Self {
        ErrorResponse {
            error: error.to_string(),
            details: details.to_string(),
        }
    }
}
