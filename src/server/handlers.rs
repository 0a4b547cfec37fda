//! HTTP request handlers.

use axum::{
    Json, Router,
    extract::{State, rejection::JsonRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tower_http::trace::TraceLayer;
use tracing::{error, info};

use super::state::AppState;
use crate::gateway::{BulkError, BulkRequest, BulkResult, SessionState};

/// Create the API router
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route("/send-sms", post(send_sms))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Errors surfaced to HTTP callers as `{success: false, error}`
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    BadRequest(String),

    #[error("{0}")]
    Internal(String),
}

#[derive(Serialize)]
struct ErrorBody {
    success: bool,
    error: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        let body = ErrorBody {
            success: false,
            error: self.to_string(),
        };
        (status, Json(body)).into_response()
    }
}

impl From<BulkError> for ApiError {
    fn from(e: BulkError) -> Self {
        match e {
            BulkError::InvalidInput(reason) => ApiError::BadRequest(reason),
            BulkError::QueueClosed => ApiError::Internal(e.to_string()),
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

/// One destination or several
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum Phones {
    One(String),
    Many(Vec<String>),
}

impl Phones {
    pub fn into_vec(self) -> Vec<String> {
        match self {
            Phones::One(phone) => vec![phone],
            Phones::Many(phones) => phones,
        }
    }
}

/// Body of `POST /send-sms`
#[derive(Debug, Deserialize)]
pub struct SendSmsRequest {
    pub phones: Option<Phones>,
    pub message: Option<String>,
}

/// Send one message to every listed phone
async fn send_sms(
    State(state): State<AppState>,
    payload: Result<Json<SendSmsRequest>, JsonRejection>,
) -> Result<Json<BulkResult>, ApiError> {
    let Json(request) = payload?;

    let (Some(phones), Some(message)) = (request.phones, request.message) else {
        return Err(ApiError::BadRequest(
            "phones and message are required".to_string(),
        ));
    };

    let request = BulkRequest::new(phones.into_vec(), message);
    info!(destinations = request.destinations.len(), "send-sms request");

    match state.bulk.submit(request).await {
        Ok(result) => Ok(Json(result)),
        Err(e) => {
            if matches!(e, BulkError::QueueClosed) {
                error!(error = %e, "bulk worker unavailable");
            }
            Err(e.into())
        }
    }
}

/// Health check response
#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub session: SessionState,
    pub version: &'static str,
}

/// Health check endpoint
pub async fn health_check(State(state): State<AppState>) -> impl IntoResponse {
    Json(HealthResponse {
        status: "ok",
        session: state.session_state(),
        version: env!("CARGO_PKG_VERSION"),
    })
}
