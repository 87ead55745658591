//! API request handlers

use crate::api::query::{parse_charts_request, ValidationErrors};
use crate::auth::AuthUser;
use crate::charts::{ChartsController, ChartsView, PAGE_TITLE};
use crate::AuthConfig;
use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde::Serialize;
use std::sync::Arc;
use tracing::{debug, error};

/// Shared server state
pub struct ServerState {
    pub charts: ChartsController,
    /// Auth config, None means deny-by-default
    pub auth_config: Option<AuthConfig>,
}

/// Shared charts state
pub type ChartsState = Arc<ServerState>;

// ============================================================================
// Health check
// ============================================================================

/// Per-service health status in the health response
#[derive(Serialize)]
pub struct ServiceHealthStatus {
    pub monitoring: String,
}

/// Health check response
#[derive(Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub services: Option<ServiceHealthStatus>,
}

/// Health check handler, probes the monitoring API.
///
/// Returns 200 + `"ok"` when the API answers, 503 + `"unhealthy"` otherwise.
pub async fn health(State(state): State<ChartsState>) -> (StatusCode, Json<HealthResponse>) {
    let monitoring_ok = state.charts.api().health_check().await.unwrap_or(false);

    let (http_status, status) = if monitoring_ok {
        (StatusCode::OK, "ok")
    } else {
        (StatusCode::SERVICE_UNAVAILABLE, "unhealthy")
    };

    (
        http_status,
        Json(HealthResponse {
            status: status.to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            services: Some(ServiceHealthStatus {
                monitoring: if monitoring_ok {
                    "connected".to_string()
                } else {
                    "disconnected".to_string()
                },
            }),
        }),
    )
}

// ============================================================================
// Charts view
// ============================================================================

/// Charts page response
#[derive(Serialize)]
pub struct ChartsViewResponse {
    pub title: String,
    pub data: ChartsView,
}

/// Validate the query, then build the charts view for the caller.
///
/// Validation failures abort before the profile is touched.
pub async fn charts_view(
    State(state): State<ChartsState>,
    user: AuthUser,
    Query(pairs): Query<Vec<(String, String)>>,
) -> Result<Json<ChartsViewResponse>, AppError> {
    let now = chrono::Utc::now();
    let request = parse_charts_request(&pairs, &state.charts.settings().period_limits, now)
        .map_err(AppError::Validation)?;

    debug!(user_id = user.user_id, ?request, "Charts view requested");

    let data = state.charts.view(user.user_id, &request, now).await?;

    Ok(Json(ChartsViewResponse {
        title: PAGE_TITLE.to_string(),
        data,
    }))
}

// ============================================================================
// Error handling
// ============================================================================

/// Application error type
#[derive(Debug)]
pub enum AppError {
    Internal(anyhow::Error),
    Validation(ValidationErrors),
    Unauthorized(String),
    Forbidden(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        let (status, body) = match self {
            AppError::Internal(e) => {
                error!(error = %format!("{:#}", e), "Request failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    serde_json::json!({ "error": e.to_string() }),
                )
            }
            AppError::Validation(errors) => (
                StatusCode::BAD_REQUEST,
                serde_json::json!({
                    "error": errors.to_string(),
                    "details": errors.0,
                }),
            ),
            AppError::Unauthorized(msg) => {
                (StatusCode::UNAUTHORIZED, serde_json::json!({ "error": msg }))
            }
            AppError::Forbidden(msg) => {
                (StatusCode::FORBIDDEN, serde_json::json!({ "error": msg }))
            }
        };

        (status, Json(body)).into_response()
    }
}

impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        AppError::Internal(err)
    }
}
