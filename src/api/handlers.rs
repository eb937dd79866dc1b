use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;

use crate::api::errors::ApiError;
use crate::core::metrics;
use crate::core::redis::RedisHealth;
use crate::core::state::AppState;
use crate::schemas::{HealthResponse, RootResponse};

pub(crate) async fn root(State(state): State<AppState>) -> Json<RootResponse> {
    Json(RootResponse {
        message: state.settings().api().project_name.clone(),
        version: state.settings().api().version.clone(),
        docs: format!("{}/docs", state.settings().api().api_v1_str),
    })
}

pub(crate) async fn healthz(
    State(state): State<AppState>,
) -> Result<Json<HealthResponse>, ApiError> {
    sqlx::query("SELECT 1")
        .execute(state.db())
        .await
        .map_err(|e| ApiError::internal(e, "Database health check failed"))?;

    let redis = match state.redis().health().await {
        RedisHealth::Healthy => "ok".to_string(),
        RedisHealth::Disconnected => "disconnected".to_string(),
        RedisHealth::Unhealthy(reason) => format!("unhealthy: {reason}"),
    };

    Ok(Json(HealthResponse { status: "ok", database: "ok", redis }))
}

pub(crate) async fn metrics() -> Result<String, StatusCode> {
    metrics::render().ok_or(StatusCode::NOT_FOUND)
}
