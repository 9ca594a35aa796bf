//! Detection and selection log handlers

use crate::api::rest::state::AppState;
use crate::error::{ApiError, ApiResult};
use axum::{
    extract::{rejection::JsonRejection, Query, State},
    Json,
};
use serde::Deserialize;
use ssvep_types::{ClearResult, DetectRequest, DetectionResult, FrequencyCommand, LogQuery};

/// Record a detected frequency
pub async fn detect(
    State(state): State<AppState>,
    request: Result<Json<DetectRequest>, JsonRejection>,
) -> ApiResult<Json<DetectionResult>> {
    let Json(request) = request.map_err(|rejection| {
        tracing::warn!(error = %rejection, "Rejected detection body");
        ApiError::BadRequest(rejection.body_text())
    })?;

    let result = state.service.detect(request).await?;
    Ok(Json(result))
}

/// Log query params
///
/// Both are kept as raw strings: an unusable `limit` falls back to the
/// default instead of rejecting the request.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LogQueryParams {
    pub user_id: Option<String>,
    pub limit: Option<String>,
}

impl LogQueryParams {
    /// Leading digits of `limit` (`"10abc"` is 10, `"2.5"` is 2), else `default`
    fn limit_or(&self, default: usize) -> usize {
        self.limit
            .as_deref()
            .and_then(leading_count)
            .unwrap_or(default)
    }
}

fn leading_count(raw: &str) -> Option<usize> {
    let raw = raw.trim_start();
    let raw = raw.strip_prefix('+').unwrap_or(raw);
    let end = raw
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(raw.len());
    // Overflowing digit runs saturate
    raw[..end]
        .parse::<usize>()
        .ok()
        .or_else(|| (end > 0).then_some(usize::MAX))
}

/// Get selection logs and analytics
pub async fn query_logs(
    State(state): State<AppState>,
    Query(params): Query<LogQueryParams>,
) -> ApiResult<Json<LogQuery>> {
    let limit = params.limit_or(state.service.config().default_query_limit);
    let query = state
        .service
        .query(params.user_id.as_deref(), limit)
        .await?;
    Ok(Json(query))
}

/// Clear query params
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClearParams {
    pub admin_key: Option<String>,
}

/// Wipe the selection log (admin only)
pub async fn clear_logs(
    State(state): State<AppState>,
    Query(params): Query<ClearParams>,
) -> ApiResult<Json<ClearResult>> {
    let admin_key = params.admin_key.unwrap_or_default();
    let result = state.service.clear(&admin_key).await?;
    Ok(Json(result))
}

/// List the frequency-to-command table
pub async fn list_frequencies(State(state): State<AppState>) -> Json<Vec<FrequencyCommand>> {
    Json(state.service.frequencies())
}
