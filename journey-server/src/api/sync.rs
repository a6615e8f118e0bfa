//! Sync trigger endpoints

use axum::{extract::State, http::HeaderMap, Json};
use serde::Serialize;

use crate::api::auth::authorize_trigger;
use crate::error::{ApiError, ApiResult};
use crate::sync::SyncResult;
use crate::AppState;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SyncResponse {
    pub success: bool,
    pub photos: usize,
    pub locations: usize,
    pub synced_at: String,
}

impl From<SyncResult> for SyncResponse {
    fn from(result: SyncResult) -> Self {
        Self {
            success: true,
            photos: result.photo_count,
            locations: result.location_count,
            synced_at: result.synced_at,
        }
    }
}

/// POST /api/sync, called by the scheduled trigger with the bearer secret
pub async fn trigger_sync(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> ApiResult<Json<SyncResponse>> {
    authorize_trigger(&state.config, &headers)?;
    run(&state).await
}

/// GET /api/sync, a manual trigger that only works in development mode
pub async fn dev_sync(State(state): State<AppState>) -> ApiResult<Json<SyncResponse>> {
    if !state.config.dev_mode {
        return Err(ApiError::MethodNotAllowed("Use POST".to_string()));
    }

    tracing::info!("Development sync triggered without secret");
    run(&state).await
}

async fn run(state: &AppState) -> ApiResult<Json<SyncResponse>> {
    let result = state
        .sync_aggregator()
        .run()
        .await
        .map_err(ApiError::during("Sync failed"))?;

    Ok(Json(result.into()))
}
