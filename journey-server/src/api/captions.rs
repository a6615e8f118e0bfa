//! Caption override endpoints
//!
//! The only write path for caption overrides; sync reads them but never
//! writes them.

use axum::{body::Bytes, extract::State, Json};
use journey_common::models::CaptionMap;
use serde::Serialize;
use serde_json::Value;

use crate::error::{ApiError, ApiResult};
use crate::AppState;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CaptionUpdated {
    pub success: bool,
    pub photo_id: String,
    pub caption: String,
}

/// GET /api/captions
pub async fn list_captions(State(state): State<AppState>) -> ApiResult<Json<CaptionMap>> {
    let captions = state
        .store
        .captions()
        .await
        .map_err(ApiError::during("Failed to fetch captions"))?;
    Ok(Json(captions))
}

/// POST /api/captions with body `{photoId, caption}`
///
/// The body is validated by hand so malformed input is a 400 with a
/// field-specific message rather than an extractor rejection.
pub async fn update_caption(
    State(state): State<AppState>,
    body: Bytes,
) -> ApiResult<Json<CaptionUpdated>> {
    let value: Value = serde_json::from_slice(&body)
        .map_err(|e| ApiError::BadRequest(format!("Invalid JSON body: {}", e)))?;

    let photo_id = match value.get("photoId").and_then(Value::as_str) {
        Some(id) if !id.is_empty() => id.to_string(),
        _ => return Err(ApiError::BadRequest("photoId is required".to_string())),
    };
    let caption = value
        .get("caption")
        .and_then(Value::as_str)
        .ok_or_else(|| ApiError::BadRequest("caption must be a string".to_string()))?
        .to_string();

    state
        .store
        .set_caption(&photo_id, &caption)
        .await
        .map_err(ApiError::during("Failed to update caption"))?;

    tracing::info!(photo_id = %photo_id, "Caption updated");

    Ok(Json(CaptionUpdated {
        success: true,
        photo_id,
        caption,
    }))
}
