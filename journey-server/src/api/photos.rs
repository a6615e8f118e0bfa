//! Photos read endpoint

use axum::{
    extract::{Query, State},
    http::header,
    response::IntoResponse,
    Json,
};
use serde::Deserialize;

use crate::assembly::{get_photos, PhotoQuery};
use crate::error::{ApiError, ApiResult};
use crate::AppState;

/// Display URLs last about an hour; serve for 30 minutes, stale for another hour
pub const PHOTOS_CACHE_CONTROL: &str = "public, max-age=1800, stale-while-revalidate=3600";

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PhotosParams {
    pub year: Option<String>,
    pub location_id: Option<String>,
}

impl PhotosParams {
    fn into_query(self) -> ApiResult<PhotoQuery> {
        let year = match self.year.as_deref().map(str::trim) {
            None | Some("") => None,
            Some(raw) => Some(
                raw.parse::<i32>()
                    .map_err(|_| ApiError::BadRequest(format!("Invalid year: {}", raw)))?,
            ),
        };
        let location_id = self.location_id.filter(|id| !id.is_empty());

        Ok(PhotoQuery { year, location_id })
    }
}

/// GET /api/photos?year=&locationId=
pub async fn list_photos(
    State(state): State<AppState>,
    Query(params): Query<PhotosParams>,
) -> ApiResult<impl IntoResponse> {
    let query = params.into_query()?;

    let response = get_photos(&state.store, state.source.as_ref(), &query)
        .await
        .map_err(ApiError::during("Failed to fetch photos"))?;

    Ok(([(header::CACHE_CONTROL, PHOTOS_CACHE_CONTROL)], Json(response)))
}
