//! Trigger authentication
//!
//! The scheduled sync trigger presents `Authorization: Bearer <cron_secret>`.
//! Both sides are hashed with SHA-256 before comparison so the comparison
//! time does not depend on how much of the secret matched.

use axum::http::{header, HeaderMap};
use journey_common::AppConfig;
use sha2::{Digest, Sha256};
use tracing::warn;

use crate::error::{ApiError, ApiResult};

/// Check the trigger's bearer secret
///
/// A missing configured secret is a configuration error (500); a missing or
/// wrong header is 401.
pub fn authorize_trigger(config: &AppConfig, headers: &HeaderMap) -> ApiResult<()> {
    let secret = config
        .require_cron_secret()
        .map_err(ApiError::during("Sync failed"))?;

    let provided = headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .ok_or_else(|| {
            warn!("Sync trigger rejected: missing bearer token");
            ApiError::Unauthorized
        })?;

    if !digest_eq(provided, secret) {
        warn!("Sync trigger rejected: bearer token mismatch");
        return Err(ApiError::Unauthorized);
    }

    Ok(())
}

fn digest_eq(a: &str, b: &str) -> bool {
    let a = Sha256::digest(a.as_bytes());
    let b = Sha256::digest(b.as_bytes());
    a.iter().zip(b.iter()).fold(0u8, |acc, (x, y)| acc | (x ^ y)) == 0
}
