//! External photo source
//!
//! Pages through a shared album and resolves short-lived display URLs.
//! Display URLs expire after about an hour and are never persisted.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use thiserror::Error;

pub mod auth;
pub mod google;

pub use auth::{exchange_refresh_token, AccessToken};
pub use google::GooglePhotosClient;

/// Items requested per search page
pub const PAGE_SIZE: u32 = 100;
/// Maximum ids per batchGet call (API limit)
pub const URL_BATCH_SIZE: usize = 50;
/// Size suffix appended to every display URL
pub const URL_SIZE_SUFFIX: &str = "=w800-h600";

/// Photo source errors
#[derive(Debug, Error)]
pub enum SourceError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Token refresh failed: {0}")]
    Auth(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Google Photos API error: {status}")]
    Api { status: u16, body: String },

    #[error("Parse error: {0}")]
    Parse(String),
}

impl From<SourceError> for journey_common::Error {
    fn from(err: SourceError) -> Self {
        match err {
            SourceError::Config(msg) => journey_common::Error::Config(msg),
            SourceError::Auth(_) => journey_common::Error::Auth(err.to_string()),
            other => journey_common::Error::Upstream(other.to_string()),
        }
    }
}

/// One media item as returned by the Photos Library API
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MediaItem {
    pub id: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub base_url: Option<String>,
    #[serde(default)]
    pub mime_type: Option<String>,
    #[serde(default)]
    pub media_metadata: Option<MediaMetadata>,
    #[serde(default)]
    pub contributor_info: Option<ContributorInfo>,
}

impl MediaItem {
    /// RFC 3339 creation time, if the source reported one
    pub fn creation_time(&self) -> Option<&str> {
        self.media_metadata
            .as_ref()
            .and_then(|m| m.creation_time.as_deref())
            .filter(|t| !t.is_empty())
    }

    /// Display name of whoever added the item to the shared album
    pub fn contributor_name(&self) -> Option<&str> {
        self.contributor_info
            .as_ref()
            .and_then(|c| c.display_name.as_deref())
            .filter(|n| !n.is_empty())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MediaMetadata {
    #[serde(default)]
    pub creation_time: Option<String>,
    #[serde(default)]
    pub width: Option<String>,
    #[serde(default)]
    pub height: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContributorInfo {
    #[serde(default)]
    pub display_name: Option<String>,
    #[serde(default)]
    pub profile_picture_base_url: Option<String>,
}

/// Remote album access used by sync (paging) and reads (URL resolution)
#[async_trait]
pub trait PhotoSource: Send + Sync {
    /// All items in the album, accumulated across every page
    ///
    /// Any failed page aborts the whole fetch.
    async fn fetch_album_items(&self, album_id: &str) -> Result<Vec<MediaItem>, SourceError>;

    /// Fresh display URLs keyed by item id
    ///
    /// Ids in a failed batch are simply absent from the result. Only
    /// credential failures are returned as errors.
    async fn resolve_urls(&self, ids: &[String]) -> Result<HashMap<String, String>, SourceError>;
}
