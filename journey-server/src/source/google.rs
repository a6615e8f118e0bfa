//! Google Photos Library API client

use super::{
    exchange_refresh_token, AccessToken, MediaItem, PhotoSource, SourceError, PAGE_SIZE,
    URL_BATCH_SIZE, URL_SIZE_SUFFIX,
};
use async_trait::async_trait;
use journey_common::AppConfig;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

const USER_AGENT: &str = concat!("JourneyMap/", env!("CARGO_PKG_VERSION"));

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SearchRequest<'a> {
    album_id: &'a str,
    page_size: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    page_token: Option<&'a str>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SearchResponse {
    #[serde(default)]
    media_items: Vec<MediaItem>,
    #[serde(default)]
    next_page_token: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct BatchGetResponse {
    #[serde(default)]
    media_item_results: Vec<MediaItemResult>,
}

/// One batchGet entry; `media_item` is absent when that id failed
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct MediaItemResult {
    #[serde(default)]
    media_item: Option<MediaItem>,
}

/// Photos Library client
///
/// Holds only the HTTP connection pool and configuration; a fresh access
/// token is exchanged for each fetch or resolve call.
pub struct GooglePhotosClient {
    http: reqwest::Client,
    config: Arc<AppConfig>,
}

impl GooglePhotosClient {
    pub fn new(config: Arc<AppConfig>) -> Result<Self, SourceError> {
        let http = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(Duration::from_secs(config.http_timeout_secs))
            .build()
            .map_err(|e| SourceError::Network(e.to_string()))?;

        Ok(Self { http, config })
    }

    async fn access_token(&self) -> Result<AccessToken, SourceError> {
        let creds = self
            .config
            .require_oauth()
            .map_err(|e| SourceError::Config(e.to_string()))?;
        exchange_refresh_token(&self.http, &creds).await
    }

    fn endpoint(&self, method: &str) -> String {
        format!("{}/{}", self.config.api_base_url.trim_end_matches('/'), method)
    }

    async fn search_page(
        &self,
        token: &AccessToken,
        album_id: &str,
        page_token: Option<&str>,
    ) -> Result<SearchResponse, SourceError> {
        let response = self
            .http
            .post(self.endpoint("mediaItems:search"))
            .bearer_auth(token.as_str())
            .json(&SearchRequest {
                album_id,
                page_size: PAGE_SIZE,
                page_token,
            })
            .send()
            .await
            .map_err(|e| SourceError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(SourceError::Api {
                status: status.as_u16(),
                body,
            });
        }

        response
            .json()
            .await
            .map_err(|e| SourceError::Parse(e.to_string()))
    }

    async fn batch_get(
        &self,
        token: &AccessToken,
        ids: &[String],
    ) -> Result<BatchGetResponse, SourceError> {
        let query: Vec<(&str, &str)> = ids.iter().map(|id| ("mediaItemIds", id.as_str())).collect();

        let response = self
            .http
            .get(self.endpoint("mediaItems:batchGet"))
            .bearer_auth(token.as_str())
            .query(&query)
            .send()
            .await
            .map_err(|e| SourceError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(SourceError::Api {
                status: status.as_u16(),
                body,
            });
        }

        response
            .json()
            .await
            .map_err(|e| SourceError::Parse(e.to_string()))
    }
}

#[async_trait]
impl PhotoSource for GooglePhotosClient {
    async fn fetch_album_items(&self, album_id: &str) -> Result<Vec<MediaItem>, SourceError> {
        let token = self.access_token().await?;

        let mut items = Vec::new();
        let mut page_token: Option<String> = None;
        let mut pages = 0usize;

        loop {
            let page = self
                .search_page(&token, album_id, page_token.as_deref())
                .await?;
            pages += 1;

            tracing::debug!(
                page = pages,
                items = page.media_items.len(),
                "Fetched album page"
            );
            items.extend(page.media_items);

            match page.next_page_token {
                Some(next) if !next.is_empty() => page_token = Some(next),
                _ => break,
            }
        }

        tracing::info!(album_id = %album_id, items = items.len(), pages, "Fetched album items");
        Ok(items)
    }

    async fn resolve_urls(&self, ids: &[String]) -> Result<HashMap<String, String>, SourceError> {
        let mut urls = HashMap::with_capacity(ids.len());
        if ids.is_empty() {
            return Ok(urls);
        }

        let token = self.access_token().await?;

        for batch in ids.chunks(URL_BATCH_SIZE) {
            let response = match self.batch_get(&token, batch).await {
                Ok(response) => response,
                Err(e) => {
                    tracing::warn!(batch_size = batch.len(), error = %e, "Failed to fetch URLs, skipping batch");
                    continue;
                }
            };

            for item in response.media_item_results.into_iter().filter_map(|r| r.media_item) {
                if let Some(base_url) = item.base_url {
                    urls.insert(item.id, format!("{}{}", base_url, URL_SIZE_SUFFIX));
                }
            }
        }

        tracing::debug!(requested = ids.len(), resolved = urls.len(), "Resolved display URLs");
        Ok(urls)
    }
}
