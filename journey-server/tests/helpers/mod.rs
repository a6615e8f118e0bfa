//! Shared test helpers
//!
//! - `FakeSource`: in-memory photo source with controllable URL failures
//! - `test_app`: router over an in-memory store
//! - request/response helpers for `oneshot` tests

#![allow(dead_code)]

use async_trait::async_trait;
use axum::{
    body::Body,
    http::{Request, Response},
    Router,
};
use journey_common::{AppConfig, DomainStore};
use journey_server::source::{
    ContributorInfo, MediaItem, MediaMetadata, PhotoSource, SourceError, URL_SIZE_SUFFIX,
};
use journey_server::{build_router, AppState};
use serde_json::Value;
use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

pub const TEST_ALBUM: &str = "album-1";
pub const TEST_SECRET: &str = "test-secret";

/// In-memory album
#[derive(Default)]
pub struct FakeSource {
    items: Mutex<Vec<MediaItem>>,
    unresolvable: Mutex<HashSet<String>>,
    fail_fetch: Mutex<bool>,
    pub fetch_calls: AtomicUsize,
    pub resolve_calls: AtomicUsize,
}

impl FakeSource {
    pub fn new(items: Vec<MediaItem>) -> Arc<Self> {
        Arc::new(Self {
            items: Mutex::new(items),
            ..Default::default()
        })
    }

    pub fn set_items(&self, items: Vec<MediaItem>) {
        *self.items.lock().unwrap() = items;
    }

    /// Make URL resolution omit this id, as if its batch failed
    pub fn make_unresolvable(&self, id: &str) {
        self.unresolvable.lock().unwrap().insert(id.to_string());
    }

    pub fn fail_fetch(&self) {
        *self.fail_fetch.lock().unwrap() = true;
    }

    pub fn url_for(id: &str) -> String {
        format!("https://photos.fake/{}{}", id, URL_SIZE_SUFFIX)
    }
}

#[async_trait]
impl PhotoSource for FakeSource {
    async fn fetch_album_items(&self, album_id: &str) -> Result<Vec<MediaItem>, SourceError> {
        self.fetch_calls.fetch_add(1, Ordering::SeqCst);
        assert_eq!(album_id, TEST_ALBUM, "sync should use the configured album");

        if *self.fail_fetch.lock().unwrap() {
            return Err(SourceError::Api {
                status: 500,
                body: "backend error".to_string(),
            });
        }
        Ok(self.items.lock().unwrap().clone())
    }

    async fn resolve_urls(&self, ids: &[String]) -> Result<HashMap<String, String>, SourceError> {
        self.resolve_calls.fetch_add(1, Ordering::SeqCst);

        let known: HashSet<String> = self.items.lock().unwrap().iter().map(|i| i.id.clone()).collect();
        let unresolvable = self.unresolvable.lock().unwrap();

        Ok(ids
            .iter()
            .filter(|id| known.contains(*id) && !unresolvable.contains(*id))
            .map(|id| (id.clone(), Self::url_for(id)))
            .collect())
    }
}

/// Album item with description, creation time and optional contributor
pub fn media_item(id: &str, description: &str, created: &str, contributor: Option<&str>) -> MediaItem {
    MediaItem {
        id: id.to_string(),
        description: Some(description.to_string()),
        base_url: Some(format!("https://lh3.fake/{}", id)),
        mime_type: Some("image/jpeg".to_string()),
        media_metadata: Some(MediaMetadata {
            creation_time: Some(created.to_string()),
            ..Default::default()
        }),
        contributor_info: contributor.map(|name| ContributorInfo {
            display_name: Some(name.to_string()),
            profile_picture_base_url: None,
        }),
    }
}

pub fn test_config() -> AppConfig {
    AppConfig {
        album_id: Some(TEST_ALBUM.to_string()),
        cron_secret: Some(TEST_SECRET.to_string()),
        ..AppConfig::default()
    }
}

pub struct TestApp {
    pub router: Router,
    pub state: AppState,
    pub source: Arc<FakeSource>,
}

pub fn test_app(source: Arc<FakeSource>) -> TestApp {
    test_app_with_config(source, test_config())
}

pub fn test_app_with_config(source: Arc<FakeSource>, config: AppConfig) -> TestApp {
    let state = AppState::new(Arc::new(config), DomainStore::in_memory(), source.clone());
    TestApp {
        router: build_router(state.clone()),
        state,
        source,
    }
}

pub fn get(uri: &str) -> Request<Body> {
    Request::builder().method("GET").uri(uri).body(Body::empty()).unwrap()
}

pub fn post_json(uri: &str, body: &Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

pub fn post_sync(secret: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().method("POST").uri("/api/sync");
    if let Some(secret) = secret {
        builder = builder.header("authorization", format!("Bearer {}", secret));
    }
    builder.body(Body::empty()).unwrap()
}

pub async fn extract_json(response: Response<Body>) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("Should read body");
    serde_json::from_slice(&bytes).expect("Should parse JSON")
}
