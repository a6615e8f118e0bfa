//! journey-server library
//!
//! Syncs a shared Google Photos album into the domain store and serves the
//! map's read endpoints.

use axum::Router;
use journey_common::{AppConfig, DomainStore};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

pub mod api;
pub mod assembly;
pub mod caption;
pub mod error;
pub mod source;
pub mod sync;

pub use crate::error::{ApiError, ApiResult};

use crate::source::PhotoSource;
use crate::sync::SyncAggregator;

/// Application state shared across HTTP handlers
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub store: DomainStore,
    /// Album paging and display URL resolution
    pub source: Arc<dyn PhotoSource>,
}

impl AppState {
    pub fn new(config: Arc<AppConfig>, store: DomainStore, source: Arc<dyn PhotoSource>) -> Self {
        Self {
            config,
            store,
            source,
        }
    }

    /// Aggregator wired to this state's config, source and store
    pub fn sync_aggregator(&self) -> SyncAggregator {
        SyncAggregator::new(self.config.clone(), self.source.clone(), self.store.clone())
    }
}

/// Build application router
pub fn build_router(state: AppState) -> Router {
    use axum::routing::get;

    Router::new()
        .route("/api/photos", get(api::list_photos))
        .route(
            "/api/captions",
            get(api::list_captions).post(api::update_caption),
        )
        .route("/api/sync", get(api::dev_sync).post(api::trigger_sync))
        .merge(api::health_routes())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
