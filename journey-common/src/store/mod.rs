//! Domain store
//!
//! Four independent whole-value slots (locations, photos, captions, meta)
//! on top of a narrow key-value contract. There are no partial updates,
//! transactions or versioning: every `set` overwrites the whole value.

use crate::models::{CaptionMap, StoredLocation, StoredPhoto, SyncMeta};
use crate::Result;
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;

mod memory;
mod sqlite;

pub use memory::MemoryKvStore;
pub use sqlite::SqliteKvStore;

pub const LOCATIONS_KEY: &str = "journey:locations";
pub const PHOTOS_KEY: &str = "journey:photos";
/// User-editable captions, written only by the caption edit path
pub const CAPTIONS_KEY: &str = "journey:captions";
pub const META_KEY: &str = "journey:meta";

/// Whole-value key-value persistence
#[async_trait]
pub trait KvStore: Send + Sync {
    /// Stored value, or `None` if the key was never set
    async fn get(&self, key: &str) -> Result<Option<Value>>;

    /// Overwrite the whole value for `key`
    async fn set(&self, key: &str, value: Value) -> Result<()>;
}

/// Typed accessors over a [`KvStore`]
#[derive(Clone)]
pub struct DomainStore {
    kv: Arc<dyn KvStore>,
}

impl DomainStore {
    pub fn new(kv: Arc<dyn KvStore>) -> Self {
        Self { kv }
    }

    /// Store backed by a fresh in-memory map
    pub fn in_memory() -> Self {
        Self::new(Arc::new(MemoryKvStore::new()))
    }

    async fn get_typed<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>> {
        match self.kv.get(key).await? {
            Some(Value::Null) | None => Ok(None),
            Some(value) => Ok(Some(serde_json::from_value(value)?)),
        }
    }

    async fn set_typed<T: Serialize + ?Sized>(&self, key: &str, value: &T) -> Result<()> {
        self.kv.set(key, serde_json::to_value(value)?).await
    }

    pub async fn locations(&self) -> Result<Vec<StoredLocation>> {
        Ok(self.get_typed(LOCATIONS_KEY).await?.unwrap_or_default())
    }

    pub async fn store_locations(&self, locations: &[StoredLocation]) -> Result<()> {
        self.set_typed(LOCATIONS_KEY, locations).await
    }

    pub async fn photos(&self) -> Result<Vec<StoredPhoto>> {
        Ok(self.get_typed(PHOTOS_KEY).await?.unwrap_or_default())
    }

    pub async fn store_photos(&self, photos: &[StoredPhoto]) -> Result<()> {
        self.set_typed(PHOTOS_KEY, photos).await
    }

    pub async fn captions(&self) -> Result<CaptionMap> {
        Ok(self.get_typed(CAPTIONS_KEY).await?.unwrap_or_default())
    }

    /// Add or overwrite one caption override
    ///
    /// Read-modify-write of the whole map without a lock: two concurrent
    /// edits can race and the last write wins.
    pub async fn set_caption(&self, photo_id: &str, caption: &str) -> Result<()> {
        let mut captions = self.captions().await?;
        captions.insert(photo_id.to_string(), caption.to_string());
        self.set_typed(CAPTIONS_KEY, &captions).await
    }

    /// `None` until the first sync completes
    pub async fn meta(&self) -> Result<Option<SyncMeta>> {
        self.get_typed(META_KEY).await
    }

    pub async fn store_meta(&self, meta: &SyncMeta) -> Result<()> {
        self.set_typed(META_KEY, meta).await
    }

    /// Stored photos referenced by one location, in stored photo order
    ///
    /// Empty if the location id is unknown.
    pub async fn photos_for_location(&self, location_id: &str) -> Result<Vec<StoredPhoto>> {
        let locations = self.locations().await?;
        let Some(location) = locations.into_iter().find(|l| l.id == location_id) else {
            return Ok(Vec::new());
        };

        let photos = self.photos().await?;
        Ok(photos
            .into_iter()
            .filter(|p| location.photo_ids.contains(&p.id))
            .collect())
    }
}
