//! Read-side assembly
//!
//! Joins stored locations, photos and caption overrides with freshly
//! resolved display URLs. Photos whose URL cannot be resolved are left out,
//! and so is any location left with no photos.

use crate::source::PhotoSource;
use journey_common::models::{
    CaptionMap, LocationView, PhotoView, PhotosResponse, StoredLocation, StoredPhoto,
};
use journey_common::{DomainStore, Result};
use std::collections::{HashMap, HashSet};

/// `lastSynced` value before any sync has completed
pub const NEVER_SYNCED: &str = "never";

/// Optional filters for a photos read
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PhotoQuery {
    /// Keep locations from this year and earlier (timeline semantics)
    pub year: Option<i32>,
    /// Keep only this location
    pub location_id: Option<String>,
}

/// Build the client response for one read request
pub async fn get_photos(
    store: &DomainStore,
    source: &dyn PhotoSource,
    query: &PhotoQuery,
) -> Result<PhotosResponse> {
    let locations = store.locations().await?;
    let photos = store.photos().await?;
    let captions = store.captions().await?;
    let meta = store.meta().await?;

    let locations = filter_locations(locations, query);
    let ids = referenced_photo_ids(&locations);
    let urls = source.resolve_urls(&ids).await?;

    tracing::debug!(
        locations = locations.len(),
        requested = ids.len(),
        resolved = urls.len(),
        "Assembling photos response"
    );

    let (years, last_synced) = match meta {
        Some(meta) => (meta.years, meta.last_synced),
        None => (Vec::new(), NEVER_SYNCED.to_string()),
    };

    Ok(PhotosResponse {
        locations: join_locations(&locations, &photos, &captions, &urls),
        years,
        last_synced,
    })
}

/// Apply the year (cumulative) and location filters
pub fn filter_locations(locations: Vec<StoredLocation>, query: &PhotoQuery) -> Vec<StoredLocation> {
    locations
        .into_iter()
        .filter(|l| query.year.map_or(true, |year| l.year <= year))
        .filter(|l| query.location_id.as_deref().map_or(true, |id| l.id == id))
        .collect()
}

/// Distinct photo ids across locations, in first-referenced order
pub fn referenced_photo_ids(locations: &[StoredLocation]) -> Vec<String> {
    let mut seen = HashSet::new();
    locations
        .iter()
        .flat_map(|l| l.photo_ids.iter())
        .filter(|id| seen.insert(id.as_str()))
        .cloned()
        .collect()
}

/// Join stored records with resolved URLs, dropping what cannot be shown
pub fn join_locations(
    locations: &[StoredLocation],
    photos: &[StoredPhoto],
    captions: &CaptionMap,
    urls: &HashMap<String, String>,
) -> Vec<LocationView> {
    let by_id: HashMap<&str, &StoredPhoto> = photos.iter().map(|p| (p.id.as_str(), p)).collect();

    locations
        .iter()
        .filter_map(|location| {
            let views: Vec<PhotoView> = location
                .photo_ids
                .iter()
                .filter_map(|id| {
                    let stored = by_id.get(id.as_str())?;
                    let url = urls.get(id)?;
                    let caption = captions
                        .get(id)
                        .filter(|c| !c.is_empty())
                        .unwrap_or(&stored.caption);

                    Some(PhotoView {
                        id: id.clone(),
                        url: url.clone(),
                        caption: caption.clone(),
                        taken_at: stored.taken_at.clone(),
                    })
                })
                .collect();

            if views.is_empty() {
                return None;
            }

            Some(LocationView {
                id: location.id.clone(),
                name: location.name.clone(),
                coords: [location.lat, location.lng],
                kind: location.kind,
                year: location.year,
                photos: views,
            })
        })
        .collect()
}
