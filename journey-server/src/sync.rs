//! Album sync
//!
//! Rebuilds the stored photo, location and metadata records from the full
//! album. Caption overrides are read (never written) and folded back in as
//! each photo's caption of record, so user edits survive every re-sync.
//!
//! All aggregation happens in memory before anything is written. The three
//! writes that follow are sequential and not transactional; a crash between
//! them can leave the store inconsistent until the next sync.

use crate::caption::parse_caption;
use crate::source::{MediaItem, PhotoSource};
use chrono::{DateTime, Datelike, Utc};
use journey_common::models::{CaptionMap, LocationType, StoredLocation, StoredPhoto, SyncMeta};
use journey_common::{time, AppConfig, DomainStore, Result};
use serde::Serialize;
use std::collections::{BTreeSet, HashMap, HashSet};
use std::sync::Arc;
use tracing::{debug, info};

/// Outcome of a completed sync
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SyncResult {
    pub photo_count: usize,
    pub location_count: usize,
    pub synced_at: String,
}

/// Photos and locations built from one album snapshot
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Aggregation {
    pub photos: Vec<StoredPhoto>,
    pub locations: Vec<StoredLocation>,
}

impl Aggregation {
    /// Sorted distinct location years
    pub fn years(&self) -> Vec<i32> {
        self.locations
            .iter()
            .map(|l| l.year)
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }
}

/// Sync aggregator: the sole writer of photo, location and meta records
#[derive(Clone)]
pub struct SyncAggregator {
    config: Arc<AppConfig>,
    source: Arc<dyn PhotoSource>,
    store: DomainStore,
}

impl SyncAggregator {
    pub fn new(config: Arc<AppConfig>, source: Arc<dyn PhotoSource>, store: DomainStore) -> Self {
        Self {
            config,
            source,
            store,
        }
    }

    /// Sync the configured album
    pub async fn run(&self) -> Result<SyncResult> {
        let album_id = self.config.require_album_id()?;
        self.run_album(album_id).await
    }

    /// Sync a specific album
    pub async fn run_album(&self, album_id: &str) -> Result<SyncResult> {
        info!(album_id = %album_id, "Starting sync from Google Photos album");

        let items = self.source.fetch_album_items(album_id).await?;
        info!("Fetched {} photos", items.len());

        let overrides = self.store.captions().await?;

        let now = time::now();
        let aggregation = aggregate(&items, &overrides, now);
        let synced_at = time::to_rfc3339(now);

        self.store.store_photos(&aggregation.photos).await?;
        self.store.store_locations(&aggregation.locations).await?;
        self.store
            .store_meta(&SyncMeta {
                last_synced: synced_at.clone(),
                album_id: album_id.to_string(),
                total_photos: aggregation.photos.len(),
                years: aggregation.years(),
            })
            .await?;

        info!(
            "Sync complete: {} photos, {} locations",
            aggregation.photos.len(),
            aggregation.locations.len()
        );

        Ok(SyncResult {
            photo_count: aggregation.photos.len(),
            location_count: aggregation.locations.len(),
            synced_at,
        })
    }
}

/// Build photo and location records from album items
///
/// `now` stands in for items whose creation time is missing or unparseable,
/// both as `takenAt` and for the year. Items without a location label are
/// kept as photos but belong to no location.
pub fn aggregate(items: &[MediaItem], overrides: &CaptionMap, now: DateTime<Utc>) -> Aggregation {
    let mut photos = Vec::with_capacity(items.len());
    // year of each photo, parallel to `photos`
    let mut years = Vec::with_capacity(items.len());
    // label -> indices into `photos`, in first-seen order
    let mut groups: Vec<(String, Vec<usize>)> = Vec::new();
    let mut group_index: HashMap<String, usize> = HashMap::new();

    for item in items {
        let parsed = parse_caption(item.description.as_deref());

        let (taken_at, year) = match item.creation_time() {
            Some(raw) => match time::parse_rfc3339(raw) {
                Some(ts) => (raw.to_string(), ts.year()),
                None => {
                    debug!(id = %item.id, creation_time = %raw, "Unparseable creation time, using sync time");
                    (time::to_rfc3339(now), now.year())
                }
            },
            None => (time::to_rfc3339(now), now.year()),
        };

        let caption = overrides
            .get(&item.id)
            .filter(|c| !c.is_empty())
            .cloned()
            .unwrap_or(parsed.caption);

        photos.push(StoredPhoto {
            id: item.id.clone(),
            caption,
            taken_at,
            // no geocoding during sync
            lat: 0.0,
            lng: 0.0,
            contributor: item.contributor_name().map(str::to_string),
        });
        years.push(year);

        if let Some(label) = parsed.location {
            let photo_idx = photos.len() - 1;
            match group_index.get(&label) {
                Some(&g) => groups[g].1.push(photo_idx),
                None => {
                    group_index.insert(label.clone(), groups.len());
                    groups.push((label, vec![photo_idx]));
                }
            }
        }
    }

    let locations = groups
        .into_iter()
        .map(|(name, members)| build_location(name, &members, &photos, &years))
        .collect();

    Aggregation { photos, locations }
}

fn build_location(
    name: String,
    members: &[usize],
    photos: &[StoredPhoto],
    years: &[i32],
) -> StoredLocation {
    let first = &photos[members[0]];
    let year = years[members[0]];

    let contributors: HashSet<&str> = members
        .iter()
        .filter_map(|&i| photos[i].contributor.as_deref())
        .collect();
    let kind = match contributors.iter().next() {
        Some(name) if contributors.len() == 1 => LocationType::from_contributor(name),
        _ => LocationType::Together,
    };

    StoredLocation {
        id: location_id(&name, year),
        lat: first.lat,
        lng: first.lng,
        kind,
        year,
        photo_ids: members.iter().map(|&i| photos[i].id.clone()).collect(),
        name,
    }
}

/// `{slug}-{year}`; every character outside `[a-z0-9]` of the lowercased
/// name becomes `-`
pub fn location_id(name: &str, year: i32) -> String {
    let slug: String = name
        .to_lowercase()
        .chars()
        .map(|c| if c.is_ascii_lowercase() || c.is_ascii_digit() { c } else { '-' })
        .collect();
    format!("{}-{}", slug, year)
}
