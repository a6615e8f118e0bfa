//! Domain model shared by the sync and read paths
//!
//! Stored records never carry display URLs; those expire after about an hour
//! and are resolved again on every read.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// Caption overrides keyed by photo id
pub type CaptionMap = HashMap<String, String>;

/// Who a location belongs to on the map
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LocationType {
    /// Both contributors (default for the shared album)
    #[default]
    Together,
    Pranav,
    Pooja,
}

impl LocationType {
    pub fn as_str(&self) -> &'static str {
        match self {
            LocationType::Together => "together",
            LocationType::Pranav => "pranav",
            LocationType::Pooja => "pooja",
        }
    }

    /// Classify a contributor display name by substring ("Pranav Kumar" → Pranav)
    pub fn from_contributor(name: &str) -> Self {
        let name = name.to_lowercase();
        if name.contains("pranav") {
            LocationType::Pranav
        } else if name.contains("pooja") {
            LocationType::Pooja
        } else {
            LocationType::Together
        }
    }
}

impl fmt::Display for LocationType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Photo metadata as persisted by sync
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredPhoto {
    /// Google Photos media item id
    pub id: String,
    pub caption: String,
    /// RFC 3339 creation time
    pub taken_at: String,
    pub lat: f64,
    pub lng: f64,
    /// Uploader display name, used for together/solo detection
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contributor: Option<String>,
}

/// Place + year grouping of photos as persisted by sync
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredLocation {
    /// `{slug}-{year}`, e.g. `paris-2019`
    pub id: String,
    pub name: String,
    pub lat: f64,
    pub lng: f64,
    #[serde(rename = "type")]
    pub kind: LocationType,
    pub year: i32,
    pub photo_ids: Vec<String>,
}

/// Metadata about the last completed sync
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SyncMeta {
    pub last_synced: String,
    pub album_id: String,
    pub total_photos: usize,
    /// Sorted distinct location years
    pub years: Vec<i32>,
}

/// Photo as returned to the map client
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PhotoView {
    pub id: String,
    /// Fresh display URL, valid for roughly an hour
    pub url: String,
    pub caption: String,
    pub taken_at: String,
}

/// Location as returned to the map client
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LocationView {
    pub id: String,
    pub name: String,
    /// `[lat, lng]`
    pub coords: [f64; 2],
    #[serde(rename = "type")]
    pub kind: LocationType,
    pub year: i32,
    pub photos: Vec<PhotoView>,
}

/// Response body of the photos read endpoint
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PhotosResponse {
    pub locations: Vec<LocationView>,
    pub years: Vec<i32>,
    /// RFC 3339 timestamp, or `"never"` before the first sync
    pub last_synced: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_location_type_wire_names() {
        assert_eq!(serde_json::to_value(LocationType::Together).unwrap(), json!("together"));
        assert_eq!(serde_json::to_value(LocationType::Pranav).unwrap(), json!("pranav"));
        assert_eq!(
            serde_json::from_value::<LocationType>(json!("pooja")).unwrap(),
            LocationType::Pooja
        );
    }

    #[test]
    fn test_location_type_from_contributor() {
        assert_eq!(LocationType::from_contributor("Pranav Kumar"), LocationType::Pranav);
        assert_eq!(LocationType::from_contributor("POOJA S"), LocationType::Pooja);
        assert_eq!(LocationType::from_contributor("Someone Else"), LocationType::Together);
    }

    #[test]
    fn test_stored_location_uses_camel_case_and_type_field() {
        let location = StoredLocation {
            id: "paris-2019".to_string(),
            name: "Paris".to_string(),
            lat: 0.0,
            lng: 0.0,
            kind: LocationType::Pranav,
            year: 2019,
            photo_ids: vec!["a".to_string()],
        };

        let value = serde_json::to_value(&location).unwrap();
        assert_eq!(value["type"], "pranav");
        assert_eq!(value["photoIds"], json!(["a"]));
    }

    #[test]
    fn test_stored_photo_without_contributor_omits_field() {
        let photo = StoredPhoto {
            id: "a".to_string(),
            caption: String::new(),
            taken_at: "2019-01-01T00:00:00Z".to_string(),
            lat: 0.0,
            lng: 0.0,
            contributor: None,
        };

        let value = serde_json::to_value(&photo).unwrap();
        assert!(value.get("contributor").is_none());
        assert_eq!(value["takenAt"], "2019-01-01T00:00:00Z");

        let back: StoredPhoto = serde_json::from_value(value).unwrap();
        assert_eq!(back, photo);
    }
}
