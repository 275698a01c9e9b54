//! # Domain Models
//!
//! These structs represent the persisted entities of the photo gallery.
//! Records reference each other only through string ids; a `photo_spot_id`
//! is a lookup key, never an ownership link.
//!
//! Every struct serialises to the camelCase JSON documents the gallery ships
//! with. Optional fields may be missing or `null` on read, unknown fields are
//! ignored.

use serde::{Deserialize, Serialize};

/// The canonical per-photo record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PhotoMetadata {
    pub id: String,
    /// Join key into the MediaStore
    pub filename: String,
    pub user_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub f_number: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub focal_length: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub iso: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shutter_speed: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lens: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub camera_name: Option<String>,
    /// Weak reference to a [`PhotoSpot`]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub photo_spot_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shooting_method: Option<String>,
}

/// A named geographic location associated with zero or more photos.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PhotoSpot {
    pub id: String,
    pub name: String,
    pub latitude: f64,
    pub longitude: f64,
    /// Denormalized counter maintained by the upload flow, never recomputed.
    #[serde(default)]
    pub photo_count: u32,
}

impl PhotoSpot {
    /// Same trimmed name and exactly the same coordinates.
    pub fn matches(&self, name: &str, latitude: f64, longitude: f64) -> bool {
        self.name.trim() == name.trim() && self.latitude == latitude && self.longitude == longitude
    }
}

/// 1:1 extension of a [`PhotoMetadata`], sharing its `id`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PhotoDetail {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub method: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<String>,
}

/// A review attached to a photo or a spot (the `id` may point at either).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PhotoReview {
    pub id: String,
    pub review_id: String,
    pub name: String,
    pub content: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Profile {
    pub user_id: String,
    #[serde(default)]
    pub camera: String,
    #[serde(default)]
    pub bio: String,
}
