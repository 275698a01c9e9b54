//! # Upload input
//!
//! [`PhotoUploadData`] is the transient aggregate collected by the upload
//! form. It validates itself and is then split into the three persisted
//! records.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::{PhotoDetail, PhotoMetadata, PhotoSpot};

pub const MIN_ISO: u32 = 50;
pub const MAX_ISO: u32 = 102_400;

/// Outcome of [`PhotoUploadData::validate`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationResult {
    Valid,
    /// Every failed rule, in form order.
    Invalid(Vec<String>),
}

impl ValidationResult {
    pub fn is_valid(&self) -> bool {
        matches!(self, ValidationResult::Valid)
    }
}

/// The three records written by a successful upload.
#[derive(Debug, Clone, PartialEq)]
pub struct UploadedPhoto {
    pub spot: PhotoSpot,
    pub detail: PhotoDetail,
    pub metadata: PhotoMetadata,
}

#[derive(Debug, Clone, PartialEq)]
pub enum UploadResult {
    Success(UploadedPhoto),
    Failure(String),
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PhotoUploadData {
    pub spot_name: String,
    pub latitude: f64,
    pub longitude: f64,
    pub user_id: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub f_number: Option<String>,
    #[serde(default)]
    pub focal_length: Option<String>,
    #[serde(default)]
    pub iso: Option<String>,
    #[serde(default)]
    pub shutter_speed: Option<String>,
    #[serde(default)]
    pub lens: Option<String>,
    #[serde(default)]
    pub camera_name: Option<String>,
    #[serde(default)]
    pub shooting_method: Option<String>,
}

impl PhotoUploadData {
    /// Checks every rule and reports all failures at once.
    pub fn validate(&self) -> ValidationResult {
        let mut errors = Vec::new();

        if self.spot_name.trim().is_empty() {
            errors.push("Spot name is required".to_string());
        }
        if !(-90.0..=90.0).contains(&self.latitude) {
            errors.push("Latitude must be between -90 and 90".to_string());
        }
        if !(-180.0..=180.0).contains(&self.longitude) {
            errors.push("Longitude must be between -180 and 180".to_string());
        }
        if let Some(f_number) = &self.f_number {
            if !is_valid_f_number(f_number) {
                errors.push("F-number must be a positive number (e.g. f/2.8)".to_string());
            }
        }
        if let Some(iso) = &self.iso {
            if !is_valid_iso(iso) {
                errors.push(format!("ISO must be a whole number between {MIN_ISO} and {MAX_ISO}"));
            }
        }
        if let Some(shutter_speed) = &self.shutter_speed {
            if !is_valid_shutter_speed(shutter_speed) {
                errors.push("Shutter speed must look like 1/60, 2s or 2".to_string());
            }
        }

        if errors.is_empty() {
            ValidationResult::Valid
        } else {
            ValidationResult::Invalid(errors)
        }
    }

    /// Stored filename without extension, e.g. `photo_user42_20240501_093000_123`.
    pub fn generate_filename(&self) -> String {
        self.generate_filename_at(Utc::now())
    }

    pub fn generate_filename_at(&self, now: DateTime<Utc>) -> String {
        let user: String = self
            .user_id
            .trim()
            .chars()
            .map(|c| if c.is_ascii_alphanumeric() || c == '-' || c == '_' { c } else { '_' })
            .collect();
        let user = if user.is_empty() { "anonymous".to_string() } else { user };
        format!("photo_{}_{}", user, now.format("%Y%m%d_%H%M%S_%3f"))
    }

    /// A fresh spot for this upload, holding its first photo.
    pub fn new_spot(&self, spot_id: String) -> PhotoSpot {
        PhotoSpot {
            id: spot_id,
            name: self.spot_name.trim().to_string(),
            latitude: self.latitude,
            longitude: self.longitude,
            photo_count: 1,
        }
    }

    pub fn to_detail(&self, photo_id: &str, timestamp: String) -> PhotoDetail {
        PhotoDetail {
            id: photo_id.to_string(),
            method: non_blank(&self.shooting_method),
            timestamp: Some(timestamp),
        }
    }

    pub fn to_metadata(&self, photo_id: &str, filename: &str, photo_spot_id: &str) -> PhotoMetadata {
        PhotoMetadata {
            id: photo_id.to_string(),
            filename: filename.to_string(),
            user_id: self.user_id.clone(),
            description: non_blank(&self.description),
            tags: self
                .tags
                .iter()
                .map(|t| t.trim())
                .filter(|t| !t.is_empty())
                .map(str::to_string)
                .collect(),
            f_number: non_blank(&self.f_number),
            focal_length: non_blank(&self.focal_length),
            iso: non_blank(&self.iso),
            shutter_speed: non_blank(&self.shutter_speed),
            lens: non_blank(&self.lens),
            camera_name: non_blank(&self.camera_name),
            photo_spot_id: Some(photo_spot_id.to_string()),
            shooting_method: non_blank(&self.shooting_method),
        }
    }
}

fn non_blank(value: &Option<String>) -> Option<String> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

/// Accepts `2.8`, `f/2.8`, `F2.8` and `F/2.8`.
fn is_valid_f_number(raw: &str) -> bool {
    let raw = raw.trim();
    let number = ["f/", "F/", "f", "F"]
        .iter()
        .find_map(|prefix| raw.strip_prefix(prefix))
        .unwrap_or(raw);
    matches!(number.trim().parse::<f64>(), Ok(n) if n.is_finite() && n > 0.0)
}

fn is_valid_iso(raw: &str) -> bool {
    matches!(raw.trim().parse::<u32>(), Ok(iso) if (MIN_ISO..=MAX_ISO).contains(&iso))
}

/// Intentionally permissive: anything with a `/` or an `s`, or a bare number.
fn is_valid_shutter_speed(raw: &str) -> bool {
    let raw = raw.trim();
    !raw.is_empty() && (raw.contains('/') || raw.contains('s') || raw.parse::<f64>().is_ok())
}
