//! # Core Traits (Ports)
//!
//! Any plugin must implement these traits to be used by the services.
//! Components are constructed explicitly and passed around as `Arc<dyn _>`.

use std::path::PathBuf;

use async_trait::async_trait;
use bytes::Bytes;

use crate::error::Result;
use crate::models::{PhotoDetail, PhotoMetadata, PhotoReview, PhotoSpot, Profile};

/// Longest edge of a generated thumbnail, in pixels.
pub const DEFAULT_THUMBNAIL_DIMENSION: u32 = 300;

/// Where the bytes of an image being uploaded come from.
#[derive(Debug, Clone, PartialEq)]
pub enum ImageSource {
    /// A file picked from the device
    Path(PathBuf),
    /// Bytes already held in memory (camera capture, tests)
    Bytes(Bytes),
}

/// Storage for image files and their thumbnails.
///
/// Failures are logged by the implementation and reported as `false`/`None`;
/// callers never have to unpick an error type.
#[cfg_attr(any(test, feature = "testing"), mockall::automock)]
#[async_trait]
pub trait MediaStore: Send + Sync {
    /// Copies the source into the images directory under `name`.
    async fn save_image(&self, source: &ImageSource, name: &str) -> bool;
    async fn delete_image(&self, name: &str) -> bool;
    /// `None` when no image is stored under `name`.
    async fn image_location(&self, name: &str) -> Option<PathBuf>;
    /// Decodes, scales so the longer edge equals `max_dimension`, and stores
    /// a JPEG under `thumb_<name>`. Nothing is written if decoding fails.
    async fn create_thumbnail(&self, source: &ImageSource, name: &str, max_dimension: u32) -> bool;
    async fn thumbnail_location(&self, name: &str) -> Option<PathBuf>;
}

/// Text blobs backing the JSON collections.
#[cfg_attr(any(test, feature = "testing"), mockall::automock)]
#[async_trait]
pub trait DocumentStore: Send + Sync {
    async fn save_text(&self, name: &str, content: &str) -> bool;
    /// `None` when the document is missing or unreadable.
    async fn load_text(&self, name: &str) -> Option<String>;
}

/// Every query waits for the first load of the collection to finish.
#[cfg_attr(any(test, feature = "testing"), mockall::automock)]
#[async_trait]
pub trait PhotoMetadataRepo: Send + Sync {
    async fn get_all(&self) -> Vec<PhotoMetadata>;
    async fn get_by_id(&self, id: &str) -> Option<PhotoMetadata>;
    async fn get_by_user_id(&self, user_id: &str) -> Vec<PhotoMetadata>;
    async fn get_by_photo_spot_id(&self, photo_spot_id: &str) -> Vec<PhotoMetadata>;
    /// Fails with `Conflict` if the id is already present.
    async fn add(&self, metadata: PhotoMetadata) -> Result<()>;
    /// Fails with `NotFound` if the id is absent.
    async fn update(&self, metadata: PhotoMetadata) -> Result<()>;
    async fn delete(&self, id: &str) -> Result<()>;
}

#[cfg_attr(any(test, feature = "testing"), mockall::automock)]
#[async_trait]
pub trait PhotoSpotRepo: Send + Sync {
    async fn get_all(&self) -> Vec<PhotoSpot>;
    async fn get_by_id(&self, id: &str) -> Option<PhotoSpot>;
    /// Trimmed name equality and exact coordinate equality.
    async fn find_by_name_and_coordinates(
        &self,
        name: &str,
        latitude: f64,
        longitude: f64,
    ) -> Option<PhotoSpot>;
    async fn add(&self, spot: PhotoSpot) -> Result<()>;
    async fn update(&self, spot: PhotoSpot) -> Result<()>;
    async fn delete(&self, id: &str) -> Result<()>;
}

#[cfg_attr(any(test, feature = "testing"), mockall::automock)]
#[async_trait]
pub trait PhotoDetailRepo: Send + Sync {
    async fn get_all(&self) -> Vec<PhotoDetail>;
    async fn get_by_id(&self, id: &str) -> Option<PhotoDetail>;
    async fn add(&self, detail: PhotoDetail) -> Result<()>;
}

/// Read-only.
#[cfg_attr(any(test, feature = "testing"), mockall::automock)]
#[async_trait]
pub trait PhotoReviewRepo: Send + Sync {
    async fn get_all(&self) -> Vec<PhotoReview>;
    /// Reviews whose `id` points at the given photo or spot.
    async fn get_by_photo_id(&self, id: &str) -> Vec<PhotoReview>;
}

/// Read-only, loaded from the bundled document.
#[cfg_attr(any(test, feature = "testing"), mockall::automock)]
#[async_trait]
pub trait ProfileRepo: Send + Sync {
    async fn get_all(&self) -> Vec<Profile>;
    async fn get_by_user_id(&self, user_id: &str) -> Option<Profile>;
}
