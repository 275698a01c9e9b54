//! # Upload Coordinator
//!
//! Turns one validated [`PhotoUploadData`] plus an image into a stored image,
//! a best-effort thumbnail and three records (spot, detail, metadata).
//!
//! Each call is independent: concurrent uploads are not queued against each
//! other, and an abandoned upload runs to completion in the background.

use std::sync::Arc;

use chrono::Utc;
use ps_core::ids::{detail_timestamp, id_suffix, new_photo_id, new_spot_id};
use ps_core::models::{PhotoDetail, PhotoMetadata, PhotoSpot};
use ps_core::traits::{
    ImageSource, MediaStore, PhotoDetailRepo, PhotoMetadataRepo, PhotoSpotRepo,
    DEFAULT_THUMBNAIL_DIMENSION,
};
use ps_core::upload::{PhotoUploadData, UploadResult, UploadedPhoto, ValidationResult};
use tracing::{info, warn};

/// Every stored image gets this extension.
pub const IMAGE_EXTENSION: &str = ".jpg";

pub struct UploadCoordinator {
    media: Arc<dyn MediaStore>,
    metadata: Arc<dyn PhotoMetadataRepo>,
    spots: Arc<dyn PhotoSpotRepo>,
    details: Arc<dyn PhotoDetailRepo>,
    thumbnail_dimension: u32,
}

impl UploadCoordinator {
    pub fn new(
        media: Arc<dyn MediaStore>,
        metadata: Arc<dyn PhotoMetadataRepo>,
        spots: Arc<dyn PhotoSpotRepo>,
        details: Arc<dyn PhotoDetailRepo>,
    ) -> Self {
        Self {
            media,
            metadata,
            spots,
            details,
            thumbnail_dimension: DEFAULT_THUMBNAIL_DIMENSION,
        }
    }

    pub fn with_thumbnail_dimension(mut self, dimension: u32) -> Self {
        self.thumbnail_dimension = dimension;
        self
    }

    pub fn thumbnail_dimension(&self) -> u32 {
        self.thumbnail_dimension
    }

    /// Orchestrates the submission of a single photo.
    ///
    /// Validation or a missing image fails before anything is written. Once
    /// the image is stored, a failed record write deletes it again; the
    /// thumbnail and any record written before the failure stay behind.
    #[tracing::instrument(skip_all, fields(spot = %data.spot_name.trim(), user = %data.user_id))]
    pub async fn upload_photo(
        &self,
        data: &PhotoUploadData,
        image: Option<&ImageSource>,
    ) -> UploadResult {
        // 1. Validation
        if let ValidationResult::Invalid(errors) = data.validate() {
            warn!(?errors, "upload rejected");
            return UploadResult::Failure(errors.join("\n"));
        }

        let Some(image) = image else {
            return UploadResult::Failure("Please select an image".to_string());
        };

        // 2. Identity
        let now = Utc::now();
        let photo_id = new_photo_id(now);
        let filename = format!(
            "{}_{}{}",
            data.generate_filename_at(now),
            id_suffix(&photo_id),
            IMAGE_EXTENSION
        );

        // 3. Media
        if !self.media.save_image(image, &filename).await {
            return UploadResult::Failure("Failed to save the image".to_string());
        }
        if !self
            .media
            .create_thumbnail(image, &filename, self.thumbnail_dimension)
            .await
        {
            warn!(filename = %filename, "continuing without a thumbnail");
        }

        // 4. Spot resolution
        let (spot, is_new_spot) = match self
            .spots
            .find_by_name_and_coordinates(&data.spot_name, data.latitude, data.longitude)
            .await
        {
            Some(mut existing) => {
                existing.photo_count = existing.photo_count.saturating_add(1);
                (existing, false)
            }
            None => (data.new_spot(new_spot_id(now)), true),
        };

        let detail = data.to_detail(&photo_id, detail_timestamp(now));
        let metadata = data.to_metadata(&photo_id, &filename, &spot.id);

        // 5. Persistence
        if let Err(e) = self.write_records(&spot, is_new_spot, &detail, &metadata).await {
            warn!(error = %e, filename = %filename, "record write failed, removing image");
            if !self.media.delete_image(&filename).await {
                warn!(filename = %filename, "image left behind after failed upload");
            }
            return UploadResult::Failure(format!("Failed to save photo information: {e}"));
        }

        info!(photo_id = %photo_id, spot_id = %spot.id, new_spot = is_new_spot, "photo uploaded");
        UploadResult::Success(UploadedPhoto { spot, detail, metadata })
    }

    /// Stops at the first failing write.
    async fn write_records(
        &self,
        spot: &PhotoSpot,
        is_new_spot: bool,
        detail: &PhotoDetail,
        metadata: &PhotoMetadata,
    ) -> ps_core::Result<()> {
        if is_new_spot {
            self.spots.add(spot.clone()).await?;
        } else {
            self.spots.update(spot.clone()).await?;
        }
        self.details.add(detail.clone()).await?;
        self.metadata.add(metadata.clone()).await?;
        Ok(())
    }
}
