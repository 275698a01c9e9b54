//! Repository ports implemented over [`JsonCollection`].

use async_trait::async_trait;
use ps_core::error::Result;
use ps_core::models::{PhotoDetail, PhotoMetadata, PhotoReview, PhotoSpot, Profile};
use ps_core::traits::{PhotoDetailRepo, PhotoMetadataRepo, PhotoReviewRepo, PhotoSpotRepo, ProfileRepo};

use crate::collection::{JsonCollection, Record};

pub type JsonPhotoMetadataRepo = JsonCollection<PhotoMetadata>;
pub type JsonPhotoSpotRepo = JsonCollection<PhotoSpot>;
pub type JsonPhotoDetailRepo = JsonCollection<PhotoDetail>;
pub type JsonPhotoReviewRepo = JsonCollection<PhotoReview>;
pub type JsonProfileRepo = JsonCollection<Profile>;

impl Record for PhotoMetadata {
    const KIND: &'static str = "PhotoMetadata";

    fn record_id(&self) -> &str {
        &self.id
    }
}

impl Record for PhotoSpot {
    const KIND: &'static str = "PhotoSpot";

    fn record_id(&self) -> &str {
        &self.id
    }
}

impl Record for PhotoDetail {
    const KIND: &'static str = "PhotoDetail";

    fn record_id(&self) -> &str {
        &self.id
    }
}

/// Reviews are keyed by `review_id`; `id` is the photo or spot they belong to.
impl Record for PhotoReview {
    const KIND: &'static str = "PhotoReview";

    fn record_id(&self) -> &str {
        &self.review_id
    }
}

impl Record for Profile {
    const KIND: &'static str = "Profile";

    fn record_id(&self) -> &str {
        &self.user_id
    }
}

#[async_trait]
impl PhotoMetadataRepo for JsonCollection<PhotoMetadata> {
    async fn get_all(&self) -> Vec<PhotoMetadata> {
        self.all().await
    }

    async fn get_by_id(&self, id: &str) -> Option<PhotoMetadata> {
        self.find_by_id(id).await
    }

    async fn get_by_user_id(&self, user_id: &str) -> Vec<PhotoMetadata> {
        self.filter(|m| m.user_id == user_id).await
    }

    async fn get_by_photo_spot_id(&self, photo_spot_id: &str) -> Vec<PhotoMetadata> {
        self.filter(|m| m.photo_spot_id.as_deref() == Some(photo_spot_id))
            .await
    }

    async fn add(&self, metadata: PhotoMetadata) -> Result<()> {
        self.insert(metadata).await
    }

    async fn update(&self, metadata: PhotoMetadata) -> Result<()> {
        self.replace(metadata).await
    }

    async fn delete(&self, id: &str) -> Result<()> {
        self.remove(id).await
    }
}

#[async_trait]
impl PhotoSpotRepo for JsonCollection<PhotoSpot> {
    async fn get_all(&self) -> Vec<PhotoSpot> {
        self.all().await
    }

    async fn get_by_id(&self, id: &str) -> Option<PhotoSpot> {
        self.find_by_id(id).await
    }

    async fn find_by_name_and_coordinates(
        &self,
        name: &str,
        latitude: f64,
        longitude: f64,
    ) -> Option<PhotoSpot> {
        self.find(|spot| spot.matches(name, latitude, longitude)).await
    }

    async fn add(&self, spot: PhotoSpot) -> Result<()> {
        self.insert(spot).await
    }

    async fn update(&self, spot: PhotoSpot) -> Result<()> {
        self.replace(spot).await
    }

    async fn delete(&self, id: &str) -> Result<()> {
        self.remove(id).await
    }
}

#[async_trait]
impl PhotoDetailRepo for JsonCollection<PhotoDetail> {
    async fn get_all(&self) -> Vec<PhotoDetail> {
        self.all().await
    }

    async fn get_by_id(&self, id: &str) -> Option<PhotoDetail> {
        self.find_by_id(id).await
    }

    async fn add(&self, detail: PhotoDetail) -> Result<()> {
        self.insert(detail).await
    }
}

#[async_trait]
impl PhotoReviewRepo for JsonCollection<PhotoReview> {
    async fn get_all(&self) -> Vec<PhotoReview> {
        self.all().await
    }

    async fn get_by_photo_id(&self, id: &str) -> Vec<PhotoReview> {
        self.filter(|review| review.id == id).await
    }
}

#[async_trait]
impl ProfileRepo for JsonCollection<Profile> {
    async fn get_all(&self) -> Vec<Profile> {
        self.all().await
    }

    async fn get_by_user_id(&self, user_id: &str) -> Option<Profile> {
        self.find_by_id(user_id).await
    }
}
