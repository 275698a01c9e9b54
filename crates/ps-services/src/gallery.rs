//! Read-side aggregation for the gallery screens.
//!
//! A missing thumbnail is normal (thumbnail creation is best effort), so
//! every view carries it as an `Option`.

use std::path::PathBuf;
use std::sync::Arc;

use ps_core::models::{PhotoDetail, PhotoMetadata, PhotoReview, PhotoSpot, Profile};
use ps_core::traits::{
    MediaStore, PhotoDetailRepo, PhotoMetadataRepo, PhotoReviewRepo, PhotoSpotRepo, ProfileRepo,
};

#[derive(Debug, Clone, PartialEq)]
pub struct PhotoCard {
    pub metadata: PhotoMetadata,
    pub thumbnail: Option<PathBuf>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PhotoView {
    pub metadata: PhotoMetadata,
    pub detail: Option<PhotoDetail>,
    pub spot: Option<PhotoSpot>,
    pub reviews: Vec<PhotoReview>,
    pub image: Option<PathBuf>,
    pub thumbnail: Option<PathBuf>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SpotView {
    pub spot: PhotoSpot,
    pub photos: Vec<PhotoCard>,
    pub reviews: Vec<PhotoReview>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ProfileView {
    pub profile: Profile,
    pub photos: Vec<PhotoCard>,
}

/// A spot whose stored `photo_count` disagrees with the metadata referencing it.
#[derive(Debug, Clone, PartialEq)]
pub struct CountDrift {
    pub spot: PhotoSpot,
    pub actual: usize,
}

pub struct GalleryService {
    media: Arc<dyn MediaStore>,
    metadata: Arc<dyn PhotoMetadataRepo>,
    spots: Arc<dyn PhotoSpotRepo>,
    details: Arc<dyn PhotoDetailRepo>,
    reviews: Arc<dyn PhotoReviewRepo>,
    profiles: Arc<dyn ProfileRepo>,
}

impl GalleryService {
    pub fn new(
        media: Arc<dyn MediaStore>,
        metadata: Arc<dyn PhotoMetadataRepo>,
        spots: Arc<dyn PhotoSpotRepo>,
        details: Arc<dyn PhotoDetailRepo>,
        reviews: Arc<dyn PhotoReviewRepo>,
        profiles: Arc<dyn ProfileRepo>,
    ) -> Self {
        Self { media, metadata, spots, details, reviews, profiles }
    }

    /// Busiest spots first, ties broken by name.
    pub async fn spots(&self) -> Vec<PhotoSpot> {
        let mut spots = self.spots.get_all().await;
        spots.sort_by(|a, b| {
            b.photo_count
                .cmp(&a.photo_count)
                .then_with(|| a.name.cmp(&b.name))
        });
        spots
    }

    pub async fn photo_view(&self, photo_id: &str) -> Option<PhotoView> {
        let metadata = self.metadata.get_by_id(photo_id).await?;

        let spot = match &metadata.photo_spot_id {
            Some(spot_id) => self.spots.get_by_id(spot_id).await,
            None => None,
        };

        Some(PhotoView {
            detail: self.details.get_by_id(photo_id).await,
            reviews: self.reviews.get_by_photo_id(photo_id).await,
            image: self.media.image_location(&metadata.filename).await,
            thumbnail: self.media.thumbnail_location(&metadata.filename).await,
            spot,
            metadata,
        })
    }

    pub async fn spot_view(&self, spot_id: &str) -> Option<SpotView> {
        let spot = self.spots.get_by_id(spot_id).await?;
        let photos = self.cards(self.metadata.get_by_photo_spot_id(spot_id).await).await;

        Some(SpotView {
            reviews: self.reviews.get_by_photo_id(spot_id).await,
            spot,
            photos,
        })
    }

    pub async fn profile_view(&self, user_id: &str) -> Option<ProfileView> {
        let profile = self.profiles.get_by_user_id(user_id).await?;
        let photos = self.cards(self.metadata.get_by_user_id(user_id).await).await;
        Some(ProfileView { profile, photos })
    }

    /// The counter is maintained by uploads, never recomputed; this only
    /// reports where it has drifted.
    pub async fn photo_count_drift(&self) -> Vec<CountDrift> {
        let photos = self.metadata.get_all().await;
        self.spots
            .get_all()
            .await
            .into_iter()
            .filter_map(|spot| {
                let actual = photos
                    .iter()
                    .filter(|m| m.photo_spot_id.as_deref() == Some(spot.id.as_str()))
                    .count();
                (actual != spot.photo_count as usize).then_some(CountDrift { spot, actual })
            })
            .collect()
    }

    async fn cards(&self, photos: Vec<PhotoMetadata>) -> Vec<PhotoCard> {
        let mut cards = Vec::with_capacity(photos.len());
        for metadata in photos {
            let thumbnail = self.media.thumbnail_location(&metadata.filename).await;
            cards.push(PhotoCard { metadata, thumbnail });
        }
        cards
    }
}
