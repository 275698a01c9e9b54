//! Shared fixtures for the end-to-end tests: a gallery assembled from real
//! on-disk stores inside a temporary directory.

use std::io::Cursor;
use std::path::Path;
use std::sync::Arc;

use bytes::Bytes;
use ps_core::traits::{ImageSource, PhotoMetadataRepo};
use ps_db_json::{
    JsonPhotoDetailRepo, JsonPhotoMetadataRepo, JsonPhotoReviewRepo, JsonPhotoSpotRepo,
    JsonProfileRepo, DETAIL_DOCUMENT, METADATA_DOCUMENT, PROFILE_DOCUMENT, REVIEW_DOCUMENT,
    SPOT_DOCUMENT,
};
use ps_services::{GalleryService, UploadCoordinator};
use ps_storage_local::{BundledAssets, LocalFileStore, SeededDocuments};

pub struct TestGallery {
    pub dir: tempfile::TempDir,
    pub files: Arc<LocalFileStore>,
    pub metadata: Arc<JsonPhotoMetadataRepo>,
    pub spots: Arc<JsonPhotoSpotRepo>,
    pub details: Arc<JsonPhotoDetailRepo>,
    pub reviews: Arc<JsonPhotoReviewRepo>,
    pub profiles: Arc<JsonProfileRepo>,
}

impl TestGallery {
    /// Fresh data directory plus bundled assets holding one profile, one
    /// seeded detail and two reviews.
    pub fn new() -> Self {
        let dir = tempfile::tempdir().expect("tempdir");
        write_assets(&dir.path().join("assets"));
        Self::open(dir)
    }

    /// Reopens every collection over the same directories, as on an app restart.
    pub fn reopen(self) -> Self {
        Self::open(self.dir)
    }

    fn open(dir: tempfile::TempDir) -> Self {
        let files = Arc::new(LocalFileStore::new(dir.path().join("data")));
        let assets = Arc::new(BundledAssets::new(dir.path().join("assets")));
        let seeded = Arc::new(SeededDocuments::new(files.clone(), assets.clone()));

        Self {
            metadata: JsonPhotoMetadataRepo::open(files.clone(), METADATA_DOCUMENT),
            spots: JsonPhotoSpotRepo::open(files.clone(), SPOT_DOCUMENT),
            details: JsonPhotoDetailRepo::open(seeded, DETAIL_DOCUMENT),
            reviews: JsonPhotoReviewRepo::open(assets.clone(), REVIEW_DOCUMENT),
            profiles: JsonProfileRepo::open(assets, PROFILE_DOCUMENT),
            files,
            dir,
        }
    }

    pub fn uploads(&self) -> UploadCoordinator {
        self.uploads_with_metadata(self.metadata.clone())
    }

    /// Same wiring with the metadata repository swapped out.
    pub fn uploads_with_metadata(&self, metadata: Arc<dyn PhotoMetadataRepo>) -> UploadCoordinator {
        UploadCoordinator::new(
            self.files.clone(),
            metadata,
            self.spots.clone(),
            self.details.clone(),
        )
    }

    pub fn gallery(&self) -> GalleryService {
        GalleryService::new(
            self.files.clone(),
            self.metadata.clone(),
            self.spots.clone(),
            self.details.clone(),
            self.reviews.clone(),
            self.profiles.clone(),
        )
    }

    pub fn data_dir(&self) -> std::path::PathBuf {
        self.dir.path().join("data")
    }
}

impl Default for TestGallery {
    fn default() -> Self {
        Self::new()
    }
}

fn write_assets(dir: &Path) {
    std::fs::create_dir_all(dir).expect("assets dir");
    std::fs::write(
        dir.join(PROFILE_DOCUMENT),
        r#"[{"userId":"user1","camera":"Sony A7 IV","bio":"Seoul after dark"}]"#,
    )
    .expect("profile.json");
    std::fs::write(
        dir.join(DETAIL_DOCUMENT),
        r#"[{"id":"seed-photo","method":"handheld","timestamp":"2024-01-01 00:00:00"}]"#,
    )
    .expect("photodetail.json");
    std::fs::write(
        dir.join(REVIEW_DOCUMENT),
        r#"[
            {"id":"seed-photo","reviewId":"r1","name":"Min","content":"Lovely colours"},
            {"id":"seed-spot","reviewId":"r2","name":"Jae","content":"Go at sunset"}
        ]"#,
    )
    .expect("photoreview.json");
}

/// A small PNG, enough for the thumbnailer to decode.
pub fn sample_image(width: u32, height: u32) -> ImageSource {
    let img = image::DynamicImage::ImageRgb8(image::RgbImage::from_pixel(
        width,
        height,
        image::Rgb([200, 80, 40]),
    ));
    let mut out = Vec::new();
    img.write_to(&mut Cursor::new(&mut out), image::ImageFormat::Png)
        .expect("encode png");
    ImageSource::Bytes(Bytes::from(out))
}
