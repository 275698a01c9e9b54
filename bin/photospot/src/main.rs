//! # photospot
//!
//! The application shell: assembles storage, collections and services from
//! the settings, waits for every collection to load and reports what it
//! found. The UI layer receives the assembled [`App`].

use std::sync::Arc;

use ps_configs::Settings;
use ps_db_json::{
    JsonPhotoDetailRepo, JsonPhotoMetadataRepo, JsonPhotoReviewRepo, JsonPhotoSpotRepo,
    JsonProfileRepo, DETAIL_DOCUMENT, METADATA_DOCUMENT, PROFILE_DOCUMENT, REVIEW_DOCUMENT,
    SPOT_DOCUMENT,
};
use ps_services::{GalleryService, UploadCoordinator};
use ps_storage_local::{BundledAssets, LocalFileStore, SeededDocuments};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

struct Collections {
    metadata: Arc<JsonPhotoMetadataRepo>,
    spots: Arc<JsonPhotoSpotRepo>,
    details: Arc<JsonPhotoDetailRepo>,
    reviews: Arc<JsonPhotoReviewRepo>,
    profiles: Arc<JsonProfileRepo>,
}

impl Collections {
    async fn wait_until_ready(&self) {
        tokio::join!(
            self.metadata.wait_until_ready(),
            self.spots.wait_until_ready(),
            self.details.wait_until_ready(),
            self.reviews.wait_until_ready(),
            self.profiles.wait_until_ready(),
        );
    }
}

pub struct App {
    pub uploads: UploadCoordinator,
    pub gallery: GalleryService,
}

fn init_tracing(settings: &Settings) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&settings.log_filter));
    let subscriber = tracing_subscriber::fmt().with_env_filter(filter);
    if settings.log_json {
        subscriber.json().init();
    } else {
        subscriber.init();
    }
}

fn assemble(settings: &Settings) -> (App, Collections) {
    // 1. Storage
    let files = Arc::new(
        LocalFileStore::new(settings.data_dir.clone())
            .with_dirs(settings.images_dir(), settings.thumbnails_dir())
            .with_thumbnail_quality(settings.thumbnail_quality),
    );
    let assets = Arc::new(BundledAssets::new(settings.assets_dir.clone()));
    let seeded = Arc::new(SeededDocuments::new(files.clone(), assets.clone()));

    // 2. Collections start loading as soon as they are opened
    let collections = Collections {
        metadata: JsonPhotoMetadataRepo::open(files.clone(), METADATA_DOCUMENT),
        spots: JsonPhotoSpotRepo::open(files.clone(), SPOT_DOCUMENT),
        details: JsonPhotoDetailRepo::open(seeded, DETAIL_DOCUMENT),
        reviews: JsonPhotoReviewRepo::open(assets.clone(), REVIEW_DOCUMENT),
        profiles: JsonProfileRepo::open(assets, PROFILE_DOCUMENT),
    };

    // 3. Services
    let uploads = UploadCoordinator::new(
        files.clone(),
        collections.metadata.clone(),
        collections.spots.clone(),
        collections.details.clone(),
    )
    .with_thumbnail_dimension(settings.thumbnail_max_dimension);

    let gallery = GalleryService::new(
        files,
        collections.metadata.clone(),
        collections.spots.clone(),
        collections.details.clone(),
        collections.reviews.clone(),
        collections.profiles.clone(),
    );

    (App { uploads, gallery }, collections)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let settings = Settings::load()?;
    init_tracing(&settings);

    info!(
        data_dir = %settings.data_dir.display(),
        assets_dir = %settings.assets_dir.display(),
        "starting photospot"
    );

    let (app, collections) = assemble(&settings);
    collections.wait_until_ready().await;

    let photos = collections.metadata.snapshot().await.len();
    let spots = collections.spots.snapshot().await.len();
    let details = collections.details.snapshot().await.len();
    let reviews = collections.reviews.snapshot().await.len();
    let profiles = collections.profiles.snapshot().await.len();
    info!(photos, spots, details, reviews, profiles, "collections ready");

    info!(
        thumbnail_dimension = app.uploads.thumbnail_dimension(),
        "upload coordinator ready"
    );

    for spot in app.gallery.spots().await.iter().take(5) {
        info!(id = %spot.id, name = %spot.name, photos = spot.photo_count, "spot");
    }

    for drift in app.gallery.photo_count_drift().await {
        warn!(
            spot_id = %drift.spot.id,
            recorded = drift.spot.photo_count,
            actual = drift.actual,
            "spot photo count out of step with metadata"
        );
    }

    Ok(())
}
