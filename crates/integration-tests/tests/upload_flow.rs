use std::sync::Arc;

use integration_tests::{sample_image, TestGallery};
use ps_core::error::AppError;
use ps_core::traits::{MockPhotoMetadataRepo, PhotoMetadataRepo, PhotoSpotRepo};
use ps_core::upload::{PhotoUploadData, UploadResult, UploadedPhoto};

fn han_river(user: &str) -> PhotoUploadData {
    PhotoUploadData {
        spot_name: "Han River Park".into(),
        latitude: 37.5284,
        longitude: 126.9332,
        user_id: user.into(),
        f_number: Some("f/2.8".into()),
        iso: Some("200".into()),
        shutter_speed: Some("1/250".into()),
        shooting_method: Some("handheld".into()),
        tags: vec!["night".into(), "  ".into()],
        ..Default::default()
    }
}

fn uploaded(result: UploadResult) -> UploadedPhoto {
    match result {
        UploadResult::Success(photo) => photo,
        UploadResult::Failure(message) => panic!("upload failed: {message}"),
    }
}

#[tokio::test]
async fn first_upload_creates_spot_detail_metadata_and_files() {
    let gallery = TestGallery::new();
    let uploads = gallery.uploads();

    let photo = uploaded(uploads.upload_photo(&han_river("user1"), Some(&sample_image(640, 480))).await);

    assert!(photo.spot.id.starts_with("spot_"));
    assert_eq!(photo.spot.photo_count, 1);
    assert_eq!(photo.metadata.photo_spot_id.as_deref(), Some(photo.spot.id.as_str()));
    assert_eq!(photo.metadata.tags, vec!["night".to_string()]);
    assert_eq!(photo.detail.id, photo.metadata.id);
    assert!(photo.metadata.filename.starts_with("photo_user1_"));
    assert!(photo.metadata.filename.ends_with(".jpg"));

    let spots = gallery.spots.get_all().await;
    assert_eq!(spots.len(), 1);
    assert_eq!(gallery.metadata.get_by_id(&photo.metadata.id).await, Some(photo.metadata.clone()));
    assert!(gallery.details.find_by_id(&photo.metadata.id).await.is_some());

    let images = gallery.data_dir().join("images");
    assert!(images.join(&photo.metadata.filename).is_file());
    let thumbnail = gallery
        .data_dir()
        .join("thumbnails")
        .join(format!("thumb_{}", photo.metadata.filename));
    assert!(thumbnail.is_file());

    let decoded = image::open(&thumbnail).unwrap();
    assert_eq!(decoded.width().max(decoded.height()), 300);
}

#[tokio::test]
async fn second_upload_at_the_same_place_reuses_the_spot() {
    let gallery = TestGallery::new();
    let uploads = gallery.uploads();

    let first = uploaded(uploads.upload_photo(&han_river("user1"), Some(&sample_image(64, 64))).await);
    let second = uploaded(uploads.upload_photo(&han_river("user2"), Some(&sample_image(64, 64))).await);

    assert_eq!(first.spot.id, second.spot.id);
    assert_eq!(second.spot.photo_count, 2);

    let spots = gallery.spots.get_all().await;
    assert_eq!(spots.len(), 1);
    assert_eq!(spots[0].photo_count, 2);
    assert_eq!(gallery.metadata.get_by_photo_spot_id(&first.spot.id).await.len(), 2);
    assert!(gallery.gallery().photo_count_drift().await.is_empty());
}

#[tokio::test]
async fn concurrent_uploads_by_one_user_keep_separate_images() {
    let gallery = TestGallery::new();
    let uploads = gallery.uploads();
    let mut other = han_river("user1");
    other.spot_name = "Seoul Forest".into();
    other.latitude = 37.5444;
    other.longitude = 127.0374;
    let (first_image, second_image) = (sample_image(32, 32), sample_image(48, 48));

    let first_request = han_river("user1");
    let (first, second) = tokio::join!(
        uploads.upload_photo(&first_request, Some(&first_image)),
        uploads.upload_photo(&other, Some(&second_image)),
    );
    let (first, second) = (uploaded(first), uploaded(second));

    assert_ne!(first.metadata.id, second.metadata.id);
    assert_ne!(first.metadata.filename, second.metadata.filename);

    let images = gallery.data_dir().join("images");
    assert_eq!(std::fs::read_dir(&images).unwrap().count(), 2);
    assert!(images.join(&first.metadata.filename).is_file());
    assert!(images.join(&second.metadata.filename).is_file());
}

#[tokio::test]
async fn nearby_coordinates_create_a_separate_spot() {
    let gallery = TestGallery::new();
    let uploads = gallery.uploads();

    uploaded(uploads.upload_photo(&han_river("user1"), Some(&sample_image(32, 32))).await);
    let mut moved = han_river("user1");
    moved.latitude = 37.5285;
    uploaded(uploads.upload_photo(&moved, Some(&sample_image(32, 32))).await);

    assert_eq!(gallery.spots.get_all().await.len(), 2);
}

#[tokio::test]
async fn invalid_upload_writes_nothing() {
    let gallery = TestGallery::new();
    let mut data = han_river("user1");
    data.spot_name = "   ".into();
    data.iso = Some("12".into());

    let result = gallery.uploads().upload_photo(&data, Some(&sample_image(32, 32))).await;

    let UploadResult::Failure(message) = result else {
        panic!("expected a validation failure");
    };
    assert_eq!(message.lines().count(), 2);
    assert!(gallery.spots.get_all().await.is_empty());
    assert!(!gallery.data_dir().join("images").exists());
}

#[tokio::test]
async fn missing_image_is_rejected() {
    let gallery = TestGallery::new();
    let result = gallery.uploads().upload_photo(&han_river("user1"), None).await;
    assert_eq!(result, UploadResult::Failure("Please select an image".into()));
}

#[tokio::test]
async fn undecodable_image_is_stored_without_a_thumbnail() {
    let gallery = TestGallery::new();
    let source = ps_core::traits::ImageSource::Bytes(bytes::Bytes::from_static(b"not an image"));

    let photo = uploaded(gallery.uploads().upload_photo(&han_river("user1"), Some(&source)).await);

    let view = gallery.gallery().photo_view(&photo.metadata.id).await.unwrap();
    assert!(view.image.is_some());
    assert!(view.thumbnail.is_none());
}

#[tokio::test]
async fn failed_metadata_write_removes_the_image() {
    let gallery = TestGallery::new();
    let mut metadata = MockPhotoMetadataRepo::new();
    metadata
        .expect_add()
        .times(1)
        .returning(|_| Err(AppError::Storage("disk full".into())));

    let uploads = gallery.uploads_with_metadata(Arc::new(metadata));
    let result = uploads.upload_photo(&han_river("user1"), Some(&sample_image(32, 32))).await;

    let UploadResult::Failure(message) = result else {
        panic!("expected a persistence failure");
    };
    assert!(message.starts_with("Failed to save photo information"));

    let images = gallery.data_dir().join("images");
    assert_eq!(std::fs::read_dir(&images).unwrap().count(), 0);
    // earlier writes are not rolled back
    assert_eq!(gallery.spots.get_all().await.len(), 1);
    assert!(gallery.metadata.get_all().await.is_empty());
}

#[tokio::test]
async fn spot_without_photos_has_an_empty_listing() {
    let gallery = TestGallery::new();
    let photo = uploaded(gallery.uploads().upload_photo(&han_river("user1"), Some(&sample_image(32, 32))).await);

    assert!(gallery.metadata.get_by_photo_spot_id("spot_unknown").await.is_empty());
    assert_eq!(gallery.metadata.get_by_user_id("user1").await, vec![photo.metadata]);
}
