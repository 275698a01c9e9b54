//! # ps-services
//!
//! Orchestration on top of the ps-core ports: the photo upload workflow and
//! the read-side views the gallery screens are built from.

pub mod gallery;
pub mod upload;

pub use gallery::{CountDrift, GalleryService, PhotoCard, PhotoView, ProfileView, SpotView};
pub use upload::{UploadCoordinator, IMAGE_EXTENSION};
