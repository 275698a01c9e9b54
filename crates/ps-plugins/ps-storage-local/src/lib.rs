//! # ps-storage-local
//!
//! Local filesystem storage for the gallery: images, `thumb_` JPEG
//! thumbnails and the JSON documents behind every collection.

pub mod documents;
pub mod media;
pub mod thumbnail;

pub use documents::{BundledAssets, SeededDocuments};
pub use media::{LocalFileStore, THUMBNAIL_PREFIX};
pub use thumbnail::{encode_thumbnail, DEFAULT_THUMBNAIL_QUALITY};
