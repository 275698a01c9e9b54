//! # ps-db-json
//!
//! JSON-document implementation of the repository ports. Each collection
//! is one array document, loaded once and rewritten wholesale on every
//! mutation.

pub mod collection;
pub mod repos;

pub use collection::{JsonCollection, Record};
pub use repos::*;

/// Mutable, lives in the app-private data directory.
pub const METADATA_DOCUMENT: &str = "photometadata.json";
/// Mutable, lives in the app-private data directory.
pub const SPOT_DOCUMENT: &str = "photospot.json";
/// Bundled seed, copied to the data directory on first write.
pub const DETAIL_DOCUMENT: &str = "photodetail.json";
pub const REVIEW_DOCUMENT: &str = "photoreview.json";
pub const PROFILE_DOCUMENT: &str = "profile.json";
