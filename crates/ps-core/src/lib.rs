//! photospot/crates/ps-core/src/lib.rs
//!
//! The central domain model and interface definitions for the photo gallery.

pub mod error;
pub mod ids;
pub mod models;
pub mod traits;
pub mod upload;

// Re-exporting for easier access in other crates
pub use error::*;
pub use models::*;
pub use traits::*;
pub use upload::*;
