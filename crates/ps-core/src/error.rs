//! # AppError
//!
//! Centralized error handling for the photospot crates.
//! Nothing here is fatal: every variant ends up as an empty view or a failed
//! upload the user can retry.

use thiserror::Error;

/// The primary error type for all ps-core operations.
#[derive(Error, Debug)]
pub enum AppError {
    /// Record absent on update/delete (kind, id)
    #[error("{0} not found with ID {1}")]
    NotFound(String, String),

    /// Every message produced by upload validation
    #[error("validation error: {}", .0.join("; "))]
    Validation(Vec<String>),

    /// Record already exists (duplicate id on add)
    #[error("conflict: {0}")]
    Conflict(String),

    /// The backing document or file could not be written
    #[error("storage error: {0}")]
    Storage(String),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// A specialized Result type for photospot logic.
pub type Result<T> = std::result::Result<T, AppError>;
