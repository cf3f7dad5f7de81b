//! Error types for the host inventory store

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur during inventory operations
#[derive(Error, Debug)]
pub enum StoreError {
    /// Backing file is missing or not valid inventory data
    #[error("inventory at {} is missing or unreadable: {reason}", .path.display())]
    Unreadable { path: PathBuf, reason: String },

    /// Host record failed validation
    #[error("invalid host record: {0}")]
    Validation(String),

    /// Deletion position outside the current inventory
    #[error("position {position} is out of range (inventory holds {len} hosts)")]
    OutOfRange { position: usize, len: usize },

    /// Failed to write the inventory back to disk
    #[error("failed to persist inventory at {}: {reason}", .path.display())]
    Persist { path: PathBuf, reason: String },
}

/// Result type for inventory operations
pub type Result<T> = std::result::Result<T, StoreError>;
