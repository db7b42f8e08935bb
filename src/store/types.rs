//! Common types for the store module

use chrono::{DateTime, Local};
use serde::Serialize;
use std::path::PathBuf;
use thiserror::Error;

/// Store error types
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Upload directory is not a directory: {0}")]
    NotADirectory(PathBuf),

    #[error("Failed to read upload directory {path}: {source}")]
    ReadDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, StoreError>;

/// A file found in the upload directory
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UploadedFile {
    /// File name without directory
    pub name: String,
    /// Full path on disk
    pub path: PathBuf,
    /// Size in bytes
    pub size_bytes: u64,
    /// Last modification time
    pub modified_at: DateTime<Local>,
}

impl UploadedFile {
    /// Size in kilobytes, rounded to one decimal
    pub fn size_kb(&self) -> f64 {
        (self.size_bytes as f64 / 1024.0 * 10.0).round() / 10.0
    }

    /// Modification time as `YYYY-MM-DD HH:MM:SS`
    pub fn modified_display(&self) -> String {
        self.modified_at.format("%Y-%m-%d %H:%M:%S").to_string()
    }
}
