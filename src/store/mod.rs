//! Upload store
//!
//! The upload directory is the only persistence layer. Every listing
//! re-reads the directory; nothing is cached in memory.
//!
//! # Layout
//!
//! Flat directory, one file per upload, named
//! `{YYYYMMDD_HHMMSS}_{sanitized original name}` in local time. Two uploads
//! with the same sanitized name in the same second resolve to the same path
//! and the later one wins.

mod sanitize;
mod types;

use chrono::{DateTime, Local};
use std::fs;
use std::path::{Path, PathBuf};

pub use sanitize::{sanitize_filename, FALLBACK_NAME};
pub use types::{Result, StoreError, UploadedFile};

/// Timestamp prefix format for stored uploads
pub const TIMESTAMP_FORMAT: &str = "%Y%m%d_%H%M%S";

/// Upload directory handle
#[derive(Debug, Clone)]
pub struct UploadStore {
    dir: PathBuf,
}

impl UploadStore {
    /// Create a store rooted at `dir` (the directory is not touched)
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Upload directory path
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Create the upload directory if it does not exist
    pub fn ensure_dir(&self) -> Result<()> {
        fs::create_dir_all(&self.dir).map_err(|source| StoreError::Write {
            path: self.dir.clone(),
            source,
        })
    }

    /// List uploads, newest first, truncated to `limit` entries
    pub fn list(&self, limit: Option<usize>) -> Result<Vec<UploadedFile>> {
        list_uploads(&self.dir, limit)
    }

    /// Number of regular files in the upload directory
    pub fn total_count(&self) -> Result<usize> {
        Ok(self.list(None)?.len())
    }

    /// Store `data` under a timestamped, sanitized version of `original_name`
    pub fn save(&self, original_name: &str, data: &[u8]) -> Result<PathBuf> {
        self.save_at(original_name, data, Local::now())
    }

    /// Store `data` using `now` as the timestamp prefix
    pub fn save_at(&self, original_name: &str, data: &[u8], now: DateTime<Local>) -> Result<PathBuf> {
        self.ensure_dir()?;

        let path = self.dir.join(stored_filename(original_name, now));
        fs::write(&path, data).map_err(|source| StoreError::Write {
            path: path.clone(),
            source,
        })?;

        tracing::info!("File saved: {}", path.display());
        Ok(path)
    }
}

/// Build the on-disk name for an upload received at `now`
pub fn stored_filename(original_name: &str, now: DateTime<Local>) -> String {
    format!(
        "{}_{}",
        now.format(TIMESTAMP_FORMAT),
        sanitize_filename(original_name)
    )
}

/// List regular files in `dir` sorted by modification time, newest first
///
/// A missing directory yields an empty list. Symlinks are followed, so a
/// link to a file is listed and a link to a directory is not. Entries that
/// vanish between the directory read and the metadata lookup are skipped.
pub fn list_uploads(dir: &Path, limit: Option<usize>) -> Result<Vec<UploadedFile>> {
    if !dir.exists() {
        return Ok(Vec::new());
    }
    if !dir.is_dir() {
        return Err(StoreError::NotADirectory(dir.to_path_buf()));
    }

    let entries = fs::read_dir(dir).map_err(|source| StoreError::ReadDir {
        path: dir.to_path_buf(),
        source,
    })?;

    let mut files = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|source| StoreError::ReadDir {
            path: dir.to_path_buf(),
            source,
        })?;
        let path = entry.path();

        let metadata = match fs::metadata(&path) {
            Ok(metadata) => metadata,
            Err(e) => {
                tracing::debug!("Skipping {}: {}", path.display(), e);
                continue;
            }
        };
        if !metadata.is_file() {
            continue;
        }

        let modified_at: DateTime<Local> = metadata.modified()?.into();
        files.push(UploadedFile {
            name: entry.file_name().to_string_lossy().into_owned(),
            path,
            size_bytes: metadata.len(),
            modified_at,
        });
    }

    files.sort_by(|a, b| {
        b.modified_at
            .cmp(&a.modified_at)
            .then_with(|| a.name.cmp(&b.name))
    });

    if let Some(limit) = limit {
        files.truncate(limit);
    }

    tracing::debug!("Listed {} file(s) in {}", files.len(), dir.display());
    Ok(files)
}
