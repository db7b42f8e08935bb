//! Common types for the convert module

use std::path::PathBuf;
use thiserror::Error;

/// Default resolution recorded in generated PDFs
pub const DEFAULT_DPI: f32 = 100.0;

/// PDF user space units per inch
pub const POINTS_PER_INCH: f32 = 72.0;

/// Conversion error types
#[derive(Debug, Error)]
pub enum ConvertError {
    #[error("Image not found: {0}")]
    ImageNotFound(PathBuf),

    #[error("Invalid image {path}: {source}")]
    InvalidImage {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error("Invalid DPI: {0}")]
    InvalidDpi(f32),

    #[error("PDF generation failed: {0}")]
    Pdf(#[from] lopdf::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, ConvertError>;

/// Options for image to PDF conversion
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ConvertOptions {
    /// Resolution used to size the page; pixel data is never resampled
    pub dpi: f32,
}

impl Default for ConvertOptions {
    fn default() -> Self {
        Self { dpi: DEFAULT_DPI }
    }
}

impl ConvertOptions {
    /// Options with a custom resolution
    pub fn with_dpi(dpi: f32) -> Self {
        Self { dpi }
    }

    /// Page size in points for an image of `width` x `height` pixels
    pub fn page_size(&self, width: u32, height: u32) -> (f32, f32) {
        let scale = POINTS_PER_INCH / self.dpi;
        (width as f32 * scale, height as f32 * scale)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_convert_options_default() {
        assert_eq!(ConvertOptions::default().dpi, 100.0);
    }

    #[test]
    fn test_page_size_at_100_dpi() {
        let (w, h) = ConvertOptions::default().page_size(1000, 500);
        assert!((w - 720.0).abs() < 1e-3);
        assert!((h - 360.0).abs() < 1e-3);
    }

    #[test]
    fn test_page_size_at_72_dpi_matches_pixels() {
        let (w, h) = ConvertOptions::with_dpi(72.0).page_size(640, 480);
        assert!((w - 640.0).abs() < 1e-3);
        assert!((h - 480.0).abs() < 1e-3);
    }

    #[test]
    fn test_convert_error_display() {
        let err = ConvertError::ImageNotFound(PathBuf::from("missing.jpg"));
        assert_eq!(err.to_string(), "Image not found: missing.jpg");
        assert_eq!(ConvertError::InvalidDpi(0.0).to_string(), "Invalid DPI: 0");
    }
}
