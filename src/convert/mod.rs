//! Image to PDF conversion
//!
//! Wraps a decoded scan into a single-page PDF.
//!
//! # Algorithm
//!
//! 1. Decode the image (format sniffed from content, extension as fallback)
//! 2. Convert to 8-bit RGB if it is in any other color model (alpha dropped)
//! 3. Embed the pixels as a Flate-compressed `DeviceRGB` image XObject
//! 4. Size the page so the image maps to the configured DPI
//!
//! The whole document is built in memory before anything touches the
//! output path, so a failed conversion never leaves a partial file.

mod types;

use image::{DynamicImage, ImageReader, RgbImage};
use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Dictionary, Document, Object, Stream};
use std::fs;
use std::path::{Path, PathBuf};

pub use types::{ConvertError, ConvertOptions, Result, DEFAULT_DPI, POINTS_PER_INCH};

/// Resource name of the page image
const IMAGE_RESOURCE: &str = "Im0";

/// Converts scanned images to PDF
#[derive(Debug, Clone, Default)]
pub struct ImageConverter {
    options: ConvertOptions,
}

impl ImageConverter {
    /// Create a converter with the given options
    pub fn new(options: ConvertOptions) -> Self {
        Self { options }
    }

    /// Get the conversion options
    pub fn options(&self) -> &ConvertOptions {
        &self.options
    }

    /// Convert `image_path` to a PDF
    ///
    /// Writes to `output_path`, or next to the input with a `.pdf`
    /// extension when omitted. Returns the path written.
    pub fn convert_to_pdf(&self, image_path: &Path, output_path: Option<&Path>) -> Result<PathBuf> {
        let dpi = self.options.dpi;
        if !dpi.is_finite() || dpi <= 0.0 {
            return Err(ConvertError::InvalidDpi(dpi));
        }

        let output = output_path
            .map(Path::to_path_buf)
            .unwrap_or_else(|| pdf_path_for(image_path));

        let image = load_rgb(image_path)?;
        let mut document = build_document(&image, &self.options)?;

        let mut bytes = Vec::new();
        document.save_to(&mut bytes)?;

        if let Err(e) = fs::write(&output, &bytes) {
            let _ = fs::remove_file(&output);
            return Err(e.into());
        }

        tracing::debug!(
            "Converted {} ({}x{}) to {}",
            image_path.display(),
            image.width(),
            image.height(),
            output.display()
        );
        Ok(output)
    }
}

/// Default PDF path for an image: same stem, `.pdf` extension
pub fn pdf_path_for(image_path: &Path) -> PathBuf {
    image_path.with_extension("pdf")
}

/// Whether `path` already names a PDF (case-insensitive extension check)
pub fn is_pdf(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("pdf"))
}

fn load_rgb(path: &Path) -> Result<RgbImage> {
    if !path.is_file() {
        return Err(ConvertError::ImageNotFound(path.to_path_buf()));
    }

    let image = ImageReader::open(path)?
        .with_guessed_format()?
        .decode()
        .map_err(|source| ConvertError::InvalidImage {
            path: path.to_path_buf(),
            source,
        })?;

    Ok(match image {
        DynamicImage::ImageRgb8(rgb) => rgb,
        other => other.to_rgb8(),
    })
}

fn build_document(image: &RgbImage, options: &ConvertOptions) -> Result<Document> {
    let (width, height) = image.dimensions();
    let (page_width, page_height) = options.page_size(width, height);

    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();

    let image_id = doc.add_object(Stream::new(
        dictionary! {
            "Type" => "XObject",
            "Subtype" => "Image",
            "Width" => i64::from(width),
            "Height" => i64::from(height),
            "ColorSpace" => "DeviceRGB",
            "BitsPerComponent" => 8_i64,
        },
        image.as_raw().clone(),
    ));

    let content = Content {
        operations: vec![
            Operation::new("q", vec![]),
            Operation::new(
                "cm",
                vec![
                    Object::Real(page_width),
                    Object::Integer(0),
                    Object::Integer(0),
                    Object::Real(page_height),
                    Object::Integer(0),
                    Object::Integer(0),
                ],
            ),
            Operation::new("Do", vec![Object::Name(IMAGE_RESOURCE.as_bytes().to_vec())]),
            Operation::new("Q", vec![]),
        ],
    };
    let content_id = doc.add_object(Stream::new(Dictionary::new(), content.encode()?));

    let page_id = doc.add_object(dictionary! {
        "Type" => "Page",
        "Parent" => pages_id,
        "MediaBox" => vec![
            Object::Integer(0),
            Object::Integer(0),
            Object::Real(page_width),
            Object::Real(page_height),
        ],
        "Contents" => content_id,
        "Resources" => dictionary! {
            "XObject" => dictionary! { IMAGE_RESOURCE => image_id },
        },
    });

    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => vec![Object::Reference(page_id)],
            "Count" => 1_i64,
        }),
    );

    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);
    doc.compress();

    Ok(doc)
}
