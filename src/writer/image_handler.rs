//! Image handling for PDF generation.
//!
//! Per PDF spec Section 8.9, images are represented as XObjects. Only JPEG
//! is supported, embedded as-is with the DCTDecode filter: the file bytes
//! are never decoded, only the SOF marker is read for the frame size.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use indexmap::IndexMap;

use crate::object::Object;

/// Color space for image data.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColorSpace {
    /// Grayscale (1 component per pixel)
    DeviceGray,
    /// RGB color (3 components per pixel)
    DeviceRGB,
    /// CMYK color (4 components per pixel)
    DeviceCMYK,
}

impl ColorSpace {
    /// Get the PDF name for this color space.
    pub fn pdf_name(&self) -> &'static str {
        match self {
            ColorSpace::DeviceGray => "DeviceGray",
            ColorSpace::DeviceRGB => "DeviceRGB",
            ColorSpace::DeviceCMYK => "DeviceCMYK",
        }
    }

    fn from_components(components: u8) -> Self {
        match components {
            1 => ColorSpace::DeviceGray,
            4 => ColorSpace::DeviceCMYK,
            _ => ColorSpace::DeviceRGB,
        }
    }
}

/// Image embedding error.
#[derive(Debug, thiserror::Error)]
pub enum ImageError {
    /// Source file does not exist
    #[error("Image file not found: {0}")]
    NotFound(PathBuf),

    /// Source file could not be read
    #[error("IO error: {0}")]
    Io(String),

    /// Invalid image data
    #[error("Invalid image data: {0}")]
    InvalidData(String),

    /// No SOF marker before the scan data or end of image
    #[error("No SOF marker found before SOS/EOI")]
    MissingFrame,
}

/// JPEG image data ready for embedding.
#[derive(Debug, Clone)]
pub struct ImageData {
    /// Image width in pixels
    pub width: u32,
    /// Image height in pixels
    pub height: u32,
    /// Bits per component (sample precision)
    pub bits_per_component: u8,
    /// Color space
    pub color_space: ColorSpace,
    /// Raw JPEG file bytes
    pub data: bytes::Bytes,
}

impl ImageData {
    /// Load a JPEG image from raw JPEG data.
    pub fn from_jpeg(data: Vec<u8>) -> Result<Self, ImageError> {
        let frame = parse_jpeg_header(&data)?;

        Ok(Self {
            width: frame.width,
            height: frame.height,
            bits_per_component: frame.precision,
            color_space: frame.color_space,
            data: bytes::Bytes::from(data),
        })
    }

    /// Load a JPEG image from a file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ImageError> {
        let path = path.as_ref();
        if !path.is_file() {
            return Err(ImageError::NotFound(path.to_path_buf()));
        }
        let data = std::fs::read(path).map_err(|e| ImageError::Io(e.to_string()))?;
        Self::from_jpeg(data)
    }

    /// Build the PDF Image XObject as a stream object.
    pub fn build_xobject(&self) -> Object {
        let mut dict = HashMap::new();

        dict.insert("Type".to_string(), Object::Name("XObject".to_string()));
        dict.insert("Subtype".to_string(), Object::Name("Image".to_string()));
        dict.insert("Width".to_string(), Object::Integer(self.width as i64));
        dict.insert("Height".to_string(), Object::Integer(self.height as i64));
        dict.insert(
            "ColorSpace".to_string(),
            Object::Name(self.color_space.pdf_name().to_string()),
        );
        dict.insert(
            "BitsPerComponent".to_string(),
            Object::Integer(self.bits_per_component as i64),
        );
        dict.insert("Filter".to_string(), Object::Name("DCTDecode".to_string()));

        Object::Stream {
            dict,
            data: self.data.clone(),
        }
    }

    /// Get the aspect ratio (width / height).
    pub fn aspect_ratio(&self) -> f32 {
        if self.height == 0 {
            return 1.0;
        }
        self.width as f32 / self.height as f32
    }
}

/// Frame header fields read from a SOF segment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct JpegFrame {
    /// Frame width in pixels
    pub width: u32,
    /// Frame height in pixels
    pub height: u32,
    /// Sample precision in bits
    pub precision: u8,
    /// Color space implied by the component count
    pub color_space: ColorSpace,
}

/// Whether `marker` is a Start Of Frame marker (baseline, progressive,
/// lossless and arithmetic variants; excludes DHT, JPG and DAC).
fn is_sof_marker(marker: u8) -> bool {
    matches!(marker, 0xC0..=0xC3 | 0xC5..=0xC7 | 0xC9..=0xCB | 0xCD..=0xCF)
}

/// Parse JPEG markers up to the first SOF segment.
///
/// Markers without a payload (TEM, RSTn) are stepped over; every other
/// segment is skipped by its declared length. Reaching SOS or EOI first
/// means the frame size is unknown.
pub fn parse_jpeg_header(data: &[u8]) -> Result<JpegFrame, ImageError> {
    if data.len() < 2 || data[0] != 0xFF || data[1] != 0xD8 {
        return Err(ImageError::InvalidData("Not a valid JPEG (missing SOI)".to_string()));
    }

    let mut pos = 2;
    while pos + 1 < data.len() {
        if data[pos] != 0xFF {
            pos += 1;
            continue;
        }

        let marker = data[pos + 1];
        pos += 2;

        match marker {
            // Fill bytes and stuffed zeros
            0xFF => {
                pos -= 1;
                continue;
            },
            0x00 | 0x01 | 0xD0..=0xD7 => continue,
            0xD9 | 0xDA => return Err(ImageError::MissingFrame),
            _ => {},
        }

        if pos + 2 > data.len() {
            break;
        }
        let length = u16::from_be_bytes([data[pos], data[pos + 1]]) as usize;
        if length < 2 {
            return Err(ImageError::InvalidData(format!(
                "Segment length {} for marker 0x{:02X}",
                length, marker
            )));
        }

        if is_sof_marker(marker) {
            if pos + 8 > data.len() {
                return Err(ImageError::InvalidData("Truncated SOF segment".to_string()));
            }

            let precision = data[pos + 2];
            let height = u16::from_be_bytes([data[pos + 3], data[pos + 4]]) as u32;
            let width = u16::from_be_bytes([data[pos + 5], data[pos + 6]]) as u32;
            let components = data[pos + 7];

            if width == 0 || height == 0 {
                return Err(ImageError::InvalidData(format!(
                    "Frame size {}x{}",
                    width, height
                )));
            }

            return Ok(JpegFrame {
                width,
                height,
                precision,
                color_space: ColorSpace::from_components(components),
            });
        }

        pos += length;
    }

    Err(ImageError::MissingFrame)
}

/// A registered image and its resource name.
#[derive(Debug, Clone)]
pub struct RegisteredImage {
    /// Resource name (e.g., "Im1")
    pub resource_id: String,
    /// Image data
    pub image: ImageData,
}

/// Image XObject manager for PDF generation.
///
/// Images are keyed by source path; registering the same path twice returns
/// the existing resource name. Iteration follows registration order.
#[derive(Debug, Default, Clone)]
pub struct ImageManager {
    images: IndexMap<PathBuf, RegisteredImage>,
}

impl ImageManager {
    /// Create a new image manager.
    pub fn new() -> Self {
        Self::default()
    }

    /// Load and register a JPEG file, reusing an earlier registration of the same path.
    ///
    /// # Returns
    /// The image resource ID (e.g., "Im1")
    pub fn register_from_file(&mut self, path: impl AsRef<Path>) -> Result<String, ImageError> {
        let path = path.as_ref();
        if let Some(existing) = self.images.get(path) {
            return Ok(existing.resource_id.clone());
        }

        let image = ImageData::from_file(path)?;
        let resource_id = format!("Im{}", self.images.len() + 1);
        log::debug!(
            "Registered image {} ({}x{}) from {}",
            resource_id,
            image.width,
            image.height,
            path.display()
        );
        self.images.insert(
            path.to_path_buf(),
            RegisteredImage {
                resource_id: resource_id.clone(),
                image,
            },
        );
        Ok(resource_id)
    }

    /// Get an image by resource ID.
    pub fn get(&self, resource_id: &str) -> Option<&ImageData> {
        self.images
            .values()
            .find(|entry| entry.resource_id == resource_id)
            .map(|entry| &entry.image)
    }

    /// Iterate over all images in registration order.
    pub fn images(&self) -> impl Iterator<Item = &RegisteredImage> {
        self.images.values()
    }

    /// Get the number of registered images.
    pub fn len(&self) -> usize {
        self.images.len()
    }

    /// Check if any images are registered.
    pub fn is_empty(&self) -> bool {
        self.images.is_empty()
    }
}
