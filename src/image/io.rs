//! Image file loading and saving.
//!
//! Decoding goes through the `image` crate, so any format it supports
//! (PNG, JPEG, TIFF) can be used as input. Colour inputs are converted
//! to 8-bit luma on load.

use std::path::{Path, PathBuf};

use image::{ImageBuffer, Luma};
use thiserror::Error;

use crate::image::gray::GrayImage;

/// Errors raised while reading or writing image files.
#[derive(Debug, Error)]
pub enum ImageIoError {
    /// The file could not be opened or decoded.
    #[error("failed to read image {}: {source}", .path.display())]
    Decode {
        /// Path of the offending file.
        path: PathBuf,
        /// Underlying decoder error.
        source: image::ImageError,
    },
    /// The file could not be encoded or written.
    #[error("failed to write image {}: {source}", .path.display())]
    Encode {
        /// Path of the offending file.
        path: PathBuf,
        /// Underlying encoder error.
        source: image::ImageError,
    },
}

/// Loads an image from disk and converts it to 8-bit grayscale.
pub fn load_gray(path: &Path) -> Result<GrayImage, ImageIoError> {
    let decoded = image::open(path).map_err(|source| ImageIoError::Decode {
        path: path.to_path_buf(),
        source,
    })?;
    let luma = decoded.into_luma8();
    let width = luma.width() as usize;
    let height = luma.height() as usize;
    // The buffer length always matches the decoder-reported dimensions.
    let pixels = luma.into_raw();
    Ok(GrayImage::from_pixels(width, height, pixels).unwrap_or_default())
}

/// Writes a grayscale image to disk, format chosen from the extension.
pub fn save_gray(image: &GrayImage, path: &Path) -> Result<(), ImageIoError> {
    let buffer: ImageBuffer<Luma<u8>, Vec<u8>> = ImageBuffer::from_raw(
        image.width() as u32,
        image.height() as u32,
        image.pixels().to_vec(),
    )
    .unwrap_or_else(|| ImageBuffer::new(0, 0));
    buffer.save(path).map_err(|source| ImageIoError::Encode {
        path: path.to_path_buf(),
        source,
    })
}
