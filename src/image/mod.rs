//! Grayscale image handling.
//!
//! This module owns the pixel-level plumbing that the feature pipeline
//! builds on:
//!
//! - [`gray`] defines the owned [`GrayImage`] buffer and [`Region`] crops
//! - [`io`] decodes input files to 8-bit luma and writes images back out
//! - [`downsample`] shrinks images for halved filter configurations

pub mod downsample;
pub mod gray;
pub mod io;

pub use downsample::blur_halve;
pub use gray::{GrayImage, Region};
pub use io::{load_gray, save_gray, ImageIoError};
