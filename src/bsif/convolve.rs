//! Kernel correlation over extended images.
//!
//! Responses are computed by sliding the kernel with its center anchored
//! on each pixel, without flipping, and accumulating in `f64`. Samples
//! that fall outside the image contribute zero. Callers only ever read
//! responses at interior positions whose kernel support lies fully
//! inside the extended image, so the zero padding never reaches a
//! sampled value.

use crate::bank::Kernel;
use crate::image::GrayImage;

/// A dense grid of per-pixel filter responses.
#[derive(Clone, PartialEq)]
pub struct ResponseSurface {
    width: usize,
    height: usize,
    values: Vec<f64>,
}

impl ResponseSurface {
    /// Returns the surface width.
    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    /// Returns the surface height.
    #[inline]
    pub fn height(&self) -> usize {
        self.height
    }

    /// Returns the response at `(row, col)`.
    #[inline]
    pub fn get(&self, row: usize, col: usize) -> f64 {
        self.values[row * self.width + col]
    }

    /// Returns the raw row-major responses.
    #[inline]
    pub fn values(&self) -> &[f64] {
        &self.values
    }
}

impl std::fmt::Debug for ResponseSurface {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResponseSurface")
            .field("width", &self.width)
            .field("height", &self.height)
            .finish()
    }
}

/// Correlates `kernel` with `image`, producing one response per pixel.
///
/// The output has the same dimensions as the input image.
pub fn correlate(image: &GrayImage, kernel: &Kernel) -> ResponseSurface {
    let width = image.width();
    let height = image.height();
    let size = kernel.size();
    let anchor = (size / 2) as isize;

    let mut values = vec![0.0f64; width * height];
    for row in 0..height {
        for col in 0..width {
            let mut acc = 0.0;
            for k_row in 0..size {
                let src_row = row as isize + k_row as isize - anchor;
                if src_row < 0 || src_row >= height as isize {
                    continue;
                }
                let src_row_pixels = image.row(src_row as usize);
                for k_col in 0..size {
                    let src_col = col as isize + k_col as isize - anchor;
                    if src_col < 0 || src_col >= width as isize {
                        continue;
                    }
                    acc += kernel.get(k_row, k_col) * f64::from(src_row_pixels[src_col as usize]);
                }
            }
            values[row * width + col] = acc;
        }
    }

    ResponseSurface {
        width,
        height,
        values,
    }
}
