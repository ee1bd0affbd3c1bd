//! Per-pixel binary code accumulation.
//!
//! Each filter contributes one bit per pixel. Starting from a grid of
//! ones, pixels whose response clears the activation threshold gain the
//! filter's power-of-two weight, so after all filters have run every
//! pixel carries a code in `[1, 2^num_filters]`.

use crate::bsif::convolve::ResponseSurface;
use crate::image::GrayImage;

/// Minimum response for a filter to set its bit.
///
/// Responses at or below this value leave the code untouched, so exact
/// zeros and floating-point noise around zero never fire a filter.
pub const RESPONSE_THRESHOLD: f64 = 0.001;

/// A grid of per-pixel binary codes, offset by one.
#[derive(Clone, PartialEq, Eq)]
pub struct CodeImage {
    width: usize,
    height: usize,
    codes: Vec<u32>,
}

impl CodeImage {
    /// Creates a code image with every pixel initialized to 1.
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            codes: vec![1; width * height],
        }
    }

    /// Returns the code image width.
    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    /// Returns the code image height.
    #[inline]
    pub fn height(&self) -> usize {
        self.height
    }

    /// Returns the code at `(row, col)`.
    #[inline]
    pub fn get(&self, row: usize, col: usize) -> u32 {
        self.codes[row * self.width + col]
    }

    /// Returns the raw row-major codes.
    #[inline]
    pub fn codes(&self) -> &[u32] {
        &self.codes
    }

    /// Adds `weight` to every pixel whose response exceeds the
    /// activation threshold.
    ///
    /// The responses were computed over a border-extended image, so the
    /// value for output pixel `(row, col)` is read at
    /// `(row + border, col + border)`.
    pub fn accumulate(&mut self, responses: &ResponseSurface, border: usize, weight: u32) {
        for row in 0..self.height {
            for col in 0..self.width {
                if responses.get(row + border, col + border) > RESPONSE_THRESHOLD {
                    self.codes[row * self.width + col] += weight;
                }
            }
        }
    }

    /// Renders the codes as a grayscale image, min-max scaled to the
    /// full 8-bit range. Useful for visual inspection of what a filter
    /// configuration sees in an input.
    pub fn to_gray(&self) -> GrayImage {
        let Some(&first) = self.codes.first() else {
            return GrayImage::default();
        };
        let mut min = first;
        let mut max = first;
        for &code in &self.codes {
            min = min.min(code);
            max = max.max(code);
        }

        let pixels = if max == min {
            vec![0u8; self.codes.len()]
        } else {
            let span = f64::from(max - min);
            self.codes
                .iter()
                .map(|&code| (f64::from(code - min) * 255.0 / span).round() as u8)
                .collect()
        };
        GrayImage::from_pixels(self.width, self.height, pixels).unwrap_or_default()
    }
}

impl std::fmt::Debug for CodeImage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CodeImage")
            .field("width", &self.width)
            .field("height", &self.height)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bank::Kernel;
    use crate::bsif::convolve::correlate;
    use crate::image::GrayImage;

    fn responses_for(image: &GrayImage, coeffs: Vec<f64>, size: usize) -> ResponseSurface {
        correlate(image, &Kernel::new(size, coeffs).unwrap())
    }

    #[test]
    fn test_new_starts_at_one() {
        let code = CodeImage::new(3, 2);
        assert_eq!(code.codes(), &[1; 6]);
    }

    #[test]
    fn test_accumulate_adds_weight_above_threshold() {
        // 1x3 image; the identity kernel response equals the pixel value.
        let image = GrayImage::from_pixels(3, 1, vec![0, 5, 0]).unwrap();
        let responses = responses_for(&image, vec![1.0], 1);

        let mut code = CodeImage::new(3, 1);
        code.accumulate(&responses, 0, 4);
        assert_eq!(code.codes(), &[1, 5, 1]);
    }

    #[test]
    fn test_threshold_is_strict() {
        // Scale a pixel of value 1 down to exactly 0.001: must not fire.
        let image = GrayImage::from_pixels(2, 1, vec![1, 2]).unwrap();
        let responses = responses_for(&image, vec![0.001], 1);

        let mut code = CodeImage::new(2, 1);
        code.accumulate(&responses, 0, 8);
        // 1 * 0.001 == 0.001 stays, 2 * 0.001 == 0.002 fires.
        assert_eq!(code.codes(), &[1, 9]);
    }

    #[test]
    fn test_accumulate_reads_interior_of_extended_surface() {
        // Responses over a 5x5 extended image; the code image is 3x3
        // with border 1, so only the interior 3x3 block is consulted.
        let mut pixels = vec![0u8; 25];
        // Make extended positions (1,1) and (2,3) hot.
        pixels[6] = 255;
        pixels[13] = 255;
        let extended = GrayImage::from_pixels(5, 5, pixels).unwrap();
        let responses = responses_for(&extended, vec![1.0], 1);

        let mut code = CodeImage::new(3, 3);
        code.accumulate(&responses, 1, 2);
        assert_eq!(code.get(0, 0), 3);
        assert_eq!(code.get(1, 2), 3);
        assert_eq!(code.get(2, 2), 1);
    }

    #[test]
    fn test_to_gray_min_max_scales() {
        let mut code = CodeImage::new(2, 2);
        let image = GrayImage::from_pixels(2, 2, vec![10, 0, 0, 20]).unwrap();
        let responses = responses_for(&image, vec![1.0], 1);
        code.accumulate(&responses, 0, 2);
        // Codes: 3, 1, 1, 3.
        let gray = code.to_gray();
        assert_eq!(gray.pixels(), &[255, 0, 0, 255]);
    }

    #[test]
    fn test_to_gray_constant_codes_render_black() {
        let code = CodeImage::new(2, 2);
        assert_eq!(code.to_gray().pixels(), &[0, 0, 0, 0]);
    }
}
