//! Binarized statistical image feature extraction.
//!
//! The pipeline turns one grayscale image into one histogram:
//!
//! 1. [`border`] extends the image periodically by half the filter size
//! 2. [`convolve`] correlates every bank kernel over the extended image
//! 3. [`code`] thresholds the responses and packs one bit per filter
//!    into an integer code per pixel
//! 4. [`histogram`] counts the codes into a fixed `2^num_filters` range
//!
//! [`BsifExtractor`] owns a resolved kernel set and drives the four
//! stages for each image handed to it.

pub mod border;
pub mod code;
pub mod convolve;
pub mod histogram;

use crate::bank::Kernel;
use crate::image::GrayImage;

pub use border::wrap_border;
pub use code::{CodeImage, RESPONSE_THRESHOLD};
pub use convolve::{correlate, ResponseSurface};
pub use histogram::Histogram;

/// Runs the code extraction pipeline with a fixed kernel set.
///
/// All kernels must share one side length. The filter at index `k`
/// carries bit weight `2^(num_filters - 1 - k)`, so the first kernel
/// owns the most significant bit. Since each filter touches its own bit
/// exactly once, the result does not depend on processing order.
#[derive(Debug, Clone)]
pub struct BsifExtractor {
    kernels: Vec<Kernel>,
    border: usize,
}

impl BsifExtractor {
    /// Creates an extractor from resolved kernels.
    ///
    /// Banks produce uniformly sized sets of at most 32 kernels, the
    /// widest code a pixel can carry.
    pub fn new(kernels: Vec<Kernel>) -> Self {
        debug_assert!(kernels.len() <= 32);
        debug_assert!(kernels
            .windows(2)
            .all(|pair| pair[0].size() == pair[1].size()));
        let border = kernels.first().map_or(0, |kernel| kernel.size() / 2);
        Self { kernels, border }
    }

    /// Number of kernels in the set.
    #[inline]
    pub fn num_filters(&self) -> usize {
        self.kernels.len()
    }

    /// Number of histogram bins this extractor produces.
    #[inline]
    pub fn bins(&self) -> usize {
        1 << self.kernels.len()
    }

    /// Computes the per-pixel code image for `image`.
    ///
    /// The output has the same dimensions as the input, every code in
    /// `[1, 2^num_filters]`.
    pub fn code_image(&self, image: &GrayImage) -> CodeImage {
        let extended = wrap_border(image, self.border);
        let mut codes = CodeImage::new(image.width(), image.height());
        let num_filters = self.kernels.len();
        for (filter_index, kernel) in self.kernels.iter().enumerate() {
            let responses = correlate(&extended, kernel);
            let weight = 1u32 << (num_filters - 1 - filter_index);
            codes.accumulate(&responses, self.border, weight);
        }
        codes
    }

    /// Computes the fixed-range code histogram for `image`.
    pub fn histogram(&self, image: &GrayImage) -> Histogram {
        Histogram::from_code_image(&self.code_image(image), self.kernels.len())
    }
}
