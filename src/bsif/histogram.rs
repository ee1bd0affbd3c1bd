//! Fixed-range code histograms.
//!
//! A histogram always spans the full code range of its configuration:
//! `2^num_filters` unit-width bins, where bin `i` counts pixels whose
//! code is `i + 1`. The bin layout therefore depends only on
//! `num_filters`, never on which codes an image happens to produce, so
//! histograms from different images are directly comparable.

use crate::bsif::code::CodeImage;

/// Distribution of binary codes over an image.
#[derive(Clone, PartialEq, Eq)]
pub struct Histogram {
    counts: Vec<u64>,
}

impl Histogram {
    /// Counts the codes of `code_image` into `2^num_filters` bins.
    pub fn from_code_image(code_image: &CodeImage, num_filters: usize) -> Self {
        let bins = 1usize << num_filters;
        let mut counts = vec![0u64; bins];
        for &code in code_image.codes() {
            debug_assert!(code >= 1 && code as usize <= bins);
            if let Some(slot) = counts.get_mut(code as usize - 1) {
                *slot += 1;
            }
        }
        Self { counts }
    }

    /// Number of bins, always a power of two.
    #[inline]
    pub fn bins(&self) -> usize {
        self.counts.len()
    }

    /// Per-bin counts; bin `i` counts code `i + 1`.
    #[inline]
    pub fn counts(&self) -> &[u64] {
        &self.counts
    }

    /// Total number of counted pixels.
    pub fn total(&self) -> u64 {
        self.counts.iter().sum()
    }
}

impl std::fmt::Debug for Histogram {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Histogram")
            .field("bins", &self.counts.len())
            .field("total", &self.total())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bin_count_is_power_of_two() {
        for num_filters in [1, 2, 5, 8, 12] {
            let histogram = Histogram::from_code_image(&CodeImage::new(4, 4), num_filters);
            assert_eq!(histogram.bins(), 1 << num_filters);
        }
    }

    #[test]
    fn test_fresh_code_image_lands_in_first_bin() {
        let histogram = Histogram::from_code_image(&CodeImage::new(5, 3), 3);
        assert_eq!(histogram.counts()[0], 15);
        assert!(histogram.counts()[1..].iter().all(|&c| c == 0));
    }

    #[test]
    fn test_total_matches_pixel_count() {
        let histogram = Histogram::from_code_image(&CodeImage::new(7, 9), 4);
        assert_eq!(histogram.total(), 63);
    }

    #[test]
    fn test_empty_code_image_gives_empty_bins() {
        let histogram = Histogram::from_code_image(&CodeImage::new(0, 0), 2);
        assert_eq!(histogram.bins(), 4);
        assert_eq!(histogram.total(), 0);
    }
}
