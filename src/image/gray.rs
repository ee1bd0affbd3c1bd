//! Owned 8-bit grayscale image and rectangular regions.

/// A single-channel 8-bit image with row-major pixel storage.
///
/// This is the unit of work for the whole pipeline: images are immutable
/// once constructed, and every transformation (crop, downsample, border
/// extension) produces a new `GrayImage`.
#[derive(Clone, PartialEq, Eq)]
pub struct GrayImage {
    /// Raw intensity samples, row-major, `height * width` entries.
    pixels: Vec<u8>,
    /// Image width in pixels.
    width: usize,
    /// Image height in pixels.
    height: usize,
}

impl GrayImage {
    /// Creates an image from raw row-major pixels.
    ///
    /// Returns `None` if the buffer length does not match the dimensions.
    pub fn from_pixels(width: usize, height: usize, pixels: Vec<u8>) -> Option<Self> {
        if pixels.len() != width * height {
            return None;
        }
        Some(Self {
            pixels,
            width,
            height,
        })
    }

    /// Creates an image of constant intensity.
    pub fn filled(width: usize, height: usize, value: u8) -> Self {
        Self {
            pixels: vec![value; width * height],
            width,
            height,
        }
    }

    /// Returns the image width.
    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    /// Returns the image height.
    #[inline]
    pub fn height(&self) -> usize {
        self.height
    }

    /// Returns the total number of pixels (width * height).
    #[inline]
    pub fn pixel_count(&self) -> usize {
        self.width * self.height
    }

    /// Returns the intensity at `(row, col)`.
    ///
    /// Panics if the coordinates are out of bounds, like slice indexing.
    #[inline]
    pub fn get(&self, row: usize, col: usize) -> u8 {
        self.pixels[row * self.width + col]
    }

    /// Returns one row of pixels.
    #[inline]
    pub fn row(&self, row: usize) -> &[u8] {
        let start = row * self.width;
        &self.pixels[start..start + self.width]
    }

    /// Returns the raw row-major pixel data.
    #[inline]
    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    /// Consumes the image and returns the raw pixel buffer.
    pub fn into_pixels(self) -> Vec<u8> {
        self.pixels
    }

    /// Copies out the rectangle described by `region`.
    ///
    /// Returns `None` when the region does not fit inside this image.
    pub fn crop(&self, region: &Region) -> Option<GrayImage> {
        if !region.fits_within(self.width, self.height) {
            return None;
        }
        let mut pixels = Vec::with_capacity(region.width * region.height);
        for row in region.top..region.bottom() {
            let start = row * self.width + region.left;
            pixels.extend_from_slice(&self.pixels[start..start + region.width]);
        }
        Some(GrayImage {
            pixels,
            width: region.width,
            height: region.height,
        })
    }
}

impl Default for GrayImage {
    /// An empty image with zero width and height.
    fn default() -> Self {
        Self {
            pixels: Vec::new(),
            width: 0,
            height: 0,
        }
    }
}

impl std::fmt::Debug for GrayImage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GrayImage")
            .field("width", &self.width)
            .field("height", &self.height)
            .finish()
    }
}

/// A rectangle in image coordinates, rows and columns zero-based.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Region {
    /// First row covered by the region.
    pub top: usize,
    /// First column covered by the region.
    pub left: usize,
    /// Number of rows.
    pub height: usize,
    /// Number of columns.
    pub width: usize,
}

impl Region {
    /// One-past-the-last row.
    #[inline]
    pub fn bottom(&self) -> usize {
        self.top + self.height
    }

    /// One-past-the-last column.
    #[inline]
    pub fn right(&self) -> usize {
        self.left + self.width
    }

    /// Returns true if the region lies entirely inside a `width x height` image.
    pub fn fits_within(&self, width: usize, height: usize) -> bool {
        self.right() <= width && self.bottom() <= height
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_pixels_checks_length() {
        assert!(GrayImage::from_pixels(3, 2, vec![0u8; 6]).is_some());
        assert!(GrayImage::from_pixels(3, 2, vec![0u8; 5]).is_none());
    }

    #[test]
    fn test_row_major_indexing() {
        let image = GrayImage::from_pixels(3, 2, vec![1, 2, 3, 4, 5, 6]).unwrap();
        assert_eq!(image.get(0, 0), 1);
        assert_eq!(image.get(0, 2), 3);
        assert_eq!(image.get(1, 0), 4);
        assert_eq!(image.row(1), &[4, 5, 6]);
    }

    #[test]
    fn test_crop_inside_bounds() {
        let pixels: Vec<u8> = (0..16).collect();
        let image = GrayImage::from_pixels(4, 4, pixels).unwrap();
        let region = Region {
            top: 1,
            left: 2,
            height: 2,
            width: 2,
        };

        let cropped = image.crop(&region).unwrap();
        assert_eq!(cropped.width(), 2);
        assert_eq!(cropped.height(), 2);
        assert_eq!(cropped.pixels(), &[6, 7, 10, 11]);
    }

    #[test]
    fn test_crop_out_of_bounds() {
        let image = GrayImage::filled(4, 4, 0);
        let region = Region {
            top: 3,
            left: 0,
            height: 2,
            width: 4,
        };
        assert!(image.crop(&region).is_none());
    }
}
