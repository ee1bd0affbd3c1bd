//! Periodic border extension.
//!
//! Filter responses near the image edge need samples from outside the
//! frame. The pipeline treats the image as if it tiled the plane, so a
//! margin of `filter_size / 2` wrapped pixels is added on every side
//! before filtering.

use crate::image::GrayImage;

/// Extends an image by `border` pixels on every side with periodic wrap.
///
/// Output dimensions are `(height + 2 * border, width + 2 * border)`.
/// The wrap is modular, so a border wider than the source image repeats
/// the content as many times as needed. An empty source stays empty.
pub fn wrap_border(image: &GrayImage, border: usize) -> GrayImage {
    let width = image.width();
    let height = image.height();
    if width == 0 || height == 0 {
        return GrayImage::default();
    }

    let out_width = width + 2 * border;
    let out_height = height + 2 * border;
    let mut pixels = Vec::with_capacity(out_width * out_height);
    for row in 0..out_height {
        let src_row = wrap_coord(row, border, height);
        for col in 0..out_width {
            let src_col = wrap_coord(col, border, width);
            pixels.push(image.get(src_row, src_col));
        }
    }
    GrayImage::from_pixels(out_width, out_height, pixels).unwrap_or_default()
}

/// Maps an extended coordinate back onto the source axis.
#[inline]
fn wrap_coord(coord: usize, border: usize, len: usize) -> usize {
    (coord as isize - border as isize).rem_euclid(len as isize) as usize
}
