//! Pyramid-style image reduction.
//!
//! Even filter sizes are served by halving the filter and shrinking the
//! image to compensate. The reduction is a separable 5-tap binomial blur
//! followed by decimation of the even-indexed rows and columns, with
//! edge samples clamped to the image border.

use crate::image::gray::GrayImage;

/// Normalized binomial kernel [1, 4, 6, 4, 1] / 16.
const BINOMIAL_5TAP: [f64; 5] = [0.0625, 0.25, 0.375, 0.25, 0.0625];

/// Clamps `index + offset` to `[0, len)`.
#[inline]
fn clamp_index(index: usize, offset: isize, len: usize) -> usize {
    let shifted = index as isize + offset;
    shifted.clamp(0, len as isize - 1) as usize
}

/// Blurs the image and halves both dimensions, rounding down.
///
/// An input smaller than 2 pixels along an axis collapses to an empty
/// image. Output intensities are rounded to the nearest integer and
/// clamped to the 8-bit range.
pub fn blur_halve(src: &GrayImage) -> GrayImage {
    let width = src.width();
    let height = src.height();
    let out_width = width / 2;
    let out_height = height / 2;
    if out_width == 0 || out_height == 0 {
        return GrayImage::default();
    }

    // Horizontal pass over the full image, kept in floating point so the
    // vertical pass does not accumulate rounding error.
    let mut blurred_rows = vec![0.0f64; width * height];
    for row in 0..height {
        let src_row = src.row(row);
        let dst_row = &mut blurred_rows[row * width..(row + 1) * width];
        for (col, dst) in dst_row.iter_mut().enumerate() {
            let mut acc = 0.0;
            for (tap, coeff) in BINOMIAL_5TAP.iter().enumerate() {
                let sample = src_row[clamp_index(col, tap as isize - 2, width)];
                acc += coeff * f64::from(sample);
            }
            *dst = acc;
        }
    }

    // Vertical pass, evaluated only at the surviving even coordinates.
    let mut pixels = Vec::with_capacity(out_width * out_height);
    for out_row in 0..out_height {
        let src_row = out_row * 2;
        for out_col in 0..out_width {
            let src_col = out_col * 2;
            let mut acc = 0.0;
            for (tap, coeff) in BINOMIAL_5TAP.iter().enumerate() {
                let sample_row = clamp_index(src_row, tap as isize - 2, height);
                acc += coeff * blurred_rows[sample_row * width + src_col];
            }
            pixels.push(acc.round().clamp(0.0, 255.0) as u8);
        }
    }

    GrayImage::from_pixels(out_width, out_height, pixels).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dimensions_floor_halved() {
        let even = blur_halve(&GrayImage::filled(8, 6, 100));
        assert_eq!(even.width(), 4);
        assert_eq!(even.height(), 3);

        let odd = blur_halve(&GrayImage::filled(9, 7, 100));
        assert_eq!(odd.width(), 4);
        assert_eq!(odd.height(), 3);
    }

    #[test]
    fn test_constant_image_stays_constant() {
        // The kernel is normalized, so a flat image must survive unchanged.
        let reduced = blur_halve(&GrayImage::filled(10, 10, 173));
        assert!(reduced.pixels().iter().all(|&p| p == 173));
    }

    #[test]
    fn test_tiny_image_collapses_to_empty() {
        let reduced = blur_halve(&GrayImage::filled(1, 5, 9));
        assert_eq!(reduced.width(), 0);
        assert_eq!(reduced.height(), 0);
        assert_eq!(reduced.pixel_count(), 0);
    }

    #[test]
    fn test_output_range_is_bounded_by_input_range() {
        // A convex combination of samples can never leave their range.
        let pixels: Vec<u8> = (0..100).map(|i| if i % 3 == 0 { 40 } else { 200 }).collect();
        let image = GrayImage::from_pixels(10, 10, pixels).unwrap();
        let reduced = blur_halve(&image);
        assert!(reduced.pixels().iter().all(|&p| (40..=200).contains(&p)));
    }
}
