//! Filter kernels and the flat coefficient table layout.
//!
//! A bank asset stores every kernel of a `(filter_size, num_filters)`
//! configuration interleaved in one flat array: the coefficient of
//! kernel `k` at spatial position `(row, col)` lives at
//!
//! `k + num_filters * (col + filter_size * row)`
//!
//! so consecutive entries hold the same spatial position across all
//! kernels. [`kernels_from_flat`] de-interleaves that layout into
//! per-kernel matrices.

/// A square filter kernel with real-valued coefficients, row-major.
#[derive(Clone, PartialEq)]
pub struct Kernel {
    size: usize,
    coeffs: Vec<f64>,
}

impl Kernel {
    /// Creates a kernel from row-major coefficients.
    ///
    /// Returns `None` if the buffer length is not `size * size`.
    pub fn new(size: usize, coeffs: Vec<f64>) -> Option<Self> {
        if coeffs.len() != size * size {
            return None;
        }
        Some(Self { size, coeffs })
    }

    /// Side length of the kernel.
    #[inline]
    pub fn size(&self) -> usize {
        self.size
    }

    /// Returns the coefficient at `(row, col)`.
    #[inline]
    pub fn get(&self, row: usize, col: usize) -> f64 {
        self.coeffs[row * self.size + col]
    }

    /// Returns the row-major coefficients.
    #[inline]
    pub fn coeffs(&self) -> &[f64] {
        &self.coeffs
    }
}

impl std::fmt::Debug for Kernel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Kernel").field("size", &self.size).finish()
    }
}

/// Position of one coefficient inside a flat interleaved table.
#[inline]
pub fn flat_index(
    filter_size: usize,
    num_filters: usize,
    row: usize,
    col: usize,
    filter_index: usize,
) -> usize {
    filter_index + num_filters * (col + filter_size * row)
}

/// Splits a flat interleaved table into `num_filters` square kernels.
///
/// Returns `None` when the table length is not
/// `filter_size * filter_size * num_filters`.
pub fn kernels_from_flat(
    table: &[f64],
    filter_size: usize,
    num_filters: usize,
) -> Option<Vec<Kernel>> {
    if table.len() != filter_size * filter_size * num_filters {
        return None;
    }
    (0..num_filters)
        .map(|filter_index| {
            let mut coeffs = Vec::with_capacity(filter_size * filter_size);
            for row in 0..filter_size {
                for col in 0..filter_size {
                    coeffs
                        .push(table[flat_index(filter_size, num_filters, row, col, filter_index)]);
                }
            }
            Kernel::new(filter_size, coeffs)
        })
        .collect()
}
