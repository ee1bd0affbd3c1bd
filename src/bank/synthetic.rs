//! Deterministic kernels for tests and benchmarks.
//!
//! The trained coefficient tables are large binary assets, so the test
//! suite and the benchmarks run against synthetic banks whose response
//! to a given image is predictable by inspection.

use crate::bank::{BankError, FilterBank, Kernel};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SyntheticKind {
    CenterSpike,
    ZeroSum,
}

/// A filter bank that generates kernels instead of loading them.
///
/// Two flavours are available:
///
/// - `center_spike`: every kernel passes the center sample through
///   unchanged, so any non-zero pixel drives every filter response
///   above threshold.
/// - `zero_sum`: every kernel's coefficients sum to zero, so constant
///   images produce exactly zero response everywhere.
#[derive(Debug, Clone, Copy)]
pub struct SyntheticBank {
    kind: SyntheticKind,
}

impl SyntheticBank {
    /// Bank whose kernels are 1.0 at the center and zero elsewhere.
    pub fn center_spike() -> Self {
        Self {
            kind: SyntheticKind::CenterSpike,
        }
    }

    /// Bank whose kernels sum to zero.
    pub fn zero_sum() -> Self {
        Self {
            kind: SyntheticKind::ZeroSum,
        }
    }

    fn build_kernel(&self, filter_size: usize) -> Option<Kernel> {
        let mut coeffs = vec![0.0; filter_size * filter_size];
        let center = filter_size / 2;
        match self.kind {
            SyntheticKind::CenterSpike => {
                coeffs[center * filter_size + center] = 1.0;
            }
            SyntheticKind::ZeroSum => {
                // Center against its left neighbour; a 1x1 kernel stays
                // all-zero, which also sums to zero.
                if filter_size > 1 {
                    coeffs[center * filter_size + center] = 1.0;
                    coeffs[center * filter_size + center - 1] = -1.0;
                }
            }
        }
        Kernel::new(filter_size, coeffs)
    }
}

impl FilterBank for SyntheticBank {
    fn supports(&self, filter_size: usize, num_filters: usize) -> bool {
        filter_size % 2 == 1 && (1..=16).contains(&num_filters)
    }

    fn resolve(&self, filter_size: usize, num_filters: usize) -> Result<Vec<Kernel>, BankError> {
        if !self.supports(filter_size, num_filters) {
            return Err(BankError::UnknownConfiguration {
                filter_size,
                num_filters,
            });
        }
        (0..num_filters)
            .map(|_| self.build_kernel(filter_size))
            .collect::<Option<Vec<_>>>()
            .ok_or(BankError::UnknownConfiguration {
                filter_size,
                num_filters,
            })
    }
}
