//! Filter bank sources.
//!
//! A filter bank maps a `(filter_size, num_filters)` configuration to a
//! set of learned kernels. The production implementation
//! ([`FileFilterBank`]) reads pre-trained coefficient tables from disk;
//! [`SyntheticBank`] generates deterministic kernels so the pipeline can
//! be tested without shipping the trained assets.

pub mod asset;
pub mod kernel;
pub mod synthetic;

use std::path::PathBuf;

use thiserror::Error;

pub use asset::{catalog_supports, FileFilterBank};
pub use kernel::{flat_index, kernels_from_flat, Kernel};
pub use synthetic::SyntheticBank;

/// Errors raised while resolving a filter bank configuration.
#[derive(Debug, Error)]
pub enum BankError {
    /// No kernel set exists for the requested configuration.
    #[error("no filter bank entry for size {filter_size} with {num_filters} filters")]
    UnknownConfiguration {
        /// Requested kernel side length.
        filter_size: usize,
        /// Requested number of kernels.
        num_filters: usize,
    },
    /// A coefficient table file could not be read.
    #[error("failed to read filter table {}: {source}", .path.display())]
    Io {
        /// Path of the table file.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },
    /// A coefficient table held the wrong number of values.
    #[error("filter table {} holds {actual} coefficients, expected {expected}", .path.display())]
    TableSize {
        /// Path of the table file.
        path: PathBuf,
        /// Number of coefficients the configuration requires.
        expected: usize,
        /// Number of coefficients actually present.
        actual: usize,
    },
}

/// A source of filter kernels, keyed by size and count.
pub trait FilterBank {
    /// Returns true if the configuration can be resolved.
    ///
    /// This is a cheap catalog check: it never touches the filesystem,
    /// so callers can validate configurations before doing any I/O.
    fn supports(&self, filter_size: usize, num_filters: usize) -> bool;

    /// Loads the kernels for a configuration.
    ///
    /// On success the returned vector holds exactly `num_filters`
    /// kernels, each `filter_size` on a side, ordered by filter index.
    fn resolve(&self, filter_size: usize, num_filters: usize) -> Result<Vec<Kernel>, BankError>;
}
