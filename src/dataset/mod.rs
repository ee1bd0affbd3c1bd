//! Dataset plumbing around extraction runs.
//!
//! Image sets are described by CSV split files pairing a file name with
//! an integer class label. After extraction, stored histograms are
//! assembled into normalized per-image feature vectors for downstream
//! classifiers.

pub mod features;
pub mod splits;

use std::path::PathBuf;

use thiserror::Error;

pub use features::{feature_matrix, labeled_features, z_score};
pub use splits::{load_split, LabeledSample};

/// Errors raised while loading splits or assembling features.
#[derive(Debug, Error)]
pub enum DatasetError {
    /// A split file could not be read or parsed.
    #[error("failed to read split {}: {source}", .path.display())]
    Split {
        /// Path of the split file.
        path: PathBuf,
        /// Underlying CSV error.
        source: csv::Error,
    },
    /// A requested image has no histogram in the store.
    #[error("store has no entry for {name}")]
    MissingEntry {
        /// Name of the missing entry.
        name: String,
    },
}
