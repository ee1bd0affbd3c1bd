//! CSV split files.
//!
//! A split file lists one image per line as `file_name,label`, no
//! header. Labels are small integers whose meaning belongs to the
//! dataset (the attack-detection sets use 0 for unmodified eyes and 1
//! for textured lenses).

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::dataset::DatasetError;

/// One image reference from a split file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LabeledSample {
    /// Image file name, relative to the run's image directory.
    pub file_name: String,
    /// Integer class label.
    pub label: i32,
}

/// Loads every sample of a split file, preserving order.
pub fn load_split(path: &Path) -> Result<Vec<LabeledSample>, DatasetError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .from_path(path)
        .map_err(|source| DatasetError::Split {
            path: path.to_path_buf(),
            source,
        })?;

    let mut samples = Vec::new();
    for record in reader.deserialize() {
        let sample: LabeledSample = record.map_err(|source| DatasetError::Split {
            path: path.to_path_buf(),
            source,
        })?;
        samples.push(sample);
    }
    Ok(samples)
}

/// Extracts the file names of a split, preserving order.
pub fn file_names(samples: &[LabeledSample]) -> Vec<String> {
    samples.iter().map(|s| s.file_name.clone()).collect()
}
