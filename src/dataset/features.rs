//! Feature vectors from stored histograms.
//!
//! Raw code histograms scale with image area, so vectors are z-score
//! normalized per image before they reach a classifier: subtract the
//! histogram's mean bin count and divide by its population standard
//! deviation.

use crate::dataset::{DatasetError, LabeledSample};
use crate::store::StoreReader;

/// Z-score normalizes one histogram.
///
/// A constant histogram has zero deviation and maps to all zeros.
pub fn z_score(counts: &[u64]) -> Vec<f32> {
    if counts.is_empty() {
        return Vec::new();
    }
    let len = counts.len() as f64;
    let mean = counts.iter().map(|&c| c as f64).sum::<f64>() / len;
    let variance = counts
        .iter()
        .map(|&c| {
            let delta = c as f64 - mean;
            delta * delta
        })
        .sum::<f64>()
        / len;
    let std_dev = variance.sqrt();
    if std_dev == 0.0 {
        return vec![0.0; counts.len()];
    }
    counts
        .iter()
        .map(|&c| ((c as f64 - mean) / std_dev) as f32)
        .collect()
}

/// Builds one normalized feature vector per name, in the given order.
pub fn feature_matrix(
    reader: &StoreReader,
    names: &[String],
) -> Result<Vec<Vec<f32>>, DatasetError> {
    names
        .iter()
        .map(|name| {
            let counts = reader
                .get(name)
                .ok_or_else(|| DatasetError::MissingEntry { name: name.clone() })?;
            Ok(z_score(counts))
        })
        .collect()
}

/// Builds aligned feature vectors and labels for a split.
pub fn labeled_features(
    reader: &StoreReader,
    samples: &[LabeledSample],
) -> Result<(Vec<Vec<f32>>, Vec<i32>), DatasetError> {
    let mut features = Vec::with_capacity(samples.len());
    let mut labels = Vec::with_capacity(samples.len());
    for sample in samples {
        let counts = reader
            .get(&sample.file_name)
            .ok_or_else(|| DatasetError::MissingEntry {
                name: sample.file_name.clone(),
            })?;
        features.push(z_score(counts));
        labels.push(sample.label);
    }
    Ok((features, labels))
}
