//! Batch extraction over image sets.
//!
//! A batch run resolves one filter configuration, then walks a list of
//! image files: load, optionally crop to the background region,
//! optionally downsample, extract the code histogram, and write it to a
//! store under the image's file name. One run produces one store.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::bank::{BankError, FilterBank};
use crate::bsif::BsifExtractor;
use crate::image::{blur_halve, load_gray, ImageIoError, Region};
use crate::store::{FileStore, HistogramSink, StoreError};

/// Kernel side length used for a requested size.
///
/// Even sizes have no trained kernels; they run with the half-size set
/// against inputs shrunk by the same factor.
pub fn effective_filter_size(filter_size: usize) -> usize {
    if filter_size % 2 == 0 {
        filter_size / 2
    } else {
        filter_size
    }
}

/// Fixed window over the eye-adjacent background of a frontal capture.
///
/// Rows 125 through 374 and columns 195 through 444, a 250 by 250
/// block. Inputs must be at least 445 wide and 375 tall for this crop.
pub const BACKGROUND_REGION: Region = Region {
    top: 125,
    left: 195,
    height: 250,
    width: 250,
};

/// How much of each input image is analyzed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SegmentationKind {
    /// Crop to [`BACKGROUND_REGION`] before extraction.
    #[serde(rename = "bg", alias = "background-region")]
    BackgroundRegion,
    /// Analyze the full frame.
    #[serde(rename = "wi", alias = "whole-image")]
    WholeImage,
}

impl SegmentationKind {
    /// Short label used in store names and logs.
    pub fn as_str(&self) -> &'static str {
        match self {
            SegmentationKind::BackgroundRegion => "bg",
            SegmentationKind::WholeImage => "wi",
        }
    }

    /// The crop applied before extraction, if any.
    pub fn crop_region(&self) -> Option<Region> {
        match self {
            SegmentationKind::BackgroundRegion => Some(BACKGROUND_REGION),
            SegmentationKind::WholeImage => None,
        }
    }
}

impl std::fmt::Display for SegmentationKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Errors raised by a batch extraction run.
#[derive(Debug, Error)]
pub enum ExtractError {
    /// The filter size was zero.
    #[error("filter size must be positive")]
    InvalidFilterSize,
    /// The filter count was outside the representable range.
    #[error("filter count {num_filters} outside supported range 1..=16")]
    InvalidFilterCount {
        /// Requested number of filters.
        num_filters: usize,
    },
    /// The filter bank has no entry for the effective configuration.
    #[error("no filter bank entry for size {filter_size} with {num_filters} filters")]
    UnsupportedConfiguration {
        /// Effective kernel side length after any halving.
        filter_size: usize,
        /// Requested number of filters.
        num_filters: usize,
    },
    /// Kernel resolution failed.
    #[error(transparent)]
    Bank(#[from] BankError),
    /// An input image could not be read.
    #[error("failed to read input {file}: {source}")]
    Input {
        /// File name from the request list.
        file: String,
        /// Underlying image error.
        source: ImageIoError,
    },
    /// An input image was too small for the background region crop.
    #[error("input {file} is {width}x{height}, too small for the background region crop")]
    RegionOutOfBounds {
        /// File name from the request list.
        file: String,
        /// Input image width.
        width: usize,
        /// Input image height.
        height: usize,
    },
    /// The histogram store failed.
    #[error(transparent)]
    Storage(#[from] StoreError),
}

/// Everything one batch run needs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractionRequest {
    /// Directory holding the input images.
    pub image_dir: PathBuf,
    /// Image file names relative to `image_dir`, also used as entry
    /// names in the store.
    pub file_names: Vec<String>,
    /// Directory the store file is written into.
    pub out_dir: PathBuf,
    /// Leading component of the store name.
    pub out_name: String,
    /// Crop mode applied to every input.
    pub segmentation: SegmentationKind,
    /// Requested kernel side length. Even values run with halved
    /// kernels against downsampled images.
    pub filter_size: usize,
    /// Number of filters, one bit each.
    pub num_filters: usize,
}

impl ExtractionRequest {
    /// Kernel side length actually resolved from the bank.
    pub fn effective_filter_size(&self) -> usize {
        effective_filter_size(self.filter_size)
    }

    /// Returns true if inputs are downsampled to compensate for halved
    /// kernels.
    pub fn needs_downsample(&self) -> bool {
        self.filter_size % 2 == 0
    }

    /// Store name for this run.
    ///
    /// The name always carries the requested filter size, not the
    /// effective one, so runs at size 6 and size 3 land in different
    /// stores.
    pub fn store_name(&self) -> String {
        format!(
            "{}_{}_{}filters_{}x{}",
            self.out_name, self.segmentation, self.num_filters, self.filter_size, self.filter_size
        )
    }

    /// Checks the configuration against `bank` without touching any
    /// image or store file.
    pub fn validate(&self, bank: &impl FilterBank) -> Result<(), ExtractError> {
        if self.filter_size == 0 {
            return Err(ExtractError::InvalidFilterSize);
        }
        if !(1..=16).contains(&self.num_filters) {
            return Err(ExtractError::InvalidFilterCount {
                num_filters: self.num_filters,
            });
        }
        let effective = self.effective_filter_size();
        if !bank.supports(effective, self.num_filters) {
            return Err(ExtractError::UnsupportedConfiguration {
                filter_size: effective,
                num_filters: self.num_filters,
            });
        }
        Ok(())
    }
}

/// Per-run result counters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractionSummary {
    /// Number of histograms written.
    pub images: usize,
    /// Bins per histogram.
    pub bins: usize,
    /// Name of the store the run wrote to.
    pub store_name: String,
}

/// Runs a batch extraction into a file store.
///
/// The store is created up front (truncating any previous run with the
/// same name) and closed exactly once on every exit path. On error the
/// store keeps the entries written before the failure.
pub fn extract(
    request: &ExtractionRequest,
    bank: &impl FilterBank,
) -> Result<ExtractionSummary, ExtractError> {
    request.validate(bank)?;
    let extractor = build_extractor(request, bank)?;
    let store_name = request.store_name();
    tracing::info!(
        store = %store_name,
        images = request.file_names.len(),
        segmentation = %request.segmentation,
        "Starting extraction run"
    );

    let mut store = FileStore::create(&request.out_dir, &store_name)?;
    let result = write_entries(request, &extractor, &mut store);
    match result {
        Ok(images) => {
            store.finish()?;
            tracing::info!(store = %store_name, images = images, "Extraction run finished");
            Ok(ExtractionSummary {
                images,
                bins: extractor.bins(),
                store_name,
            })
        }
        Err(error) => {
            // Keep whatever was written; the failure itself is what the
            // caller sees.
            if let Err(close_error) = store.finish() {
                tracing::warn!(error = %close_error, "Store close failed after extraction error");
            }
            Err(error)
        }
    }
}

/// Runs a batch extraction into a caller-provided sink.
///
/// The sink is borrowed, so its lifecycle (and `finish`) stays with the
/// caller.
pub fn extract_with<S: HistogramSink>(
    request: &ExtractionRequest,
    bank: &impl FilterBank,
    sink: &mut S,
) -> Result<ExtractionSummary, ExtractError> {
    request.validate(bank)?;
    let extractor = build_extractor(request, bank)?;
    let images = write_entries(request, &extractor, sink)?;
    Ok(ExtractionSummary {
        images,
        bins: extractor.bins(),
        store_name: request.store_name(),
    })
}

fn build_extractor(
    request: &ExtractionRequest,
    bank: &impl FilterBank,
) -> Result<BsifExtractor, ExtractError> {
    let kernels = bank.resolve(request.effective_filter_size(), request.num_filters)?;
    Ok(BsifExtractor::new(kernels))
}

fn write_entries<S: HistogramSink>(
    request: &ExtractionRequest,
    extractor: &BsifExtractor,
    sink: &mut S,
) -> Result<usize, ExtractError> {
    if request.file_names.is_empty() {
        tracing::warn!("Extraction request lists no input files");
    }
    let crop_region = request.segmentation.crop_region();
    let downsample = request.needs_downsample();

    let mut images = 0;
    for file in &request.file_names {
        let path = request.image_dir.join(file);
        let full = load_gray(&path).map_err(|source| ExtractError::Input {
            file: file.clone(),
            source,
        })?;
        let image = match crop_region {
            Some(region) => {
                full.crop(&region)
                    .ok_or_else(|| ExtractError::RegionOutOfBounds {
                        file: file.clone(),
                        width: full.width(),
                        height: full.height(),
                    })?
            }
            None => full,
        };
        let image = if downsample { blur_halve(&image) } else { image };

        let histogram = extractor.histogram(&image);
        sink.put(file, &histogram)?;
        images += 1;
        tracing::debug!(
            file = %file,
            index = images,
            total = request.file_names.len(),
            "Extracted histogram"
        );
    }
    Ok(images)
}
