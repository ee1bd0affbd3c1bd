//! Run configuration.
//!
//! A run is described by one TOML file: where the images and split
//! files live, where stores are written, and which filter
//! configurations to extract. Every job in a file shares the input set
//! and segmentation, matching how feature grids are swept in practice.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::bank::catalog_supports;
use crate::batch::{effective_filter_size, ExtractionRequest, SegmentationKind};

/// Input image set configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct InputConfig {
    /// Directory holding the input images.
    pub image_dir: PathBuf,
    /// Directory holding the CSV split files.
    pub split_dir: PathBuf,
    /// Training split file name, relative to `split_dir`.
    pub train_split: Option<String>,
    /// Testing split file name, relative to `split_dir`.
    pub test_split: Option<String>,
    /// Explicit image file names. When non-empty, splits are ignored.
    pub files: Vec<String>,
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            image_dir: PathBuf::from("."),
            split_dir: PathBuf::from("."),
            train_split: None,
            test_split: None,
            files: Vec::new(),
        }
    }
}

impl InputConfig {
    /// Paths of the configured split files, training first.
    pub fn split_paths(&self) -> Vec<PathBuf> {
        [self.train_split.as_ref(), self.test_split.as_ref()]
            .into_iter()
            .flatten()
            .map(|name| self.split_dir.join(name))
            .collect()
    }
}

/// Output store configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Directory the store files are written into.
    pub dir: PathBuf,
    /// Leading component of every store name.
    pub name: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("."),
            name: "bsif".to_owned(),
        }
    }
}

/// One filter configuration to extract.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterJob {
    /// Requested kernel side length.
    pub filter_size: usize,
    /// Number of filters.
    pub num_filters: usize,
}

/// Extraction configuration shared by all jobs of a run.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractionConfig {
    /// Crop mode applied to every input.
    pub segmentation: SegmentationKind,
    /// Directory holding the filter bank coefficient tables.
    pub filter_dir: PathBuf,
    /// Filter configurations to run, one store each.
    pub jobs: Vec<FilterJob>,
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            segmentation: SegmentationKind::WholeImage,
            filter_dir: PathBuf::from("texturefilters"),
            jobs: Vec::new(),
        }
    }
}

/// Full configuration file format.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct RunConfig {
    /// Input image set.
    #[serde(default)]
    pub input: InputConfig,
    /// Output store location.
    #[serde(default)]
    pub output: OutputConfig,
    /// Extraction jobs and filter assets.
    #[serde(default)]
    pub extraction: ExtractionConfig,
}

impl RunConfig {
    /// Loads and validates a configuration from a TOML file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path.as_ref())
            .map_err(|e| ConfigError::FileReadError(e.to_string()))?;
        let config: RunConfig =
            toml::from_str(&content).map_err(|e| ConfigError::ParseError(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Validates the configuration without touching the filesystem.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.extraction.jobs.is_empty() {
            return Err(ConfigError::NoJobs);
        }
        for job in &self.extraction.jobs {
            if job.filter_size == 0 {
                return Err(ConfigError::InvalidFilterSize);
            }
            if !(1..=16).contains(&job.num_filters) {
                return Err(ConfigError::InvalidFilterCount(job.num_filters));
            }
            if !catalog_supports(effective_filter_size(job.filter_size), job.num_filters) {
                return Err(ConfigError::UnsupportedJob {
                    filter_size: job.filter_size,
                    num_filters: job.num_filters,
                });
            }
        }
        if self.input.files.is_empty()
            && self.input.train_split.is_none()
            && self.input.test_split.is_none()
        {
            return Err(ConfigError::NoInputFiles);
        }
        Ok(())
    }

    /// Builds the batch request for one job over the given file set.
    pub fn request(&self, job: FilterJob, file_names: Vec<String>) -> ExtractionRequest {
        ExtractionRequest {
            image_dir: self.input.image_dir.clone(),
            file_names,
            out_dir: self.output.dir.clone(),
            out_name: self.output.name.clone(),
            segmentation: self.extraction.segmentation,
            filter_size: job.filter_size,
            num_filters: job.num_filters,
        }
    }
}

/// Configuration validation errors.
#[derive(Debug, Clone, thiserror::Error)]
pub enum ConfigError {
    #[error("no filter jobs configured")]
    NoJobs,
    #[error("no input files or split files configured")]
    NoInputFiles,
    #[error("filter size must be positive")]
    InvalidFilterSize,
    #[error("filter count {0} outside supported range 1..=16")]
    InvalidFilterCount(usize),
    #[error("no filter bank entry for job {filter_size}x{filter_size} with {num_filters} filters")]
    UnsupportedJob {
        filter_size: usize,
        num_filters: usize,
    },
    #[error("failed to read config file: {0}")]
    FileReadError(String),
    #[error("failed to parse config file: {0}")]
    ParseError(String),
}
