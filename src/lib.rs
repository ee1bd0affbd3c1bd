//! BSIF Feature Extraction Library
//!
//! Binarized Statistical Image Features (BSIF) for texture
//! classification pipelines, built for presentation-attack detection on
//! eye imagery. Each image is reduced to a histogram of per-pixel
//! binary codes obtained by thresholding the responses of a bank of
//! learned linear filters.
//!
//! # Architecture
//!
//! The system follows an explicit data flow:
//!
//! ```text
//! image → segmentation → downsample → bsif → store → dataset
//!                                       ↑
//!                                 bank (kernels)
//! ```
//!
//! # Design Principles
//!
//! - **Fixed-range histograms**: The bin layout depends only on the
//!   filter count, so vectors from different images always align
//! - **Injectable filter banks**: Trained coefficient tables on disk
//!   and synthetic kernels sit behind the same trait
//! - **Deterministic**: The same input and configuration always produce
//!   the same store, entry for entry
//! - **Fail-fast configuration**: Unsupported filter combinations abort
//!   before any image or store I/O
//!
//! # Example
//!
//! ```no_run
//! use bsif_features::{
//!     bank::FileFilterBank,
//!     batch::{extract, ExtractionRequest, SegmentationKind},
//! };
//!
//! let bank = FileFilterBank::new("texturefilters");
//! let request = ExtractionRequest {
//!     image_dir: "images".into(),
//!     file_names: vec!["eye_001.png".into(), "eye_002.png".into()],
//!     out_dir: "features".into(),
//!     out_name: "demo".into(),
//!     segmentation: SegmentationKind::WholeImage,
//!     filter_size: 7,
//!     num_filters: 8,
//! };
//!
//! let summary = extract(&request, &bank).unwrap();
//! println!(
//!     "wrote {} histograms of {} bins to {}",
//!     summary.images, summary.bins, summary.store_name
//! );
//! ```

#![warn(missing_docs)]
#![warn(rust_2018_idioms)]
#![deny(unsafe_code)]

pub mod bank;
pub mod batch;
pub mod bsif;
pub mod config;
pub mod dataset;
pub mod image;
pub mod store;

// Re-export commonly used types at crate root
pub use bank::{FileFilterBank, FilterBank, Kernel, SyntheticBank};
pub use batch::{
    extract, extract_with, ExtractError, ExtractionRequest, ExtractionSummary, SegmentationKind,
};
pub use bsif::{BsifExtractor, CodeImage, Histogram};
pub use config::{ConfigError, FilterJob, RunConfig};
pub use dataset::{load_split, z_score, LabeledSample};
pub use store::{FileStore, HistogramSink, MemoryStore, StoreReader};

pub use self::image::{load_gray, GrayImage, Region};

/// Library version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
