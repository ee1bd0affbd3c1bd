//! Histogram persistence.
//!
//! Extraction runs write one named histogram per input image into a
//! store. The production backend ([`FileStore`]) appends JSON Lines to
//! a file and is read back with [`StoreReader`]; [`MemoryStore`] keeps
//! entries in memory for in-process use and tests.

pub mod file;
pub mod memory;

use std::path::PathBuf;

use thiserror::Error;

use crate::bsif::Histogram;

pub use file::{FileStore, StoreReader};
pub use memory::MemoryStore;

/// Errors raised by histogram stores.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The store file could not be created.
    #[error("failed to create store {}: {source}", .path.display())]
    Create {
        /// Path of the store file.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },
    /// An entry could not be serialized or written.
    #[error("failed to write entry {name}: {source}")]
    Write {
        /// Name of the entry being written.
        name: String,
        /// Underlying serialization or I/O error.
        source: std::io::Error,
    },
    /// Buffered data could not be flushed to the file.
    #[error("failed to flush store {}: {source}", .path.display())]
    Flush {
        /// Path of the store file.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },
    /// The store file could not be opened for reading.
    #[error("failed to open store {}: {source}", .path.display())]
    Open {
        /// Path of the store file.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },
    /// A stored line did not parse as an entry.
    #[error("corrupt entry at {}:{line}: {source}", .path.display())]
    Parse {
        /// Path of the store file.
        path: PathBuf,
        /// One-based line number of the corrupt entry.
        line: usize,
        /// Underlying parse error.
        source: serde_json::Error,
    },
}

/// A destination for named histograms.
///
/// Implementations follow a create, put, finish lifecycle: entries are
/// written with [`put`](HistogramSink::put) and the sink is closed
/// exactly once with [`finish`](HistogramSink::finish), which consumes
/// it. Dropping a sink without finishing still releases its resources,
/// but only `finish` reports close-time failures.
pub trait HistogramSink {
    /// Writes one histogram under `name`.
    fn put(&mut self, name: &str, histogram: &Histogram) -> Result<(), StoreError>;

    /// Closes the sink, surfacing any pending write failure.
    fn finish(self) -> Result<(), StoreError>
    where
        Self: Sized;
}
