//! In-memory histogram store.

use std::collections::BTreeMap;

use crate::bsif::Histogram;
use crate::store::{HistogramSink, StoreError};

/// Histogram sink that keeps entries in memory.
///
/// Useful when extraction feeds a downstream consumer directly, and as
/// a stand-in for the file backend in tests. Duplicate names keep the
/// last entry, matching the file backend's read semantics.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: BTreeMap<String, Vec<u64>>,
}

impl MemoryStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the counts stored under `name`.
    pub fn get(&self, name: &str) -> Option<&[u64]> {
        self.entries.get(name).map(Vec::as_slice)
    }

    /// Iterates entry names in sorted order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    /// Number of distinct entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if the store holds no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl HistogramSink for MemoryStore {
    fn put(&mut self, name: &str, histogram: &Histogram) -> Result<(), StoreError> {
        self.entries
            .insert(name.to_owned(), histogram.counts().to_vec());
        Ok(())
    }

    fn finish(self) -> Result<(), StoreError> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bank::{FilterBank, SyntheticBank};
    use crate::bsif::BsifExtractor;
    use crate::image::GrayImage;

    #[test]
    fn test_put_and_get() {
        let kernels = SyntheticBank::center_spike().resolve(3, 2).unwrap();
        let extractor = BsifExtractor::new(kernels);
        let histogram = extractor.histogram(&GrayImage::filled(3, 3, 0));

        let mut store = MemoryStore::new();
        assert!(store.is_empty());
        store.put("one.png", &histogram).unwrap();
        assert_eq!(store.len(), 1);
        assert_eq!(store.get("one.png").unwrap(), &[9, 0, 0, 0]);
        assert!(store.get("two.png").is_none());
    }

    #[test]
    fn test_duplicate_names_keep_last_entry() {
        let kernels = SyntheticBank::center_spike().resolve(3, 2).unwrap();
        let extractor = BsifExtractor::new(kernels);
        let dark = extractor.histogram(&GrayImage::filled(2, 2, 0));
        let bright = extractor.histogram(&GrayImage::filled(2, 2, 255));

        let mut store = MemoryStore::new();
        store.put("img.png", &dark).unwrap();
        store.put("img.png", &bright).unwrap();
        assert_eq!(store.len(), 1);
        assert_eq!(store.get("img.png").unwrap(), &[0, 0, 0, 4]);
    }
}
