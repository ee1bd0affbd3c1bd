//! File-backed histogram store.
//!
//! A store is a single JSON Lines file: one `{"name", "counts"}` object
//! per line, flushed after every entry so a crash mid-run loses at most
//! the entry being written. Creating a store truncates any previous
//! file of the same name, and reads resolve duplicate names by keeping
//! the last occurrence.

use std::collections::BTreeMap;
use std::fs::{self, File};
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::bsif::Histogram;
use crate::store::{HistogramSink, StoreError};

/// Location of the store file for `name` under `dir`.
pub fn store_path(dir: &Path, name: &str) -> PathBuf {
    dir.join(format!("{name}.jsonl"))
}

#[derive(Serialize)]
struct EntryRef<'a> {
    name: &'a str,
    counts: &'a [u64],
}

#[derive(Deserialize)]
struct Entry {
    name: String,
    counts: Vec<u64>,
}

/// Append-only JSON Lines histogram store.
pub struct FileStore {
    path: PathBuf,
    writer: BufWriter<File>,
    entries: u64,
}

impl FileStore {
    /// Creates (or truncates) the store file `{name}.jsonl` under
    /// `dir`, creating the directory if needed.
    pub fn create(dir: &Path, name: &str) -> Result<Self, StoreError> {
        let path = store_path(dir, name);
        fs::create_dir_all(dir).map_err(|source| StoreError::Create {
            path: path.clone(),
            source,
        })?;
        let file = File::create(&path).map_err(|source| StoreError::Create {
            path: path.clone(),
            source,
        })?;
        Ok(Self {
            path,
            writer: BufWriter::new(file),
            entries: 0,
        })
    }

    /// Path of the backing file.
    #[inline]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Number of entries written so far.
    #[inline]
    pub fn entries(&self) -> u64 {
        self.entries
    }
}

impl HistogramSink for FileStore {
    fn put(&mut self, name: &str, histogram: &Histogram) -> Result<(), StoreError> {
        let record = EntryRef {
            name,
            counts: histogram.counts(),
        };
        serde_json::to_writer(&mut self.writer, &record).map_err(|source| StoreError::Write {
            name: name.to_owned(),
            source: source.into(),
        })?;
        self.writer
            .write_all(b"\n")
            .and_then(|()| self.writer.flush())
            .map_err(|source| StoreError::Write {
                name: name.to_owned(),
                source,
            })?;
        self.entries += 1;
        Ok(())
    }

    fn finish(mut self) -> Result<(), StoreError> {
        self.writer.flush().map_err(|source| StoreError::Flush {
            path: self.path.clone(),
            source,
        })
    }
}

impl Drop for FileStore {
    fn drop(&mut self) {
        // Backstop for sinks abandoned without finish.
        if let Err(error) = self.writer.flush() {
            tracing::warn!(
                path = %self.path.display(),
                error = %error,
                "Store flush failed on drop"
            );
        }
    }
}

impl std::fmt::Debug for FileStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FileStore")
            .field("path", &self.path)
            .field("entries", &self.entries)
            .finish()
    }
}

/// Read-only view of a finished store file.
#[derive(Debug, Clone)]
pub struct StoreReader {
    path: PathBuf,
    entries: BTreeMap<String, Vec<u64>>,
}

impl StoreReader {
    /// Loads every entry of the store `{name}.jsonl` under `dir`.
    pub fn open(dir: &Path, name: &str) -> Result<Self, StoreError> {
        let path = store_path(dir, name);
        let file = File::open(&path).map_err(|source| StoreError::Open {
            path: path.clone(),
            source,
        })?;

        let mut entries = BTreeMap::new();
        for (index, line) in BufReader::new(file).lines().enumerate() {
            let line = line.map_err(|source| StoreError::Open {
                path: path.clone(),
                source,
            })?;
            if line.trim().is_empty() {
                continue;
            }
            let entry: Entry =
                serde_json::from_str(&line).map_err(|source| StoreError::Parse {
                    path: path.clone(),
                    line: index + 1,
                    source,
                })?;
            entries.insert(entry.name, entry.counts);
        }
        Ok(Self { path, entries })
    }

    /// Path of the backing file.
    #[inline]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Returns the counts stored under `name`.
    pub fn get(&self, name: &str) -> Option<&[u64]> {
        self.entries.get(name).map(Vec::as_slice)
    }

    /// Iterates entry names in sorted order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    /// Iterates `(name, counts)` pairs in sorted name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[u64])> {
        self.entries
            .iter()
            .map(|(name, counts)| (name.as_str(), counts.as_slice()))
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

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bank::{FilterBank, SyntheticBank};
    use crate::bsif::BsifExtractor;
    use crate::image::GrayImage;

    fn temp_dir(tag: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("bsif-store-{tag}-{}", std::process::id()));
        fs::create_dir_all(&dir).unwrap();
        dir
    }

    /// Histogram over a 4x2 constant image: 8 pixels, all in the first
    /// bin for value 0 or all in the last bin otherwise.
    fn sample_histogram(value: u8) -> Histogram {
        let kernels = SyntheticBank::center_spike().resolve(3, 3).unwrap();
        BsifExtractor::new(kernels).histogram(&GrayImage::filled(4, 2, value))
    }

    #[test]
    fn test_put_writes_one_line_per_entry() {
        let dir = temp_dir("lines");
        let mut store = FileStore::create(&dir, "features").unwrap();
        store.put("a.png", &sample_histogram(0)).unwrap();
        store.put("b.png", &sample_histogram(128)).unwrap();
        assert_eq!(store.entries(), 2);
        store.finish().unwrap();

        let contents = fs::read_to_string(store_path(&dir, "features")).unwrap();
        let lines: Vec<&str> = contents.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].contains("\"a.png\""));
        assert!(lines[1].contains("\"b.png\""));

        fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_reader_round_trip() {
        let dir = temp_dir("round-trip");
        let mut store = FileStore::create(&dir, "features").unwrap();
        store.put("dark.png", &sample_histogram(0)).unwrap();
        store.put("bright.png", &sample_histogram(200)).unwrap();
        store.finish().unwrap();

        let reader = StoreReader::open(&dir, "features").unwrap();
        assert_eq!(reader.len(), 2);
        let dark = reader.get("dark.png").unwrap();
        assert_eq!(dark.len(), 8);
        assert_eq!(dark[0], 8);
        let bright = reader.get("bright.png").unwrap();
        assert_eq!(bright[7], 8);
        assert!(reader.get("missing.png").is_none());

        fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_create_truncates_previous_store() {
        let dir = temp_dir("truncate");
        let mut store = FileStore::create(&dir, "features").unwrap();
        store.put("old.png", &sample_histogram(0)).unwrap();
        store.finish().unwrap();

        let store = FileStore::create(&dir, "features").unwrap();
        store.finish().unwrap();

        let reader = StoreReader::open(&dir, "features").unwrap();
        assert!(reader.is_empty());

        fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_duplicate_names_keep_last_entry() {
        let dir = temp_dir("duplicate");
        let mut store = FileStore::create(&dir, "features").unwrap();
        store.put("same.png", &sample_histogram(0)).unwrap();
        store.put("same.png", &sample_histogram(128)).unwrap();
        store.finish().unwrap();

        let reader = StoreReader::open(&dir, "features").unwrap();
        assert_eq!(reader.len(), 1);
        assert_eq!(reader.get("same.png").unwrap()[7], 8);

        fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_open_missing_store_fails() {
        let dir = temp_dir("missing");
        assert!(matches!(
            StoreReader::open(&dir, "absent"),
            Err(StoreError::Open { .. })
        ));
        fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_corrupt_line_reports_position() {
        let dir = temp_dir("corrupt");
        let mut store = FileStore::create(&dir, "features").unwrap();
        store.put("good.png", &sample_histogram(0)).unwrap();
        store.finish().unwrap();

        let path = store_path(&dir, "features");
        let mut contents = fs::read_to_string(&path).unwrap();
        contents.push_str("not json\n");
        fs::write(&path, contents).unwrap();

        let result = StoreReader::open(&dir, "features");
        assert!(matches!(result, Err(StoreError::Parse { line: 2, .. })));

        fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_create_makes_missing_directories() {
        let dir = temp_dir("nested").join("deep/run");
        let store = FileStore::create(&dir, "features").unwrap();
        assert!(store.path().exists());
        store.finish().unwrap();
        fs::remove_dir_all(std::env::temp_dir().join(format!(
            "bsif-store-nested-{}",
            std::process::id()
        )))
        .unwrap();
    }
}
