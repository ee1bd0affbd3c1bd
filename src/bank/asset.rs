//! Filter bank backed by pre-trained coefficient tables on disk.
//!
//! Each configuration lives in its own file under the bank directory,
//! named `filter_{S}x{S}_{N}bit.f64` and holding the flat interleaved
//! coefficient table as little-endian 64-bit floats. The shipped
//! catalog covers odd sizes 3 through 17, with 5 to 8 filters at size 3
//! and 5 to 12 filters at every larger size.

use std::fs;
use std::path::{Path, PathBuf};

use crate::bank::kernel::{kernels_from_flat, Kernel};
use crate::bank::{BankError, FilterBank};

/// Returns true if the shipped kernel catalog covers a configuration.
pub fn catalog_supports(filter_size: usize, num_filters: usize) -> bool {
    let size_known = matches!(filter_size, 3 | 5 | 7 | 9 | 11 | 13 | 15 | 17);
    let count_known = match filter_size {
        3 => (5..=8).contains(&num_filters),
        _ => (5..=12).contains(&num_filters),
    };
    size_known && count_known
}

/// File name of the coefficient table for a configuration.
pub fn table_file_name(filter_size: usize, num_filters: usize) -> String {
    format!("filter_{filter_size}x{filter_size}_{num_filters}bit.f64")
}

/// Filter bank that loads coefficient tables from a directory.
#[derive(Debug, Clone)]
pub struct FileFilterBank {
    dir: PathBuf,
}

impl FileFilterBank {
    /// Creates a bank rooted at `dir`. No I/O happens until kernels are
    /// resolved.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Directory holding the coefficient tables.
    #[inline]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn table_path(&self, filter_size: usize, num_filters: usize) -> PathBuf {
        self.dir.join(table_file_name(filter_size, num_filters))
    }
}

impl FilterBank for FileFilterBank {
    fn supports(&self, filter_size: usize, num_filters: usize) -> bool {
        catalog_supports(filter_size, num_filters)
    }

    fn resolve(&self, filter_size: usize, num_filters: usize) -> Result<Vec<Kernel>, BankError> {
        if !catalog_supports(filter_size, num_filters) {
            return Err(BankError::UnknownConfiguration {
                filter_size,
                num_filters,
            });
        }

        let path = self.table_path(filter_size, num_filters);
        let bytes = fs::read(&path).map_err(|source| BankError::Io {
            path: path.clone(),
            source,
        })?;

        let expected = filter_size * filter_size * num_filters;
        if bytes.len() != expected * 8 {
            return Err(BankError::TableSize {
                path,
                expected,
                actual: bytes.len() / 8,
            });
        }

        let table: Vec<f64> = bytes
            .chunks_exact(8)
            .map(|chunk| {
                let mut raw = [0u8; 8];
                raw.copy_from_slice(chunk);
                f64::from_le_bytes(raw)
            })
            .collect();

        kernels_from_flat(&table, filter_size, num_filters).ok_or(BankError::TableSize {
            path,
            expected,
            actual: table.len(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bank::kernel::flat_index;

    fn temp_bank(tag: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("bsif-bank-{tag}-{}", std::process::id()));
        fs::create_dir_all(&dir).unwrap();
        dir
    }

    fn write_table(dir: &Path, filter_size: usize, num_filters: usize, table: &[f64]) {
        let mut bytes = Vec::with_capacity(table.len() * 8);
        for value in table {
            bytes.extend_from_slice(&value.to_le_bytes());
        }
        fs::write(dir.join(table_file_name(filter_size, num_filters)), bytes).unwrap();
    }

    #[test]
    fn test_catalog_bounds() {
        assert!(catalog_supports(3, 5));
        assert!(catalog_supports(3, 8));
        assert!(!catalog_supports(3, 9));
        assert!(catalog_supports(5, 12));
        assert!(catalog_supports(17, 5));
        assert!(!catalog_supports(17, 13));
        assert!(!catalog_supports(4, 6));
        assert!(!catalog_supports(19, 6));
        assert!(!catalog_supports(7, 4));
    }

    #[test]
    fn test_resolve_unknown_configuration() {
        let bank = FileFilterBank::new("/nonexistent");
        let result = bank.resolve(4, 6);
        assert!(matches!(
            result,
            Err(BankError::UnknownConfiguration {
                filter_size: 4,
                num_filters: 6
            })
        ));
    }

    #[test]
    fn test_resolve_missing_table_is_io_error() {
        let dir = temp_bank("missing");
        let bank = FileFilterBank::new(&dir);
        assert!(matches!(bank.resolve(3, 5), Err(BankError::Io { .. })));
        fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_resolve_reads_interleaved_table() {
        let dir = temp_bank("read");
        let filter_size = 3;
        let num_filters = 5;
        let mut table = vec![0.0; filter_size * filter_size * num_filters];
        for row in 0..filter_size {
            for col in 0..filter_size {
                for filter_index in 0..num_filters {
                    table[flat_index(filter_size, num_filters, row, col, filter_index)] =
                        (filter_index * 100 + row * 10 + col) as f64;
                }
            }
        }
        write_table(&dir, filter_size, num_filters, &table);

        let bank = FileFilterBank::new(&dir);
        let kernels = bank.resolve(filter_size, num_filters).unwrap();
        assert_eq!(kernels.len(), 5);
        for (filter_index, kernel) in kernels.iter().enumerate() {
            assert_eq!(kernel.size(), 3);
            assert_eq!(kernel.get(0, 0), (filter_index * 100) as f64);
            assert_eq!(kernel.get(2, 1), (filter_index * 100 + 21) as f64);
        }

        fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_resolve_rejects_truncated_table() {
        let dir = temp_bank("truncated");
        write_table(&dir, 3, 5, &[1.0; 10]);

        let bank = FileFilterBank::new(&dir);
        let result = bank.resolve(3, 5);
        assert!(matches!(
            result,
            Err(BankError::TableSize {
                expected: 45,
                actual: 10,
                ..
            })
        ));

        fs::remove_dir_all(&dir).unwrap();
    }
}
