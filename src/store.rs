//! Random-access reads from a sequence store.
//!
//! The store is memory-mapped; each record is a `(offset, length)` slice.

use crate::error::{IndexError, Result};
use crate::index::{read_index, IndexRecord};
use memmap2::Mmap;
use rustc_hash::FxHashMap;
use std::fs::File;
use std::path::Path;

/// Backing bytes of a store.
enum StoreData {
    Mapped(Mmap),
    // Zero-length files cannot be mapped on every platform
    Empty,
}

/// A sequence store paired with its offset index.
pub struct SequenceStore {
    data: StoreData,
    records: Vec<IndexRecord>,
    by_id: FxHashMap<String, usize>,
}

impl SequenceStore {
    /// Open an index file and its store.
    pub fn open<P: AsRef<Path>, Q: AsRef<Path>>(index_path: P, store_path: Q) -> Result<Self> {
        let records = read_index(index_path)?;
        let store_path = store_path.as_ref();
        let file = File::open(store_path).map_err(|e| IndexError::input(store_path, e))?;
        let len = file
            .metadata()
            .map_err(|e| IndexError::input(store_path, e))?
            .len();
        let data = if len == 0 {
            StoreData::Empty
        } else {
            // SAFETY: the store is treated as read-only; concurrent writers
            // to the same store are unsupported.
            let mmap = unsafe { Mmap::map(&file) }.map_err(|e| IndexError::input(store_path, e))?;
            StoreData::Mapped(mmap)
        };
        Self::from_parts(data, records)
    }

    fn from_parts(data: StoreData, records: Vec<IndexRecord>) -> Result<Self> {
        let store_len = match &data {
            StoreData::Mapped(m) => m.len() as u64,
            StoreData::Empty => 0,
        };
        let mut by_id = FxHashMap::default();
        for (i, record) in records.iter().enumerate() {
            let in_bounds = record.end().is_some_and(|end| end <= store_len);
            if !in_bounds {
                return Err(IndexError::MalformedIndexRow {
                    line: i + 1,
                    message: format!(
                        "record '{}' at offset {} with length {} runs past the {} bytes of the store",
                        record.id, record.offset, record.length, store_len
                    ),
                });
            }
            // First occurrence wins for duplicate identifiers
            by_id.entry(record.id.clone()).or_insert(i);
        }
        Ok(Self {
            data,
            records,
            by_id,
        })
    }

    fn bytes(&self) -> &[u8] {
        match &self.data {
            StoreData::Mapped(m) => &m[..],
            StoreData::Empty => &[],
        }
    }

    pub fn records(&self) -> &[IndexRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Residues of record `i` in index order.
    pub fn get(&self, i: usize) -> Option<&[u8]> {
        let record = self.records.get(i)?;
        let end = record.end()?;
        self.bytes().get(record.offset as usize..end as usize)
    }

    /// Residues of the first record named `id`.
    pub fn fetch(&self, id: &str) -> Result<&[u8]> {
        let i = *self
            .by_id
            .get(id)
            .ok_or_else(|| IndexError::UnknownIdentifier(id.to_string()))?;
        // Bounds were checked in from_parts
        Ok(self.get(i).unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn write_pair(index: &str, store: &str) -> (NamedTempFile, NamedTempFile) {
        let mut idx = NamedTempFile::new().unwrap();
        idx.write_all(index.as_bytes()).unwrap();
        let mut seq = NamedTempFile::new().unwrap();
        seq.write_all(store.as_bytes()).unwrap();
        (idx, seq)
    }

    #[test]
    fn test_fetch_by_id_and_position() {
        let (idx, seq) = write_pair("r1\t0\t6\nr2\t6\t2\n", "ACGTACTT");
        let store = SequenceStore::open(idx.path(), seq.path()).unwrap();
        assert_eq!(store.len(), 2);
        assert_eq!(store.fetch("r1").unwrap(), b"ACGTAC");
        assert_eq!(store.fetch("r2").unwrap(), b"TT");
        assert_eq!(store.get(1), Some(&b"TT"[..]));
        assert_eq!(store.get(2), None);
        assert!(matches!(
            store.fetch("r3"),
            Err(IndexError::UnknownIdentifier(_))
        ));
    }

    #[test]
    fn test_empty_store() {
        let (idx, seq) = write_pair("", "");
        let store = SequenceStore::open(idx.path(), seq.path()).unwrap();
        assert!(store.is_empty());
    }

    #[test]
    fn test_zero_length_record_in_empty_store() {
        let (idx, seq) = write_pair("r1\t0\t0\n", "");
        let store = SequenceStore::open(idx.path(), seq.path()).unwrap();
        assert_eq!(store.fetch("r1").unwrap(), b"");
    }

    #[test]
    fn test_index_row_end_overflows() {
        let (idx, seq) = write_pair("r1\t0\t4\nr\t18446744073709551615\t1\n", "ACGT");
        assert!(matches!(
            SequenceStore::open(idx.path(), seq.path()),
            Err(IndexError::MalformedIndexRow { line: 2, .. })
        ));
    }

    #[test]
    fn test_index_past_end_of_store() {
        let (idx, seq) = write_pair("r1\t0\t9\n", "ACGT");
        assert!(matches!(
            SequenceStore::open(idx.path(), seq.path()),
            Err(IndexError::MalformedIndexRow { line: 1, .. })
        ));
    }
}
