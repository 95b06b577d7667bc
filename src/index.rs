//! Index rows and the reader used by downstream consumers.

use crate::error::{IndexError, Result};
use crate::streaming::parsing::parse_index_row;
use std::fmt;
use std::fs::File;
use std::io::{BufRead, BufReader, Read};
use std::path::Path;

/// One record of an offset index: where a sequence starts in the store and
/// how many residues it has.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct IndexRecord {
    pub id: String,
    pub offset: u64,
    pub length: u64,
}

impl IndexRecord {
    pub fn new(id: impl Into<String>, offset: u64, length: u64) -> Self {
        Self {
            id: id.into(),
            offset,
            length,
        }
    }

    /// Offset one past the last residue of this record, or `None` if it
    /// does not fit in a `u64`.
    #[inline]
    pub fn end(&self) -> Option<u64> {
        self.offset.checked_add(self.length)
    }
}

impl fmt::Display for IndexRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}\t{}\t{}", self.id, self.offset, self.length)
    }
}

/// A streaming reader over `identifier<TAB>offset<TAB>length` rows.
pub struct IndexReader<R: Read> {
    reader: BufReader<R>,
    line_number: usize,
    buffer: Vec<u8>,
}

impl IndexReader<File> {
    /// Open an index file from a path.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|e| IndexError::input(path, e))?;
        Ok(Self::new(file))
    }
}

impl<R: Read> IndexReader<R> {
    pub fn new(reader: R) -> Self {
        Self {
            reader: BufReader::new(reader),
            line_number: 0,
            buffer: Vec::with_capacity(128),
        }
    }

    /// Read the next row, skipping blank lines.
    pub fn read_record(&mut self) -> Result<Option<IndexRecord>> {
        loop {
            self.buffer.clear();
            let bytes_read = self.reader.read_until(b'\n', &mut self.buffer)?;
            if bytes_read == 0 {
                return Ok(None);
            }
            self.line_number += 1;

            if self.buffer.trim_ascii().is_empty() {
                continue;
            }

            return self.parse_row().map(Some);
        }
    }

    fn parse_row(&self) -> Result<IndexRecord> {
        let (id, offset, length) =
            parse_index_row(&self.buffer).ok_or_else(|| IndexError::MalformedIndexRow {
                line: self.line_number,
                message: format!(
                    "expected identifier<TAB>offset<TAB>length, got '{}'",
                    String::from_utf8_lossy(self.buffer.trim_ascii_end())
                ),
            })?;
        let id = std::str::from_utf8(id).map_err(|_| IndexError::MalformedIndexRow {
            line: self.line_number,
            message: "identifier is not valid UTF-8".to_string(),
        })?;
        Ok(IndexRecord::new(id, offset, length))
    }

    /// Get an iterator over all rows.
    pub fn records(self) -> IndexRecordIter<R> {
        IndexRecordIter { reader: self }
    }
}

/// Iterator over index rows.
pub struct IndexRecordIter<R: Read> {
    reader: IndexReader<R>,
}

impl<R: Read> Iterator for IndexRecordIter<R> {
    type Item = Result<IndexRecord>;

    fn next(&mut self) -> Option<Self::Item> {
        self.reader.read_record().transpose()
    }
}

/// Read all rows of an index file.
pub fn read_index<P: AsRef<Path>>(path: P) -> Result<Vec<IndexRecord>> {
    IndexReader::from_path(path)?.records().collect()
}

/// Parse index rows from a string.
pub fn parse_index(content: &str) -> Result<Vec<IndexRecord>> {
    IndexReader::new(content.as_bytes()).records().collect()
}

/// Inline validator for the offset chain of an index.
///
/// Checks that the first record starts at 0 and each record starts where
/// the previous one ended.
#[derive(Debug, Default)]
pub struct OffsetValidator {
    expected_offset: u64,
    record_count: usize,
}

impl OffsetValidator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Validate the next record in index order.
    #[inline]
    pub fn validate(&mut self, record: &IndexRecord) -> Result<()> {
        self.record_count += 1;
        if record.offset != self.expected_offset {
            return Err(IndexError::MalformedIndexRow {
                line: self.record_count,
                message: format!(
                    "record '{}' starts at offset {} but previous record ends at {}",
                    record.id, record.offset, self.expected_offset
                ),
            });
        }
        self.expected_offset = record.end().ok_or_else(|| IndexError::MalformedIndexRow {
            line: self.record_count,
            message: format!(
                "record '{}' at offset {} with length {} ends past the largest offset",
                record.id, record.offset, record.length
            ),
        })?;
        Ok(())
    }

    /// Total residues covered by the records seen so far.
    #[inline]
    pub fn total_length(&self) -> u64 {
        self.expected_offset
    }
}

/// Verify the offset chain of a full index.
pub fn verify_contiguous(records: &[IndexRecord]) -> Result<u64> {
    let mut validator = OffsetValidator::new();
    for record in records {
        validator.validate(record)?;
    }
    Ok(validator.total_length())
}
