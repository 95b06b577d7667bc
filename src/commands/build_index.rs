//! Streaming sequence offset indexer.
//!
//! Converts header-delimited sequence files into a random-access store:
//! an index of `identifier<TAB>offset<TAB>length` rows plus a blob of
//! concatenated residues.
//!
//! # Algorithm
//!
//! For each line of each source, in order:
//! 1. A header line closes the active record (emitting its row), advances
//!    the running offset by the record's length, and opens a new record
//!    named by the header's identifier. An empty identifier leaves no
//!    record open.
//! 2. A residue line is trimmed and, if a record is open, appended to the
//!    store. Residues outside any record are discarded.
//! 3. At end of source the active record is emitted.
//!
//! The running offset carries over between sources, so a manifest of files
//! produces one contiguous index and store.
//!
//! # Memory Complexity
//!
//! O(1) - only the active identifier and one line buffer are held.

use crate::config::IndexConfig;
use crate::error::{IndexError, Result};
use crate::source::{read_manifest, LineSource};
use crate::streaming::buffers::{DEFAULT_ID_BUFFER, DEFAULT_LINE_BUFFER};
use crate::streaming::output::{IndexWriter, RowLayout, StoreWriter};
use crate::streaming::parsing::{classify_line, LineKind};
use std::fmt;
use std::fs;
use std::io::{BufRead, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Statistics from an indexing run.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct IndexStats {
    pub sources: usize,
    pub records: u64,
    pub residues: u64,
    /// Residue lines seen while no record was open
    pub discarded_lines: u64,
}

impl fmt::Display for IndexStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Sources: {}, Records: {}, Residues: {}, Discarded lines: {}",
            self.sources, self.records, self.residues, self.discarded_lines
        )
    }
}

/// Running state of the indexer, shared across sources.
#[derive(Debug)]
struct RecordCursor {
    active: Option<Vec<u8>>,
    offset: u64,
    length: u64,
}

impl RecordCursor {
    fn new() -> Self {
        Self {
            active: None,
            offset: 0,
            length: 0,
        }
    }

    /// Emit the active record, if any, and advance the running offset.
    fn close<W: Write>(
        &mut self,
        index: &mut IndexWriter<W>,
        stats: &mut IndexStats,
        config: &IndexConfig,
    ) -> Result<()> {
        if let Some(id) = self.active.take() {
            index.write_row(&id, self.offset, self.length)?;
            stats.records += 1;
            if config.progress_due(stats.records) {
                info!(records = stats.records, offset = self.offset, "indexing");
            }
        }
        self.offset += self.length;
        self.length = 0;
        Ok(())
    }

    fn open(&mut self, id: &[u8]) {
        if id.is_empty() {
            self.active = None;
        } else {
            let mut buf = Vec::with_capacity(DEFAULT_ID_BUFFER.max(id.len()));
            buf.extend_from_slice(id);
            self.active = Some(buf);
        }
    }
}

/// Build an offset index and sequence store from one or more sources.
#[derive(Debug, Clone, Default)]
pub struct BuildIndexCommand {
    pub config: IndexConfig,
}

impl BuildIndexCommand {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(mut self, config: IndexConfig) -> Self {
        self.config = config;
        self
    }

    /// Index a single sequence file.
    pub fn run<P, Q, S>(&self, input: P, index_path: Q, store_path: S) -> Result<IndexStats>
    where
        P: AsRef<Path>,
        Q: AsRef<Path>,
        S: AsRef<Path>,
    {
        self.run_many(&[input.as_ref().to_path_buf()], index_path, store_path)
    }

    /// Index every file listed in a manifest, in order, into one index and
    /// one store.
    pub fn run_manifest<P, Q, S>(
        &self,
        manifest: P,
        index_path: Q,
        store_path: S,
    ) -> Result<IndexStats>
    where
        P: AsRef<Path>,
        Q: AsRef<Path>,
        S: AsRef<Path>,
    {
        let inputs = read_manifest(manifest, self.config.input_buffer)?;
        self.run_many(&inputs, index_path, store_path)
    }

    /// Index `inputs` in order into one index and one store.
    ///
    /// Every input is checked for readability before any output is
    /// created. If an input fails mid-stream the outputs are removed.
    pub fn run_many<Q, S>(
        &self,
        inputs: &[PathBuf],
        index_path: Q,
        store_path: S,
    ) -> Result<IndexStats>
    where
        Q: AsRef<Path>,
        S: AsRef<Path>,
    {
        let index_path = index_path.as_ref();
        let store_path = store_path.as_ref();
        preflight(inputs, &self.config)?;

        let mut index =
            IndexWriter::create(index_path, RowLayout::OffsetLength, self.config.output_buffer)?;
        let mut store = StoreWriter::create(store_path, self.config.output_buffer)?;

        let result = self
            .index_paths(inputs, &mut index, Some(&mut store))
            .and_then(|stats| {
                index.flush()?;
                store.flush()?;
                Ok(stats)
            });

        if let Err(IndexError::InputUnavailable { .. }) = &result {
            drop(index);
            drop(store);
            let _ = fs::remove_file(index_path);
            let _ = fs::remove_file(store_path);
        }
        result
    }

    pub(crate) fn index_paths<W: Write, S: Write>(
        &self,
        inputs: &[PathBuf],
        index: &mut IndexWriter<W>,
        mut store: Option<&mut StoreWriter<S>>,
    ) -> Result<IndexStats> {
        let mut stats = IndexStats::default();
        let mut cursor = RecordCursor::new();
        for path in inputs {
            debug!(path = %path.display(), "indexing source");
            let mut source = LineSource::open(path, self.config.input_buffer)?;
            self.index_source(
                &mut source,
                path,
                &mut cursor,
                index,
                store.as_deref_mut(),
                &mut stats,
            )?;
            // Source is closed here, before the next one is opened
        }
        info!(%stats, "indexing finished");
        Ok(stats)
    }

    /// Index any buffered reader as a single source.
    ///
    /// `label` names the source in error messages.
    pub fn index_reader<R: BufRead, W: Write, S: Write>(
        &self,
        reader: &mut R,
        label: &Path,
        index: &mut IndexWriter<W>,
        store: Option<&mut StoreWriter<S>>,
    ) -> Result<IndexStats> {
        let mut stats = IndexStats::default();
        let mut cursor = RecordCursor::new();
        self.index_source(reader, label, &mut cursor, index, store, &mut stats)?;
        Ok(stats)
    }

    fn index_source<R: BufRead, W: Write, S: Write>(
        &self,
        reader: &mut R,
        label: &Path,
        cursor: &mut RecordCursor,
        index: &mut IndexWriter<W>,
        mut store: Option<&mut StoreWriter<S>>,
        stats: &mut IndexStats,
    ) -> Result<()> {
        let mut line = Vec::with_capacity(DEFAULT_LINE_BUFFER);
        loop {
            line.clear();
            let bytes_read = reader
                .read_until(b'\n', &mut line)
                .map_err(|e| IndexError::input(label, e))?;
            if bytes_read == 0 {
                break;
            }

            match classify_line(&line, self.config.marker) {
                LineKind::Blank => {}
                LineKind::Header(id) => {
                    cursor.close(index, stats, &self.config)?;
                    cursor.open(id);
                }
                LineKind::Residues(residues) => {
                    if cursor.active.is_none() {
                        stats.discarded_lines += 1;
                        continue;
                    }
                    if let Some(store) = store.as_deref_mut() {
                        store.append(residues)?;
                    }
                    cursor.length += residues.len() as u64;
                    stats.residues += residues.len() as u64;
                }
            }
        }
        cursor.close(index, stats, &self.config)?;
        stats.sources += 1;
        Ok(())
    }
}

/// Check that every input can be opened before any output is created.
fn preflight(inputs: &[PathBuf], config: &IndexConfig) -> Result<()> {
    for path in inputs {
        LineSource::open(path, config.input_buffer)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::index::{parse_index, verify_contiguous, IndexRecord};

    fn index_str(content: &str) -> (String, String, IndexStats) {
        let cmd = BuildIndexCommand::new();
        let mut index = IndexWriter::new(Vec::new(), "-", RowLayout::OffsetLength);
        let mut store = StoreWriter::new(Vec::new(), "-");
        let stats = cmd
            .index_reader(
                &mut content.as_bytes(),
                Path::new("-"),
                &mut index,
                Some(&mut store),
            )
            .unwrap();
        let index = String::from_utf8(index.into_inner().unwrap()).unwrap();
        let store = String::from_utf8(store.into_inner().unwrap()).unwrap();
        (index, store, stats)
    }

    #[test]
    fn test_basic_example() {
        let (index, store, stats) = index_str(">r1\nACGT\nAC\n>r2\nTT\n");
        assert_eq!(index, "r1\t0\t6\nr2\t6\t2\n");
        assert_eq!(store, "ACGTACTT");
        assert_eq!(stats.records, 2);
        assert_eq!(stats.residues, 8);
    }

    #[test]
    fn test_empty_input() {
        let (index, store, stats) = index_str("");
        assert!(index.is_empty());
        assert!(store.is_empty());
        assert_eq!(stats.records, 0);
    }

    #[test]
    fn test_consecutive_markers_emit_zero_length() {
        let (index, store, _) = index_str(">a\n>b\nGG\n>c\n");
        assert_eq!(index, "a\t0\t0\nb\t0\t2\nc\t2\t0\n");
        assert_eq!(store, "GG");
    }

    #[test]
    fn test_empty_identifier_discards_residues() {
        let (index, store, stats) = index_str(">r1\nAC\n>\nNNNN\n>r2\nGT\n");
        assert_eq!(index, "r1\t0\t2\nr2\t2\t2\n");
        assert_eq!(store, "ACGT");
        assert_eq!(stats.discarded_lines, 1);
    }

    #[test]
    fn test_leading_residues_discarded() {
        let (index, store, stats) = index_str("ACGT\n\n>r1 desc\nTT\n");
        assert_eq!(index, "r1\t0\t2\n");
        assert_eq!(store, "TT");
        assert_eq!(stats.discarded_lines, 1);
    }

    #[test]
    fn test_crlf_and_whitespace_trimmed() {
        let (index, store, _) = index_str(">r1\r\n  ACG \r\nT\r\n\r\n>r2\r\nA");
        assert_eq!(index, "r1\t0\t4\nr2\t4\t1\n");
        assert_eq!(store, "ACGTA");
    }

    #[test]
    fn test_wrap_width_independent() {
        let (index_a, store_a, _) = index_str(">x\nACGTACGTAC\n>y\nGGCC\n");
        let (index_b, store_b, _) = index_str(">x\nACG\nTAC\nGTA\nC\n>y\nG\nGCC\n");
        assert_eq!(index_a, index_b);
        assert_eq!(store_a, store_b);
    }

    #[test]
    fn test_offsets_contiguous() {
        let (index, store, _) = index_str(">a\nAAA\n>b\n>c\nCC\nC\n>g\nG\n");
        let records = parse_index(&index).unwrap();
        let total = verify_contiguous(&records).unwrap();
        assert_eq!(total, store.len() as u64);
        for record in &records {
            let slice = &store[record.offset as usize..record.end().unwrap() as usize];
            assert!(slice.chars().all(|c| c == record.id.to_uppercase().chars().next().unwrap()));
        }
        assert_eq!(records[1], IndexRecord::new("b", 3, 0));
    }

    #[test]
    fn test_duplicate_identifiers_kept() {
        let (index, _, _) = index_str(">r\nA\n>r\nC\n");
        assert_eq!(index, "r\t0\t1\nr\t1\t1\n");
    }

    #[test]
    fn test_custom_marker() {
        let cmd = BuildIndexCommand::new().with_config(IndexConfig::new().with_marker(b'@'));
        let mut index = IndexWriter::new(Vec::new(), "-", RowLayout::OffsetLength);
        let mut store = StoreWriter::new(Vec::new(), "-");
        cmd.index_reader(
            &mut &b"@q1\nACGT\n@q2\nGG\n"[..],
            Path::new("-"),
            &mut index,
            Some(&mut store),
        )
        .unwrap();
        assert_eq!(index.into_inner().unwrap(), b"q1\t0\t4\nq2\t4\t2\n");
    }
}
