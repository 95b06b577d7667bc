//! Buffered writers for index rows and the concatenated sequence store.
//!
//! Uses itoa for integer formatting to avoid allocation in the hot path.
//! Every write failure is reported as [`IndexError::OutputWriteFailure`]
//! naming the destination.

use crate::error::{IndexError, Result};
use crate::streaming::buffers::DEFAULT_OUTPUT_BUFFER;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

/// Column layout of an index file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RowLayout {
    /// `identifier<TAB>offset<TAB>length`
    #[default]
    OffsetLength,
    /// `identifier<TAB>length`
    LengthOnly,
}

/// Writer for index rows.
pub struct IndexWriter<W: Write> {
    writer: BufWriter<W>,
    path: PathBuf,
    layout: RowLayout,
    itoa_buf: itoa::Buffer,
}

impl IndexWriter<File> {
    /// Create (or truncate) an index file at `path`.
    pub fn create<P: AsRef<Path>>(path: P, layout: RowLayout, capacity: usize) -> Result<Self> {
        let path = path.as_ref();
        let file = File::create(path).map_err(|e| IndexError::output(path, e))?;
        Ok(Self::with_capacity(capacity, file, path, layout))
    }
}

impl<W: Write> IndexWriter<W> {
    /// Wrap any writer. `path` is only used in error messages.
    pub fn new<P: AsRef<Path>>(output: W, path: P, layout: RowLayout) -> Self {
        Self::with_capacity(DEFAULT_OUTPUT_BUFFER, output, path, layout)
    }

    pub fn with_capacity<P: AsRef<Path>>(
        capacity: usize,
        output: W,
        path: P,
        layout: RowLayout,
    ) -> Self {
        Self {
            writer: BufWriter::with_capacity(capacity, output),
            path: path.as_ref().to_path_buf(),
            layout,
            itoa_buf: itoa::Buffer::new(),
        }
    }

    /// Write one row followed by a newline, in this writer's layout.
    #[inline]
    pub fn write_row(&mut self, id: &[u8], offset: u64, length: u64) -> Result<()> {
        self.write_row_inner(id, offset, length)
            .map_err(|e| IndexError::output(&self.path, e))
    }

    fn write_row_inner(&mut self, id: &[u8], offset: u64, length: u64) -> std::io::Result<()> {
        self.writer.write_all(id)?;
        self.writer.write_all(b"\t")?;
        if self.layout == RowLayout::OffsetLength {
            self.writer.write_all(self.itoa_buf.format(offset).as_bytes())?;
            self.writer.write_all(b"\t")?;
        }
        self.writer.write_all(self.itoa_buf.format(length).as_bytes())?;
        self.writer.write_all(b"\n")
    }

    /// Flush buffered rows.
    pub fn flush(&mut self) -> Result<()> {
        self.writer
            .flush()
            .map_err(|e| IndexError::output(&self.path, e))
    }

    /// Flush and return the underlying writer.
    pub fn into_inner(self) -> Result<W> {
        let path = self.path;
        self.writer
            .into_inner()
            .map_err(|e| IndexError::output(&path, e.into_error()))
    }
}

/// Append-only writer for concatenated residues.
pub struct StoreWriter<W: Write> {
    writer: BufWriter<W>,
    path: PathBuf,
}

impl StoreWriter<File> {
    /// Create (or truncate) a sequence store at `path`.
    pub fn create<P: AsRef<Path>>(path: P, capacity: usize) -> Result<Self> {
        let path = path.as_ref();
        let file = File::create(path).map_err(|e| IndexError::output(path, e))?;
        Ok(Self::with_capacity(capacity, file, path))
    }
}

impl<W: Write> StoreWriter<W> {
    /// Wrap any writer. `path` is only used in error messages.
    pub fn new<P: AsRef<Path>>(output: W, path: P) -> Self {
        Self::with_capacity(DEFAULT_OUTPUT_BUFFER, output, path)
    }

    pub fn with_capacity<P: AsRef<Path>>(capacity: usize, output: W, path: P) -> Self {
        Self {
            writer: BufWriter::with_capacity(capacity, output),
            path: path.as_ref().to_path_buf(),
        }
    }

    /// Append residues with no separator.
    #[inline]
    pub fn append(&mut self, residues: &[u8]) -> Result<()> {
        self.writer
            .write_all(residues)
            .map_err(|e| IndexError::output(&self.path, e))
    }

    pub fn flush(&mut self) -> Result<()> {
        self.writer
            .flush()
            .map_err(|e| IndexError::output(&self.path, e))
    }

    /// Flush and return the underlying writer.
    pub fn into_inner(self) -> Result<W> {
        let path = self.path;
        self.writer
            .into_inner()
            .map_err(|e| IndexError::output(&path, e.into_error()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;

    #[test]
    fn test_write_offset_rows() {
        let mut writer = IndexWriter::new(Vec::new(), "-", RowLayout::OffsetLength);
        writer.write_row(b"r1", 0, 6).unwrap();
        writer.write_row(b"r2", 6, 2).unwrap();
        let output = writer.into_inner().unwrap();
        assert_eq!(output, b"r1\t0\t6\nr2\t6\t2\n");
    }

    #[test]
    fn test_write_length_rows() {
        let mut writer = IndexWriter::new(Vec::new(), "-", RowLayout::LengthOnly);
        writer.write_row(b"chr1", 123, 248_956_422).unwrap();
        let output = writer.into_inner().unwrap();
        assert_eq!(output, b"chr1\t248956422\n");
    }

    #[test]
    fn test_store_append() {
        let mut store = StoreWriter::new(Vec::new(), "-");
        store.append(b"ACGT").unwrap();
        store.append(b"").unwrap();
        store.append(b"AC").unwrap();
        assert_eq!(store.into_inner().unwrap(), b"ACGTAC");
    }

    struct FailingWriter;

    impl Write for FailingWriter {
        fn write(&mut self, _buf: &[u8]) -> io::Result<usize> {
            Err(io::Error::new(io::ErrorKind::Other, "disk full"))
        }

        fn flush(&mut self) -> io::Result<()> {
            Err(io::Error::new(io::ErrorKind::Other, "disk full"))
        }
    }

    #[test]
    fn test_write_failure_names_destination() {
        let mut store = StoreWriter::with_capacity(0, FailingWriter, "out.seq");
        let err = store.append(b"ACGT").unwrap_err();
        match err {
            IndexError::OutputWriteFailure { path, .. } => {
                assert_eq!(path, PathBuf::from("out.seq"))
            }
            other => panic!("unexpected error: {other}"),
        }
    }
}
