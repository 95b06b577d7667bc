//! Line sources with transparent decompression.
//!
//! The compression format of an input is decided once, from its magic
//! bytes, when the file is opened. Everything downstream sees a plain
//! [`BufRead`] of decoded text.

use crate::error::{IndexError, Result};
use bzip2::read::MultiBzDecoder;
use flate2::read::MultiGzDecoder;
use std::fs::File;
use std::io::{self, BufRead, BufReader, Read};
use std::path::{Path, PathBuf};
use tracing::debug;

const GZIP_MAGIC: &[u8] = &[0x1f, 0x8b];
const BZIP2_MAGIC: &[u8] = b"BZh";

/// Compression format of an input file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Compression {
    Plain,
    Gzip,
    Bzip2,
}

impl Compression {
    /// Detect the format from the leading bytes of a file.
    pub fn detect(head: &[u8]) -> Self {
        if head.starts_with(GZIP_MAGIC) {
            Compression::Gzip
        } else if head.starts_with(BZIP2_MAGIC) {
            Compression::Bzip2
        } else {
            Compression::Plain
        }
    }
}

/// A decoded line source over a plain, gzip, or bzip2 file.
pub enum LineSource {
    Plain(BufReader<File>),
    Gzip(BufReader<MultiGzDecoder<BufReader<File>>>),
    Bzip2(BufReader<MultiBzDecoder<BufReader<File>>>),
}

impl std::fmt::Debug for LineSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("LineSource").field(&self.compression()).finish()
    }
}

impl LineSource {
    /// Open `path`, sniffing its compression format.
    pub fn open<P: AsRef<Path>>(path: P, capacity: usize) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|e| IndexError::input(path, e))?;
        let mut reader = BufReader::with_capacity(capacity, file);
        let compression = Compression::detect(
            reader
                .fill_buf()
                .map_err(|e| IndexError::input(path, e))?,
        );
        debug!(path = %path.display(), ?compression, "opened line source");

        Ok(match compression {
            Compression::Plain => LineSource::Plain(reader),
            Compression::Gzip => LineSource::Gzip(BufReader::with_capacity(
                capacity,
                MultiGzDecoder::new(reader),
            )),
            Compression::Bzip2 => LineSource::Bzip2(BufReader::with_capacity(
                capacity,
                MultiBzDecoder::new(reader),
            )),
        })
    }

    pub fn compression(&self) -> Compression {
        match self {
            LineSource::Plain(_) => Compression::Plain,
            LineSource::Gzip(_) => Compression::Gzip,
            LineSource::Bzip2(_) => Compression::Bzip2,
        }
    }
}

impl Read for LineSource {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        match self {
            LineSource::Plain(r) => r.read(buf),
            LineSource::Gzip(r) => r.read(buf),
            LineSource::Bzip2(r) => r.read(buf),
        }
    }
}

impl BufRead for LineSource {
    fn fill_buf(&mut self) -> io::Result<&[u8]> {
        match self {
            LineSource::Plain(r) => r.fill_buf(),
            LineSource::Gzip(r) => r.fill_buf(),
            LineSource::Bzip2(r) => r.fill_buf(),
        }
    }

    fn consume(&mut self, amt: usize) {
        match self {
            LineSource::Plain(r) => r.consume(amt),
            LineSource::Gzip(r) => r.consume(amt),
            LineSource::Bzip2(r) => r.consume(amt),
        }
    }
}

/// Read a manifest: one input path per line, blank lines skipped.
///
/// The manifest itself may be compressed.
pub fn read_manifest<P: AsRef<Path>>(path: P, capacity: usize) -> Result<Vec<PathBuf>> {
    let path = path.as_ref();
    let source = LineSource::open(path, capacity)?;
    let mut paths = Vec::new();
    for line in source.lines() {
        let line = line.map_err(|e| IndexError::input(path, e))?;
        let entry = line.trim();
        if !entry.is_empty() {
            paths.push(PathBuf::from(entry));
        }
    }
    Ok(paths)
}
