//! Random-access retrieval of indexed sequences.

use crate::error::{IndexError, Result};
use crate::store::SequenceStore;
use std::io::{BufWriter, Write};
use std::path::Path;

/// Print named records from an index/store pair as FASTA.
#[derive(Debug, Clone, Default)]
pub struct FetchCommand {
    /// Residues per output line (0 = one line per record)
    pub line_width: usize,
}

impl FetchCommand {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_line_width(mut self, width: usize) -> Self {
        self.line_width = width;
        self
    }

    /// Open the store and write every record in `ids`, in the order given.
    pub fn run<P, Q, W>(
        &self,
        index_path: P,
        store_path: Q,
        ids: &[String],
        output: W,
    ) -> Result<usize>
    where
        P: AsRef<Path>,
        Q: AsRef<Path>,
        W: Write,
    {
        let store = SequenceStore::open(index_path, store_path)?;
        self.write_records(&store, ids, output)
    }

    /// Write records from an already opened store.
    pub fn write_records<W: Write>(
        &self,
        store: &SequenceStore,
        ids: &[String],
        output: W,
    ) -> Result<usize> {
        let mut writer = BufWriter::new(output);
        for id in ids {
            let residues = store.fetch(id)?;
            self.write_fasta(&mut writer, id, residues)
                .map_err(IndexError::Io)?;
        }
        writer.flush().map_err(IndexError::Io)?;
        Ok(ids.len())
    }

    fn write_fasta<W: Write>(
        &self,
        writer: &mut W,
        id: &str,
        residues: &[u8],
    ) -> std::io::Result<()> {
        writeln!(writer, ">{}", id)?;
        if self.line_width == 0 || residues.is_empty() {
            writer.write_all(residues)?;
            return writer.write_all(b"\n");
        }
        for chunk in residues.chunks(self.line_width) {
            writer.write_all(chunk)?;
            writer.write_all(b"\n")?;
        }
        Ok(())
    }
}
