//! Length-only indexing.
//!
//! Reports `identifier<TAB>length` for every record of a sequence file
//! (for example chromosome sizes of a reference), without writing a store.

use crate::commands::build_index::{BuildIndexCommand, IndexStats};
use crate::config::IndexConfig;
use crate::error::Result;
use crate::source::LineSource;
use crate::streaming::output::{IndexWriter, RowLayout, StoreWriter};
use std::io::{self, Write};
use std::path::Path;

/// Extract record lengths from a sequence file.
#[derive(Debug, Clone, Default)]
pub struct LengthsCommand {
    pub config: IndexConfig,
}

impl LengthsCommand {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(mut self, config: IndexConfig) -> Self {
        self.config = config;
        self
    }

    /// Write the lengths of all records in `input` to `output`.
    ///
    /// `output_label` names the destination in error messages.
    pub fn run<P: AsRef<Path>, W: Write>(
        &self,
        input: P,
        output: W,
        output_label: &Path,
    ) -> Result<IndexStats> {
        let input = input.as_ref();
        let mut source = LineSource::open(input, self.config.input_buffer)?;
        let mut writer = IndexWriter::with_capacity(
            self.config.output_buffer,
            output,
            output_label,
            RowLayout::LengthOnly,
        );
        let stats = BuildIndexCommand::new()
            .with_config(self.config.clone())
            .index_reader(
                &mut source,
                input,
                &mut writer,
                None::<&mut StoreWriter<io::Sink>>,
            )?;
        writer.flush()?;
        Ok(stats)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::NamedTempFile;

    #[test]
    fn test_lengths() {
        let mut fasta = NamedTempFile::new().unwrap();
        write!(fasta, ">chr1 primary\nACGTN\nAC\n>chr2\n>chrM\nGATTACA\n").unwrap();

        let mut output = Vec::new();
        let stats = LengthsCommand::new()
            .run(fasta.path(), &mut output, Path::new("-"))
            .unwrap();

        assert_eq!(
            String::from_utf8(output).unwrap(),
            "chr1\t7\nchr2\t0\nchrM\t7\n"
        );
        assert_eq!(stats.records, 3);
        assert_eq!(stats.residues, 14);
    }
}
