//! pash-tools: read indexing and coordinate interval algebra
//!
//! This library provides the two building blocks used around a short-read
//! aligner pipeline.
//!
//! # Features
//!
//! - **Sequence offset index**: streams FASTA-like files (plain, gzip or
//!   bzip2) into an `identifier<TAB>offset<TAB>length` index and a
//!   concatenated residue store
//! - **Random access**: memory-mapped fetch of indexed records
//! - **Interval algebra**: ordering, containment and overlap for ascending
//!   and descending ranges with an excluded endpoint
//!
//! # Example
//!
//! ```rust,no_run
//! use pash_tools::{commands::BuildIndexCommand, interval::Interval, SequenceStore};
//!
//! let cmd = BuildIndexCommand::new();
//! let stats = cmd.run("reads.fa", "reads.offsets", "reads.seq").unwrap();
//! println!("{}", stats);
//!
//! let store = SequenceStore::open("reads.offsets", "reads.seq").unwrap();
//! let residues = store.fetch("read_1").unwrap();
//!
//! let hit = Interval::closed(100, 150);
//! let window = Interval::half_open(90, 200);
//! assert!(window.contains(&hit));
//! ```

pub mod commands;
pub mod config;
pub mod error;
pub mod index;
pub mod interval;
pub mod source;
pub mod store;
pub mod streaming;

// Re-export commonly used types
pub use config::IndexConfig;
pub use error::{IndexError, Result};
pub use index::{read_index, IndexReader, IndexRecord};
pub use interval::Interval;
pub use source::LineSource;
pub use store::SequenceStore;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::commands::{BuildIndexCommand, FetchCommand, IndexStats, LengthsCommand};
    pub use crate::config::IndexConfig;
    pub use crate::error::IndexError;
    pub use crate::index::{read_index, IndexRecord};
    pub use crate::interval::Interval;
    pub use crate::store::SequenceStore;
}

#[cfg(test)]
mod tests {
    #[test]
    fn test_index_then_fetch_workflow() {
        use crate::commands::BuildIndexCommand;
        use crate::store::SequenceStore;
        use std::io::Write;

        let dir = tempfile::tempdir().unwrap();
        let fasta = dir.path().join("reads.fa");
        let offsets = dir.path().join("reads.offsets");
        let sequence = dir.path().join("reads.seq");
        let mut f = std::fs::File::create(&fasta).unwrap();
        f.write_all(b">r1\nACGT\nAC\n>r2\nTT\n").unwrap();
        drop(f);

        let stats = BuildIndexCommand::new()
            .run(&fasta, &offsets, &sequence)
            .unwrap();
        assert_eq!(stats.records, 2);

        let store = SequenceStore::open(&offsets, &sequence).unwrap();
        assert_eq!(store.fetch("r1").unwrap(), b"ACGTAC");
        assert_eq!(store.fetch("r2").unwrap(), b"TT");
    }

    #[test]
    fn test_interval_workflow() {
        use crate::interval::Interval;

        let mut hits = vec![
            Interval::closed(30, 40),
            Interval::half_open(20, 10),
            Interval::closed(10, 20),
        ];
        hits.sort();

        assert_eq!(hits[0], Interval::closed(10, 20));
        assert!(hits[1].exclude_min());
        assert!(!hits[0].overlaps(&hits[2]));
    }
}
