//! Streaming utilities shared by the indexing commands.
//!
//! This module provides:
//! - Zero-allocation classification of record-source lines
//! - Buffered index and store writers
//! - Buffer size constants
//!
//! Indexing keeps O(1) memory regardless of input size: only the active
//! identifier and a single line buffer are held at any time.

pub mod buffers;
pub mod output;
pub mod parsing;

pub use output::{IndexWriter, RowLayout, StoreWriter};
pub use parsing::{classify_line, parse_index_row, parse_u64_fast, LineKind};
