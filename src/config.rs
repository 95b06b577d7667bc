//! Per-run configuration for the sequence indexer.
//!
//! Every knob that affects parsing or output lives on an [`IndexConfig`]
//! value that the caller constructs and passes in. Nothing here is global.

use crate::streaming::buffers::{DEFAULT_INPUT_BUFFER, DEFAULT_OUTPUT_BUFFER};

/// Default record-start marker for FASTA-style input.
pub const DEFAULT_MARKER: u8 = b'>';

/// Default number of emitted records between progress events.
pub const DEFAULT_PROGRESS_INTERVAL: u64 = 100_000;

/// Configuration shared by the indexing commands.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexConfig {
    /// Byte that starts a record header line
    pub marker: u8,
    /// Emit a progress event every this many records (0 disables)
    pub progress_interval: u64,
    /// Read buffer capacity per input source
    pub input_buffer: usize,
    /// Write buffer capacity per output file
    pub output_buffer: usize,
}

impl Default for IndexConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl IndexConfig {
    pub fn new() -> Self {
        Self {
            marker: DEFAULT_MARKER,
            progress_interval: DEFAULT_PROGRESS_INTERVAL,
            input_buffer: DEFAULT_INPUT_BUFFER,
            output_buffer: DEFAULT_OUTPUT_BUFFER,
        }
    }

    /// Set the record-start marker byte.
    pub fn with_marker(mut self, marker: u8) -> Self {
        self.marker = marker;
        self
    }

    /// Set the progress reporting interval.
    pub fn with_progress_interval(mut self, interval: u64) -> Self {
        self.progress_interval = interval;
        self
    }

    /// Set the input buffer capacity.
    pub fn with_input_buffer(mut self, capacity: usize) -> Self {
        self.input_buffer = capacity;
        self
    }

    /// Set the output buffer capacity.
    pub fn with_output_buffer(mut self, capacity: usize) -> Self {
        self.output_buffer = capacity;
        self
    }

    /// True if a progress event is due after `emitted` records.
    #[inline]
    pub fn progress_due(&self, emitted: u64) -> bool {
        self.progress_interval > 0 && emitted % self.progress_interval == 0
    }
}
