//! Buffer size constants for streaming operations.
//!
//! These constants control memory usage vs I/O throughput tradeoffs.

/// Default output buffer size (2 MB) for index and store writers.
pub const DEFAULT_OUTPUT_BUFFER: usize = 2 * 1024 * 1024;

/// Default input buffer size (256 KB) per record source.
pub const DEFAULT_INPUT_BUFFER: usize = 256 * 1024;

/// Default line buffer capacity (1 KB).
/// Sufficient for wrapped FASTA lines and typical read headers.
pub const DEFAULT_LINE_BUFFER: usize = 1024;

/// Default identifier buffer (64 bytes).
pub const DEFAULT_ID_BUFFER: usize = 64;
