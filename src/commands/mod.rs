//! Command implementations for pash-tools.

pub mod build_index;
pub mod fetch;
pub mod lengths;
pub mod range;

pub use build_index::{BuildIndexCommand, IndexStats};
pub use fetch::FetchCommand;
pub use lengths::LengthsCommand;
pub use range::{RangeAnswer, RangeOp};
