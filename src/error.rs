//! Error type for indexing and index reading.

use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors that can occur while building or reading a sequence index.
#[derive(Error, Debug)]
pub enum IndexError {
    /// An input file is missing or cannot be read.
    #[error("Cannot read input '{}': {source}", .path.display())]
    InputUnavailable {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Writing the index or store failed. Partial output is left in place.
    #[error("Cannot write output '{}': {source}", .path.display())]
    OutputWriteFailure {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Malformed index row at line {line}: {message}")]
    MalformedIndexRow { line: usize, message: String },

    #[error("Unknown sequence identifier '{0}'")]
    UnknownIdentifier(String),

    /// A command-line value that clap accepted but the command cannot use.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

pub type Result<T> = std::result::Result<T, IndexError>;

impl IndexError {
    pub(crate) fn input(path: &Path, source: io::Error) -> Self {
        IndexError::InputUnavailable {
            path: path.to_path_buf(),
            source,
        }
    }

    pub(crate) fn output(path: &Path, source: io::Error) -> Self {
        IndexError::OutputWriteFailure {
            path: path.to_path_buf(),
            source,
        }
    }
}
