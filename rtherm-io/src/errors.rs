use rtherm_core::errors::RthermError;
use thiserror::Error;

/// Error type for reading and writing array dumps.
#[derive(Error, Debug)]
pub enum DumpError {
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error("Unexpected end of data while reading the {0}")]
    UnexpectedEof(&'static str),
    #[error("Could not parse token {index} ({token:?}) as {expected}")]
    Parse {
        index: usize,
        token: String,
        expected: &'static str,
    },
    #[error("Expected a {expected}-dimensional array, the dump declares {found} dimensions")]
    WrongRank { expected: usize, found: usize },
    #[error("Array extents {extents:?} describe more values than can be addressed")]
    TooLarge { extents: Vec<usize> },
    #[error("Expected {expected} values, found only {found}")]
    Truncated { expected: usize, found: usize },
    #[error("Unexpected data after the {expected} declared values")]
    TrailingData { expected: usize },
    #[error(transparent)]
    Field(#[from] RthermError),
}

/// Convenience type for `Result<T, DumpError>`.
pub type DumpResult<T> = Result<T, DumpError>;
