use thiserror::Error;

use std::io;

#[derive(Debug, Error)]
pub enum Error {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error(
        "duplicate header '{header}' detected in header-present mode; \
         set the header mode to absent if the data has no header row"
    )]
    DuplicateHeader { header: String },

    #[error("found multiple matches within alias group: {}", group.join(";"))]
    AmbiguousAlias { group: Vec<String> },

    #[error("header '{header}' does not exist")]
    UnknownHeader { header: String },

    #[error("line {line}: expected {expected} columns, got {actual}")]
    ColumnCountMismatch {
        line: usize,
        expected: usize,
        actual: usize,
    },

    #[error(
        "line {line}: invalid row, missing '{header}' column, expected {expected} columns, got {actual}"
    )]
    MissingColumn {
        line: usize,
        header: String,
        expected: usize,
        actual: usize,
    },

    #[error("line {line}: column index {index} out of range for {count} columns")]
    IndexOutOfRange {
        line: usize,
        index: usize,
        count: usize,
    },
}

impl Error {
    /// Errors raised while resolving headers end the parse run.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            Error::Io(_) | Error::DuplicateHeader { .. } | Error::AmbiguousAlias { .. }
        )
    }
}

pub type Result<T> = core::result::Result<T, Error>;
