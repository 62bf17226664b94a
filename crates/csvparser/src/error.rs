//! Error types returned by [`CsvParser::parse`](crate::CsvParser::parse) and
//! handed to the row error hook.

use std::io;

use thiserror::Error;

/// Error type column parsers return. Anything implementing `std::error::Error`
/// converts into it with `?` or `.into()`, and so does a plain `&str`.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Terminal failure of a whole decode.
#[derive(Debug, Error)]
pub enum Error {
    /// A header has no column parser registered under its exact name.
    #[error("csvparser: header \"{header}\" doesn't have an associated parser")]
    UnparsableHeader { header: String },

    /// The header row could not be read from the input.
    #[error("csvparser: couldn't read headers from file: {0}")]
    HeaderRead(#[source] SourceError),

    /// A data row failed while termination on parsing errors was enabled.
    ///
    /// The message embeds the cause and `source()` returns it as well, so
    /// reporters that walk the chain print the cause twice.
    #[error("csvparser: file couldn't be parsed: {source}")]
    RowParse {
        /// 1-based position of the failing data row, header line excluded.
        row: usize,
        #[source]
        source: RowError,
    },

    /// The input broke down in the middle of the data rows.
    #[error("csvparser: couldn't read row from file: {0}")]
    Read(#[source] SourceError),
}

impl Error {
    /// The error the failing column parser returned, if this decode was
    /// aborted by one.
    pub fn column_error(&self) -> Option<&(dyn std::error::Error + Send + Sync + 'static)> {
        match self {
            Error::RowParse { source, .. } => source.column_error(),
            _ => None,
        }
    }
}

/// Why a single data row could not be turned into a record.
#[derive(Debug, Error)]
pub enum RowError {
    /// The column parser for `header` rejected its cell. Displays the parser's
    /// own message unchanged.
    #[error("{source}")]
    Column {
        header: String,
        #[source]
        source: BoxError,
    },

    #[error("header \"{header}\" doesn't have an associated parser")]
    UnparsableHeader { header: String },

    #[error("row has {found} fields, expected {expected}")]
    FieldCount { expected: usize, found: usize },

    #[error("{0}")]
    Malformed(#[source] SourceError),
}

impl RowError {
    pub fn column_error(&self) -> Option<&(dyn std::error::Error + Send + Sync + 'static)> {
        match self {
            RowError::Column { source, .. } => Some(&**source),
            _ => None,
        }
    }
}

/// Failure reported by a [`RowSource`](crate::source::RowSource).
#[derive(Debug, Error)]
pub enum SourceError {
    /// The input ended before the header row.
    #[error("EOF")]
    EndOfInput,

    /// One record could not be tokenized. The source is still usable.
    #[error("malformed record at line {line}: {message}")]
    Malformed { line: u64, message: String },

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

impl SourceError {
    /// Whether reading may continue with the next record after this error.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, SourceError::Malformed { .. })
    }
}

impl From<csv::Error> for SourceError {
    fn from(err: csv::Error) -> Self {
        let line = err.position().map(|p| p.line()).unwrap_or(0);
        match err.into_kind() {
            csv::ErrorKind::Io(e) => SourceError::Io(e),
            csv::ErrorKind::Utf8 { err, .. } => SourceError::Malformed {
                line,
                message: err.to_string(),
            },
            csv::ErrorKind::UnequalLengths {
                expected_len, len, ..
            } => SourceError::Malformed {
                line,
                message: format!("found record with {len} fields, expected {expected_len}"),
            },
            other => SourceError::Malformed {
                line,
                message: format!("{other:?}"),
            },
        }
    }
}

pub type Result<T> = core::result::Result<T, Error>;
