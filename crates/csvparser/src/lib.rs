#![doc = include_str!("../README.md")]

pub mod error;
pub mod options;
pub mod parser;
pub mod source;

pub use crate::error::{BoxError, Error, Result, RowError, SourceError};
pub use crate::options::{Delimiter, Options};
pub use crate::parser::{ColumnParser, CsvParser};
pub use crate::source::{CsvSource, RowSource};
