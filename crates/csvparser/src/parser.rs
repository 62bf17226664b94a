//! The decoding pipeline: header resolution, per-column dispatch, per-row
//! error policy and lifecycle hooks.

use std::collections::HashMap;
use std::io::Read;

use tracing::{debug, trace, warn};

use crate::error::{BoxError, Error, Result, RowError, SourceError};
use crate::options::Options;
use crate::source::{CsvSource, RowSource};

/// Parses one cell into the record being built for the current row.
pub type ColumnParser<'a, T> = Box<dyn Fn(&str, &mut T) -> core::result::Result<(), BoxError> + 'a>;

type OnErrorFn<'a> = Box<dyn FnMut(&[String], &RowError) + 'a>;
type AfterParsingRowFn<'a, T> = Box<dyn FnMut(&T) + 'a>;
type LifecycleFn<'a> = Box<dyn FnMut() + 'a>;

/// Decodes the rows of a [`RowSource`] into records of type `T`, one column
/// parser per header.
///
/// Configuration calls consume and return the parser so they chain;
/// [`parse`](Self::parse) consumes it, so one parser drains one input.
pub struct CsvParser<'a, T, S> {
    source: S,
    column_parsers: HashMap<String, ColumnParser<'a, T>>,
    on_error: Option<OnErrorFn<'a>>,
    after_parsing_hook: Option<AfterParsingRowFn<'a, T>>,
    on_start: Option<LifecycleFn<'a>>,
    on_finish: Option<LifecycleFn<'a>>,
    headers: Vec<String>,
    terminate_on_parsing_error: bool,
}

impl<'a, T, R: Read> CsvParser<'a, T, CsvSource<R>> {
    /// Reads CSV from any reader, taking the headers from its first row.
    pub fn from_reader(reader: R) -> Self {
        Self::new(CsvSource::new(reader))
    }

    /// Reads CSV that has no header line; `headers` name the columns in order.
    pub fn from_reader_with_headers<I>(reader: R, headers: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<String>,
    {
        Self::with_headers(CsvSource::new(reader), headers)
    }

    pub fn from_reader_with_options(reader: R, options: &Options) -> Self {
        Self::new(CsvSource::with_options(reader, options))
    }
}

impl<'a, 'b, T> CsvParser<'a, T, CsvSource<&'b [u8]>> {
    pub fn from_bytes(input: &'b [u8]) -> Self {
        Self::from_reader(input)
    }

    pub fn from_bytes_with_headers<I>(input: &'b [u8], headers: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<String>,
    {
        Self::from_reader_with_headers(input, headers)
    }
}

impl<'a, T, S: RowSource> CsvParser<'a, T, S> {
    /// Decoder whose headers come from the first row of `source`.
    pub fn new(source: S) -> Self {
        Self {
            source,
            column_parsers: HashMap::new(),
            on_error: None,
            after_parsing_hook: None,
            on_start: None,
            on_finish: None,
            headers: Vec::new(),
            terminate_on_parsing_error: false,
        }
    }

    /// Decoder for a source without a header row. An empty `headers` list
    /// behaves like [`new`](Self::new).
    pub fn with_headers<I>(source: S, headers: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<String>,
    {
        let mut parser = Self::new(source);
        parser.headers = headers.into_iter().map(Into::into).collect();
        parser
    }

    /// Registers the parser for the column named `header`.
    ///
    /// Registering a second parser under the same name replaces the first:
    /// the last registration wins.
    pub fn add_column_parser<F>(mut self, header: impl Into<String>, parser: F) -> Self
    where
        F: Fn(&str, &mut T) -> core::result::Result<(), BoxError> + 'a,
    {
        let header = header.into();
        if self.column_parsers.contains_key(&header) {
            debug!(header = %header, "replacing column parser");
        }
        self.column_parsers.insert(header, Box::new(parser));
        self
    }

    /// Abort the whole decode on the first row that fails. Off by default,
    /// in which case failing rows are skipped.
    pub fn terminate_on_parsing_error(self) -> Self {
        self.terminate_on_error(true)
    }

    pub fn terminate_on_error(mut self, terminate: bool) -> Self {
        self.terminate_on_parsing_error = terminate;
        self
    }

    /// Called with the raw row and the cause every time a row fails.
    pub fn on_parse_error<F>(mut self, callback: F) -> Self
    where
        F: FnMut(&[String], &RowError) + 'a,
    {
        self.on_error = Some(Box::new(callback));
        self
    }

    /// Called with every successfully decoded record, before it is collected.
    pub fn with_hook<F>(mut self, hook: F) -> Self
    where
        F: FnMut(&T) + 'a,
    {
        self.after_parsing_hook = Some(Box::new(hook));
        self
    }

    pub fn on_start<F>(mut self, hook: F) -> Self
    where
        F: FnMut() + 'a,
    {
        self.on_start = Some(Box::new(hook));
        self
    }

    /// Called once when decoding ends, whether it succeeded or failed.
    pub fn on_finish<F>(mut self, hook: F) -> Self
    where
        F: FnMut() + 'a,
    {
        self.on_finish = Some(Box::new(hook));
        self
    }
}

impl<'a, T: Default, S: RowSource> CsvParser<'a, T, S> {
    /// Drains the source and returns every record that decoded cleanly, in
    /// input order.
    ///
    /// Fails when a header has no parser, when the header row can't be read,
    /// when the source breaks down, or when a row fails while
    /// [`terminate_on_parsing_error`](Self::terminate_on_parsing_error) is
    /// set. A failed decode returns no records at all.
    pub fn parse(mut self) -> Result<Vec<T>> {
        if let Some(hook) = self.on_start.as_mut() {
            hook();
        }
        let result = self
            .prepare_headers()
            .and_then(|()| self.parse_results());
        if let Some(hook) = self.on_finish.as_mut() {
            hook();
        }
        result
    }

    fn prepare_headers(&mut self) -> Result<()> {
        if self.headers.is_empty() {
            return self.load_headers_from_source();
        }
        if let Some(header) = self.headers.iter().find(|h| !self.column_parsers.contains_key(*h)) {
            return Err(Error::UnparsableHeader {
                header: header.clone(),
            });
        }
        debug!(columns = self.headers.len(), "using supplied headers");
        Ok(())
    }

    fn load_headers_from_source(&mut self) -> Result<()> {
        let row = match self.source.read_row() {
            Ok(Some(row)) => row,
            Ok(None) => return Err(Error::HeaderRead(SourceError::EndOfInput)),
            Err(e) => return Err(Error::HeaderRead(e)),
        };
        let mut headers = Vec::with_capacity(row.len());
        for raw in &row {
            let header = raw.trim_matches(' ');
            if !self.column_parsers.contains_key(header) {
                return Err(Error::UnparsableHeader {
                    header: header.to_owned(),
                });
            }
            headers.push(header.to_owned());
        }
        debug!(columns = headers.len(), "loaded headers from input");
        self.headers = headers;
        Ok(())
    }

    fn parse_results(&mut self) -> Result<Vec<T>> {
        let mut result = Vec::new();
        let mut row_number = 0usize;
        loop {
            let read = self.source.read_row();
            let outcome = match read {
                Ok(None) => break,
                Ok(Some(row)) => {
                    row_number += 1;
                    self.parse_row(&row)
                }
                Err(e) if e.is_recoverable() => {
                    row_number += 1;
                    Err(RowError::Malformed(e))
                }
                Err(e) => return Err(Error::Read(e)),
            };
            match outcome {
                Ok(record) => result.push(record),
                Err(err) if self.terminate_on_parsing_error => {
                    return Err(Error::RowParse {
                        row: row_number,
                        source: err,
                    });
                }
                Err(err) => warn!(row = row_number, error = %err, "skipping row"),
            }
        }
        debug!(rows = row_number, records = result.len(), "finished parsing");
        Ok(result)
    }

    fn parse_row(&mut self, row: &[String]) -> core::result::Result<T, RowError> {
        let mut record = T::default();
        if let Err(err) = self.parse_columns(row, &mut record) {
            if let Some(on_error) = self.on_error.as_mut() {
                on_error(row, &err);
            }
            return Err(err);
        }
        trace!(fields = row.len(), "row decoded");
        if let Some(hook) = self.after_parsing_hook.as_mut() {
            hook(&record);
        }
        Ok(record)
    }

    /// Runs the column parsers left to right; the first failure ends the row.
    fn parse_columns(&self, row: &[String], destination: &mut T) -> core::result::Result<(), RowError> {
        if row.len() != self.headers.len() {
            return Err(RowError::FieldCount {
                expected: self.headers.len(),
                found: row.len(),
            });
        }
        for (value, header) in row.iter().zip(&self.headers) {
            let parser = self
                .column_parsers
                .get(header)
                .ok_or_else(|| RowError::UnparsableHeader {
                    header: header.clone(),
                })?;
            parser(value.as_str(), &mut *destination).map_err(|source| RowError::Column {
                header: header.clone(),
                source,
            })?;
        }
        Ok(())
    }
}

impl<T, S: core::fmt::Debug> core::fmt::Debug for CsvParser<'_, T, S> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let mut parsers: Vec<&str> = self.column_parsers.keys().map(String::as_str).collect();
        parsers.sort_unstable();
        f.debug_struct("CsvParser")
            .field("source", &self.source)
            .field("column_parsers", &parsers)
            .field("headers", &self.headers)
            .field("terminate_on_parsing_error", &self.terminate_on_parsing_error)
            .finish_non_exhaustive()
    }
}
