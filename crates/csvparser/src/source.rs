//! Row sources: where the decoder pulls its rows of string fields from.

use std::collections::VecDeque;
use std::io::Read;

use crate::error::SourceError;
use crate::options::Options;

/// Yields one row of fields at a time.
///
/// `Ok(None)` signals the end of the input. After a recoverable error (see
/// [`SourceError::is_recoverable`]) the next call continues with the following
/// record.
pub trait RowSource {
    fn read_row(&mut self) -> Result<Option<Vec<String>>, SourceError>;
}

impl<S: RowSource + ?Sized> RowSource for &mut S {
    fn read_row(&mut self) -> Result<Option<Vec<String>>, SourceError> {
        (**self).read_row()
    }
}

impl RowSource for VecDeque<Vec<String>> {
    fn read_row(&mut self) -> Result<Option<Vec<String>>, SourceError> {
        Ok(self.pop_front())
    }
}

impl RowSource for std::vec::IntoIter<Vec<String>> {
    fn read_row(&mut self) -> Result<Option<Vec<String>>, SourceError> {
        Ok(self.next())
    }
}

/// CSV tokenizer over any reader.
///
/// Header handling and field-count checks are left to the decoder, so the
/// underlying reader runs without a header row and accepts ragged records.
/// Empty lines are skipped.
pub struct CsvSource<R> {
    reader: csv::Reader<R>,
    record: csv::StringRecord,
}

impl<R: Read> CsvSource<R> {
    pub fn new(reader: R) -> Self {
        Self::with_options(reader, &Options::default())
    }

    pub fn with_options(reader: R, options: &Options) -> Self {
        Self {
            reader: options.reader_builder().from_reader(reader),
            record: csv::StringRecord::new(),
        }
    }
}

impl<R: Read> RowSource for CsvSource<R> {
    fn read_row(&mut self) -> Result<Option<Vec<String>>, SourceError> {
        if !self.reader.read_record(&mut self.record)? {
            return Ok(None);
        }
        Ok(Some(self.record.iter().map(str::to_owned).collect()))
    }
}

impl<R: Read> core::fmt::Debug for CsvSource<R> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("CsvSource")
            .field("position", self.reader.position())
            .finish_non_exhaustive()
    }
}
