#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum Delimiter {
    #[default]
    Comma,
    Tab,
    Pipe,
    Semicolon,
}

impl Delimiter {
    pub fn as_byte(self) -> u8 {
        match self {
            Delimiter::Comma => b',',
            Delimiter::Tab => b'\t',
            Delimiter::Pipe => b'|',
            Delimiter::Semicolon => b';',
        }
    }
}

/// Tokenizer settings for [`CsvSource`](crate::source::CsvSource).
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct Options {
    pub delimiter: Delimiter,
    /// Honor double quotes around fields (default: true)
    pub quoting: bool,
    /// Lines starting with this byte are skipped
    pub comment: Option<u8>,
    /// Strip surrounding whitespace from every field before it reaches a column parser
    pub trim_fields: bool,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            delimiter: Delimiter::default(),
            quoting: true,
            comment: None,
            trim_fields: false,
        }
    }
}

impl Options {
    pub(crate) fn reader_builder(&self) -> csv::ReaderBuilder {
        let mut builder = csv::ReaderBuilder::new();
        builder
            .has_headers(false)
            .flexible(true)
            .delimiter(self.delimiter.as_byte())
            .quoting(self.quoting)
            .comment(self.comment)
            .trim(if self.trim_fields {
                csv::Trim::Fields
            } else {
                csv::Trim::None
            });
        builder
    }
}
