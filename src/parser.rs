use std::io::Read;
use std::path::Path;

use thiserror::Error;

/// Errors raised while turning an uploaded byte stream into entries.
///
/// Every variant names the input it came from so the message can be shown
/// to the user as-is. All of them are fatal for the whole request: nothing
/// is partitioned once parsing fails.
#[derive(Debug, Error)]
pub enum ParseError {
    #[error("{source_name}: missing required 'email' column")]
    MissingEmailColumn { source_name: String },

    #[error("{source_name}: input is not valid UTF-8")]
    Decode {
        source_name: String,
        #[source]
        source: std::str::Utf8Error,
    },

    #[error("{source_name}: {source}")]
    Csv {
        source_name: String,
        #[source]
        source: csv::Error,
    },

    #[error("{source_name}: {source}")]
    Io {
        source_name: String,
        #[source]
        source: std::io::Error,
    },
}

/// Input format of an uploaded list, selected by filename extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputFormat {
    /// Header-first CSV with a column literally named `email`
    DelimitedTable,
    /// Plain text, one entry per line
    LineOriented,
}

impl InputFormat {
    /// Select the format from a filename: `.csv` (any case) means
    /// [`InputFormat::DelimitedTable`], everything else - including no
    /// extension at all - is [`InputFormat::LineOriented`].
    pub fn from_filename(filename: &str) -> InputFormat {
        match Path::new(filename).extension() {
            Some(ext) if ext.eq_ignore_ascii_case("csv") => InputFormat::DelimitedTable,
            _ => InputFormat::LineOriented,
        }
    }

    /// Parse an input stream into an ordered sequence of raw entries.
    ///
    /// Entries come back trimmed, empty values dropped, original order
    /// preserved. No email-syntax validation happens here; entry content
    /// is taken literally. `source_name` is only used in error messages.
    pub fn parse<R: Read>(self, input: R, source_name: &str) -> Result<Vec<String>, ParseError> {
        match self {
            InputFormat::DelimitedTable => parse_delimited(input, source_name),
            InputFormat::LineOriented => parse_lines(input, source_name),
        }
    }
}

/// Extract the `email` column from a header-first CSV stream.
fn parse_delimited<R: Read>(input: R, source_name: &str) -> Result<Vec<String>, ParseError> {
    let mut reader = csv::ReaderBuilder::new().flexible(true).from_reader(input);

    let headers = reader.headers().map_err(|source| ParseError::Csv {
        source_name: source_name.to_string(),
        source,
    })?;

    // The column name is matched case-sensitively, like the header says
    let email_idx = headers
        .iter()
        .position(|h| h == "email")
        .ok_or_else(|| ParseError::MissingEmailColumn {
            source_name: source_name.to_string(),
        })?;

    let mut entries = Vec::new();
    for record in reader.records() {
        let record = record.map_err(|source| ParseError::Csv {
            source_name: source_name.to_string(),
            source,
        })?;

        // Rows where the email cell is absent or empty are dropped
        if let Some(value) = record.get(email_idx) {
            let value = value.trim();
            if !value.is_empty() {
                entries.push(value.to_string());
            }
        }
    }

    Ok(entries)
}

/// Read a plain-text stream, one entry per line, skipping blank lines.
fn parse_lines<R: Read>(mut input: R, source_name: &str) -> Result<Vec<String>, ParseError> {
    let mut bytes = Vec::new();
    input
        .read_to_end(&mut bytes)
        .map_err(|source| ParseError::Io {
            source_name: source_name.to_string(),
            source,
        })?;

    // Invalid UTF-8 aborts the whole input; no silent replacement
    let text = std::str::from_utf8(&bytes).map_err(|source| ParseError::Decode {
        source_name: source_name.to_string(),
        source,
    })?;

    Ok(text
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect())
}
