//! Parse the review text format back into a [`Changeset`].
//!
//! The format is a unified diff interleaved with `#`-prefixed comment blocks;
//! see [`crate::writer`] for the layout. Parsing is line oriented and driven by
//! [`ReviewParser`], a small state machine.

mod state_machine;

use crate::model::Changeset;
use chrono::{DateTime, NaiveDateTime, TimeZone, Utc};
use std::io::Read;
use thiserror::Error;

pub use state_machine::{ParsedReview, ReviewParser, State};

/// Layout of comment timestamps (C `asctime`, always UTC).
pub const TIMESTAMP_FORMAT: &str = "%a %b %e %H:%M:%S %Y";

/// Errors that can occur while parsing a review document.
#[derive(Debug, Error)]
pub enum ParseError {
    /// A file section started but its header lines are not recognizable.
    #[error("line {line}: expected diff header, but found {found:?}")]
    ExpectedDiffHeader { line: usize, found: String },

    /// A numeric or date field could not be converted.
    #[error("line {line}: malformed {field}: {value:?}")]
    MalformedField {
        line: usize,
        field: &'static str,
        value: String,
    },

    /// The document could not be read.
    #[error("failed to read review: {0}")]
    Io(#[from] std::io::Error),
}

/// Coarse classification of [`ParseError`]s.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    ExpectedDiffHeader,
    MalformedField,
    Io,
}

impl ParseError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            ParseError::ExpectedDiffHeader { .. } => ErrorKind::ExpectedDiffHeader,
            ParseError::MalformedField { .. } => ErrorKind::MalformedField,
            ParseError::Io(_) => ErrorKind::Io,
        }
    }

    /// Line of the document the error refers to, if any.
    pub fn line(&self) -> Option<usize> {
        match self {
            ParseError::ExpectedDiffHeader { line, .. } | ParseError::MalformedField { line, .. } => {
                Some(*line)
            }
            ParseError::Io(_) => None,
        }
    }
}

/// Parse a review document leniently.
///
/// Malformed numeric fields fall back to defaults and are logged; only
/// structural errors abort.
pub fn parse_changeset(text: &str) -> Result<Changeset, ParseError> {
    let mut parser = ReviewParser::new();
    for line in text.lines() {
        parser.feed(line)?;
    }
    Ok(parser.finish().changeset)
}

/// Read and parse a review document, keeping the diagnostics.
pub fn read_changeset(mut reader: impl Read, strict: bool) -> Result<ParsedReview, ParseError> {
    let mut text = String::new();
    reader.read_to_string(&mut text)?;

    let mut parser = ReviewParser::new().strict(strict);
    for line in text.lines() {
        parser.feed(line)?;
    }
    Ok(parser.finish())
}

/// Render a timestamp the way comment headers show it.
pub fn format_timestamp(timestamp: &DateTime<Utc>) -> String {
    timestamp.format(TIMESTAMP_FORMAT).to_string()
}

/// Parse a timestamp from a comment header.
pub fn parse_timestamp(value: &str) -> Option<DateTime<Utc>> {
    NaiveDateTime::parse_from_str(value.trim(), TIMESTAMP_FORMAT)
        .ok()
        .map(|naive| Utc.from_utc_datetime(&naive))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_timestamp_round_trip() {
        let single_digit_day = Utc.with_ymd_and_hms(2006, 1, 2, 15, 4, 5).unwrap();
        let formatted = format_timestamp(&single_digit_day);
        assert_eq!(formatted, "Mon Jan  2 15:04:05 2006");
        assert_eq!(parse_timestamp(&formatted), Some(single_digit_day));

        let two_digit_day = Utc.with_ymd_and_hms(2015, 3, 17, 9, 30, 0).unwrap();
        assert_eq!(
            parse_timestamp(&format_timestamp(&two_digit_day)),
            Some(two_digit_day)
        );
    }

    #[test]
    fn test_parse_timestamp_rejects_garbage() {
        assert_eq!(parse_timestamp("yesterday"), None);
        assert_eq!(parse_timestamp(""), None);
    }

    #[test]
    fn test_error_kind_and_line() {
        let error = ParseError::MalformedField {
            line: 7,
            field: "comment id",
            value: "99999999999999999999999".to_string(),
        };
        assert_eq!(error.kind(), ErrorKind::MalformedField);
        assert_eq!(error.line(), Some(7));

        let error = ParseError::ExpectedDiffHeader {
            line: 2,
            found: "garbage".to_string(),
        };
        assert_eq!(error.kind(), ErrorKind::ExpectedDiffHeader);
        assert!(error.to_string().contains("expected diff header"));
    }

    #[test]
    fn test_read_changeset_from_reader() {
        let text = "--- a.txt\n+++ a.txt\n@@ -1,1 +1,1 @@\n-old\n+new\n";
        let parsed = read_changeset(text.as_bytes(), false).unwrap();
        assert_eq!(parsed.changeset.diffs.len(), 1);
        assert!(parsed.diagnostics.is_empty());
    }
}
