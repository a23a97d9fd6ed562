//! Error types for delimited-lines
//!
//! The formatting core itself has no failing paths: escaping, joining and
//! quoting are total over text. Every error originates in a caller-supplied
//! function, either a column's extraction function or a custom field-to-text
//! conversion, and is returned to whoever requested the line being built.
//!
//! # Error Categories
//!
//! - **Extraction Errors**: a column could not read its value from a record
//! - **Conversion Errors**: a custom conversion could not render a value as text

use thiserror::Error;

/// Boxed error returned by caller-supplied extraction and conversion functions
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Main error type for line serialization
///
/// Each variant identifies the column that failed and, when the line was
/// produced by one of the sequence producers, the zero-based index of the
/// record being serialized.
#[derive(Debug, Error)]
pub enum SerializeError {
    /// A column's extraction function failed for a record
    #[error("Failed to extract column {column} ('{header}'){}: {source}", record.map(|r| format!(" for record {}", r)).unwrap_or_default())]
    Extraction {
        /// Zero-based position of the column
        column: usize,
        /// Header text of the column
        header: String,
        /// Zero-based record index (if known)
        record: Option<u64>,
        /// The error returned by the extraction function
        source: BoxError,
    },

    /// The field-to-text conversion failed for a value
    #[error("Failed to convert field {column} to text{}: {source}", record.map(|r| format!(" for record {}", r)).unwrap_or_default())]
    Conversion {
        /// Zero-based position of the field within the line
        column: usize,
        /// Zero-based record index (if known)
        record: Option<u64>,
        /// The error returned by the conversion function
        source: BoxError,
    },
}

impl SerializeError {
    /// Create an Extraction error
    pub fn extraction(column: usize, header: &str, source: BoxError) -> Self {
        SerializeError::Extraction {
            column,
            header: header.to_string(),
            record: None,
            source,
        }
    }

    /// Create a Conversion error
    pub fn conversion(column: usize, source: BoxError) -> Self {
        SerializeError::Conversion {
            column,
            record: None,
            source,
        }
    }

    /// Attach the index of the record whose line failed
    pub fn at_record(mut self, index: u64) -> Self {
        match &mut self {
            SerializeError::Extraction { record, .. } | SerializeError::Conversion { record, .. } => {
                *record = Some(index);
            }
        }
        self
    }

    /// Index of the record whose line failed, if known
    pub fn record(&self) -> Option<u64> {
        match self {
            SerializeError::Extraction { record, .. } | SerializeError::Conversion { record, .. } => {
                *record
            }
        }
    }

    /// Zero-based position of the failing column
    pub fn column(&self) -> usize {
        match self {
            SerializeError::Extraction { column, .. } | SerializeError::Conversion { column, .. } => {
                *column
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use std::error::Error as _;

    fn boxed(message: &str) -> BoxError {
        message.to_string().into()
    }

    #[rstest]
    #[case::extraction_without_record(
        SerializeError::extraction(0, "Value", boxed("missing")),
        "Failed to extract column 0 ('Value'): missing"
    )]
    #[case::extraction_with_record(
        SerializeError::extraction(2, "Amount", boxed("missing")).at_record(7),
        "Failed to extract column 2 ('Amount') for record 7: missing"
    )]
    #[case::conversion_without_record(
        SerializeError::conversion(1, boxed("unsupported")),
        "Failed to convert field 1 to text: unsupported"
    )]
    #[case::conversion_with_record(
        SerializeError::conversion(1, boxed("unsupported")).at_record(0),
        "Failed to convert field 1 to text for record 0: unsupported"
    )]
    fn test_error_display(#[case] error: SerializeError, #[case] expected: &str) {
        assert_eq!(error.to_string(), expected);
    }

    #[test]
    fn test_at_record_sets_index() {
        let error = SerializeError::extraction(3, "A", boxed("boom"));
        assert_eq!(error.record(), None);

        let error = error.at_record(42);
        assert_eq!(error.record(), Some(42));
        assert_eq!(error.column(), 3);
    }

    #[test]
    fn test_source_is_preserved() {
        let io_error = std::io::Error::new(std::io::ErrorKind::InvalidData, "bad bytes");
        let error = SerializeError::conversion(0, Box::new(io_error));

        let source = error.source().expect("conversion error should expose its source");
        assert_eq!(source.to_string(), "bad bytes");
    }
}
