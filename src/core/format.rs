//! Line formatting
//!
//! The shared, stateless core of every producer: converting raw field values
//! to text, escaping them, and assembling header and record lines.
//!
//! All functions are pure (no I/O) for easy testing.
//!
//! # Escaping
//!
//! A field is quoted when it contains a double quote, a carriage return, a
//! line feed, or the configured delimiter. Quoting wraps the field in double
//! quotes and doubles every double quote inside it:
//!
//! ```text
//! te;xt    -> "te;xt"
//! "text"   -> """text"""
//! Va;"lue  -> "Va;""lue"
//! ```

use crate::types::{Column, FieldValue, PartialOptions, SerializeError, SerializeOptions};
use std::borrow::Cow;

/// Merge caller-supplied overrides over the defaults
///
/// `None` yields the defaults: delimiter `;`, line break `\r\n`, and the
/// conversion performed by [`to_text`].
pub fn normalize_options(overrides: Option<PartialOptions>) -> SerializeOptions {
    overrides.map(PartialOptions::normalize).unwrap_or_default()
}

/// Default field-to-text conversion
///
/// - absent values become the empty string
/// - instants become ISO-8601 with milliseconds and a trailing `Z`
/// - everything else uses its natural textual form
pub fn to_text(value: &FieldValue) -> String {
    value.to_string()
}

/// Escape a single field for the configured delimiter
///
/// Returns the text unchanged (borrowed) when no quoting is needed. Every
/// text contains the empty string, so an empty delimiter quotes every field.
pub fn escape_field<'a>(text: &'a str, options: &SerializeOptions) -> Cow<'a, str> {
    if needs_quoting(text, &options.delimiter) {
        Cow::Owned(format!("\"{}\"", text.replace('"', "\"\"")))
    } else {
        Cow::Borrowed(text)
    }
}

fn needs_quoting(text: &str, delimiter: &str) -> bool {
    text.contains(['"', '\r', '\n']) || text.contains(delimiter)
}

// Escape, join and terminate already-converted fields.
fn join_fields<I, S>(fields: I, options: &SerializeOptions) -> String
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut line = String::new();
    for (position, field) in fields.into_iter().enumerate() {
        if position > 0 {
            line.push_str(&options.delimiter);
        }
        line.push_str(&escape_field(field.as_ref(), options));
    }
    line.push_str(&options.line_break);
    line
}

/// Build one line from raw field values
///
/// Each value goes through the configured conversion and then
/// [`escape_field`]; the results are joined with the delimiter and the line
/// break is appended.
///
/// # Errors
///
/// Returns [`SerializeError::Conversion`] for the first value the configured
/// conversion rejects.
pub fn build_line(raw_fields: &[FieldValue], options: &SerializeOptions) -> Result<String, SerializeError> {
    let texts = raw_fields
        .iter()
        .enumerate()
        .map(|(column, value)| {
            options
                .convert(value)
                .map_err(|source| SerializeError::conversion(column, source))
        })
        .collect::<Result<Vec<_>, _>>()?;

    Ok(join_fields(texts, options))
}

/// Build the header line from the column header texts
///
/// Header texts are escaped like data fields but are not converted, since
/// they already are text.
pub fn build_header<T>(columns: &[Column<T>], options: &SerializeOptions) -> String {
    join_fields(columns.iter().map(Column::header), options)
}

/// Build the line for one record
///
/// # Errors
///
/// Returns [`SerializeError::Extraction`] when a column's extraction function
/// fails, or [`SerializeError::Conversion`] when the conversion does.
pub fn build_record_line<T>(
    columns: &[Column<T>],
    record: &T,
    options: &SerializeOptions,
) -> Result<String, SerializeError> {
    let raw_fields = columns
        .iter()
        .enumerate()
        .map(|(position, column)| {
            column
                .extract(record)
                .map_err(|source| SerializeError::extraction(position, column.header(), source))
        })
        .collect::<Result<Vec<_>, _>>()?;

    build_line(&raw_fields, options)
}
