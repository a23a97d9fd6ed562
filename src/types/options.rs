//! Serialization options
//!
//! `SerializeOptions` is the effective, immutable configuration of one
//! serialization call. `PartialOptions` carries whatever the caller chose to
//! override; unset fields keep their defaults when the two are merged.

use crate::types::error::BoxError;
use crate::types::field::FieldValue;
use serde::Deserialize;
use std::fmt;
use std::sync::Arc;

/// Field-to-text conversion function
pub type ToText = Arc<dyn Fn(&FieldValue) -> Result<String, BoxError> + Send + Sync>;

/// Effective options for one serialization call
///
/// # Examples
///
/// ```
/// use delimited_lines::SerializeOptions;
///
/// let options = SerializeOptions::default();
/// assert_eq!(options.delimiter, ";");
/// assert_eq!(options.line_break, "\r\n");
/// ```
#[derive(Clone)]
pub struct SerializeOptions {
    /// Separator placed between fields
    pub delimiter: String,
    /// Terminator appended to every line, header included
    pub line_break: String,
    to_text: ToText,
}

impl SerializeOptions {
    pub const DEFAULT_DELIMITER: &'static str = ";";
    pub const DEFAULT_LINE_BREAK: &'static str = "\r\n";

    /// Convert a raw field value to text with the configured conversion
    pub fn convert(&self, value: &FieldValue) -> Result<String, BoxError> {
        (self.to_text)(value)
    }
}

impl Default for SerializeOptions {
    fn default() -> Self {
        Self {
            delimiter: Self::DEFAULT_DELIMITER.to_string(),
            line_break: Self::DEFAULT_LINE_BREAK.to_string(),
            to_text: Arc::new(|value: &FieldValue| Ok(crate::core::format::to_text(value))),
        }
    }
}

impl fmt::Debug for SerializeOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SerializeOptions")
            .field("delimiter", &self.delimiter)
            .field("line_break", &self.line_break)
            .finish_non_exhaustive()
    }
}

/// Caller-supplied option overrides
///
/// Every field is optional. `delimiter` and `lineBreak` can also be loaded
/// from a configuration document:
///
/// ```
/// use delimited_lines::PartialOptions;
///
/// let overrides: PartialOptions = serde_json::from_str(r#"{"delimiter": ","}"#).unwrap();
/// let options = overrides.normalize();
/// assert_eq!(options.delimiter, ",");
/// assert_eq!(options.line_break, "\r\n");
/// ```
#[derive(Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct PartialOptions {
    pub delimiter: Option<String>,
    pub line_break: Option<String>,
    #[serde(skip)]
    pub to_text: Option<ToText>,
}

impl PartialOptions {
    /// Override the field delimiter
    pub fn with_delimiter(mut self, delimiter: impl Into<String>) -> Self {
        self.delimiter = Some(delimiter.into());
        self
    }

    /// Override the line terminator
    pub fn with_line_break(mut self, line_break: impl Into<String>) -> Self {
        self.line_break = Some(line_break.into());
        self
    }

    /// Override the field-to-text conversion with an infallible function
    pub fn with_to_text<F>(mut self, to_text: F) -> Self
    where
        F: Fn(&FieldValue) -> String + Send + Sync + 'static,
    {
        self.to_text = Some(Arc::new(move |value: &FieldValue| Ok(to_text(value))));
        self
    }

    /// Override the field-to-text conversion with a fallible function
    pub fn with_try_to_text<E, F>(mut self, to_text: F) -> Self
    where
        E: Into<BoxError>,
        F: Fn(&FieldValue) -> Result<String, E> + Send + Sync + 'static,
    {
        self.to_text = Some(Arc::new(move |value: &FieldValue| {
            to_text(value).map_err(Into::into)
        }));
        self
    }

    /// Merge these overrides over the defaults
    pub fn normalize(self) -> SerializeOptions {
        let defaults = SerializeOptions::default();
        SerializeOptions {
            delimiter: self.delimiter.unwrap_or(defaults.delimiter),
            line_break: self.line_break.unwrap_or(defaults.line_break),
            to_text: self.to_text.unwrap_or(defaults.to_text),
        }
    }
}

impl fmt::Debug for PartialOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PartialOptions")
            .field("delimiter", &self.delimiter)
            .field("line_break", &self.line_break)
            .field("to_text", &self.to_text.as_ref().map(|_| "<fn>"))
            .finish()
    }
}
