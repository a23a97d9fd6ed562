//! Column definitions
//!
//! A column pairs a header label with a function extracting that column's
//! value from a record. Columns are used as an ordered slice; their order is
//! the field order of every produced line. Duplicate headers are allowed.

use crate::types::error::BoxError;
use crate::types::field::FieldValue;
use serde::Serialize;
use std::fmt;
use std::sync::Arc;

/// Shared extraction function of a column
pub type Extractor<T> = Arc<dyn Fn(&T) -> Result<FieldValue, BoxError> + Send + Sync>;

/// A single output column: header text plus extraction function
///
/// # Examples
///
/// ```
/// use delimited_lines::Column;
///
/// struct Payment {
///     client: u16,
///     memo: Option<String>,
/// }
///
/// let columns = [
///     Column::new("client", |p: &Payment| p.client),
///     Column::new("memo", |p: &Payment| p.memo.clone()),
/// ];
/// assert_eq!(columns[1].header(), "memo");
/// ```
pub struct Column<T> {
    header: String,
    extract: Extractor<T>,
}

impl<T> Column<T> {
    /// Create a column from an infallible extraction function
    pub fn new<V, F>(header: impl Into<String>, extract: F) -> Self
    where
        V: Into<FieldValue>,
        F: Fn(&T) -> V + Send + Sync + 'static,
    {
        Self {
            header: header.into(),
            extract: Arc::new(move |record: &T| Ok(extract(record).into())),
        }
    }

    /// Create a column from a fallible extraction function
    ///
    /// An error returned by `extract` is not recovered from; it becomes the
    /// result of the line being produced for that record.
    pub fn try_new<V, E, F>(header: impl Into<String>, extract: F) -> Self
    where
        V: Into<FieldValue>,
        E: Into<BoxError>,
        F: Fn(&T) -> Result<V, E> + Send + Sync + 'static,
    {
        Self {
            header: header.into(),
            extract: Arc::new(move |record: &T| {
                extract(record).map(Into::into).map_err(Into::into)
            }),
        }
    }

    /// Header text of this column
    pub fn header(&self) -> &str {
        &self.header
    }

    /// Extract this column's raw value from a record
    pub fn extract(&self, record: &T) -> Result<FieldValue, BoxError> {
        (self.extract)(record)
    }
}

impl<T: Serialize> Column<T> {
    /// Create a column reading the property `key` of a serializable record
    ///
    /// The record is serialized to a JSON object and the property is looked
    /// up by name. A missing property (or a record that is not an object)
    /// yields an empty field; a record that fails to serialize is an
    /// extraction error.
    ///
    /// Each keyed column serializes the whole record on its own, so a line
    /// with `n` keyed columns serializes its record `n` times. For wide
    /// records or many columns, [`Column::new`] with a direct accessor avoids
    /// that cost.
    ///
    /// ```
    /// use delimited_lines::{serialize, Column};
    /// use serde::Serialize;
    ///
    /// #[derive(Serialize)]
    /// struct Row {
    ///     prop_a: &'static str,
    ///     prop_b: &'static str,
    /// }
    ///
    /// let rows = [Row { prop_a: "A1", prop_b: "B1" }];
    /// let columns = [Column::field("prop_a", "A"), Column::field("prop_b", "B")];
    ///
    /// assert_eq!(serialize(&rows, &columns, None).unwrap(), "A;B\r\nA1;B1\r\n");
    /// ```
    pub fn field(key: impl Into<String>, header: impl Into<String>) -> Self {
        let key = key.into();
        Self::try_new(
            header,
            move |record: &T| -> Result<FieldValue, serde_json::Error> {
                let mut value = serde_json::to_value(record)?;
                Ok(value
                    .as_object_mut()
                    .and_then(|object| object.remove(key.as_str()))
                    .map_or(FieldValue::Null, FieldValue::from))
            },
        )
    }
}

impl<T> Clone for Column<T> {
    fn clone(&self) -> Self {
        Self {
            header: self.header.clone(),
            extract: Arc::clone(&self.extract),
        }
    }
}

impl<T> fmt::Debug for Column<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Column")
            .field("header", &self.header)
            .finish_non_exhaustive()
    }
}
