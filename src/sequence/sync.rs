//! Synchronous producers
//!
//! This module provides the eager [`serialize`] entry point and the lazy
//! [`Lines`] iterator returned by [`serialize_sequence`].
//!
//! # Design
//!
//! `Lines` pulls one record from the underlying iterator per call to
//! `next()` and formats it with the shared core in `core::format`. Nothing is
//! read ahead, so an infinite record iterator is fine as long as the consumer
//! stops pulling:
//!
//! ```
//! use delimited_lines::{serialize_sequence, Column};
//!
//! let columns = [Column::new("n", |n: &u64| *n)];
//! let lines: Vec<String> = serialize_sequence(1u64.., &columns, None)
//!     .take(3)
//!     .collect::<Result<_, _>>()
//!     .unwrap();
//!
//! assert_eq!(lines, ["n\r\n", "1\r\n", "2\r\n"]);
//! ```
//!
//! # Error Handling
//!
//! A failing record yields an `Err` item carrying the record index. Lines
//! already handed out are unaffected and the iterator can be polled again to
//! continue with the next record.

use crate::core::format::{build_header, build_record_line, normalize_options};
use crate::types::{Column, PartialOptions, SerializeError, SerializeOptions};
use log::{debug, trace};
use std::borrow::Borrow;
use std::iter::FusedIterator;

/// Serialize a finite slice of records into one string
///
/// The result is the header line followed by one line per record, in order.
///
/// # Errors
///
/// Returns the first extraction or conversion failure. No partial output is
/// returned in that case.
///
/// # Examples
///
/// ```
/// use delimited_lines::{serialize, Column};
///
/// struct Row {
///     value: &'static str,
/// }
///
/// let rows = [Row { value: "A" }, Row { value: "B" }];
/// let columns = [Column::new("Value", |row: &Row| row.value)];
///
/// assert_eq!(serialize(&rows, &columns, None).unwrap(), "Value\r\nA\r\nB\r\n");
/// ```
pub fn serialize<T>(
    records: &[T],
    columns: &[Column<T>],
    options: Option<PartialOptions>,
) -> Result<String, SerializeError> {
    debug!(
        "Serializing {} records with {} columns",
        records.len(),
        columns.len()
    );

    serialize_sequence(records, columns, options).collect()
}

/// Serialize a (possibly infinite) iterator of records lazily
///
/// The returned iterator yields the header line first, then one line per
/// record in iteration order. Each line is computed only when requested.
pub fn serialize_sequence<'c, T, I>(
    records: I,
    columns: &'c [Column<T>],
    options: Option<PartialOptions>,
) -> Lines<'c, T, I::IntoIter>
where
    I: IntoIterator,
    I::Item: Borrow<T>,
{
    Lines::new(records.into_iter(), columns, normalize_options(options))
}

/// Lazy iterator over serialized lines
///
/// Restartable only when the record iterator is: `Lines` is `Clone` whenever
/// `I` is.
pub struct Lines<'c, T, I> {
    records: I,
    columns: &'c [Column<T>],
    options: SerializeOptions,
    header_pending: bool,
    next_index: u64,
}

impl<'c, T, I> Lines<'c, T, I>
where
    I: Iterator,
    I::Item: Borrow<T>,
{
    /// Create a line iterator over `records` with already-normalized options
    pub fn new(records: I, columns: &'c [Column<T>], options: SerializeOptions) -> Self {
        Self {
            records,
            columns,
            options,
            header_pending: true,
            next_index: 0,
        }
    }

    /// Effective options of this serialization
    pub fn options(&self) -> &SerializeOptions {
        &self.options
    }

    /// Number of record lines requested so far (failed ones included)
    pub fn records_read(&self) -> u64 {
        self.next_index
    }
}

impl<'c, T, I> Iterator for Lines<'c, T, I>
where
    I: Iterator,
    I::Item: Borrow<T>,
{
    type Item = Result<String, SerializeError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.header_pending {
            self.header_pending = false;
            trace!("Emitting header line");
            return Some(Ok(build_header(self.columns, &self.options)));
        }

        let Some(record) = self.records.next() else {
            debug!("Record sequence exhausted after {} records", self.next_index);
            return None;
        };

        let index = self.next_index;
        self.next_index += 1;
        trace!("Emitting line for record {}", index);

        Some(
            build_record_line(self.columns, record.borrow(), &self.options)
                .map_err(|e| e.at_record(index)),
        )
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let (lower, upper) = self.records.size_hint();
        let header = usize::from(self.header_pending);
        (
            lower.saturating_add(header),
            upper.and_then(|upper| upper.checked_add(header)),
        )
    }
}

impl<'c, T, I> FusedIterator for Lines<'c, T, I>
where
    I: FusedIterator,
    I::Item: Borrow<T>,
{
}

impl<'c, T, I: Clone> Clone for Lines<'c, T, I> {
    fn clone(&self) -> Self {
        Self {
            records: self.records.clone(),
            columns: self.columns,
            options: self.options.clone(),
            header_pending: self.header_pending,
            next_index: self.next_index,
        }
    }
}

impl<'c, T, I> std::fmt::Debug for Lines<'c, T, I> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Lines")
            .field("columns", &self.columns)
            .field("options", &self.options)
            .field("header_pending", &self.header_pending)
            .field("next_index", &self.next_index)
            .finish_non_exhaustive()
    }
}
