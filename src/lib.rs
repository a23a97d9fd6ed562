//! Delimited Lines Library
//! # Overview
//!
//! This library turns records into delimited text (CSV-style) lines, given an
//! ordered list of column definitions. Output is produced either as one
//! `String` or lazily, one line at a time, from synchronous iterators and
//! asynchronous streams.
//!
//! # Architecture
//!
//! - [`types`] - Core data types (FieldValue, Column, options, errors)
//! - [`core`] - Stateless formatting logic:
//!   - [`core::format`] - Option normalization, conversion, escaping, line assembly
//! - [`sequence`] - The three producers:
//!   - `sequence::sync` - `serialize` and the lazy `Lines` iterator
//!   - `sequence::async` - the lazy `LineStream`
//!
//! # Output Format
//!
//! - The first line is always the header, built from column header texts
//! - One line per record follows, in source order
//! - Fields are joined by the delimiter (default `;`) and every line ends with
//!   the line break (default `\r\n`)
//! - A field containing the delimiter, a double quote, `\r` or `\n` is wrapped
//!   in double quotes, with inner double quotes doubled
//!
//! # Example
//!
//! ```
//! use delimited_lines::{serialize, Column, PartialOptions};
//!
//! struct Payment {
//!     client: u16,
//!     memo: &'static str,
//! }
//!
//! let payments = [Payment { client: 1, memo: "rent; march" }];
//! let columns = [
//!     Column::new("client", |p: &Payment| p.client),
//!     Column::new("memo", |p: &Payment| p.memo),
//! ];
//!
//! assert_eq!(
//!     serialize(&payments, &columns, None).unwrap(),
//!     "client;memo\r\n1;\"rent; march\"\r\n"
//! );
//!
//! let comma = PartialOptions::default().with_delimiter(",");
//! assert_eq!(
//!     serialize(&payments, &columns, Some(comma)).unwrap(),
//!     "client,memo\r\n1,rent; march\r\n"
//! );
//! ```

// Module declarations
pub mod core;
pub mod sequence;
pub mod types;

pub use self::core::{
    build_header, build_line, build_record_line, escape_field, normalize_options, to_text,
};
pub use sequence::{
    serialize, serialize_async_sequence, serialize_sequence, LineStream, Lines,
};
pub use types::{
    BoxError, Column, Extractor, FieldValue, PartialOptions, SerializeError, SerializeOptions,
    ToText,
};
