//! Types module
//!
//! Contains core data structures used throughout the crate.
//! This module organizes types into logical submodules:
//! - `field`: Raw field values and their default textual form
//! - `column`: Column definitions (header + extraction function)
//! - `options`: Effective options and caller-supplied overrides
//! - `error`: Error types for line serialization

pub mod column;
pub mod error;
pub mod field;
pub mod options;

pub use column::{Column, Extractor};
pub use error::{BoxError, SerializeError};
pub use field::FieldValue;
pub use options::{PartialOptions, SerializeOptions, ToText};
