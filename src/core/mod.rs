//! Core formatting module
//!
//! This module contains the stateless line-building logic shared by every
//! producer:
//! - `format` - Option normalization, field conversion, escaping and line assembly

pub mod format;

pub use format::{
    build_header, build_line, build_record_line, escape_field, normalize_options, to_text,
};
