//! Sequence producers
//!
//! The three entry points of the crate. They differ only in how they obtain
//! and iterate records; every line is built by the shared, stateless core in
//! [`crate::core::format`].
//!
//! - [`serialize`] - eager, over an in-memory slice, returns one `String`
//! - [`serialize_sequence`] - lazy, over any `IntoIterator`, returns [`Lines`]
//! - [`serialize_async_sequence`] - lazy, over any `Stream`, returns [`LineStream`]

pub mod r#async;
pub mod sync;

pub use self::r#async::{serialize_async_sequence, LineStream};
pub use sync::{serialize, serialize_sequence, Lines};
