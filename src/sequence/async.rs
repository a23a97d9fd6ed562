//! Asynchronous producer
//!
//! Provides [`LineStream`], the lazy line stream returned by
//! [`serialize_async_sequence`].
//!
//! # Design
//!
//! The stream is pull-based: the record stream is polled only while the
//! consumer polls for a line, one record per line. There is no internal
//! buffer and no prefetch, so a consumer that stops after a bounded prefix
//! leaves the rest of the record source untouched, and a slow consumer simply
//! delays the next poll.
//!
//! ```text
//! consumer poll ─► LineStream ─► record stream poll
//!                      │
//!                core::format (sync, never suspends)
//! ```
//!
//! Line building itself is synchronous; the only suspension point is the
//! record stream.

use crate::core::format::{build_header, build_record_line, normalize_options};
use crate::types::{Column, PartialOptions, SerializeError, SerializeOptions};
use futures::ready;
use futures::stream::{FusedStream, Stream};
use log::{debug, trace};
use std::borrow::Borrow;
use std::pin::Pin;
use std::task::{Context, Poll};

/// Serialize an asynchronous stream of records lazily
///
/// The returned stream yields the header line first, then one line per record
/// as each record becomes available, preserving arrival order.
///
/// # Examples
///
/// ```
/// use delimited_lines::{serialize_async_sequence, Column};
/// use futures::{executor::block_on, stream, StreamExt, TryStreamExt};
///
/// let columns = [Column::new("Value", |value: &i32| *value)];
/// let records = stream::iter(1..).filter(|n| futures::future::ready(n % 2 == 1)).take(2);
///
/// let lines: Vec<String> = block_on(
///     serialize_async_sequence(records, &columns, None).try_collect(),
/// )
/// .unwrap();
///
/// assert_eq!(lines, ["Value\r\n", "1\r\n", "3\r\n"]);
/// ```
pub fn serialize_async_sequence<'c, T, S>(
    records: S,
    columns: &'c [Column<T>],
    options: Option<PartialOptions>,
) -> LineStream<'c, T, S>
where
    S: Stream,
    S::Item: Borrow<T>,
{
    LineStream::new(records, columns, normalize_options(options))
}

/// Lazy stream over serialized lines
///
/// The record stream is pinned on the heap, so `LineStream` is `Unpin`
/// regardless of `S` and can be polled with `StreamExt::next` directly.
pub struct LineStream<'c, T, S> {
    records: Pin<Box<S>>,
    columns: &'c [Column<T>],
    options: SerializeOptions,
    header_pending: bool,
    exhausted: bool,
    next_index: u64,
}

impl<'c, T, S> LineStream<'c, T, S>
where
    S: Stream,
    S::Item: Borrow<T>,
{
    /// Create a line stream over `records` with already-normalized options
    pub fn new(records: S, columns: &'c [Column<T>], options: SerializeOptions) -> Self {
        Self {
            records: Box::pin(records),
            columns,
            options,
            header_pending: true,
            exhausted: false,
            next_index: 0,
        }
    }

    /// Effective options of this serialization
    pub fn options(&self) -> &SerializeOptions {
        &self.options
    }

    /// Number of records pulled from the record stream so far
    pub fn records_read(&self) -> u64 {
        self.next_index
    }
}

impl<'c, T, S> Stream for LineStream<'c, T, S>
where
    S: Stream,
    S::Item: Borrow<T>,
{
    type Item = Result<String, SerializeError>;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        let this = self.get_mut();

        if this.header_pending {
            this.header_pending = false;
            trace!("Emitting header line");
            return Poll::Ready(Some(Ok(build_header(this.columns, &this.options))));
        }

        if this.exhausted {
            return Poll::Ready(None);
        }

        match ready!(this.records.as_mut().poll_next(cx)) {
            Some(record) => {
                let index = this.next_index;
                this.next_index += 1;
                trace!("Emitting line for record {}", index);

                Poll::Ready(Some(
                    build_record_line(this.columns, record.borrow(), &this.options)
                        .map_err(|e| e.at_record(index)),
                ))
            }
            None => {
                this.exhausted = true;
                debug!("Record stream exhausted after {} records", this.next_index);
                Poll::Ready(None)
            }
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        if self.exhausted {
            return (0, Some(0));
        }

        let (lower, upper) = self.records.size_hint();
        let header = usize::from(self.header_pending);
        (
            lower.saturating_add(header),
            upper.and_then(|upper| upper.checked_add(header)),
        )
    }
}

impl<'c, T, S> FusedStream for LineStream<'c, T, S>
where
    S: Stream,
    S::Item: Borrow<T>,
{
    fn is_terminated(&self) -> bool {
        !self.header_pending && self.exhausted
    }
}

impl<'c, T, S> std::fmt::Debug for LineStream<'c, T, S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LineStream")
            .field("columns", &self.columns)
            .field("options", &self.options)
            .field("header_pending", &self.header_pending)
            .field("exhausted", &self.exhausted)
            .field("next_index", &self.next_index)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::FieldValue;
    use futures::stream::{self, StreamExt, TryStreamExt};
    use std::sync::atomic::{AtomicU64, Ordering};
    use std::sync::Arc;

    #[derive(Debug)]
    struct Item {
        value: u64,
    }

    fn value_column() -> Vec<Column<Item>> {
        vec![Column::new("Value", |item: &Item| item.value)]
    }

    // Infinite source of positive numbers that suspends before every record.
    fn positive_numbers(pulled: Arc<AtomicU64>) -> impl Stream<Item = u64> {
        stream::unfold(1u64, move |number| {
            let pulled = Arc::clone(&pulled);
            async move {
                tokio::task::yield_now().await;
                pulled.fetch_add(1, Ordering::SeqCst);
                Some((number, number + 1))
            }
        })
    }

    #[tokio::test]
    async fn test_serialize_async_sequence_limits_infinite_source() {
        let pulled = Arc::new(AtomicU64::new(0));
        let records = positive_numbers(Arc::clone(&pulled))
            .filter(|number| futures::future::ready(number % 2 == 1))
            .take(5)
            .map(|value| Item { value });
        let columns = value_column();

        let lines: Vec<String> = serialize_async_sequence(records, &columns, None)
            .try_collect()
            .await
            .unwrap();

        assert_eq!(
            lines,
            ["Value\r\n", "1\r\n", "3\r\n", "5\r\n", "7\r\n", "9\r\n"]
        );
        // 9 is the fifth odd number; nothing after it is pulled
        assert_eq!(pulled.load(Ordering::SeqCst), 9);
    }

    #[tokio::test]
    async fn test_no_record_is_pulled_ahead_of_demand() {
        let pulled = Arc::new(AtomicU64::new(0));
        let records = positive_numbers(Arc::clone(&pulled)).map(|value| Item { value });
        let columns = value_column();

        let mut lines = serialize_async_sequence(records, &columns, None);

        assert_eq!(lines.next().await.unwrap().unwrap(), "Value\r\n");
        assert_eq!(pulled.load(Ordering::SeqCst), 0);

        assert_eq!(lines.next().await.unwrap().unwrap(), "1\r\n");
        assert_eq!(lines.next().await.unwrap().unwrap(), "2\r\n");
        assert_eq!(pulled.load(Ordering::SeqCst), 2);
        assert_eq!(lines.records_read(), 2);

        drop(lines);
        assert_eq!(pulled.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_empty_stream_yields_header_only() {
        let columns = [Column::new("Va;\"lue", |item: &Item| item.value)];
        let mut lines = serialize_async_sequence(stream::empty::<Item>(), &columns, None);

        assert!(!lines.is_terminated());
        assert_eq!(lines.next().await.unwrap().unwrap(), "\"Va;\"\"lue\"\r\n");
        assert!(lines.next().await.is_none());
        assert!(lines.is_terminated());
        assert!(lines.next().await.is_none());
    }

    #[tokio::test]
    async fn test_failure_keeps_earlier_lines_and_continues() {
        let columns = [Column::try_new("Value", |item: &Item| {
            if item.value == 2 {
                Err("two is not allowed")
            } else {
                Ok(item.value)
            }
        })];
        let records = stream::iter((1..=3).map(|value| Item { value }));

        let results: Vec<_> = serialize_async_sequence(records, &columns, None)
            .collect()
            .await;

        assert_eq!(results.len(), 4);
        assert_eq!(results[1].as_deref().unwrap(), "1\r\n");
        let error = results[2].as_ref().unwrap_err();
        assert_eq!(error.record(), Some(1));
        assert_eq!(
            error.to_string(),
            "Failed to extract column 0 ('Value') for record 1: two is not allowed"
        );
        assert_eq!(results[3].as_deref().unwrap(), "3\r\n");
    }

    #[tokio::test]
    async fn test_borrowed_records_and_custom_options() {
        let records = vec![Item { value: 10 }, Item { value: 20 }];
        let columns = [
            Column::new("A", |item: &Item| item.value),
            Column::new("B", |item: &Item| FieldValue::from(item.value * 2)),
        ];
        let options = PartialOptions::default()
            .with_delimiter(",")
            .with_line_break("\n");

        let lines: Vec<String> =
            serialize_async_sequence(stream::iter(records.iter()), &columns, Some(options))
                .try_collect()
                .await
                .unwrap();

        assert_eq!(lines, ["A,B\n", "10,20\n", "20,40\n"]);
    }

    #[test]
    fn test_size_hint_counts_pending_header() {
        let columns = value_column();
        let records = stream::iter([Item { value: 1 }, Item { value: 2 }]);
        let lines = serialize_async_sequence(records, &columns, None);

        assert_eq!(lines.size_hint(), (3, Some(3)));
    }
}
