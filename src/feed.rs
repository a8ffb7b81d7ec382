//! Feed task decoding one push message stream in arrival order

use futures::{Stream, StreamExt};
use std::sync::{Arc, PoisonError, RwLock};
use std::time::Duration;
use tokio::sync::watch;
use tokio_stream::wrappers::WatchStream;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, trace, warn};

use crate::framing::{PushMessage, decode_push};
use crate::history::{DisplayLog, RetentionPolicy};
use crate::source::MessageSource;
use crate::types::Schema;

/// Consecutive source errors tolerated before the feed stops.
const MAX_SOURCE_ERRORS: u32 = 10;

/// Handle to a running push feed.
///
/// A single task owns the source and decodes messages strictly in arrival
/// order, appending each to a bounded [`DisplayLog`] and publishing it as the
/// latest message. Dropping the handle stops the task.
pub struct Feed {
    latest: watch::Receiver<Option<Arc<PushMessage>>>,
    log: Arc<RwLock<DisplayLog>>,
    cancel: CancellationToken,
}

impl Feed {
    /// Spawn the feed task for `source`, decoding against the dashboard schema.
    ///
    /// Must be called from within a tokio runtime.
    pub fn spawn<S>(source: S, schema: Arc<Schema>, policy: RetentionPolicy) -> Self
    where
        S: MessageSource,
    {
        let (latest_tx, latest_rx) = watch::channel(None);
        let log = Arc::new(RwLock::new(DisplayLog::new(policy)));
        let cancel = CancellationToken::new();

        let task_log = Arc::clone(&log);
        let task_cancel = cancel.clone();
        tokio::spawn(async move {
            Self::reader_task(source, schema, latest_tx, task_log, task_cancel).await;
        });

        Self { latest: latest_rx, log, cancel }
    }

    async fn reader_task<S>(
        mut source: S,
        schema: Arc<Schema>,
        latest_tx: watch::Sender<Option<Arc<PushMessage>>>,
        log: Arc<RwLock<DisplayLog>>,
        cancel: CancellationToken,
    ) where
        S: MessageSource,
    {
        info!("Push feed started");
        let mut message_count = 0u64;
        let mut skipped_count = 0u64;
        let mut error_count = 0u32;

        loop {
            let result = tokio::select! {
                _ = cancel.cancelled() => {
                    info!("Push feed cancelled");
                    break;
                }
                result = source.next_message() => result,
            };

            match result {
                Ok(Some(bytes)) => {
                    error_count = 0;

                    // Malformed messages are not transient; skip rather than retry
                    let message = match decode_push(&bytes, &schema) {
                        Ok(message) => Arc::new(message),
                        Err(e) => {
                            skipped_count += 1;
                            warn!(error = %e, bytes = bytes.len(), "Skipping malformed push message");
                            continue;
                        }
                    };

                    message_count += 1;
                    trace!("Message {}: timestamp={}", message_count, message.timestamp);

                    if let Some(evicted) = log
                        .write()
                        .unwrap_or_else(PoisonError::into_inner)
                        .push(Arc::clone(&message))
                    {
                        trace!(timestamp = evicted.timestamp, "Evicted oldest display entry");
                    }

                    if latest_tx.send(Some(message)).is_err() {
                        debug!("Feed receiver dropped, shutting down");
                        break;
                    }
                }
                Ok(None) => {
                    info!("Push source ended after {} messages", message_count);
                    break;
                }
                Err(e) => {
                    error_count += 1;
                    error!("Push source error ({}/{}): {}", error_count, MAX_SOURCE_ERRORS, e);

                    if error_count >= MAX_SOURCE_ERRORS {
                        error!("Too many push source errors, shutting down");
                        break;
                    }

                    // Exponential backoff: 100ms, 200ms, 400ms, ...
                    let backoff = Duration::from_millis(50 * (1 << error_count.min(5)));
                    tokio::time::sleep(backoff).await;
                }
            }
        }

        info!(
            "Push feed ended (decoded {} messages, skipped {})",
            message_count, skipped_count
        );
    }

    /// Most recently decoded message.
    pub fn latest(&self) -> Option<Arc<PushMessage>> {
        self.latest.borrow().clone()
    }

    /// Stream of decoded messages with latest-wins semantics.
    ///
    /// Consumers that fall behind observe the newest message; the full
    /// sequence is kept in [`Feed::history`].
    pub fn updates(&self) -> impl Stream<Item = Arc<PushMessage>> + 'static {
        WatchStream::new(self.latest.clone()).filter_map(|opt| async move { opt })
    }

    /// Snapshot of the display log, oldest first.
    pub fn history(&self) -> Vec<Arc<PushMessage>> {
        self.log.read().unwrap_or_else(PoisonError::into_inner).to_vec()
    }

    /// Messages newer than `timestamp`, oldest first.
    pub fn since(&self, timestamp: u32) -> Vec<Arc<PushMessage>> {
        self.log.read().unwrap_or_else(PoisonError::into_inner).since(timestamp)
    }

    /// Resolves once the feed task has ended.
    pub async fn finished(&self) {
        let mut rx = self.latest.clone();
        while rx.changed().await.is_ok() {}
    }

    /// Stop the feed task.
    pub fn stop(&self) {
        self.cancel.cancel();
    }
}

impl Drop for Feed {
    fn drop(&mut self) {
        debug!("Dropping push feed");
        self.cancel.cancel();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::CodecError;
    use crate::source::ReplaySource;
    use crate::types::{FieldDescriptor, FieldType};

    fn schema() -> Arc<Schema> {
        Arc::new(Schema::new(vec![FieldDescriptor::new("level", FieldType::UInt16)]).unwrap())
    }

    fn message(timestamp: u32, level: u16) -> Vec<u8> {
        let mut bytes = timestamp.to_le_bytes().to_vec();
        bytes.extend_from_slice(&level.to_le_bytes());
        bytes
    }

    #[tokio::test]
    async fn messages_are_logged_in_arrival_order_and_bad_ones_skipped() {
        let _ = tracing_subscriber::fmt::try_init();

        let source = ReplaySource::new(vec![
            message(30, 1),
            vec![0x01, 0x02],
            message(10, 2),
            message(20, 3),
        ]);
        let feed = Feed::spawn(source, schema(), RetentionPolicy::default());
        feed.finished().await;

        let history: Vec<(u32, u16)> = feed
            .history()
            .iter()
            .map(|m| (m.timestamp, m.record.get::<u16>("level").unwrap()))
            .collect();
        assert_eq!(history, [(30, 1), (10, 2), (20, 3)]);
        assert_eq!(feed.latest().unwrap().timestamp, 20);
    }

    #[tokio::test]
    async fn retention_bounds_history() {
        let source = ReplaySource::new((0..10).map(|ts| message(ts, ts as u16)));
        let feed = Feed::spawn(source, schema(), RetentionPolicy::new(4));
        feed.finished().await;

        let timestamps: Vec<u32> = feed.history().iter().map(|m| m.timestamp).collect();
        assert_eq!(timestamps, [6, 7, 8, 9]);
        assert_eq!(feed.since(7).len(), 2);
    }

    struct FlakySource {
        failures: u32,
        inner: ReplaySource,
    }

    #[async_trait::async_trait]
    impl MessageSource for FlakySource {
        async fn next_message(&mut self) -> crate::Result<Option<Vec<u8>>> {
            if self.failures > 0 {
                self.failures -= 1;
                return Err(CodecError::source_failed("socket hiccup"));
            }
            self.inner.next_message().await
        }
    }

    #[tokio::test]
    async fn source_errors_are_retried() {
        let source = FlakySource { failures: 1, inner: ReplaySource::new(vec![message(1, 42)]) };
        let feed = Feed::spawn(source, schema(), RetentionPolicy::default());
        feed.finished().await;
        assert_eq!(feed.latest().unwrap().record.get::<u16>("level"), Some(42));
    }

    #[tokio::test]
    async fn updates_stream_yields_latest_message() {
        let (tx, source) = crate::source::ChannelSource::channel(8);
        let feed = Feed::spawn(source, schema(), RetentionPolicy::default());
        let mut updates = Box::pin(feed.updates());

        tx.send(message(5, 9)).await.unwrap();
        let update = tokio::time::timeout(Duration::from_secs(1), updates.next())
            .await
            .expect("update within timeout")
            .expect("stream open");
        assert_eq!(update.timestamp, 5);

        feed.stop();
        feed.finished().await;
    }
}
