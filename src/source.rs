//! Message source trait for push-style transports

use std::collections::VecDeque;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::time::{Interval, MissedTickBehavior, interval};
use tracing::{debug, trace};

use crate::Result;

/// Trait for push message transports.
///
/// A source yields one complete message per call; message boundaries are the
/// transport's concern. Sources handle their own timing internally.
#[async_trait::async_trait]
pub trait MessageSource: Send + 'static {
    /// Get the next raw push message
    ///
    /// Returns:
    /// - `Ok(Some(bytes))` - Message received
    /// - `Ok(None)` - Stream ended (normal termination)
    /// - `Err(e)` - Transport error; the caller decides whether to retry
    async fn next_message(&mut self) -> Result<Option<Vec<u8>>>;
}

/// Source fed by a transport task through a bounded channel.
///
/// The stream ends once every sender has been dropped.
pub struct ChannelSource {
    rx: mpsc::Receiver<Vec<u8>>,
}

impl ChannelSource {
    pub fn new(rx: mpsc::Receiver<Vec<u8>>) -> Self {
        Self { rx }
    }

    /// Create a source together with the sender the transport writes into.
    pub fn channel(buffer: usize) -> (mpsc::Sender<Vec<u8>>, Self) {
        let (tx, rx) = mpsc::channel(buffer.max(1));
        (tx, Self::new(rx))
    }
}

#[async_trait::async_trait]
impl MessageSource for ChannelSource {
    async fn next_message(&mut self) -> Result<Option<Vec<u8>>> {
        Ok(self.rx.recv().await)
    }
}

/// Source replaying captured messages from memory, optionally paced.
pub struct ReplaySource {
    messages: VecDeque<Vec<u8>>,
    pacing: Option<Duration>,
    /// Created on first read so the source can be built outside a runtime
    interval: Option<Interval>,
}

impl ReplaySource {
    pub fn new<I>(messages: I) -> Self
    where
        I: IntoIterator<Item = Vec<u8>>,
    {
        Self { messages: messages.into_iter().collect(), pacing: None, interval: None }
    }

    /// Emit at most one message per `period`.
    pub fn with_pacing(mut self, period: Duration) -> Self {
        self.pacing = Some(period);
        self.interval = None;
        self
    }

    /// Number of messages not yet replayed.
    pub fn remaining(&self) -> usize {
        self.messages.len()
    }
}

#[async_trait::async_trait]
impl MessageSource for ReplaySource {
    async fn next_message(&mut self) -> Result<Option<Vec<u8>>> {
        if self.messages.is_empty() {
            debug!("Reached end of replay");
            return Ok(None);
        }

        if let Some(period) = self.pacing {
            let ticker = self.interval.get_or_insert_with(|| {
                let mut ticker = interval(period);
                ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
                ticker
            });
            ticker.tick().await;
        }

        let message = self.messages.pop_front();
        trace!(remaining = self.messages.len(), "Replaying push message");
        Ok(message)
    }
}
