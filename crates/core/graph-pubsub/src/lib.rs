// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

//! In-process publish/subscribe over named channels.
//!
//! Every subscriber of a channel receives every message published after it subscribed. Delivery
//! is best-effort: a subscriber that falls behind by more than the channel capacity skips the
//! messages it missed.

use std::{
    collections::HashMap,
    pin::Pin,
    sync::{
        Arc, Mutex, MutexGuard,
        atomic::{AtomicU64, Ordering},
    },
    task::{Context, Poll, ready},
};

use futures::Stream;
use tokio::sync::broadcast;
use tokio_stream::wrappers::{BroadcastStream, errors::BroadcastStreamRecvError};
use tracing::{debug, warn};

use graph_model::value::Val;

pub const DEFAULT_CAPACITY: usize = 1024;

struct Channel {
    id: u64,
    sender: broadcast::Sender<Val>,
}

struct Registry {
    channels: Mutex<HashMap<String, Channel>>,
    next_id: AtomicU64,
    capacity: usize,
}

impl Registry {
    fn channels(&self) -> MutexGuard<'_, HashMap<String, Channel>> {
        // The map stays consistent even if a holder panicked
        self.channels
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

#[derive(Clone)]
pub struct PubSub {
    registry: Arc<Registry>,
}

impl PubSub {
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            registry: Arc::new(Registry {
                channels: Mutex::new(HashMap::new()),
                next_id: AtomicU64::new(0),
                capacity: capacity.max(1),
            }),
        }
    }

    /// Publish a message to every current subscriber of `channel`. Returns the number of
    /// subscribers reached.
    pub fn publish(&self, channel: &str, message: Val) -> usize {
        let sender = self
            .registry
            .channels()
            .get(channel)
            .map(|c| c.sender.clone());

        match sender {
            Some(sender) => sender.send(message).unwrap_or(0),
            None => {
                debug!(channel, "Message published without subscribers");
                0
            }
        }
    }

    pub fn subscribe(&self, channel: &str) -> Subscription {
        let mut channels = self.registry.channels();
        let entry = channels.entry(channel.to_string()).or_insert_with(|| {
            debug!(channel, "Opening channel");
            Channel {
                id: self.registry.next_id.fetch_add(1, Ordering::Relaxed),
                sender: broadcast::channel(self.registry.capacity).0,
            }
        });

        Subscription {
            channel: channel.to_string(),
            channel_id: entry.id,
            stream: BroadcastStream::new(entry.sender.subscribe()),
            registry: self.registry.clone(),
        }
    }

    /// Close `channel`, ending the streams of its subscribers.
    pub fn close(&self, channel: &str) -> bool {
        self.registry.channels().remove(channel).is_some()
    }

    pub fn channel_count(&self) -> usize {
        self.registry.channels().len()
    }

    pub fn subscriber_count(&self, channel: &str) -> usize {
        self.registry
            .channels()
            .get(channel)
            .map(|c| c.sender.receiver_count())
            .unwrap_or(0)
    }
}

impl Default for PubSub {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for PubSub {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PubSub")
            .field("channels", &self.channel_count())
            .finish()
    }
}

/// The messages of one channel, as seen by one subscriber. Dropping it unsubscribes.
pub struct Subscription {
    channel: String,
    channel_id: u64,
    stream: BroadcastStream<Val>,
    registry: Arc<Registry>,
}

impl Subscription {
    pub fn channel(&self) -> &str {
        &self.channel
    }
}

impl Stream for Subscription {
    type Item = Val;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        let this = self.get_mut();

        loop {
            match ready!(Pin::new(&mut this.stream).poll_next(cx)) {
                Some(Ok(message)) => return Poll::Ready(Some(message)),
                Some(Err(BroadcastStreamRecvError::Lagged(skipped))) => {
                    warn!(
                        channel = this.channel,
                        skipped, "Subscriber lagged behind, skipping messages"
                    );
                }
                None => return Poll::Ready(None),
            }
        }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        let mut channels = self.registry.channels();

        // Our own receiver is still counted here
        let last = channels
            .get(&self.channel)
            .is_some_and(|c| c.id == self.channel_id && c.sender.receiver_count() <= 1);

        if last {
            debug!(channel = self.channel, "Closing channel without subscribers");
            channels.remove(&self.channel);
        }
    }
}
