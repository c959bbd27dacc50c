use dashmap::DashMap;
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::models::PresentationId;

/// Handle for a viewer connection subscription
pub type ConnectionId = String;

/// Encoded outbound frame, ready to write to the transport
pub type OutboundFrame = String;

/// Subscriber information
#[derive(Debug, Clone)]
pub struct Subscriber {
    pub connection_id: ConnectionId,
    sender: mpsc::Sender<OutboundFrame>,
}

/// In-memory hub routing reaction frames to the live connections watching a
/// presentation.
///
/// Each subscriber owns a bounded send queue: broadcast enqueues with
/// `try_send`, so one slow viewer drops its own frames instead of stalling
/// fan-out to the rest of the group.
#[derive(Clone)]
pub struct ReactionHub {
    /// Map of presentation_id -> list of subscribers
    groups: Arc<DashMap<PresentationId, Vec<Subscriber>>>,

    /// Map of connection_id -> presentation_id for cleanup
    connections: Arc<DashMap<ConnectionId, PresentationId>>,

    /// Capacity of each subscriber's outbound queue
    queue_capacity: usize,
}

impl ReactionHub {
    #[must_use]
    pub fn new(queue_capacity: usize) -> Self {
        Self {
            groups: Arc::new(DashMap::new()),
            connections: Arc::new(DashMap::new()),
            queue_capacity: queue_capacity.max(1),
        }
    }

    /// Subscribe a connection to a presentation's reaction stream.
    ///
    /// Creates the group lazily. A connection id belongs to at most one group:
    /// re-subscribing an id that is already joined replaces the stale entry
    /// rather than adding a second one. Returns the receiving end of the
    /// connection's bounded outbound queue.
    pub fn subscribe(
        &self,
        presentation_id: PresentationId,
        connection_id: ConnectionId,
    ) -> mpsc::Receiver<OutboundFrame> {
        if self.connections.contains_key(&connection_id) {
            debug!(
                connection_id = %connection_id,
                "Connection re-subscribed, discarding previous membership"
            );
            self.unsubscribe(&connection_id);
        }

        let (tx, rx) = mpsc::channel(self.queue_capacity);

        let subscriber = Subscriber {
            connection_id: connection_id.clone(),
            sender: tx,
        };

        self.groups
            .entry(presentation_id.clone())
            .or_default()
            .push(subscriber);

        self.connections
            .insert(connection_id.clone(), presentation_id.clone());

        info!(
            presentation_id = %presentation_id.as_str(),
            connection_id = %connection_id,
            "Viewer subscribed to presentation"
        );

        rx
    }

    /// Unsubscribe a connection from its presentation.
    ///
    /// No-op for unknown ids: both the connection's own teardown path and the
    /// broadcast-side cleanup of closed queues may race here.
    pub fn unsubscribe(&self, connection_id: &str) {
        let Some((_, presentation_id)) = self.connections.remove(connection_id) else {
            debug!(
                connection_id = %connection_id,
                "Unsubscribe for unknown connection, ignoring"
            );
            return;
        };

        if let Some(mut subscribers) = self.groups.get_mut(&presentation_id) {
            subscribers.retain(|sub| sub.connection_id != connection_id);

            if subscribers.is_empty() {
                drop(subscribers); // Drop the RefMut before removing
                self.groups.remove(&presentation_id);
                debug!(
                    presentation_id = %presentation_id.as_str(),
                    "Presentation has no more viewers, group removed"
                );
            }
        }

        info!(
            presentation_id = %presentation_id.as_str(),
            connection_id = %connection_id,
            "Viewer unsubscribed from presentation"
        );
    }

    /// Broadcast a frame to every viewer of a presentation.
    ///
    /// Snapshots the member list before delivering so concurrent
    /// subscribe/unsubscribe never mutates the set mid-iteration. Delivery is
    /// best-effort per member: a full queue drops that single frame, a closed
    /// queue marks the connection for cleanup. Returns the delivered count.
    pub fn broadcast(&self, presentation_id: &PresentationId, frame: OutboundFrame) -> usize {
        // Clone the subscriber list under the shard lock, then release it
        // before touching any queue.
        let subscribers: Vec<Subscriber> = match self.groups.get(presentation_id) {
            Some(subscribers) => subscribers.clone(),
            None => return 0,
        };

        let mut sent_count = 0;
        let mut closed_connections = Vec::new();

        for subscriber in &subscribers {
            match subscriber.sender.try_send(frame.clone()) {
                Ok(()) => sent_count += 1,
                Err(mpsc::error::TrySendError::Full(_)) => {
                    warn!(
                        presentation_id = %presentation_id.as_str(),
                        connection_id = %subscriber.connection_id,
                        "Outbound queue full, dropping frame for slow viewer"
                    );
                }
                Err(mpsc::error::TrySendError::Closed(_)) => {
                    debug!(
                        presentation_id = %presentation_id.as_str(),
                        connection_id = %subscriber.connection_id,
                        "Outbound queue closed, marking connection for cleanup"
                    );
                    closed_connections.push(subscriber.connection_id.clone());
                }
            }
        }

        for connection_id in closed_connections {
            self.unsubscribe(&connection_id);
        }

        debug!(
            presentation_id = %presentation_id.as_str(),
            sent_count = sent_count,
            "Reaction broadcast complete"
        );

        sent_count
    }

    /// Number of viewers subscribed to a presentation
    #[must_use]
    pub fn subscriber_count(&self, presentation_id: &PresentationId) -> usize {
        self.groups
            .get(presentation_id)
            .map(|subscribers| subscribers.len())
            .unwrap_or(0)
    }

    /// Number of presentations with at least one viewer
    #[must_use]
    pub fn group_count(&self) -> usize {
        self.groups.len()
    }

    /// Total number of live connections
    #[must_use]
    pub fn connection_count(&self) -> usize {
        self.connections.len()
    }
}

impl Default for ReactionHub {
    fn default() -> Self {
        Self::new(64)
    }
}
