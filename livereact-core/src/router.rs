use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::debug;

use crate::error::Error;
use crate::hub::ReactionHub;
use crate::models::{PresentationId, ReactionEvent, ReactionKind};
use crate::store::CounterStore;

/// Inbound reaction frame as received from a viewer.
///
/// One recognized field; everything else a client sends is ignored.
#[derive(Debug, Deserialize)]
struct InboundFrame {
    reaction_type: Option<String>,
}

/// Outbound reaction frame as broadcast to viewers.
///
/// Recipients get the validated value re-encoded, never the raw inbound bytes.
#[derive(Debug, Serialize)]
struct OutboundReaction {
    reaction_type: ReactionKind,
}

/// Result of handling one inbound frame.
///
/// Everything except `Delivered` is recoverable: the offending frame is
/// dropped and the connection stays open.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InboundOutcome {
    /// Frame validated and fanned out to `recipients` queues
    Delivered { recipients: usize },
    /// Payload was not parseable as JSON
    MalformedPayload,
    /// Payload parsed but carried no `reaction_type` field
    MissingField,
    /// `reaction_type` was present but outside the closed set
    InvalidKind,
}

/// Validates inbound reaction frames and fans them out through the hub.
///
/// The durable counter increment runs on its own task: fan-out never waits on
/// storage and a storage failure never suppresses the live broadcast.
#[derive(Clone)]
pub struct ReactionRouter {
    hub: Arc<ReactionHub>,
    store: Arc<dyn CounterStore>,
}

impl ReactionRouter {
    pub fn new(hub: Arc<ReactionHub>, store: Arc<dyn CounterStore>) -> Self {
        Self { hub, store }
    }

    /// Handle one raw inbound frame from a viewer of `presentation_id`.
    pub fn handle_inbound(&self, presentation_id: &PresentationId, raw: &str) -> InboundOutcome {
        let frame: InboundFrame = match serde_json::from_str(raw) {
            Ok(frame) => frame,
            Err(e) => {
                debug!(
                    presentation_id = %presentation_id.as_str(),
                    error = %e,
                    "Dropping malformed reaction frame"
                );
                return InboundOutcome::MalformedPayload;
            }
        };

        let Some(raw_kind) = frame.reaction_type else {
            debug!(
                presentation_id = %presentation_id.as_str(),
                "Dropping reaction frame without reaction_type"
            );
            return InboundOutcome::MissingField;
        };

        let Some(kind) = ReactionKind::parse(&raw_kind) else {
            debug!(
                presentation_id = %presentation_id.as_str(),
                reaction_type = %raw_kind,
                "Dropping reaction frame with unknown reaction_type"
            );
            return InboundOutcome::InvalidKind;
        };

        let event = ReactionEvent::new(presentation_id.clone(), kind);
        self.dispatch(event)
    }

    /// Fan out a validated event and kick off the durable count.
    fn dispatch(&self, event: ReactionEvent) -> InboundOutcome {
        let encoded = match serde_json::to_string(&OutboundReaction {
            reaction_type: event.kind,
        }) {
            Ok(encoded) => encoded,
            Err(e) => {
                // A fixed-shape frame failing to serialize means a bug, not a
                // bad client; drop the frame and keep the connection.
                debug!(error = %e, "Failed to encode outbound reaction frame");
                return InboundOutcome::MalformedPayload;
            }
        };

        let recipients = self.hub.broadcast(&event.presentation_id, encoded);

        // Counting is a separate pipeline from fan-out. NotFound is expected
        // for presentations that only ever existed as a live group.
        let store = Arc::clone(&self.store);
        tokio::spawn(async move {
            if let Err(e) = store.increment(&event.presentation_id, event.kind).await {
                match e {
                    Error::NotFound(_) => debug!(
                        presentation_id = %event.presentation_id.as_str(),
                        "Reaction counted against unknown presentation, skipping"
                    ),
                    other => debug!(
                        presentation_id = %event.presentation_id.as_str(),
                        error = %other,
                        "Failed to increment reaction counter"
                    ),
                }
            }
        });

        InboundOutcome::Delivered { recipients }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryCounterStore;

    fn pid(s: &str) -> PresentationId {
        PresentationId::from_string(s.to_string())
    }

    fn router_with_hub() -> (ReactionRouter, Arc<ReactionHub>) {
        let hub = Arc::new(ReactionHub::new(8));
        let store = Arc::new(MemoryCounterStore::new());
        (ReactionRouter::new(hub.clone(), store), hub)
    }

    #[tokio::test]
    async fn test_valid_reaction_is_broadcast() {
        let (router, hub) = router_with_hub();
        let presentation = pid("p1");
        let mut rx = hub.subscribe(presentation.clone(), "conn1".to_string());

        let outcome = router.handle_inbound(&presentation, r#"{"reaction_type": "heart"}"#);
        assert_eq!(outcome, InboundOutcome::Delivered { recipients: 1 });

        assert_eq!(rx.recv().await.unwrap(), r#"{"reaction_type":"heart"}"#);
    }

    #[tokio::test]
    async fn test_invalid_kind_is_recoverable() {
        let (router, hub) = router_with_hub();
        let presentation = pid("p1");
        let mut rx = hub.subscribe(presentation.clone(), "conn1".to_string());

        let outcome = router.handle_inbound(&presentation, r#"{"reaction_type": "nope"}"#);
        assert_eq!(outcome, InboundOutcome::InvalidKind);

        // Connection membership untouched, nothing broadcast
        assert_eq!(hub.subscriber_count(&presentation), 1);
        let nothing =
            tokio::time::timeout(std::time::Duration::from_millis(50), rx.recv()).await;
        assert!(nothing.is_err());
    }

    #[tokio::test]
    async fn test_missing_field_is_recoverable() {
        let (router, hub) = router_with_hub();
        let presentation = pid("p1");
        let _rx = hub.subscribe(presentation.clone(), "conn1".to_string());

        let outcome = router.handle_inbound(&presentation, "{}");
        assert_eq!(outcome, InboundOutcome::MissingField);
        assert_eq!(hub.subscriber_count(&presentation), 1);
    }

    #[tokio::test]
    async fn test_malformed_payload_is_recoverable() {
        let (router, hub) = router_with_hub();
        let presentation = pid("p1");
        let _rx = hub.subscribe(presentation.clone(), "conn1".to_string());

        let outcome = router.handle_inbound(&presentation, "not json at all");
        assert_eq!(outcome, InboundOutcome::MalformedPayload);
        assert_eq!(hub.subscriber_count(&presentation), 1);
    }

    #[tokio::test]
    async fn test_sender_receives_own_echo() {
        let (router, hub) = router_with_hub();
        let presentation = pid("p1");
        let mut rx_sender = hub.subscribe(presentation.clone(), "sender".to_string());
        let mut rx_other = hub.subscribe(presentation.clone(), "other".to_string());

        let outcome = router.handle_inbound(&presentation, r#"{"reaction_type":"laugh"}"#);
        assert_eq!(outcome, InboundOutcome::Delivered { recipients: 2 });

        assert_eq!(rx_sender.recv().await.unwrap(), r#"{"reaction_type":"laugh"}"#);
        assert_eq!(rx_other.recv().await.unwrap(), r#"{"reaction_type":"laugh"}"#);
    }

    #[tokio::test]
    async fn test_other_groups_never_receive() {
        let (router, hub) = router_with_hub();
        let p1 = pid("p1");
        let p2 = pid("p2");
        let _rx_a = hub.subscribe(p1.clone(), "conn_a".to_string());
        let mut rx_c = hub.subscribe(p2.clone(), "conn_c".to_string());

        let outcome = router.handle_inbound(&p1, r#"{"reaction_type":"surprise"}"#);
        assert_eq!(outcome, InboundOutcome::Delivered { recipients: 1 });

        let nothing =
            tokio::time::timeout(std::time::Duration::from_millis(50), rx_c.recv()).await;
        assert!(nothing.is_err(), "p2 viewer must not see p1 reactions");
    }

    #[tokio::test]
    async fn test_counter_increment_runs_independently() {
        let hub = Arc::new(ReactionHub::new(8));
        let store = Arc::new(MemoryCounterStore::new());
        let router = ReactionRouter::new(hub.clone(), store.clone());

        let created = store
            .create("Talk".to_string(), String::new())
            .await
            .unwrap();

        // No subscribers at all: broadcast reaches nobody but the count still
        // lands
        let outcome = router.handle_inbound(&created.id, r#"{"reaction_type":"thumbs_up"}"#);
        assert_eq!(outcome, InboundOutcome::Delivered { recipients: 0 });

        // The increment task runs on the same runtime; yield until it lands
        for _ in 0..100 {
            tokio::task::yield_now().await;
            if store.get(&created.id).await.unwrap().counts.thumbs_up == 1 {
                return;
            }
        }
        panic!("counter increment never applied");
    }
}
