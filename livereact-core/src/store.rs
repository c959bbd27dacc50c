use async_trait::async_trait;
use dashmap::DashMap;

use crate::error::{Error, Result};
use crate::models::{Presentation, PresentationId, ReactionKind};

/// Durable counter collaborator for presentation records.
///
/// The broadcast core consumes this as a narrow boundary: it only ever calls
/// `increment`, fire-and-forget. The HTTP layer uses the full surface.
#[async_trait]
pub trait CounterStore: Send + Sync {
    /// Create a presentation record with zeroed counters
    async fn create(&self, title: String, description: String) -> Result<Presentation>;

    /// Fetch a presentation record with its current counters
    async fn get(&self, id: &PresentationId) -> Result<Presentation>;

    /// Increment the durable counter for one reaction kind
    async fn increment(&self, id: &PresentationId, kind: ReactionKind) -> Result<()>;
}

/// In-memory `CounterStore` backed by a concurrent map.
///
/// Stand-in for an external record store; counters survive for the process
/// lifetime only.
#[derive(Default)]
pub struct MemoryCounterStore {
    presentations: DashMap<PresentationId, Presentation>,
}

impl MemoryCounterStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored presentations
    #[must_use]
    pub fn len(&self) -> usize {
        self.presentations.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.presentations.is_empty()
    }
}

#[async_trait]
impl CounterStore for MemoryCounterStore {
    async fn create(&self, title: String, description: String) -> Result<Presentation> {
        let presentation = Presentation::new(title, description);
        self.presentations
            .insert(presentation.id.clone(), presentation.clone());
        Ok(presentation)
    }

    async fn get(&self, id: &PresentationId) -> Result<Presentation> {
        self.presentations
            .get(id)
            .map(|entry| entry.clone())
            .ok_or_else(|| Error::NotFound(format!("Presentation not found: {id}")))
    }

    async fn increment(&self, id: &PresentationId, kind: ReactionKind) -> Result<()> {
        let mut entry = self
            .presentations
            .get_mut(id)
            .ok_or_else(|| Error::NotFound(format!("Presentation not found: {id}")))?;
        entry.counts.increment(kind);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_create_and_get() {
        let store = MemoryCounterStore::new();
        let created = store
            .create("My talk".to_string(), "About things".to_string())
            .await
            .unwrap();

        let fetched = store.get(&created.id).await.unwrap();
        assert_eq!(fetched.title, "My talk");
        assert_eq!(fetched.description, "About things");
        assert_eq!(fetched.counts.total(), 0);
    }

    #[tokio::test]
    async fn test_increment_unknown_presentation() {
        let store = MemoryCounterStore::new();
        let missing = PresentationId::from_string("missing".to_string());

        let err = store
            .increment(&missing, ReactionKind::Heart)
            .await
            .unwrap_err();
        assert!(matches!(err, Error::NotFound(_)));
    }

    #[tokio::test]
    async fn test_increment_accumulates() {
        let store = MemoryCounterStore::new();
        let created = store.create("Talk".to_string(), String::new()).await.unwrap();

        store.increment(&created.id, ReactionKind::Heart).await.unwrap();
        store.increment(&created.id, ReactionKind::Heart).await.unwrap();
        store
            .increment(&created.id, ReactionKind::Surprise)
            .await
            .unwrap();

        let fetched = store.get(&created.id).await.unwrap();
        assert_eq!(fetched.counts.heart, 2);
        assert_eq!(fetched.counts.surprise, 1);
        assert_eq!(fetched.counts.total(), 3);
    }
}
