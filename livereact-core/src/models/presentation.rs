use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{PresentationId, ReactionKind};

/// Durable reaction counters for one presentation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReactionCounts {
    pub thumbs_up: u64,
    pub heart: u64,
    pub laugh: u64,
    pub surprise: u64,
}

impl ReactionCounts {
    pub fn increment(&mut self, kind: ReactionKind) {
        match kind {
            ReactionKind::ThumbsUp => self.thumbs_up += 1,
            ReactionKind::Heart => self.heart += 1,
            ReactionKind::Laugh => self.laugh += 1,
            ReactionKind::Surprise => self.surprise += 1,
        }
    }

    #[must_use]
    pub const fn total(&self) -> u64 {
        self.thumbs_up + self.heart + self.laugh + self.surprise
    }
}

/// A presentation record as stored by the `CounterStore` collaborator.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Presentation {
    pub id: PresentationId,
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub created_at: DateTime<Utc>,
    #[serde(flatten)]
    pub counts: ReactionCounts,
}

impl Presentation {
    #[must_use]
    pub fn new(title: String, description: String) -> Self {
        Self {
            id: PresentationId::new(),
            title,
            description,
            created_at: Utc::now(),
            counts: ReactionCounts::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_increment_counts() {
        let mut counts = ReactionCounts::default();
        counts.increment(ReactionKind::Heart);
        counts.increment(ReactionKind::Heart);
        counts.increment(ReactionKind::Laugh);

        assert_eq!(counts.heart, 2);
        assert_eq!(counts.laugh, 1);
        assert_eq!(counts.thumbs_up, 0);
        assert_eq!(counts.total(), 3);
    }

    #[test]
    fn test_counts_serialize_flat() {
        let presentation = Presentation::new("Demo".to_string(), String::new());
        let value = serde_json::to_value(&presentation).unwrap();

        // Counters appear as top-level fields, not nested
        assert_eq!(value["thumbs_up"], 0);
        assert_eq!(value["heart"], 0);
        assert!(value.get("counts").is_none());
    }
}
