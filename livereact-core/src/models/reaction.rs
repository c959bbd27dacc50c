use serde::{Deserialize, Serialize};

use super::PresentationId;
use crate::error::Error;

/// The closed set of reactions a viewer can send.
///
/// Wire values are the snake_case names, matched case-sensitively; anything
/// else is rejected at decode time so the rest of the system never sees a
/// free-form string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReactionKind {
    ThumbsUp,
    Heart,
    Laugh,
    Surprise,
}

impl ReactionKind {
    pub const ALL: [Self; 4] = [Self::ThumbsUp, Self::Heart, Self::Laugh, Self::Surprise];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::ThumbsUp => "thumbs_up",
            Self::Heart => "heart",
            Self::Laugh => "laugh",
            Self::Surprise => "surprise",
        }
    }

    /// Parse a wire value; `None` for anything outside the closed set.
    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "thumbs_up" => Some(Self::ThumbsUp),
            "heart" => Some(Self::Heart),
            "laugh" => Some(Self::Laugh),
            "surprise" => Some(Self::Surprise),
            _ => None,
        }
    }
}

impl std::fmt::Display for ReactionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for ReactionKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| Error::InvalidInput(format!("Invalid reaction type: {s}")))
    }
}

/// A validated reaction in flight.
///
/// Ephemeral: built by the router on decode, consumed by broadcast, never
/// persisted by the broadcast core.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReactionEvent {
    pub presentation_id: PresentationId,
    pub kind: ReactionKind,
}

impl ReactionEvent {
    #[must_use]
    pub const fn new(presentation_id: PresentationId, kind: ReactionKind) -> Self {
        Self {
            presentation_id,
            kind,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_closed_set() {
        assert_eq!(ReactionKind::parse("thumbs_up"), Some(ReactionKind::ThumbsUp));
        assert_eq!(ReactionKind::parse("heart"), Some(ReactionKind::Heart));
        assert_eq!(ReactionKind::parse("laugh"), Some(ReactionKind::Laugh));
        assert_eq!(ReactionKind::parse("surprise"), Some(ReactionKind::Surprise));
        assert_eq!(ReactionKind::parse("nope"), None);
        // Case-sensitive
        assert_eq!(ReactionKind::parse("Heart"), None);
        assert_eq!(ReactionKind::parse(""), None);
    }

    #[test]
    fn test_serde_wire_values() {
        for kind in ReactionKind::ALL {
            let json = serde_json::to_string(&kind).unwrap();
            assert_eq!(json, format!("\"{}\"", kind.as_str()));
            let back: ReactionKind = serde_json::from_str(&json).unwrap();
            assert_eq!(back, kind);
        }
    }
}
