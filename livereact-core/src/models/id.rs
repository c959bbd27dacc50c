use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Presentation ID type (UUIDv4, stored as its string form)
///
/// The broadcast core treats this as an opaque token: any identifier a client
/// supplies on its connection target is accepted without a storage lookup.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PresentationId(pub String);

impl PresentationId {
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    #[must_use]
    pub const fn from_string(id: String) -> Self {
        Self(id)
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for PresentationId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for PresentationId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for PresentationId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for PresentationId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}
