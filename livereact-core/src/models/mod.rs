pub mod id;
pub mod presentation;
pub mod reaction;

pub use id::PresentationId;
pub use presentation::{Presentation, ReactionCounts};
pub use reaction::{ReactionEvent, ReactionKind};
