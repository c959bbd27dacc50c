pub mod config;
pub mod error;
pub mod hub;
pub mod logging;
pub mod models;
pub mod router;
pub mod store;

pub use config::Config;
pub use error::{Error, Result};
pub use hub::ReactionHub;
pub use router::{InboundOutcome, ReactionRouter};
pub use store::{CounterStore, MemoryCounterStore};
