//! Domain traits - Abstractions for infrastructure implementations

pub mod bot;
pub mod script;
pub mod store;

pub use bot::{BotInfo, ChatTransport};
pub use script::ScriptRunner;
pub use store::BucketStore;
