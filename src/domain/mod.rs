//! Domain layer - Core business logic with no external dependencies
//!
//! This layer contains:
//! - Entities: Core business objects (Quote, ParsedCommand, Message, Reply)
//! - Traits: Abstractions for infrastructure (BucketStore, ChatTransport, ScriptRunner)

pub mod entities;
pub mod traits;
