//! Infrastructure layer - External concerns
//!
//! This layer contains:
//! - Config: Configuration loading
//! - Storage: SQLite bucket store
//! - Scripts: Local executables as an answer source
//! - Adapters: Chat transports (IRC, console)
//! - Api: HTTP surface over the store

pub mod adapters;
pub mod api;
pub mod config;
pub mod scripts;
pub mod storage;
