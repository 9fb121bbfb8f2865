//! Domain entities - Core business objects with no external dependencies

pub mod command;
pub mod message;
pub mod quote;

pub use command::{CommandKind, ParsedCommand};
pub use message::{Message, Reply};
pub use quote::{sub_bucket_name, Quote};
