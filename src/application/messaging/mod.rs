//! Message handling - Parsing and dispatching channel lines

pub mod dispatcher;
pub mod parser;

pub use dispatcher::{CommandDispatcher, DispatchSettings};
pub use parser::MessageParser;
