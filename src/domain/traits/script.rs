use async_trait::async_trait;
use crate::application::errors::ScriptError;

/// Alternate answer source: executables named after a command
#[async_trait]
pub trait ScriptRunner: Send + Sync {
    /// Whether an executable called `name` may be run
    fn exists(&self, name: &str) -> bool;

    /// Run `name` with a single argument and return its standard output
    async fn run(&self, name: &str, arg: &str) -> Result<String, ScriptError>;
}
