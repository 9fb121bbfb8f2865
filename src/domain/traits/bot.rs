use async_trait::async_trait;
use crate::application::errors::BotError;

/// Chat transport - abstraction for the channel the bot lives in
#[async_trait]
pub trait ChatTransport: Send + Sync {
    /// Send one line to the channel
    async fn send_message(&self, text: &str) -> Result<(), BotError>;

    /// Get bot info
    fn bot_info(&self) -> BotInfo;
}

/// Bot information
#[derive(Debug, Clone)]
pub struct BotInfo {
    pub nickname: String,
    pub realname: String,
    pub channel: String,
}
