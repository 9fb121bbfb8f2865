//! Console adapter for development/testing

use async_trait::async_trait;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};

use super::deliver;
use crate::application::errors::BotError;
use crate::application::messaging::CommandDispatcher;
use crate::domain::entities::Message;
use crate::domain::traits::{BotInfo, ChatTransport};

/// Sender identity of lines typed on the console
pub const CONSOLE_SENDER: &str = "console";

/// Console bot adapter for local development
pub struct ConsoleAdapter {
    info: BotInfo,
}

impl ConsoleAdapter {
    pub fn new(nickname: impl Into<String>) -> Self {
        Self {
            info: BotInfo {
                nickname: nickname.into(),
                realname: "console".to_string(),
                channel: "console".to_string(),
            },
        }
    }

    /// Read stdin until EOF, dispatching each line like a channel message
    pub async fn run(self: Arc<Self>, dispatcher: Arc<CommandDispatcher>) -> Result<(), BotError> {
        tracing::info!("Starting console bot (dev mode) as {}", self.info.nickname);

        let mut lines = BufReader::new(tokio::io::stdin()).lines();
        while let Some(input) = lines
            .next_line()
            .await
            .map_err(|e| BotError::Transport(e.to_string()))?
        {
            if input.is_empty() {
                continue;
            }

            let message = Message::new(CONSOLE_SENDER, input).with_platform("console");
            let adapter = Arc::clone(&self);
            let dispatcher = Arc::clone(&dispatcher);
            tokio::spawn(async move {
                if let Some(reply) = dispatcher.dispatch(&message).await {
                    deliver(adapter.as_ref(), reply).await;
                }
            });
        }

        tracing::info!("Console closed");
        Ok(())
    }
}

#[async_trait]
impl ChatTransport for ConsoleAdapter {
    async fn send_message(&self, text: &str) -> Result<(), BotError> {
        println!("[{}] {}", self.info.nickname, text);
        Ok(())
    }

    fn bot_info(&self) -> BotInfo {
        self.info.clone()
    }
}
