//! IRC adapter
//!
//! Connection, registration, PING and nickname collisions are handled by the
//! `irc` client. This adapter joins one channel, hands its PRIVMSGs to the
//! dispatcher and sends replies once the bot has joined. Each inbound message
//! runs on its own task so delayed replies never hold up the read loop.

use ::irc::client::prelude::{Client, Command, Config as ClientConfig, Sender};
use ::irc::proto::Message as IrcMessage;
use async_trait::async_trait;
use futures::StreamExt;
use std::sync::{Arc, PoisonError, RwLock};
use std::time::Duration;

use super::deliver;
use crate::application::errors::BotError;
use crate::application::messaging::CommandDispatcher;
use crate::domain::entities::Message;
use crate::domain::traits::{BotInfo, ChatTransport};
use crate::infrastructure::config::IrcConfig;

/// Wait before reconnecting after the server goes away
const RECONNECT_DELAY: Duration = Duration::from_secs(10);

fn transport_error(e: ::irc::error::Error) -> BotError {
    BotError::Transport(e.to_string())
}

/// Fallback nicknames tried in order when the configured one is taken.
/// Each one still contains the configured nickname, so lines addressed to
/// the fallback are recognised as direct addresses.
pub fn alt_nicknames(nickname: &str) -> Vec<String> {
    vec![format!("{}_", nickname), format!("{}__", nickname)]
}

fn client_config(config: &IrcConfig) -> ClientConfig {
    ClientConfig {
        nickname: Some(config.nickname.clone()),
        alt_nicks: alt_nicknames(&config.nickname),
        username: Some(config.nickname.clone()),
        realname: Some(config.realname.clone()),
        server: Some(config.server.clone()),
        port: Some(config.port),
        channels: vec![config.channel.clone()],
        ..ClientConfig::default()
    }
}

/// Map a channel PRIVMSG to a dispatcher message. Private conversations
/// and every other command yield `None`.
pub fn channel_message(message: &IrcMessage, channel: &str) -> Option<Message> {
    let Command::PRIVMSG(target, text) = &message.command else {
        return None;
    };
    if !target.contains(channel) {
        return None;
    }

    let sender = message.source_nickname().unwrap_or_default();
    Some(Message::new(sender, text.clone()).with_platform("irc"))
}

/// IRC bot adapter
pub struct IrcAdapter {
    config: IrcConfig,
    /// Set once the bot has joined its channel, cleared when the session ends
    sender: RwLock<Option<Sender>>,
}

impl IrcAdapter {
    pub fn new(config: IrcConfig) -> Self {
        Self {
            config,
            sender: RwLock::new(None),
        }
    }

    fn set_sender(&self, sender: Option<Sender>) {
        *self.sender.write().unwrap_or_else(PoisonError::into_inner) = sender;
    }

    /// Connect and serve forever, reconnecting when the connection drops
    pub async fn run(self: Arc<Self>, dispatcher: Arc<CommandDispatcher>) -> Result<(), BotError> {
        loop {
            match self.session(&dispatcher).await {
                Ok(()) => tracing::warn!("IRC connection closed by server"),
                Err(e) => tracing::error!("IRC connection failed: {}", e),
            }
            tracing::info!("Reconnecting in {:?}", RECONNECT_DELAY);
            tokio::time::sleep(RECONNECT_DELAY).await;
        }
    }

    async fn session(self: &Arc<Self>, dispatcher: &Arc<CommandDispatcher>) -> Result<(), BotError> {
        tracing::info!("Connecting to {}:{}", self.config.server, self.config.port);

        let mut client = Client::from_config(client_config(&self.config))
            .await
            .map_err(transport_error)?;
        client.identify().map_err(transport_error)?;
        let mut stream = client.stream().map_err(transport_error)?;

        let result = loop {
            match stream.next().await {
                Some(Ok(message)) => self.handle_message(&client, message, dispatcher),
                Some(Err(e)) => break Err(transport_error(e)),
                None => break Ok(()),
            }
        };

        self.set_sender(None);
        result
    }

    fn handle_message(
        self: &Arc<Self>,
        client: &Client,
        message: IrcMessage,
        dispatcher: &Arc<CommandDispatcher>,
    ) {
        tracing::trace!("<< {}", message.to_string().trim_end());

        match &message.command {
            Command::JOIN(channel, _, _)
                if channel.eq_ignore_ascii_case(&self.config.channel)
                    && message.source_nickname() == Some(client.current_nickname()) =>
            {
                tracing::info!("Joined {} as {}", channel, client.current_nickname());
                self.set_sender(Some(client.sender()));
                if let Err(e) = self.privmsg(&self.config.welcome_message) {
                    tracing::warn!("Could not send welcome message: {}", e);
                }
            }
            Command::PRIVMSG(_, _) => {
                let Some(message) = channel_message(&message, &self.config.channel) else {
                    return;
                };
                let adapter = Arc::clone(self);
                let dispatcher = Arc::clone(dispatcher);
                tokio::spawn(async move {
                    if let Some(reply) = dispatcher.dispatch(&message).await {
                        deliver(adapter.as_ref(), reply).await;
                    }
                });
            }
            _ => {}
        }
    }

    fn privmsg(&self, text: &str) -> Result<(), BotError> {
        let guard = self.sender.read().unwrap_or_else(PoisonError::into_inner);
        let sender = guard
            .as_ref()
            .ok_or_else(|| BotError::Transport(format!("Not joined to {}", self.config.channel)))?;

        for line in text.lines().filter(|l| !l.trim().is_empty()) {
            sender
                .send_privmsg(&self.config.channel, line)
                .map_err(transport_error)?;
        }
        Ok(())
    }
}

#[async_trait]
impl ChatTransport for IrcAdapter {
    async fn send_message(&self, text: &str) -> Result<(), BotError> {
        self.privmsg(text)
    }

    fn bot_info(&self) -> BotInfo {
        BotInfo {
            nickname: self.config.nickname.clone(),
            realname: self.config.realname.clone(),
            channel: self.config.channel.clone(),
        }
    }
}
