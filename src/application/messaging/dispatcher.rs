//! Message dispatcher - Turns one channel line into a store operation and a reply

use std::sync::{Arc, Mutex};
use std::time::Duration;

use rand::rngs::StdRng;
use rand::{Rng, RngCore, SeedableRng};

use super::parser::{CommandLine, MessageParser, ParsedLine};
use crate::domain::entities::{sub_bucket_name, CommandKind, Message, ParsedCommand, Reply};
use crate::domain::traits::{BucketStore, ScriptRunner};

/// Answer to a direct address when the default bucket cannot be read
pub const NOTHING_TO_SAY: &str = "There is nothing more to say";

/// Static settings the dispatcher needs, taken from the loaded configuration
#[derive(Debug, Clone)]
pub struct DispatchSettings {
    pub nickname: String,
    pub default_bucket: String,
    pub set_success_message: String,
    pub set_error_message: String,
    pub get_error_message: String,
    /// Upper bound of the random delay before answering a direct address
    pub max_reply_delay: Option<Duration>,
    pub local_scripts: bool,
}

/// Usage text sent for `!help`
pub fn help_text(nickname: &str) -> String {
    [
        format!("{} usage:", nickname),
        "Available commands:".to_string(),
        "  !command [recipient]: Get a random message from a [sub]command".to_string(),
        "  add: Add a message to a [sub]command".to_string(),
        "    '!command add This is a quote'".to_string(),
        "    '!command subcommand add This is a quote'".to_string(),
    ]
    .join("\n")
}

/// Routes parsed lines to the bucket store and formats replies
pub struct CommandDispatcher {
    parser: MessageParser,
    settings: DispatchSettings,
    store: Arc<dyn BucketStore>,
    scripts: Option<Arc<dyn ScriptRunner>>,
    rng: Mutex<StdRng>,
}

impl CommandDispatcher {
    pub fn new(settings: DispatchSettings, store: Arc<dyn BucketStore>) -> Self {
        Self {
            parser: MessageParser::new(settings.nickname.clone()),
            settings,
            store,
            scripts: None,
            rng: Mutex::new(StdRng::from_entropy()),
        }
    }

    /// Attach the local script runner, consulted when scripts are enabled
    pub fn with_scripts(mut self, scripts: Arc<dyn ScriptRunner>) -> Self {
        self.scripts = Some(scripts);
        self
    }

    /// Replace the random source, e.g. with a seeded one
    pub fn with_rng(mut self, rng: StdRng) -> Self {
        self.rng = Mutex::new(rng);
        self
    }

    pub fn settings(&self) -> &DispatchSettings {
        &self.settings
    }

    /// Child generator for a single call so the lock is never held across an await
    fn fork_rng(&self) -> StdRng {
        let mut parent = self.rng.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        StdRng::seed_from_u64(parent.next_u64())
    }

    /// Process one inbound line. Store failures never escape; they become
    /// configured reply text.
    pub async fn dispatch(&self, message: &Message) -> Option<Reply> {
        let parsed = self.parser.parse(&message.text);
        tracing::debug!(
            "[{}/{}] {} -> {:?}",
            message.platform,
            message.id,
            message.sender,
            parsed
        );

        match parsed {
            ParsedLine::Help => Some(Reply::new(help_text(&self.settings.nickname))),
            ParsedLine::DirectAddress => Some(self.direct_address(&message.sender).await),
            ParsedLine::Ignore => None,
            ParsedLine::Command(line) => Some(self.command(&line).await),
        }
    }

    async fn direct_address(&self, sender: &str) -> Reply {
        let mut rng = self.fork_rng();
        let quote = match self
            .store
            .pick_random(&self.settings.default_bucket, &mut rng)
            .await
        {
            Ok(quote) => quote,
            Err(e) => {
                tracing::warn!("Default bucket '{}' unavailable: {}", self.settings.default_bucket, e);
                return Reply::new(NOTHING_TO_SAY);
            }
        };

        let reply = Reply::new(format!("{}: {}", sender, quote));
        match self.settings.max_reply_delay {
            Some(max) if !max.is_zero() => {
                let millis = rng.gen_range(0..max.as_millis().max(1) as u64);
                reply.with_delay(Duration::from_millis(millis))
            }
            _ => reply,
        }
    }

    async fn command(&self, line: &CommandLine) -> Reply {
        if self.settings.local_scripts {
            if let Some(scripts) = &self.scripts {
                if scripts.exists(&line.command) {
                    return self.run_script(scripts.as_ref(), line).await;
                }
            }
        }

        let parsed = self.resolve(line).await;
        tracing::debug!(
            "Resolved '{}' as {} on bucket '{}'",
            line.command,
            parsed.kind.as_str(),
            parsed.bucket_name
        );
        self.execute(&parsed).await
    }

    async fn run_script(&self, scripts: &dyn ScriptRunner, line: &CommandLine) -> Reply {
        match scripts.run(&line.command, line.recipient()).await {
            Ok(output) => Reply::new(output),
            Err(e) => {
                tracing::warn!("Script '{}' failed: {}", line.command, e);
                Reply::new(self.settings.get_error_message.clone())
            }
        }
    }

    /// Decide which bucket a command line targets and whether it writes.
    /// The sub-bucket check is a real read of `command_<token>`.
    pub async fn resolve(&self, line: &CommandLine) -> ParsedCommand {
        let sub_bucket = match line.qualifier() {
            Some(qualifier) => {
                let candidate = sub_bucket_name(&line.command, qualifier);
                if self.store.exists(&candidate).await {
                    Some(candidate)
                } else {
                    None
                }
            }
            None => None,
        };

        let parsed = match sub_bucket {
            Some(name) => ParsedCommand::new(CommandKind::GetBucket).with_bucket(name, true),
            None => ParsedCommand::new(CommandKind::GetBucket).with_bucket(line.command.clone(), false),
        }
        .with_recipient(line.recipient(), line.argument_count());

        match line.new_quote() {
            Some(text) => {
                let mut parsed = parsed.with_new_quote(text);
                parsed.kind = CommandKind::SetBucket;
                parsed
            }
            None => parsed,
        }
    }

    /// Perform the store operation for a resolved command
    pub async fn execute(&self, command: &ParsedCommand) -> Reply {
        match (command.kind, &command.new_quote_text) {
            (CommandKind::SetBucket, Some(text)) => {
                match self.store.append(&command.bucket_name, text).await {
                    Ok(()) => {
                        tracing::info!("Added quote to bucket '{}'", command.bucket_name);
                        Reply::new(self.settings.set_success_message.clone())
                    }
                    Err(e) => {
                        tracing::warn!("Failed to add to bucket '{}': {}", command.bucket_name, e);
                        Reply::new(self.settings.set_error_message.clone())
                    }
                }
            }
            _ => {
                let mut rng = self.fork_rng();
                let quote = match self.store.pick_random(&command.bucket_name, &mut rng).await {
                    Ok(quote) if !quote.is_empty() => quote.into_string(),
                    Ok(_) => self.settings.get_error_message.clone(),
                    Err(e) => {
                        tracing::warn!("Failed to read bucket '{}': {}", command.bucket_name, e);
                        self.settings.get_error_message.clone()
                    }
                };

                if command.addresses_recipient() {
                    Reply::new(format!("{}: {}", command.recipient, quote))
                } else {
                    Reply::new(quote)
                }
            }
        }
    }
}
