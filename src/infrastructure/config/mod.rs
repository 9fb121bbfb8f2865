//! Configuration management

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

use crate::application::errors::ConfigError;
use crate::application::messaging::DispatchSettings;

/// Bot configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct Config {
    pub irc: IrcConfig,
    pub bot: BotConfig,
    pub storage: StorageConfig,
    pub api: ApiConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct IrcConfig {
    pub server: String,
    pub port: u16,
    pub channel: String,
    pub nickname: String,
    pub realname: String,
    pub welcome_message: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct BotConfig {
    pub set_success_message: String,
    pub set_error_message: String,
    pub get_error_message: String,
    /// Bucket answered from when someone addresses the bot directly
    pub default_bucket: String,
    pub reply_delay: ReplyDelayConfig,
    pub local_scripts: LocalScriptsConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct ReplyDelayConfig {
    pub enabled: bool,
    pub max_seconds: u64,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct LocalScriptsConfig {
    pub enabled: bool,
    pub directory: PathBuf,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct StorageConfig {
    pub path: PathBuf,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct ApiConfig {
    pub enabled: bool,
    pub bind: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            irc: IrcConfig {
                server: "irc.libera.chat".to_string(),
                port: 6667,
                channel: "#bucket-bot".to_string(),
                nickname: "bucketbot".to_string(),
                realname: "Bucket Bot".to_string(),
                welcome_message: "Hello".to_string(),
            },
            bot: BotConfig {
                set_success_message: "Successfully added message".to_string(),
                set_error_message: "Could not add message".to_string(),
                get_error_message: "Could not find message".to_string(),
                default_bucket: "bucket".to_string(),
                reply_delay: ReplyDelayConfig {
                    enabled: false,
                    max_seconds: 60,
                },
                local_scripts: LocalScriptsConfig {
                    enabled: false,
                    directory: PathBuf::from("."),
                },
            },
            storage: StorageConfig {
                path: PathBuf::from("bucket-bot.db"),
            },
            api: ApiConfig {
                enabled: true,
                bind: "0.0.0.0:9876".to_string(),
            },
        }
    }
}

impl Config {
    pub fn load(path: impl Into<PathBuf>) -> Result<Self, ConfigError> {
        let path = path.into();
        let content = std::fs::read_to_string(&path)
            .map_err(|e| ConfigError::Parse(format!("Failed to read config: {}", e)))?;

        Self::from_yaml(&content)
    }

    pub fn from_yaml(content: &str) -> Result<Self, ConfigError> {
        let config: Config = serde_yaml::from_str(content)
            .map_err(|e| ConfigError::Parse(format!("Failed to parse config: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_yaml(&self) -> Result<String, ConfigError> {
        serde_yaml::to_string(self).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.irc.nickname.trim().is_empty() {
            return Err(ConfigError::MissingField("irc.nickname".to_string()));
        }
        if self.irc.channel.trim().is_empty() {
            return Err(ConfigError::MissingField("irc.channel".to_string()));
        }
        if self.bot.default_bucket.is_empty() {
            return Err(ConfigError::MissingField("bot.default-bucket".to_string()));
        }
        if self.irc.nickname.contains(' ') {
            return Err(ConfigError::InvalidValue(format!(
                "irc.nickname must not contain spaces: '{}'",
                self.irc.nickname
            )));
        }
        Ok(())
    }

    pub fn load_env() -> Self {
        // Load from environment variables
        let mut config = Config::default();

        if let Ok(server) = std::env::var("BUCKET_BOT_SERVER") {
            config.irc.server = server;
        }

        if let Ok(port) = std::env::var("BUCKET_BOT_PORT") {
            match port.parse() {
                Ok(port) => config.irc.port = port,
                Err(_) => tracing::warn!("Ignoring invalid BUCKET_BOT_PORT '{}'", port),
            }
        }

        if let Ok(channel) = std::env::var("BUCKET_BOT_CHANNEL") {
            config.irc.channel = channel;
        }

        if let Ok(nick) = std::env::var("BUCKET_BOT_NICK") {
            config.irc.nickname = nick;
        }

        if let Ok(db) = std::env::var("BUCKET_BOT_DB") {
            config.storage.path = PathBuf::from(db);
        }

        config
    }

    /// Upper bound for the direct-address reply delay, when enabled
    pub fn max_reply_delay(&self) -> Option<Duration> {
        let delay = &self.bot.reply_delay;
        if delay.enabled && delay.max_seconds > 0 {
            Some(Duration::from_secs(delay.max_seconds))
        } else {
            None
        }
    }

    pub fn dispatch_settings(&self) -> DispatchSettings {
        DispatchSettings {
            nickname: self.irc.nickname.clone(),
            default_bucket: self.bot.default_bucket.clone(),
            set_success_message: self.bot.set_success_message.clone(),
            set_error_message: self.bot.set_error_message.clone(),
            get_error_message: self.bot.get_error_message.clone(),
            max_reply_delay: self.max_reply_delay(),
            local_scripts: self.bot.local_scripts.enabled,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r##"
irc:
  server: irc.example.org
  port: 6697
  channel: "#quotes"
  nickname: quotebot
  realname: Quote Bot
  welcome-message: Hi all
bot:
  set-success-message: Saved
  set-error-message: Not saved
  get-error-message: Nothing found
  default-bucket: wisdom
  reply-delay:
    enabled: true
    max-seconds: 30
  local-scripts:
    enabled: true
    directory: /opt/scripts
storage:
  path: /var/lib/quotes.db
api:
  enabled: false
  bind: 127.0.0.1:8080
"##;

    #[test]
    fn test_parse_sample() {
        let config = Config::from_yaml(SAMPLE).unwrap();
        assert_eq!(config.irc.port, 6697);
        assert_eq!(config.irc.welcome_message, "Hi all");
        assert_eq!(config.bot.default_bucket, "wisdom");
        assert_eq!(config.storage.path, PathBuf::from("/var/lib/quotes.db"));
        assert!(!config.api.enabled);

        let settings = config.dispatch_settings();
        assert_eq!(settings.nickname, "quotebot");
        assert_eq!(settings.get_error_message, "Nothing found");
        assert_eq!(settings.max_reply_delay, Some(Duration::from_secs(30)));
        assert!(settings.local_scripts);
    }

    #[test]
    fn test_default_round_trips_through_yaml() {
        let yaml = Config::default().to_yaml().unwrap();
        assert!(yaml.contains("default-bucket"));
        let config = Config::from_yaml(&yaml).unwrap();
        assert_eq!(config.irc.nickname, "bucketbot");
        assert_eq!(config.max_reply_delay(), None);
    }

    #[test]
    fn test_zero_delay_means_no_delay() {
        let mut config = Config::default();
        config.bot.reply_delay.enabled = true;
        config.bot.reply_delay.max_seconds = 0;
        assert_eq!(config.max_reply_delay(), None);
    }

    #[test]
    fn test_validate_rejects_empty_nickname() {
        let mut config = Config::default();
        config.irc.nickname = String::new();
        assert!(matches!(config.validate(), Err(ConfigError::MissingField(_))));
    }

    #[test]
    fn test_validate_rejects_spaced_nickname() {
        let mut config = Config::default();
        config.irc.nickname = "quote bot".to_string();
        assert!(matches!(config.validate(), Err(ConfigError::InvalidValue(_))));
    }

    #[test]
    fn test_malformed_yaml() {
        assert!(matches!(Config::from_yaml("irc: ["), Err(ConfigError::Parse(_))));
    }
}
