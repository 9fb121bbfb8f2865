/// Represents a line received from the channel
#[derive(Debug, Clone)]
pub struct Message {
    pub id: String,
    pub sender: String,
    pub text: String,
    pub platform: String,
}

impl Message {
    pub fn new(sender: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            sender: sender.into(),
            text: text.into(),
            platform: "unknown".to_string(),
        }
    }

    pub fn with_platform(mut self, platform: impl Into<String>) -> Self {
        self.platform = platform.into();
        self
    }
}

/// Outbound answer produced for one inbound message
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reply {
    pub text: String,
    /// Time to wait before sending; only direct addresses are delayed
    pub delay: Option<std::time::Duration>,
}

impl Reply {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            delay: None,
        }
    }

    pub fn with_delay(mut self, delay: std::time::Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Non-empty lines of the reply, one per chat message
    pub fn lines(&self) -> impl Iterator<Item = &str> {
        self.text.lines().filter(|l| !l.trim().is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reply_lines_skip_blank() {
        let reply = Reply::new("first\n\n  \nsecond\n");
        let lines: Vec<&str> = reply.lines().collect();
        assert_eq!(lines, vec!["first", "second"]);
    }

    #[test]
    fn test_message_ids_unique() {
        let a = Message::new("alice", "hi");
        let b = Message::new("alice", "hi");
        assert_ne!(a.id, b.id);
        assert_eq!(a.platform, "unknown");
    }
}
