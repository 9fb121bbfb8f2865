/// Store operation a `!command` line resolves to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandKind {
    SetBucket,
    GetBucket,
}

impl CommandKind {
    pub fn as_str(&self) -> &str {
        match self {
            CommandKind::SetBucket => "set-bucket",
            CommandKind::GetBucket => "get-bucket",
        }
    }
}

/// A fully resolved command. Built once per inbound line, never persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedCommand {
    pub kind: CommandKind,
    /// Main command bucket or the resolved sub-bucket
    pub bucket_name: String,
    /// Only present for `SetBucket`
    pub new_quote_text: Option<String>,
    /// Last whitespace-delimited token of the line
    pub recipient: String,
    /// Tokens after the command token
    pub argument_count: usize,
    /// True when `bucket_name` is a resolved sub-bucket
    pub is_sub_bucket: bool,
}

impl ParsedCommand {
    pub fn new(kind: CommandKind) -> Self {
        Self {
            kind,
            bucket_name: String::new(),
            new_quote_text: None,
            recipient: String::new(),
            argument_count: 0,
            is_sub_bucket: false,
        }
    }

    pub fn with_bucket(mut self, name: impl Into<String>, is_sub_bucket: bool) -> Self {
        self.bucket_name = name.into();
        self.is_sub_bucket = is_sub_bucket;
        self
    }

    pub fn with_recipient(mut self, recipient: impl Into<String>, argument_count: usize) -> Self {
        self.recipient = recipient.into();
        self.argument_count = argument_count;
        self
    }

    pub fn with_new_quote(mut self, text: impl Into<String>) -> Self {
        self.new_quote_text = Some(text.into());
        self
    }

    /// Whether a get reply should be addressed to `recipient`.
    /// Sub-bucket replies need two arguments since the first one names the sub-bucket.
    pub fn addresses_recipient(&self) -> bool {
        if self.is_sub_bucket {
            self.argument_count >= 2
        } else {
            self.argument_count >= 1
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_addresses_recipient() {
        let main = ParsedCommand::new(CommandKind::GetBucket)
            .with_bucket("movie", false)
            .with_recipient("bob", 1);
        assert!(main.addresses_recipient());

        let sub = ParsedCommand::new(CommandKind::GetBucket)
            .with_bucket("movie_comedy", true)
            .with_recipient("comedy", 1);
        assert!(!sub.addresses_recipient());

        let sub = sub.with_recipient("bob", 2);
        assert!(sub.addresses_recipient());
    }

    #[test]
    fn test_bare_command_has_no_recipient() {
        let cmd = ParsedCommand::new(CommandKind::GetBucket)
            .with_bucket("movie", false)
            .with_recipient("!movie", 0);
        assert!(!cmd.addresses_recipient());
    }
}
