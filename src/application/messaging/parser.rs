//! Message parser - Classifies raw channel lines before any store access

/// Prefix that marks a line as a bucket command
pub const COMMAND_PREFIX: char = '!';

/// Literal line that asks for usage
pub const HELP_COMMAND: &str = "!help";

/// Keyword that turns a command into a write
pub const ADD_KEYWORD: &str = "add";

/// Syntactic classification of one line
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParsedLine {
    Help,
    DirectAddress,
    Ignore,
    Command(CommandLine),
}

/// A `!command ...` line split into tokens
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandLine {
    pub command: String,
    /// All tokens including the command token; empty tokens are kept
    pub tokens: Vec<String>,
}

impl CommandLine {
    /// Number of tokens after the command token
    pub fn argument_count(&self) -> usize {
        self.tokens.len().saturating_sub(1)
    }

    /// Last token of the line; the command token itself when there are no arguments
    pub fn recipient(&self) -> &str {
        self.tokens.last().map(String::as_str).unwrap_or("")
    }

    /// Token that may name a sub-bucket
    pub fn qualifier(&self) -> Option<&str> {
        self.tokens.get(1).map(String::as_str)
    }

    /// Text to store when the line is an add. `add` in the first argument
    /// position wins over `add` in the second.
    pub fn new_quote(&self) -> Option<String> {
        let tokens = &self.tokens;
        let text = if tokens.len() >= 2 && tokens[1] == ADD_KEYWORD {
            tokens[2..].join(" ")
        } else if tokens.len() >= 3 && tokens[2] == ADD_KEYWORD {
            tokens[3..].join(" ")
        } else {
            String::new()
        };

        if text.is_empty() {
            None
        } else {
            Some(text)
        }
    }
}

/// Splits on single spaces. Consecutive spaces yield empty tokens.
pub fn tokenize(text: &str) -> Vec<String> {
    text.split(' ').map(str::to_string).collect()
}

/// Parses incoming lines into `ParsedLine` values
pub struct MessageParser {
    nickname: String,
}

impl MessageParser {
    pub fn new(nickname: impl Into<String>) -> Self {
        Self {
            nickname: nickname.into(),
        }
    }

    /// Classify a line. Order matters: help, then direct address, then
    /// the prefix check, so an addressed line starting with `!` is never a command.
    pub fn parse(&self, text: &str) -> ParsedLine {
        if text == HELP_COMMAND {
            return ParsedLine::Help;
        }

        if !self.nickname.is_empty() && text.contains(&self.nickname) {
            return ParsedLine::DirectAddress;
        }

        if !text.starts_with(COMMAND_PREFIX) {
            return ParsedLine::Ignore;
        }

        let tokens = tokenize(text);
        let command = tokens
            .first()
            .and_then(|first| first.split(COMMAND_PREFIX).nth(1))
            .unwrap_or("")
            .to_string();

        if command.is_empty() {
            return ParsedLine::Ignore;
        }

        ParsedLine::Command(CommandLine { command, tokens })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn command(text: &str) -> CommandLine {
        match MessageParser::new("quotebot").parse(text) {
            ParsedLine::Command(line) => line,
            other => panic!("expected command for {:?}, got {:?}", text, other),
        }
    }

    #[test]
    fn test_help_is_exact() {
        let parser = MessageParser::new("quotebot");
        assert_eq!(parser.parse("!help"), ParsedLine::Help);
        assert!(matches!(parser.parse("!help me"), ParsedLine::Command(_)));
        assert_eq!(parser.parse(" !help"), ParsedLine::Ignore);
    }

    #[test]
    fn test_direct_address_anywhere() {
        let parser = MessageParser::new("quotebot");
        assert_eq!(parser.parse("hello quotebot there"), ParsedLine::DirectAddress);
        assert_eq!(parser.parse("!movie quotebot"), ParsedLine::DirectAddress);
        assert_eq!(parser.parse("hey quotebots!"), ParsedLine::DirectAddress);
    }

    #[test]
    fn test_empty_nickname_never_matches() {
        let parser = MessageParser::new("");
        assert_eq!(parser.parse("just chatting"), ParsedLine::Ignore);
    }

    #[test]
    fn test_no_prefix_is_ignored() {
        let parser = MessageParser::new("quotebot");
        assert_eq!(parser.parse("movie add Inception"), ParsedLine::Ignore);
        assert_eq!(parser.parse(""), ParsedLine::Ignore);
    }

    #[test]
    fn test_empty_command_is_ignored() {
        let parser = MessageParser::new("quotebot");
        assert_eq!(parser.parse("!"), ParsedLine::Ignore);
        assert_eq!(parser.parse("! movie"), ParsedLine::Ignore);
        assert_eq!(parser.parse("!!movie"), ParsedLine::Ignore);
    }

    #[test]
    fn test_command_stops_at_second_prefix() {
        assert_eq!(command("!movie!x bob").command, "movie");
    }

    #[test]
    fn test_tokenize_keeps_empty_tokens() {
        assert_eq!(tokenize("!movie  bob"), vec!["!movie", "", "bob"]);
        assert_eq!(tokenize("!movie "), vec!["!movie", ""]);
    }

    #[test]
    fn test_recipient_and_arguments() {
        let line = command("!movie");
        assert_eq!(line.argument_count(), 0);
        assert_eq!(line.recipient(), "!movie");
        assert_eq!(line.qualifier(), None);

        let line = command("!movie comedy bob");
        assert_eq!(line.argument_count(), 2);
        assert_eq!(line.recipient(), "bob");
        assert_eq!(line.qualifier(), Some("comedy"));
    }

    #[test]
    fn test_new_quote_on_main_command() {
        assert_eq!(command("!movie add Inception").new_quote().as_deref(), Some("Inception"));
        assert_eq!(
            command("!movie add The Big Lebowski").new_quote().as_deref(),
            Some("The Big Lebowski")
        );
    }

    #[test]
    fn test_new_quote_on_sub_command() {
        assert_eq!(
            command("!movie comedy add Airplane!").new_quote().as_deref(),
            Some("Airplane!")
        );
    }

    #[test]
    fn test_first_add_wins() {
        assert_eq!(command("!movie add add x").new_quote().as_deref(), Some("add x"));
    }

    #[test]
    fn test_add_without_text_is_not_a_write() {
        assert_eq!(command("!movie add").new_quote(), None);
        assert_eq!(command("!movie comedy add").new_quote(), None);
        assert_eq!(command("!movie bob").new_quote(), None);
    }

    #[test]
    fn test_new_quote_keeps_spacing() {
        assert_eq!(command("!movie add a  b").new_quote().as_deref(), Some("a  b"));
    }
}
