use std::fmt;

/// Separator between a command and its qualifier in a sub-bucket name
pub const SUB_BUCKET_SEPARATOR: char = '_';

/// A single stored quote. Opaque text, owned by exactly one bucket.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct Quote(String);

impl Quote {
    pub fn new(text: impl Into<String>) -> Self {
        Self(text.into())
    }

    /// The empty quote returned for buckets without entries
    pub fn empty() -> Self {
        Self(String::new())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl From<String> for Quote {
    fn from(text: String) -> Self {
        Self(text)
    }
}

impl From<&str> for Quote {
    fn from(text: &str) -> Self {
        Self(text.to_string())
    }
}

impl fmt::Display for Quote {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Build the name of a sub-bucket, e.g. `movie` + `comedy` -> `movie_comedy`
pub fn sub_bucket_name(command: &str, qualifier: &str) -> String {
    format!("{}{}{}", command, SUB_BUCKET_SEPARATOR, qualifier)
}
