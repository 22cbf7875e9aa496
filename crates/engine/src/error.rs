use std::fmt;

#[derive(Debug)]
pub enum IntentError {
    /// TOML parse / deserialization error.
    Parse(String),
    /// An intent with an empty or whitespace-only key.
    EmptyKey { position: usize },
    /// The same intent key declared twice.
    DuplicateKey(String),
    /// An intent without trigger phrases.
    NoPhrases(String),
}

impl fmt::Display for IntentError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Parse(msg) => write!(f, "intent file parse error: {msg}"),
            Self::EmptyKey { position } => write!(f, "intent #{position} has an empty key"),
            Self::DuplicateKey(key) => write!(f, "intent '{key}' is declared more than once"),
            Self::NoPhrases(key) => write!(f, "intent '{key}' has no trigger phrases"),
        }
    }
}

impl std::error::Error for IntentError {}
