use std::fmt::{Display, Formatter};

/// An error returned when a [Config](crate::config::Config) value fails validation.
///
/// Validation happens once, before the engine runs; none of these are recoverable mid-run.
#[derive(Debug, Clone)]
pub struct ConfigError {
    field: String,
    message: String,
}

impl ConfigError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "ConfigError: {} - {}", self.field, self.message)
    }
}

impl std::error::Error for ConfigError {}

/// Top level failure of the engine.
///
/// Tokenization producing zero usable lines is not represented here; it is reported through
/// [log::warn!] and the engine still returns `Ok` with a degenerate grammar.
#[derive(Debug, Clone)]
pub enum PgError {
    Config(ConfigError),
    /// A refinement pass left the tree in an inconsistent state. Only raised by
    /// [Tree::check_consistency](crate::node::Tree::check_consistency), which runs under
    /// `debug_assertions` and is otherwise available to callers who opt into the stricter mode.
    Invariant(String),
    Io(String),
}

impl Display for PgError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            PgError::Config(e) => write!(f, "{}", e),
            PgError::Invariant(message) => write!(f, "InvariantError: {}", message),
            PgError::Io(message) => write!(f, "IoError: {}", message),
        }
    }
}

impl std::error::Error for PgError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            PgError::Config(e) => Some(e),
            _ => None,
        }
    }
}

impl From<ConfigError> for PgError {
    fn from(e: ConfigError) -> Self {
        PgError::Config(e)
    }
}

impl From<std::io::Error> for PgError {
    fn from(e: std::io::Error) -> Self {
        PgError::Io(e.to_string())
    }
}
