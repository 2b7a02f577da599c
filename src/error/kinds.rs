use std::{fmt, io};

use serde::Serialize;

/// Crate-wide `Result` type using [`ConsoleError`] as the error.
///
/// This alias is re-exported by the parent `error` module and is intended
/// to be used throughout the crate for fallible operations.
pub type Result<T> = std::result::Result<T, ConsoleError>;

/// Top-level error type for console operations.
///
/// Nothing on the keystroke path returns this type: splitting, completion and
/// highlighting always produce a usable result. It covers the surfaces around
/// them (configuration, the line editor, I/O).
#[derive(Debug)]
pub enum ConsoleError {
    /// Configuration errors.
    Config(ConfigError),

    /// Completion engine errors.
    Completion(CompletionError),

    /// I/O errors.
    Io(io::Error),

    /// Generic error with a free-form message.
    Generic(String),
}

/// Configuration-specific errors.
#[derive(Debug)]
pub enum ConfigError {
    /// Config file not found.
    FileNotFound(String),

    /// Invalid config format.
    InvalidFormat(String),

    /// Invalid field value.
    InvalidValue { field: String, value: String },

    /// Any other configuration problem.
    Generic(String),
}

/// Failures reported by a completion engine.
///
/// An engine returns one of these next to whatever candidates it still
/// managed to collect; the adapter turns it into a message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "detail", rename_all = "snake_case")]
pub enum CompletionError {
    /// A flag that the current command does not declare.
    UnknownFlag(String),

    /// A value-taking flag was given as the last word without its value.
    MissingFlagValue(String),

    /// Engine-internal failure.
    Engine(String),
}

/* ========================= Display & Error impls ========================= */

impl fmt::Display for ConsoleError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConsoleError::Config(e) => write!(f, "Configuration error: {e}"),
            ConsoleError::Completion(e) => write!(f, "Completion error: {e}"),
            ConsoleError::Io(e) => write!(f, "I/O error: {e}"),
            ConsoleError::Generic(msg) => write!(f, "{msg}"),
        }
    }
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::FileNotFound(path) => write!(f, "Config file not found: {path}"),
            ConfigError::InvalidFormat(msg) => write!(f, "Invalid config format: {msg}"),
            ConfigError::InvalidValue { field, value } => {
                write!(f, "Invalid value '{value}' for field '{field}'")
            }
            ConfigError::Generic(msg) => write!(f, "{msg}"),
        }
    }
}

impl fmt::Display for CompletionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CompletionError::UnknownFlag(flag) => write!(f, "unknown flag: {flag}"),
            CompletionError::MissingFlagValue(flag) => {
                write!(f, "flag needs an argument: {flag}")
            }
            CompletionError::Engine(msg) => write!(f, "{msg}"),
        }
    }
}

impl std::error::Error for ConsoleError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConsoleError::Config(e) => Some(e),
            ConsoleError::Completion(e) => Some(e),
            ConsoleError::Io(e) => Some(e),
            ConsoleError::Generic(_) => None,
        }
    }
}
impl std::error::Error for ConfigError {}
impl std::error::Error for CompletionError {}

/* ========================= Conversions to ConsoleError ========================= */

impl From<io::Error> for ConsoleError {
    fn from(err: io::Error) -> Self {
        ConsoleError::Io(err)
    }
}

impl From<ConfigError> for ConsoleError {
    fn from(err: ConfigError) -> Self {
        ConsoleError::Config(err)
    }
}

impl From<CompletionError> for ConsoleError {
    fn from(err: CompletionError) -> Self {
        ConsoleError::Completion(err)
    }
}

impl From<toml::de::Error> for ConsoleError {
    fn from(err: toml::de::Error) -> Self {
        ConsoleError::Config(ConfigError::InvalidFormat(err.to_string()))
    }
}

impl From<toml::ser::Error> for ConsoleError {
    fn from(err: toml::ser::Error) -> Self {
        ConsoleError::Config(ConfigError::Generic(format!("Failed to serialize config: {err}")))
    }
}

impl From<serde_json::Error> for ConsoleError {
    fn from(err: serde_json::Error) -> Self {
        ConsoleError::Generic(format!("JSON error: {err}"))
    }
}

impl From<reedline::ReedlineError> for ConsoleError {
    fn from(err: reedline::ReedlineError) -> Self {
        ConsoleError::Generic(format!("Line editor error: {err}"))
    }
}

impl From<String> for ConsoleError {
    fn from(msg: String) -> Self {
        ConsoleError::Generic(msg)
    }
}

impl From<&str> for ConsoleError {
    fn from(msg: &str) -> Self {
        ConsoleError::Generic(msg.to_owned())
    }
}
