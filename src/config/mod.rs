//! Configuration management for the console
//!
//! This module handles loading, parsing, and managing configuration from various sources:
//! - Configuration files (TOML format)
//! - Environment variables
//! - Command-line arguments
//!
//! Configuration precedence (highest to lowest):
//! 1. Command-line arguments
//! 2. Environment variables
//! 3. Configuration file
//! 4. Default values

use nu_ansi_term::Color;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

use crate::error::{ConfigError, Result};
use crate::parser::Command;
use crate::repl::highlighter::{DEFAULT_MAX_HIGHLIGHT_RUNES, LineHighlighter};

/// Environment variable overriding `highlight.max_runes`
pub const MAX_HIGHLIGHT_RUNES_ENV: &str = "CONSOLE_MAX_HIGHLIGHT_RUNES";

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Highlighting configuration
    #[serde(default)]
    pub highlight: HighlightConfig,

    /// History configuration
    #[serde(default)]
    pub history: HistoryConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,

    /// Top-level commands; the built-in tree is used when empty
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub commands: Vec<Command>,
}

/// Syntax highlighting configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HighlightConfig {
    /// Enable syntax highlighting
    #[serde(default = "default_highlight_enabled")]
    pub enabled: bool,

    /// Lines longer than this many characters are not highlighted (0 = no limit)
    #[serde(default = "default_max_runes")]
    pub max_runes: usize,

    /// Color of a recognized command
    #[serde(default = "default_command_color")]
    pub command_color: ColorName,

    /// Color of a flag
    #[serde(default = "default_flag_color")]
    pub flag_color: ColorName,
}

/// Terminal colors accepted in the configuration file
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ColorName {
    Black,
    Red,
    Green,
    Yellow,
    Blue,
    Purple,
    Magenta,
    Cyan,
    White,
    DarkGray,
}

/// Command history configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistoryConfig {
    /// Maximum number of history entries
    #[serde(default = "default_max_history_size")]
    pub max_size: usize,

    /// Path to history file
    #[serde(default = "default_history_file")]
    pub file_path: PathBuf,

    /// Enable history persistence
    #[serde(default = "default_persist_history")]
    pub persist: bool,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level (error, warn, info, debug, trace)
    #[serde(default = "default_log_level")]
    pub level: LogLevel,

    /// Enable timestamps in logs
    #[serde(default = "default_log_timestamps")]
    pub timestamps: bool,
}

/// Log level options
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

// Default value functions
fn default_highlight_enabled() -> bool {
    true
}

fn default_max_runes() -> usize {
    DEFAULT_MAX_HIGHLIGHT_RUNES
}

fn default_command_color() -> ColorName {
    ColorName::Green
}

fn default_flag_color() -> ColorName {
    ColorName::Yellow
}

fn default_max_history_size() -> usize {
    1000
}

fn default_history_file() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".shellline_history")
}

fn default_persist_history() -> bool {
    true
}

fn default_log_level() -> LogLevel {
    LogLevel::Warn
}

fn default_log_timestamps() -> bool {
    false
}

impl Default for HighlightConfig {
    fn default() -> Self {
        Self {
            enabled: default_highlight_enabled(),
            max_runes: default_max_runes(),
            command_color: default_command_color(),
            flag_color: default_flag_color(),
        }
    }
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self {
            max_size: default_max_history_size(),
            file_path: default_history_file(),
            persist: default_persist_history(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            timestamps: default_log_timestamps(),
        }
    }
}

impl Config {
    /// Create a new configuration with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Load configuration from a file
    ///
    /// With `None` the default path is used, and a missing file there yields
    /// the defaults. An explicitly given file must exist.
    ///
    /// # Arguments
    /// * `path` - Optional path to the configuration file (TOML format)
    ///
    /// # Returns
    /// * `Result<Config>` - Loaded configuration or error
    pub fn load_from_file(path: Option<&Path>) -> Result<Self> {
        let (path, explicit) = match path {
            Some(p) => (p.to_path_buf(), true),
            None => (Self::default_config_path(), false),
        };

        if !path.exists() {
            if explicit {
                return Err(ConfigError::FileNotFound(path.display().to_string()).into());
            }
            debug!(path = %path.display(), "No config file, using defaults");
            return Ok(Self::default());
        }

        let content = fs::read_to_string(&path)?;
        let config: Config = toml::from_str(&content)?;
        debug!(path = %path.display(), "Loaded config file");
        Ok(config)
    }

    /// Get the default configuration file path
    pub fn default_config_path() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".shellline")
            .join("config.toml")
    }

    /// Apply overrides from the process environment
    pub fn apply_env(&mut self) {
        self.apply_env_with(|key| std::env::var(key).ok());
    }

    /// Apply overrides read through `lookup`
    ///
    /// Unparsable values are logged and ignored.
    pub fn apply_env_with<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(raw) = lookup(MAX_HIGHLIGHT_RUNES_ENV) {
            match raw.trim().parse::<usize>() {
                Ok(max_runes) => self.highlight.max_runes = max_runes,
                Err(e) => warn!(
                    var = MAX_HIGHLIGHT_RUNES_ENV,
                    value = %raw,
                    error = %e,
                    "Ignoring invalid highlight threshold"
                ),
            }
        }
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if self.history.max_size == 0 {
            return Err(ConfigError::InvalidValue {
                field: "history.max_size".to_string(),
                value: "0".to_string(),
            }
            .into());
        }

        if let Some(cmd) = self.commands.iter().find(|c| c.name().is_empty()) {
            return Err(ConfigError::InvalidValue {
                field: "commands.usage".to_string(),
                value: cmd.usage.clone(),
            }
            .into());
        }

        Ok(())
    }

    /// Serialize the configuration as TOML
    pub fn to_toml(&self) -> Result<String> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// The command tree the console works against
    pub fn command_tree(&self) -> Command {
        if self.commands.is_empty() {
            return Command::demo_tree();
        }
        Command {
            usage: "console".to_string(),
            children: self.commands.clone(),
            ..Command::default()
        }
    }
}

impl HighlightConfig {
    /// Build the line highlighter these settings describe
    pub fn line_highlighter(&self) -> LineHighlighter {
        LineHighlighter::new(
            self.command_color.to_color(),
            self.flag_color.to_color(),
            self.max_runes,
        )
    }
}

impl ColorName {
    /// Convert to nu_ansi_term::Color
    pub fn to_color(self) -> Color {
        match self {
            ColorName::Black => Color::Black,
            ColorName::Red => Color::Red,
            ColorName::Green => Color::Green,
            ColorName::Yellow => Color::Yellow,
            ColorName::Blue => Color::Blue,
            ColorName::Purple => Color::Purple,
            ColorName::Magenta => Color::Magenta,
            ColorName::Cyan => Color::Cyan,
            ColorName::White => Color::White,
            ColorName::DarkGray => Color::DarkGray,
        }
    }
}

impl LogLevel {
    /// Convert to tracing::Level
    pub fn to_tracing_level(&self) -> tracing::Level {
        match self {
            LogLevel::Error => tracing::Level::ERROR,
            LogLevel::Warn => tracing::Level::WARN,
            LogLevel::Info => tracing::Level::INFO,
            LogLevel::Debug => tracing::Level::DEBUG,
            LogLevel::Trace => tracing::Level::TRACE,
        }
    }
}
