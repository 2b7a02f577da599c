//! Error handling module for the console.
//!
//! Only the outer surfaces (configuration loading, the line editor, CLI
//! subcommands) propagate errors. The keystroke pipelines degrade instead of
//! failing: split anomalies are data, and engine failures become messages in
//! the completion result.
//!
//! # Example
//!
//! ```rust,no_run
//! use shellline::error::{ConfigError, Result};
//!
//! fn check_threshold(raw: &str) -> Result<usize> {
//!     raw.parse().map_err(|_| {
//!         ConfigError::InvalidValue {
//!             field: "highlight.max_runes".to_string(),
//!             value: raw.to_string(),
//!         }
//!         .into()
//!     })
//! }
//! ```

pub mod kinds;

// Re-export commonly used types
pub use kinds::{CompletionError, ConfigError, ConsoleError, Result};
