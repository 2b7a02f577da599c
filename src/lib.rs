//! shellline library
//!
//! The line-processing core of an interactive command console: shell-word
//! splitting with quote tracking, a completion pipeline that reshapes an
//! engine's raw candidates into an insertable result, and a highlighter for
//! commands and flags. It can be used on its own or through the reedline
//! console in [`repl`].
//!
//! # Modules
//!
//! - `cli`: Command-line interface and argument parsing
//! - `config`: Configuration management
//! - `error`: Error types and handling
//! - `parser`: Word splitting, prefix codec and the command tree
//! - `repl`: Completion pipeline, highlighter and the interactive console
//!
//! # Example
//!
//! ```no_run
//! use shellline::{Config, Console};
//!
//! let mut console = Console::from_config(&Config::default());
//!
//! let result = console.complete("run --ver", 9);
//! for candidate in &result.candidates {
//!     println!("{}", result.insertion(candidate));
//! }
//!
//! println!("{}", console.highlight_syntax("run --verbose target"));
//! ```

pub mod cli;
pub mod config;
pub mod error;
pub mod parser;
pub mod repl;

// Re-export commonly used types
pub use config::Config;
pub use error::{ConsoleError, Result};
pub use parser::{Command, Flag, SplitResult, SplitScope, split};
pub use repl::{Console, ReplEngine};
pub use repl::completion::{CompletionEngine, CompletionResult, TreeEngine};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Get library version
///
/// # Returns
/// * `&str` - Version string
pub fn version() -> &'static str {
    VERSION
}
