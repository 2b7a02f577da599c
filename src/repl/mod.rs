//! Interactive console for command-tree driven applications
//!
//! This module wires the completion and highlighting pipelines into a
//! reedline editor:
//! - Tab completion from a command tree, quote and escape aware
//! - Highlighting of the leading command and of flags
//! - Continuation lines for unterminated quotes and trailing backslashes
//! - Persistent command history

pub mod completer;
pub mod completion;
pub mod engine;
pub mod highlighter;
pub mod prompt;
pub mod validator;

use std::borrow::Cow;
use std::sync::Arc;

pub use completer::ReplCompleter;
pub use completion::{CompletionEngine, CompletionResult, TreeEngine};
pub use engine::{Action, Invocation, ReplEngine, interpret};
pub use highlighter::{LineHighlighter, ReplHighlighter};
pub use prompt::ConsolePrompt;
pub use validator::ConsoleValidator;

use crate::config::Config;
use crate::parser::Command;

/// Completion and highlighting bound to one command tree
pub struct Console {
    tree: Arc<Command>,
    completer: ReplCompleter,
    highlighter: ReplHighlighter,
}

impl Console {
    /// Create a console
    ///
    /// # Arguments
    /// * `tree` - Command tree to complete and highlight against
    /// * `engine` - Completion engine queried on every request
    /// * `line` - Highlighting colors and threshold
    /// * `highlight` - Whether highlighting is on
    pub fn new(
        tree: Command,
        engine: Box<dyn CompletionEngine + Send>,
        line: LineHighlighter,
        highlight: bool,
    ) -> Self {
        let tree = Arc::new(tree);
        Self {
            completer: ReplCompleter::new(tree.clone(), engine),
            highlighter: ReplHighlighter::new(tree.clone(), line, highlight),
            tree,
        }
    }

    /// Console over the configured tree, completed by [`TreeEngine`]
    pub fn from_config(config: &Config) -> Self {
        Self::new(
            config.command_tree(),
            Box::new(TreeEngine::new()),
            config.highlight.line_highlighter(),
            config.highlight.enabled,
        )
    }

    pub fn tree(&self) -> &Arc<Command> {
        &self.tree
    }

    /// Completion result for `line` with the cursor at byte `pos`
    pub fn complete(&mut self, line: &str, pos: usize) -> CompletionResult {
        self.completer.complete_line(line, pos)
    }

    /// ANSI-highlighted form of `line`
    pub fn highlight_syntax<'a>(&self, line: &'a str) -> Cow<'a, str> {
        self.highlighter.highlight_syntax(line)
    }

    pub fn into_parts(self) -> (ReplCompleter, ReplHighlighter) {
        (self.completer, self.highlighter)
    }
}

#[cfg(test)]
mod tests;
