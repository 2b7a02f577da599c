//! Completion engine seam
//!
//! An engine turns a command tree and the decoded words of the line into raw
//! candidates. Engines keep per-call execution state (flags already parsed,
//! the command reached), so every call goes through an [`EngineScope`] that
//! resets the engine when it is dropped, on every exit path.

use std::collections::BTreeSet;
use std::ops::{Deref, DerefMut};

use serde::Serialize;

use crate::error::CompletionError;
use crate::parser::Command;

/// One raw candidate as produced by an engine. `value` is decoded.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RawValue {
    pub value: String,
    pub display: String,
    pub description: String,
    /// SGR style token, e.g. `"1;32"`
    pub style: String,
    pub tag: String,
}

impl RawValue {
    /// Create a candidate with a value and a tag.
    pub fn new(value: impl Into<String>, tag: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            tag: tag.into(),
            ..Self::default()
        }
    }

    /// Set the description.
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Set the style token.
    pub fn style(mut self, style: impl Into<String>) -> Self {
        self.style = style.into();
        self
    }

    /// Set the display string.
    pub fn display(mut self, display: impl Into<String>) -> Self {
        self.display = display.into();
        self
    }
}

/// Suffix characters after which no separator is appended.
///
/// `*` in the set matches every value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct NoSpace {
    suffixes: BTreeSet<char>,
}

impl NoSpace {
    /// Build a matcher from suffix characters.
    pub fn new(suffixes: impl IntoIterator<Item = char>) -> Self {
        Self {
            suffixes: suffixes.into_iter().collect(),
        }
    }

    /// Add suffix characters.
    pub fn add(&mut self, suffixes: impl IntoIterator<Item = char>) {
        self.suffixes.extend(suffixes);
    }

    /// True when `value` must not get a trailing separator.
    pub fn matches(&self, value: &str) -> bool {
        if self.suffixes.contains(&'*') {
            return true;
        }
        value
            .chars()
            .next_back()
            .is_some_and(|last| self.suffixes.contains(&last))
    }

    /// The suffix characters, in order.
    pub fn suffixes(&self) -> impl Iterator<Item = char> + '_ {
        self.suffixes.iter().copied()
    }

    pub fn is_empty(&self) -> bool {
        self.suffixes.is_empty()
    }
}

/// Everything an engine returns besides its error.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RawCompletions {
    pub values: Vec<RawValue>,
    pub no_space: NoSpace,
    pub usage: String,
    pub messages: Vec<String>,
}

/// Engine output: data, plus an error that does not invalidate the data.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EngineReply {
    pub completions: RawCompletions,
    pub error: Option<CompletionError>,
}

impl From<RawCompletions> for EngineReply {
    fn from(completions: RawCompletions) -> Self {
        Self {
            completions,
            error: None,
        }
    }
}

/// A completion-candidate generator.
pub trait CompletionEngine {
    /// Complete the last of `args` (possibly empty) given the preceding ones.
    fn complete(&mut self, tree: &Command, args: &[String]) -> EngineReply;

    /// Clear all per-call execution state.
    fn reset(&mut self);
}

impl<E: CompletionEngine + ?Sized> CompletionEngine for Box<E> {
    fn complete(&mut self, tree: &Command, args: &[String]) -> EngineReply {
        (**self).complete(tree, args)
    }

    fn reset(&mut self) {
        (**self).reset();
    }
}

/// Exclusive access to an engine for one completion call.
///
/// Dropping the scope resets the engine, including during unwinding.
pub struct EngineScope<'e, E: CompletionEngine + ?Sized> {
    engine: &'e mut E,
}

impl<'e, E: CompletionEngine + ?Sized> EngineScope<'e, E> {
    /// Acquire the engine.
    pub fn acquire(engine: &'e mut E) -> Self {
        Self { engine }
    }
}

impl<E: CompletionEngine + ?Sized> Deref for EngineScope<'_, E> {
    type Target = E;

    fn deref(&self) -> &E {
        self.engine
    }
}

impl<E: CompletionEngine + ?Sized> DerefMut for EngineScope<'_, E> {
    fn deref_mut(&mut self) -> &mut E {
        self.engine
    }
}

impl<E: CompletionEngine + ?Sized> Drop for EngineScope<'_, E> {
    fn drop(&mut self) {
        self.engine.reset();
        tracing::trace!("completion engine context reset");
    }
}
