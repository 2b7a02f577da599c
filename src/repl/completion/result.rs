//! Completion result model handed to the line editor

use std::collections::BTreeSet;

use serde::Serialize;

use crate::error::CompletionError;
use crate::parser::PrefixContext;

/// Tag shared by short and long flags after grouping.
pub const FLAGS_TAG: &str = "flags";

/// Rendering group of a candidate, derived from its engine tag.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TagGroup {
    /// Short or long flags, rendered side by side under one tag
    Flags,
    /// Any tag ending in "commands"
    Commands,
    #[default]
    Other,
}

impl TagGroup {
    pub fn classify(tag: &str) -> Self {
        match tag {
            "shorthand flags" | "longhand flags" | FLAGS_TAG => TagGroup::Flags,
            t if t.ends_with("commands") => TagGroup::Commands,
            _ => TagGroup::Other,
        }
    }
}

/// A UI-ready completion candidate.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Candidate {
    /// Text to insert after the result prefix, escaped for the quote context
    pub value: String,
    pub display: String,
    pub description: String,
    /// SGR style token; empty for command groups
    pub style: String,
    pub tag: String,
    pub group: TagGroup,
    /// Whether the engine's no-space rule kept the separator off this value
    pub no_space: bool,
}

/// Structured completion result for one completion request.
///
/// Always built, even when the engine fails: the failure is kept in `error`
/// and described in `messages`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CompletionResult {
    pub candidates: Vec<Candidate>,
    /// Prepended to every candidate value on insertion
    pub prefix: String,
    /// Quote context and verbatim text of the fragment being replaced
    pub context: PrefixContext,
    pub usage: String,
    pub messages: Vec<String>,
    /// Suffix characters that suppress the trailing separator
    pub no_space: BTreeSet<char>,
    /// Tags whose descriptions were justified
    pub justified: BTreeSet<String>,
    pub error: Option<CompletionError>,
}

impl CompletionResult {
    /// Empty result for a fragment context.
    pub fn new(context: PrefixContext) -> Self {
        Self {
            prefix: context.opening().to_string(),
            context,
            ..Self::default()
        }
    }

    /// Append a message, skipping empty and repeated ones.
    pub fn merge_message(&mut self, message: impl Into<String>) {
        let message = message.into();
        if message.trim().is_empty() || self.messages.contains(&message) {
            return;
        }
        self.messages.push(message);
    }

    /// Pad the display of every candidate tagged with one of `tags` to a
    /// common width, so their descriptions start on the same column.
    pub fn justify(&mut self, tags: &BTreeSet<String>) {
        let width = self
            .candidates
            .iter()
            .filter(|c| tags.contains(&c.tag))
            .map(|c| c.display.chars().count())
            .max()
            .unwrap_or(0);

        for candidate in self.candidates.iter_mut().filter(|c| tags.contains(&c.tag)) {
            candidate.display = format!("{:<width$}", candidate.display);
        }

        self.justified.extend(tags.iter().cloned());
    }

    /// Text replacing the fragment when `candidate` is accepted.
    pub fn insertion(&self, candidate: &Candidate) -> String {
        format!("{}{}", self.prefix, candidate.value)
    }

    /// Candidates carrying `tag`.
    pub fn tagged<'a>(&'a self, tag: &'a str) -> impl Iterator<Item = &'a Candidate> + 'a {
        self.candidates.iter().filter(move |c| c.tag == tag)
    }

    pub fn is_empty(&self) -> bool {
        self.candidates.is_empty()
    }
}
