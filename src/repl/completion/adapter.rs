//! Completion adapter - reshapes engine output into a [`CompletionResult`]
//!
//! The adapter drives the engine with the split words, then for every raw
//! candidate:
//! 1. re-escapes the decoded value for the fragment's quote context
//! 2. appends the terminator (closing quote + space) unless no-space matches
//! 3. folds short/long flag tags into a single "flags" tag
//! 4. strips styling from command groups and justifies their descriptions
//!
//! Engine messages and failures are merged into the result; a failure never
//! discards the candidates that were collected.

use std::collections::BTreeSet;

use tracing::{debug, warn};

use super::engine::{CompletionEngine, EngineReply, EngineScope};
use super::result::{Candidate, CompletionResult, FLAGS_TAG, TagGroup};
use crate::parser::{Command, PrefixContext, SplitResult};

/// Run one completion request against `engine`.
///
/// The engine receives the decoded completed words followed by the decoded
/// fragment. It is reset before this function returns, whatever it produced.
pub fn complete<E>(engine: &mut E, tree: &Command, split: &SplitResult) -> CompletionResult
where
    E: CompletionEngine + ?Sized,
{
    let context = PrefixContext::from_split(split);

    let mut args = split.values();
    args.push(context.decoded.clone());

    debug!(
        words = args.len() - 1,
        fragment = %context.verbatim,
        quote = ?context.quote(),
        escaped = context.state.escaped,
        "Completing line"
    );

    let reply = {
        let mut scope = EngineScope::acquire(engine);
        scope.complete(tree, &args)
    };

    shape(reply, context)
}

/// Convert an engine reply into the console's completion model.
pub fn shape(reply: EngineReply, context: PrefixContext) -> CompletionResult {
    let EngineReply {
        completions: raw,
        error,
    } = reply;

    let mut result = CompletionResult::new(context);
    let terminator = result.context.terminator();

    for value in raw.values {
        let group = TagGroup::classify(&value.tag);
        let no_space = raw.no_space.matches(&value.value);

        let mut insert = result.context.encode(&value.value);
        if !no_space {
            insert.push_str(&terminator);
        }

        let display = if value.display.is_empty() {
            value.value
        } else {
            value.display
        };

        let (tag, style) = match group {
            TagGroup::Flags => (FLAGS_TAG.to_string(), value.style),
            TagGroup::Commands => (value.tag, String::new()),
            TagGroup::Other => (value.tag, value.style),
        };

        result.candidates.push(Candidate {
            value: insert,
            display,
            description: value.description,
            style,
            tag,
            group,
            no_space,
        });
    }

    result.usage = raw.usage;

    let command_tags: BTreeSet<String> = result
        .candidates
        .iter()
        .filter(|c| c.group == TagGroup::Commands)
        .map(|c| c.tag.clone())
        .collect();
    if !command_tags.is_empty() {
        result.justify(&command_tags);
    }

    for message in raw.messages {
        result.merge_message(message);
    }

    if let Some(err) = error {
        warn!(error = %err, kept = result.candidates.len(), "Completion engine failed");
        result.merge_message(format!("failed to load completions: {err}"));
        result.error = Some(err);
    }

    result.no_space = raw.no_space.suffixes().collect();

    debug!(candidates = result.candidates.len(), "Completion shaped");
    result
}
