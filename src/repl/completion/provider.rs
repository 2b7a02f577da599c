//! Command-tree completion engine
//!
//! [`TreeEngine`] completes subcommands and flags by walking a [`Command`]
//! tree along the words already typed. The walk leaves state behind (the
//! command path reached, flags already given, the first error) which is the
//! per-call context the adapter resets after every request.

use std::cmp::Ordering;
use std::collections::BTreeSet;

use tracing::trace;

use super::engine::{CompletionEngine, EngineReply, RawCompletions, RawValue};
use crate::error::CompletionError;
use crate::parser::{Command, Flag};

/// Tag of single-dash flag candidates
pub const SHORT_FLAGS_TAG: &str = "shorthand flags";
/// Tag of double-dash flag candidates
pub const LONG_FLAGS_TAG: &str = "longhand flags";
/// Tag of commands without a group
pub const COMMANDS_TAG: &str = "commands";

/// Where the walk over the completed words ended.
struct Position<'t> {
    node: &'t Command,
    /// Value-taking flag given as the last word, still waiting for its value
    pending: Option<&'t Flag>,
    /// A positional argument was seen, so no more subcommands
    positional: bool,
    /// `--` was seen, so no more flags either
    args_only: bool,
}

/// Completion engine over a static command tree.
#[derive(Debug, Default)]
pub struct TreeEngine {
    path: Vec<String>,
    seen_flags: BTreeSet<String>,
    error: Option<CompletionError>,
}

impl TreeEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Names of the commands walked by the last call.
    pub fn path(&self) -> &[String] {
        &self.path
    }

    /// Long names of the flags given to the current command in the last call.
    pub fn seen_flags(&self) -> &BTreeSet<String> {
        &self.seen_flags
    }

    /// True when no state from a previous call is left.
    pub fn is_clean(&self) -> bool {
        self.path.is_empty() && self.seen_flags.is_empty() && self.error.is_none()
    }

    /// Keep the first error of the call.
    fn fail(&mut self, err: CompletionError) {
        trace!(error = %err, "tree walk error");
        if self.error.is_none() {
            self.error = Some(err);
        }
    }

    fn walk<'t>(&mut self, tree: &'t Command, words: &[String]) -> Position<'t> {
        let mut position = Position {
            node: tree,
            pending: None,
            positional: false,
            args_only: false,
        };

        for word in words {
            if position.pending.take().is_some() {
                continue;
            }
            if position.args_only {
                continue;
            }
            if word == "--" {
                position.args_only = true;
                position.positional = true;
                continue;
            }

            if let Some(long) = word.strip_prefix("--") {
                position.pending = self.long_flag(position.node, long);
                continue;
            }

            if let Some(cluster) = word.strip_prefix('-').filter(|c| !c.is_empty()) {
                position.pending = self.short_flags(position.node, cluster);
                continue;
            }

            let child = if position.positional {
                None
            } else {
                position.node.find_child(word)
            };
            match child {
                Some(child) => {
                    self.path.push(child.name().to_string());
                    self.seen_flags.clear();
                    position.node = child;
                }
                None => position.positional = true,
            }
        }

        position
    }

    /// Record `--name` or `--name=value`; returns the flag if its value is
    /// the next word.
    fn long_flag<'t>(&mut self, node: &'t Command, long: &str) -> Option<&'t Flag> {
        let (name, value) = match long.split_once('=') {
            Some((name, value)) => (name, Some(value)),
            None => (long, None),
        };

        let Some(flag) = node.find_long_flag(name) else {
            self.fail(CompletionError::UnknownFlag(format!("--{name}")));
            return None;
        };

        self.seen_flags.insert(flag.long.clone());
        match (flag.takes_value, value) {
            (true, None) => Some(flag),
            (true, Some("")) => {
                self.fail(CompletionError::MissingFlagValue(format!("--{name}")));
                None
            }
            _ => None,
        }
    }

    /// Record a cluster such as `-vo`. A value-taking flag ends the cluster:
    /// the rest of the cluster is its value, or the next word if nothing is left.
    fn short_flags<'t>(&mut self, node: &'t Command, cluster: &str) -> Option<&'t Flag> {
        for (i, c) in cluster.char_indices() {
            let Some(flag) = node.find_short_flag(c) else {
                self.fail(CompletionError::UnknownFlag(format!("-{c}")));
                return None;
            };
            self.seen_flags.insert(flag.long.clone());
            if flag.takes_value {
                let rest = &cluster[i + c.len_utf8()..];
                return rest.is_empty().then_some(flag);
            }
        }
        None
    }

    fn flag_candidates(&self, node: &Command, fragment: &str, raw: &mut RawCompletions) {
        let long_only = fragment.starts_with("--");
        let mut short = Vec::new();
        let mut long = Vec::new();

        for flag in node.flags.iter().filter(|f| !self.seen_flags.contains(&f.long)) {
            if let Some(c) = flag.short.filter(|_| !long_only) {
                short.push(RawValue::new(format!("-{c}"), SHORT_FLAGS_TAG).description(&flag.usage));
            }

            let value = if flag.takes_value {
                format!("--{}=", flag.long)
            } else {
                format!("--{}", flag.long)
            };
            long.push(RawValue::new(value, LONG_FLAGS_TAG).description(&flag.usage));
        }

        let short = filter_by_prefix(short, fragment);
        let long = filter_by_prefix(long, fragment);
        if long.iter().any(|v| v.value.ends_with('=')) {
            raw.no_space.add(['=']);
        }
        raw.values.extend(short);
        raw.values.extend(long);
    }

    fn command_candidates(node: &Command, fragment: &str, raw: &mut RawCompletions) {
        let commands = node
            .children()
            .iter()
            .filter(|c| !c.hidden)
            .map(|c| {
                let tag = match &c.group {
                    Some(group) => format!("{group} {COMMANDS_TAG}"),
                    None => COMMANDS_TAG.to_string(),
                };
                RawValue::new(c.name(), tag).description(&c.short)
            })
            .collect();
        raw.values.extend(filter_by_prefix(commands, fragment));
    }
}

impl CompletionEngine for TreeEngine {
    fn complete(&mut self, tree: &Command, args: &[String]) -> EngineReply {
        let (fragment, words) = match args.split_last() {
            Some((fragment, words)) => (fragment.as_str(), words),
            None => ("", args),
        };

        let position = self.walk(tree, words);
        let mut raw = RawCompletions {
            usage: position.node.usage.clone(),
            ..RawCompletions::default()
        };

        if let Some(flag) = position.pending {
            raw.messages.push(value_message(flag));
        } else if let Some((name, _)) = fragment.strip_prefix("--").and_then(|l| l.split_once('=')) {
            match position.node.find_long_flag(name) {
                Some(flag) => raw.messages.push(value_message(flag)),
                None => self.fail(CompletionError::UnknownFlag(format!("--{name}"))),
            }
        } else if position.args_only {
            trace!("past --, nothing to complete");
        } else if fragment.starts_with('-') {
            self.flag_candidates(position.node, fragment, &mut raw);
        } else if !position.positional {
            Self::command_candidates(position.node, fragment, &mut raw);
        }

        trace!(
            path = ?self.path,
            candidates = raw.values.len(),
            "tree engine completed"
        );

        EngineReply {
            completions: raw,
            error: self.error.clone(),
        }
    }

    fn reset(&mut self) {
        self.path.clear();
        self.seen_flags.clear();
        self.error = None;
    }
}

fn value_message(flag: &Flag) -> String {
    if flag.usage.is_empty() {
        format!("--{} expects a value", flag.long)
    } else {
        format!("--{} expects a value ({})", flag.long, flag.usage)
    }
}

/// Keep the values starting with `prefix`, exact match first, then shorter
/// values, then alphabetical.
fn filter_by_prefix(values: Vec<RawValue>, prefix: &str) -> Vec<RawValue> {
    let mut filtered: Vec<RawValue> = values
        .into_iter()
        .filter(|v| v.value.starts_with(prefix))
        .collect();

    filtered.sort_by(|a, b| {
        if !prefix.is_empty() {
            match (a.value == prefix, b.value == prefix) {
                (true, false) => return Ordering::Less,
                (false, true) => return Ordering::Greater,
                _ => {}
            }
        }

        a.value
            .len()
            .cmp(&b.value.len())
            .then_with(|| a.value.cmp(&b.value))
    });

    filtered
}
