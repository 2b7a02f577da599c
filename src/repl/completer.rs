//! Completer for reedline - provides completion suggestions

use std::sync::Arc;

use nu_ansi_term::{Color, Style};
use reedline::{Completer, Span, Suggestion};
use tracing::{debug, trace};

use super::completion::{self, CompletionEngine, CompletionResult};
use crate::parser::{Command, SplitScope, split};

/// Console completer for reedline
pub struct ReplCompleter {
    tree: Arc<Command>,
    engine: Box<dyn CompletionEngine + Send>,
}

impl ReplCompleter {
    /// Create a completer running `engine` against `tree`
    pub fn new(tree: Arc<Command>, engine: Box<dyn CompletionEngine + Send>) -> Self {
        Self { tree, engine }
    }

    pub fn tree(&self) -> &Arc<Command> {
        &self.tree
    }

    /// Run the completion pipeline for the text left of `pos`.
    pub fn complete_line(&mut self, line: &str, pos: usize) -> CompletionResult {
        let split = split(line, pos, SplitScope::UpToCursor);
        completion::complete(&mut self.engine, &self.tree, &split)
    }
}

impl Completer for ReplCompleter {
    /// Complete the input at the given cursor position
    ///
    /// Every suggestion replaces the whole fragment under the cursor, opening
    /// quote included, with the result prefix plus the re-escaped value.
    /// Messages, and the usage line when nothing else is offered, follow the
    /// candidates as notes that leave the fragment unchanged when accepted.
    fn complete(&mut self, line: &str, pos: usize) -> Vec<Suggestion> {
        let result = self.complete_line(line, pos);

        if !result.messages.is_empty() || !result.usage.is_empty() {
            debug!(usage = %result.usage, messages = ?result.messages, "Completion notes");
        }

        let start = result.context.start;
        let span = Span::new(start, start + result.context.verbatim.len());

        let mut suggestions: Vec<Suggestion> = result
            .candidates
            .iter()
            .map(|candidate| Suggestion {
                value: result.insertion(candidate),
                description: (!candidate.description.is_empty())
                    .then(|| candidate.description.clone()),
                style: sgr_style(&candidate.style),
                extra: None,
                span,
                append_whitespace: false,
                match_indices: None,
            })
            .collect();

        suggestions.extend(notes(&result).map(|note| Suggestion {
            value: result.context.verbatim.clone(),
            description: Some(note.to_string()),
            style: Some(Style::new().dimmed().italic()),
            extra: None,
            span,
            append_whitespace: false,
            match_indices: None,
        }));

        suggestions
    }
}

/// Messages of a result, or its usage line when it has no candidates and no
/// messages.
fn notes(result: &CompletionResult) -> impl Iterator<Item = &str> {
    let usage = (result.candidates.is_empty()
        && result.messages.is_empty()
        && !result.usage.trim().is_empty())
    .then_some(result.usage.as_str());

    result.messages.iter().map(String::as_str).chain(usage)
}

/// Convert an SGR parameter string such as `"1;32"` into a style.
///
/// Returns `None` for an empty string. Unknown parameters are skipped.
pub fn sgr_style(sgr: &str) -> Option<Style> {
    if sgr.trim().is_empty() {
        return None;
    }

    let mut style = Style::new();
    let mut params = sgr.split(';').map(|p| p.trim().parse::<u8>().ok());

    while let Some(param) = params.next() {
        let Some(code) = param else {
            trace!(sgr, "skipping malformed SGR parameter");
            continue;
        };
        match code {
            0 => style = Style::new(),
            1 => style = style.bold(),
            2 => style = style.dimmed(),
            3 => style = style.italic(),
            4 => style = style.underline(),
            5 => style = style.blink(),
            7 => style = style.reverse(),
            9 => style = style.strikethrough(),
            30..=37 => style = style.fg(basic_color(code - 30)),
            40..=47 => style = style.on(basic_color(code - 40)),
            90..=97 => style = style.fg(Color::Fixed(code - 90 + 8)),
            100..=107 => style = style.on(Color::Fixed(code - 100 + 8)),
            38 | 48 => {
                let color = match params.next().flatten() {
                    Some(5) => params.next().flatten().map(Color::Fixed),
                    Some(2) => match (
                        params.next().flatten(),
                        params.next().flatten(),
                        params.next().flatten(),
                    ) {
                        (Some(r), Some(g), Some(b)) => Some(Color::Rgb(r, g, b)),
                        _ => None,
                    },
                    _ => None,
                };
                if let Some(color) = color {
                    style = if code == 38 {
                        style.fg(color)
                    } else {
                        style.on(color)
                    };
                }
            }
            _ => trace!(code, "ignoring SGR parameter"),
        }
    }

    Some(style)
}

fn basic_color(index: u8) -> Color {
    match index {
        0 => Color::Black,
        1 => Color::Red,
        2 => Color::Green,
        3 => Color::Yellow,
        4 => Color::Blue,
        5 => Color::Purple,
        6 => Color::Cyan,
        _ => Color::White,
    }
}
