use super::*;
use crate::error::CompletionError;
use crate::parser::{SplitScope, split};
use crate::repl::completion::{EngineReply, FLAGS_TAG, RawCompletions, RawValue, TagGroup};
use crate::repl::highlighter::DEFAULT_MAX_HIGHLIGHT_RUNES;

fn demo_console() -> Console {
    Console::from_config(&Config::default())
}

/// Engine that always fails, optionally after producing some values.
struct BrokenEngine {
    values: Vec<RawValue>,
}

impl CompletionEngine for BrokenEngine {
    fn complete(&mut self, _tree: &Command, _args: &[String]) -> EngineReply {
        EngineReply {
            completions: RawCompletions {
                values: self.values.clone(),
                ..RawCompletions::default()
            },
            error: Some(CompletionError::Engine("backend went away".to_string())),
        }
    }

    fn reset(&mut self) {}
}

fn broken_console(values: Vec<RawValue>) -> Console {
    Console::new(
        Command::demo_tree(),
        Box::new(BrokenEngine { values }),
        LineHighlighter::default(),
        true,
    )
}

#[test]
fn test_long_line_is_not_highlighted() {
    let console = demo_console();
    let line = format!("run {}", "-".repeat(DEFAULT_MAX_HIGHLIGHT_RUNES + 128));

    let out = console.highlight_syntax(&line);
    assert!(matches!(out, Cow::Borrowed(_)));
    assert_eq!(out, line);
}

#[test]
fn test_flag_is_styled_without_losing_text() {
    let console = demo_console();
    let line = "list --verbose pattern";

    let out = console.highlight_syntax(line);
    assert!(out.contains("--verbose"));
    assert!(out.len() >= line.len());
    assert_ne!(out, line);
}

#[test]
fn test_split_round_trip_at_every_cursor() {
    let line = r#"config set "log level" it\'s 'dé jà' --output=x"#;

    for cursor in (0..=line.len()).filter(|&i| line.is_char_boundary(i)) {
        let result = split(line, cursor, SplitScope::UpToCursor);
        if result.anomaly().is_some() {
            continue;
        }
        assert_eq!(result.reassemble(), &line[..cursor], "cursor {cursor}");
    }
}

#[test]
fn test_failed_engine_still_yields_result() {
    let mut console = broken_console(Vec::new());
    let result = console.complete("run ", 4);

    assert!(result.is_empty());
    assert!(result.error.is_some());
    assert!(result.messages.iter().any(|m| m.contains("backend went away")));
}

#[test]
fn test_failed_engine_keeps_partial_candidates() {
    let mut console = broken_console(vec![RawValue::new("target", "targets")]);
    let result = console.complete("run ", 4);

    assert_eq!(result.candidates.len(), 1);
    assert_eq!(result.candidates[0].value, "target ");
    assert_eq!(result.messages.len(), 1);
}

#[test]
fn test_unknown_flag_reported_with_candidates() {
    let mut console = demo_console();
    let result = console.complete("run --bogus -", 13);

    assert!(!result.is_empty());
    assert_eq!(
        result.error,
        Some(CompletionError::UnknownFlag("--bogus".to_string()))
    );
}

#[test]
fn test_flag_tags_unified() {
    let mut console = demo_console();
    let result = console.complete("run -", 5);

    assert!(result.candidates.iter().any(|c| c.value == "-v "));
    assert!(result.candidates.iter().any(|c| c.value == "--verbose "));
    assert!(result.candidates.iter().all(|c| c.tag == FLAGS_TAG));
    assert!(result.candidates.iter().all(|c| c.group == TagGroup::Flags));
}

#[test]
fn test_plain_line_is_unchanged() {
    let console = demo_console();
    for line in ["frobnicate the thing", "  ", "x run", "a'b c"] {
        let out = console.highlight_syntax(line);
        assert_eq!(out.len(), line.len());
        assert_eq!(out, line);
    }
}

#[test]
fn test_only_first_word_is_a_command() {
    let console = demo_console();
    let out = console.highlight_syntax("run run");

    assert_eq!(out.matches("run").count(), 2);
    assert_eq!(out.matches('\u{1b}').count(), 2);
    assert!(out.ends_with("\u{1b}[0m run"));
}

#[test]
fn test_second_word_command_name_not_styled_without_first() {
    let console = demo_console();
    let line = "frobnicate config";
    assert_eq!(console.highlight_syntax(line), line);
}

#[test]
fn test_highlight_disabled() {
    let console = Console::new(
        Command::demo_tree(),
        Box::new(TreeEngine::new()),
        LineHighlighter::default(),
        false,
    );
    assert_eq!(console.highlight_syntax("run -v"), "run -v");
}

#[test]
fn test_engine_context_does_not_leak_between_requests() {
    let mut console = demo_console();

    let first = console.complete("run --verbose -", 15);
    assert!(!first.candidates.iter().any(|c| c.value == "--verbose "));

    let second = console.complete("list -", 6);
    assert!(second.candidates.iter().any(|c| c.value == "--verbose "));
    assert!(second.error.is_none());
}

#[test]
fn test_completion_inside_quotes_round_trips() {
    let mut console = demo_console();
    let line = "\"li";
    let result = console.complete(line, line.len());

    assert_eq!(result.candidates.len(), 1);
    let inserted = result.insertion(&result.candidates[0]);
    let accepted = format!("{}{}", &line[..result.context.start], inserted);
    assert_eq!(split(&accepted, accepted.len(), SplitScope::WholeLine).values(), vec!["list"]);
}
