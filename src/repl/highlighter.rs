//! Syntax highlighter for console command lines
//!
//! Only two things are highlighted: the first word when it names a child of
//! the command tree root (by name or alias), and any word that looks like a
//! flag. An unterminated quoted fragment counts as a word and keeps its
//! source text. Everything else is passed through verbatim. Lines longer than
//! the configured threshold are not highlighted at all.

use std::borrow::Cow;
use std::sync::Arc;

use nu_ansi_term::{Color, Style};
use reedline::{Highlighter, StyledText};
use tracing::trace;

use crate::parser::{Command, SplitScope, split};

/// Lines with more characters than this are shown unstyled.
pub const DEFAULT_MAX_HIGHLIGHT_RUNES: usize = 2048;

/// What a token was recognized as
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    Command,
    Flag,
    Other,
}

/// A piece of the highlighted line.
///
/// `styled` is `text` wrapped in ANSI sequences; stripping them gives `text`
/// back.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub text: String,
    pub styled: String,
}

/// Highlights command lines against a command tree.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LineHighlighter {
    command_color: Color,
    flag_color: Color,
    /// 0 disables the threshold
    max_runes: usize,
}

impl LineHighlighter {
    pub fn new(command_color: Color, flag_color: Color, max_runes: usize) -> Self {
        Self {
            command_color,
            flag_color,
            max_runes,
        }
    }

    /// Same colors, different threshold.
    pub fn with_max_runes(self, max_runes: usize) -> Self {
        Self { max_runes, ..self }
    }

    pub fn max_runes(&self) -> usize {
        self.max_runes
    }

    /// Style applied to a token kind.
    pub fn style(&self, kind: TokenKind) -> Style {
        match kind {
            TokenKind::Command => Style::new().bold().fg(self.command_color),
            TokenKind::Flag => Style::new().bold().fg(self.flag_color),
            TokenKind::Other => Style::default(),
        }
    }

    /// True when `line` is too long to be highlighted.
    pub fn exceeds_threshold(&self, line: &str) -> bool {
        self.max_runes > 0 && line.chars().nth(self.max_runes).is_some()
    }

    /// Split the whole line into tokens whose texts concatenate back to it.
    pub fn tokenize(&self, line: &str, tree: &Command) -> Vec<Token> {
        let result = split(line, line.len(), SplitScope::WholeLine);
        let mut tokens = Vec::with_capacity(result.words.len() * 2 + 2);

        self.push(&mut tokens, TokenKind::Other, &result.leading);
        for word in &result.words {
            let kind = Self::classify(word.index, &word.value, tree);
            self.push(&mut tokens, kind, &word.raw);
            self.push(&mut tokens, TokenKind::Other, &word.separator);
        }

        // unterminated quoting or a trailing escape: one more word, kept verbatim
        let fragment = &result.fragment;
        if !fragment.raw.is_empty() {
            let kind = Self::classify(result.words.len(), &fragment.value, tree);
            self.push(&mut tokens, kind, &fragment.raw);
        }

        tokens
    }

    fn classify(index: usize, value: &str, tree: &Command) -> TokenKind {
        if index == 0 && tree.find_child(value).is_some() {
            TokenKind::Command
        } else if value.starts_with('-') {
            TokenKind::Flag
        } else {
            TokenKind::Other
        }
    }

    /// Highlight `line` as an ANSI string.
    ///
    /// Returns the input unchanged, without allocating, when it is empty, over
    /// the threshold, or has no command or flag in it.
    pub fn highlight<'a>(&self, line: &'a str, tree: &Command) -> Cow<'a, str> {
        if line.is_empty() {
            return Cow::Borrowed(line);
        }
        if self.exceeds_threshold(line) {
            trace!(max_runes = self.max_runes, "line over highlight threshold");
            return Cow::Borrowed(line);
        }

        let tokens = self.tokenize(line, tree);
        if tokens.iter().all(|t| t.kind == TokenKind::Other) {
            return Cow::Borrowed(line);
        }

        Cow::Owned(tokens.iter().map(|t| t.styled.as_str()).collect())
    }

    fn push(&self, tokens: &mut Vec<Token>, kind: TokenKind, text: &str) {
        if text.is_empty() {
            return;
        }
        let styled = match kind {
            TokenKind::Other => text.to_string(),
            _ => self.style(kind).paint(text).to_string(),
        };
        tokens.push(Token {
            kind,
            text: text.to_string(),
            styled,
        });
    }
}

impl Default for LineHighlighter {
    fn default() -> Self {
        Self::new(Color::Green, Color::Yellow, DEFAULT_MAX_HIGHLIGHT_RUNES)
    }
}

/// reedline highlighter backed by [`LineHighlighter`]
pub struct ReplHighlighter {
    tree: Arc<Command>,
    line: LineHighlighter,
    enabled: bool,
}

impl ReplHighlighter {
    pub fn new(tree: Arc<Command>, line: LineHighlighter, enabled: bool) -> Self {
        Self {
            tree,
            line,
            enabled,
        }
    }

    pub fn line_highlighter(&self) -> &LineHighlighter {
        &self.line
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// ANSI form of the line, or the line itself when highlighting is off.
    pub fn highlight_syntax<'a>(&self, line: &'a str) -> Cow<'a, str> {
        if !self.enabled {
            return Cow::Borrowed(line);
        }
        self.line.highlight(line, &self.tree)
    }
}

impl Highlighter for ReplHighlighter {
    fn highlight(&self, line: &str, _cursor: usize) -> StyledText {
        let mut styled = StyledText::new();

        if !self.enabled || self.line.exceeds_threshold(line) {
            styled.push((Style::default(), line.to_string()));
            return styled;
        }

        for token in self.line.tokenize(line, &self.tree) {
            styled.push((self.line.style(token.kind), token.text));
        }
        styled
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strip_ansi(s: &str) -> String {
        let mut out = String::new();
        let mut chars = s.chars();
        while let Some(c) = chars.next() {
            if c == '\x1b' {
                for c in chars.by_ref() {
                    if c == 'm' {
                        break;
                    }
                }
            } else {
                out.push(c);
            }
        }
        out
    }

    fn kinds(line: &str) -> Vec<TokenKind> {
        LineHighlighter::default()
            .tokenize(line, &Command::demo_tree())
            .into_iter()
            .filter(|t| !t.text.trim().is_empty())
            .map(|t| t.kind)
            .collect()
    }

    #[test]
    fn test_threshold_bypass() {
        let tree = Command::demo_tree();
        let highlighter = LineHighlighter::default();

        let long = "-".repeat(DEFAULT_MAX_HIGHLIGHT_RUNES + 128);
        let out = highlighter.highlight(&long, &tree);
        assert!(matches!(out, Cow::Borrowed(_)));
        assert_eq!(out, long);

        let at_limit = "-".repeat(DEFAULT_MAX_HIGHLIGHT_RUNES);
        assert!(matches!(highlighter.highlight(&at_limit, &tree), Cow::Owned(_)));
    }

    #[test]
    fn test_threshold_counts_chars() {
        let tree = Command::demo_tree();
        let highlighter = LineHighlighter::default().with_max_runes(4);
        // four chars, seven bytes
        assert!(matches!(highlighter.highlight("-ééé", &tree), Cow::Owned(_)));
        assert!(matches!(highlighter.highlight("-éééé", &tree), Cow::Borrowed(_)));
    }

    #[test]
    fn test_zero_threshold_is_unlimited() {
        let tree = Command::demo_tree();
        let highlighter = LineHighlighter::default().with_max_runes(0);
        let long = format!("run {}", "x".repeat(10_000));
        assert!(matches!(highlighter.highlight(&long, &tree), Cow::Owned(_)));
    }

    #[test]
    fn test_flag_detection() {
        let tree = Command::demo_tree();
        let line = "unknown --verbose -o file";
        let out = LineHighlighter::default().highlight(line, &tree);
        assert!(out.contains("--verbose"));
        assert!(out.contains("-o"));
        assert!(out.len() >= line.len());
        assert_eq!(strip_ansi(&out), line);
        assert_eq!(
            kinds(line),
            vec![TokenKind::Other, TokenKind::Flag, TokenKind::Flag, TokenKind::Other]
        );
    }

    #[test]
    fn test_no_op_returns_input() {
        let tree = Command::demo_tree();
        for line in ["", "foo bar baz", "  spaced   out  ", "'unterminated"] {
            let out = LineHighlighter::default().highlight(line, &tree);
            assert!(matches!(out, Cow::Borrowed(_)), "{line:?}");
            assert_eq!(out, line);
        }
    }

    #[test]
    fn test_only_first_word_is_command() {
        assert_eq!(kinds("run run"), vec![TokenKind::Command, TokenKind::Other]);
        assert_eq!(kinds("foo run"), vec![TokenKind::Other, TokenKind::Other]);
        // subcommands are not walked
        assert_eq!(kinds("set"), vec![TokenKind::Other]);
    }

    #[test]
    fn test_alias_is_command() {
        assert_eq!(kinds("quit"), vec![TokenKind::Command]);
        assert_eq!(kinds("ls -v"), vec![TokenKind::Command, TokenKind::Flag]);
    }

    #[test]
    fn test_quoted_words_matched_by_value() {
        let tokens = LineHighlighter::default().tokenize(r#""run" '-v'"#, &Command::demo_tree());
        assert_eq!(tokens[0].kind, TokenKind::Command);
        assert_eq!(tokens[0].text, "\"run\"");
        assert_eq!(tokens[2].kind, TokenKind::Flag);
        assert_eq!(tokens[2].text, "'-v'");
    }

    #[test]
    fn test_flag_in_first_position() {
        assert_eq!(kinds("--help"), vec![TokenKind::Flag]);
    }

    #[test]
    fn test_unterminated_fragment_verbatim() {
        let tree = Command::demo_tree();
        let line = r#"run -v "half open"#;
        let tokens = LineHighlighter::default().tokenize(line, &tree);
        let last = tokens.last().unwrap();
        assert_eq!(last.kind, TokenKind::Other);
        assert_eq!(last.text, r#""half open"#);

        let out = LineHighlighter::default().highlight(line, &tree);
        assert_eq!(strip_ansi(&out), line);
        assert!(out.ends_with(r#""half open"#));
    }

    #[test]
    fn test_unterminated_flag_still_styled() {
        let tree = Command::demo_tree();
        let highlighter = LineHighlighter::default();

        let line = r#"run --output="my fi"#;
        let tokens = highlighter.tokenize(line, &tree);
        let last = tokens.last().unwrap();
        assert_eq!(last.kind, TokenKind::Flag);
        assert_eq!(last.text, r#"--output="my fi"#);
        assert_eq!(strip_ansi(&highlighter.highlight(line, &tree)), line);

        let line = r#"frobnicate --output="my fi"#;
        assert!(matches!(highlighter.highlight(line, &tree), Cow::Owned(_)));
    }

    #[test]
    fn test_unterminated_first_word_can_be_command() {
        assert_eq!(kinds(r#""run"#), vec![TokenKind::Command]);
        assert_eq!(kinds("x '-v"), vec![TokenKind::Other, TokenKind::Flag]);
    }

    #[test]
    fn test_styled_strips_to_text() {
        let tree = Command::demo_tree();
        let highlighter = LineHighlighter::new(Color::Blue, Color::Red, 0);
        for line in [
            "run --verbose target",
            "  ls\t-v  ",
            r"config set key\ with\ spaces --persist",
            "exit 'trailing",
            "r -o out.txt\\",
        ] {
            for token in highlighter.tokenize(line, &tree) {
                assert_eq!(strip_ansi(&token.styled), token.text);
            }
            let tokens: String = highlighter
                .tokenize(line, &tree)
                .into_iter()
                .map(|t| t.text)
                .collect();
            assert_eq!(tokens, line);
            assert_eq!(strip_ansi(&highlighter.highlight(line, &tree)), line);
        }
    }

    #[test]
    fn test_command_style_is_bold_color() {
        let tree = Command::demo_tree();
        let out = LineHighlighter::default().highlight("run", &tree);
        assert_eq!(out, Style::new().bold().fg(Color::Green).paint("run").to_string());
    }

    #[test]
    fn test_repl_highlighter_segments() {
        let highlighter =
            ReplHighlighter::new(Arc::new(Command::demo_tree()), LineHighlighter::default(), true);
        let styled = highlighter.highlight("run -v x", 0);
        let text: String = styled.buffer.iter().map(|(_, t)| t.as_str()).collect();
        assert_eq!(text, "run -v x");
        assert_ne!(styled.render_simple(), "run -v x");
        assert_eq!(styled.buffer[0].0, Style::new().bold().fg(Color::Green));
        assert_eq!(styled.buffer[2].0, Style::new().bold().fg(Color::Yellow));
        assert_eq!(styled.buffer[4].0, Style::default());
    }

    #[test]
    fn test_repl_highlighter_disabled() {
        let highlighter =
            ReplHighlighter::new(Arc::new(Command::demo_tree()), LineHighlighter::default(), false);
        let styled = highlighter.highlight("run -v", 0);
        assert_eq!(styled.buffer.len(), 1);
        assert_eq!(styled.buffer[0], (Style::default(), "run -v".to_string()));
        assert_eq!(highlighter.highlight_syntax("run -v"), "run -v");
    }
}
