//! Shell-word splitting for the edit buffer
//!
//! The buffer is split into completed words plus one trailing fragment while
//! tracking quote and escape state. Input is usually incomplete while it is
//! being typed, so nothing here fails: an open quote or a dangling backslash
//! simply leaves the partial word in the fragment.
//!
//! Every byte of the scanned text lands in exactly one verbatim piece (the
//! leading whitespace, a word, a word's trailing separator, or the fragment),
//! so the original text can always be rebuilt.

use std::fmt;
use std::ops::Range;

use serde::Serialize;

/// Quoting mode active at a point of the scan.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Quote {
    /// Outside any quotes
    #[default]
    None,
    /// Inside `'...'`
    Single,
    /// Inside `"..."`
    Double,
}

impl Quote {
    /// The quote character opening (and closing) this mode.
    pub fn as_char(self) -> Option<char> {
        match self {
            Quote::None => None,
            Quote::Single => Some('\''),
            Quote::Double => Some('"'),
        }
    }

    /// Opening quote as a string, empty outside quotes.
    pub fn as_str(self) -> &'static str {
        match self {
            Quote::None => "",
            Quote::Single => "'",
            Quote::Double => "\"",
        }
    }
}

/// Quote mode plus a pending backslash.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct QuoteState {
    pub quote: Quote,
    pub escaped: bool,
}

impl QuoteState {
    /// True when the scan stopped inside quotes or right after a backslash.
    pub fn is_open(&self) -> bool {
        self.quote != Quote::None || self.escaped
    }
}

/// Which part of the buffer gets split.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SplitScope {
    /// Only the text left of the cursor. The last word is always the
    /// fragment being typed, even when its quoting is balanced.
    UpToCursor,
    /// The whole line. The last word is only left as a fragment when its
    /// quoting is unterminated.
    WholeLine,
}

/// A completed word.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Word {
    /// Position in the word sequence
    pub index: usize,
    /// Value with quotes and escapes resolved
    pub value: String,
    /// Source text of the word, quotes and backslashes included
    pub raw: String,
    /// Byte range of `raw` in the buffer
    pub span: Range<usize>,
    /// Unquoted whitespace following the word
    pub separator: String,
}

/// The trailing, unfinished word.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Fragment {
    /// Decoded value typed so far
    pub value: String,
    /// Source text of the fragment
    pub raw: String,
    /// Byte offset of the fragment in the buffer
    pub start: usize,
    /// Quote/escape state at the end of the fragment
    pub state: QuoteState,
}

/// Non-fatal conditions left at the end of a scan.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SplitAnomaly {
    UnterminatedSingleQuote,
    UnterminatedDoubleQuote,
    TrailingEscape,
}

impl fmt::Display for SplitAnomaly {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SplitAnomaly::UnterminatedSingleQuote => write!(f, "unterminated single-quoted string"),
            SplitAnomaly::UnterminatedDoubleQuote => write!(f, "unterminated double-quoted string"),
            SplitAnomaly::TrailingEscape => write!(f, "unterminated backslash-escape"),
        }
    }
}

/// Outcome of [`split`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SplitResult {
    /// Whitespace before the first word
    pub leading: String,
    /// Completed words, in order
    pub words: Vec<Word>,
    /// Trailing fragment (may be empty)
    pub fragment: Fragment,
    /// Byte length of the scanned text, i.e. the effective cursor
    pub cursor: usize,
}

impl SplitResult {
    /// Decoded values of the completed words.
    pub fn values(&self) -> Vec<String> {
        self.words.iter().map(|w| w.value.clone()).collect()
    }

    /// The anomaly the scan ended on, if the fragment's quoting is open.
    pub fn anomaly(&self) -> Option<SplitAnomaly> {
        let state = self.fragment.state;
        match state.quote {
            Quote::Single => Some(SplitAnomaly::UnterminatedSingleQuote),
            Quote::Double => Some(SplitAnomaly::UnterminatedDoubleQuote),
            Quote::None if state.escaped => Some(SplitAnomaly::TrailingEscape),
            Quote::None => None,
        }
    }

    /// Distance from the fragment start to the cursor, in bytes.
    pub fn fragment_offset(&self) -> usize {
        self.cursor - self.fragment.start
    }

    /// Rebuild the scanned text from the verbatim pieces.
    pub fn reassemble(&self) -> String {
        let mut out = String::with_capacity(self.cursor);
        out.push_str(&self.leading);
        for word in &self.words {
            out.push_str(&word.raw);
            out.push_str(&word.separator);
        }
        out.push_str(&self.fragment.raw);
        out
    }
}

/// Split `buffer` into shell words.
///
/// `cursor` is a byte offset; it is clamped to the buffer and moved back to
/// the nearest character boundary. It is ignored for [`SplitScope::WholeLine`].
pub fn split(buffer: &str, cursor: usize, scope: SplitScope) -> SplitResult {
    let text = match scope {
        SplitScope::UpToCursor => &buffer[..floor_char_boundary(buffer, cursor)],
        SplitScope::WholeLine => buffer,
    };

    let mut result = SplitResult {
        cursor: text.len(),
        ..SplitResult::default()
    };
    let mut state = QuoteState::default();
    let mut value = String::new();
    let mut word_start: Option<usize> = None;

    for (i, c) in text.char_indices() {
        if state.escaped {
            state.escaped = false;
            match state.quote {
                // backslash-newline is a line continuation
                Quote::None | Quote::Single => {
                    if c != '\n' {
                        value.push(c);
                    }
                }
                Quote::Double => match c {
                    '"' | '\\' | '$' | '`' => value.push(c),
                    '\n' => {}
                    _ => {
                        value.push('\\');
                        value.push(c);
                    }
                },
            }
            continue;
        }

        match state.quote {
            Quote::Single => {
                if c == '\'' {
                    state.quote = Quote::None;
                } else {
                    value.push(c);
                }
            }
            Quote::Double => match c {
                '"' => state.quote = Quote::None,
                '\\' => state.escaped = true,
                _ => value.push(c),
            },
            Quote::None => {
                if c.is_whitespace() {
                    if let Some(start) = word_start.take() {
                        push_word(&mut result, text, start..i, std::mem::take(&mut value));
                    }
                    match result.words.last_mut() {
                        Some(last) => last.separator.push(c),
                        None => result.leading.push(c),
                    }
                    continue;
                }

                word_start.get_or_insert(i);
                match c {
                    '\\' => state.escaped = true,
                    '\'' => state.quote = Quote::Single,
                    '"' => state.quote = Quote::Double,
                    _ => value.push(c),
                }
            }
        }
    }

    match word_start {
        Some(start) if scope == SplitScope::WholeLine && !state.is_open() => {
            push_word(&mut result, text, start..text.len(), value);
            result.fragment.start = text.len();
        }
        Some(start) => {
            result.fragment = Fragment {
                value,
                raw: text[start..].to_string(),
                start,
                state,
            };
        }
        None => result.fragment.start = text.len(),
    }

    result
}

fn push_word(result: &mut SplitResult, text: &str, span: Range<usize>, value: String) {
    result.words.push(Word {
        index: result.words.len(),
        value,
        raw: text[span.clone()].to_string(),
        span,
        separator: String::new(),
    });
}

/// Largest char boundary of `s` not greater than `index`.
pub(crate) fn floor_char_boundary(s: &str, index: usize) -> usize {
    let mut index = index.min(s.len());
    while !s.is_char_boundary(index) {
        index -= 1;
    }
    index
}

#[cfg(test)]
mod tests {
    use super::*;

    fn values(line: &str) -> Vec<String> {
        split(line, line.len(), SplitScope::WholeLine).values()
    }

    #[test]
    fn test_plain_words() {
        assert_eq!(values("run --flag value"), vec!["run", "--flag", "value"]);
    }

    #[test]
    fn test_quotes_join_and_strip() {
        assert_eq!(values(r#"echo "a b" 'c d'"#), vec!["echo", "a b", "c d"]);
        assert_eq!(values(r#"a"b c"d"#), vec!["ab cd"]);
    }

    #[test]
    fn test_escapes() {
        assert_eq!(values(r"one\ word"), vec!["one word"]);
        assert_eq!(values(r#""say \"hi\"""#), vec![r#"say "hi""#]);
        // Inside double quotes only a few characters are escapable
        assert_eq!(values(r#""a\nb""#), vec![r"a\nb"]);
        // Inside single quotes a backslash is literal
        assert_eq!(values(r"'a\b'"), vec![r"a\b"]);
        // Line continuation
        assert_eq!(values("ab\\\ncd"), vec!["abcd"]);
    }

    #[test]
    fn test_cursor_truncates() {
        let result = split("config set verbose", 9, SplitScope::UpToCursor);
        assert_eq!(result.values(), vec!["config"]);
        assert_eq!(result.fragment.value, "se");
        assert_eq!(result.fragment.start, 7);
        assert_eq!(result.fragment_offset(), 2);
    }

    #[test]
    fn test_trailing_space_gives_empty_fragment() {
        let result = split("config ", 7, SplitScope::UpToCursor);
        assert_eq!(result.values(), vec!["config"]);
        assert_eq!(result.fragment.raw, "");
        assert_eq!(result.fragment.start, 7);
        assert_eq!(result.anomaly(), None);
    }

    #[test]
    fn test_up_to_cursor_keeps_last_word_as_fragment() {
        let result = split("run --flag", 10, SplitScope::UpToCursor);
        assert_eq!(result.values(), vec!["run"]);
        assert_eq!(result.fragment.value, "--flag");

        let whole = split("run --flag", 0, SplitScope::WholeLine);
        assert_eq!(whole.values(), vec!["run", "--flag"]);
        assert!(whole.fragment.raw.is_empty());
    }

    #[test]
    fn test_unterminated_quote_is_fragment() {
        let line = r#"open "my fi"#;
        let result = split(line, line.len(), SplitScope::WholeLine);
        assert_eq!(result.values(), vec!["open"]);
        assert_eq!(result.fragment.raw, r#""my fi"#);
        assert_eq!(result.fragment.value, "my fi");
        assert_eq!(result.fragment.state.quote, Quote::Double);
        assert_eq!(result.anomaly(), Some(SplitAnomaly::UnterminatedDoubleQuote));
    }

    #[test]
    fn test_trailing_escape_is_fragment() {
        let result = split(r"cat foo\", 8, SplitScope::UpToCursor);
        assert_eq!(result.fragment.value, "foo");
        assert!(result.fragment.state.escaped);
        assert_eq!(result.anomaly(), Some(SplitAnomaly::TrailingEscape));
    }

    #[test]
    fn test_reassemble_round_trip() {
        let lines = [
            "",
            "   ",
            "  run  --flag   value ",
            r#"echo "a  b"   'c'\ d"#,
            "tab\tseparated\nwords",
            r#"x "unterminated  "#,
            "ünïcödé wörds",
        ];
        for line in lines {
            for cursor in 0..=line.len() {
                if !line.is_char_boundary(cursor) {
                    continue;
                }
                let result = split(line, cursor, SplitScope::UpToCursor);
                assert_eq!(result.reassemble(), &line[..cursor], "line {line:?} cursor {cursor}");
            }
            let whole = split(line, 0, SplitScope::WholeLine);
            assert_eq!(whole.reassemble(), line);
        }
    }

    #[test]
    fn test_word_spans_index_buffer() {
        let line = "  add  'x y' z";
        let result = split(line, line.len(), SplitScope::WholeLine);
        for (i, word) in result.words.iter().enumerate() {
            assert_eq!(word.index, i);
            assert_eq!(&line[word.span.clone()], word.raw);
        }
        assert_eq!(result.leading, "  ");
        assert_eq!(result.words[0].separator, "  ");
    }

    #[test]
    fn test_cursor_inside_multibyte_char() {
        let line = "é";
        let result = split(line, 1, SplitScope::UpToCursor);
        assert_eq!(result.cursor, 0);
        assert!(result.fragment.raw.is_empty());
    }
}
