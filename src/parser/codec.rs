//! Prefix codec: the inverse of the splitter's quoting rules
//!
//! Completion engines work on decoded values. Before a candidate goes back
//! into the buffer it has to be escaped for the quote context the user left
//! open, so that splitting the buffer again yields the candidate's value.

use serde::Serialize;

use super::split::{Quote, QuoteState, SplitResult, SplitScope, split};

/// Quote context of the fragment being completed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PrefixContext {
    /// Quote and escape state at the end of the fragment
    pub state: QuoteState,
    /// Fragment exactly as typed
    pub verbatim: String,
    /// Fragment with quotes and escapes resolved
    pub decoded: String,
    /// Byte offset of the fragment in the buffer
    pub start: usize,
}

impl PrefixContext {
    /// Capture the context of a split's trailing fragment.
    pub fn from_split(split: &SplitResult) -> Self {
        Self {
            state: split.fragment.state,
            verbatim: split.fragment.raw.clone(),
            decoded: split.fragment.value.clone(),
            start: split.fragment.start,
        }
    }

    /// Quote left open at the end of the fragment.
    pub fn quote(&self) -> Quote {
        self.state.quote
    }

    /// Text to put in front of every re-encoded candidate: the open quote.
    pub fn opening(&self) -> &'static str {
        self.quote().as_str()
    }

    /// Escape `value` for this context.
    pub fn encode(&self, value: &str) -> String {
        reencode(value, self.quote())
    }

    /// Text ending a finished candidate: the closing quote, if any, then a space.
    pub fn terminator(&self) -> String {
        format!("{} ", self.quote().as_str())
    }
}

/// Resolve quotes and escapes of a verbatim prefix.
///
/// Unquoted whitespace in the input is kept as a single space between the
/// decoded pieces rather than splitting the prefix.
pub fn decode(verbatim: &str) -> String {
    let result = split(verbatim, verbatim.len(), SplitScope::UpToCursor);
    if result.words.is_empty() {
        return result.fragment.value;
    }

    let mut parts = result.values();
    if !result.fragment.raw.is_empty() {
        parts.push(result.fragment.value);
    }
    parts.join(" ")
}

/// Escape `value` so that, typed after an opening `quote`, it splits back
/// into `value`.
///
/// Inside single quotes nothing can be escaped, so a `'` is emitted as
/// `'\''`: close, escaped quote, reopen. The quote context after the value is
/// the same as before it.
pub fn reencode(value: &str, quote: Quote) -> String {
    let mut out = String::with_capacity(value.len() + 2);

    match quote {
        Quote::None => {
            for c in value.chars() {
                match c {
                    // An escaped newline is a continuation, quote it instead.
                    '\n' => out.push_str("'\n'"),
                    c if c.is_whitespace() || matches!(c, '\\' | '\'' | '"') => {
                        out.push('\\');
                        out.push(c);
                    }
                    c => out.push(c),
                }
            }
        }
        Quote::Double => {
            for c in value.chars() {
                if matches!(c, '"' | '\\' | '$' | '`') {
                    out.push('\\');
                }
                out.push(c);
            }
        }
        Quote::Single => {
            for c in value.chars() {
                if c == '\'' {
                    out.push_str("'\\''");
                } else {
                    out.push(c);
                }
            }
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Split `text` as a whole line and return its single word.
    fn resplit(text: &str) -> String {
        let result = split(text, text.len(), SplitScope::WholeLine);
        assert_eq!(result.words.len(), 1, "{text:?} should be one word");
        result.words[0].value.clone()
    }

    const AWKWARD: &[&str] = &[
        "plain",
        "two words",
        "it's",
        r#"say "hi""#,
        r"back\slash",
        "$HOME and `cmd`",
        "tab\there",
        "line\nbreak",
    ];

    #[test]
    fn test_reencode_unquoted() {
        for value in AWKWARD {
            assert_eq!(resplit(&reencode(value, Quote::None)), *value);
        }
        assert_eq!(reencode("a b", Quote::None), r"a\ b");
    }

    #[test]
    fn test_reencode_double() {
        for value in AWKWARD {
            let inserted = format!("\"{}\"", reencode(value, Quote::Double));
            assert_eq!(resplit(&inserted), *value);
        }
        assert_eq!(reencode(r#"a"b"#, Quote::Double), r#"a\"b"#);
    }

    #[test]
    fn test_reencode_single() {
        for value in AWKWARD {
            let inserted = format!("'{}'", reencode(value, Quote::Single));
            assert_eq!(resplit(&inserted), *value);
        }
    }

    #[test]
    fn test_reencode_keeps_quote_context_open() {
        // Without the closing quote the fragment must still decode to the value
        // and still be inside the same quote.
        for (quote, open) in [(Quote::Double, "\""), (Quote::Single, "'")] {
            let typed = format!("{open}{}", reencode("it's \"x\"", quote));
            let result = split(&typed, typed.len(), SplitScope::UpToCursor);
            assert_eq!(result.fragment.value, "it's \"x\"");
            assert_eq!(result.fragment.state.quote, quote);
        }
    }

    #[test]
    fn test_decode() {
        assert_eq!(decode(r#""my fi"#), "my fi");
        assert_eq!(decode(r"a\ b"), "a b");
        assert_eq!(decode("'x'y"), "xy");
        assert_eq!(decode(""), "");
    }

    #[test]
    fn test_context_from_split() {
        let line = r#"open "my fi"#;
        let ctx = PrefixContext::from_split(&split(line, line.len(), SplitScope::UpToCursor));
        assert_eq!(ctx.quote(), Quote::Double);
        assert!(!ctx.state.escaped);
        assert_eq!(ctx.verbatim, r#""my fi"#);
        assert_eq!(ctx.decoded, "my fi");
        assert_eq!(ctx.start, 5);
        assert_eq!(ctx.opening(), "\"");
        assert_eq!(ctx.terminator(), "\" ");
        assert_eq!(decode(&ctx.verbatim), ctx.decoded);
    }

    #[test]
    fn test_context_keeps_pending_escape() {
        let line = "cat foo\\";
        let ctx = PrefixContext::from_split(&split(line, line.len(), SplitScope::UpToCursor));
        assert!(ctx.state.escaped);
        assert!(ctx.state.is_open());
        assert_eq!(ctx.quote(), Quote::None);
        assert_eq!(ctx.verbatim, "foo\\");
        assert_eq!(ctx.start, 4);
        assert_eq!(ctx.terminator(), " ");

        let line = "cat 'foo\\";
        let ctx = PrefixContext::from_split(&split(line, line.len(), SplitScope::UpToCursor));
        assert!(!ctx.state.escaped);
        assert_eq!(ctx.quote(), Quote::Single);
    }
}
