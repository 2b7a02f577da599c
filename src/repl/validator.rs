//! Validator for reedline - validates line completeness

use reedline::{ValidationResult, Validator};
use tracing::trace;

use crate::parser::{SplitScope, split};

/// Console validator for reedline
///
/// A line that ends inside quotes or on a backslash continues on the next
/// line instead of being submitted.
#[derive(Debug, Default)]
pub struct ConsoleValidator;

impl ConsoleValidator {
    /// Create a new console validator
    pub fn new() -> Self {
        Self
    }
}

impl Validator for ConsoleValidator {
    fn validate(&self, line: &str) -> ValidationResult {
        if line.trim().is_empty() {
            return ValidationResult::Complete;
        }

        match split(line, line.len(), SplitScope::WholeLine).anomaly() {
            Some(anomaly) => {
                trace!(%anomaly, "input continues on next line");
                ValidationResult::Incomplete
            }
            None => ValidationResult::Complete,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_input() {
        let validator = ConsoleValidator::new();
        assert!(matches!(validator.validate(""), ValidationResult::Complete));
        assert!(matches!(validator.validate("   "), ValidationResult::Complete));
    }

    #[test]
    fn test_simple_command() {
        let validator = ConsoleValidator::new();
        assert!(matches!(validator.validate("run target"), ValidationResult::Complete));
        assert!(matches!(validator.validate("config set key value"), ValidationResult::Complete));
    }

    #[test]
    fn test_unterminated_quotes() {
        let validator = ConsoleValidator::new();
        assert!(matches!(validator.validate("run \"my target"), ValidationResult::Incomplete));
        assert!(matches!(validator.validate("run 'my target"), ValidationResult::Incomplete));
        assert!(matches!(validator.validate("run \"my\ntarget\""), ValidationResult::Complete));
    }

    #[test]
    fn test_trailing_backslash() {
        let validator = ConsoleValidator::new();
        assert!(matches!(validator.validate("run target \\"), ValidationResult::Incomplete));
        assert!(matches!(validator.validate("run target \\\nmore"), ValidationResult::Complete));
    }

    #[test]
    fn test_quotes_inside_other_quotes() {
        let validator = ConsoleValidator::new();
        assert!(matches!(validator.validate(r#"run "it's""#), ValidationResult::Complete));
        assert!(matches!(validator.validate(r#"run 'say "hi'"#), ValidationResult::Complete));
        assert!(matches!(validator.validate(r#"run "esc \" still open"#), ValidationResult::Incomplete));
    }
}
