//! Custom prompt implementation for the console

use std::borrow::Cow;

use reedline::{Prompt, PromptEditMode, PromptHistorySearch, PromptHistorySearchStatus};

/// Custom prompt for the console REPL
pub struct ConsolePrompt {
    /// Name shown before the indicator, usually the root command's name
    name: String,
    /// Whether the last submitted line named no known command
    last_failed: bool,
}

impl ConsolePrompt {
    /// Create a new console prompt
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            last_failed: false,
        }
    }

    /// Record the outcome of the last submitted line
    pub fn set_last_failed(&mut self, failed: bool) {
        self.last_failed = failed;
    }
}

impl Prompt for ConsolePrompt {
    fn render_prompt_left(&self) -> Cow<'_, str> {
        if self.last_failed {
            format!("{} [!]> ", self.name).into()
        } else {
            format!("{}> ", self.name).into()
        }
    }

    fn render_prompt_right(&self) -> Cow<'_, str> {
        "".into()
    }

    /// The indicator is part of the left prompt
    fn render_prompt_indicator(&self, _prompt_mode: PromptEditMode) -> Cow<'_, str> {
        "".into()
    }

    /// Shown on lines continuing an unterminated quote or escape
    fn render_prompt_multiline_indicator(&self) -> Cow<'_, str> {
        "... ".into()
    }

    fn render_prompt_history_search_indicator(
        &self,
        history_search: PromptHistorySearch,
    ) -> Cow<'_, str> {
        let prefix = match history_search.status {
            PromptHistorySearchStatus::Passing => "",
            PromptHistorySearchStatus::Failing => "failing ",
        };

        format!("({}reverse-search: {}) ", prefix, history_search.term).into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_prompt() {
        let prompt = ConsolePrompt::new("console");
        assert_eq!(prompt.render_prompt_left(), "console> ");
    }

    #[test]
    fn test_failed_prompt() {
        let mut prompt = ConsolePrompt::new("console");
        prompt.set_last_failed(true);
        assert_eq!(prompt.render_prompt_left(), "console [!]> ");
        prompt.set_last_failed(false);
        assert_eq!(prompt.render_prompt_left(), "console> ");
    }

    #[test]
    fn test_right_prompt_and_indicator_empty() {
        let prompt = ConsolePrompt::new("console");
        assert_eq!(prompt.render_prompt_right(), "");
        assert_eq!(prompt.render_prompt_indicator(PromptEditMode::Default), "");
    }

    #[test]
    fn test_multiline_indicator() {
        let prompt = ConsolePrompt::new("console");
        assert_eq!(prompt.render_prompt_multiline_indicator(), "... ");
    }
}
