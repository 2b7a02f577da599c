use reedline::{
    ColumnarMenu, Emacs, FileBackedHistory, KeyCode, KeyModifiers, MenuBuilder, Reedline,
    ReedlineEvent, ReedlineMenu, Signal, default_emacs_keybindings,
};
use std::fmt;
use std::sync::Arc;
use tracing::{debug, warn};

use crate::config::HistoryConfig;
use crate::error::Result;
use crate::parser::{Command, SplitScope, split};

use super::Console;
use super::prompt::ConsolePrompt;
use super::validator::ConsoleValidator;

const COMPLETION_MENU: &str = "completion_menu";

/// What a submitted line asks for
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// Blank line
    Empty,
    /// `exit` or `quit`
    Exit,
    /// A command path of the tree, with its remaining words
    Run(Invocation),
    /// The first word names no command
    Unknown(String),
}

/// A resolved command line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    /// Names of the commands walked, root excluded
    pub path: Vec<String>,
    /// Decoded words that are not part of the command path
    pub args: Vec<String>,
}

impl fmt::Display for Invocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.path.join(" "))?;
        if !self.args.is_empty() {
            write!(f, " {:?}", self.args)?;
        }
        Ok(())
    }
}

/// Split a submitted line and resolve it against `tree`.
pub fn interpret(tree: &Command, line: &str) -> Action {
    let result = split(line, line.len(), SplitScope::WholeLine);
    let mut words = result.values();
    if !result.fragment.raw.is_empty() {
        words.push(result.fragment.value);
    }

    let Some(first) = words.first() else {
        return Action::Empty;
    };
    if first == "exit" || first == "quit" {
        return Action::Exit;
    }

    let (path, consumed) = tree.resolve(&words);
    if path.is_empty() {
        return Action::Unknown(first.clone());
    }

    let args = words[..consumed]
        .iter()
        .filter(|w| w.starts_with('-'))
        .chain(&words[consumed..])
        .cloned()
        .collect();

    Action::Run(Invocation {
        path: path.iter().map(|c| c.name().to_string()).collect(),
        args,
    })
}

/// REPL engine for interactive command input
pub struct ReplEngine {
    /// Line editor for command input
    editor: Reedline,

    /// Prompt shown before each line
    prompt: ConsolePrompt,

    /// Tree submitted lines are resolved against
    tree: Arc<Command>,

    /// Whether to continue running
    running: bool,
}

impl ReplEngine {
    /// Create a new REPL engine
    ///
    /// # Arguments
    /// * `console` - Completion and highlighting pipelines
    /// * `history_config` - History configuration
    ///
    /// # Returns
    /// * `Result<Self>` - New REPL engine or error
    pub fn new(console: Console, history_config: &HistoryConfig) -> Result<Self> {
        let tree = console.tree().clone();
        let prompt = ConsolePrompt::new(tree.name());
        let (completer, highlighter) = console.into_parts();

        let mut keybindings = default_emacs_keybindings();
        keybindings.add_binding(
            KeyModifiers::NONE,
            KeyCode::Tab,
            ReedlineEvent::UntilFound(vec![
                ReedlineEvent::Menu(COMPLETION_MENU.to_string()),
                ReedlineEvent::MenuNext,
            ]),
        );
        keybindings.add_binding(
            KeyModifiers::SHIFT,
            KeyCode::BackTab,
            ReedlineEvent::MenuPrevious,
        );

        let menu = ColumnarMenu::default().with_name(COMPLETION_MENU);

        let history = if history_config.persist {
            FileBackedHistory::with_file(history_config.max_size, history_config.file_path.clone())?
        } else {
            FileBackedHistory::new(history_config.max_size)?
        };
        debug!(
            persist = history_config.persist,
            path = %history_config.file_path.display(),
            "History ready"
        );

        let editor = Reedline::create()
            .with_history(Box::new(history))
            .with_completer(Box::new(completer))
            .with_highlighter(Box::new(highlighter))
            .with_validator(Box::new(ConsoleValidator::new()))
            .with_menu(ReedlineMenu::EngineCompleter(Box::new(menu)))
            .with_edit_mode(Box::new(Emacs::new(keybindings)))
            .with_quick_completions(false);

        Ok(Self {
            editor,
            prompt,
            tree,
            running: true,
        })
    }

    /// Read a single line of input
    ///
    /// # Returns
    /// * `Result<Option<String>>` - Input line, empty on Ctrl-C, None on Ctrl-D
    pub fn read_line(&mut self) -> Result<Option<String>> {
        match self.editor.read_line(&self.prompt)? {
            Signal::Success(line) => Ok(Some(line)),
            Signal::CtrlD => Ok(None),
            _ => Ok(Some(String::new())),
        }
    }

    /// Handle one submitted line
    pub fn process_input(&mut self, line: &str) {
        match interpret(&self.tree, line) {
            Action::Empty => {}
            Action::Exit => self.running = false,
            Action::Run(invocation) => {
                debug!(path = ?invocation.path, args = ?invocation.args, "Resolved line");
                self.prompt.set_last_failed(false);
                println!("{invocation}");
            }
            Action::Unknown(word) => {
                warn!(word = %word, "Unknown command");
                self.prompt.set_last_failed(true);
                eprintln!("unknown command: {word}");
            }
        }
    }

    /// Run the read loop until `exit`, `quit` or Ctrl-D
    pub fn run(&mut self) -> Result<()> {
        while self.running {
            match self.read_line()? {
                Some(line) => self.process_input(&line),
                None => break,
            }
        }
        Ok(())
    }

    /// Check if REPL is still running
    pub fn is_running(&self) -> bool {
        self.running
    }
}
