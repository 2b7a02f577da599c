//! Command tree model
//!
//! A tree of commands, each with a usage line, aliases, flags and children.
//! The keystroke pipelines only read it: the highlighter looks at the root's
//! immediate children and the completion engine walks it along the typed
//! words. Trees can be built in code or deserialized from the config file.

use serde::{Deserialize, Serialize};

/// A node of the command tree.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Command {
    /// Usage line; its first space-delimited token is the command name
    pub usage: String,

    /// One-line description
    #[serde(default)]
    pub short: String,

    /// Alternative names
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub aliases: Vec<String>,

    /// Group title used to tag this command in completions
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group: Option<String>,

    /// Hidden commands are never offered as completions
    #[serde(default)]
    pub hidden: bool,

    /// Flags accepted by this command
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub flags: Vec<Flag>,

    /// Subcommands
    #[serde(default, rename = "commands", skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<Command>,
}

/// A flag declared on a command.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Flag {
    /// Long name without dashes
    pub long: String,

    /// Single-character short name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub short: Option<char>,

    /// Description
    #[serde(default)]
    pub usage: String,

    /// Whether the flag consumes a value
    #[serde(default)]
    pub takes_value: bool,
}

impl Command {
    /// Create a command from its usage line.
    pub fn new(usage: impl Into<String>) -> Self {
        Self {
            usage: usage.into(),
            ..Self::default()
        }
    }

    /// Set the description.
    pub fn short(mut self, short: impl Into<String>) -> Self {
        self.short = short.into();
        self
    }

    /// Add an alias.
    pub fn alias(mut self, alias: impl Into<String>) -> Self {
        self.aliases.push(alias.into());
        self
    }

    /// Set the completion group.
    pub fn group(mut self, group: impl Into<String>) -> Self {
        self.group = Some(group.into());
        self
    }

    /// Add a flag.
    pub fn flag(mut self, flag: Flag) -> Self {
        self.flags.push(flag);
        self
    }

    /// Add a subcommand.
    pub fn subcommand(mut self, child: Command) -> Self {
        self.children.push(child);
        self
    }

    /// Primary invocation name: the first token of the usage line.
    pub fn name(&self) -> &str {
        self.usage.split(' ').next().unwrap_or_default()
    }

    /// Immediate children.
    pub fn children(&self) -> &[Command] {
        &self.children
    }

    /// True when `word` is this command's name or one of its aliases.
    pub fn is_invoked_by(&self, word: &str) -> bool {
        self.name() == word || self.aliases.iter().any(|a| a == word)
    }

    /// Immediate child invoked by `word`, in declaration order.
    pub fn find_child(&self, word: &str) -> Option<&Command> {
        self.children.iter().find(|c| c.is_invoked_by(word))
    }

    /// Look up a flag by its long name.
    pub fn find_long_flag(&self, long: &str) -> Option<&Flag> {
        self.flags.iter().find(|f| f.long == long)
    }

    /// Look up a flag by its short name.
    pub fn find_short_flag(&self, short: char) -> Option<&Flag> {
        self.flags.iter().find(|f| f.short == Some(short))
    }

    /// Walk down the tree along leading words that name subcommands.
    ///
    /// Returns the command path (root excluded) and the number of words
    /// consumed. Flags and positional arguments stop the walk only in the
    /// sense that they are not consumed as commands; the walk continues past
    /// flags so `cmd --flag sub` still reaches `sub`.
    pub fn resolve<'a, S: AsRef<str>>(&'a self, words: &[S]) -> (Vec<&'a Command>, usize) {
        let mut path = Vec::new();
        let mut node = self;
        let mut consumed = 0;

        for (i, word) in words.iter().enumerate() {
            let word = word.as_ref();
            if word.starts_with('-') {
                continue;
            }
            match node.find_child(word) {
                Some(child) => {
                    path.push(child);
                    node = child;
                    consumed = i + 1;
                }
                None => break,
            }
        }

        (path, consumed)
    }

    /// The built-in tree used when the configuration declares no commands.
    pub fn demo_tree() -> Command {
        let verbose = Flag::new("verbose").short('v').usage("Show more output");
        let output = Flag::new("output")
            .short('o')
            .usage("Write results to a file")
            .takes_value();

        Command::new("console")
            .subcommand(Command::new("help [command]").short("Show help for a command"))
            .subcommand(
                Command::new("exit")
                    .short("Leave the console")
                    .alias("quit"),
            )
            .subcommand(
                Command::new("config <subcommand>")
                    .short("Inspect or change settings")
                    .group("core")
                    .subcommand(Command::new("get <key>").short("Print a setting"))
                    .subcommand(
                        Command::new("set <key> <value>")
                            .short("Change a setting")
                            .flag(Flag::new("persist").short('p').usage("Write to the config file")),
                    ),
            )
            .subcommand(
                Command::new("run <target> [args...]")
                    .short("Run a target")
                    .group("core")
                    .alias("r")
                    .flag(verbose.clone())
                    .flag(output.clone())
                    .flag(Flag::new("dry-run").usage("Print what would run")),
            )
            .subcommand(
                Command::new("list [pattern]")
                    .short("List available targets")
                    .group("core")
                    .alias("ls")
                    .flag(verbose)
                    .flag(output),
            )
    }
}

impl Flag {
    /// Create a flag from its long name.
    pub fn new(long: impl Into<String>) -> Self {
        Self {
            long: long.into(),
            ..Self::default()
        }
    }

    /// Set the short name.
    pub fn short(mut self, short: char) -> Self {
        self.short = Some(short);
        self
    }

    /// Set the description.
    pub fn usage(mut self, usage: impl Into<String>) -> Self {
        self.usage = usage.into();
        self
    }

    /// Mark the flag as consuming a value.
    pub fn takes_value(mut self) -> Self {
        self.takes_value = true;
        self
    }
}
