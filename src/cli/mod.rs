//! Command-line interface for shellline
//!
//! This module handles:
//! - Command-line argument parsing using clap
//! - Configuration loading and validation
//! - One-shot subcommands that run a console pipeline and exit

pub mod completion;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::config::{Config, LogLevel};
use crate::error::Result;
use crate::repl::Console;

/// shellline - interactive command console with tree-driven completion
#[derive(Parser, Debug)]
#[command(
    name = "shellline",
    version,
    about = "Interactive command console with completion and highlighting",
    long_about = "An interactive console that completes and highlights command lines against a
command tree, with shell-style quoting and escaping."
)]
pub struct CliArgs {
    /// Configuration file path
    #[arg(short = 'c', long = "config", value_name = "FILE")]
    pub config_file: Option<PathBuf>,

    /// Disable syntax highlighting
    #[arg(long = "no-highlight")]
    pub no_highlight: bool,

    /// Lines longer than this are not highlighted (0 = no limit)
    #[arg(long, value_name = "N")]
    pub max_highlight_runes: Option<usize>,

    /// Quiet mode (minimal output)
    #[arg(short = 'q', long)]
    pub quiet: bool,

    /// Verbose mode (detailed logging)
    #[arg(short = 'v', long)]
    pub verbose: bool,

    /// Very verbose mode (debug logging)
    #[arg(long = "vv")]
    pub very_verbose: bool,

    /// Subcommands
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Subcommands for shellline
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Show version information
    Version,

    /// Generate shell completion script
    Completion {
        /// Shell type (bash, zsh, fish)
        #[arg(value_name = "SHELL")]
        shell: String,
    },

    /// Show configuration
    Config {
        /// Show effective configuration
        #[arg(long)]
        show: bool,

        /// Validate configuration file
        #[arg(long)]
        validate: bool,
    },

    /// Complete a line once and print the result as JSON
    Complete {
        /// Line to complete
        #[arg(value_name = "LINE", allow_hyphen_values = true)]
        line: String,

        /// Cursor byte offset (defaults to the end of the line)
        #[arg(long, value_name = "N")]
        cursor: Option<usize>,
    },

    /// Highlight a line once and print it
    Highlight {
        /// Line to highlight
        #[arg(value_name = "LINE", allow_hyphen_values = true)]
        line: String,
    },
}

/// CLI interface handler
pub struct CliInterface {
    /// Parsed command-line arguments
    args: CliArgs,

    /// Loaded configuration
    config: Config,
}

impl CliInterface {
    /// Create a new CLI interface from the process arguments
    ///
    /// Environment overrides are applied separately by
    /// [`apply_environment`](Self::apply_environment), once logging is up.
    pub fn new() -> Result<Self> {
        Self::from_args(CliArgs::parse())
    }

    /// Create a CLI interface from already parsed arguments
    pub fn from_args(args: CliArgs) -> Result<Self> {
        let config = Self::load_config(&args)?;
        Ok(Self { args, config })
    }

    /// Load configuration from file and merge with arguments
    ///
    /// # Arguments
    /// * `args` - Command-line arguments
    ///
    /// # Returns
    /// * `Result<Config>` - Loaded configuration or error
    fn load_config(args: &CliArgs) -> Result<Config> {
        let config_path = args.config_file.as_deref();
        let mut config = Config::load_from_file(config_path)?;

        if let Err(e) = config.validate() {
            eprintln!("Warning: Configuration validation failed: {}", e);
            eprintln!("Using default configuration instead.");
            config = Config::default();
        }

        Self::apply_args_to_config(&mut config, args);

        Ok(config)
    }

    /// Apply environment overrides, keeping command-line values on top
    pub fn apply_environment(&mut self) {
        self.apply_environment_with(|key| std::env::var(key).ok());
    }

    fn apply_environment_with<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        self.config.apply_env_with(lookup);
        Self::apply_highlight_args(&mut self.config, &self.args);
    }

    /// Get the configuration
    ///
    /// # Returns
    /// * `&Config` - Reference to configuration
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Get the CLI arguments
    ///
    /// # Returns
    /// * `&CliArgs` - Reference to arguments
    pub fn args(&self) -> &CliArgs {
        &self.args
    }

    /// Apply CLI arguments to configuration
    fn apply_args_to_config(config: &mut Config, args: &CliArgs) {
        Self::apply_highlight_args(config, args);
        Self::apply_logging_args(config, args);
    }

    fn apply_highlight_args(config: &mut Config, args: &CliArgs) {
        if args.no_highlight {
            config.highlight.enabled = false;
        }
        if let Some(max_runes) = args.max_highlight_runes {
            config.highlight.max_runes = max_runes;
        }
    }

    fn apply_logging_args(config: &mut Config, args: &CliArgs) {
        if args.very_verbose {
            config.logging.level = LogLevel::Trace;
        } else if args.verbose {
            config.logging.level = LogLevel::Debug;
        } else if args.quiet {
            config.logging.level = LogLevel::Error;
        }
    }

    /// Handle subcommands
    ///
    /// # Returns
    /// * `Result<bool>` - True if a subcommand ran and the console should not start
    pub fn handle_subcommand(&self) -> Result<bool> {
        match &self.args.command {
            Some(Commands::Version) => {
                self.show_version();
                Ok(true)
            }
            Some(Commands::Completion { shell }) => {
                completion::generate_completion(shell)?;
                Ok(true)
            }
            Some(Commands::Config { show, validate }) => {
                self.handle_config_command(*show, *validate)?;
                Ok(true)
            }
            Some(Commands::Complete { line, cursor }) => {
                println!("{}", self.complete_to_json(line, *cursor)?);
                Ok(true)
            }
            Some(Commands::Highlight { line }) => {
                let console = Console::from_config(&self.config);
                println!("{}", console.highlight_syntax(line));
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Show version information
    fn show_version(&self) {
        println!("shellline version {}", env!("CARGO_PKG_VERSION"));
        println!("Rust version: {}", env!("CARGO_PKG_RUST_VERSION"));
    }

    /// Run the completion pipeline once, serialized as pretty JSON
    fn complete_to_json(&self, line: &str, cursor: Option<usize>) -> Result<String> {
        let cursor = cursor.unwrap_or(line.len()).min(line.len());
        let mut console = Console::from_config(&self.config);
        let result = console.complete(line, cursor);
        Ok(serde_json::to_string_pretty(&result)?)
    }

    /// Handle config subcommand
    ///
    /// # Arguments
    /// * `show` - Whether to show configuration
    /// * `validate` - Whether to validate configuration
    fn handle_config_command(&self, show: bool, validate: bool) -> Result<()> {
        if validate {
            self.validate_config_file()?;
        }

        if show || !validate {
            self.show_config()?;
        }

        Ok(())
    }

    /// Validate configuration file
    fn validate_config_file(&self) -> Result<()> {
        let path = self.get_config_path();
        println!("Validating configuration file: {}", path.display());

        if !path.exists() {
            println!("❌ Configuration file does not exist");
            return Ok(());
        }

        match Config::load_from_file(Some(path.as_path())) {
            Ok(config) => match config.validate() {
                Ok(_) => println!("✅ Configuration is valid"),
                Err(e) => println!("❌ Configuration validation failed: {}", e),
            },
            Err(e) => println!("❌ Failed to load configuration: {}", e),
        }

        Ok(())
    }

    /// Show effective configuration
    fn show_config(&self) -> Result<()> {
        let path = self.get_config_path();
        println!("# Configuration file: {}", path.display());
        println!();
        println!("{}", self.config.to_toml()?);
        Ok(())
    }

    /// Get configuration file path (from args or default)
    fn get_config_path(&self) -> PathBuf {
        self.args
            .config_file
            .clone()
            .unwrap_or_else(Config::default_config_path)
    }

    /// Print banner with version and exit hint
    pub fn print_banner(&self) {
        if !self.args.quiet {
            println!("shellline {}", env!("CARGO_PKG_VERSION"));
            println!("Tab completes, `exit` or Ctrl-D leaves.");
        }
    }
}
