//! shellline - interactive command console
//!
//! Completes and highlights command lines against a command tree while they
//! are typed, with shell-style quoting and escaping.
//!
//! # Features
//!
//! - Tab completion of subcommands and flags
//! - Highlighting of the leading command and of flags
//! - Multi-line input for unterminated quotes
//! - Persistent history
//!
//! # Usage
//!
//! ```bash
//! # Interactive mode
//! shellline
//!
//! # One-shot completion, printed as JSON
//! shellline complete 'run --ver'
//! ```

use shellline::cli::CliInterface;
use shellline::error::Result;
use shellline::repl::{Console, ReplEngine};

/// Application entry point
fn main() {
    if let Err(e) = run() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

/// Main application logic
///
/// 1. Parse command-line arguments and load the configuration file
/// 2. Initialize logging
/// 3. Apply environment overrides
/// 4. Handle subcommands or start the console
fn run() -> Result<()> {
    let mut cli = CliInterface::new()?;

    initialize_logging(&cli);
    cli.apply_environment();

    if cli.handle_subcommand()? {
        return Ok(());
    }

    cli.print_banner();

    run_interactive_mode(&cli)
}

/// Run application in interactive REPL mode
fn run_interactive_mode(cli: &CliInterface) -> Result<()> {
    let console = Console::from_config(cli.config());
    let mut repl = ReplEngine::new(console, &cli.config().history)?;

    repl.run()?;

    if !cli.args().quiet {
        println!("Goodbye!");
    }
    Ok(())
}

/// Initialize logging system from the configured level
///
/// Logs go to stderr so they do not mix with the prompt.
fn initialize_logging(cli: &CliInterface) {
    let level = cli.config().logging.level.to_tracing_level();

    let subscriber = tracing_subscriber::fmt()
        .with_max_level(level)
        .with_target(false)
        .with_writer(std::io::stderr);

    if cli.config().logging.timestamps {
        subscriber.init();
    } else {
        subscriber.without_time().init();
    }
}
