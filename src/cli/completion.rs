//! Shell completion generation for shellline
//!
//! Scripts for bash, zsh and fish are generated from the clap definition.
//! Bash additionally gets a hook that completes the argument of
//! `shellline complete` with the console's own command names.

use clap::CommandFactory;
use clap_complete::{Shell, generate};

use crate::cli::CliArgs;
use crate::error::{ConfigError, ConsoleError, Result};

const BIN_NAME: &str = "shellline";

/// Print the completion script for `shell_name` to stdout
pub fn generate_completion(shell_name: &str) -> Result<()> {
    print!("{}", completion_script(shell_name)?);
    Ok(())
}

/// Build the completion script for `shell_name`
///
/// # Arguments
/// * `shell_name` - Shell type (bash, zsh, fish), case-insensitive
pub fn completion_script(shell_name: &str) -> Result<String> {
    let shell = parse_shell(shell_name)?;

    let mut cmd = CliArgs::command();
    let mut buffer = Vec::new();
    generate(shell, &mut cmd, BIN_NAME, &mut buffer);
    let script = String::from_utf8_lossy(&buffer).into_owned();

    Ok(match shell {
        Shell::Bash => format!("{script}{BASH_CONSOLE_HOOK}"),
        _ => script,
    })
}

/// Parse shell name string to Shell enum
fn parse_shell(shell_name: &str) -> Result<Shell> {
    match shell_name.to_lowercase().as_str() {
        "bash" => Ok(Shell::Bash),
        "zsh" => Ok(Shell::Zsh),
        "fish" => Ok(Shell::Fish),
        _ => Err(ConsoleError::Config(ConfigError::Generic(format!(
            "Unsupported shell: {}. Supported shells: bash, zsh, fish",
            shell_name
        )))),
    }
}

const BASH_CONSOLE_HOOK: &str = r#"
# Complete `shellline complete <LINE>` with console commands
_shellline_console_commands() {
    shellline complete "$1" 2>/dev/null \
        | sed -n 's/^ *"value": "\(.*\)",\{0,1\}$/\1/p'
}

_shellline_enhanced() {
    local cur prev words cword
    _init_completion || return

    if [[ "${words[1]}" == "complete" && $cword -eq 2 ]]; then
        COMPREPLY=($(compgen -W "$(_shellline_console_commands "$cur")" -- "$cur"))
        return 0
    fi

    _shellline "$@"
}

complete -F _shellline_enhanced shellline
"#;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_shell() {
        assert!(matches!(parse_shell("bash"), Ok(Shell::Bash)));
        assert!(matches!(parse_shell("zsh"), Ok(Shell::Zsh)));
        assert!(matches!(parse_shell("fish"), Ok(Shell::Fish)));
        assert!(parse_shell("invalid").is_err());
    }

    #[test]
    fn test_parse_shell_case_insensitive() {
        assert!(matches!(parse_shell("BASH"), Ok(Shell::Bash)));
        assert!(matches!(parse_shell("Zsh"), Ok(Shell::Zsh)));
        assert!(matches!(parse_shell("FiSh"), Ok(Shell::Fish)));
    }

    #[test]
    fn test_bash_script_has_console_hook() {
        let script = completion_script("bash").unwrap();
        assert!(script.contains("_shellline_enhanced"));
        assert!(script.contains("complete -F _shellline_enhanced shellline"));
    }

    #[test]
    fn test_fish_script_is_plain() {
        let script = completion_script("fish").unwrap();
        assert!(script.contains("shellline"));
        assert!(!script.contains("_shellline_enhanced"));
    }

    #[test]
    fn test_unsupported_shell_message() {
        let err = completion_script("powershell").unwrap_err();
        assert!(err.to_string().contains("Unsupported shell: powershell"));
    }
}
