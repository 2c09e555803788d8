//! Running the user's editor and asking for confirmation.

use anyhow::{bail, Context, Result};
use std::io::{self, BufRead, Write};
use std::path::Path;
use std::process::Command;

/// Open `path` in `command` and wait for the editor to exit.
///
/// The command may carry arguments, e.g. `code --wait`.
pub fn edit_file(command: &str, path: &Path) -> Result<()> {
    let mut parts = command.split_whitespace();
    let Some(program) = parts.next() else {
        bail!("Editor command is empty");
    };

    log::debug!("Opening {} in {}", path.display(), command);
    let status = Command::new(program)
        .args(parts)
        .arg(path)
        .status()
        .with_context(|| format!("Failed to start editor '{}'", command))?;

    if !status.success() {
        bail!("Editor '{}' exited with {}", command, status);
    }
    Ok(())
}

/// Ask a yes/no question on stderr and read the answer from stdin.
pub fn confirm(question: &str) -> Result<bool> {
    eprint!("{} [y/N] ", question);
    io::stderr().flush()?;

    let mut answer = String::new();
    io::stdin().lock().read_line(&mut answer)?;
    Ok(is_yes(&answer))
}

fn is_yes(answer: &str) -> bool {
    matches!(answer.trim().to_lowercase().as_str(), "y" | "yes")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_yes() {
        assert!(is_yes("y\n"));
        assert!(is_yes(" YES "));
        assert!(!is_yes("\n"));
        assert!(!is_yes("no"));
    }

    #[test]
    fn test_empty_editor_command() {
        let error = edit_file("  ", Path::new("a.diff")).unwrap_err();
        assert_eq!(error.to_string(), "Editor command is empty");
    }

    #[cfg(unix)]
    #[test]
    fn test_editor_exit_status() {
        assert!(edit_file("true", Path::new("a.diff")).is_ok());
        assert!(edit_file("false", Path::new("a.diff")).is_err());
    }
}
