//! Confirmation gate for destructive actions

use std::io::{self, BufRead, Write};

/// Asks the operator to approve an action
#[cfg_attr(test, mockall::automock)]
pub trait Confirm: Send + Sync {
    /// `true` to go ahead
    fn confirm(&self, question: &str) -> bool;
}

/// Approves everything; backs `--yes`
#[derive(Debug, Clone, Copy, Default)]
pub struct AssumeYes;

impl Confirm for AssumeYes {
    fn confirm(&self, _question: &str) -> bool {
        true
    }
}

/// Interactive `[y/N]` prompt on stderr, answered on stdin
#[derive(Debug, Clone, Copy, Default)]
pub struct TerminalPrompt;

impl Confirm for TerminalPrompt {
    fn confirm(&self, question: &str) -> bool {
        match prompt_line(&format!("{question} [y/N] ")) {
            Ok(answer) => is_yes(&answer),
            Err(_) => false,
        }
    }
}

fn is_yes(answer: &str) -> bool {
    matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes")
}

/// Print `prompt` to stderr and read one trimmed line from stdin
///
/// # Errors
/// I/O failure, or `UnexpectedEof` when stdin is closed.
pub fn prompt_line(prompt: &str) -> io::Result<String> {
    let mut stderr = io::stderr().lock();
    stderr.write_all(prompt.as_bytes())?;
    stderr.flush()?;

    let mut line = String::new();
    if io::stdin().lock().read_line(&mut line)? == 0 {
        return Err(io::Error::new(io::ErrorKind::UnexpectedEof, "stdin closed"));
    }
    Ok(line.trim().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_explicit_yes_confirms() {
        assert!(is_yes("y"));
        assert!(is_yes(" YES \n"));
        assert!(!is_yes(""));
        assert!(!is_yes("no"));
        assert!(!is_yes("yep"));
    }

    #[test]
    fn assume_yes_always_confirms() {
        assert!(AssumeYes.confirm("Delete everything?"));
    }
}
