use helpdesk_core::effect::Confirm;
use std::io::{BufRead, Write};

/// Asks on stdout and reads one line from stdin. Anything but `y`/`yes`
/// declines, including EOF.
#[derive(Clone, Copy, Debug, Default)]
pub struct StdinConfirm;

impl Confirm for StdinConfirm {
    fn confirm(&self, prompt: &str) -> bool {
        let mut out = std::io::stdout().lock();
        if write!(out, "{prompt} [y/N] ").and_then(|_| out.flush()).is_err() {
            return false;
        }
        drop(out);

        let mut line = String::new();
        match std::io::stdin().lock().read_line(&mut line) {
            Ok(0) | Err(_) => false,
            Ok(_) => is_yes(&line),
        }
    }
}

/// Skips the question; set by `--yes`.
#[derive(Clone, Copy, Debug, Default)]
pub struct AssumeYes;

impl Confirm for AssumeYes {
    fn confirm(&self, _prompt: &str) -> bool {
        true
    }
}

fn is_yes(answer: &str) -> bool {
    matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_explicit_yes_confirms() {
        assert!(is_yes("y\n"));
        assert!(is_yes(" YES "));
        assert!(!is_yes(""));
        assert!(!is_yes("n"));
        assert!(!is_yes("yep"));
    }
}
