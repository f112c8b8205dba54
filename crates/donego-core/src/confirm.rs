use std::io::{self, BufRead, IsTerminal, Write};

use tracing::{debug, warn};

/// Asks the user before a destructive command is dispatched.
pub trait Confirm {
    fn confirm(&mut self, prompt: &str) -> anyhow::Result<bool>;
}

#[derive(Debug, Clone)]
pub struct TerminalConfirm {
    assume_yes: bool,
    enabled: bool,
}

impl TerminalConfirm {
    pub fn new(assume_yes: bool, enabled: bool) -> Self {
        Self {
            assume_yes,
            enabled,
        }
    }
}

impl Confirm for TerminalConfirm {
    #[tracing::instrument(skip(self))]
    fn confirm(&mut self, prompt: &str) -> anyhow::Result<bool> {
        if self.assume_yes || !self.enabled {
            debug!(assume_yes = self.assume_yes, "confirmation skipped");
            return Ok(true);
        }

        let stdin = io::stdin();
        if !stdin.is_terminal() {
            warn!("stdin is not a terminal; pass --yes to confirm");
            return Ok(false);
        }

        let mut stderr = io::stderr().lock();
        write!(stderr, "{prompt} [y/N] ")?;
        stderr.flush()?;

        let mut answer = String::new();
        stdin.lock().read_line(&mut answer)?;
        Ok(is_yes(&answer))
    }
}

/// Replays fixed answers; used by tests and scripted callers.
#[derive(Debug, Clone, Default)]
pub struct ScriptedConfirm {
    answers: Vec<bool>,
    pub asked: Vec<String>,
}

impl ScriptedConfirm {
    pub fn new(answers: impl IntoIterator<Item = bool>) -> Self {
        let mut answers: Vec<bool> = answers.into_iter().collect();
        answers.reverse();
        Self {
            answers,
            asked: Vec::new(),
        }
    }
}

impl Confirm for ScriptedConfirm {
    fn confirm(&mut self, prompt: &str) -> anyhow::Result<bool> {
        self.asked.push(prompt.to_string());
        Ok(self.answers.pop().unwrap_or(false))
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

    #[test]
    fn assume_yes_short_circuits() {
        let mut confirm = TerminalConfirm::new(true, true);
        assert!(confirm.confirm("Delete?").expect("confirm"));

        let mut disabled = TerminalConfirm::new(false, false);
        assert!(disabled.confirm("Delete?").expect("confirm"));
    }

    #[test]
    fn scripted_answers_replay_in_order() {
        let mut confirm = ScriptedConfirm::new([true, false]);
        assert!(confirm.confirm("a").expect("confirm"));
        assert!(!confirm.confirm("b").expect("confirm"));
        assert!(!confirm.confirm("c").expect("confirm"));
        assert_eq!(confirm.asked, vec!["a", "b", "c"]);
    }
}
