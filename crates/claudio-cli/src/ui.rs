use indicatif::{ProgressBar, ProgressStyle};
use inquire::error::InquireResult;
use inquire::{Confirm, InquireError, MultiSelect, Text};
use std::time::Duration;

/// Interactive questions, answered from the terminal or from defaults.
///
/// With `assume_yes` nothing is asked: confirmations and selections take
/// their defaults, and typed confirmations count as given. Without a
/// terminal the defaults are used as well.
#[derive(Debug, Clone, Copy)]
pub struct Prompter {
    assume_yes: bool,
}

impl Prompter {
    pub fn new(assume_yes: bool) -> Self {
        Self { assume_yes }
    }

    pub fn assumes_yes(&self) -> bool {
        self.assume_yes
    }

    pub fn confirm(&self, message: &str, default: bool) -> anyhow::Result<bool> {
        if self.assume_yes {
            return Ok(default);
        }
        answer(
            Confirm::new(message).with_default(default).prompt(),
            default,
            false,
        )
    }

    /// Checkbox list; returns one flag per choice.
    pub fn select(&self, message: &str, choices: &[(&str, bool)]) -> anyhow::Result<Vec<bool>> {
        let defaults: Vec<bool> = choices.iter().map(|(_, on)| *on).collect();
        if self.assume_yes {
            return Ok(defaults);
        }
        let labels: Vec<&str> = choices.iter().map(|(label, _)| *label).collect();
        let preselected: Vec<usize> = defaults
            .iter()
            .enumerate()
            .filter(|(_, on)| **on)
            .map(|(i, _)| i)
            .collect();
        let picked = MultiSelect::new(message, labels.clone())
            .with_default(&preselected)
            .prompt()
            .map(|selected| labels.iter().map(|l| selected.contains(l)).collect());
        answer(picked, defaults, vec![false; choices.len()])
    }

    /// Ask the user to type `word` exactly.
    pub fn type_to_confirm(&self, message: &str, word: &str) -> anyhow::Result<bool> {
        if self.assume_yes {
            return Ok(true);
        }
        let typed = Text::new(message).prompt().map(|t| t.trim() == word);
        answer(typed, false, false)
    }
}

fn answer<T>(result: InquireResult<T>, default: T, cancelled: T) -> anyhow::Result<T> {
    match result {
        Ok(value) => Ok(value),
        Err(InquireError::NotTTY) => {
            tracing::debug!("no terminal attached, using default answer");
            Ok(default)
        }
        Err(InquireError::OperationCanceled) => Ok(cancelled),
        Err(e) => Err(e.into()),
    }
}

// ---------------------------------------------------------------------------
// Spinner
// ---------------------------------------------------------------------------

pub fn spinner(message: impl Into<String>, hidden: bool) -> ProgressBar {
    if hidden {
        return ProgressBar::hidden();
    }
    let bar = ProgressBar::new_spinner();
    bar.set_style(ProgressStyle::default_spinner());
    bar.set_message(message.into());
    bar.enable_steady_tick(Duration::from_millis(100));
    bar
}
