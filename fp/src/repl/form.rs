//! Interactive profile form
//!
//! Asks for each profile field in turn, prefilled with its current value.
//! Invalid input re-asks the same field.

use colored::Colorize;
use eyre::Result;
use rustyline::DefaultEditor;
use rustyline::error::ReadlineError;
use tracing::debug;

use crate::domain::{ProfileBuilder, ProfileField, UserProfile};

/// Source of input lines
pub trait LineSource {
    /// Read one line, prefilled with `initial`
    ///
    /// `Ok(None)` means the user cancelled (Ctrl+C or Ctrl+D).
    fn read_line(&mut self, prompt: &str, initial: &str) -> Result<Option<String>>;
}

impl LineSource for DefaultEditor {
    fn read_line(&mut self, prompt: &str, initial: &str) -> Result<Option<String>> {
        match self.readline_with_initial(prompt, (initial, "")) {
            Ok(line) => {
                if !line.trim().is_empty() {
                    let _ = self.add_history_entry(line.as_str());
                }
                Ok(Some(line))
            }
            Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => Ok(None),
            Err(err) => Err(eyre::eyre!("Readline error: {}", err)),
        }
    }
}

/// Collect a full profile, starting from `start`
///
/// Returns `None` if the user cancels part way.
pub fn collect_profile(input: &mut dyn LineSource, start: ProfileBuilder) -> Result<Option<UserProfile>> {
    debug!("collect_profile: called");
    println!();
    println!("{}", "Enter Your Details:".bright_cyan().bold());

    let mut builder = start;
    for field in ProfileField::ALL {
        loop {
            let prompt = format!("{}: ", field.label().bright_white());
            let Some(line) = input.read_line(&prompt, &builder.current(field))? else {
                debug!(field = field.name(), "collect_profile: cancelled");
                return Ok(None);
            };

            match builder.clone().set_raw(field, &line) {
                Ok(next) => {
                    builder = next;
                    break;
                }
                Err(e) => println!("{} {}", "!".red(), e),
            }
        }
    }

    Ok(Some(builder.build()))
}
