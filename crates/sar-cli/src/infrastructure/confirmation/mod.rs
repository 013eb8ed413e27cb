//! Confirmation adapters for the admin gate.
//!
//! - [`TerminalConfirmation`] asks on the terminal with a `dialoguer` yes/no
//!   prompt (default "no").
//! - [`mock::ScriptedConfirmation`] answers from a script and records every
//!   prompt, for tests.

pub mod mock;

use std::io::{self, IsTerminal, Write};

use async_trait::async_trait;
use colored::Colorize;
use dialoguer::Confirm;

use crate::application::admin_gate::{ConfirmationError, ConfirmationPort, ConfirmationPrompt};

pub use mock::ScriptedConfirmation;

/// Interactive yes/no prompt on stderr.
///
/// The blocking terminal read runs on Tokio's blocking pool.  There is no
/// timeout; Ctrl-C ends the process.
#[derive(Debug, Default, Clone, Copy)]
pub struct TerminalConfirmation;

impl TerminalConfirmation {
    pub fn new() -> Self {
        Self
    }
}

fn ask_blocking(prompt: &ConfirmationPrompt) -> Result<bool, ConfirmationError> {
    if let Some(warning) = &prompt.warning {
        let _ = writeln!(io::stderr(), "{} {}", "WARNING:".yellow().bold(), warning.yellow());
    }
    Confirm::new()
        .with_prompt(prompt.question())
        .default(false)
        .interact()
        .map_err(|e| ConfirmationError::Prompt(e.to_string()))
}

#[async_trait]
impl ConfirmationPort for TerminalConfirmation {
    async fn ask(&self, prompt: &ConfirmationPrompt) -> Result<bool, ConfirmationError> {
        if !io::stdin().is_terminal() {
            return Err(ConfirmationError::NotInteractive);
        }
        let prompt = prompt.clone();
        tokio::task::spawn_blocking(move || ask_blocking(&prompt))
            .await
            .map_err(|e| ConfirmationError::Prompt(e.to_string()))?
    }
}
