//! Scripted confirmation port for tests.
//!
//! Answers come from a queue; once the queue is empty the fallback answer is
//! used.  Every prompt is recorded so tests can assert what was asked.

use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;

use crate::application::admin_gate::{ConfirmationError, ConfirmationPort, ConfirmationPrompt};

/// A [`ConfirmationPort`] that replays scripted answers.
pub struct ScriptedConfirmation {
    answers: Mutex<VecDeque<bool>>,
    fallback: Option<bool>,
    prompts: Mutex<Vec<ConfirmationPrompt>>,
}

impl ScriptedConfirmation {
    /// Replays `answers` in order, then fails with
    /// [`ConfirmationError::NotInteractive`].
    pub fn new(answers: impl IntoIterator<Item = bool>) -> Self {
        Self {
            answers: Mutex::new(answers.into_iter().collect()),
            fallback: None,
            prompts: Mutex::new(Vec::new()),
        }
    }

    /// Answers `answer` to every prompt.
    pub fn always(answer: bool) -> Self {
        Self {
            fallback: Some(answer),
            ..Self::new([])
        }
    }

    /// Every prompt received so far.
    pub fn prompts(&self) -> Vec<ConfirmationPrompt> {
        self.prompts.lock().expect("lock poisoned").clone()
    }

    /// Number of prompts received.
    pub fn ask_count(&self) -> usize {
        self.prompts.lock().expect("lock poisoned").len()
    }
}

#[async_trait]
impl ConfirmationPort for ScriptedConfirmation {
    async fn ask(&self, prompt: &ConfirmationPrompt) -> Result<bool, ConfirmationError> {
        self.prompts.lock().expect("lock poisoned").push(prompt.clone());
        let next = self.answers.lock().expect("lock poisoned").pop_front();
        next.or(self.fallback)
            .ok_or(ConfirmationError::NotInteractive)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_scripted_answers_replay_in_order_then_fail() {
        // Arrange
        let port = ScriptedConfirmation::new([true, false]);
        let prompt = ConfirmationPrompt::new("reset configuration", None);

        // Act
        let first = port.ask(&prompt).await.unwrap();
        let second = port.ask(&prompt).await.unwrap();
        let third = port.ask(&prompt).await;

        // Assert
        assert!(first);
        assert!(!second);
        assert!(matches!(third, Err(ConfirmationError::NotInteractive)));
        assert_eq!(port.ask_count(), 3);
    }

    #[tokio::test]
    async fn test_always_records_prompts() {
        let port = ScriptedConfirmation::always(true);
        let prompt = ConfirmationPrompt::new("clear logs", Some("irreversible".to_string()));

        assert!(port.ask(&prompt).await.unwrap());
        assert_eq!(port.prompts(), vec![prompt]);
    }
}
