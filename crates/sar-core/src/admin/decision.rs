//! Per-invocation decisions and terminal outcomes of a gated command.

use super::authorization::DenialReason;

/// Whether a gated command may proceed.
///
/// `confirmed` is `None` when no confirmation was requested.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AdminDecision {
    pub is_authorized: bool,
    pub confirmed: Option<bool>,
}

impl AdminDecision {
    pub fn denied() -> Self {
        Self {
            is_authorized: false,
            confirmed: None,
        }
    }

    pub fn granted(confirmed: Option<bool>) -> Self {
        Self {
            is_authorized: true,
            confirmed,
        }
    }

    /// Authorized and not declined.
    pub fn may_execute(&self) -> bool {
        self.is_authorized && self.confirmed != Some(false)
    }
}

/// How a command invocation ended.
///
/// Produced by the gate and turned into a process exit code only by the
/// binary entry point.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandOutcome {
    /// The handler ran and returned successfully.
    Completed,
    /// The user declined the confirmation prompt.
    Cancelled { command: String },
    /// The invocation lacked the required privileges.
    Denied(DenialReason),
    /// The handler returned an error.
    Failed { command: String, message: String },
}

impl CommandOutcome {
    /// `0` for success and user cancellation, `1` otherwise.
    pub fn exit_code(&self) -> u8 {
        match self {
            CommandOutcome::Completed | CommandOutcome::Cancelled { .. } => 0,
            CommandOutcome::Denied(_) | CommandOutcome::Failed { .. } => 1,
        }
    }

    pub fn is_success(&self) -> bool {
        self.exit_code() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decline_blocks_execution() {
        assert!(!AdminDecision::granted(Some(false)).may_execute());
    }

    #[test]
    fn test_unconfirmed_grant_may_execute() {
        assert!(AdminDecision::granted(None).may_execute());
        assert!(AdminDecision::granted(Some(true)).may_execute());
    }

    #[test]
    fn test_denied_never_executes() {
        assert!(!AdminDecision::denied().may_execute());
    }

    #[test]
    fn test_exit_codes() {
        let denied = CommandOutcome::Denied(DenialReason::NotAdmin {
            command: "c".to_string(),
        });
        let failed = CommandOutcome::Failed {
            command: "c".to_string(),
            message: "boom".to_string(),
        };
        let cancelled = CommandOutcome::Cancelled {
            command: "c".to_string(),
        };

        assert_eq!(CommandOutcome::Completed.exit_code(), 0);
        assert_eq!(cancelled.exit_code(), 0);
        assert_eq!(denied.exit_code(), 1);
        assert_eq!(failed.exit_code(), 1);
    }
}
