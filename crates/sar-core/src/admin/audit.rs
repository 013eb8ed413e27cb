//! Audit records written before a privileged command executes.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Who ran which command, with which arguments, and when.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuditRecord {
    /// Correlates the audit entry with later log lines of the same run.
    pub invocation_id: Uuid,
    pub actor: String,
    pub command: String,
    /// Human-readable description of the action, e.g. `"create backup"`.
    pub action: String,
    pub args: Vec<String>,
    pub timestamp: DateTime<Utc>,
}

impl AuditRecord {
    pub fn new(
        actor: impl Into<String>,
        command: impl Into<String>,
        action: impl Into<String>,
        args: Vec<String>,
    ) -> Self {
        Self {
            invocation_id: Uuid::new_v4(),
            actor: actor.into(),
            command: command.into(),
            action: action.into(),
            args,
            timestamp: Utc::now(),
        }
    }
}
