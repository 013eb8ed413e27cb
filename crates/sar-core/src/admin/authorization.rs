//! Authorization context and access decisions for privileged commands.
//!
//! The capability to run admin commands is captured once, at process start,
//! in an [`AuthorizationContext`].  Everything downstream asks the context
//! instead of re-reading the environment, which keeps the gate logic pure and
//! lets tests build any context they like.

use std::fmt;

/// Environment variables that grant admin rights when set to `"true"`.
///
/// Either one is sufficient.
pub const ADMIN_FLAG_VARS: [&str; 2] = ["SARU_ADMIN", "SAR_ADMIN"];

/// The only flag value that grants admin rights.  Comparison is exact:
/// `"TRUE"`, `"1"` and `"yes"` do not count.
pub const ADMIN_FLAG_VALUE: &str = "true";

/// Whether the current invocation may run privileged commands.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AuthorizationContext {
    is_admin: bool,
}

impl AuthorizationContext {
    pub fn new(is_admin: bool) -> Self {
        Self { is_admin }
    }

    pub fn admin() -> Self {
        Self::new(true)
    }

    pub fn unprivileged() -> Self {
        Self::new(false)
    }

    /// Builds a context from raw flag values (one per [`ADMIN_FLAG_VARS`]
    /// entry, `None` when unset).  Any value equal to `"true"` grants admin.
    ///
    /// # Example
    ///
    /// ```rust
    /// use sar_core::admin::AuthorizationContext;
    ///
    /// let ctx = AuthorizationContext::from_flag_values([None, Some("true")]);
    /// assert!(ctx.is_admin());
    /// ```
    pub fn from_flag_values<I, S>(values: I) -> Self
    where
        I: IntoIterator<Item = Option<S>>,
        S: AsRef<str>,
    {
        let is_admin = values
            .into_iter()
            .flatten()
            .any(|v| v.as_ref() == ADMIN_FLAG_VALUE);
        Self { is_admin }
    }

    pub fn is_admin(&self) -> bool {
        self.is_admin
    }
}

/// Why a command was refused.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DenialReason {
    /// The invocation does not carry admin rights.
    NotAdmin { command: String },
}

impl DenialReason {
    pub fn command(&self) -> &str {
        match self {
            DenialReason::NotAdmin { command } => command,
        }
    }

    /// Instructions telling the user how to obtain access.
    pub fn remediation(&self) -> String {
        match self {
            DenialReason::NotAdmin { .. } => format!(
                "Administrator privileges are required.\n\
                 To enable admin mode for this shell, run:\n  \
                 export {}={}\n\
                 ({} is also accepted.)",
                ADMIN_FLAG_VARS[0], ADMIN_FLAG_VALUE, ADMIN_FLAG_VARS[1]
            ),
        }
    }
}

impl fmt::Display for DenialReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DenialReason::NotAdmin { command } => {
                write!(f, "access denied: `{command}` requires admin privileges")
            }
        }
    }
}

/// Result of checking whether a command may run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AccessDecision {
    Authorized,
    Denied(DenialReason),
}

impl AccessDecision {
    /// Evaluates `context` for `command`.
    pub fn evaluate(context: &AuthorizationContext, command: &str) -> Self {
        if context.is_admin() {
            AccessDecision::Authorized
        } else {
            AccessDecision::Denied(DenialReason::NotAdmin {
                command: command.to_string(),
            })
        }
    }

    pub fn is_authorized(&self) -> bool {
        matches!(self, AccessDecision::Authorized)
    }
}
