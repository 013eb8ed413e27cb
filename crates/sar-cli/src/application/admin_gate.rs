//! AdminGate: wraps privileged commands with authorization, confirmation and
//! audit logging.
//!
//! # Lifecycle of one gated invocation (for beginners)
//!
//! ```text
//! invoke(ctx, args)
//!   │
//!   ├─ check_access ──── not admin ──► WARN logged ─► CommandOutcome::Denied    (exit 1)
//!   │
//!   ├─ confirmation required?
//!   │     yes ─► ConfirmationPort::ask ── "no" / error ─► CommandOutcome::Cancelled (exit 0)
//!   │
//!   ├─ one [AUDIT] record (invocation id, actor, command, action, args, time)
//!   │
//!   └─ handler.run(ctx, args)
//!         ├─ Ok  ─► CommandOutcome::Completed  (exit 0)
//!         └─ Err ─► ERROR logged ─► CommandOutcome::Failed (exit 1)
//! ```
//!
//! # Architecture
//!
//! The gate depends only on traits: [`ConfirmationPort`] for the yes/no
//! question, [`Logger`] for output and [`CommandHandler`] for the wrapped
//! work.  The terminal prompt, the rotating file sink and the real runtime
//! context are injected by the binary; tests inject scripted doubles.
//!
//! The gate never exits the process.  It returns a [`CommandOutcome`] and the
//! entry point maps it to an exit code.

use std::sync::Arc;

use async_trait::async_trait;
use sar_core::{
    AccessDecision, AdminDecision, AuditRecord, AuthorizationContext, CommandOutcome, DenialReason,
    LogLevel, Logger,
};
use serde_json::Value;
use thiserror::Error;

/// Error type for the confirmation port.
#[derive(Debug, Error)]
pub enum ConfirmationError {
    /// stdin is not a terminal, so nobody can answer.
    #[error("no interactive terminal available for confirmation")]
    NotInteractive,

    /// The prompt itself failed (terminal I/O, interrupted read, …).
    #[error("confirmation prompt failed: {0}")]
    Prompt(String),
}

/// The question put to the user before a destructive action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfirmationPrompt {
    /// What is about to happen, e.g. `"reset configuration"`.
    pub action: String,
    /// Optional extra warning shown above the question.
    pub warning: Option<String>,
}

impl ConfirmationPrompt {
    pub fn new(action: impl Into<String>, warning: Option<String>) -> Self {
        Self {
            action: action.into(),
            warning,
        }
    }

    /// The yes/no question text.
    pub fn question(&self) -> String {
        format!("Are you sure you want to {}?", self.action)
    }
}

/// Asks the user a yes/no question.
///
/// Production uses a terminal prompt; tests answer from a script.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ConfirmationPort: Send + Sync {
    /// Returns the user's answer.
    ///
    /// # Errors
    ///
    /// Returns [`ConfirmationError`] when no answer could be obtained.  The
    /// gate treats that as a decline.
    async fn ask(&self, prompt: &ConfirmationPrompt) -> Result<bool, ConfirmationError>;
}

/// Per-command gate settings.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AdminCommandOptions {
    pub require_confirmation: bool,
    /// Description used in the prompt and the audit record.  Defaults to the
    /// command name.
    pub action: Option<String>,
    pub warning: Option<String>,
}

impl AdminCommandOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn require_confirmation(mut self) -> Self {
        self.require_confirmation = true;
        self
    }

    pub fn action(mut self, action: impl Into<String>) -> Self {
        self.action = Some(action.into());
        self
    }

    pub fn warning(mut self, warning: impl Into<String>) -> Self {
        self.warning = Some(warning.into());
        self
    }

    fn action_or<'a>(&'a self, command: &'a str) -> &'a str {
        self.action.as_deref().unwrap_or(command)
    }
}

/// The work a gated command performs.
///
/// `Ctx` is the runtime context handed to every handler; it is generic so the
/// gate does not depend on the concrete infrastructure types.
#[async_trait]
pub trait CommandHandler<Ctx: Send>: Send + Sync {
    /// Runs the command with its positional arguments.
    ///
    /// # Errors
    ///
    /// Any error is reported once by the gate and turned into
    /// [`CommandOutcome::Failed`].
    async fn run(&self, ctx: &mut Ctx, args: &[String]) -> anyhow::Result<()>;
}

/// Adapts a synchronous closure into a [`CommandHandler`].
pub struct FnHandler<F>(F);

/// Wraps `f` as a [`CommandHandler`].
pub fn handler_fn<Ctx, F>(f: F) -> FnHandler<F>
where
    F: Fn(&mut Ctx, &[String]) -> anyhow::Result<()> + Send + Sync,
{
    FnHandler(f)
}

#[async_trait]
impl<Ctx, F> CommandHandler<Ctx> for FnHandler<F>
where
    Ctx: Send,
    F: Fn(&mut Ctx, &[String]) -> anyhow::Result<()> + Send + Sync,
{
    async fn run(&self, ctx: &mut Ctx, args: &[String]) -> anyhow::Result<()> {
        (self.0)(ctx, args)
    }
}

/// Authorization, confirmation and audit for privileged commands.
///
/// Cheap to clone: every [`AdminCommand`] carries its own copy.
#[derive(Clone)]
pub struct AdminGate {
    auth: AuthorizationContext,
    confirmation: Arc<dyn ConfirmationPort>,
    logger: Arc<dyn Logger>,
    actor: String,
    verbose: bool,
}

impl AdminGate {
    pub fn new(
        auth: AuthorizationContext,
        confirmation: Arc<dyn ConfirmationPort>,
        logger: Arc<dyn Logger>,
        actor: impl Into<String>,
    ) -> Self {
        Self {
            auth,
            confirmation,
            logger,
            actor: actor.into(),
            verbose: false,
        }
    }

    /// In verbose mode handler failures are logged with their full cause
    /// chain.
    pub fn with_verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    pub fn is_admin(&self) -> bool {
        self.auth.is_admin()
    }

    pub fn actor(&self) -> &str {
        &self.actor
    }

    /// Decides whether `command` may run.  Denials are logged at WARN.
    pub fn check_access(&self, command: &str) -> AccessDecision {
        let decision = AccessDecision::evaluate(&self.auth, command);
        match &decision {
            AccessDecision::Authorized => {
                self.logger
                    .debug(&format!("Admin access granted for `{command}`"));
            }
            AccessDecision::Denied(reason) => {
                self.logger.log(
                    LogLevel::Warn,
                    &reason.to_string(),
                    &[Value::String(self.actor.clone())],
                );
            }
        }
        decision
    }

    /// Asks the confirmation port.  A port error counts as "no".
    pub async fn prompt_confirmation(&self, action: &str, warning: Option<&str>) -> bool {
        let prompt = ConfirmationPrompt::new(action, warning.map(str::to_string));
        match self.confirmation.ask(&prompt).await {
            Ok(answer) => {
                let verdict = if answer { "confirmed" } else { "declined" };
                self.logger
                    .info(&format!("User {verdict} confirmation to {action}"));
                answer
            }
            Err(e) => {
                self.logger.warn(&format!(
                    "Confirmation to {action} failed, treating as declined: {e}"
                ));
                false
            }
        }
    }

    /// Access check followed by the confirmation prompt when the options ask
    /// for one.
    pub async fn ensure_access(&self, command: &str, options: &AdminCommandOptions) -> AdminDecision {
        if !self.check_access(command).is_authorized() {
            return AdminDecision::denied();
        }
        if !options.require_confirmation {
            return AdminDecision::granted(None);
        }
        let confirmed = self
            .prompt_confirmation(options.action_or(command), options.warning.as_deref())
            .await;
        AdminDecision::granted(Some(confirmed))
    }

    /// Wraps `handler` so that every invocation goes through this gate.
    pub fn create_admin_command<H>(
        &self,
        name: impl Into<String>,
        handler: H,
        options: AdminCommandOptions,
    ) -> AdminCommand<H> {
        AdminCommand {
            name: name.into(),
            handler,
            options,
            gate: self.clone(),
        }
    }

    fn audit(&self, command: &str, options: &AdminCommandOptions, args: &[String]) {
        let record = AuditRecord::new(
            self.actor.as_str(),
            command,
            options.action_or(command),
            args.to_vec(),
        );
        self.logger.audit(&record);
    }

    /// Logs a failed command (cause chain in verbose mode) and returns the
    /// one-line summary.
    pub fn report_failure(&self, command: &str, error: &anyhow::Error) -> String {
        let summary = format!("{error:#}");
        let detail = if self.verbose {
            format!("{error:?}")
        } else {
            summary.clone()
        };
        self.logger
            .error(&format!("Command `{command}` failed: {detail}"));
        summary
    }
}

/// A command whose every invocation is gated by an [`AdminGate`].
pub struct AdminCommand<H> {
    name: String,
    handler: H,
    options: AdminCommandOptions,
    gate: AdminGate,
}

impl<H> AdminCommand<H> {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn options(&self) -> &AdminCommandOptions {
        &self.options
    }

    /// Runs the full gate lifecycle and returns how the invocation ended.
    ///
    /// The handler runs at most once and only after the audit record has been
    /// written.
    pub async fn invoke<Ctx>(&self, ctx: &mut Ctx, args: Vec<String>) -> CommandOutcome
    where
        Ctx: Send,
        H: CommandHandler<Ctx>,
    {
        let decision = self.gate.ensure_access(&self.name, &self.options).await;

        if !decision.is_authorized {
            return CommandOutcome::Denied(DenialReason::NotAdmin {
                command: self.name.clone(),
            });
        }
        if !decision.may_execute() {
            self.gate
                .logger
                .info(&format!("Operation cancelled: {}", self.name));
            return CommandOutcome::Cancelled {
                command: self.name.clone(),
            };
        }

        self.gate.audit(&self.name, &self.options, &args);

        match self.handler.run(ctx, &args).await {
            Ok(()) => CommandOutcome::Completed,
            Err(e) => {
                let message = self.gate.report_failure(&self.name, &e);
                CommandOutcome::Failed {
                    command: self.name.clone(),
                    message,
                }
            }
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
