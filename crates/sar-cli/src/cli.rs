//! Command-line surface and dispatch.
//!
//! ```text
//! sar-cli [--verbose] [--quiet] [--no-file-log] [--home <DIR>] <COMMAND>
//!
//!   config get <KEY>          print a value as YAML
//!   config set <KEY> <VALUE>  (admin) store a value and save
//!   config unset <KEY>        (admin) remove a value and save
//!   config list               print the whole configuration
//!   config path               print the config file path
//!   config edit               open the config file in $VISUAL / $EDITOR
//!   config reset              (admin, confirmed) restore defaults and save
//!   logs path                 print the log directory
//!   logs clear                (admin, confirmed) delete the active log files
//! ```
//!
//! Privileged subcommands run through the [`AdminGate`]; the others run
//! directly.  Either way [`dispatch`] returns a [`CommandOutcome`] and leaves
//! the exit code to `main`.

use std::io::{self, Write};
use std::path::PathBuf;

use anyhow::{bail, Context};
use clap::{Args, Parser, Subcommand};
use sar_core::{CommandOutcome, ConfigValue, Logger};

use crate::application::admin_gate::{handler_fn, AdminCommandOptions, AdminGate};
use crate::infrastructure::context::{AppContext, RuntimeOptions};
use crate::infrastructure::environment::{Environment, HOME_VAR};
use crate::infrastructure::storage::LoadSource;

// ── CLI argument definitions ──────────────────────────────────────────────────

/// SAR-CLI: project operations agent.
#[derive(Debug, Parser)]
#[command(name = "sar-cli", version, about = "SAR-CLI command-line agent")]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalArgs,

    #[command(subcommand)]
    pub command: Command,
}

/// Flags accepted before or after any subcommand.
#[derive(Debug, Clone, Args)]
pub struct GlobalArgs {
    /// Log at DEBUG level and print error cause chains.
    #[arg(long, short, global = true)]
    pub verbose: bool,

    /// Suppress console log output.
    #[arg(long, short, global = true)]
    pub quiet: bool,

    /// Do not write log files.
    #[arg(long, global = true)]
    pub no_file_log: bool,

    /// App home directory holding config.yaml and logs/.
    #[arg(long, global = true, env = HOME_VAR, value_name = "DIR")]
    pub home: Option<PathBuf>,
}

impl GlobalArgs {
    pub fn runtime_options(&self) -> RuntimeOptions {
        RuntimeOptions {
            verbose: self.verbose,
            quiet: self.quiet,
            no_file_log: self.no_file_log,
        }
    }
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Read and change configuration.
    #[command(subcommand)]
    Config(ConfigCommand),

    /// Inspect and manage log files.
    #[command(subcommand)]
    Logs(LogsCommand),
}

#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Print the value at a dot-path key.
    Get { key: String },
    /// Set a value (parsed as YAML, falling back to a plain string).
    Set { key: String, value: String },
    /// Remove a key.
    Unset { key: String },
    /// Print the whole configuration.
    List,
    /// Print the configuration file path.
    Path,
    /// Open the configuration file in an editor.
    Edit,
    /// Restore the default configuration.
    Reset,
}

#[derive(Debug, Subcommand)]
pub enum LogsCommand {
    /// Print the log directory.
    Path,
    /// Delete the active log files (archives are kept).
    Clear,
}

// ── Dispatch ──────────────────────────────────────────────────────────────────

/// Runs `command` and reports how it ended.
pub async fn dispatch(
    command: Command,
    ctx: &mut AppContext,
    gate: &AdminGate,
    env: &Environment,
) -> CommandOutcome {
    match command {
        Command::Config(ConfigCommand::Get { key }) => {
            let result = print_value(ctx, &key);
            finish(gate, "config get", result)
        }
        Command::Config(ConfigCommand::List) => {
            let result = print_all(ctx);
            finish(gate, "config list", result)
        }
        Command::Config(ConfigCommand::Path) => {
            let result = print_line(&ctx.config.path().display().to_string());
            finish(gate, "config path", result)
        }
        Command::Config(ConfigCommand::Edit) => {
            let result = edit_config(ctx, &env.editor()).await;
            finish(gate, "config edit", result)
        }
        Command::Config(ConfigCommand::Set { key, value }) => {
            gate.create_admin_command("config set", handler_fn(set_value), AdminCommandOptions::new())
                .invoke(ctx, vec![key, value])
                .await
        }
        Command::Config(ConfigCommand::Unset { key }) => {
            gate.create_admin_command("config unset", handler_fn(unset_value), AdminCommandOptions::new())
                .invoke(ctx, vec![key])
                .await
        }
        Command::Config(ConfigCommand::Reset) => {
            let options = AdminCommandOptions::new()
                .require_confirmation()
                .action("reset the configuration to defaults")
                .warning("Every configuration value will be replaced.");
            gate.create_admin_command("config reset", handler_fn(reset_config), options)
                .invoke(ctx, Vec::new())
                .await
        }
        Command::Logs(LogsCommand::Path) => {
            let result = print_line(&ctx.logger.log_dir().display().to_string());
            finish(gate, "logs path", result)
        }
        Command::Logs(LogsCommand::Clear) => {
            let options = AdminCommandOptions::new()
                .require_confirmation()
                .action("delete the active log files")
                .warning("Archived logs are kept; current logs cannot be recovered.");
            gate.create_admin_command("logs clear", handler_fn(clear_logs), options)
                .invoke(ctx, Vec::new())
                .await
        }
    }
}

/// Maps the result of an ungated command to its outcome.
fn finish(gate: &AdminGate, command: &str, result: anyhow::Result<()>) -> CommandOutcome {
    match result {
        Ok(()) => CommandOutcome::Completed,
        Err(e) => CommandOutcome::Failed {
            command: command.to_string(),
            message: gate.report_failure(command, &e),
        },
    }
}

/// Interprets a command-line value as YAML so that `8080`, `true` and
/// `[a, b]` keep their types.  Anything that does not parse is a string.
pub fn parse_value(raw: &str) -> ConfigValue {
    serde_yaml::from_str::<ConfigValue>(raw).unwrap_or_else(|_| ConfigValue::String(raw.to_string()))
}

fn print_line(line: &str) -> anyhow::Result<()> {
    writeln!(io::stdout(), "{line}").context("failed to write to stdout")
}

fn to_yaml(value: &impl serde::Serialize) -> anyhow::Result<String> {
    let yaml = serde_yaml::to_string(value).context("failed to render YAML")?;
    Ok(yaml.trim_end().to_string())
}

// ── Handlers ──────────────────────────────────────────────────────────────────

fn print_value(ctx: &AppContext, key: &str) -> anyhow::Result<()> {
    let Some(value) = ctx.config.get(key)? else {
        bail!("config key `{key}` is not set");
    };
    print_line(&to_yaml(value)?)
}

fn print_all(ctx: &AppContext) -> anyhow::Result<()> {
    print_line(&to_yaml(&ctx.config.get_all()?)?)
}

async fn edit_config(ctx: &mut AppContext, editor: &str) -> anyhow::Result<()> {
    let mut parts = editor.split_whitespace();
    let program = parts.next().context("editor command is empty")?;

    let status = tokio::process::Command::new(program)
        .args(parts)
        .arg(ctx.config.path())
        .status()
        .await
        .with_context(|| format!("failed to launch editor `{editor}`"))?;
    if !status.success() {
        bail!("editor `{editor}` exited with {status}");
    }

    if ctx.config.load() == LoadSource::RecoveredDefaults {
        ctx.logger
            .warn("The edited configuration could not be parsed; defaults are in effect until it is fixed");
    }
    Ok(())
}

fn set_value(ctx: &mut AppContext, args: &[String]) -> anyhow::Result<()> {
    let [key, raw] = args else {
        bail!("usage: config set <KEY> <VALUE>");
    };
    let value = parse_value(raw);
    let rendered = to_yaml(&value)?;

    ctx.config.set(key, value)?;
    ctx.config.save().context("failed to save configuration")?;
    ctx.logger.info(&format!("Set {key} = {rendered}"));
    Ok(())
}

fn unset_value(ctx: &mut AppContext, args: &[String]) -> anyhow::Result<()> {
    let [key] = args else {
        bail!("usage: config unset <KEY>");
    };
    if !ctx.config.unset(key)? {
        ctx.logger.warn(&format!("Config key `{key}` was not set"));
        return Ok(());
    }
    ctx.config.save().context("failed to save configuration")?;
    ctx.logger.info(&format!("Removed {key}"));
    Ok(())
}

fn reset_config(ctx: &mut AppContext, _args: &[String]) -> anyhow::Result<()> {
    ctx.config.reset();
    ctx.config.save().context("failed to save configuration")?;
    ctx.logger.info("Configuration reset to defaults");
    Ok(())
}

fn clear_logs(ctx: &mut AppContext, _args: &[String]) -> anyhow::Result<()> {
    ctx.logger
        .clear_logs()
        .with_context(|| format!("failed to clear logs in {}", ctx.logger.log_dir().display()))?;
    tracing::debug!("active log files removed");
    Ok(())
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;
    use std::sync::Arc;

    use crate::infrastructure::confirmation::ScriptedConfirmation;
    use crate::infrastructure::context::build_log_sink;
    use crate::infrastructure::logging::LogCategory;
    use sar_core::AuthorizationContext;

    fn quiet() -> RuntimeOptions {
        RuntimeOptions {
            quiet: true,
            ..RuntimeOptions::default()
        }
    }

    fn context_in(dir: &Path) -> AppContext {
        let sink = build_log_sink(dir, quiet());
        AppContext::initialize(dir, sink, &Environment::default(), quiet())
    }

    fn gate_for(ctx: &AppContext, auth: AuthorizationContext, port: Arc<ScriptedConfirmation>) -> AdminGate {
        AdminGate::new(auth, port, ctx.logger.clone(), "tester")
    }

    fn reload(dir: &Path) -> AppContext {
        context_in(dir)
    }

    // ── Argument parsing ──────────────────────────────────────────────────────

    #[test]
    fn test_parses_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from(["sar-cli", "config", "get", "server.port", "--verbose", "-q"]).unwrap();

        assert!(cli.global.verbose);
        assert!(cli.global.quiet);
        assert!(matches!(
            cli.command,
            Command::Config(ConfigCommand::Get { ref key }) if key == "server.port"
        ));
    }

    #[test]
    fn test_set_requires_key_and_value() {
        assert!(Cli::try_parse_from(["sar-cli", "config", "set", "server.port"]).is_err());
    }

    #[test]
    fn test_no_file_log_maps_to_runtime_options() {
        let cli = Cli::try_parse_from(["sar-cli", "--no-file-log", "logs", "path"]).unwrap();

        assert_eq!(
            cli.global.runtime_options(),
            RuntimeOptions {
                verbose: false,
                quiet: false,
                no_file_log: true
            }
        );
    }

    // ── Value parsing ─────────────────────────────────────────────────────────

    #[test]
    fn test_parse_value_keeps_yaml_types() {
        assert_eq!(parse_value("8080"), ConfigValue::Integer(8080));
        assert_eq!(parse_value("true"), ConfigValue::Bool(true));
        assert_eq!(parse_value("0.75"), ConfigValue::Float(0.75));
        assert_eq!(parse_value("null"), ConfigValue::Null);
        assert_eq!(
            parse_value("[a, b]"),
            ConfigValue::List(vec![ConfigValue::from("a"), ConfigValue::from("b")])
        );
    }

    #[test]
    fn test_parse_value_falls_back_to_string() {
        assert_eq!(parse_value("hello world"), ConfigValue::from("hello world"));
        assert_eq!(parse_value("[unclosed"), ConfigValue::from("[unclosed"));
    }

    // ── Dispatch ──────────────────────────────────────────────────────────────

    #[tokio::test]
    async fn test_config_set_denied_without_admin_leaves_file_untouched() {
        // Arrange
        let dir = tempfile::tempdir().unwrap();
        let mut ctx = context_in(dir.path());
        let gate = gate_for(&ctx, AuthorizationContext::unprivileged(), Arc::new(ScriptedConfirmation::new([])));
        let before = std::fs::read_to_string(ctx.config.path()).unwrap();

        // Act
        let outcome = dispatch(
            Command::Config(ConfigCommand::Set {
                key: "server.port".into(),
                value: "8080".into(),
            }),
            &mut ctx,
            &gate,
            &Environment::default(),
        )
        .await;

        // Assert
        assert_eq!(outcome.exit_code(), 1);
        assert_eq!(std::fs::read_to_string(ctx.config.path()).unwrap(), before);
    }

    #[tokio::test]
    async fn test_config_set_as_admin_persists_typed_value() {
        // Arrange
        let dir = tempfile::tempdir().unwrap();
        let mut ctx = context_in(dir.path());
        let gate = gate_for(&ctx, AuthorizationContext::admin(), Arc::new(ScriptedConfirmation::new([])));

        // Act
        let outcome = dispatch(
            Command::Config(ConfigCommand::Set {
                key: "server.port".into(),
                value: "8080".into(),
            }),
            &mut ctx,
            &gate,
            &Environment::default(),
        )
        .await;

        // Assert
        assert_eq!(outcome, CommandOutcome::Completed);
        let reloaded = reload(dir.path());
        assert_eq!(
            reloaded.config.get("server.port").unwrap(),
            Some(&ConfigValue::Integer(8080))
        );
    }

    #[tokio::test]
    async fn test_config_unset_of_missing_key_succeeds() {
        let dir = tempfile::tempdir().unwrap();
        let mut ctx = context_in(dir.path());
        let gate = gate_for(&ctx, AuthorizationContext::admin(), Arc::new(ScriptedConfirmation::new([])));

        let outcome = dispatch(
            Command::Config(ConfigCommand::Unset {
                key: "server.no_such_key".into(),
            }),
            &mut ctx,
            &gate,
            &Environment::default(),
        )
        .await;

        assert_eq!(outcome, CommandOutcome::Completed);
    }

    #[tokio::test]
    async fn test_config_get_missing_key_fails() {
        let dir = tempfile::tempdir().unwrap();
        let mut ctx = context_in(dir.path());
        let gate = gate_for(&ctx, AuthorizationContext::unprivileged(), Arc::new(ScriptedConfirmation::new([])));

        let outcome = dispatch(
            Command::Config(ConfigCommand::Get {
                key: "nope.nothing".into(),
            }),
            &mut ctx,
            &gate,
            &Environment::default(),
        )
        .await;

        assert_eq!(outcome.exit_code(), 1);
    }

    #[tokio::test]
    async fn test_config_reset_declined_keeps_changes() {
        // Arrange
        let dir = tempfile::tempdir().unwrap();
        let mut ctx = context_in(dir.path());
        ctx.config.set("server.port", 9999i64).unwrap();
        ctx.config.save().unwrap();
        let port = Arc::new(ScriptedConfirmation::new([false]));
        let gate = gate_for(&ctx, AuthorizationContext::admin(), port.clone());

        // Act
        let outcome = dispatch(
            Command::Config(ConfigCommand::Reset),
            &mut ctx,
            &gate,
            &Environment::default(),
        )
        .await;

        // Assert
        assert!(matches!(outcome, CommandOutcome::Cancelled { .. }));
        assert_eq!(outcome.exit_code(), 0);
        assert_eq!(port.ask_count(), 1);
        assert_eq!(
            reload(dir.path()).config.get("server.port").unwrap(),
            Some(&ConfigValue::Integer(9999))
        );
    }

    #[tokio::test]
    async fn test_config_reset_confirmed_restores_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let mut ctx = context_in(dir.path());
        ctx.config.set("server.port", 9999i64).unwrap();
        ctx.config.save().unwrap();
        let gate = gate_for(&ctx, AuthorizationContext::admin(), Arc::new(ScriptedConfirmation::new([true])));

        let outcome = dispatch(
            Command::Config(ConfigCommand::Reset),
            &mut ctx,
            &gate,
            &Environment::default(),
        )
        .await;

        assert_eq!(outcome, CommandOutcome::Completed);
        assert_eq!(
            reload(dir.path()).config.get("server.port").unwrap(),
            Some(&ConfigValue::Integer(3000))
        );
    }

    #[tokio::test]
    async fn test_logs_clear_confirmed_removes_active_files() {
        // Arrange
        let dir = tempfile::tempdir().unwrap();
        let mut ctx = context_in(dir.path());
        ctx.logger.set_level(sar_core::LogLevel::Info);
        ctx.logger.warn("something to clear");
        let general = ctx.logger.active_path(LogCategory::General);
        assert!(general.exists());
        let gate = gate_for(&ctx, AuthorizationContext::admin(), Arc::new(ScriptedConfirmation::always(true)));

        // Act
        let outcome = dispatch(
            Command::Logs(LogsCommand::Clear),
            &mut ctx,
            &gate,
            &Environment::default(),
        )
        .await;

        // Assert
        assert_eq!(outcome, CommandOutcome::Completed);
        assert!(!general.exists());
    }
}
