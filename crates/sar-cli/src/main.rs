//! SAR-CLI entry point.
//!
//! # What happens at startup
//!
//! 1. Arguments are parsed with `clap` into a [`Cli`].
//! 2. The environment is captured once ([`Environment::from_process`]).
//! 3. The shared [`LogSink`](sar_cli::infrastructure::logging::LogSink) is
//!    created and installed as a `tracing` layer, so every `tracing` event
//!    from this point lands on the console and in `logs/cli.log`.
//! 4. The configuration is loaded and the log level settled.
//! 5. The subcommand is dispatched; privileged ones pass the admin gate.
//! 6. The [`CommandOutcome`] becomes the process exit code.
//!
//! `RUST_LOG` narrows which `tracing` targets reach the sink (default: this
//! workspace's crates only); the sink's own level still applies on top.

use std::process::ExitCode;
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use colored::Colorize;
use sar_core::CommandOutcome;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

use sar_cli::application::AdminGate;
use sar_cli::cli::{dispatch, Cli};
use sar_cli::infrastructure::confirmation::TerminalConfirmation;
use sar_cli::infrastructure::context::{build_log_sink, AppContext};
use sar_cli::infrastructure::environment::Environment;
use sar_cli::infrastructure::logging::LogSinkLayer;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    match run(cli).await {
        Ok(outcome) => ExitCode::from(outcome.exit_code()),
        Err(e) => {
            eprintln!("{} {e:#}", "error:".red().bold());
            ExitCode::FAILURE
        }
    }
}

/// Builds the runtime, dispatches the subcommand and prints the user-facing
/// notice for denials and cancellations.
///
/// # Errors
///
/// Returns an error only when the runtime itself cannot be set up (no home
/// directory, subscriber already installed).  Command failures are reported
/// through the returned [`CommandOutcome`].
async fn run(cli: Cli) -> anyhow::Result<CommandOutcome> {
    let env = Environment::from_process();
    let options = cli.global.runtime_options();

    let home = match cli.global.home.clone() {
        Some(home) => home,
        None => env.app_home()?,
    };

    // ── Logging setup ─────────────────────────────────────────────────────────
    let sink = build_log_sink(&home, options);
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("sar_cli=trace,sar_core=trace")))
        .with(LogSinkLayer::new(Arc::clone(&sink)))
        .try_init()
        .context("failed to install the log subscriber")?;

    // ── Runtime context and admin gate ────────────────────────────────────────
    let mut ctx = AppContext::initialize(&home, Arc::clone(&sink), &env, options);
    let gate = AdminGate::new(
        env.authorization(),
        Arc::new(TerminalConfirmation::new()),
        sink,
        env.actor(),
    )
    .with_verbose(options.verbose);

    let outcome = dispatch(cli.command, &mut ctx, &gate, &env).await;

    match &outcome {
        CommandOutcome::Denied(reason) => {
            eprintln!("{}", reason.remediation().yellow());
        }
        CommandOutcome::Cancelled { .. } => {
            eprintln!("{}", "Operation cancelled.".yellow());
        }
        CommandOutcome::Completed | CommandOutcome::Failed { .. } => {}
    }
    Ok(outcome)
}
