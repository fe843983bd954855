//! Countdown Timer CLI
//!
//! Counts down a duration or to a date and time in the terminal:
//! - `countdown start 25m` counts down 25 minutes
//! - `countdown until "2026-12-31 23:59"` counts down to a local date-time
//! - `countdown preview 1h30m` shows the countdown without starting it

use anyhow::{Context, Result};
use chrono::Utc;
use clap::{CommandFactory, Parser};
use tokio::io::BufReader;
use tokio::sync::mpsc;
use tracing::{debug, info};

use countdown::cli::{forward_controls, Cli, Commands, Display, PreviewArgs};
use countdown::driver::{CountdownDriver, RunOutcome, SystemClock};
use countdown::engine::CountdownEngine;
use countdown::notify::{BellNotifier, CompletionNotifier, CompositeNotifier, SoundNotifier};
use countdown::sound::{try_create_player, SoundSource};
use countdown::types::{CountdownConfig, CountdownSpec, OutputFormat};

/// Main entry point
#[tokio::main(flavor = "current_thread")]
async fn main() {
    // Parse command line arguments
    let cli = Cli::parse();

    // Initialize logging
    init_tracing(cli.verbose);

    // Execute command
    let code = match execute(cli).await {
        Ok(()) => 0,
        Err(e) => {
            Display::show_error(&format!("{e:#}"));
            1
        }
    };

    // Exit without dropping the runtime: a pending stdin read would block
    // its shutdown until the user presses Enter.
    std::process::exit(code);
}

/// Initializes the tracing subscriber for logging.
///
/// Logs go to stderr so they never interleave with the display.
fn init_tracing(verbose: bool) {
    use tracing_subscriber::{fmt, EnvFilter};

    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .without_time()
        .with_writer(std::io::stderr)
        .init();
}

/// Executes the CLI command.
async fn execute(cli: Cli) -> Result<()> {
    if cli.verbose {
        info!("Verbose mode enabled");
    }

    match cli.command {
        Commands::Start(args) => {
            let spec = args.to_spec()?;
            run_countdown(spec, args.run.to_config()).await?;
        }
        Commands::Until(args) => {
            let spec = args.to_spec(Utc::now())?;
            run_countdown(spec, args.run.to_config()).await?;
        }
        Commands::Preview(args) => {
            preview(&args)?;
        }
        Commands::Completions { shell } => {
            generate_completions(shell);
        }
    }

    Ok(())
}

/// Runs a countdown in the foreground until it expires or is cancelled.
async fn run_countdown(spec: CountdownSpec, config: CountdownConfig) -> Result<RunOutcome> {
    config.validate().map_err(anyhow::Error::msg)?;
    let notifier = build_notifier(&config)?;

    let (event_tx, mut event_rx) = mpsc::unbounded_channel();
    let (control_tx, control_rx) = mpsc::unbounded_channel();

    let mut driver = CountdownDriver::new(notifier, SystemClock, event_tx, control_rx)
        .with_label(config.label.clone());
    driver.start(spec)?;

    let mut display = Display::new(config.output, config.label.clone());
    let display_task = tokio::spawn(async move {
        while let Some(event) = event_rx.recv().await {
            display.show(&event);
        }
    });

    tokio::spawn(async move {
        let stdin = BufReader::new(tokio::io::stdin());
        if let Err(e) = forward_controls(stdin, spec, control_tx).await {
            debug!(error = %e, "stopped reading controls");
        }
    });

    let outcome = driver.run().await?;
    debug!(?outcome, "countdown finished");

    let notifier = driver.into_notifier();
    display_task.await.context("Display task failed")?;
    notifier.flush();

    Ok(outcome)
}

/// Builds the completion notifiers requested by the configuration.
fn build_notifier(config: &CountdownConfig) -> Result<CompositeNotifier> {
    let mut notifier = CompositeNotifier::new();

    if config.bell {
        notifier.push(BellNotifier::stderr());
    }

    if config.sound {
        let source = match &config.sound_file {
            Some(path) => SoundSource::file_validated(path).map_err(|e| {
                let hint = e.suggestion();
                anyhow::Error::new(e)
                    .context(format!("cannot use sound file {} ({hint})", path.display()))
            })?,
            None => SoundSource::beep(),
        };
        if let Some(player) = try_create_player() {
            notifier.push(SoundNotifier::new(player, source));
        }
    }

    debug!(?notifier, "notifiers ready");
    Ok(notifier)
}

/// Prints an idle preview of the given input.
fn preview(args: &PreviewArgs) -> Result<()> {
    let now = Utc::now();
    let spec = args.to_spec(now)?;

    let mut engine = CountdownEngine::new();
    if let Some(spec) = spec {
        engine.preview(spec);
    }

    let format = if args.json {
        OutputFormat::Json
    } else {
        OutputFormat::Text
    };
    let target = spec.and_then(|spec| spec.resolve_target(now));
    if let Some(output) = Display::render_preview(format, &engine.snapshot(now), target) {
        println!("{output}");
    }
    Ok(())
}

/// Generates shell completion scripts.
fn generate_completions(shell: clap_complete::Shell) {
    use clap_complete::generate;
    use std::io;

    let mut cmd = Cli::command();
    let bin_name = cmd.get_name().to_string();
    generate(shell, &mut cmd, bin_name, &mut io::stdout());
}

// ============================================================================
// Tests
// ============================================================================
