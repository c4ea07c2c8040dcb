//! Coalition
//!
//! Headless desktop shell. Reads one command per line from stdin (`help`
//! lists them), ticks timers, and saves the desktop layout on exit.

use std::path::PathBuf;
use std::time::{Duration, Instant};

use anyhow::{Context, Result, bail};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{debug, error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use coalition::config::Config;
use coalition::shell::command::ShellCommand;
use coalition::shell::{Reply, Shell};

/// Timer resolution of the host loop
const TICK_INTERVAL: Duration = Duration::from_millis(50);

const USAGE: &str = "usage: coalition [--config <path>] [--no-restore] [--events]";

#[derive(Debug, Default)]
struct Args {
    config: Option<PathBuf>,
    no_restore: bool,
    events: bool,
}

fn parse_args(mut args: impl Iterator<Item = String>) -> Result<Option<Args>> {
    let mut parsed = Args::default();
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--config" | "-c" => {
                let path = args.next().context("--config needs a path")?;
                parsed.config = Some(PathBuf::from(path));
            }
            "--no-restore" => parsed.no_restore = true,
            "--events" => parsed.events = true,
            "--help" | "-h" => return Ok(None),
            other => bail!("unknown argument '{}'\n{}", other, USAGE),
        }
    }
    Ok(Some(parsed))
}

/// Run one input line. Returns `false` when the shell should stop.
fn handle_line(shell: &mut Shell, line: &str) -> bool {
    let command = match ShellCommand::parse(line) {
        Ok(command) => command,
        Err(e) => {
            warn!("{}", e);
            return true;
        }
    };
    debug!("Command: {:?}", command);

    match shell.execute(command, Instant::now()) {
        Ok(Reply::Done) => {}
        Ok(Reply::Text(text)) => println!("{}", text.trim_end()),
        Ok(Reply::Quit) => return false,
        Err(e) => warn!("Command failed: {:#}", e),
    }
    true
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "coalition=debug,info".into()),
        ))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let Some(args) = parse_args(std::env::args().skip(1))? else {
        println!("{}", USAGE);
        return Ok(());
    };

    info!("Starting Coalition shell");

    let config = match &args.config {
        Some(path) => Config::load_from(path)?,
        None => Config::load()?,
    };
    let mut shell = Shell::new(config);

    if args.events {
        shell.events_mut().subscribe(|event| match serde_json::to_string(event) {
            Ok(json) => println!("{}", json),
            Err(e) => warn!("Failed to serialize event: {}", e),
        });
    }

    if shell.config().persistence.restore_on_startup && !args.no_restore {
        match shell.load_layout() {
            Ok(count) => info!("{} saved window layout(s) waiting for their applications", count),
            Err(e) => error!("Failed to load desktop layout: {:#}", e),
        }
        shell.restore_saved_layout();
    }

    // Setup signal handlers for graceful shutdown
    let (shutdown_tx, mut shutdown_rx) = tokio::sync::mpsc::channel::<()>(1);

    #[cfg(unix)]
    {
        use tokio::signal::unix::{SignalKind, signal};
        let mut sigterm = signal(SignalKind::terminate())?;
        let mut sigint = signal(SignalKind::interrupt())?;
        let tx = shutdown_tx.clone();
        tokio::spawn(async move {
            tokio::select! {
                _ = sigterm.recv() => {
                    info!("Received SIGTERM, shutting down gracefully");
                    let _ = tx.send(()).await;
                }
                _ = sigint.recv() => {
                    info!("Received SIGINT, shutting down gracefully");
                    let _ = tx.send(()).await;
                }
            }
        });
    }

    #[cfg(not(unix))]
    {
        let tx = shutdown_tx.clone();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                info!("Received Ctrl-C, shutting down gracefully");
                let _ = tx.send(()).await;
            }
        });
    }

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut tick_interval = tokio::time::interval(TICK_INTERVAL);
    tick_interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

    info!("Ready; type 'help' for commands");
    loop {
        tokio::select! {
            line = lines.next_line() => match line {
                Ok(Some(line)) => {
                    if line.trim().is_empty() {
                        continue;
                    }
                    if !handle_line(&mut shell, &line) {
                        info!("Quit requested");
                        break;
                    }
                }
                Ok(None) => {
                    info!("Input closed");
                    break;
                }
                Err(e) => {
                    error!("Failed to read input: {}", e);
                    break;
                }
            },

            _ = tick_interval.tick() => {
                shell.tick(Instant::now());
            }

            _ = shutdown_rx.recv() => {
                info!("Shutdown signal received, saving layout...");
                break;
            }
        }
    }

    drop(shutdown_tx);
    shell.shutdown();
    Ok(())
}
