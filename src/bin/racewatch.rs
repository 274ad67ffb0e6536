//! Racewatch - folder watcher driving a media player's RC interface
//!
//! This binary wires the pieces together:
//!
//! 1. Prompts for the folder to watch (the only startup input)
//! 2. Launches the media player with its remote-control interface bound
//!    to the control endpoint, and supervises the process
//! 3. Connects the control-socket client (bounded retry) and sends the
//!    startup commands (`loop`, `fullscreen`)
//! 4. Runs the folder watch coordinator until SIGTERM/SIGINT
//!
//! # Usage
//!
//! ```bash
//! racewatch
//! # Enter the path of the folder to watch: /srv/races
//!
//! # Enable debug logging
//! RUST_LOG=racewatch=debug racewatch
//! ```
//!
//! Exits non-zero when the player process reported error output.

use std::io::{self, Write};
use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use tokio::sync::oneshot;
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use racewatch_player::client::{PlayerClient, PlayerConfig};
use racewatch_player::launcher::{self, PlayerExit};
use racewatch_watch::coordinator::Coordinator;
use racewatch_watch::watcher::FolderWatcher;

/// Reads the watch root from the single startup prompt.
fn prompt_watch_path() -> Result<PathBuf> {
    print!("Enter the path of the folder to watch: ");
    io::stdout().flush().context("Failed to flush prompt")?;

    let mut line = String::new();
    io::stdin()
        .read_line(&mut line)
        .context("Failed to read watch path")?;

    let trimmed = line.trim();
    if trimmed.is_empty() {
        bail!("No watch path given");
    }
    Ok(PathBuf::from(trimmed))
}

/// Launches the player and supervises it in the background.
///
/// A spawn failure is logged and swallowed here: the player simply never
/// becomes reachable and the connect retry exhausts its budget. When the
/// process exits having reported errors, the watch loop is cancelled and
/// the exit details are delivered for the final failing status.
fn spawn_player(
    config: &PlayerConfig,
    cancel_token: CancellationToken,
) -> oneshot::Receiver<PlayerExit> {
    let (tx, rx) = oneshot::channel();

    match launcher::launch(config) {
        Ok(process) => {
            tokio::spawn(async move {
                let exit = process.wait().await;
                if exit.reported_errors() {
                    error!(stderr = %exit.stderr.trim(), "Player process reported errors");
                    let _ = tx.send(exit);
                    cancel_token.cancel();
                } else {
                    info!("Player process exited");
                }
            });
        }
        Err(e) => {
            error!(error = %e, "Failed to start player");
        }
    }

    rx
}

/// Cancels the token when SIGTERM or SIGINT arrives.
async fn wait_for_shutdown_signal() -> Result<()> {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{signal, SignalKind};

        let mut sigterm = signal(SignalKind::terminate())?;
        let mut sigint = signal(SignalKind::interrupt())?;

        tokio::select! {
            _ = sigterm.recv() => {
                info!("Received SIGTERM");
            }
            _ = sigint.recv() => {
                info!("Received SIGINT");
            }
        }
    }

    #[cfg(not(unix))]
    {
        tokio::signal::ctrl_c().await?;
        info!("Received Ctrl+C");
    }

    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::from_default_env()
                .add_directive("racewatch=info".parse()?)
                .add_directive("racewatch_player=info".parse()?)
                .add_directive("racewatch_watch=info".parse()?),
        )
        .init();

    let folder_path = prompt_watch_path()?;
    info!(path = %folder_path.display(), "Watching folder");

    let cancel_token = CancellationToken::new();

    let shutdown_token = cancel_token.clone();
    tokio::spawn(async move {
        if let Err(e) = wait_for_shutdown_signal().await {
            error!(error = %e, "Error waiting for shutdown signal");
        }
        info!("Shutdown signal received");
        shutdown_token.cancel();
    });

    let config = PlayerConfig::default();
    let mut player_exit = spawn_player(&config, cancel_token.clone());

    let mut client = PlayerClient::new(config, cancel_token.clone());
    client
        .connect()
        .await
        .context("Player RC interface never became reachable")?;

    // Startup playback settings
    client.loop_playback().await?;
    client.fullscreen().await?;

    // The current directory is watched alongside the chosen root
    let watch_paths = [folder_path, PathBuf::from(".")];
    let (_watcher, events) = FolderWatcher::spawn(&watch_paths)?;

    let coordinator = Coordinator::new(client);
    let mut client = coordinator.run(events, cancel_token.clone()).await;

    if client.is_connected() {
        if let Err(e) = client.disconnect().await {
            warn!(error = %e, "Failed to disconnect from player");
        }
    }

    if let Ok(exit) = player_exit.try_recv() {
        bail!(
            "Player process reported errors: {}",
            exit.stderr.trim()
        );
    }

    info!("Racewatch stopped");
    Ok(())
}
