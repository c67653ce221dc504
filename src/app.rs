//! Wiring: sources feed the update bus, the update manager drains it into
//! the bar protocol until output fails or a shutdown signal arrives.

use crate::config::AppConfig;
use anyhow::{Context, Result};
use astatus_core::{
    update_bus, BoxedUpdateSource, Snapshot, SourceHandle, UpdateManager, UpdateSender,
    UpdateSource, FLUSH_INTERVAL,
};
use astatus_sources::CommandSource;
use log::{error, info, warn};
use tokio::io::AsyncWrite;

/// One command source per configured command, indexed in order
pub fn build_sources(commands: &[String]) -> Vec<BoxedUpdateSource> {
    commands
        .iter()
        .enumerate()
        .map(|(index, command)| {
            Box::new(CommandSource::new(index, command.as_str())) as BoxedUpdateSource
        })
        .collect()
}

/// Start every source.
///
/// A source that fails to launch is reported and left out; its status item
/// stays empty while the others keep updating.
pub fn start_sources(sources: Vec<BoxedUpdateSource>, updates: &UpdateSender) -> Vec<SourceHandle> {
    sources
        .into_iter()
        .filter_map(|source| {
            let index = source.metadata().index;
            match source.start(updates.clone()) {
                Ok(handle) => Some(handle),
                Err(e) => {
                    error!("Source {} disabled: {}", index, e);
                    None
                }
            }
        })
        .collect()
}

/// Run the status line until output fails or the process is asked to stop
pub async fn run<W: AsyncWrite + Unpin>(config: AppConfig, out: W) -> Result<()> {
    let (tx, rx) = update_bus();
    let manager = UpdateManager::new(
        Snapshot::new(config.commands.len(), &config.styling),
        rx,
        FLUSH_INTERVAL,
    );

    let handles = start_sources(build_sources(&config.commands), &tx);
    // Only the sources hold senders from here on
    drop(tx);
    info!(
        "{} of {} sources running",
        handles.len(),
        config.commands.len()
    );

    let result = tokio::select! {
        result = manager.run(out) => result.context("status output failed"),
        signal = shutdown_signal() => {
            info!("Received {}, shutting down", signal);
            Ok(())
        }
    };

    for handle in handles {
        handle.shutdown().await;
    }
    result
}

/// Resolves on Ctrl-C or SIGTERM
#[cfg(unix)]
async fn shutdown_signal() -> &'static str {
    use tokio::signal::unix::{signal, SignalKind};

    match signal(SignalKind::terminate()) {
        Ok(mut term) => tokio::select! {
            name = ctrl_c() => name,
            _ = term.recv() => "SIGTERM",
        },
        Err(e) => {
            warn!("Failed to listen for SIGTERM: {}", e);
            ctrl_c().await
        }
    }
}

/// Resolves on Ctrl-C
#[cfg(not(unix))]
async fn shutdown_signal() -> &'static str {
    ctrl_c().await
}

async fn ctrl_c() -> &'static str {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("Failed to listen for Ctrl-C: {}", e);
        std::future::pending::<()>().await;
    }
    "Ctrl-C"
}
