use anyhow::{Context, Result};
use astatus::app;
use astatus::config::AppConfig;
use clap::Parser;
use log::{error, info, warn};
use std::path::PathBuf;

/// astatus - status line generator for i3bar and swaybar
#[derive(Parser, Debug)]
#[command(name = "astatus")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Config path (~/.config/astatus/astatus if not specified)
    #[arg(short = 'c', value_name = "PATH")]
    config: Option<PathBuf>,
}

fn main() {
    let cli = Cli::parse();

    // stdout belongs to the bar protocol, so logs go to stderr.
    // Quiet by default; RUST_LOG raises the level.
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    if let Err(e) = run(cli) {
        error!("{:#}", e);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    let config = AppConfig::load(cli.config.as_deref()).context("failed to load configuration")?;
    info!(
        "Starting astatus v{} with {} commands from {}",
        env!("CARGO_PKG_VERSION"),
        config.commands.len(),
        config.path.display()
    );
    if config.commands.is_empty() {
        warn!("No commands configured; the status line will stay empty");
    }

    let runtime = tokio::runtime::Runtime::new().context("failed to start async runtime")?;
    runtime.block_on(app::run(config, tokio::io::stdout()))
}
