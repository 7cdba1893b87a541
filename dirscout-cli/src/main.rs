use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

mod commands;

use crate::commands::Command;

#[derive(Parser, Debug)]
#[command(name = "dirscout")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Scoped directory navigator with streaming traversal")]
struct Args {
    /// Directory to grant as the session root; all paths are relative to it
    #[arg(long)]
    root: PathBuf,

    #[command(subcommand)]
    command: Command,
}

fn main() -> Result<()> {
    setup_tracing()?;

    // Traversal visitors are !Send, so everything runs on a LocalSet
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;

    runtime.block_on(async {
        let local = tokio::task::LocalSet::new();
        local.run_until(async_main()).await
    })
}

async fn async_main() -> Result<()> {
    let args = Args::parse();
    info!("CLI startup: root={:?}, command={:?}", args.root, args.command);
    commands::run(&args.root, args.command).await
}

fn setup_tracing() -> Result<()> {
    use std::fs;
    use tracing_subscriber::fmt;

    let home = dirs::home_dir().unwrap_or_else(|| PathBuf::from("/tmp"));
    let trace_dir = home.join(".dirscout").join("trace");
    fs::create_dir_all(&trace_dir)?;

    let log_file = trace_dir.join("dirscout.log");
    let file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&log_file)?;

    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_writer(file)
                .with_ansi(false)
                .with_target(true)
                .with_file(true)
                .with_line_number(true),
        )
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    info!("Tracing initialized to {:?}", log_file);
    Ok(())
}
