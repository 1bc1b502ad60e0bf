#![doc = include_str!("../README.md")]

mod config;
mod logging;

use clap::Parser;
use config::{CliArgs, CliConfig};
use logging::init_logging;
use shortid::Broker;
use std::io::{BufWriter, Write};
use tokio::signal;

// Using mimalloc for better performance under contention, especially in musl
// environments.
#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load from .env
    let _ = dotenvy::dotenv();
    let args = CliArgs::parse();
    let config = CliConfig::try_from(args)?;

    init_logging();

    let broker = Broker::new(config.capacity, &config.instance_ids)?;
    log_startup_info(&broker, &config);

    let result = tokio::select! {
        res = print_ids(&broker, config.count) => res,
        () = shutdown_signal() => Ok(()),
    };

    broker.shutdown().await;
    tracing::debug!("Broker shut down");
    result
}

async fn print_ids(broker: &Broker, count: Option<u64>) -> anyhow::Result<()> {
    let mut out = BufWriter::new(std::io::stdout().lock());
    let mut printed = 0_u64;
    while count.is_none_or(|count| printed < count) {
        writeln!(out, "{}", broker.try_next().await?)?;
        printed += 1;
        // Unbounded runs flush as they go so a reader sees output before
        // the interrupt.
        if count.is_none() {
            out.flush()?;
        }
    }
    out.flush()?;
    Ok(())
}

fn log_startup_info(broker: &Broker, config: &CliConfig) {
    match config.count {
        Some(count) => tracing::info!(
            capacity = broker.capacity(),
            instance_id = broker.instance_id(),
            count,
            "Printing identifiers"
        ),
        None => tracing::info!(
            capacity = broker.capacity(),
            instance_id = broker.instance_id(),
            "Printing identifiers until interrupted"
        ),
    }
}

async fn shutdown_signal() {
    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    tokio::select! {
        () = ctrl_c => tracing::info!("Received Ctrl+C signal"),
        () = terminate => tracing::info!("Received SIGTERM signal"),
    }
}
