use std::fs::File;
use std::sync::Mutex;

use anyhow::Context;
use clap::Parser;
use kvhttp::{Config, Server};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "kvhttp", version)]
#[command(about = "In-memory key-value store served over HTTP")]
struct Args {
    /// Path to a TOML configuration file
    #[arg(long)]
    config: Option<String>,
}

fn init_logging(config: &Config) -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.log.level))
        .with_context(|| format!("Invalid log level '{}'", config.log.level))?;

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_ids(true);

    match &config.log.file {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("Failed to create log file '{}'", path))?;
            builder.with_ansi(false).with_writer(Mutex::new(file)).init();
        }
        None => builder.init(),
    }
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    let config = match &args.config {
        Some(path) => Config::from_file(path)?,
        None => Config::default(),
    };

    init_logging(&config)?;

    info!("Starting kvhttp - in-memory key-value store over HTTP");
    info!("Version: {}", env!("CARGO_PKG_VERSION"));

    let server = Server::bind(&config)
        .await
        .with_context(|| format!("Failed to bind {}", config.server_addr))?;
    info!("Server listening on: {}", server.local_addr());

    server.run().await?;

    Ok(())
}
