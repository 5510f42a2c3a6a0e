//! Mirror collector server
//!
//! Receives node trees on `POST /receive`, writes them to the output file and
//! reports them on `GET /status`.

use clap::Parser;
use node_mirror::collector::{self, CollectorOptions, CollectorState};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "mirror-collector")]
#[command(version)]
#[command(about = "Collector service for node-mirror trees", long_about = None)]
struct Cli {
    /// Address to bind
    #[arg(long, default_value = "0.0.0.0")]
    host: String,

    /// Port to listen on
    #[arg(long, short = 'p', default_value = "5000")]
    port: u16,

    /// File the latest tree is written to
    #[arg(long, short = 'o', default_value = "ui.json")]
    output: PathBuf,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    let bind_addr = format!("{}:{}", cli.host, cli.port);
    let state = CollectorState::new(CollectorOptions::new().output_path(&cli.output));
    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;

    log::info!("Starting collector on http://{}", bind_addr);
    log::info!("Trees are written to {}", cli.output.display());

    collector::serve(listener, state, async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            log::error!("Failed to listen for Ctrl-C: {}", e);
        }
    })
    .await?;

    log::info!("Collector stopped");
    Ok(())
}
