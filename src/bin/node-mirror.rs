//! node-mirror CLI
//!
//! Extracts the node tree of a design snapshot or a live page, prints a
//! summary and delivers the mirror to the collector.

use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use node_mirror::{
    ConnectionOptions, DeliveryClient, DeliveryOptions, HostDocument, LaunchOptions, PageDocument, Pipeline,
    SnapshotDocument,
};
use std::{path::PathBuf, time::Duration};

#[derive(Parser)]
#[command(name = "node-mirror")]
#[command(version)]
#[command(about = "Mirror a document's node tree and send it to a collector", long_about = None)]
struct Cli {
    #[command(subcommand)]
    source: Source,

    #[command(flatten)]
    delivery: DeliveryArgs,
}

#[derive(Subcommand)]
enum Source {
    /// Extract a JSON design-document export
    Snapshot {
        /// Path to the export file
        file: PathBuf,
    },
    /// Extract the DOM of a web page
    Page {
        /// URL to load before extracting
        url: String,

        /// Launch browser in headed mode (default: headless)
        #[arg(long, short = 'H')]
        headed: bool,

        /// Path to custom browser executable
        #[arg(long, value_name = "PATH")]
        chrome_path: Option<PathBuf>,

        /// Persistent browser profile directory
        #[arg(long, value_name = "DIR")]
        user_data_dir: Option<PathBuf>,

        /// WebSocket endpoint of an already running browser
        #[arg(long, value_name = "URL")]
        ws_endpoint: Option<String>,
    },
}

#[derive(Args)]
struct DeliveryArgs {
    /// Collector endpoint receiving the mirror
    #[arg(long, short = 'e', global = true, default_value = node_mirror::delivery::DEFAULT_ENDPOINT)]
    endpoint: String,

    /// Longest wait for the collector before exiting, in milliseconds
    #[arg(long, global = true, default_value = "5000")]
    grace_ms: u64,

    /// Print the mirror as pretty JSON
    #[arg(long, short = 'p', global = true)]
    print: bool,
}

async fn extract<H: HostDocument>(pipeline: &Pipeline, host: &mut H, print: bool) -> anyhow::Result<()> {
    let extraction = pipeline.run(host).await.context("Extraction failed")?;

    if print {
        println!("{}", extraction.mirror.to_json_pretty()?);
    }
    eprintln!(
        "Extracted {} nodes ({} leaves, {} containers, max depth {})",
        extraction.stats.nodes, extraction.stats.leaves, extraction.stats.containers, extraction.stats.max_depth
    );

    // Delivery failures are logged by the client and never change the exit status
    let report = extraction.settle().await;
    eprintln!("Delivery {}", report);
    Ok(())
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    let options = DeliveryOptions::new()
        .endpoint(cli.delivery.endpoint)
        .grace_period(Duration::from_millis(cli.delivery.grace_ms));
    let pipeline = Pipeline::new(DeliveryClient::new(options)?);

    match cli.source {
        Source::Snapshot { file } => {
            let mut document = SnapshotDocument::open(file);
            extract(&pipeline, &mut document, cli.delivery.print).await?;
        }
        Source::Page {
            url,
            headed,
            chrome_path,
            user_data_dir,
            ws_endpoint,
        } => {
            let page = match ws_endpoint {
                Some(ws_url) => PageDocument::connect(ConnectionOptions::new(ws_url))?,
                None => {
                    let mut options = LaunchOptions::new().headless(!headed);
                    if let Some(path) = chrome_path {
                        options = options.chrome_path(path);
                    }
                    if let Some(dir) = user_data_dir {
                        options = options.user_data_dir(dir);
                    }
                    PageDocument::launch(options)?
                }
            };
            let mut page = page.with_url(url);
            let result = extract(&pipeline, &mut page, cli.delivery.print).await;
            page.close()?;
            result?;
        }
    }

    Ok(())
}
