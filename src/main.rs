//! OAM publisher CLI
//!
//! ```text
//!   manifest.json ──▶ publish ──▶ upload (hoster) ──▶ post ──▶ broadcast (ledger)
//!                                                                  │
//!                                              BatchReport (JSON) ◀┘
//! ```
//!
//! The signing key is read from `OAM_PRIVATE_KEY`; everything else comes
//! from the TOML config file (`--config`) or its defaults.

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::sync::Arc;

use oam_publisher::config::{load_or_default, PublisherConfig};
use oam_publisher::ledger::{Ledger, RpcLedger, Wallet};
use oam_publisher::observability::logging;
use oam_publisher::post::load_manifest;
use oam_publisher::publisher::{BatchMode, Publisher, PublishError};
use oam_publisher::upload::{HttpUploader, Uploader};

#[derive(Parser)]
#[command(name = "oam-publisher")]
#[command(about = "Publish signed documents to the OAM ledger", long_about = None)]
struct Cli {
    /// Path to the TOML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Upload and publish every item of a manifest
    Publish {
        /// JSON array of publication items
        #[arg(short, long)]
        manifest: PathBuf,
        /// Ledger account that authors the posts
        #[arg(short, long)]
        account: String,
        /// independent or atomic
        #[arg(long, default_value = "independent")]
        mode: BatchMode,
    },
    /// Upload a single file and print its retrieval URL
    Upload {
        #[arg(short, long)]
        file: PathBuf,
        #[arg(short, long)]
        account: String,
    },
    /// Show the current head block of the ledger
    Head,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let config = load_or_default(cli.config.as_deref())?;
    logging::init(&config.observability);

    tracing::info!(
        version = %config.app.version,
        rpc_url = %config.ledger.rpc_url,
        hoster = %config.hoster.base_url,
        "Configuration loaded"
    );

    match cli.command {
        Commands::Publish {
            manifest,
            account,
            mode,
        } => publish(&config, &manifest, account, mode).await,
        Commands::Upload { file, account } => {
            let wallet = Wallet::from_env(&config.ledger.address_prefix)?;
            let uploader = HttpUploader::new(&config.hoster)?;
            let url = uploader.upload(&file, &account, &wallet).await?;
            println!("{}", url);
            Ok(())
        }
        Commands::Head => {
            let ledger = RpcLedger::new(config.ledger.clone())?;
            let props = ledger.dynamic_global_properties().await?;
            println!("{}", serde_json::to_string_pretty(&props)?);
            Ok(())
        }
    }
}

async fn publish(
    config: &PublisherConfig,
    manifest: &std::path::Path,
    account: String,
    mode: BatchMode,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut items = load_manifest(manifest)?;
    tracing::info!(items = items.len(), mode = %mode, account = %account, "Manifest loaded");

    let wallet = Wallet::from_env(&config.ledger.address_prefix)?;
    let uploader: Arc<dyn Uploader> = Arc::new(HttpUploader::new(&config.hoster)?);
    let ledger: Arc<dyn Ledger> = Arc::new(RpcLedger::new(config.ledger.clone())?);
    let publisher = Publisher::new(config, uploader, ledger, wallet, account)?;

    match publisher.publish(mode, &mut items).await {
        Ok(report) => {
            println!("{}", serde_json::to_string_pretty(&report)?);
            if report.is_complete() {
                Ok(())
            } else {
                Err(format!(
                    "{} of {} items failed",
                    report.failed.len(),
                    report.total
                )
                .into())
            }
        }
        Err(PublishError::BatchLost {
            batch_id,
            orphaned,
            failed,
            source,
        }) => {
            for failure in &failed {
                eprintln!("item {} ({}): {}", failure.index, failure.filename, failure.error);
            }
            tracing::error!(
                batch_id = %batch_id,
                orphaned,
                error = %source,
                "Atomic batch was not published"
            );
            Err(source.into())
        }
    }
}
