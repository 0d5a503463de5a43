//! RePlas CLI: scan QR payloads, print QR codes, and inspect the ledger.
//!
//! Ledger commands use `~/.replas/ledger.db` unless `--db` is given.

use std::path::PathBuf;

use anyhow::Context;
use chrono::Utc;
use clap::{Parser, Subcommand};
use replas::config::{self, ScannerConfig};
use replas::ledger::{LedgerRepository, SqliteLedger};
use replas::models::enums::{BatchStatus, PlasticType};
use replas::models::BatchRecord;
use replas::qr::{EntityKind, QrHandler, QrScanner, ScanPayload, TracingSink};
use serde::Serialize;

#[derive(Parser)]
#[command(name = "replas", version, about = "RePlas scan and ledger tools")]
struct Cli {
    /// Ledger database path
    #[arg(long, global = true)]
    db: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Classify scanned text and print the dispatch decision
    Scan {
        /// Raw text decoded from the QR code
        text: String,
    },
    /// Print a QR code for a batch, product, recycling center, or profile
    Generate {
        /// batch, product, recycling-center, or profile
        kind: String,
        /// Identifier; a new batch id is generated when omitted for batches
        id: Option<String>,
        /// Encode a deep link under this base URL instead of JSON
        #[arg(long)]
        link_base: Option<String>,
        /// Write the SVG here instead of stdout
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// Batch records
    Batch {
        #[command(subcommand)]
        sub: BatchCommands,
    },
    /// Show a profile's reward balance
    Balance {
        profile_id: String,
    },
}

#[derive(Subcommand)]
enum BatchCommands {
    /// Show one batch
    Get { batch_id: String },
    /// Record or update a batch
    Put {
        batch_id: String,
        #[arg(long)]
        center: String,
        #[arg(long)]
        collector: String,
        /// pet, hdpe, pvc, ldpe, pp, ps, other
        #[arg(long, default_value = "pet")]
        plastic: String,
        #[arg(long)]
        weight_grams: u32,
        /// collected, sorted, processed, recycled
        #[arg(long, default_value = "collected")]
        status: String,
    },
    /// List batches recorded at a recycling center
    List { center_id: String },
}

fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn open_ledger(db: Option<PathBuf>) -> anyhow::Result<SqliteLedger> {
    let path = db.unwrap_or_else(config::ledger_db_path);
    SqliteLedger::open(&path).with_context(|| format!("opening ledger at {}", path.display()))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    replas::init_tracing();
    let cli = Cli::parse();

    match cli.command {
        Commands::Scan { text } => {
            let scanner = QrScanner::new(QrHandler::new(ScannerConfig::from_env()), TracingSink);
            let outcome = scanner.scan(&text).await.context("Error Processing QR Code")?;
            print_json(&outcome)?;
        }
        Commands::Generate {
            kind,
            id,
            link_base,
            out,
        } => {
            let kind = EntityKind::from_type_tag(&kind)
                .with_context(|| format!("unknown kind `{kind}`"))?;
            let payload = match (kind, id) {
                (_, Some(id)) => ScanPayload::new(kind, id),
                (EntityKind::Batch, None) => ScanPayload::new_batch(),
                (_, None) => anyhow::bail!("an id is required for {}", kind.type_tag()),
            };
            let content = match link_base {
                Some(base) => payload.deep_link(&base),
                None => payload.to_json(),
            };
            let svg = replas::qr::generate_qr_svg(&content)?;
            match out {
                Some(path) => {
                    std::fs::write(&path, svg)
                        .with_context(|| format!("writing {}", path.display()))?;
                    eprintln!("{content} -> {}", path.display());
                }
                None => println!("{svg}"),
            }
        }
        Commands::Batch { sub } => {
            let ledger = open_ledger(cli.db)?;
            match sub {
                BatchCommands::Get { batch_id } => match ledger.get_batch(&batch_id)? {
                    Some(batch) => print_json(&batch)?,
                    None => anyhow::bail!("batch {batch_id} not found"),
                },
                BatchCommands::Put {
                    batch_id,
                    center,
                    collector,
                    plastic,
                    weight_grams,
                    status,
                } => {
                    let batch = BatchRecord {
                        batch_id,
                        center_id: center,
                        collector_profile_id: collector,
                        plastic_type: plastic.parse::<PlasticType>()?,
                        weight_grams,
                        status: status.parse::<BatchStatus>()?,
                        recorded_at: Utc::now().naive_utc(),
                    };
                    ledger.put_batch(&batch)?;
                    print_json(&batch)?;
                }
                BatchCommands::List { center_id } => {
                    print_json(&ledger.batches_for_center(&center_id)?)?;
                }
            }
        }
        Commands::Balance { profile_id } => {
            let ledger = open_ledger(cli.db)?;
            print_json(&ledger.get_balance(&profile_id)?)?;
        }
    }

    Ok(())
}
