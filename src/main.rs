use clap::{Parser, Subcommand};
use hoptrack::application::service::TransferService;
use hoptrack::domain::bank::BankId;
use hoptrack::domain::ports::TaskStoreBox;
use hoptrack::infrastructure::json_file::JsonFileTaskStore;
#[cfg(feature = "storage-rocksdb")]
use hoptrack::infrastructure::rocksdb::RocksDbTaskStore;
use hoptrack::interfaces::config;
use miette::{IntoDiagnostic, Result};
use rust_decimal::Decimal;
use std::path::PathBuf;
use std::sync::Arc;
use uuid::Uuid;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Bank network configuration file
    #[arg(long, default_value = "config/banks.json")]
    banks: PathBuf,

    /// JSON file holding task records
    #[arg(long, default_value = "data/tasks.json")]
    data: PathBuf,

    /// Path to persistent database. If provided, uses RocksDB instead of the
    /// JSON task file.
    #[cfg(feature = "storage-rocksdb")]
    #[arg(long)]
    db_path: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// List the configured banks and their outbound channels
    Banks,
    /// Quote the candidate routes for a transfer
    Plan {
        currency: String,
        amount: Decimal,
        from: BankId,
        to: BankId,
    },
    /// Create a transfer task
    Create {
        currency: String,
        amount: Decimal,
        from: BankId,
        to: BankId,
        /// Explicit route as comma-separated bank ids, e.g. 1,3,4
        #[arg(long, value_delimiter = ',')]
        route: Option<Vec<BankId>>,
    },
    /// Show one task
    Show { id: Uuid },
    /// List stored tasks
    List {
        /// Only tasks still pending or processing
        #[arg(long)]
        open: bool,
    },
    /// Debit the source bank and send the first hop
    Start { id: Uuid },
    /// Confirm that funds arrived for the current hop
    Confirm {
        id: Uuid,
        actual_amount: Decimal,
        #[arg(long, default_value = "")]
        reason: String,
    },
    /// Send funds for the next hop
    Next { id: Uuid },
    /// Cancel a task
    Cancel { id: Uuid, reason: String },
    /// Delete a stored task record
    Delete { id: Uuid },
}

fn build_store(cli: &Cli) -> hoptrack::error::Result<TaskStoreBox> {
    #[cfg(feature = "storage-rocksdb")]
    if let Some(db_path) = &cli.db_path {
        let store = RocksDbTaskStore::open(db_path)?;
        return Ok(Box::new(store));
    }
    Ok(Box::new(JsonFileTaskStore::new(cli.data.clone())))
}

fn print_json<T: serde::Serialize>(value: &T) -> Result<()> {
    println!(
        "{}",
        serde_json::to_string_pretty(value).into_diagnostic()?
    );
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let graph = Arc::new(config::load_banks(&cli.banks).into_diagnostic()?);
    let store = build_store(&cli).into_diagnostic()?;
    let service = TransferService::new(graph.clone(), store);

    match cli.command {
        Command::Banks => {
            let mut banks: Vec<_> = graph.banks().collect();
            banks.sort_by_key(|b| b.id);
            print_json(&banks)?;
        }
        Command::Plan {
            currency,
            amount,
            from,
            to,
        } => {
            let quotes = service
                .plan_routes(&currency, amount, from, to)
                .into_diagnostic()?;
            print_json(&quotes)?;
        }
        Command::Create {
            currency,
            amount,
            from,
            to,
            route,
        } => {
            let task = service
                .create_task(&currency, amount, from, to, route)
                .await
                .into_diagnostic()?;
            print_json(&task)?;
        }
        Command::Show { id } => {
            let task = service.get_task(id).await.into_diagnostic()?;
            print_json(&task)?;
        }
        Command::List { open } => {
            let tasks = if open {
                service.list_open_tasks().await.into_diagnostic()?
            } else {
                service.list_tasks().await.into_diagnostic()?
            };
            print_json(&tasks)?;
        }
        Command::Start { id } => {
            let task = service.start_transfer(id).await.into_diagnostic()?;
            print_json(&task)?;
        }
        Command::Confirm {
            id,
            actual_amount,
            reason,
        } => {
            let task = service
                .confirm_arrival(id, actual_amount, &reason)
                .await
                .into_diagnostic()?;
            print_json(&task)?;
        }
        Command::Next { id } => {
            let task = service.send_next_step(id).await.into_diagnostic()?;
            print_json(&task)?;
        }
        Command::Cancel { id, reason } => {
            let task = service
                .cancel_task(id, &reason)
                .await
                .into_diagnostic()?;
            print_json(&task)?;
        }
        Command::Delete { id } => {
            let removed = service.delete_task(id).await.into_diagnostic()?;
            print_json(&removed)?;
        }
    }

    Ok(())
}
