use clap::Parser;
use miette::{IntoDiagnostic, Result};
use shopflow::application::engine::WorkflowEngine;
use shopflow::domain::account::AccountNo;
use shopflow::infrastructure::in_memory::{
    InMemoryLedgerStore, InMemoryOrderStore, InMemoryProductStore, InMemoryRequestStore,
    InMemoryTransactionStore,
};
#[cfg(feature = "storage-rocksdb")]
use shopflow::infrastructure::rocksdb::RocksDbStore;
use shopflow::interfaces::json::request_reader::RequestReader;
use shopflow::interfaces::json::runner::ScriptRunner;
use std::fs::File;
use std::io::{self, Write};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Default account credited by every order payment.
const PLATFORM_ACCOUNT: &str = "000000000001";

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Input workflow script (one JSON request per line)
    input: PathBuf,

    /// Path to persistent database (optional). If provided, uses RocksDB.
    #[arg(long)]
    db_path: Option<PathBuf>,

    /// Account number credited by order payments
    #[arg(long, default_value = PLATFORM_ACCOUNT)]
    platform_account: String,
}

fn build_engine(cli: &Cli, platform_account: AccountNo) -> Result<WorkflowEngine> {
    if let Some(db_path) = &cli.db_path {
        #[cfg(feature = "storage-rocksdb")]
        {
            // One RocksDB instance backs every port.
            let store = RocksDbStore::open(db_path).into_diagnostic()?;
            return Ok(WorkflowEngine::new(
                Box::new(store.clone()),
                Box::new(store.clone()),
                Box::new(store.clone()),
                Box::new(store.clone()),
                Box::new(store),
                platform_account,
            ));
        }
        #[cfg(not(feature = "storage-rocksdb"))]
        {
            let _ = db_path;
            return Err(miette::miette!(
                "this build has no persistent storage; enable the storage-rocksdb feature"
            ));
        }
    }

    Ok(WorkflowEngine::new(
        Box::new(InMemoryLedgerStore::new()),
        Box::new(InMemoryOrderStore::new()),
        Box::new(InMemoryTransactionStore::new()),
        Box::new(InMemoryRequestStore::new()),
        Box::new(InMemoryProductStore::new()),
        platform_account,
    ))
}

#[tokio::main]
async fn main() -> Result<()> {
    // Logs go to stderr; stdout carries one JSON response per request line.
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();
    let platform_account = AccountNo::new(cli.platform_account.clone()).into_diagnostic()?;
    let engine = build_engine(&cli, platform_account)?;
    engine
        .ensure_platform_account("Platform Treasury")
        .await
        .into_diagnostic()?;

    let file = File::open(&cli.input).into_diagnostic()?;
    let reader = RequestReader::new(file);
    let mut runner = ScriptRunner::new(engine);

    let stdout = io::stdout();
    let mut out = stdout.lock();
    for request in reader.requests() {
        match request {
            Ok(request) => {
                let response = runner.apply(request).await;
                let line = serde_json::to_string(&response).into_diagnostic()?;
                writeln!(out, "{line}").into_diagnostic()?;
            }
            Err(err) => {
                eprintln!("Error reading request: {err}");
            }
        }
    }

    Ok(())
}
