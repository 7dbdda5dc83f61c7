use std::{env, fs::File, io, path::Path};

use tracing::info;
use tracing_subscriber::EnvFilter;

use wallet_view::config::{Config, DEFAULT_LOG_FILTER};
use wallet_view::engine::Wallet;
use wallet_view::ingestion::CsvReader;
use wallet_view::ledger::Ledger;
use wallet_view::rejections::TracingRejections;
use wallet_view::session::SessionState;
use wallet_view::storage::FileStore;

#[tokio::main] // using Tokio runtime for async
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER)),
        )
        .with_writer(io::stderr)
        .init();

    let config = Config::load()?;

    let mut args = env::args();
    let file_path = args
        .nth(1)
        .ok_or("usage: wallet_view <events.csv>")?;
    let file = File::open(Path::new(&file_path))?;

    let endpoints = config.endpoints();
    info!(
        store = %config.store_path.display(),
        login = %endpoints.login(),
        payments = %endpoints.payment_initiate(),
        "Starting wallet"
    );

    let mut wallet = Wallet::new(
        CsvReader::new(file),
        SessionState::new(FileStore::new(&config.store_path)),
        Ledger::new(),
        TracingRejections::default(),
    );

    wallet.start();
    wallet.process().await?;
    wallet.flush(io::stdout().lock())?;

    Ok(())
}
