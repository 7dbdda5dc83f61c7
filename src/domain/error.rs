use rust_decimal::Decimal;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    IO(#[from] std::io::Error),

    #[error("Storage failed with: {0}")]
    Storage(#[from] serde_json::Error),

    #[error("CSV failed with: {0}")]
    Csv(#[from] csv::Error),

    #[error("Ingestion failed with: {0}")]
    Ingestion(String),

    #[error("Invalid input: {0}")]
    Validation(String),

    #[error("Please log in again. Your session has expired.")]
    SessionRequired,

    #[error("Insufficient balance: requested {requested}, available {available}")]
    InsufficientBalance {
        requested: Decimal,
        available: Decimal,
    },

    #[error("Configuration error: {0}")]
    Config(String),
}
