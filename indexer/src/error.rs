use thiserror::Error;
use utxo_indexer_ledger::ids::IdError;

/// Query-path errors. Import-path failures are fatal to the process instead;
/// bulk load has no partial-success contract.
#[derive(Debug, Error)]
pub enum IndexerError {
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),
    #[error("database error: {0}")]
    Store(#[from] sqlx::Error),
    #[error("corrupt row in store: {0}")]
    CorruptRow(#[from] IdError),
}
