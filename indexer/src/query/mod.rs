pub mod alias;
pub mod basic;
pub mod foundry;
pub mod nft;

use crate::error::IndexerError;
use utxo_indexer_database::cursor::CURSOR_LENGTH;
use utxo_indexer_database::query::filtered::Pagination;
use utxo_indexer_ledger::ids::OutputId;

/// Result of one filtered read: matching ids in query order, the ledger
/// index the result set is consistent with, the echoed page size and the
/// opaque resumption cursor when more rows exist.
#[derive(Clone, Debug)]
pub struct IndexerResult {
    pub output_ids: Vec<OutputId>,
    pub ledger_index: u32,
    pub page_size: u32,
    pub cursor: Option<String>,
}

pub(crate) fn pagination(page_size: u32, cursor: Option<String>) -> Result<Pagination, IndexerError> {
    if let Some(cursor) = &cursor {
        if cursor.len() != CURSOR_LENGTH {
            return Err(IndexerError::InvalidParameter(format!(
                "invalid cursor length: {}",
                cursor.len()
            )));
        }
    }
    Ok(Pagination { page_size, cursor })
}
