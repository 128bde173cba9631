use std::sync::atomic::AtomicBool;
use std::sync::Arc;

use crate::error::IndexerError;
use crate::import::{ImportConfig, ImportTransaction};
use crate::query;
use crate::query::alias::AliasFilter;
use crate::query::basic::BasicOutputFilter;
use crate::query::foundry::FoundryFilter;
use crate::query::nft::NftFilter;
use crate::query::IndexerResult;
use utxo_indexer_database::client::IndexerDbClient;
use utxo_indexer_database::models::status::Status;
use utxo_indexer_database::query::filtered::{BindValue, FilteredOutputQuery};
use utxo_indexer_ledger::ids::{AliasId, FoundryId, NftId, OutputId};

/// Read surface over the output index plus the entry point into the bulk
/// import path. Holds no state besides the database client; consistency
/// derives from the status join inside every read.
#[derive(Clone)]
pub struct Indexer {
    database: IndexerDbClient,
}

impl Indexer {
    pub fn new(database: IndexerDbClient) -> Self {
        Indexer { database }
    }

    pub fn database(&self) -> &IndexerDbClient {
        &self.database
    }

    pub fn import_transaction(&self, run: Arc<AtomicBool>, config: &ImportConfig) -> ImportTransaction {
        ImportTransaction::new(self.database.clone(), run, config)
    }

    pub async fn status(&self) -> Result<Status, IndexerError> {
        Ok(self.database.select_status().await?)
    }

    pub async fn basic_outputs_with_filters(
        &self,
        filter: &BasicOutputFilter,
    ) -> Result<IndexerResult, IndexerError> {
        let composed = query::basic::compose(filter);
        self.filtered(composed, filter.page_size, filter.cursor.clone()).await
    }

    pub async fn nft_outputs_with_filters(
        &self,
        filter: &NftFilter,
    ) -> Result<IndexerResult, IndexerError> {
        let composed = query::nft::compose(filter);
        self.filtered(composed, filter.page_size, filter.cursor.clone()).await
    }

    pub async fn alias_outputs_with_filters(
        &self,
        filter: &AliasFilter,
    ) -> Result<IndexerResult, IndexerError> {
        let composed = query::alias::compose(filter);
        self.filtered(composed, filter.page_size, filter.cursor.clone()).await
    }

    pub async fn foundry_outputs_with_filters(
        &self,
        filter: &FoundryFilter,
    ) -> Result<IndexerResult, IndexerError> {
        let composed = query::foundry::compose(filter)?;
        self.filtered(composed, filter.page_size, filter.cursor.clone()).await
    }

    /// At most one id; an empty result is the caller's not-found signal, not
    /// an error.
    pub async fn nft_output(&self, nft_id: &NftId) -> Result<IndexerResult, IndexerError> {
        let mut composed = FilteredOutputQuery::new("nfts");
        composed.bind_condition("nft_id = {}", BindValue::Bytes(nft_id.to_vec()));
        composed.limit(1);
        self.filtered(composed, 0, None).await
    }

    pub async fn alias_output(&self, alias_id: &AliasId) -> Result<IndexerResult, IndexerError> {
        let mut composed = FilteredOutputQuery::new("aliases");
        composed.bind_condition("alias_id = {}", BindValue::Bytes(alias_id.to_vec()));
        composed.limit(1);
        self.filtered(composed, 0, None).await
    }

    pub async fn foundry_output(&self, foundry_id: &FoundryId) -> Result<IndexerResult, IndexerError> {
        let mut composed = FilteredOutputQuery::new("foundries");
        composed.bind_condition("foundry_id = {}", BindValue::Bytes(foundry_id.to_vec()));
        composed.limit(1);
        self.filtered(composed, 0, None).await
    }

    async fn filtered(
        &self,
        composed: FilteredOutputQuery,
        page_size: u32,
        cursor: Option<String>,
    ) -> Result<IndexerResult, IndexerError> {
        let page = query::pagination(page_size, cursor)?;
        let results = self.database.select_filtered_output_ids(composed, page).await?;
        let output_ids = results
            .output_ids
            .iter()
            .map(|bytes| OutputId::from_bytes(bytes))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(IndexerResult {
            output_ids,
            ledger_index: results.ledger_index,
            page_size,
            cursor: results.next_cursor,
        })
    }
}
