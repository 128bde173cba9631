use crate::error::IndexerError;
use utxo_indexer_database::query::filtered::{BindValue, FilteredOutputQuery};
use utxo_indexer_ledger::address::Address;

/// Optional predicates over the foundry table. The controlling address must
/// be of alias kind.
#[derive(Clone, Debug, Default)]
pub struct FoundryFilter {
    pub has_native_tokens: Option<bool>,
    pub min_native_token_count: Option<u32>,
    pub max_native_token_count: Option<u32>,
    pub alias_address: Option<Address>,
    pub created_before: Option<u32>,
    pub created_after: Option<u32>,
    pub page_size: u32,
    pub cursor: Option<String>,
}

pub(crate) fn compose(filter: &FoundryFilter) -> Result<FilteredOutputQuery, IndexerError> {
    let mut query = FilteredOutputQuery::new("foundries");

    if let Some(has_native_tokens) = filter.has_native_tokens {
        query.condition(if has_native_tokens {
            "native_token_count > 0"
        } else {
            "native_token_count = 0"
        });
    }
    if let Some(count) = filter.min_native_token_count {
        query.bind_condition("native_token_count >= {}", BindValue::Int(i64::from(count)));
    }
    if let Some(count) = filter.max_native_token_count {
        query.bind_condition("native_token_count <= {}", BindValue::Int(i64::from(count)));
    }
    if let Some(address) = &filter.alias_address {
        if !address.is_alias() {
            return Err(IndexerError::InvalidParameter(format!(
                "invalid address: {address}, not an alias address"
            )));
        }
        query.bind_condition("alias_address = {}", BindValue::Bytes(address.to_vec()));
    }
    if let Some(time) = filter.created_before {
        query.bind_condition("created_at < {}", BindValue::Int(i64::from(time)));
    }
    if let Some(time) = filter.created_after {
        query.bind_condition("created_at > {}", BindValue::Int(i64::from(time)));
    }

    Ok(query)
}
