use utxo_indexer_database::query::filtered::{BindValue, FilteredOutputQuery};
use utxo_indexer_ledger::address::Address;

/// Optional predicates over the alias table.
#[derive(Clone, Debug, Default)]
pub struct AliasFilter {
    pub has_native_tokens: Option<bool>,
    pub min_native_token_count: Option<u32>,
    pub max_native_token_count: Option<u32>,
    pub state_controller: Option<Address>,
    pub governor: Option<Address>,
    pub issuer: Option<Address>,
    pub sender: Option<Address>,
    pub created_before: Option<u32>,
    pub created_after: Option<u32>,
    pub page_size: u32,
    pub cursor: Option<String>,
}

pub(crate) fn compose(filter: &AliasFilter) -> FilteredOutputQuery {
    let mut query = FilteredOutputQuery::new("aliases");

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
    if let Some(address) = &filter.state_controller {
        query.bind_condition("state_controller = {}", BindValue::Bytes(address.to_vec()));
    }
    if let Some(address) = &filter.governor {
        query.bind_condition("governor = {}", BindValue::Bytes(address.to_vec()));
    }
    if let Some(issuer) = &filter.issuer {
        query.bind_condition("issuer = {}", BindValue::Bytes(issuer.to_vec()));
    }
    if let Some(sender) = &filter.sender {
        query.bind_condition("sender = {}", BindValue::Bytes(sender.to_vec()));
    }
    if let Some(time) = filter.created_before {
        query.bind_condition("created_at < {}", BindValue::Int(i64::from(time)));
    }
    if let Some(time) = filter.created_after {
        query.bind_condition("created_at > {}", BindValue::Int(i64::from(time)));
    }

    query
}
