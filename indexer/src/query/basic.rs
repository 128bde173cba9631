use utxo_indexer_database::query::filtered::{BindValue, FilteredOutputQuery};
use utxo_indexer_ledger::address::Address;

/// Optional predicates over the basic-output table; present filters are
/// conjoined.
#[derive(Clone, Debug, Default)]
pub struct BasicOutputFilter {
    pub has_native_tokens: Option<bool>,
    pub min_native_token_count: Option<u32>,
    pub max_native_token_count: Option<u32>,
    pub unlockable_by_address: Option<Address>,
    pub has_storage_deposit_return: Option<bool>,
    pub storage_deposit_return_address: Option<Address>,
    pub has_expiration: Option<bool>,
    pub expiration_return_address: Option<Address>,
    pub expires_before: Option<u32>,
    pub expires_after: Option<u32>,
    pub has_timelock: Option<bool>,
    pub timelocked_before: Option<u32>,
    pub timelocked_after: Option<u32>,
    pub sender: Option<Address>,
    pub tag: Option<Vec<u8>>,
    pub created_before: Option<u32>,
    pub created_after: Option<u32>,
    pub page_size: u32,
    pub cursor: Option<String>,
}

pub(crate) fn compose(filter: &BasicOutputFilter) -> FilteredOutputQuery {
    let mut query = FilteredOutputQuery::new("basic_outputs");

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
    if let Some(address) = &filter.unlockable_by_address {
        query.bind_condition("address = {}", BindValue::Bytes(address.to_vec()));
    }
    if let Some(has_storage_deposit_return) = filter.has_storage_deposit_return {
        query.condition(if has_storage_deposit_return {
            "storage_deposit_return IS NOT NULL"
        } else {
            "storage_deposit_return IS NULL"
        });
    }
    if let Some(address) = &filter.storage_deposit_return_address {
        query.bind_condition("storage_deposit_return_address = {}", BindValue::Bytes(address.to_vec()));
    }
    if let Some(has_expiration) = filter.has_expiration {
        query.condition(if has_expiration {
            "expiration_return_address IS NOT NULL"
        } else {
            "expiration_return_address IS NULL"
        });
    }
    if let Some(address) = &filter.expiration_return_address {
        query.bind_condition("expiration_return_address = {}", BindValue::Bytes(address.to_vec()));
    }
    if let Some(time) = filter.expires_before {
        query.bind_condition("expiration_time < {}", BindValue::Int(i64::from(time)));
    }
    if let Some(time) = filter.expires_after {
        query.bind_condition("expiration_time > {}", BindValue::Int(i64::from(time)));
    }
    if let Some(has_timelock) = filter.has_timelock {
        query.condition(if has_timelock { "timelock_time IS NOT NULL" } else { "timelock_time IS NULL" });
    }
    if let Some(time) = filter.timelocked_before {
        query.bind_condition("timelock_time < {}", BindValue::Int(i64::from(time)));
    }
    if let Some(time) = filter.timelocked_after {
        query.bind_condition("timelock_time > {}", BindValue::Int(i64::from(time)));
    }
    if let Some(sender) = &filter.sender {
        query.bind_condition("sender = {}", BindValue::Bytes(sender.to_vec()));
    }
    if let Some(tag) = &filter.tag {
        if !tag.is_empty() {
            query.bind_condition("tag = {}", BindValue::Bytes(tag.clone()));
        }
    }
    if let Some(time) = filter.created_before {
        query.bind_condition("created_at < {}", BindValue::Int(i64::from(time)));
    }
    if let Some(time) = filter.created_after {
        query.bind_condition("created_at > {}", BindValue::Int(i64::from(time)));
    }

    query
}
